//! Cross-component runs over a real bus.

pub mod contention;
pub mod fixtures;
