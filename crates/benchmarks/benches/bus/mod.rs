//! Benchmark modules, one per bus component.

pub mod cell;
pub mod channel;
pub mod exchange;
