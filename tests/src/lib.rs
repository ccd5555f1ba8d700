//! # Shard Bus Test Suite
//!
//! Multi-threaded scenarios exercising the full producer → cell → channel →
//! consumer protocol.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── scenarios.rs      # Fixed workloads with exact expectations
//!     ├── contention.rs     # Many pairs colliding on few shards
//!     └── backpressure.rs   # Small channels and slow consumers
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p bus-tests
//! cargo test -p bus-tests integration::contention::
//! ```

pub mod integration;
