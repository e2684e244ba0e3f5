//! Database layer (in-memory store with JSON snapshots).

pub mod memory;

pub use memory::{Db, Snapshot};
