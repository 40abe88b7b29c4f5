//! Store ports - counter sets and keyed definitions

mod repository;

pub use repository::{CounterStore, KeyValueStore};

#[cfg(test)]
pub use repository::{MockCounterStore, MockKeyValueStore};
