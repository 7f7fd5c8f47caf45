//! Storage layer: the line codec and the flat-file store.

pub mod codec;
pub mod store;

pub use store::AccountStore;
