//! Application layer: the write-ordering decorator.

pub mod ordered_write;

pub use ordered_write::{wrap, OrderedWriteContext, SharedContext, ORDERED};
