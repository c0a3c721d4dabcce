//! In-memory item catalog.
//!
//! A small domain served by the demo API. Every catalog operation runs
//! through the invocation tracer, so a single request produces both
//! boundary events and method events.

pub mod service;
pub mod types;

pub use service::Catalog;
pub use types::{CatalogError, Item, NewItem, Quote};
