//! Application layer: the catalog client tying transport and parsers
//! together, and the browser that owns navigation state.

pub mod browser;
pub mod catalog;

pub use browser::{CatalogBrowser, PageOutcome};
pub use catalog::{CatalogClient, CatalogError};
