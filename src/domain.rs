//! Domain layer: value records produced by extraction and the page
//! navigation state owned by the catalog browser.

pub mod entities;
pub mod page_state;

pub use entities::{DetailRecord, ListingEntry, ListingPage, TitleCategory};
pub use page_state::PageState;
