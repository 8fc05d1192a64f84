//! HTML extraction primitives for steep
//!
//! Extraction is modelled as an ordered [`ExtractionChain`] of [`Strategy`]
//! values. Each strategy is a pure function of the markup; the chain returns
//! the first non-empty hit. Everything here is synchronous and returns owned
//! values, so parsed documents never cross an await point.

pub mod embedded;
pub mod error;
pub mod links;
pub mod product;
pub mod strategy;
pub mod table;
pub mod text;
pub mod token;

pub use embedded::{embedded_object, EmbeddedMarker};
pub use error::{ScrapeError, ScrapeResult};
pub use links::{resolve_link, LinkExtractor};
pub use product::{ProductExtractor, ProductInfo};
pub use strategy::{ExtractionChain, Strategy};
pub use table::{first_heading, first_table, TablePreview};
pub use text::{contains_normalized, document_text, normalize};
pub use token::TokenExtractor;
