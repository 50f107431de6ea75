//! CLI command implementations.

pub mod product;
pub mod search;

pub use product::{ProductCommand, ProductTarget};
pub use search::SearchCommand;
