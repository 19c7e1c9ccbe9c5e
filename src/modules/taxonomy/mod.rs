//! SKOS taxonomy documents
//!
//! The document is read once into an owned tree of [`Node`]s so concepts can
//! be queried by child name instead of tracking parser state.

pub mod parser;
pub mod tree;

pub use parser::{parse_document, parse_str};
pub use tree::{Element, Node};
