//! MPS text reader and writer.
//!
//! Reading runs in two passes: [`records::collect`] streams the text into flat
//! records, then [`builder::build`] resolves names and assembles the model.

pub mod bounds;
pub mod builder;
pub mod lexer;
pub mod marker;
pub mod records;
pub mod writer;

use crate::error::{ParseError, WriteError};
use crate::model::Model;

pub use writer::format_number;

/// Parse free-format MPS text into a model.
pub fn parse(text: &str) -> Result<Model, ParseError> {
    builder::build(records::collect(text)?)
}

/// Serialize a model to canonical MPS text.
pub fn write(model: &Model) -> Result<String, WriteError> {
    writer::write(model)
}
