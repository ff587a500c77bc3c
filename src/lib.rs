//! # rust-mps
//!
//! Conversion between free-format MPS text and a structured linear /
//! mixed-integer optimization model, with round-trip fidelity: a model
//! written by [`model_to_mps`] and read back by [`mps_to_model`] compares
//! equal to the original, and writing it again yields the same bytes.
//!
//! ## Example
//!
//! ```
//! use rust_mps::{model_to_mps, mps_to_model, LinearConstraint, Model, Variable};
//!
//! let mut model = Model::new("demo");
//! model.add_variable(Variable::integer("x", 1.0, f64::INFINITY)).unwrap();
//! model.add_variable(Variable::continuous("y", 0.0, 10.0)).unwrap();
//! model
//!     .add_linear_constraint(
//!         LinearConstraint::new("c", 2.0, f64::INFINITY)
//!             .with_term("x", 1.0)
//!             .with_term("y", 1.0),
//!     )
//!     .unwrap();
//! model.minimize([("x", 1.0), ("y", 1.0)]).unwrap();
//!
//! let text = model_to_mps(&model).unwrap();
//! assert_eq!(mps_to_model(&text).unwrap(), model);
//! ```

pub mod config;
pub mod convert;
pub mod domain;
pub mod error;
pub mod model;
pub mod models;
pub mod mps;
pub mod routes;
pub mod serde_helpers;

pub use error::{Error, ModelError, ParseError, Referent, Result, WriteError};
pub use model::{
    Coefficients, ConstraintId, LinearConstraint, Model, Objective, Sense, Variable, VariableId,
};

/// Parse MPS text into a model.
///
/// Every failure carries the 1-based line it originated from; no partial
/// model is returned.
pub fn mps_to_model(text: &str) -> std::result::Result<Model, ParseError> {
    mps::parse(text)
}

/// Serialize a model to canonical MPS text.
///
/// The model is validated first; nothing is produced for an unwritable model.
pub fn model_to_mps(model: &Model) -> std::result::Result<String, WriteError> {
    mps::write(model)
}
