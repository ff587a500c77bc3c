//! # MPS API Client
//!
//! A Rust client SDK for the MPS conversion REST API, which turns MPS text
//! into structured optimization models and back.
//!
//! ## Example
//!
//! ```no_run
//! use mps_api_sdk::{LinearConstraint, ModelBuilder, MpsClient, Variable};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MpsClient::new("http://localhost:9000")?;
//!
//!     let model = ModelBuilder::new("knapsack")
//!         .add_variable(Variable::binary("x1"))
//!         .add_variable(Variable::binary("x2"))
//!         .add_constraint(
//!             LinearConstraint::new("weight", f64::NEG_INFINITY, 5.0)
//!                 .with_term("x1", 3.0)
//!                 .with_term("x2", 4.0),
//!         )
//!         .maximize([("x1", 10.0), ("x2", 12.0)])
//!         .build()?;
//!
//!     let mps = client.model_to_mps(&model).await?;
//!     println!("{}", mps);
//!
//!     let parsed = client.mps_to_model(mps).await?;
//!     assert_eq!(parsed, model);
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod client;
pub mod error;
pub mod types;

pub use builder::ModelBuilder;
pub use client::MpsClient;
pub use error::{MpsApiError, Result};
pub use types::{Coefficients, ErrorResponse, LinearConstraint, Model, Objective, Sense, Variable};
