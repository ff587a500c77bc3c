//! The structured optimization model.
//!
//! This is the representation both conversion directions produce and consume.
//! Its serde form is the JSON wire schema served by the HTTP API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ModelError;
use crate::serde_helpers;

/// Sparse coefficients keyed by variable name
pub type Coefficients = BTreeMap<String, f64>;

/// Position of a variable in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub usize);

/// Position of a linear constraint in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub usize);

/// Optimization direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sense {
    #[default]
    Minimize,
    Maximize,
}

/// A decision variable with bounds and integrality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(with = "serde_helpers::bound", default)]
    pub lower: f64,
    #[serde(with = "serde_helpers::bound", default = "serde_helpers::infinity")]
    pub upper: f64,
    #[serde(default)]
    pub is_integer: bool,
}

impl Variable {
    /// Create a continuous variable with the given bounds.
    pub fn continuous(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
            is_integer: false,
        }
    }

    /// Create an integer variable with the given bounds.
    pub fn integer(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
            is_integer: true,
        }
    }

    /// Create a binary variable with bounds [0, 1] and integer constraint.
    pub fn binary(name: impl Into<String>) -> Self {
        Self::integer(name, 0.0, 1.0)
    }

    pub fn is_binary(&self) -> bool {
        self.is_integer && self.lower == 0.0 && self.upper == 1.0
    }
}

/// A linear constraint `lower <= sum(coefficients * x) <= upper`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    pub name: String,
    #[serde(with = "serde_helpers::bound", default = "serde_helpers::neg_infinity")]
    pub lower: f64,
    #[serde(with = "serde_helpers::bound", default = "serde_helpers::infinity")]
    pub upper: f64,
    #[serde(default)]
    pub coefficients: Coefficients,
}

impl LinearConstraint {
    pub fn new(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
            coefficients: Coefficients::new(),
        }
    }

    /// Add a term; zero coefficients are dropped.
    pub fn with_term(mut self, variable: impl Into<String>, coefficient: f64) -> Self {
        set_coefficient(&mut self.coefficients, variable.into(), coefficient);
        self
    }
}

/// Linear objective with a constant offset
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Objective {
    #[serde(default)]
    pub sense: Sense,
    #[serde(default)]
    pub offset: f64,
    #[serde(default)]
    pub coefficients: Coefficients,
}

/// An optimization model: ordered variables, ordered linear constraints and
/// one objective.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Model {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub linear_constraints: Vec<LinearConstraint>,
    #[serde(default)]
    pub objective: Objective,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.linear_constraints.len()
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn constraint(&self, name: &str) -> Option<&LinearConstraint> {
        self.linear_constraints.iter().find(|c| c.name == name)
    }

    /// Append a variable; names must be unique.
    pub fn add_variable(&mut self, variable: Variable) -> Result<VariableId, ModelError> {
        if self.variable(&variable.name).is_some() {
            return Err(ModelError::DuplicateVariable(variable.name));
        }
        self.variables.push(variable);
        Ok(VariableId(self.variables.len() - 1))
    }

    /// Append a linear constraint over existing variables; names must be unique.
    pub fn add_linear_constraint(
        &mut self,
        mut constraint: LinearConstraint,
    ) -> Result<ConstraintId, ModelError> {
        if self.constraint(&constraint.name).is_some() {
            return Err(ModelError::DuplicateConstraint(constraint.name));
        }
        self.check_known(constraint.coefficients.keys())?;
        constraint.coefficients.retain(|_, v| *v != 0.0);
        self.linear_constraints.push(constraint);
        Ok(ConstraintId(self.linear_constraints.len() - 1))
    }

    /// Replace the objective terms and direction; the offset is kept.
    pub fn set_objective<I, S>(&mut self, sense: Sense, terms: I) -> Result<(), ModelError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut coefficients = Coefficients::new();
        for (name, value) in terms {
            set_coefficient(&mut coefficients, name.into(), value);
        }
        self.check_known(coefficients.keys())?;
        self.objective.sense = sense;
        self.objective.coefficients = coefficients;
        Ok(())
    }

    pub fn minimize<I, S>(&mut self, terms: I) -> Result<(), ModelError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        self.set_objective(Sense::Minimize, terms)
    }

    pub fn maximize<I, S>(&mut self, terms: I) -> Result<(), ModelError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        self.set_objective(Sense::Maximize, terms)
    }

    pub fn set_objective_offset(&mut self, offset: f64) {
        self.objective.offset = offset;
    }

    fn check_known<'a>(&self, names: impl Iterator<Item = &'a String>) -> Result<(), ModelError> {
        for name in names {
            if self.variable(name).is_none() {
                return Err(ModelError::UnknownVariable(name.clone()));
            }
        }
        Ok(())
    }
}

/// Insert a coefficient, removing the entry instead when it is zero.
pub(crate) fn set_coefficient(coefficients: &mut Coefficients, name: String, value: f64) {
    if value == 0.0 {
        coefficients.remove(&name);
    } else {
        coefficients.insert(name, value);
    }
}
