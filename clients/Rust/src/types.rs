use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sparse coefficients keyed by variable name
pub type Coefficients = BTreeMap<String, f64>;

/// Optimization direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sense {
    /// Minimize the objective function
    #[default]
    Minimize,
    /// Maximize the objective function
    Maximize,
}

/// A decision variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name, unique within the model
    pub name: String,
    /// Lower bound; may be `f64::NEG_INFINITY`
    #[serde(with = "bound", default)]
    pub lower: f64,
    /// Upper bound; may be `f64::INFINITY`
    #[serde(with = "bound", default = "infinity")]
    pub upper: f64,
    /// Whether the variable must take integer values
    #[serde(default)]
    pub is_integer: bool,
}

impl Variable {
    /// Create a continuous variable with the given bounds
    pub fn continuous(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
            is_integer: false,
        }
    }

    /// Create an integer variable with the given bounds
    pub fn integer(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
            is_integer: true,
        }
    }

    /// Create a binary variable: integer with bounds [0, 1]
    pub fn binary(name: impl Into<String>) -> Self {
        Self::integer(name, 0.0, 1.0)
    }
}

/// A linear constraint `lower <= sum(coefficients * x) <= upper`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    /// Constraint name, unique within the model
    pub name: String,
    /// Lower bound; may be `f64::NEG_INFINITY`
    #[serde(with = "bound", default = "neg_infinity")]
    pub lower: f64,
    /// Upper bound; may be `f64::INFINITY`
    #[serde(with = "bound", default = "infinity")]
    pub upper: f64,
    /// Nonzero coefficients keyed by variable name
    #[serde(default)]
    pub coefficients: Coefficients,
}

impl LinearConstraint {
    /// Create a constraint with no terms
    pub fn new(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
            coefficients: Coefficients::new(),
        }
    }

    /// Add a term; zero coefficients are dropped
    pub fn with_term(mut self, variable: impl Into<String>, coefficient: f64) -> Self {
        let variable = variable.into();
        if coefficient == 0.0 {
            self.coefficients.remove(&variable);
        } else {
            self.coefficients.insert(variable, coefficient);
        }
        self
    }
}

/// Linear objective with a constant offset
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Objective {
    /// Whether to maximize or minimize
    #[serde(default)]
    pub sense: Sense,
    /// Constant term added to the objective value
    #[serde(default)]
    pub offset: f64,
    /// Nonzero coefficients keyed by variable name
    #[serde(default)]
    pub coefficients: Coefficients,
}

/// An optimization model as exchanged with the API
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Model {
    /// Model name
    #[serde(default)]
    pub name: String,
    /// Decision variables, in declaration order
    #[serde(default)]
    pub variables: Vec<Variable>,
    /// Linear constraints, in declaration order
    #[serde(default)]
    pub linear_constraints: Vec<LinearConstraint>,
    /// The objective function
    #[serde(default)]
    pub objective: Objective,
}

/// Error body returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human readable message
    pub error: String,
    /// Semantic error code
    pub code: String,
    /// Offending MPS line, for parse errors
    #[serde(default)]
    pub line: Option<usize>,
}

fn infinity() -> f64 {
    f64::INFINITY
}

fn neg_infinity() -> f64 {
    f64::NEG_INFINITY
}

/// Bounds travel as numbers, with infinities as `"Infinity"` / `"-Infinity"`
mod bound {
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        match *value {
            v if v.is_finite() => serializer.serialize_f64(v),
            v if v.is_nan() => serializer.serialize_str("NaN"),
            v if v > 0.0 => serializer.serialize_str("Infinity"),
            _ => serializer.serialize_str("-Infinity"),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        struct BoundVisitor;

        impl Visitor<'_> for BoundVisitor {
            type Value = f64;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a number, \"Infinity\" or \"-Infinity\"")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
                Ok(v)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
                Ok(v as f64)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
                Ok(v as f64)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
                match v {
                    "Infinity" => Ok(f64::INFINITY),
                    "-Infinity" => Ok(f64::NEG_INFINITY),
                    "NaN" => Ok(f64::NAN),
                    other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
                }
            }
        }

        deserializer.deserialize_any(BoundVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infinite_bounds_use_strings() {
        let variable = Variable::continuous("x", f64::NEG_INFINITY, f64::INFINITY);
        let json = serde_json::to_value(&variable).unwrap();
        assert_eq!(json["lower"], "-Infinity");
        assert_eq!(json["upper"], "Infinity");
        let back: Variable = serde_json::from_value(json).unwrap();
        assert_eq!(back, variable);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let model: Model = serde_json::from_str(
            r#"{"variables": [{"name": "x"}], "linear_constraints": [{"name": "c", "upper": 3}]}"#,
        )
        .unwrap();
        assert_eq!(model.variables[0], Variable::continuous("x", 0.0, f64::INFINITY));
        assert_eq!(model.linear_constraints[0].lower, f64::NEG_INFINITY);
        assert_eq!(model.objective.sense, Sense::Minimize);
    }
}
