use crate::error::{MpsApiError, Result};
use crate::types::{LinearConstraint, Model, Objective, Sense, Variable};
use std::collections::HashSet;

/// Builder for creating models
///
/// # Example
///
/// ```
/// use mps_api_sdk::{LinearConstraint, ModelBuilder, Variable};
///
/// let model = ModelBuilder::new("demo")
///     .add_variable(Variable::integer("x", 0.0, 10.0))
///     .add_variable(Variable::continuous("y", 0.0, f64::INFINITY))
///     .add_constraint(
///         LinearConstraint::new("cap", f64::NEG_INFINITY, 100.0)
///             .with_term("x", 2.0)
///             .with_term("y", 3.0),
///     )
///     .maximize([("x", 1.0), ("y", 2.0)])
///     .build()
///     .unwrap();
/// assert_eq!(model.variables.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ModelBuilder {
    name: String,
    variables: Vec<Variable>,
    constraints: Vec<LinearConstraint>,
    objective: Objective,
}

impl ModelBuilder {
    /// Create a new builder for a model with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a variable
    pub fn add_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    /// Add multiple variables
    pub fn add_variables(mut self, variables: impl IntoIterator<Item = Variable>) -> Self {
        self.variables.extend(variables);
        self
    }

    /// Add a linear constraint
    pub fn add_constraint(mut self, constraint: LinearConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Minimize the given terms
    pub fn minimize<S: Into<String>>(self, terms: impl IntoIterator<Item = (S, f64)>) -> Self {
        self.objective(Sense::Minimize, terms)
    }

    /// Maximize the given terms
    pub fn maximize<S: Into<String>>(self, terms: impl IntoIterator<Item = (S, f64)>) -> Self {
        self.objective(Sense::Maximize, terms)
    }

    /// Set the constant term of the objective
    pub fn offset(mut self, offset: f64) -> Self {
        self.objective.offset = offset;
        self
    }

    fn objective<S: Into<String>>(
        mut self,
        sense: Sense,
        terms: impl IntoIterator<Item = (S, f64)>,
    ) -> Self {
        self.objective.sense = sense;
        self.objective.coefficients = terms
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .filter(|(_, value)| *value != 0.0)
            .collect();
        self
    }

    /// Build the model
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a variable or constraint name is empty or contains whitespace
    /// - two variables or two constraints share a name
    /// - a coefficient refers to an undeclared variable
    pub fn build(self) -> Result<Model> {
        let mut variable_names = HashSet::new();
        for variable in &self.variables {
            check_name("variable", &variable.name)?;
            if !variable_names.insert(variable.name.as_str()) {
                return Err(MpsApiError::InvalidModel(format!(
                    "duplicate variable `{}`",
                    variable.name
                )));
            }
        }

        let mut constraint_names = HashSet::new();
        for constraint in &self.constraints {
            check_name("constraint", &constraint.name)?;
            if !constraint_names.insert(constraint.name.as_str()) {
                return Err(MpsApiError::InvalidModel(format!(
                    "duplicate constraint `{}`",
                    constraint.name
                )));
            }
            check_terms(&constraint.name, constraint.coefficients.keys(), &variable_names)?;
        }
        check_terms("objective", self.objective.coefficients.keys(), &variable_names)?;

        Ok(Model {
            name: self.name,
            variables: self.variables,
            linear_constraints: self.constraints,
            objective: self.objective,
        })
    }
}

fn check_name(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(MpsApiError::InvalidModel(format!(
            "invalid {} name `{}`",
            kind, name
        )));
    }
    Ok(())
}

fn check_terms<'a>(
    owner: &str,
    names: impl Iterator<Item = &'a String>,
    known: &HashSet<&str>,
) -> Result<()> {
    for name in names {
        if !known.contains(name.as_str()) {
            return Err(MpsApiError::InvalidModel(format!(
                "{} refers to unknown variable `{}`",
                owner, name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_basic() {
        let model = ModelBuilder::new("basic")
            .add_variables([Variable::binary("a"), Variable::binary("b")])
            .add_constraint(
                LinearConstraint::new("pick_one", 1.0, 1.0)
                    .with_term("a", 1.0)
                    .with_term("b", 1.0),
            )
            .minimize([("a", 3.0), ("b", 0.0)])
            .offset(2.0)
            .build()
            .unwrap();

        assert_eq!(model.name, "basic");
        assert_eq!(model.linear_constraints.len(), 1);
        assert_eq!(model.objective.sense, Sense::Minimize);
        assert_eq!(model.objective.offset, 2.0);
        assert!(!model.objective.coefficients.contains_key("b"));
    }

    #[test]
    fn test_builder_duplicate_variable() {
        let result = ModelBuilder::new("dup")
            .add_variable(Variable::binary("x"))
            .add_variable(Variable::binary("x"))
            .build();
        assert!(matches!(result, Err(MpsApiError::InvalidModel(_))));
    }

    #[test]
    fn test_builder_unknown_variable() {
        let result = ModelBuilder::new("ghost")
            .add_variable(Variable::binary("x"))
            .maximize([("y", 1.0)])
            .build();
        assert!(matches!(result, Err(MpsApiError::InvalidModel(_))));
    }

    #[test]
    fn test_builder_invalid_name() {
        let result = ModelBuilder::new("spaces")
            .add_variable(Variable::binary("x y"))
            .build();
        assert!(matches!(result, Err(MpsApiError::InvalidModel(_))));
    }
}
