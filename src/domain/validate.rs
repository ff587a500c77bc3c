use std::collections::HashSet;

use crate::error::WriteError;
use crate::model::{Coefficients, Model};

/// Check that a model can be written as MPS text.
///
/// Runs before any output is produced, so a failing model never yields a
/// partial document.
pub fn validate_model(model: &Model) -> Result<(), WriteError> {
    if let Some(reason) = model_name_problem(&model.name) {
        return Err(WriteError::InvalidName {
            entity: "model",
            name: model.name.clone(),
            reason,
        });
    }

    let mut variable_names: HashSet<&str> = HashSet::with_capacity(model.variables.len());
    for variable in &model.variables {
        check_name("variable", &variable.name)?;
        if !variable_names.insert(variable.name.as_str()) {
            return Err(WriteError::DuplicateName {
                entity: "variable",
                name: variable.name.clone(),
            });
        }
        check_bounds("variable", &variable.name, variable.lower, variable.upper)?;
    }

    let mut constraint_names: HashSet<&str> = HashSet::with_capacity(model.linear_constraints.len());
    for constraint in &model.linear_constraints {
        check_name("constraint", &constraint.name)?;
        if !constraint_names.insert(constraint.name.as_str()) {
            return Err(WriteError::DuplicateName {
                entity: "constraint",
                name: constraint.name.clone(),
            });
        }
        check_bounds("constraint", &constraint.name, constraint.lower, constraint.upper)?;
        // a row interval must be non-empty to be written as a RANGES entry
        if constraint.lower > constraint.upper {
            return Err(WriteError::UnrepresentableBound {
                entity: "constraint",
                name: constraint.name.clone(),
                lower: constraint.lower,
                upper: constraint.upper,
            });
        }
        check_coefficients(
            &format!("constraint `{}`", constraint.name),
            &constraint.coefficients,
            &variable_names,
        )?;
    }

    check_coefficients("objective", &model.objective.coefficients, &variable_names)?;
    if !model.objective.offset.is_finite() {
        return Err(WriteError::NonFiniteValue {
            context: "objective offset".to_string(),
            value: model.objective.offset,
        });
    }

    Ok(())
}

/// Reason a row or column name cannot appear in MPS text, if any.
pub fn name_problem(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return Some("name is empty");
    }
    if name.chars().any(char::is_whitespace) {
        return Some("name contains whitespace");
    }
    if name.chars().any(char::is_control) {
        return Some("name contains control characters");
    }
    if name.contains('\'') {
        return Some("name contains a quote");
    }
    None
}

fn model_name_problem(name: &str) -> Option<&'static str> {
    if name.chars().any(char::is_whitespace) {
        return Some("name contains whitespace");
    }
    if name.chars().any(char::is_control) {
        return Some("name contains control characters");
    }
    None
}

fn check_name(entity: &'static str, name: &str) -> Result<(), WriteError> {
    match name_problem(name) {
        Some(reason) => Err(WriteError::InvalidName {
            entity,
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

fn check_bounds(entity: &'static str, name: &str, lower: f64, upper: f64) -> Result<(), WriteError> {
    if lower.is_nan() || upper.is_nan() || lower == f64::INFINITY || upper == f64::NEG_INFINITY {
        return Err(WriteError::UnrepresentableBound {
            entity,
            name: name.to_string(),
            lower,
            upper,
        });
    }
    Ok(())
}

fn check_coefficients(
    context: &str,
    coefficients: &Coefficients,
    variables: &HashSet<&str>,
) -> Result<(), WriteError> {
    for (variable, value) in coefficients {
        if !variables.contains(variable.as_str()) {
            return Err(WriteError::UnknownVariable {
                context: context.to_string(),
                name: variable.clone(),
            });
        }
        if !value.is_finite() {
            return Err(WriteError::NonFiniteValue {
                context: format!("{} coefficient of `{}`", context, variable),
                value: *value,
            });
        }
    }
    Ok(())
}
