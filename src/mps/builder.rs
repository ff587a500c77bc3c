//! Second pass: resolve intermediate records into a [`Model`].
//!
//! Records are walked once in file order. Names are resolved through index
//! maps into local drafts; the model itself is only assembled after the last
//! record has been accepted, so a failure never exposes a partial model.

use log::{debug, warn};
use std::collections::{HashMap, HashSet};

use crate::error::{ParseError, Referent};
use crate::model::{
    set_coefficient, Coefficients, LinearConstraint, Model, Objective, Sense, Variable,
};
use crate::mps::bounds::{Applied, RowKind, VariableBounds};
use crate::mps::records::{Record, Spanned};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RowTarget {
    Objective,
    Constraint(usize),
}

#[derive(Debug, Clone, Copy)]
struct RowSlot {
    kind: RowKind,
    target: RowTarget,
}

struct ConstraintDraft<'a> {
    name: &'a str,
    kind: RowKind,
    coefficients: Coefficients,
    rhs: f64,
    range: Option<f64>,
}

impl ConstraintDraft<'_> {
    fn finish(self) -> LinearConstraint {
        let (lower, upper) = match self.range {
            Some(range) => self
                .kind
                .ranged_bounds(self.rhs, range)
                .unwrap_or_else(|| self.kind.bounds(self.rhs)),
            None => self.kind.bounds(self.rhs),
        };
        LinearConstraint {
            name: self.name.to_string(),
            lower,
            upper,
            coefficients: self.coefficients,
        }
    }
}

struct VariableDraft<'a> {
    name: &'a str,
    bounds: VariableBounds,
}

#[derive(Default)]
struct Resolver<'a> {
    name: String,
    sense: Sense,
    offset: f64,
    objective: Coefficients,
    rows: HashMap<&'a str, RowSlot>,
    has_objective: bool,
    constraints: Vec<ConstraintDraft<'a>>,
    variables: Vec<VariableDraft<'a>>,
    variable_index: HashMap<&'a str, usize>,
    entries: HashSet<(&'a str, &'a str)>,
    rhs_rows: HashSet<&'a str>,
    range_rows: HashSet<&'a str>,
}

/// Resolve the records produced by [`collect`](crate::mps::records::collect).
pub fn build(records: Vec<Spanned<'_>>) -> Result<Model, ParseError> {
    let mut resolver = Resolver::default();
    for Spanned { line, record } in records {
        resolver.apply(line, record)?;
    }
    Ok(resolver.finish())
}

impl<'a> Resolver<'a> {
    fn apply(&mut self, line: usize, record: Record<'a>) -> Result<(), ParseError> {
        match record {
            Record::Name(name) => self.name = name,
            Record::ObjSense(sense) => self.sense = sense,
            Record::Row { kind, name } => self.declare_row(line, kind, name)?,
            Record::Column {
                variable,
                row,
                value,
                integer,
            } => self.add_entry(line, variable, row, value, integer)?,
            Record::Rhs { row, value } => {
                let slot = self.row(line, row)?;
                if !self.rhs_rows.insert(row) {
                    return Err(ParseError::format(line, format!("duplicate RHS for row `{}`", row)));
                }
                match slot.target {
                    RowTarget::Objective => self.offset = -value,
                    // free rows carry no right-hand side
                    RowTarget::Constraint(_) if slot.kind == RowKind::N => {}
                    RowTarget::Constraint(index) => self.constraints[index].rhs = value,
                }
            }
            Record::Range { row, value } => {
                let slot = self.row(line, row)?;
                if slot.kind == RowKind::N {
                    return Err(ParseError::format(
                        line,
                        format!("RANGES entry on N row `{}`", row),
                    ));
                }
                if !self.range_rows.insert(row) {
                    return Err(ParseError::format(line, format!("duplicate RANGES for row `{}`", row)));
                }
                if let RowTarget::Constraint(index) = slot.target {
                    self.constraints[index].range = Some(value);
                }
            }
            Record::Bound {
                kind,
                variable,
                value,
            } => {
                let index = *self.variable_index.get(variable).ok_or_else(|| {
                    ParseError::Referential {
                        line,
                        referent: Referent::Variable,
                        name: variable.to_string(),
                    }
                })?;
                let draft = &mut self.variables[index];
                if draft.bounds.apply(kind, value.unwrap_or_default()) == Applied::ImplicitNegativeLower {
                    warn!(
                        "line {}: negative upper bound on `{}` without a lower bound; lower bound set to -infinity",
                        line, variable
                    );
                }
                let bounds = draft.bounds;
                if bounds.lower == f64::INFINITY || bounds.upper == f64::NEG_INFINITY {
                    return Err(ParseError::format(
                        line,
                        format!(
                            "{} bound gives `{}` the unwritable interval [{}, {}]",
                            kind.token(),
                            variable,
                            bounds.lower,
                            bounds.upper
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    fn declare_row(&mut self, line: usize, kind: RowKind, name: &'a str) -> Result<(), ParseError> {
        if self.rows.contains_key(name) {
            return Err(ParseError::format(line, format!("duplicate row `{}`", name)));
        }
        let target = if kind == RowKind::N && !self.has_objective {
            self.has_objective = true;
            RowTarget::Objective
        } else {
            self.constraints.push(ConstraintDraft {
                name,
                kind,
                coefficients: Coefficients::new(),
                rhs: 0.0,
                range: None,
            });
            RowTarget::Constraint(self.constraints.len() - 1)
        };
        self.rows.insert(name, RowSlot { kind, target });
        Ok(())
    }

    fn add_entry(
        &mut self,
        line: usize,
        variable: &'a str,
        row: &'a str,
        value: f64,
        integer: bool,
    ) -> Result<(), ParseError> {
        let slot = self.row(line, row)?;

        match self.variable_index.get(variable) {
            Some(&index) => self.variables[index].bounds.is_integer |= integer,
            None => {
                self.variable_index.insert(variable, self.variables.len());
                self.variables.push(VariableDraft {
                    name: variable,
                    bounds: VariableBounds::new(integer),
                });
            }
        }

        if !self.entries.insert((variable, row)) {
            return Err(ParseError::format(
                line,
                format!("duplicate coefficient for `{}` in row `{}`", variable, row),
            ));
        }
        let coefficients = match slot.target {
            RowTarget::Objective => &mut self.objective,
            RowTarget::Constraint(index) => &mut self.constraints[index].coefficients,
        };
        set_coefficient(coefficients, variable.to_string(), value);
        Ok(())
    }

    fn row(&self, line: usize, name: &str) -> Result<RowSlot, ParseError> {
        self.rows
            .get(name)
            .copied()
            .ok_or_else(|| ParseError::Referential {
                line,
                referent: Referent::Row,
                name: name.to_string(),
            })
    }

    fn finish(self) -> Model {
        let variables: Vec<Variable> = self
            .variables
            .into_iter()
            .map(|draft| Variable {
                name: draft.name.to_string(),
                lower: draft.bounds.lower,
                upper: draft.bounds.upper,
                is_integer: draft.bounds.is_integer,
            })
            .collect();
        let linear_constraints: Vec<LinearConstraint> = self
            .constraints
            .into_iter()
            .map(ConstraintDraft::finish)
            .collect();

        debug!(
            "resolved MPS model `{}`: {} variables ({} integer), {} constraints",
            self.name,
            variables.len(),
            variables.iter().filter(|v| v.is_integer).count(),
            linear_constraints.len()
        );

        Model {
            name: self.name,
            variables,
            linear_constraints,
            objective: Objective {
                sense: self.sense,
                offset: self.offset,
                coefficients: self.objective,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mps::records::collect;

    fn parse(text: &str) -> Result<Model, ParseError> {
        build(collect(text)?)
    }

    const INF: f64 = f64::INFINITY;

    #[test]
    fn test_first_n_row_is_objective_later_ones_are_free() {
        let model = parse(
            "ROWS\n N obj\n N spare\n L c\nCOLUMNS\n x obj 2 spare 5\n x c 1\nRHS\n RHS obj 3 spare 9\n",
        )
        .unwrap();
        assert_eq!(model.objective.coefficients.get("x"), Some(&2.0));
        assert_eq!(model.objective.offset, -3.0);
        assert_eq!(model.linear_constraints.len(), 2);
        let spare = model.constraint("spare").unwrap();
        assert_eq!((spare.lower, spare.upper), (-INF, INF));
        assert_eq!(spare.coefficients.get("x"), Some(&5.0));
        let c = model.constraint("c").unwrap();
        assert_eq!((c.lower, c.upper), (-INF, 0.0));
    }

    #[test]
    fn test_ranges_narrow_rows() {
        let model = parse(
            "ROWS\n N obj\n L l\n G g\n E e1\n E e2\nCOLUMNS\n x l 1 g 1\n x e1 1 e2 1\nRHS\n RHS l 10 g 10\n RHS e1 10 e2 10\nRANGES\n RNG l 4 g -4\n RNG e1 4 e2 -4\n",
        )
        .unwrap();
        let bounds: Vec<_> = model
            .linear_constraints
            .iter()
            .map(|c| (c.lower, c.upper))
            .collect();
        assert_eq!(bounds, vec![(6.0, 10.0), (10.0, 14.0), (10.0, 14.0), (6.0, 10.0)]);
    }

    #[test]
    fn test_range_on_n_row_is_a_format_error() {
        let err = parse("ROWS\n N obj\n L c\nCOLUMNS\n x c 1\nRANGES\n RNG obj 4\n").unwrap_err();
        assert!(matches!(err, ParseError::Format { line: 7, .. }));
    }

    #[test]
    fn test_unknown_row_in_columns() {
        let err = parse("ROWS\n N obj\nCOLUMNS\n x nope 1\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::Referential {
                line: 4,
                referent: Referent::Row,
                name: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_variable_in_bounds() {
        let err = parse("ROWS\n N obj\nCOLUMNS\n x obj 1\nBOUNDS\n UP BND y 4\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Referential { line: 6, referent: Referent::Variable, .. }
        ));
    }

    #[test]
    fn test_duplicate_rows_and_entries() {
        assert!(matches!(
            parse("ROWS\n N obj\n L obj\n"),
            Err(ParseError::Format { line: 3, .. })
        ));
        assert!(matches!(
            parse("ROWS\n N obj\nCOLUMNS\n x obj 1\n x obj 2\n"),
            Err(ParseError::Format { line: 5, .. })
        ));
        assert!(matches!(
            parse("ROWS\n N obj\n L c\nCOLUMNS\n x c 1\nRHS\n RHS c 1\n RHS c 2\n"),
            Err(ParseError::Format { line: 8, .. })
        ));
    }

    #[test]
    fn test_integer_flag_is_or_of_tags() {
        let model = parse(
            "ROWS\n N obj\n L c\nCOLUMNS\n x obj 1\n M 'MARKER' 'INTORG'\n x c 1\n M 'MARKER' 'INTEND'\n y c 1\n",
        )
        .unwrap();
        assert!(model.variable("x").unwrap().is_integer);
        assert!(!model.variable("y").unwrap().is_integer);
        assert_eq!(model.variables[0].name, "x");
    }

    #[test]
    fn test_zero_coefficient_declares_column() {
        let model = parse("ROWS\n N obj\nCOLUMNS\n x obj 0\n").unwrap();
        assert_eq!(model.num_variables(), 1);
        assert!(model.objective.coefficients.is_empty());
    }

    #[test]
    fn test_bounds_fold_in_file_order() {
        let model = parse(
            "ROWS\n N obj\nCOLUMNS\n x obj 1\n y obj 1\n z obj 1\nBOUNDS\n UP BND x -3\n LO BND y -2\n UP BND y -1\n UP BND z 4\n MI BND z\n",
        )
        .unwrap();
        let bounds: Vec<_> = model.variables.iter().map(|v| (v.lower, v.upper)).collect();
        assert_eq!(bounds, vec![(-INF, -3.0), (-2.0, -1.0), (-INF, 4.0)]);
    }

    #[test]
    fn test_bound_with_unwritable_interval_is_rejected() {
        for (bound, line) in [(" LO BND x inf\n", 6), (" UP BND x -inf\n", 6), (" LO BND x 1\n UP BND x -Infinity\n", 7)] {
            let text = format!("ROWS\n N obj\nCOLUMNS\n x obj 1\nBOUNDS\n{}", bound);
            let err = parse(&text).unwrap_err();
            assert!(
                matches!(err, ParseError::Format { line: l, .. } if l == line),
                "{:?}",
                err
            );
        }
        let model = parse("ROWS\n N obj\nCOLUMNS\n x obj 1\nBOUNDS\n UP BND x inf\n LO BND x -inf\n").unwrap();
        assert_eq!(model.variables[0].lower, -INF);
        assert_eq!(model.variables[0].upper, INF);
    }

    #[test]
    fn test_many_n_rows_only_first_is_objective() {
        let mut text = String::from("ROWS\n");
        for i in 0..50 {
            text.push_str(&format!(" N r{}\n", i));
        }
        let model = parse(&text).unwrap();
        assert_eq!(model.linear_constraints.len(), 49);
        assert_eq!(model.linear_constraints[0].name, "r1");
    }
}
