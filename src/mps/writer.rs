//! Canonical MPS serializer.
//!
//! Output is deterministic: for a given model the same bytes are produced on
//! every call, and re-parsing the text yields a model equal to the input.

use log::debug;
use std::collections::{HashMap, HashSet};

use crate::domain::validate::validate_model;
use crate::error::WriteError;
use crate::model::{LinearConstraint, Model, Sense, Variable};

const GENERATOR: &str = "MPModelProtoExporter";
const OBJECTIVE_ROW: &str = "COST";
const RHS_LABEL: &str = "RHS";
const RANGES_LABEL: &str = "RANGE";
const BOUNDS_LABEL: &str = "BOUND";

/// How many ulps a range may be moved to land exactly on the upper bound
const RANGE_NUDGE_STEPS: usize = 4;

/// Encoding chosen for one constraint row
#[derive(Debug, Clone, Copy, PartialEq)]
enum RowPlan {
    Free,
    Equal(f64),
    Less(f64),
    Greater(f64),
    /// G row at `lower`, read back as `[lower, lower + range]`
    Ranged { lower: f64, range: f64 },
    /// L row at `upper`, read back as `[upper - range, upper]`
    RangedBelow { upper: f64, range: f64 },
}

impl RowPlan {
    fn for_constraint(constraint: &LinearConstraint) -> Result<RowPlan, WriteError> {
        let (lower, upper) = (constraint.lower, constraint.upper);
        let plan = match (lower.is_finite(), upper.is_finite()) {
            _ if lower == upper => RowPlan::Equal(lower),
            (false, false) => RowPlan::Free,
            (false, true) => RowPlan::Less(upper),
            (true, false) => RowPlan::Greater(lower),
            (true, true) => ranged_plan(&constraint.name, lower, upper)?,
        };
        Ok(plan)
    }

    fn kind(self) -> &'static str {
        match self {
            RowPlan::Free => "N",
            RowPlan::Equal(_) => "E",
            RowPlan::Less(_) | RowPlan::RangedBelow { .. } => "L",
            RowPlan::Greater(_) | RowPlan::Ranged { .. } => "G",
        }
    }

    fn rhs(self) -> f64 {
        match self {
            RowPlan::Free => 0.0,
            RowPlan::Equal(v) | RowPlan::Less(v) | RowPlan::Greater(v) => v,
            RowPlan::Ranged { lower, .. } => lower,
            RowPlan::RangedBelow { upper, .. } => upper,
        }
    }

    fn range(self) -> Option<f64> {
        match self {
            RowPlan::Ranged { range, .. } | RowPlan::RangedBelow { range, .. } => Some(range),
            _ => None,
        }
    }
}

/// Pick a range the reader turns back into exactly `[lower, upper]`.
///
/// A G row recomputes `lower + r`, an L row recomputes `upper - r`; the
/// first encoding that lands exactly on the other bound wins.
fn ranged_plan(name: &str, lower: f64, upper: f64) -> Result<RowPlan, WriteError> {
    if let Some(range) = exact_range(upper - lower, |r| lower + r, upper) {
        return Ok(RowPlan::Ranged { lower, range });
    }
    if let Some(range) = exact_range(upper - lower, |r| -(upper - r), -lower) {
        return Ok(RowPlan::RangedBelow { upper, range });
    }
    Err(WriteError::UnrepresentableRange {
        name: name.to_string(),
        lower,
        upper,
    })
}

/// Nudge `range` by ulps until `reach(range) == target`.
///
/// `reach` must be non-decreasing in `range`.
fn exact_range(mut range: f64, reach: impl Fn(f64) -> f64, target: f64) -> Option<f64> {
    for _ in 0..=RANGE_NUDGE_STEPS {
        if !range.is_finite() || range <= 0.0 {
            return None;
        }
        let reached = reach(range);
        if reached == target {
            return Some(range);
        }
        // range is positive and finite, so stepping its bits moves one ulp
        range = if reached < target {
            f64::from_bits(range.to_bits() + 1)
        } else {
            f64::from_bits(range.to_bits() - 1)
        };
    }
    None
}

/// Shortest text that parses back to exactly `value`.
pub fn format_number(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-5..1e15).contains(&magnitude) {
        format!("{}", value)
    } else {
        format!("{:e}", value)
    }
}

/// Serialize `model` to canonical MPS text.
pub fn write(model: &Model) -> Result<String, WriteError> {
    validate_model(model)?;

    let plans = model
        .linear_constraints
        .iter()
        .map(RowPlan::for_constraint)
        .collect::<Result<Vec<_>, _>>()?;
    let objective = objective_row_name(model);

    let mut out = Document::default();
    write_header(&mut out, model);
    out.line(format!("{:<14}{}", "NAME", model.name));
    if model.objective.sense == Sense::Maximize {
        out.line("OBJSENSE".to_string());
        out.line("    MAX".to_string());
    }

    out.line("ROWS".to_string());
    out.line(field_header("N", &objective));
    for (constraint, plan) in model.linear_constraints.iter().zip(&plans) {
        out.line(field_header(plan.kind(), &constraint.name));
    }

    out.line("COLUMNS".to_string());
    write_columns(&mut out, model, &objective);

    let mut rhs: Vec<(&str, f64)> = Vec::new();
    if model.objective.offset != 0.0 {
        rhs.push((objective.as_str(), -model.objective.offset));
    }
    let mut ranges: Vec<(&str, f64)> = Vec::new();
    for (constraint, plan) in model.linear_constraints.iter().zip(&plans) {
        if plan.rhs() != 0.0 {
            rhs.push((constraint.name.as_str(), plan.rhs()));
        }
        if let Some(range) = plan.range() {
            ranges.push((constraint.name.as_str(), range));
        }
    }
    write_pairs(&mut out, "RHS", RHS_LABEL, &rhs);
    write_pairs(&mut out, "RANGES", RANGES_LABEL, &ranges);

    let bounds: Vec<String> = model.variables.iter().flat_map(bound_lines).collect();
    if !bounds.is_empty() {
        out.line("BOUNDS".to_string());
        for line in bounds {
            out.line(line);
        }
    }
    out.line("ENDATA".to_string());

    debug!(
        "wrote MPS model `{}`: {} rows, {} columns, {} ranges",
        model.name,
        plans.len() + 1,
        model.variables.len(),
        ranges.len()
    );
    Ok(out.finish())
}

#[derive(Default)]
struct Document {
    text: String,
}

impl Document {
    fn line(&mut self, line: String) {
        self.text.push_str(line.trim_end());
        self.text.push('\n');
    }

    fn finish(self) -> String {
        self.text
    }
}

fn write_header(out: &mut Document, model: &Model) {
    let binary = model.variables.iter().filter(|v| v.is_binary()).count();
    let integer = model.variables.iter().filter(|v| v.is_integer).count() - binary;
    let continuous = model.variables.len() - binary - integer;

    out.line(format!("* Generated by {}", GENERATOR));
    for (key, value) in [
        ("Name", model.name.clone()),
        ("Format", "Free".to_string()),
        ("Constraints", model.linear_constraints.len().to_string()),
        ("Variables", model.variables.len().to_string()),
    ] {
        out.line(format!("*   {:<17}: {}", key, value));
    }
    for (key, count) in [
        ("Binary", binary),
        ("Integer", integer),
        ("Continuous", continuous),
    ] {
        out.line(format!("*     {:<15}: {}", key, count));
    }
}

/// The objective row is `COST` unless a constraint already owns that name.
fn objective_row_name(model: &Model) -> String {
    let taken: HashSet<&str> = model
        .linear_constraints
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    if !taken.contains(OBJECTIVE_ROW) {
        return OBJECTIVE_ROW.to_string();
    }
    (1..)
        .map(|n| format!("{}_{}", OBJECTIVE_ROW, n))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_else(|| OBJECTIVE_ROW.to_string())
}

fn field_header(kind: &str, name: &str) -> String {
    format!(" {:<2} {:<6}", kind, name)
}

fn field_pair(row: &str, value: f64) -> String {
    format!("  {:<8} {:>5}", row, format_number(value))
}

fn marker_line(name: &str, kind: &str) -> String {
    format!("  {:<9} {:<35} {}", name, "'MARKER'", kind)
}

fn write_pairs(out: &mut Document, section: &str, label: &str, pairs: &[(&str, f64)]) {
    if pairs.is_empty() {
        return;
    }
    out.line(section.to_string());
    for chunk in pairs.chunks(2) {
        let mut line = field_header("", label);
        for (row, value) in chunk {
            line.push_str(&field_pair(row, *value));
        }
        out.line(line);
    }
}

fn write_columns(out: &mut Document, model: &Model, objective: &str) {
    // row entries per variable, in row emission order
    let mut columns: HashMap<&str, Vec<(&str, f64)>> = HashMap::new();
    for (variable, value) in &model.objective.coefficients {
        if *value != 0.0 {
            columns.entry(variable).or_default().push((objective, *value));
        }
    }
    for constraint in &model.linear_constraints {
        for (variable, value) in &constraint.coefficients {
            if *value != 0.0 {
                columns
                    .entry(variable)
                    .or_default()
                    .push((constraint.name.as_str(), *value));
            }
        }
    }

    let mut blocks = 0usize;
    let mut in_block = false;
    for variable in &model.variables {
        if variable.is_integer != in_block {
            let suffix = match blocks {
                0 => String::new(),
                n => n.to_string(),
            };
            if variable.is_integer {
                out.line(marker_line(&format!("INTSTART{}", suffix), "'INTORG'"));
            } else {
                out.line(marker_line(&format!("INTEND{}", suffix), "'INTEND'"));
                blocks += 1;
            }
            in_block = variable.is_integer;
        }

        let entries = columns
            .get(variable.name.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();
        // a column with no entries is still declared, through the objective
        let declared = [(objective, 0.0)];
        let entries = if entries.is_empty() { &declared[..] } else { entries };
        for chunk in entries.chunks(2) {
            let mut line = field_header("", &variable.name);
            for (row, value) in chunk {
                line.push_str(&field_pair(row, *value));
            }
            out.line(line);
        }
    }
    if in_block {
        let suffix = match blocks {
            0 => String::new(),
            n => n.to_string(),
        };
        out.line(marker_line(&format!("INTEND{}", suffix), "'INTEND'"));
    }
}

/// BOUNDS lines reproducing the variable's bounds from the MPS defaults.
fn bound_lines(variable: &Variable) -> Vec<String> {
    let (lower, upper) = (variable.lower, variable.upper);
    let line = |kind: &str, value: Option<f64>| {
        let mut line = field_header(kind, BOUNDS_LABEL);
        match value {
            Some(value) => line.push_str(&field_pair(&variable.name, value)),
            None => line.push_str(&format!("  {}", variable.name)),
        }
        line
    };

    let mut lines = Vec::new();
    if variable.is_integer {
        if variable.is_binary() {
            lines.push(line("BV", None));
            return lines;
        }
        if lower == f64::NEG_INFINITY {
            lines.push(line("MI", None));
        } else if lower != 0.0 {
            lines.push(line("LI", Some(lower)));
        }
        if upper != f64::INFINITY {
            lines.push(line("UI", Some(upper)));
        }
        return lines;
    }

    if lower == upper {
        lines.push(line("FX", Some(lower)));
    } else if lower == f64::NEG_INFINITY && upper == f64::INFINITY {
        lines.push(line("FR", None));
    } else if lower == f64::NEG_INFINITY {
        // a negative UP alone already implies an unbounded lower side
        if upper >= 0.0 {
            lines.push(line("MI", None));
        }
        lines.push(line("UP", Some(upper)));
    } else {
        // an explicit LO keeps a later negative UP from freeing the lower side
        if lower != 0.0 || upper < 0.0 {
            lines.push(line("LO", Some(lower)));
        }
        if upper != f64::INFINITY {
            lines.push(line("UP", Some(upper)));
        }
    }
    lines
}
