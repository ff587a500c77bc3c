//! Section grammars: the streaming first pass that turns classified lines
//! into a flat list of intermediate records.
//!
//! Nothing here looks names up. Referential checks belong to the builder.

use crate::error::ParseError;
use crate::model::Sense;
use crate::mps::bounds::{Arity, BoundKind, RowKind};
use crate::mps::lexer::{scan, LineKind, Section};
use crate::mps::marker::{parse_marker, MarkerState};

#[derive(Debug, Clone, PartialEq)]
pub enum Record<'a> {
    Name(String),
    ObjSense(Sense),
    Row {
        kind: RowKind,
        name: &'a str,
    },
    Column {
        variable: &'a str,
        row: &'a str,
        value: f64,
        integer: bool,
    },
    Rhs {
        row: &'a str,
        value: f64,
    },
    Range {
        row: &'a str,
        value: f64,
    },
    Bound {
        kind: BoundKind,
        variable: &'a str,
        value: Option<f64>,
    },
}

/// A record and the line it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<'a> {
    pub line: usize,
    pub record: Record<'a>,
}

/// Run the first pass over `text`.
pub fn collect(text: &str) -> Result<Vec<Spanned<'_>>, ParseError> {
    let mut records = Vec::new();
    let mut markers = MarkerState::default();
    let mut in_columns = false;

    for line in scan(text) {
        let line = line?;
        let number = line.number;
        match line.kind {
            LineKind::Header { section, args } => {
                if in_columns && section != Section::Columns {
                    markers.finish()?;
                }
                in_columns = section == Section::Columns;
                match section {
                    Section::Name => records.push(Spanned {
                        line: number,
                        record: Record::Name(args.join(" ")),
                    }),
                    Section::ObjSense => {
                        if let Some(sense) = args.first() {
                            if args.len() > 1 {
                                return Err(ParseError::format(number, "OBJSENSE takes one value"));
                            }
                            records.push(Spanned {
                                line: number,
                                record: Record::ObjSense(parse_sense(sense, number)?),
                            });
                        }
                    }
                    _ => {}
                }
            }
            LineKind::Data { section, tokens } => {
                let mut push = |record| records.push(Spanned { line: number, record });
                match section {
                    Section::Columns => {
                        if let Some(marker) = parse_marker(&tokens, number) {
                            markers = markers.transition(marker?, number)?;
                            continue;
                        }
                        parse_columns(&tokens, number, markers.is_integer(), &mut push)?;
                    }
                    Section::Rows => push(parse_row(&tokens, number)?),
                    Section::Rhs => parse_pairs(&tokens, number, "RHS", &mut |row, value| {
                        push(Record::Rhs { row, value })
                    })?,
                    Section::Ranges => parse_pairs(&tokens, number, "RANGES", &mut |row, value| {
                        push(Record::Range { row, value })
                    })?,
                    Section::Bounds => push(parse_bound(&tokens, number)?),
                    Section::ObjSense => match tokens.as_slice() {
                        [sense] => push(Record::ObjSense(parse_sense(sense, number)?)),
                        _ => return Err(ParseError::format(number, "OBJSENSE takes one value")),
                    },
                    Section::Name | Section::Endata => {
                        return Err(ParseError::format(
                            number,
                            format!("unexpected data in {} section", section.keyword()),
                        ));
                    }
                }
            }
        }
    }

    if in_columns {
        markers.finish()?;
    }
    Ok(records)
}

fn parse_sense(token: &str, line: usize) -> Result<Sense, ParseError> {
    match token {
        "MIN" | "MINIMIZE" => Ok(Sense::Minimize),
        "MAX" | "MAXIMIZE" => Ok(Sense::Maximize),
        other => Err(ParseError::format(
            line,
            format!("unknown objective sense `{}`", other),
        )),
    }
}

fn parse_row<'a>(tokens: &[&'a str], line: usize) -> Result<Record<'a>, ParseError> {
    match tokens {
        [kind, name] => {
            let kind = RowKind::from_token(kind).ok_or_else(|| {
                ParseError::format(line, format!("unknown row type `{}`", kind))
            })?;
            Ok(Record::Row { kind, name: *name })
        }
        _ => Err(ParseError::format(line, "ROWS lines need a type and a name")),
    }
}

fn parse_columns<'a>(
    tokens: &[&'a str],
    line: usize,
    integer: bool,
    push: &mut impl FnMut(Record<'a>),
) -> Result<(), ParseError> {
    let (variable, pairs) = match tokens {
        [variable, rest @ ..] if rest.len() == 2 || rest.len() == 4 => (*variable, rest),
        _ => {
            return Err(ParseError::format(
                line,
                "COLUMNS lines need a variable and one or two (row, value) pairs",
            ))
        }
    };
    for pair in pairs.chunks(2) {
        push(Record::Column {
            variable,
            row: pair[0],
            value: parse_number(pair[1], line, Finite::Required)?,
            integer,
        });
    }
    Ok(())
}

/// RHS and RANGES share one grammar; the leading label is optional.
fn parse_pairs<'a>(
    tokens: &[&'a str],
    line: usize,
    section: &str,
    push: &mut impl FnMut(&'a str, f64),
) -> Result<(), ParseError> {
    let pairs = match tokens.len() {
        2 | 4 => tokens,
        3 | 5 => &tokens[1..],
        _ => {
            return Err(ParseError::format(
                line,
                format!("{} lines need one or two (row, value) pairs", section),
            ))
        }
    };
    for pair in pairs.chunks(2) {
        push(pair[0], parse_number(pair[1], line, Finite::Required)?);
    }
    Ok(())
}

fn parse_bound<'a>(tokens: &[&'a str], line: usize) -> Result<Record<'a>, ParseError> {
    let (kind_token, rest) = match tokens {
        [kind, rest @ ..] => (*kind, rest),
        [] => return Err(ParseError::format(line, "empty BOUNDS line")),
    };
    if kind_token == "SC" {
        return Err(ParseError::UnsupportedFeature {
            line,
            feature: "semi-continuous bound (SC)".to_string(),
        });
    }
    let kind = BoundKind::from_token(kind_token)
        .ok_or_else(|| ParseError::format(line, format!("unknown bound type `{}`", kind_token)))?;

    let (variable, value) = match (kind.arity(), rest) {
        (Arity::Required, [_, variable, value] | [variable, value]) => {
            (*variable, Some(parse_number(value, line, Finite::Optional)?))
        }
        (Arity::Required, _) => {
            return Err(ParseError::format(
                line,
                format!("bound type {} needs a variable and a value", kind.token()),
            ))
        }
        (Arity::Absent, [_, variable] | [variable]) => (*variable, None),
        (Arity::Optional, [_, variable] | [variable]) => (*variable, None),
        (Arity::Optional, [_, variable, value]) => {
            parse_number(value, line, Finite::Optional)?;
            (*variable, None)
        }
        (_, _) => {
            return Err(ParseError::format(
                line,
                format!("malformed {} bound", kind.token()),
            ))
        }
    };
    Ok(Record::Bound {
        kind,
        variable,
        value,
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Finite {
    Required,
    Optional,
}

fn parse_number(token: &str, line: usize, finite: Finite) -> Result<f64, ParseError> {
    let invalid = || ParseError::NumericFormat {
        line,
        token: token.to_string(),
    };
    let value: f64 = token.parse().map_err(|_| invalid())?;
    if value.is_nan() || (finite == Finite::Required && value.is_infinite()) {
        return Err(invalid());
    }
    Ok(value)
}
