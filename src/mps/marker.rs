//! Integer-block tracking for the COLUMNS section.

use crate::error::ParseError;

const MARKER: &str = "'MARKER'";
const INTORG: &str = "'INTORG'";
const INTEND: &str = "'INTEND'";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    IntOrg,
    IntEnd,
}

/// Recognize a `<name> 'MARKER' ... 'INTORG'|'INTEND'` line.
///
/// Returns `None` for ordinary column lines.
pub fn parse_marker(tokens: &[&str], line: usize) -> Option<Result<Marker, ParseError>> {
    if tokens.get(1) != Some(&MARKER) {
        return None;
    }
    let marker = match tokens.last() {
        Some(&INTORG) => Ok(Marker::IntOrg),
        Some(&INTEND) => Ok(Marker::IntEnd),
        _ => Err(ParseError::format(
            line,
            format!("marker line must end with {} or {}", INTORG, INTEND),
        )),
    };
    Some(marker)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerState {
    #[default]
    OutsideIntegerBlock,
    InsideIntegerBlock {
        /// Line of the INTORG marker that opened the block
        opened_at: usize,
    },
}

impl MarkerState {
    pub fn transition(self, marker: Marker, line: usize) -> Result<MarkerState, ParseError> {
        match (self, marker) {
            (MarkerState::OutsideIntegerBlock, Marker::IntOrg) => {
                Ok(MarkerState::InsideIntegerBlock { opened_at: line })
            }
            (MarkerState::InsideIntegerBlock { .. }, Marker::IntEnd) => {
                Ok(MarkerState::OutsideIntegerBlock)
            }
            (MarkerState::InsideIntegerBlock { opened_at }, Marker::IntOrg) => {
                Err(ParseError::UnbalancedMarker {
                    line,
                    message: format!(
                        "INTORG while the integer block opened on line {} is still open",
                        opened_at
                    ),
                })
            }
            (MarkerState::OutsideIntegerBlock, Marker::IntEnd) => Err(ParseError::UnbalancedMarker {
                line,
                message: "INTEND without a matching INTORG".to_string(),
            }),
        }
    }

    /// Column entries scanned in this state are tagged integer.
    pub fn is_integer(self) -> bool {
        matches!(self, MarkerState::InsideIntegerBlock { .. })
    }

    /// Check the state at the end of the COLUMNS section.
    pub fn finish(self) -> Result<(), ParseError> {
        match self {
            MarkerState::OutsideIntegerBlock => Ok(()),
            MarkerState::InsideIntegerBlock { opened_at } => Err(ParseError::UnbalancedMarker {
                line: opened_at,
                message: "INTORG marker is never closed by INTEND".to_string(),
            }),
        }
    }
}
