//! Line scanner for free-format MPS text.
//!
//! Drops comments and blank lines, recognizes section headers and splits
//! data lines on whitespace runs. Section ordering is enforced here so the
//! section parsers only ever see lines in a well-formed sequence.

use crate::error::ParseError;

/// MPS sections in the order they must appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Section {
    Name,
    ObjSense,
    Rows,
    Columns,
    Rhs,
    Ranges,
    Bounds,
    Endata,
}

const SECTIONS: [(&str, Section); 8] = [
    ("NAME", Section::Name),
    ("OBJSENSE", Section::ObjSense),
    ("ROWS", Section::Rows),
    ("COLUMNS", Section::Columns),
    ("RHS", Section::Rhs),
    ("RANGES", Section::Ranges),
    ("BOUNDS", Section::Bounds),
    ("ENDATA", Section::Endata),
];

/// Section keywords of MPS dialects that carry constructs the model lacks.
const UNSUPPORTED_SECTIONS: [&str; 16] = [
    "QUADOBJ",
    "QMATRIX",
    "QSECTION",
    "QCMATRIX",
    "CSECTION",
    "SOS",
    "SETS",
    "INDICATORS",
    "GENCONS",
    "PWLOBJ",
    "PWLNAM",
    "PWLCON",
    "OBJNAME",
    "LAZYCONS",
    "USERCUTS",
    "BRANCH",
];

impl Section {
    pub fn from_keyword(token: &str) -> Option<Section> {
        SECTIONS
            .iter()
            .find(|(keyword, _)| *keyword == token)
            .map(|(_, section)| *section)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Section::Name => "NAME",
            Section::ObjSense => "OBJSENSE",
            Section::Rows => "ROWS",
            Section::Columns => "COLUMNS",
            Section::Rhs => "RHS",
            Section::Ranges => "RANGES",
            Section::Bounds => "BOUNDS",
            Section::Endata => "ENDATA",
        }
    }

    /// Whether a header for this section may carry trailing tokens.
    fn takes_arguments(self) -> bool {
        matches!(self, Section::Name | Section::ObjSense)
    }
}

/// A classified, non-comment line
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind<'a> {
    Header { section: Section, args: Vec<&'a str> },
    Data { section: Section, tokens: Vec<&'a str> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line<'a> {
    /// 1-based line number in the input
    pub number: usize,
    pub kind: LineKind<'a>,
}

/// Iterator over the classified lines of an MPS document.
///
/// Yields at most one error, after which it is exhausted.
pub struct Scanner<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    current: Option<Section>,
    failed: bool,
}

pub fn scan(text: &str) -> Scanner<'_> {
    Scanner {
        lines: text.lines().enumerate(),
        current: None,
        failed: false,
    }
}

impl<'a> Scanner<'a> {
    fn classify(&mut self, number: usize, raw: &'a str) -> Result<Option<Line<'a>>, ParseError> {
        if raw.starts_with('*') || raw.trim().is_empty() {
            return Ok(None);
        }
        if self.current == Some(Section::Endata) {
            return Err(ParseError::format(number, "data after ENDATA"));
        }

        let mut tokens = raw.split_whitespace();
        let indented = raw.starts_with(char::is_whitespace);

        if indented {
            let section = self.current.ok_or_else(|| {
                ParseError::format(number, "data line before any section header")
            })?;
            return Ok(Some(Line {
                number,
                kind: LineKind::Data {
                    section,
                    tokens: tokens.collect(),
                },
            }));
        }

        // unindented and non-blank, so a first token exists
        let keyword = tokens.next().unwrap_or_default();
        let section = match Section::from_keyword(keyword) {
            Some(section) => section,
            None if UNSUPPORTED_SECTIONS.contains(&keyword) => {
                return Err(ParseError::UnsupportedFeature {
                    line: number,
                    feature: format!("{} section", keyword),
                });
            }
            None => {
                return Err(ParseError::format(
                    number,
                    format!("unrecognized section header `{}`", keyword),
                ));
            }
        };

        if let Some(previous) = self.current {
            if section <= previous {
                return Err(ParseError::format(
                    number,
                    format!(
                        "section {} cannot follow {}",
                        section.keyword(),
                        previous.keyword()
                    ),
                ));
            }
        }

        let args: Vec<&'a str> = tokens.collect();
        if !args.is_empty() && !section.takes_arguments() {
            return Err(ParseError::format(
                number,
                format!("unexpected tokens after {}", section.keyword()),
            ));
        }

        self.current = Some(section);
        Ok(Some(Line {
            number,
            kind: LineKind::Header { section, args },
        }))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Line<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        while let Some((index, raw)) = self.lines.next() {
            match self.classify(index + 1, raw) {
                Ok(Some(line)) => return Some(Ok(line)),
                Ok(None) => continue,
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
        None
    }
}
