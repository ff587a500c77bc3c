//! Bound and range resolution.
//!
//! Pure functions that turn BOUNDS records into variable bounds and
//! row types, RHS values and RANGES values into constraint intervals. Both
//! rule sets are exhaustive matches keyed by kind.

/// Row type declared in the ROWS section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Objective, or a free row after the first one
    N,
    L,
    G,
    E,
}

const ROW_KINDS: [(&str, RowKind); 4] = [
    ("N", RowKind::N),
    ("L", RowKind::L),
    ("G", RowKind::G),
    ("E", RowKind::E),
];

impl RowKind {
    pub fn from_token(token: &str) -> Option<RowKind> {
        ROW_KINDS
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, kind)| *kind)
    }

    pub fn token(self) -> &'static str {
        match self {
            RowKind::N => "N",
            RowKind::L => "L",
            RowKind::G => "G",
            RowKind::E => "E",
        }
    }

    /// Constraint interval implied by the row type and its RHS.
    pub fn bounds(self, rhs: f64) -> (f64, f64) {
        match self {
            RowKind::N => (f64::NEG_INFINITY, f64::INFINITY),
            RowKind::L => (f64::NEG_INFINITY, rhs),
            RowKind::G => (rhs, f64::INFINITY),
            RowKind::E => (rhs, rhs),
        }
    }

    /// Interval after a RANGES entry; `None` for N rows, which take no range.
    pub fn ranged_bounds(self, rhs: f64, range: f64) -> Option<(f64, f64)> {
        match self {
            RowKind::N => None,
            RowKind::L => Some((rhs - range.abs(), rhs)),
            RowKind::G => Some((rhs, rhs + range.abs())),
            RowKind::E if range >= 0.0 => Some((rhs, rhs + range)),
            RowKind::E => Some((rhs + range, rhs)),
        }
    }
}

/// Bound type from the BOUNDS section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    Up,
    Lo,
    Fx,
    Fr,
    Mi,
    Pl,
    Bv,
    Li,
    Ui,
}

/// How many value tokens a bound record carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Required,
    Optional,
    Absent,
}

const BOUND_KINDS: [(&str, BoundKind); 9] = [
    ("UP", BoundKind::Up),
    ("LO", BoundKind::Lo),
    ("FX", BoundKind::Fx),
    ("FR", BoundKind::Fr),
    ("MI", BoundKind::Mi),
    ("PL", BoundKind::Pl),
    ("BV", BoundKind::Bv),
    ("LI", BoundKind::Li),
    ("UI", BoundKind::Ui),
];

impl BoundKind {
    pub fn from_token(token: &str) -> Option<BoundKind> {
        BOUND_KINDS
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, kind)| *kind)
    }

    pub fn token(self) -> &'static str {
        match self {
            BoundKind::Up => "UP",
            BoundKind::Lo => "LO",
            BoundKind::Fx => "FX",
            BoundKind::Fr => "FR",
            BoundKind::Mi => "MI",
            BoundKind::Pl => "PL",
            BoundKind::Bv => "BV",
            BoundKind::Li => "LI",
            BoundKind::Ui => "UI",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            BoundKind::Up | BoundKind::Lo | BoundKind::Fx | BoundKind::Li | BoundKind::Ui => {
                Arity::Required
            }
            BoundKind::Bv => Arity::Optional,
            BoundKind::Fr | BoundKind::Mi | BoundKind::Pl => Arity::Absent,
        }
    }
}

/// Bounds of one variable while BOUNDS records are folded over it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableBounds {
    pub lower: f64,
    pub upper: f64,
    pub is_integer: bool,
    explicit_lower: bool,
}

/// Outcome of applying one bound record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Plain,
    /// A negative UP on a continuous variable also moved the lower bound to −∞
    ImplicitNegativeLower,
}

impl VariableBounds {
    /// MPS defaults: [0, +∞), integrality from the COLUMNS markers.
    pub fn new(is_integer: bool) -> Self {
        Self {
            lower: 0.0,
            upper: f64::INFINITY,
            is_integer,
            explicit_lower: false,
        }
    }

    /// Apply one record. `value` is ignored by kinds that carry none.
    pub fn apply(&mut self, kind: BoundKind, value: f64) -> Applied {
        let mut applied = Applied::Plain;
        match kind {
            BoundKind::Up => {
                self.upper = value;
                if value < 0.0 && !self.explicit_lower && !self.is_integer {
                    self.lower = f64::NEG_INFINITY;
                    applied = Applied::ImplicitNegativeLower;
                }
            }
            BoundKind::Lo => {
                self.lower = value;
                self.explicit_lower = true;
            }
            BoundKind::Fx => {
                self.lower = value;
                self.upper = value;
                self.explicit_lower = true;
            }
            BoundKind::Fr => {
                self.lower = f64::NEG_INFINITY;
                self.upper = f64::INFINITY;
                self.explicit_lower = true;
            }
            BoundKind::Mi => {
                self.lower = f64::NEG_INFINITY;
                self.explicit_lower = true;
            }
            BoundKind::Pl => {
                self.upper = f64::INFINITY;
            }
            BoundKind::Bv => {
                self.lower = 0.0;
                self.upper = 1.0;
                self.is_integer = true;
                self.explicit_lower = true;
            }
            BoundKind::Li => {
                self.lower = value;
                self.is_integer = true;
                self.explicit_lower = true;
            }
            BoundKind::Ui => {
                self.upper = value;
                self.is_integer = true;
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INF: f64 = f64::INFINITY;

    #[test]
    fn test_row_bounds_before_ranges() {
        assert_eq!(RowKind::L.bounds(4.0), (-INF, 4.0));
        assert_eq!(RowKind::G.bounds(4.0), (4.0, INF));
        assert_eq!(RowKind::E.bounds(4.0), (4.0, 4.0));
        assert_eq!(RowKind::N.bounds(4.0), (-INF, INF));
    }

    #[test]
    fn test_range_sign_rules() {
        assert_eq!(RowKind::L.ranged_bounds(10.0, -3.0), Some((7.0, 10.0)));
        assert_eq!(RowKind::L.ranged_bounds(10.0, 3.0), Some((7.0, 10.0)));
        assert_eq!(RowKind::G.ranged_bounds(10.0, -3.0), Some((10.0, 13.0)));
        assert_eq!(RowKind::E.ranged_bounds(10.0, 3.0), Some((10.0, 13.0)));
        assert_eq!(RowKind::E.ranged_bounds(10.0, -3.0), Some((7.0, 10.0)));
        assert_eq!(RowKind::N.ranged_bounds(10.0, 3.0), None);
    }

    #[test]
    fn test_token_tables_cover_every_kind() {
        for token in ["UP", "LO", "FX", "FR", "MI", "PL", "BV", "LI", "UI"] {
            let kind = BoundKind::from_token(token).unwrap();
            assert_eq!(kind.token(), token);
        }
        assert_eq!(BoundKind::from_token("SC"), None);
        assert_eq!(RowKind::from_token("X"), None);
    }

    #[test]
    fn test_negative_upper_frees_continuous_lower() {
        let mut b = VariableBounds::new(false);
        assert_eq!(b.apply(BoundKind::Up, -2.0), Applied::ImplicitNegativeLower);
        assert_eq!((b.lower, b.upper), (-INF, -2.0));
    }

    #[test]
    fn test_negative_upper_keeps_explicit_lower() {
        let mut b = VariableBounds::new(false);
        b.apply(BoundKind::Lo, -5.0);
        assert_eq!(b.apply(BoundKind::Up, -2.0), Applied::Plain);
        assert_eq!((b.lower, b.upper), (-5.0, -2.0));
    }

    #[test]
    fn test_negative_upper_on_integer_keeps_lower() {
        let mut b = VariableBounds::new(true);
        assert_eq!(b.apply(BoundKind::Up, -2.0), Applied::Plain);
        assert_eq!((b.lower, b.upper), (0.0, -2.0));
    }

    #[test]
    fn test_later_record_wins() {
        let mut b = VariableBounds::new(false);
        b.apply(BoundKind::Up, 4.0);
        b.apply(BoundKind::Up, 6.0);
        b.apply(BoundKind::Mi, 0.0);
        assert_eq!((b.lower, b.upper), (-INF, 6.0));
        b.apply(BoundKind::Fx, 2.5);
        assert_eq!((b.lower, b.upper), (2.5, 2.5));
        b.apply(BoundKind::Fr, 0.0);
        assert_eq!((b.lower, b.upper), (-INF, INF));
        b.apply(BoundKind::Pl, 0.0);
        assert_eq!(b.upper, INF);
    }

    #[test]
    fn test_integer_kinds_set_integrality() {
        let mut b = VariableBounds::new(false);
        b.apply(BoundKind::Bv, 0.0);
        assert_eq!((b.lower, b.upper, b.is_integer), (0.0, 1.0, true));

        let mut b = VariableBounds::new(false);
        b.apply(BoundKind::Li, 3.0);
        b.apply(BoundKind::Ui, 9.0);
        assert_eq!((b.lower, b.upper, b.is_integer), (3.0, 9.0, true));
    }
}
