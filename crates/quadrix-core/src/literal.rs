//! Numeric literals stored in expression nodes.
//!
//! Nodes are hash-consed, so numbers need `Eq` and `Hash`. A `Literal`
//! stores the bit pattern of an `f64` with `-0.0` folded onto `0.0`,
//! which gives structural equality that agrees with numeric equality for
//! every finite value.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A floating point literal with total equality, ordering and hashing.
#[derive(Clone, Copy)]
pub struct Literal(f64);

impl Literal {
    /// The literal `0`.
    pub const ZERO: Self = Self(0.0);
    /// The literal `1`.
    pub const ONE: Self = Self(1.0);

    /// Creates a literal, normalising negative zero.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value == 0.0 {
            Self(0.0)
        } else {
            Self(value)
        }
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Returns true for `0`.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    /// Returns true for `1`.
    #[must_use]
    pub fn is_one(self) -> bool {
        self.0 == 1.0
    }

    /// Returns true if the value is finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Returns the value as a non-negative integer if it is one exactly.
    #[must_use]
    pub fn as_natural(self) -> Option<u32> {
        let v = self.0;
        if v >= 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Some(v as u32)
        } else {
            None
        }
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::new(f64::from(value))
    }
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Literal {}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Literal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when text is not a finite number.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("not a finite number: {0:?}")]
pub struct LiteralParseError(pub String);

impl FromStr for Literal {
    type Err = LiteralParseError;

    // Only digit-led text is accepted so that names such as `inf` stay symbols.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('-').unwrap_or(s);
        let leading_ok = digits
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || c == '.');
        if !leading_ok {
            return Err(LiteralParseError(s.to_string()));
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Self::new(v)),
            _ => Err(LiteralParseError(s.to_string())),
        }
    }
}
