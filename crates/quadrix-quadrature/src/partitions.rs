//! Validated partition counts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::QuadratureError;

/// A positive integer number of partitions.
///
/// Composite rules split `[a, b]` into `n` panels of the rule's own width, so
/// the number of subintervals is `n`, `2n` or `3n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "usize")]
pub struct Partitions(usize);

impl Partitions {
    /// A single panel.
    pub const ONE: Self = Self(1);

    /// Validates `n`.
    ///
    /// # Errors
    ///
    /// Returns [`QuadratureError::InvalidPartitionCount`] for zero.
    pub fn new(n: usize) -> Result<Self, QuadratureError> {
        if n == 0 {
            return Err(QuadratureError::InvalidPartitionCount("0".into()));
        }
        Ok(Self(n))
    }

    /// The count.
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<usize> for Partitions {
    type Error = QuadratureError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl TryFrom<i64> for Partitions {
    type Error = QuadratureError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        usize::try_from(n)
            .ok()
            .filter(|&n| n > 0)
            .map(Self)
            .ok_or_else(|| QuadratureError::InvalidPartitionCount(n.to_string()))
    }
}

impl TryFrom<i32> for Partitions {
    type Error = QuadratureError;

    fn try_from(n: i32) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(n))
    }
}

impl TryFrom<f64> for Partitions {
    type Error = QuadratureError;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn try_from(n: f64) -> Result<Self, Self::Error> {
        if n.is_finite() && n.fract() == 0.0 && n >= 1.0 && n <= u32::MAX.into() {
            Ok(Self(n as usize))
        } else {
            Err(QuadratureError::InvalidPartitionCount(n.to_string()))
        }
    }
}

impl From<Partitions> for usize {
    fn from(p: Partitions) -> Self {
        p.0
    }
}

impl fmt::Display for Partitions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
