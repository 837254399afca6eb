//! `<priority>` values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative priority of a URL within its site, in `[0.0, 1.0]`.
///
/// Formats as a plain decimal with at least one fractional digit and never
/// in scientific notation: `0.8`, `1.0`, `0.25`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Priority(f64);

impl Priority {
    /// Protocol default when a page declares nothing.
    pub const DEFAULT: Self = Self(0.5);

    /// Returns `None` when `value` is outside `[0.0, 1.0]` or not a number.
    pub fn new(value: f64) -> Option<Self> {
        (0.0..=1.0).contains(&value).then_some(Self(value))
    }

    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for Priority {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("priority {value} is outside 0.0..=1.0"))
    }
}

impl From<Priority> for f64 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // f64 `Display` is the shortest exact decimal, never exponential
        let plain = self.0.to_string();
        if plain.contains('.') {
            f.write_str(&plain)
        } else {
            write!(f, "{plain}.0")
        }
    }
}
