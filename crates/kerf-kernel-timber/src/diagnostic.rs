//! Non-fatal diagnostics returned alongside successful results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A message attached to a successful construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// A requested orientation could not be honored; a documented default
    /// was used instead.
    OrientationFallbackApplied {
        /// What the caller asked for.
        requested: String,
        /// What was used instead.
        substituted: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::OrientationFallbackApplied {
                requested,
                substituted,
            } => write!(
                f,
                "orientation fallback: {requested} is parallel to the join direction, using {substituted}"
            ),
        }
    }
}

/// A value plus the diagnostics produced while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnosed<T> {
    /// The constructed value.
    pub value: T,
    /// Diagnostics, in the order they were raised.
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Diagnosed<T> {
    /// A value with no diagnostics.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    /// A value with the given diagnostics.
    pub fn with(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    /// Whether an orientation fallback was applied.
    pub fn has_fallback(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::OrientationFallbackApplied { .. }))
    }

    /// Drop the diagnostics.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Transform the value, keeping the diagnostics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Diagnosed<U> {
        Diagnosed {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }
}
