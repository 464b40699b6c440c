//! Typed preference values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar value held under a preference key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrefValue {
    Int(i64),
    Bool(bool),
    Str(String),
}

impl PrefValue {
    /// The kind of value, used in type mismatch reports.
    pub fn kind(&self) -> PrefKind {
        match self {
            Self::Int(_) => PrefKind::Int,
            Self::Bool(_) => PrefKind::Bool,
            Self::Str(_) => PrefKind::Str,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v:?}"),
        }
    }
}

/// Discriminant of [`PrefValue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrefKind {
    Int,
    Bool,
    Str,
}

impl PrefKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Str => "string",
        }
    }
}

impl fmt::Display for PrefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
