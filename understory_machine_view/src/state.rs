// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Validated state values.
//!
//! ## Overview
//!
//! A state machine reports its position as a label, or as a label whose state is itself
//! structured (`{ "a": { "b": "c" } }`). [`StateValue`] is the validated form of that
//! report: exactly one active label per level, never an empty or multi-key mapping.
//!
//! Values are checked once at the boundary (see [`StateValue::from_json`]) so the
//! [resolver](crate::resolver) can walk them without re-checking shapes at every level.
//!
//! ```
//! use understory_machine_view::state::StateValue;
//!
//! let v = StateValue::from_path(&["a", "b", "c"]).unwrap();
//! assert_eq!(v.to_string(), "a.b.c");
//! assert!(v.matches(&["a", "b"]));
//! assert!(!v.matches_dotted("a.c"));
//! ```

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use thiserror::Error;

/// The current value of a (non-parallel) hierarchical state machine.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StateValue {
    /// An atomic state with no active child.
    Leaf(String),
    /// A compound state and the value of its single active child.
    Active(String, Box<StateValue>),
}

/// Errors raised while validating a state value received from a machine runtime.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StateValueError {
    /// [`StateValue::from_path`] was given no labels.
    #[error("state value path is empty")]
    EmptyPath,
    /// A level names the empty string.
    #[error("state value at {path} has an empty label")]
    EmptyLabel {
        /// Dotted location of the offending level.
        path: String,
    },
    /// A level is a mapping with no active child.
    #[error("state value at {path} is an empty mapping, expected exactly one active child")]
    Empty {
        /// Dotted location of the offending level.
        path: String,
    },
    /// A level is a mapping with more than one active child.
    #[error(
        "state value at {path} has {} active children ({}), parallel regions are not supported",
        labels.len(),
        labels.join(", ")
    )]
    Parallel {
        /// Dotted location of the offending level.
        path: String,
        /// Every key found at that level.
        labels: Vec<String>,
    },
    /// A level is neither a label nor a mapping.
    #[error("state value at {path} must be a label or a single-key mapping, found {found}")]
    InvalidType {
        /// Dotted location of the offending level.
        path: String,
        /// JSON kind that was found instead.
        found: &'static str,
    },
}

impl StateValue {
    /// An atomic state value.
    pub fn leaf(label: impl Into<String>) -> Self {
        Self::Leaf(label.into())
    }

    /// A compound state value whose active child is `child`.
    pub fn active(label: impl Into<String>, child: Self) -> Self {
        Self::Active(label.into(), Box::new(child))
    }

    /// Build a value from its root-to-leaf labels.
    pub fn from_path<S: AsRef<str>>(labels: &[S]) -> Result<Self, StateValueError> {
        let Some((last, ancestors)) = labels.split_last() else {
            return Err(StateValueError::EmptyPath);
        };
        if let Some(i) = labels.iter().position(|l| l.as_ref().is_empty()) {
            return Err(StateValueError::EmptyLabel {
                path: location(labels[..=i].iter().map(AsRef::as_ref)),
            });
        }
        let mut value = Self::leaf(last.as_ref());
        for label in ancestors.iter().rev() {
            value = Self::active(label.as_ref(), value);
        }
        Ok(value)
    }

    /// The label active at this level.
    pub fn label(&self) -> &str {
        match self {
            Self::Leaf(label) | Self::Active(label, _) => label,
        }
    }

    /// The value of the active child, if this level is compound.
    pub fn child(&self) -> Option<&Self> {
        match self {
            Self::Leaf(_) => None,
            Self::Active(_, child) => Some(child),
        }
    }

    /// Root-to-leaf labels.
    pub fn path(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(self.depth());
        let mut cur = Some(self);
        while let Some(v) = cur {
            out.push(v.label());
            cur = v.child();
        }
        out
    }

    /// Number of levels, `1` for a leaf.
    pub fn depth(&self) -> usize {
        let mut n = 1;
        let mut cur = self;
        while let Some(child) = cur.child() {
            n += 1;
            cur = child;
        }
        n
    }

    /// Returns true when this value is at or below the state named by `prefix`.
    ///
    /// An empty prefix matches every value.
    pub fn matches<S: AsRef<str>>(&self, prefix: &[S]) -> bool {
        let mut cur = Some(self);
        for label in prefix {
            match cur {
                Some(v) if v.label() == label.as_ref() => cur = v.child(),
                _ => return false,
            }
        }
        true
    }

    /// [`matches`](Self::matches) with a dotted path such as `"a.b"`.
    pub fn matches_dotted(&self, dotted: &str) -> bool {
        if dotted.is_empty() {
            return true;
        }
        let labels: Vec<&str> = dotted.split('.').collect();
        self.matches(&labels)
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())?;
        let mut cur = self.child();
        while let Some(v) = cur {
            write!(f, ".{}", v.label())?;
            cur = v.child();
        }
        Ok(())
    }
}

fn location<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    let joined = labels.collect::<Vec<_>>().join(".");
    if joined.is_empty() {
        "the root".to_string()
    } else {
        alloc::format!("`{joined}`")
    }
}

#[cfg(feature = "serde")]
mod json {
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;

    use serde::de::Error as _;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value;

    use super::{StateValue, StateValueError, location};

    impl StateValue {
        /// Validate a value in the machine runtime's JSON shape.
        ///
        /// A level is either a string label or an object with exactly one key.
        pub fn from_json(value: &Value) -> Result<Self, StateValueError> {
            let mut labels = Vec::new();
            parse(value, &mut labels)
        }

        /// The JSON shape of this value: `"a"` or `{ "a": ... }`.
        pub fn to_json(&self) -> Value {
            match self {
                Self::Leaf(label) => Value::String(label.clone()),
                Self::Active(label, child) => {
                    let mut map = serde_json::Map::with_capacity(1);
                    map.insert(label.clone(), child.to_json());
                    Value::Object(map)
                }
            }
        }
    }

    fn parse(value: &Value, labels: &mut Vec<String>) -> Result<StateValue, StateValueError> {
        let at = |labels: &[String]| location(labels.iter().map(String::as_str));
        match value {
            Value::String(label) if label.is_empty() => {
                Err(StateValueError::EmptyLabel { path: at(labels) })
            }
            Value::String(label) => Ok(StateValue::Leaf(label.clone())),
            Value::Object(map) => {
                let mut entries = map.iter();
                let (Some((label, child)), None) = (entries.next(), entries.next()) else {
                    return Err(if map.is_empty() {
                        StateValueError::Empty { path: at(labels) }
                    } else {
                        StateValueError::Parallel {
                            path: at(labels),
                            labels: map.keys().cloned().collect(),
                        }
                    });
                };
                if label.is_empty() {
                    return Err(StateValueError::EmptyLabel { path: at(labels) });
                }
                labels.push(label.clone());
                let child = parse(child, labels)?;
                labels.pop();
                Ok(StateValue::active(label.clone(), child))
            }
            other => Err(StateValueError::InvalidType {
                path: at(labels),
                found: kind(other),
            }),
        }
    }

    fn kind(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
        }
    }

    impl TryFrom<Value> for StateValue {
        type Error = StateValueError;

        fn try_from(value: Value) -> Result<Self, Self::Error> {
            Self::from_json(&value)
        }
    }

    impl Serialize for StateValue {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::Leaf(label) => serializer.serialize_str(label),
                Self::Active(label, child) => {
                    let mut map = serializer.serialize_map(Some(1))?;
                    map.serialize_entry(label, child)?;
                    map.end()
                }
            }
        }
    }

    impl<'de> Deserialize<'de> for StateValue {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let value = Value::deserialize(deserializer)?;
            Self::from_json(&value).map_err(|e| D::Error::custom(e.to_string()))
        }
    }
}
