//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (positive identifiers, trimmed
//! non-empty text, bounded pipeline stages) so that once a value reaches the
//! domain layer it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Stage outside of the supported pipeline range.
    #[error("stage must be between {min} and {max}, got {0}", min = Stage::MIN, max = Stage::MAX)]
    StageOutOfRange(i32),
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Unique identifier for a lead.
///
/// Identifiers are assigned by the server and never reused. Generated values
/// stay below [`LeadId::MAX_GENERATED`] so they survive a round trip through
/// JSON number parsers that only handle doubles.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "i64", into = "i64")]
pub struct LeadId(i64);

impl LeadId {
    /// Upper bound (inclusive) for randomly generated identifiers: 2^53 - 1.
    pub const MAX_GENERATED: i64 = (1 << 53) - 1;

    /// Creates a new identifier ensuring it is greater than zero.
    pub fn new(value: i64) -> Result<Self, TypeConstraintError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NonPositiveId)
        }
    }

    /// Returns the raw `i64` backing this identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl Display for LeadId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for LeadId {
    type Error = TypeConstraintError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LeadId> for i64 {
    fn from(value: LeadId) -> Self {
        value.0
    }
}

impl FromStr for LeadId {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| TypeConstraintError::InvalidValue(format!("`{s}` is not a lead id")))?;
        Self::new(value)
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(LeadName, "Contact name wrapper enforcing non-empty values.");

non_empty_string_newtype!(
    LeadEmail,
    "Contact email wrapper enforcing trimmed, non-empty values."
);

non_empty_string_newtype!(
    CompanyName,
    "Company name wrapper enforcing trimmed, non-empty values."
);

non_empty_string_newtype!(
    Initials,
    "Short avatar label stored alongside the lead name."
);

impl Initials {
    /// Maximum number of characters produced by [`Initials::from_name`].
    pub const MAX_LEN: usize = 2;

    /// Derives initials from the first letter of every word in `name`.
    pub fn from_name(name: &LeadName) -> Self {
        let initials: String = name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(Self::MAX_LEN)
            .collect();

        // A `LeadName` always holds at least one non-whitespace character.
        Self(initials)
    }
}

/// Pipeline progress indicator for a lead.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "i32", into = "i32")]
pub struct Stage(i32);

impl Stage {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 4;

    /// Creates a stage ensuring it lies in `MIN..=MAX`.
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::StageOutOfRange(value))
        }
    }

    pub const fn get(self) -> i32 {
        self.0
    }

    /// Every supported stage in ascending order.
    pub fn all() -> impl Iterator<Item = Stage> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for Stage {
    type Error = TypeConstraintError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Stage> for i32 {
    fn from(value: Stage) -> Self {
        value.0
    }
}
