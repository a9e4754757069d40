#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a submission during the grading lifecycle.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in
/// SeaORM entities. Values are stored and serialized in lowercase to stay
/// wire-compatible with the existing clients (`"pending"` / `"processed"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    /// Enqueued for grading, no verdict yet.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "pending"))]
    Pending,
    /// The worker has reported a grading result.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "processed"))]
    Processed,
}

impl SubmissionStatus {
    /// Returns true once a grading result has been recorded.
    pub fn is_processed(&self) -> bool {
        matches!(self, Self::Processed)
    }

    /// All possible status values.
    pub const ALL: &'static [SubmissionStatus] = &[Self::Pending, Self::Processed];

    /// Returns the string representation (lowercase).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processed => "processed",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for SubmissionStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    invalid: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid status '{}'. Valid values: {}",
            self.invalid,
            SubmissionStatus::ALL
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for SubmissionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processed" => Ok(Self::Processed),
            _ => Err(ParseStatusError {
                invalid: s.to_string(),
            }),
        }
    }
}
