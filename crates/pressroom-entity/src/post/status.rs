//! Post publication status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Publication status of a post row.
///
/// `Revision` rows are immutable historical snapshots of a live post;
/// exactly one live (non-revision) row exists per logical post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "post_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Draft awaiting review or publication.
    Pending,
    /// Live and publicly visible.
    Publish,
    /// Immutable historical snapshot of a live post.
    Revision,
}

impl PostStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Publish => "publish",
            Self::Revision => "revision",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = pressroom_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "publish" => Ok(Self::Publish),
            "revision" => Ok(Self::Revision),
            _ => Err(pressroom_core::AppError::validation(format!(
                "Invalid post status: '{s}'. Expected one of: pending, publish, revision"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("publish".parse::<PostStatus>().unwrap(), PostStatus::Publish);
        assert_eq!("PENDING".parse::<PostStatus>().unwrap(), PostStatus::Pending);
        assert!("deleted".parse::<PostStatus>().is_err());
    }
}
