//! Issue status and priority enumerations.
//!
//! Both are stored as lowercase text columns; [`IssueStatus::as_str`] and
//! [`IssuePriority::as_str`] are the canonical database values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Workflow status of an issue. There are no transition rules between values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    #[default]
    Open,
    InProgress,
    Closed,
}

impl IssueStatus {
    pub const ALL: [IssueStatus; 3] = [Self::Open, Self::InProgress, Self::Closed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
        }
    }

    /// Human-readable label used by form choices.
    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Closed => "Closed",
        }
    }

    /// Look up a status by its database value. Matching is exact.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssuePriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Rank given to priority values outside the known set.
pub const UNKNOWN_PRIORITY_RANK: i32 = 4;

impl IssuePriority {
    pub const ALL: [IssuePriority; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }

    /// Severity rank: `high` = 1, `medium` = 2, `low` = 3.
    ///
    /// Ascending rank means "most severe first".
    pub fn rank(self) -> i32 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

impl fmt::Display for IssuePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rank of a raw stored priority value, [`UNKNOWN_PRIORITY_RANK`] if unknown.
pub fn priority_rank(raw: &str) -> i32 {
    IssuePriority::from_name(raw).map_or(UNKNOWN_PRIORITY_RANK, IssuePriority::rank)
}

/// A `(value, label)` pair for form select boxes.
#[derive(Debug, Clone, Serialize)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub fn status_options() -> Vec<ChoiceOption> {
    IssueStatus::ALL
        .into_iter()
        .map(|s| ChoiceOption {
            value: s.as_str(),
            label: s.label(),
        })
        .collect()
}

pub fn priority_options() -> Vec<ChoiceOption> {
    IssuePriority::ALL
        .into_iter()
        .map(|p| ChoiceOption {
            value: p.as_str(),
            label: p.label(),
        })
        .collect()
}
