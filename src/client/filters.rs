//! Stage/engagement/sort selection of the dashboard and its chip labels.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::domain::types::{Stage, TypeConstraintError};
use crate::repository::SortKey;

/// Value of the "all" option in both filter selects.
pub const ALL: &str = "all";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StageFilter {
    #[default]
    All,
    Only(Stage),
}

impl StageFilter {
    /// Query-string value, `None` when unfiltered.
    pub fn param(self) -> Option<i32> {
        match self {
            StageFilter::All => None,
            StageFilter::Only(stage) => Some(stage.get()),
        }
    }
}

impl Display for StageFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StageFilter::All => f.write_str(ALL),
            StageFilter::Only(stage) => write!(f, "{stage}"),
        }
    }
}

impl FromStr for StageFilter {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == ALL {
            return Ok(StageFilter::All);
        }
        let value = s
            .parse::<i32>()
            .map_err(|_| TypeConstraintError::InvalidValue(format!("`{s}` is not a stage")))?;
        Ok(StageFilter::Only(Stage::new(value)?))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EngagementFilter {
    #[default]
    All,
    Engaged,
    NotEngaged,
}

impl EngagementFilter {
    pub const fn as_str(self) -> &'static str {
        match self {
            EngagementFilter::All => ALL,
            EngagementFilter::Engaged => "engaged",
            EngagementFilter::NotEngaged => "not-engaged",
        }
    }

    /// Query-string value, `None` when unfiltered.
    pub const fn param(self) -> Option<bool> {
        match self {
            EngagementFilter::All => None,
            EngagementFilter::Engaged => Some(true),
            EngagementFilter::NotEngaged => Some(false),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            EngagementFilter::All => "All",
            EngagementFilter::Engaged => "Engaged",
            EngagementFilter::NotEngaged => "Not Engaged",
        }
    }
}

impl FromStr for EngagementFilter {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            ALL => Ok(EngagementFilter::All),
            "engaged" => Ok(EngagementFilter::Engaged),
            "not-engaged" => Ok(EngagementFilter::NotEngaged),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown engagement filter `{other}`"
            ))),
        }
    }
}

/// Which part of a [`FilterSet`] a chip stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Stage,
    Engagement,
    Sort,
}

/// Removable chip shown above the table for a non-default selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveFilter {
    pub kind: FilterKind,
    pub label: String,
}

/// Filters applied to the list. The default is `all / all / name`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FilterSet {
    pub stage: StageFilter,
    pub engagement: EngagementFilter,
    pub sort_by: SortKey,
}

impl FilterSet {
    pub fn is_default(&self) -> bool {
        *self == FilterSet::default()
    }

    /// Resets one part of the selection to its default.
    pub fn reset(&mut self, kind: FilterKind) {
        match kind {
            FilterKind::Stage => self.stage = StageFilter::All,
            FilterKind::Engagement => self.engagement = EngagementFilter::All,
            FilterKind::Sort => self.sort_by = SortKey::default(),
        }
    }

    /// Chips in display order: stage, engagement, sort.
    pub fn active(&self) -> Vec<ActiveFilter> {
        let mut chips = Vec::new();

        if let StageFilter::Only(stage) = self.stage {
            chips.push(ActiveFilter {
                kind: FilterKind::Stage,
                label: format!("Stage: {stage}"),
            });
        }

        if self.engagement != EngagementFilter::All {
            chips.push(ActiveFilter {
                kind: FilterKind::Engagement,
                label: format!("Engagement: {}", self.engagement.label()),
            });
        }

        if self.sort_by != SortKey::default() {
            chips.push(ActiveFilter {
                kind: FilterKind::Sort,
                label: format!("Sorted by: {}", self.sort_by.label()),
            });
        }

        chips
    }
}
