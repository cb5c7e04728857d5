use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::db::{DbConnection, DbPool};
use crate::domain::lead::{Lead, NewLead, UpdateLead};
use crate::domain::types::{LeadId, Stage, TypeConstraintError};
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod lead;
#[cfg(feature = "test-mocks")]
pub mod mock;

/// Diesel-backed repository shared by the HTTP handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        let conn = self.pool.get().inspect_err(|e| {
            log::error!("Failed to get connection from pool: {e}");
        })?;
        Ok(conn)
    }
}

/// Column a lead listing is ordered by (always ascending).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "company")]
    Company,
    #[serde(rename = "stage")]
    Stage,
    #[serde(rename = "lastContacted")]
    LastContacted,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Name,
        SortKey::Company,
        SortKey::Stage,
        SortKey::LastContacted,
    ];

    /// Wire name used in query strings.
    pub const fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Company => "company",
            SortKey::Stage => "stage",
            SortKey::LastContacted => "lastContacted",
        }
    }

    /// Human readable column label.
    pub const fn label(self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::Company => "Company",
            SortKey::Stage => "Stage",
            SortKey::LastContacted => "Last Contacted",
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "name" => Ok(SortKey::Name),
            "company" => Ok(SortKey::Company),
            "stage" => Ok(SortKey::Stage),
            "lastContacted" | "last_contacted" => Ok(SortKey::LastContacted),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown sort column `{other}`: expected one of name, company, stage, lastContacted"
            ))),
        }
    }
}

/// One-based page number plus page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pagination {
    page: usize,
    per_page: usize,
}

impl Pagination {
    /// Validates `page >= 1`, `per_page > 0` and that the row window is addressable.
    pub fn new(page: usize, per_page: usize) -> Result<Self, TypeConstraintError> {
        if page == 0 {
            return Err(TypeConstraintError::InvalidValue(
                "page must be at least 1".to_string(),
            ));
        }
        if per_page == 0 {
            return Err(TypeConstraintError::InvalidValue(
                "page size must be greater than zero".to_string(),
            ));
        }
        let addressable = (page - 1)
            .checked_mul(per_page)
            .and_then(|offset| offset.checked_add(per_page))
            .is_some_and(|end| i64::try_from(end).is_ok());
        if !addressable {
            return Err(TypeConstraintError::InvalidValue(
                "page is out of the addressable range".to_string(),
            ));
        }
        Ok(Self { page, per_page })
    }

    pub const fn page(self) -> usize {
        self.page
    }

    pub const fn per_page(self) -> usize {
        self.per_page
    }

    /// Zero-based row offset of the first row on this page.
    pub const fn offset(self) -> usize {
        (self.page - 1) * self.per_page
    }
}

/// A single filter clause. Clauses are AND-combined; `Search` itself matches
/// name, email or company.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LeadPredicate {
    /// Case-insensitive substring match over name, email and company.
    Search(String),
    Stage(Stage),
    Engaged(bool),
}

/// Accumulated list request: predicates, sort column and row window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LeadListQuery {
    predicates: Vec<LeadPredicate>,
    sort_by: SortKey,
    pagination: Option<Pagination>,
}

impl LeadListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a search clause. Blank terms are ignored.
    pub fn search(mut self, term: impl AsRef<str>) -> Self {
        let term = term.as_ref().trim();
        if !term.is_empty() {
            self.predicates
                .push(LeadPredicate::Search(term.to_string()));
        }
        self
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.predicates.push(LeadPredicate::Stage(stage));
        self
    }

    pub fn engaged(mut self, engaged: bool) -> Self {
        self.predicates.push(LeadPredicate::Engaged(engaged));
        self
    }

    pub fn sort_by(mut self, sort_by: SortKey) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn predicates(&self) -> &[LeadPredicate] {
        &self.predicates
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_by
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.pagination
    }
}

pub trait LeadReader {
    fn get_lead_by_id(&self, id: LeadId) -> RepositoryResult<Option<Lead>>;
    /// Returns the total number of matching leads and the requested page.
    fn list_leads(&self, query: &LeadListQuery) -> RepositoryResult<(usize, Vec<Lead>)>;
}

pub trait LeadWriter {
    fn create_lead(&self, id: LeadId, new_lead: &NewLead) -> RepositoryResult<Lead>;
    fn update_lead(&self, id: LeadId, updates: &UpdateLead) -> RepositoryResult<Lead>;
    /// Deletes every listed lead and returns the number of rows removed.
    fn delete_leads(&self, ids: &[LeadId]) -> RepositoryResult<usize>;
}
