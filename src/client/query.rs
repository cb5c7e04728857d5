//! Request parameters derived from the dashboard state.

use serde::Serialize;

use crate::client::filters::FilterSet;
use crate::domain::types::{Stage, TypeConstraintError};
use crate::repository::{LeadListQuery, Pagination, SortKey};

/// Options of the rows-per-page select.
pub const PAGE_SIZES: [usize; 3] = [10, 20, 50];
pub const DEFAULT_PAGE_SIZE: usize = PAGE_SIZES[0];

/// Everything that identifies one `GET /leads` request. Doubles as the cache key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: usize,
    pub page_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engaged: Option<bool>,
    pub sort_by: SortKey,
}

impl ListParams {
    pub fn new(page: usize, page_size: usize, search: &str, filters: &FilterSet) -> Self {
        let search = search.trim();
        Self {
            page,
            page_size,
            search: (!search.is_empty()).then(|| search.to_string()),
            stage: filters.stage.param(),
            engaged: filters.engagement.param(),
            sort_by: filters.sort_by,
        }
    }

    /// `page=1&pageSize=10&sortBy=name`, with unset filters omitted.
    pub fn to_query_string(&self) -> Result<String, serde_html_form::ser::Error> {
        serde_html_form::to_string(self)
    }

    /// The store query the server builds for these parameters.
    pub fn to_list_query(&self) -> Result<LeadListQuery, TypeConstraintError> {
        let mut query = LeadListQuery::new().sort_by(self.sort_by);
        if let Some(search) = &self.search {
            query = query.search(search);
        }
        if let Some(stage) = self.stage {
            query = query.stage(Stage::new(stage)?);
        }
        if let Some(engaged) = self.engaged {
            query = query.engaged(engaged);
        }
        Ok(query.paginate(Pagination::new(self.page, self.page_size)?))
    }
}
