//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::lead::{Lead, NewLead, UpdateLead};
use crate::domain::types::LeadId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{LeadListQuery, LeadReader, LeadWriter};

mock! {
    pub Repository {}

    impl LeadReader for Repository {
        fn get_lead_by_id(&self, id: LeadId) -> RepositoryResult<Option<Lead>>;
        fn list_leads(&self, query: &LeadListQuery) -> RepositoryResult<(usize, Vec<Lead>)>;
    }

    impl LeadWriter for Repository {
        fn create_lead(&self, id: LeadId, new_lead: &NewLead) -> RepositoryResult<Lead>;
        fn update_lead(&self, id: LeadId, updates: &UpdateLead) -> RepositoryResult<Lead>;
        fn delete_leads(&self, ids: &[LeadId]) -> RepositoryResult<usize>;
    }
}
