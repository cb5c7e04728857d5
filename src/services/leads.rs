use crate::domain::lead::{Lead, LeadsPage, NewLead, UpdateLead};
use crate::domain::types::LeadId;
use crate::forms::leads::{CreateLeadForm, LeadIds, LeadsQueryParams, UpdateLeadForm};
use crate::repository::errors::RepositoryError;
use crate::repository::{LeadReader, LeadWriter};
use crate::services::{ServiceError, ServiceResult};

/// How many freshly generated ids a create attempts before giving up.
pub const MAX_ID_ATTEMPTS: usize = 3;

/// Column order of the CSV export.
pub const EXPORT_HEADER: [&str; 8] = [
    "id",
    "name",
    "email",
    "company",
    "stage",
    "engaged",
    "lastContacted",
    "initials",
];

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Distinct ids named in the request.
    pub requested: usize,
    /// Rows the store actually removed.
    pub deleted: usize,
}

/// Draws a JSON-safe random identifier.
pub fn random_lead_id() -> ServiceResult<LeadId> {
    Ok(LeadId::new(rand::random_range(1..=LeadId::MAX_GENERATED))?)
}

fn parse_lead_id(raw: &str) -> ServiceResult<LeadId> {
    raw.parse::<LeadId>()
        .map_err(|err| ServiceError::Form(format!("invalid lead id: {err}")))
}

/// Returns one page of leads together with the total number of matches.
pub fn list_leads<R>(params: &LeadsQueryParams, repo: &R) -> ServiceResult<LeadsPage>
where
    R: LeadReader + ?Sized,
{
    let query = params.to_list_query()?;

    let (count, leads) = repo.list_leads(&query).map_err(|err| {
        log::error!("Failed to list leads: {err}");
        err
    })?;

    Ok(LeadsPage { leads, count })
}

/// Validates the form and inserts a lead under a random id.
pub fn create_lead<R>(form: CreateLeadForm, repo: &R) -> ServiceResult<Lead>
where
    R: LeadWriter + ?Sized,
{
    create_lead_with(form, repo, random_lead_id)
}

/// Same as [`create_lead`] with a caller supplied id source.
///
/// A uniqueness violation draws a new id; after [`MAX_ID_ATTEMPTS`] collisions
/// the last store error is returned.
pub fn create_lead_with<R, F>(form: CreateLeadForm, repo: &R, mut next_id: F) -> ServiceResult<Lead>
where
    R: LeadWriter + ?Sized,
    F: FnMut() -> ServiceResult<LeadId>,
{
    let new_lead = NewLead::try_from(form)?;

    let mut last_error = None;
    for attempt in 1..=MAX_ID_ATTEMPTS {
        let id = next_id()?;
        match repo.create_lead(id, &new_lead) {
            Ok(lead) => return Ok(lead),
            Err(RepositoryError::UniqueViolation(message)) => {
                log::warn!("Lead id {id} is taken (attempt {attempt}/{MAX_ID_ATTEMPTS}): {message}");
                last_error = Some(RepositoryError::UniqueViolation(message));
            }
            Err(err) => {
                log::error!("Failed to create lead: {err}");
                return Err(err.into());
            }
        }
    }

    let err = last_error.unwrap_or_else(|| {
        RepositoryError::Unexpected("no lead id attempts were made".to_string())
    });
    log::error!("Failed to create lead: {err}");
    Err(err.into())
}

/// Applies a partial update to the lead identified by `raw_id`.
pub fn update_lead<R>(raw_id: &str, form: UpdateLeadForm, repo: &R) -> ServiceResult<Lead>
where
    R: LeadWriter + ?Sized,
{
    let id = parse_lead_id(raw_id)?;
    let updates = UpdateLead::try_from(form)?;

    repo.update_lead(id, &updates).map_err(|err| {
        if !matches!(err, RepositoryError::NotFound) {
            log::error!("Failed to update lead {id}: {err}");
        }
        ServiceError::from(err)
    })
}

/// Deletes one lead or a comma separated list of leads.
///
/// Unknown ids are skipped silently; the outcome reports both counts.
pub fn delete_leads<R>(raw_ids: &str, repo: &R) -> ServiceResult<DeleteOutcome>
where
    R: LeadWriter + ?Sized,
{
    let ids: LeadIds = raw_ids.parse()?;

    let deleted = repo.delete_leads(ids.as_slice()).map_err(|err| {
        log::error!("Failed to delete leads {raw_ids}: {err}");
        err
    })?;

    Ok(DeleteOutcome {
        requested: ids.len(),
        deleted,
    })
}

/// Renders every lead matching the filters of `params` as CSV.
pub fn export_leads_csv<R>(params: &LeadsQueryParams, repo: &R) -> ServiceResult<String>
where
    R: LeadReader + ?Sized,
{
    let query = params.to_export_query()?;

    let (_, leads) = repo.list_leads(&query).map_err(|err| {
        log::error!("Failed to load leads for export: {err}");
        err
    })?;

    write_csv(&leads).map_err(|err| {
        log::error!("Failed to render leads export: {err}");
        ServiceError::Internal(err.to_string())
    })
}

fn write_csv(leads: &[Lead]) -> Result<String, Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;

    for lead in leads {
        let last_contacted = lead
            .last_contacted
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        writer.write_record([
            lead.id.to_string(),
            lead.name.to_string(),
            lead.email.to_string(),
            lead.company.to_string(),
            lead.stage.to_string(),
            lead.engaged.to_string(),
            last_contacted,
            lead.initials.to_string(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|err| err.to_string())?;
    Ok(String::from_utf8(bytes)?)
}
