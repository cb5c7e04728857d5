use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use validator::Validate;

use crate::domain::lead::{NewLead, UpdateLead};
use crate::domain::types::{CompanyName, Initials, LeadEmail, LeadId, LeadName, Stage};
use crate::forms::FormError;
use crate::repository::{LeadListQuery, Pagination, SortKey};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Filter value meaning "no filter" in the dashboard selects.
const ALL: &str = "all";

/// Accepts `YYYY-MM-DD`, a full ISO-8601 timestamp (date part is kept) or a
/// blank string meaning "no date".
fn parse_date(raw: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let date = raw.split_once('T').map_or(raw, |(date, _)| date);
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map(Some)
}

fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_date(&raw).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Distinguishes an absent key (`None`) from an explicit `null` (`Some(None)`).
fn patched_date<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_date(deserializer).map(Some)
}

fn optional_initials(raw: Option<String>) -> Result<Option<Initials>, FormError> {
    match raw.filter(|value| !value.trim().is_empty()) {
        Some(value) => Initials::new(value)
            .map(Some)
            .map_err(FormError::InvalidInitials),
        None => Ok(None),
    }
}

fn parse_stage(value: i32) -> Result<Stage, FormError> {
    Stage::new(value).map_err(|err| FormError::InvalidStage(err.to_string()))
}

/// Query string of `GET /leads` and `GET /leads/export`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadsQueryParams {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub search: Option<String>,
    /// Exact stage number, or `all`.
    pub stage: Option<String>,
    /// Only the literals `true` and `false` are recognised.
    pub engaged: Option<String>,
    pub sort_by: Option<String>,
}

impl LeadsQueryParams {
    fn filter_query(&self) -> Result<LeadListQuery, FormError> {
        let mut query = LeadListQuery::new();

        if let Some(search) = &self.search {
            query = query.search(search);
        }

        if let Some(stage) = self
            .stage
            .as_deref()
            .map(str::trim)
            .filter(|stage| !stage.is_empty() && *stage != ALL)
        {
            let value = stage
                .parse::<i32>()
                .map_err(|_| FormError::InvalidStage(format!("`{stage}` is not a number")))?;
            query = query.stage(parse_stage(value)?);
        }

        match self.engaged.as_deref() {
            Some("true") => query = query.engaged(true),
            Some("false") => query = query.engaged(false),
            _ => {}
        }

        if let Some(sort_by) = self.sort_by.as_deref().filter(|s| !s.trim().is_empty()) {
            query = query.sort_by(SortKey::from_str(sort_by).map_err(FormError::InvalidSort)?);
        }

        Ok(query)
    }

    /// Builds the paginated listing query, defaulting to page 1 of 10.
    pub fn to_list_query(&self) -> Result<LeadListQuery, FormError> {
        let pagination = Pagination::new(
            self.page.unwrap_or(DEFAULT_PAGE),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .map_err(FormError::InvalidPagination)?;

        Ok(self.filter_query()?.paginate(pagination))
    }

    /// Builds an unpaginated query for exports; `page`/`pageSize` are ignored.
    pub fn to_export_query(&self) -> Result<LeadListQuery, FormError> {
        self.filter_query()
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Body of `POST /leads`.
pub struct CreateLeadForm {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub company: String,
    #[serde(default)]
    pub stage: Option<i32>,
    #[serde(default)]
    pub engaged: bool,
    #[serde(default, deserialize_with = "optional_date")]
    pub last_contacted: Option<NaiveDate>,
    #[serde(default)]
    pub initials: Option<String>,
}

impl TryFrom<CreateLeadForm> for NewLead {
    type Error = FormError;

    fn try_from(form: CreateLeadForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let name = LeadName::new(form.name).map_err(FormError::InvalidName)?;
        let email = LeadEmail::new(form.email).map_err(FormError::InvalidEmail)?;
        let company = CompanyName::new(form.company).map_err(FormError::InvalidCompany)?;
        let stage = form.stage.map(parse_stage).transpose()?.unwrap_or_default();
        let initials = optional_initials(form.initials)?;

        Ok(NewLead::new(
            name,
            email,
            company,
            stage,
            form.engaged,
            form.last_contacted,
            initials,
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Body of `PATCH /leads/{id}`; every field is optional.
pub struct UpdateLeadForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub stage: Option<i32>,
    pub engaged: Option<bool>,
    #[serde(default, deserialize_with = "patched_date")]
    pub last_contacted: Option<Option<NaiveDate>>,
    pub initials: Option<String>,
}

impl TryFrom<UpdateLeadForm> for UpdateLead {
    type Error = FormError;

    fn try_from(form: UpdateLeadForm) -> Result<Self, Self::Error> {
        let updates = UpdateLead {
            name: form
                .name
                .map(LeadName::new)
                .transpose()
                .map_err(FormError::InvalidName)?,
            email: form
                .email
                .map(LeadEmail::new)
                .transpose()
                .map_err(FormError::InvalidEmail)?,
            company: form
                .company
                .map(CompanyName::new)
                .transpose()
                .map_err(FormError::InvalidCompany)?,
            stage: form.stage.map(parse_stage).transpose()?,
            engaged: form.engaged,
            last_contacted: form.last_contacted,
            initials: optional_initials(form.initials)?,
        };

        Ok(updates.with_derived_initials())
    }
}

/// Path segment of `DELETE /leads/{id}`: one id or a comma-joined list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadIds(Vec<LeadId>);

impl LeadIds {
    pub fn as_slice(&self) -> &[LeadId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_batch(&self) -> bool {
        self.0.len() > 1
    }
}

impl FromStr for LeadIds {
    type Err = FormError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut ids: Vec<LeadId> = Vec::new();
        for token in raw.split(',') {
            let id = token
                .parse::<LeadId>()
                .map_err(|_| FormError::InvalidLeadIds(raw.to_string()))?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(Self(ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::LeadPredicate;

    fn params(pairs: &str) -> LeadsQueryParams {
        serde_html_form::from_str(pairs).unwrap()
    }

    #[test]
    fn list_query_defaults_to_first_page_of_ten() {
        let query = params("").to_list_query().unwrap();
        let pagination = query.pagination().unwrap();
        assert_eq!((pagination.page(), pagination.per_page()), (1, 10));
        assert_eq!(query.sort_key(), SortKey::Name);
        assert!(query.predicates().is_empty());
    }

    #[test]
    fn list_query_combines_all_filters() {
        let query = params("page=2&pageSize=20&search=acme&stage=2&engaged=true&sortBy=company")
            .to_list_query()
            .unwrap();
        assert_eq!(query.pagination().unwrap().offset(), 20);
        assert_eq!(query.sort_key(), SortKey::Company);
        assert_eq!(
            query.predicates(),
            &[
                LeadPredicate::Search("acme".to_string()),
                LeadPredicate::Stage(Stage::new(2).unwrap()),
                LeadPredicate::Engaged(true),
            ]
        );
    }

    #[test]
    fn engaged_only_recognises_boolean_literals() {
        let query = params("engaged=yes").to_list_query().unwrap();
        assert!(query.predicates().is_empty());

        let query = params("engaged=false").to_list_query().unwrap();
        assert_eq!(query.predicates(), &[LeadPredicate::Engaged(false)]);
    }

    #[test]
    fn all_stage_means_no_filter() {
        let query = params("stage=all").to_list_query().unwrap();
        assert!(query.predicates().is_empty());
    }

    #[test]
    fn malformed_parameters_are_rejected() {
        assert!(matches!(
            params("sortBy=email").to_list_query(),
            Err(FormError::InvalidSort(_))
        ));
        assert!(matches!(
            params("stage=two").to_list_query(),
            Err(FormError::InvalidStage(_))
        ));
        assert!(matches!(
            params("page=0").to_list_query(),
            Err(FormError::InvalidPagination(_))
        ));
        assert!(matches!(
            params("pageSize=0").to_list_query(),
            Err(FormError::InvalidPagination(_))
        ));
    }

    #[test]
    fn export_query_ignores_pagination() {
        let query = params("page=0&search=flux").to_export_query().unwrap();
        assert_eq!(query.pagination(), None);
    }

    #[test]
    fn create_form_reports_missing_fields() {
        let form: CreateLeadForm =
            serde_json::from_str(r#"{"name":"Emma Blake","company":"Flux"}"#).unwrap();
        let err = NewLead::try_from(form).unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: email");
    }

    #[test]
    fn create_form_rejects_blank_fields() {
        let form: CreateLeadForm =
            serde_json::from_str(r#"{"name":"  ","email":"a@b.c","company":"Flux"}"#).unwrap();
        assert!(matches!(
            NewLead::try_from(form),
            Err(FormError::InvalidName(_))
        ));
    }

    #[test]
    fn create_form_fills_defaults() {
        let form: CreateLeadForm = serde_json::from_str(
            r#"{"name":"Emma Blake","email":"emma.blake@flux.com","company":"Flux","initials":"","lastContacted":"2025-01-23"}"#,
        )
        .unwrap();
        let lead = NewLead::try_from(form).unwrap();
        assert_eq!(lead.stage, Stage::default());
        assert!(!lead.engaged);
        assert_eq!(lead.initials.as_str(), "EB");
        assert_eq!(lead.last_contacted, NaiveDate::from_ymd_opt(2025, 1, 23));
    }

    #[test]
    fn create_form_rejects_out_of_range_stage() {
        let form: CreateLeadForm = serde_json::from_str(
            r#"{"name":"Emma","email":"e@flux.com","company":"Flux","stage":7}"#,
        )
        .unwrap();
        assert!(matches!(
            NewLead::try_from(form),
            Err(FormError::InvalidStage(_))
        ));
    }

    #[test]
    fn update_form_distinguishes_null_from_absent_date() {
        let absent: UpdateLeadForm = serde_json::from_str(r#"{"engaged":true}"#).unwrap();
        assert_eq!(absent.last_contacted, None);

        let cleared: UpdateLeadForm = serde_json::from_str(r#"{"lastContacted":null}"#).unwrap();
        assert_eq!(cleared.last_contacted, Some(None));

        let set: UpdateLeadForm =
            serde_json::from_str(r#"{"lastContacted":"2025-02-05T00:00:00.000Z"}"#).unwrap();
        assert_eq!(set.last_contacted, Some(NaiveDate::from_ymd_opt(2025, 2, 5)));
    }

    #[test]
    fn update_form_rederives_initials_on_rename() {
        let form: UpdateLeadForm = serde_json::from_str(r#"{"id":4,"name":"Ruby Shaw"}"#).unwrap();
        let updates = UpdateLead::try_from(form).unwrap();
        assert_eq!(updates.initials.unwrap().as_str(), "RS");
    }

    #[test]
    fn lead_ids_parse_single_and_batch() {
        let single: LeadIds = "5".parse().unwrap();
        assert!(!single.is_batch());

        let batch: LeadIds = "5, 7,9,7".parse().unwrap();
        assert!(batch.is_batch());
        assert_eq!(
            batch.as_slice().iter().map(|id| id.get()).collect::<Vec<_>>(),
            vec![5, 7, 9]
        );

        assert!("5,,7".parse::<LeadIds>().is_err());
        assert!("abc".parse::<LeadIds>().is_err());
        assert!("0".parse::<LeadIds>().is_err());
    }
}
