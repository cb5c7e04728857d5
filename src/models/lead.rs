use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::lead::{Lead as DomainLead, NewLead as DomainNewLead, UpdateLead as DomainUpdateLead};
use crate::domain::types::{
    CompanyName, Initials, LeadEmail, LeadId, LeadName, Stage, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::leads)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::lead::Lead`].
pub struct Lead {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub company: String,
    pub stage: i32,
    pub engaged: bool,
    pub last_contacted: Option<NaiveDate>,
    pub initials: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::leads)]
/// Insertable form of [`Lead`].
pub struct NewLead<'a> {
    pub id: i64,
    pub name: &'a str,
    pub email: &'a str,
    pub company: &'a str,
    pub stage: i32,
    pub engaged: bool,
    pub last_contacted: Option<NaiveDate>,
    pub initials: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::leads)]
/// Partial changeset; `None` columns are skipped.
pub struct UpdateLead<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub company: Option<&'a str>,
    pub stage: Option<i32>,
    pub engaged: Option<bool>,
    pub last_contacted: Option<Option<NaiveDate>>,
    pub initials: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Lead> for DomainLead {
    type Error = TypeConstraintError;

    fn try_from(lead: Lead) -> Result<Self, Self::Error> {
        Ok(Self {
            id: LeadId::new(lead.id)?,
            name: LeadName::new(lead.name)?,
            email: LeadEmail::new(lead.email)?,
            company: CompanyName::new(lead.company)?,
            stage: Stage::new(lead.stage)?,
            engaged: lead.engaged,
            last_contacted: lead.last_contacted,
            initials: Initials::new(lead.initials)?,
            created_at: lead.created_at,
            updated_at: lead.updated_at,
        })
    }
}

impl<'a> NewLead<'a> {
    /// Binds a domain payload to the identifier chosen for it.
    pub fn from_domain(id: LeadId, lead: &'a DomainNewLead, now: NaiveDateTime) -> Self {
        Self {
            id: id.get(),
            name: lead.name.as_str(),
            email: lead.email.as_str(),
            company: lead.company.as_str(),
            stage: lead.stage.get(),
            engaged: lead.engaged,
            last_contacted: lead.last_contacted,
            initials: lead.initials.as_str(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> UpdateLead<'a> {
    pub fn from_domain(updates: &'a DomainUpdateLead, now: NaiveDateTime) -> Self {
        Self {
            name: updates.name.as_ref().map(LeadName::as_str),
            email: updates.email.as_ref().map(LeadEmail::as_str),
            company: updates.company.as_ref().map(CompanyName::as_str),
            stage: updates.stage.map(Stage::get),
            engaged: updates.engaged,
            last_contacted: updates.last_contacted,
            initials: updates.initials.as_ref().map(Initials::as_str),
            updated_at: now,
        }
    }
}
