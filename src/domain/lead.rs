use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{CompanyName, Initials, LeadEmail, LeadId, LeadName, Stage};

/// Sales contact tracked by the dashboard.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    pub name: LeadName,
    pub email: LeadEmail,
    pub company: CompanyName,
    pub stage: Stage,
    pub engaged: bool,
    pub last_contacted: Option<NaiveDate>,
    pub initials: Initials,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Validated payload used to insert a lead. The identifier is assigned at
/// insertion time.
#[derive(Clone, Debug, PartialEq)]
pub struct NewLead {
    pub name: LeadName,
    pub email: LeadEmail,
    pub company: CompanyName,
    pub stage: Stage,
    pub engaged: bool,
    pub last_contacted: Option<NaiveDate>,
    pub initials: Initials,
}

impl NewLead {
    /// Builds a new lead, deriving initials from the name when none are given.
    #[must_use]
    pub fn new(
        name: LeadName,
        email: LeadEmail,
        company: CompanyName,
        stage: Stage,
        engaged: bool,
        last_contacted: Option<NaiveDate>,
        initials: Option<Initials>,
    ) -> Self {
        let initials = initials.unwrap_or_else(|| Initials::from_name(&name));
        Self {
            name,
            email,
            company,
            stage,
            engaged,
            last_contacted,
            initials,
        }
    }
}

/// Partial patch applied to an existing lead. `None` leaves a column untouched;
/// `last_contacted: Some(None)` clears the date.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateLead {
    pub name: Option<LeadName>,
    pub email: Option<LeadEmail>,
    pub company: Option<CompanyName>,
    pub stage: Option<Stage>,
    pub engaged: Option<bool>,
    pub last_contacted: Option<Option<NaiveDate>>,
    pub initials: Option<Initials>,
}

impl UpdateLead {
    /// Returns `true` when the patch would not change any column.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.company.is_none()
            && self.stage.is_none()
            && self.engaged.is_none()
            && self.last_contacted.is_none()
            && self.initials.is_none()
    }

    /// Fills in initials from a renamed lead unless the caller set them explicitly.
    #[must_use]
    pub fn with_derived_initials(mut self) -> Self {
        if self.initials.is_none()
            && let Some(name) = &self.name
        {
            self.initials = Some(Initials::from_name(name));
        }
        self
    }
}

/// One page of leads plus the number of leads matching the filters overall.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LeadsPage {
    pub leads: Vec<Lead>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(value: &str) -> LeadName {
        LeadName::new(value).unwrap()
    }

    #[test]
    fn new_lead_derives_missing_initials() {
        let lead = NewLead::new(
            name("Noah Chen"),
            LeadEmail::new("noah.chen@apex.com").unwrap(),
            CompanyName::new("Apex Technologies").unwrap(),
            Stage::new(3).unwrap(),
            false,
            None,
            None,
        );
        assert_eq!(lead.initials.as_str(), "NC");
    }

    #[test]
    fn new_lead_keeps_explicit_initials() {
        let lead = NewLead::new(
            name("Noah Chen"),
            LeadEmail::new("noah.chen@apex.com").unwrap(),
            CompanyName::new("Apex Technologies").unwrap(),
            Stage::default(),
            true,
            None,
            Some(Initials::new("NX").unwrap()),
        );
        assert_eq!(lead.initials.as_str(), "NX");
    }

    #[test]
    fn rename_rederives_initials() {
        let patch = UpdateLead {
            name: Some(name("Zara West")),
            ..UpdateLead::default()
        }
        .with_derived_initials();
        assert_eq!(patch.initials.unwrap().as_str(), "ZW");
        assert!(UpdateLead::default().with_derived_initials().is_empty());
    }

    #[test]
    fn lead_serializes_with_camel_case_keys() {
        let lead = Lead {
            id: LeadId::new(9).unwrap(),
            name: name("Iris Cole"),
            email: LeadEmail::new("iris.cole@drift.com").unwrap(),
            company: CompanyName::new("Drift Analytics").unwrap(),
            stage: Stage::new(4).unwrap(),
            engaged: true,
            last_contacted: NaiveDate::from_ymd_opt(2025, 1, 4),
            initials: Initials::new("IC").unwrap(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        };

        let json = serde_json::to_value(&lead).unwrap();
        assert_eq!(json["id"], 9);
        assert_eq!(json["lastContacted"], "2025-01-04");
        assert_eq!(json["stage"], 4);
        assert_eq!(json["initials"], "IC");
    }
}
