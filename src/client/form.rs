//! Add/edit lead dialog.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::lead::Lead;
use crate::domain::types::{Initials, LeadId, LeadName, Stage};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(LeadId),
}

/// JSON body sent to `POST /leads` or `PATCH /leads/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPayload {
    pub name: String,
    pub email: String,
    pub company: String,
    pub stage: i32,
    pub engaged: bool,
    pub last_contacted: Option<NaiveDate>,
    pub initials: String,
}

/// Field values of the open dialog plus its submit status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeadFormState {
    mode: FormMode,
    pub name: String,
    pub email: String,
    pub company: String,
    pub stage: Stage,
    pub engaged: bool,
    pub last_contacted: Option<NaiveDate>,
    error: Option<String>,
    submitting: bool,
}

impl LeadFormState {
    /// Blank form; last contacted defaults to `today`.
    pub fn create(today: NaiveDate) -> Self {
        Self {
            mode: FormMode::Create,
            name: String::new(),
            email: String::new(),
            company: String::new(),
            stage: Stage::default(),
            engaged: false,
            last_contacted: Some(today),
            error: None,
            submitting: false,
        }
    }

    pub fn edit(lead: &Lead) -> Self {
        Self {
            mode: FormMode::Edit(lead.id),
            name: lead.name.to_string(),
            email: lead.email.to_string(),
            company: lead.company.to_string(),
            stage: lead.stage,
            engaged: lead.engaged,
            last_contacted: lead.last_contacted,
            error: None,
            submitting: false,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add New Lead",
            FormMode::Edit(_) => "Edit Lead",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match (self.submitting, self.mode) {
            (true, _) => "Saving...",
            (false, FormMode::Create) => "Add Lead",
            (false, FormMode::Edit(_)) => "Update Lead",
        }
    }

    /// Inline error shown under the fields.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Submit and cancel are disabled while a save is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Checks the required fields and builds the request body.
    pub fn payload(&self) -> Result<LeadPayload, &'static str> {
        let name = self.name.trim();
        let email = self.email.trim();
        let company = self.company.trim();
        if name.is_empty() || email.is_empty() || company.is_empty() {
            return Err(REQUIRED_FIELDS_MESSAGE);
        }

        let initials = LeadName::new(name)
            .map(|name| Initials::from_name(&name).into_inner())
            .map_err(|_| REQUIRED_FIELDS_MESSAGE)?;

        Ok(LeadPayload {
            name: name.to_string(),
            email: email.to_string(),
            company: company.to_string(),
            stage: self.stage.get(),
            engaged: self.engaged,
            last_contacted: self.last_contacted,
            initials,
        })
    }

    pub(crate) fn begin_submit(&mut self) {
        self.error = None;
        self.submitting = true;
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.submitting = false;
    }
}

/// `Jan 23, 2025`, or `-` when the lead was never contacted.
pub fn format_last_contacted(date: Option<NaiveDate>) -> String {
    date.map(|date| date.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 23).unwrap()
    }

    #[test]
    fn blank_fields_are_rejected_before_dispatch() {
        let mut form = LeadFormState::create(today());
        form.name = "Emma Blake".into();
        form.email = "   ".into();
        form.company = "Flux".into();

        assert_eq!(form.payload(), Err(REQUIRED_FIELDS_MESSAGE));
    }

    #[test]
    fn payload_derives_initials_and_trims() {
        let mut form = LeadFormState::create(today());
        form.name = " milo park ".into();
        form.email = "milo.park@echo.com".into();
        form.company = "Echo".into();

        let payload = form.payload().unwrap();

        assert_eq!(payload.name, "milo park");
        assert_eq!(payload.initials, "MP");
        assert_eq!(payload.last_contacted, Some(today()));
        assert_eq!(payload.stage, 1);
    }

    #[test]
    fn failure_keeps_input_and_reenables_submit() {
        let mut form = LeadFormState::create(today());
        form.name = "Emma".into();
        form.begin_submit();
        assert_eq!(form.submit_label(), "Saving...");

        form.fail("Database error: locked");

        assert!(!form.is_submitting());
        assert_eq!(form.error(), Some("Database error: locked"));
        assert_eq!(form.name, "Emma");
        assert_eq!(form.submit_label(), "Add Lead");
    }

    #[test]
    fn dates_render_short_month() {
        assert_eq!(format_last_contacted(Some(today())), "Jan 23, 2025");
        assert_eq!(
            format_last_contacted(NaiveDate::from_ymd_opt(2025, 2, 5)),
            "Feb 5, 2025"
        );
        assert_eq!(format_last_contacted(None), "-");
    }
}
