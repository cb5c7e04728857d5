//! Dashboard state machine.
//!
//! [`LeadsController`] owns the list parameters, selection and dialogs. It
//! never performs I/O: user actions return [`Effect`]s for the host to
//! execute, and the host reports results back through `on_fetch_*` and
//! `on_mutation_*`. Time is passed in explicitly.

use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

use chrono::NaiveDate;

use crate::client::cache::{LEADS_TAG, QueryCache};
use crate::client::debounce::Debouncer;
use crate::client::filters::{ActiveFilter, FilterKind, FilterSet};
use crate::client::form::{FormMode, LeadFormState, LeadPayload};
use crate::client::query::{DEFAULT_PAGE_SIZE, ListParams};
use crate::domain::lead::{Lead, LeadsPage};
use crate::domain::types::LeadId;
use crate::pagination::PageSummary;

/// A list request tagged with the cache epoch it was issued under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub params: ListParams,
    pub epoch: u64,
}

/// Work the host has to carry out on behalf of the controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Fetch(FetchTicket),
    Create(LeadPayload),
    Update(LeadId, LeadPayload),
    /// Single id or batch; sent as `DELETE /leads/5,7,9`.
    Delete(Vec<LeadId>),
}

/// What the table area shows.
#[derive(Debug, PartialEq)]
pub enum ListView<'a> {
    Loading,
    Ready(&'a LeadsPage),
    /// The fetch for the current parameters failed; no rows are shown.
    Failed(&'a str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mutation {
    Save,
    Delete,
}

#[derive(Debug)]
pub struct LeadsController {
    page: usize,
    page_size: usize,
    search_input: String,
    search: String,
    debouncer: Debouncer<String>,
    filters: FilterSet,
    draft: Option<FilterSet>,
    selected: BTreeSet<LeadId>,
    form: Option<LeadFormState>,
    pending_delete: Option<Vec<LeadId>>,
    delete_error: Option<String>,
    in_flight: Option<Mutation>,
    cache: QueryCache<ListParams, LeadsPage>,
    fetching: HashMap<ListParams, u64>,
    fetch_error: Option<(ListParams, String)>,
}

impl Default for LeadsController {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search_input: String::new(),
            search: String::new(),
            debouncer: Debouncer::default(),
            filters: FilterSet::default(),
            draft: None,
            selected: BTreeSet::new(),
            form: None,
            pending_delete: None,
            delete_error: None,
            in_flight: None,
            cache: QueryCache::new(),
            fetching: HashMap::new(),
            fetch_error: None,
        }
    }
}

impl LeadsController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial fetch for page 1 with default filters.
    pub fn start(&mut self) -> Vec<Effect> {
        self.ensure_fetch()
    }

    pub fn params(&self) -> ListParams {
        ListParams::new(self.page, self.page_size, &self.search, &self.filters)
    }

    fn ensure_fetch(&mut self) -> Vec<Effect> {
        let params = self.params();
        let epoch = self.cache.epoch(LEADS_TAG);

        if self.cache.contains(&params) || self.fetching.get(&params) == Some(&epoch) {
            return Vec::new();
        }

        self.fetching.insert(params.clone(), epoch);
        vec![Effect::Fetch(FetchTicket { params, epoch })]
    }

    fn reset_page(&mut self) -> Vec<Effect> {
        self.page = 1;
        self.ensure_fetch()
    }

    // Search

    /// Text currently in the search box.
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// Echoes the keystroke and restarts the quiet period.
    pub fn set_search_text(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        self.search_input.clone_from(&text);
        self.debouncer.schedule(text, now);
    }

    /// Commits the debounced search once its quiet period has elapsed.
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        match self.debouncer.poll(now) {
            Some(search) if search.trim() != self.search.trim() => {
                self.search = search;
                self.reset_page()
            }
            _ => Vec::new(),
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    // Paging

    pub fn set_page(&mut self, page: usize) -> Vec<Effect> {
        self.page = page.max(1);
        self.ensure_fetch()
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Vec<Effect> {
        self.page_size = page_size.max(1);
        self.reset_page()
    }

    /// Footer numbers for the current page, once its rows are known.
    pub fn summary(&self) -> Option<PageSummary> {
        self.current_page()
            .map(|page| PageSummary::new(self.page, self.page_size, page.count))
    }

    // Filters

    pub fn filters(&self) -> FilterSet {
        self.filters
    }

    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        self.filters.active()
    }

    /// Opens the filter popover with a copy of the applied filters.
    pub fn open_filters(&mut self) {
        self.draft = Some(self.filters);
    }

    /// Popover edits; nothing is fetched until [`Self::apply_filters`].
    pub fn draft_mut(&mut self) -> Option<&mut FilterSet> {
        self.draft.as_mut()
    }

    pub fn discard_filters(&mut self) {
        self.draft = None;
    }

    pub fn apply_filters(&mut self) -> Vec<Effect> {
        match self.draft.take() {
            Some(draft) => {
                self.filters = draft;
                self.reset_page()
            }
            None => Vec::new(),
        }
    }

    pub fn remove_filter(&mut self, kind: FilterKind) -> Vec<Effect> {
        self.filters.reset(kind);
        self.reset_page()
    }

    pub fn clear_filters(&mut self) -> Vec<Effect> {
        self.filters = FilterSet::default();
        if self.draft.is_some() {
            self.draft = Some(FilterSet::default());
        }
        self.reset_page()
    }

    // Selection

    pub fn selected(&self) -> Vec<LeadId> {
        self.selected.iter().copied().collect()
    }

    pub fn is_selected(&self, id: LeadId) -> bool {
        self.selected.contains(&id)
    }

    pub fn toggle_lead(&mut self, id: LeadId, checked: bool) {
        if checked {
            self.selected.insert(id);
        } else {
            self.selected.remove(&id);
        }
    }

    /// Checking selects every row of the visible page; unchecking clears all.
    pub fn select_all(&mut self, checked: bool) {
        if !checked {
            self.selected.clear();
            return;
        }
        if let Some(page) = self.cache.get(&self.params()) {
            self.selected = page.leads.iter().map(|lead| lead.id).collect();
        }
    }

    /// Header checkbox state: a non-empty page whose rows are all selected.
    pub fn is_all_selected(&self) -> bool {
        self.current_page().is_some_and(|page| {
            !page.leads.is_empty()
                && page
                    .leads
                    .iter()
                    .all(|lead| self.selected.contains(&lead.id))
        })
    }

    // Lead dialog

    pub fn form(&self) -> Option<&LeadFormState> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut LeadFormState> {
        self.form.as_mut().filter(|form| !form.is_submitting())
    }

    /// Opening a dialog is ignored while a save or delete is in flight.
    pub fn open_create(&mut self, today: NaiveDate) {
        if self.in_flight.is_none() {
            self.form = Some(LeadFormState::create(today));
        }
    }

    pub fn open_edit(&mut self, lead: &Lead) {
        if self.in_flight.is_none() {
            self.form = Some(LeadFormState::edit(lead));
        }
    }

    /// Closing is ignored while the save is in flight.
    pub fn close_form(&mut self) {
        if self.in_flight != Some(Mutation::Save) {
            self.form = None;
        }
    }

    pub fn submit_form(&mut self) -> Vec<Effect> {
        if self.in_flight.is_some() {
            return Vec::new();
        }
        let Some(form) = self.form.as_mut() else {
            return Vec::new();
        };

        match form.payload() {
            Ok(payload) => {
                form.begin_submit();
                self.in_flight = Some(Mutation::Save);
                match form.mode() {
                    FormMode::Create => vec![Effect::Create(payload)],
                    FormMode::Edit(id) => vec![Effect::Update(id, payload)],
                }
            }
            Err(message) => {
                form.fail(message);
                Vec::new()
            }
        }
    }

    // Delete confirmation

    pub fn pending_delete(&self) -> Option<&[LeadId]> {
        self.pending_delete.as_deref()
    }

    pub fn delete_error(&self) -> Option<&str> {
        self.delete_error.as_deref()
    }

    pub fn is_deleting(&self) -> bool {
        self.in_flight == Some(Mutation::Delete)
    }

    /// Ignored while a save or delete is in flight.
    pub fn request_delete(&mut self, id: LeadId) {
        if self.in_flight.is_none() {
            self.pending_delete = Some(vec![id]);
            self.delete_error = None;
        }
    }

    /// Asks to delete the whole selection. Does nothing when it is empty or
    /// another mutation is in flight.
    pub fn request_delete_selected(&mut self) {
        if self.in_flight.is_none() && !self.selected.is_empty() {
            self.pending_delete = Some(self.selected());
            self.delete_error = None;
        }
    }

    pub fn cancel_delete(&mut self) {
        if !self.is_deleting() {
            self.pending_delete = None;
            self.delete_error = None;
        }
    }

    pub fn confirm_delete(&mut self) -> Vec<Effect> {
        if self.in_flight.is_some() {
            return Vec::new();
        }
        match &self.pending_delete {
            Some(ids) => {
                self.delete_error = None;
                self.in_flight = Some(Mutation::Delete);
                vec![Effect::Delete(ids.clone())]
            }
            None => Vec::new(),
        }
    }

    // Results

    fn current_page(&self) -> Option<&LeadsPage> {
        self.cache.get(&self.params())
    }

    pub fn view(&self) -> ListView<'_> {
        let params = self.params();
        if let Some(page) = self.cache.get(&params) {
            return ListView::Ready(page);
        }
        match &self.fetch_error {
            Some((failed, message)) if *failed == params => ListView::Failed(message),
            _ => ListView::Loading,
        }
    }

    /// Caches the page. Responses for superseded parameters are cached but
    /// not displayed; responses issued before an invalidation are dropped and
    /// the current page is requested again.
    pub fn on_fetch_ok(&mut self, ticket: FetchTicket, page: LeadsPage) -> Vec<Effect> {
        if self.fetching.get(&ticket.params) == Some(&ticket.epoch) {
            self.fetching.remove(&ticket.params);
        }

        if self
            .cache
            .insert(ticket.params.clone(), LEADS_TAG, ticket.epoch, page)
            && self
                .fetch_error
                .as_ref()
                .is_some_and(|(failed, _)| *failed == ticket.params)
        {
            self.fetch_error = None;
        }

        self.ensure_fetch()
    }

    pub fn on_fetch_err(&mut self, ticket: FetchTicket, message: impl Into<String>) {
        if self.fetching.get(&ticket.params) == Some(&ticket.epoch) {
            self.fetching.remove(&ticket.params);
        }

        let is_current = ticket.params == self.params()
            && ticket.epoch == self.cache.epoch(LEADS_TAG);
        if is_current {
            self.fetch_error = Some((ticket.params, message.into()));
        }
    }

    /// Closes the finished dialog, invalidates every cached listing and
    /// refetches the current page.
    pub fn on_mutation_ok(&mut self) -> Vec<Effect> {
        match self.in_flight.take() {
            Some(Mutation::Save) => self.form = None,
            Some(Mutation::Delete) => {
                if let Some(ids) = self.pending_delete.take() {
                    for id in ids {
                        self.selected.remove(&id);
                    }
                }
                self.delete_error = None;
            }
            None => return Vec::new(),
        }

        self.cache.invalidate_tag(LEADS_TAG);
        self.fetching.clear();
        self.fetch_error = None;
        self.ensure_fetch()
    }

    /// Keeps the dialog open with the error shown inline.
    pub fn on_mutation_err(&mut self, message: impl Into<String>) {
        match self.in_flight.take() {
            Some(Mutation::Save) => {
                if let Some(form) = self.form.as_mut() {
                    form.fail(message);
                }
            }
            Some(Mutation::Delete) => self.delete_error = Some(message.into()),
            None => {}
        }
    }
}
