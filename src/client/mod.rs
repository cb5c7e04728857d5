//! Client-side state of the leads dashboard: list parameters, debounced
//! search, result cache, selection and dialogs.

pub mod cache;
pub mod controller;
pub mod debounce;
pub mod filters;
pub mod form;
pub mod query;

pub use controller::{Effect, FetchTicket, LeadsController, ListView};
