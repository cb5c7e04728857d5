//! Response bodies returned by the JSON routes.

pub mod leads;
