//! Report projection query handlers.

mod list_reports;

pub use list_reports::{ListReportsHandler, ListReportsQuery};
