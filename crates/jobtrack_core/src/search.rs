//! In-memory search over the application collection.
//!
//! # Invariants
//! - Matching is case-insensitive substring on company name or role.
//! - An empty term returns the full collection in original order.
//! - The term is matched as typed; surrounding whitespace is significant.

use crate::model::application::JobApplication;

/// Returns applications whose company name or role contains `term`.
pub fn filter_applications(applications: &[JobApplication], term: &str) -> Vec<JobApplication> {
    if term.is_empty() {
        return applications.to_vec();
    }

    let needle = term.to_lowercase();
    applications
        .iter()
        .filter(|application| matches_term(application, &needle))
        .cloned()
        .collect()
}

fn matches_term(application: &JobApplication, needle: &str) -> bool {
    application.company_name.to_lowercase().contains(needle)
        || application.role.to_lowercase().contains(needle)
}
