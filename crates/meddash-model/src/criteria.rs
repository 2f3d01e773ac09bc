//! Filter criteria for the roster view.

use serde::{Deserialize, Serialize};

/// Sentinel value meaning "no restriction" for specialty and status.
pub const ALL: &str = "all";

/// The current search/specialty/status selection.
///
/// Unset fields and the [`ALL`] sentinel are no-ops. Search is matched
/// case-insensitively; specialty and status are exact, case-sensitive matches.
///
/// # Example
///
/// ```rust
/// use meddash_model::DoctorFilter;
///
/// let criteria = DoctorFilter::new()
///     .with_search("Chen")
///     .with_specialty("Orthopedics");
///
/// assert_eq!(criteria.search_term().as_deref(), Some("chen"));
/// assert_eq!(criteria.specialty_constraint(), Some("Orthopedics"));
/// assert_eq!(criteria.status_constraint(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoctorFilter {
    /// Free-text search over name, specialty, email and address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Exact specialty, or `"all"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    /// Exact status wire name, or `"all"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl DoctorFilter {
    /// Creates criteria that select everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search term.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Sets the specialty.
    pub fn with_specialty(mut self, specialty: impl Into<String>) -> Self {
        self.specialty = Some(specialty.into());
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Returns the lower-cased search term, if one is in effect.
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Returns the specialty to match, if one is in effect.
    pub fn specialty_constraint(&self) -> Option<&str> {
        constraint(self.specialty.as_deref())
    }

    /// Returns the status to match, if one is in effect.
    pub fn status_constraint(&self) -> Option<&str> {
        constraint(self.status.as_deref())
    }

    /// Returns true if these criteria select every record.
    pub fn is_unrestricted(&self) -> bool {
        self.search_term().is_none()
            && self.specialty_constraint().is_none()
            && self.status_constraint().is_none()
    }
}

fn constraint(value: Option<&str>) -> Option<&str> {
    value.filter(|v| *v != ALL)
}
