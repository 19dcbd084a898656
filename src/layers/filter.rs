use std::collections::BTreeSet;

use crate::layers::Resource;

/// Current search box and selector values. Empty selectors mean "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search: String,
    pub subject: Option<String>,
    pub semester: Option<String>,
    pub kind: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && selected(&self.subject).is_none()
            && selected(&self.semester).is_none()
            && selected(&self.kind).is_none()
    }
}

fn selected(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub struct Filter;

impl Filter {
    pub fn matches(resource: &Resource, criteria: &FilterCriteria) -> bool {
        let term = criteria.search.to_lowercase();
        let matches_search = resource.title.to_lowercase().contains(&term)
            || resource.subject.to_lowercase().contains(&term);
        let matches_subject =
            selected(&criteria.subject).map_or(true, |s| resource.subject == s);
        let matches_semester =
            selected(&criteria.semester).map_or(true, |s| resource.semester.to_string() == s);
        let matches_type = selected(&criteria.kind).map_or(true, |t| resource.kind.as_str() == t);

        matches_search && matches_subject && matches_semester && matches_type
    }

    /// Recomputes the filtered view from the full collection, preserving order.
    pub fn apply(all: &[Resource], criteria: &FilterCriteria) -> Vec<Resource> {
        all.iter()
            .filter(|r| {
                let keep = Self::matches(r, criteria);
                tracing::debug!("Candidate: {} (id {}) kept={}", r.title, r.id, keep);
                keep
            })
            .cloned()
            .collect()
    }

    /// Distinct subjects, sorted, for the subject selector.
    pub fn subject_options(all: &[Resource]) -> Vec<String> {
        all.iter()
            .map(|r| r.subject.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn count_label(count: usize) -> String {
        format!("{} resource{}", count, if count != 1 { "s" } else { "" })
    }
}
