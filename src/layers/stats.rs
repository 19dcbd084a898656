use std::collections::HashSet;

use crate::layers::Resource;

/// Summary numbers for the statistics panel. Always derived from the full
/// collection, never the filtered view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    pub total_resources: usize,
    pub total_downloads: u64,
    pub total_subjects: usize,
    pub total_semesters: usize,
}

impl Statistics {
    pub fn from_resources(all: &[Resource]) -> Self {
        let subjects: HashSet<&str> = all.iter().map(|r| r.subject.as_str()).collect();
        let semesters: HashSet<i32> = all.iter().map(|r| r.semester).collect();

        Self {
            total_resources: all.len(),
            total_downloads: all.iter().map(Resource::downloads).sum(),
            total_subjects: subjects.len(),
            total_semesters: semesters.len(),
        }
    }
}
