use std::collections::HashSet;

use serde::Serialize;

use crate::core::table::DatasetTable;
use crate::thesaurus::Thesaurus;

/// One mandatory set of thesaurus group identifiers. A record satisfies the
/// requirement when at least one of its codes belongs to one of the groups.
#[derive(Debug, Clone)]
pub struct RequiredGroups {
    pub groups: HashSet<String>,
}

impl RequiredGroups {
    #[must_use]
    pub fn new<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }

    fn satisfied_by(&self, codes: &[String], thesaurus: &Thesaurus) -> bool {
        codes
            .iter()
            .filter_map(|code| thesaurus.group_of(code))
            .any(|group| self.groups.contains(group))
    }
}

/// Required-groups flag of one record
#[derive(Debug, Clone, Serialize)]
pub struct RequirementFlag {
    pub source: String,
    pub record: String,
    pub passed: bool,
}

/// Check every (source, record) of a test table against a list of mandatory
/// group sets. A record passes only when every set is satisfied. Plain
/// membership check, outside the classification core; results come back in
/// table order.
#[must_use]
pub fn check_required_groups(
    test_table: &DatasetTable,
    required: &[RequiredGroups],
    thesaurus: &Thesaurus,
) -> Vec<RequirementFlag> {
    let mut flags = Vec::new();
    for source in test_table.sources() {
        for record in source.records() {
            let passed = required
                .iter()
                .all(|req| req.satisfied_by(&record.codes, thesaurus));
            flags.push(RequirementFlag {
                source: source.id.clone(),
                record: record.id.clone(),
                passed,
            });
        }
    }
    flags
}
