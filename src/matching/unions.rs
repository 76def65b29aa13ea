use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::thesaurus::Thesaurus;

#[derive(Error, Debug)]
pub enum UnionError {
    #[error("Failed to read union specification: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse union specification: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Group '{group}' appears in unions '{first}' and '{second}'")]
    AmbiguousGroup {
        group: String,
        first: String,
        second: String,
    },

    #[error("Code '{code}' appears in unions '{first}' and '{second}'")]
    AmbiguousCode {
        code: String,
        first: String,
        second: String,
    },
}

/// Serializable union specification: union name -> member list.
///
/// Two styles are accepted and may be mixed in one document:
/// - `groups`: members are thesaurus group identifiers (legacy style),
///   expanded to all codes the thesaurus assigns to those groups;
/// - `codes`: members are explicit annotation codes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnionSpec {
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub codes: BTreeMap<String, Vec<String>>,
}

/// One resolved union: a name and the codes it covers
#[derive(Debug, Clone)]
pub struct Union {
    pub name: String,
    pub codes: HashSet<String>,
    /// Group ids the union was declared over (empty for code-style entries)
    pub groups: HashSet<String>,
}

/// Resolved group unions: equivalence classes of mutually substitutable codes.
///
/// Both specification styles collapse to `union name -> set of codes` here,
/// so the classifier never sees which style a union came from. Unions are
/// disjoint by construction; an overlapping specification fails instead of
/// silently resolving to whichever union happens to come first.
#[derive(Debug, Default)]
pub struct UnionSet {
    unions: Vec<Union>,
    code_index: HashMap<String, usize>,
    group_index: HashMap<String, usize>,
}

impl UnionSet {
    /// Resolve a specification against the thesaurus group assignment
    pub fn from_spec(spec: &UnionSpec, thesaurus: &Thesaurus) -> Result<Self, UnionError> {
        let mut set = Self::default();

        for (name, group_ids) in &spec.groups {
            let idx = set.push_union(name);
            for group_id in group_ids {
                if let Some(&prev) = set.group_index.get(group_id) {
                    if prev != idx {
                        return Err(UnionError::AmbiguousGroup {
                            group: group_id.clone(),
                            first: set.unions[prev].name.clone(),
                            second: name.clone(),
                        });
                    }
                    continue;
                }
                set.group_index.insert(group_id.clone(), idx);
                set.unions[idx].groups.insert(group_id.clone());
                // A group id the thesaurus never assigns expands to no codes
                let codes: Vec<String> = thesaurus
                    .codes_in_group(group_id)
                    .map(ToString::to_string)
                    .collect();
                for code in codes {
                    set.claim_code(idx, code)?;
                }
            }
        }

        for (name, codes) in &spec.codes {
            let idx = set.push_union(name);
            for code in codes {
                set.claim_code(idx, code.clone())?;
            }
        }

        Ok(set)
    }

    fn push_union(&mut self, name: &str) -> usize {
        // The same name may carry both a group-style and a code-style entry
        if let Some(idx) = self.unions.iter().position(|u| u.name == name) {
            return idx;
        }
        self.unions.push(Union {
            name: name.to_string(),
            codes: HashSet::new(),
            groups: HashSet::new(),
        });
        self.unions.len() - 1
    }

    fn claim_code(&mut self, idx: usize, code: String) -> Result<(), UnionError> {
        if let Some(&prev) = self.code_index.get(&code) {
            if prev != idx {
                return Err(UnionError::AmbiguousCode {
                    code,
                    first: self.unions[prev].name.clone(),
                    second: self.unions[idx].name.clone(),
                });
            }
            return Ok(());
        }
        self.code_index.insert(code.clone(), idx);
        self.unions[idx].codes.insert(code);
        Ok(())
    }

    /// The union containing the given code, if any
    #[must_use]
    pub fn union_of_code(&self, code: &str) -> Option<&Union> {
        self.code_index.get(code).map(|&i| &self.unions[i])
    }

    /// The union declared over the given group id, if any
    #[must_use]
    pub fn union_of_group(&self, group_id: &str) -> Option<&Union> {
        self.group_index.get(group_id).map(|&i| &self.unions[i])
    }

    /// Does the code participate in any union?
    #[must_use]
    pub fn covers_code(&self, code: &str) -> bool {
        self.code_index.contains_key(code)
    }

    pub fn unions(&self) -> impl Iterator<Item = &Union> {
        self.unions.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unions.is_empty()
    }
}
