use serde::Serialize;

use crate::domain::{Domain, DomainSet};

/// Domains present in both sets.
pub fn intersect(saved: &DomainSet, leaked: &DomainSet) -> DomainSet {
    saved.intersection(leaked)
}

/// Outcome of checking saved domains against a leak list.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub saved_count: usize,
    pub leaked_count: usize,
    pub endangered: DomainSet,
}

impl Comparison {
    pub fn new(saved: &DomainSet, leaked: &DomainSet) -> Self {
        Comparison {
            saved_count: saved.len(),
            leaked_count: leaked.len(),
            endangered: intersect(saved, leaked),
        }
    }

    pub fn sorted(&self) -> Vec<Domain> {
        self.endangered.to_sorted_vec()
    }

    /// Serializable view; `sort` orders the endangered list lexicographically.
    pub fn report(&self, sort: bool) -> Report {
        let endangered = if sort {
            self.sorted()
        } else {
            self.endangered.iter().cloned().collect()
        };
        Report {
            saved_domains: self.saved_count,
            leaked_domains: self.leaked_count,
            endangered_count: endangered.len(),
            endangered,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub saved_domains: usize,
    pub leaked_domains: usize,
    pub endangered_count: usize,
    pub endangered: Vec<Domain>,
}
