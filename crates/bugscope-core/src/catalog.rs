#![forbid(unsafe_code)]

//! Ordered scenario collection with lookup by id.

use std::collections::HashSet;
use std::fmt;

use crate::scenario::Scenario;

/// Errors building a [`Catalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Two scenarios share an id.
    DuplicateId(String),
    /// A scenario has an empty id.
    EmptyId {
        /// Position of the offending scenario.
        index: usize,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::DuplicateId(id) => write!(f, "duplicate scenario id: {id}"),
            CatalogError::EmptyId { index } => write!(f, "scenario #{index} has an empty id"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Read-only, ordered set of scenarios.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    scenarios: Vec<Scenario>,
}

impl Catalog {
    /// Build a catalog, rejecting empty or duplicate ids.
    pub fn new(scenarios: Vec<Scenario>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(scenarios.len());
        for (index, scenario) in scenarios.iter().enumerate() {
            if scenario.id.is_empty() {
                return Err(CatalogError::EmptyId { index });
            }
            if !seen.insert(scenario.id.as_str()) {
                return Err(CatalogError::DuplicateId(scenario.id.clone()));
            }
        }
        Ok(Self { scenarios })
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Look up a scenario by id.
    pub fn get(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    /// Position of `id` in catalog order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.scenarios.iter().position(|s| s.id == id)
    }

    pub fn at(&self, index: usize) -> Option<&Scenario> {
        self.scenarios.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    /// Ids in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.scenarios.iter().map(|s| s.id.as_str())
    }

    /// Id after `id`, wrapping. With no current id, the first scenario.
    pub fn next_id(&self, id: Option<&str>) -> Option<&str> {
        let len = self.scenarios.len();
        if len == 0 {
            return None;
        }
        let next = match id.and_then(|id| self.position(id)) {
            Some(idx) => (idx + 1) % len,
            None => 0,
        };
        Some(self.scenarios[next].id.as_str())
    }

    /// Id before `id`, wrapping. With no current id, the last scenario.
    pub fn prev_id(&self, id: Option<&str>) -> Option<&str> {
        let len = self.scenarios.len();
        if len == 0 {
            return None;
        }
        let prev = match id.and_then(|id| self.position(id)) {
            Some(idx) => (idx + len - 1) % len,
            None => len - 1,
        };
        Some(self.scenarios[prev].id.as_str())
    }
}
