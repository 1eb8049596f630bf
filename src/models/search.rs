//! Search request model.

use serde::{Deserialize, Serialize};

/// Default cap on the number of identifiers a search returns
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// A query in the literature database's own syntax, bounded by a result count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Query string (full PubMed syntax, e.g. `cancer AND 2023[pdat]`)
    pub query: String,

    /// Maximum number of identifiers to return
    pub max_results: usize,
}

impl SearchQuery {
    /// Create a new search query with the default result cap
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Set maximum results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }
}
