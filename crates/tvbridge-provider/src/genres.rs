//! Free-text genre classification.

use std::collections::HashMap;

use crate::config::Configuration;

/// Maps backend genre text onto the operator's canonical tags.
///
/// Built from the configuration table at construction time. Create one
/// per logical request batch: the table may change between operations,
/// so instances must not be cached across calls.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct GenreMapper {
    /// Lower-cased genre text to configured tags.
    table: HashMap<String, Vec<String>>,
}

impl GenreMapper {
    /// Builds a mapper from the configuration snapshot.
    #[must_use]
    pub fn new(config: &Configuration) -> Self {
        let table = config
            .genre_mappings
            .iter()
            .map(|m| (m.genre.trim().to_lowercase(), m.tags.clone()))
            .collect();
        Self { table }
    }

    /// Returns the canonical tags for a genre, or the literal genre text
    /// as a single-element fallback when the table has no entry.
    #[must_use]
    pub fn map(&self, genre: &str) -> Vec<String> {
        self.table
            .get(&genre.trim().to_lowercase())
            .cloned()
            .unwrap_or_else(|| vec![String::from(genre)])
    }
}
