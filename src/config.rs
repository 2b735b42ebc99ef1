use serde::{Deserialize, Serialize};

/// Search tuning parameters, fixed at construction time.
///
/// Injected into [`crate::searcher::DocumentSearcher`] once; never mutated
/// afterwards, so searchers stay safe to share across threads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Score multiplier for unscoped query terms matching the filename field
    pub filename_boost: f32,

    /// Score multiplier for unscoped query terms matching the content field
    pub content_boost: f32,

    /// Maximum snippet length in characters
    pub max_snippet_length: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            filename_boost: 1.5,
            content_boost: 1.0,
            max_snippet_length: 150,
        }
    }
}
