/// Extracts a bounded, word-boundary-safe excerpt around the query term
/// occurring earliest in a document.
#[derive(Debug, Clone)]
pub struct SnippetExtractor {
    max_length: usize,
    context_before: usize,
    context_after: usize,
    boundary_margin: usize,
    min_term_length: usize,
}

impl SnippetExtractor {
    /// Create an extractor. `max_length` bounds the fallback excerpt taken
    /// from the start of the document when no query term matches.
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            context_before: 50,  // characters kept before the match
            context_after: 100,  // characters kept after the match
            boundary_margin: 20, // how far a cut may move to reach a space
            min_term_length: 3,  // shorter terms cannot anchor a snippet
        }
    }

    /// Extract the most relevant excerpt of `content` for `raw_query`.
    ///
    /// Never fails: with no matching term the leading `max_length` characters
    /// are returned, and empty content yields an empty string.
    pub fn extract(&self, content: &str, raw_query: &str) -> String {
        if content.is_empty() {
            return String::new();
        }

        let terms = candidate_terms(raw_query, self.min_term_length);

        let Some((position, length)) = find_first_match(content, &terms) else {
            return self.leading_fragment(content);
        };

        let mut start =
            floor_char_boundary(content, position.saturating_sub(self.context_before));
        let mut end = ceil_char_boundary(
            content,
            (position + length + self.context_after).min(content.len()),
        );

        // Move outward cuts to the nearest space so no word is split
        if start > 0 {
            if let Some(space) = content[..start].rfind(' ') {
                if space + self.boundary_margin > start {
                    start = space + 1;
                }
            }
        }
        if end < content.len() {
            if let Some(offset) = content[end..].find(' ') {
                if offset < self.boundary_margin {
                    end += offset;
                }
            }
        }

        let mut snippet = String::new();
        if start > 0 {
            snippet.push_str("...");
        }
        snippet.push_str(&content[start..end]);
        if end < content.len() {
            snippet.push_str("...");
        }
        snippet
    }

    /// Fallback when no query term occurs in the content
    fn leading_fragment(&self, content: &str) -> String {
        match content.char_indices().nth(self.max_length) {
            Some((cut, _)) => format!("{}...", &content[..cut]),
            None => content.to_string(),
        }
    }
}

impl Default for SnippetExtractor {
    fn default() -> Self {
        Self::new(150)
    }
}

/// Derive snippet anchor terms from the raw query: field prefixes, quote
/// characters, and boolean keywords carry no anchor value, and terms shorter
/// than `min_length` are too unselective to use.
fn candidate_terms(raw_query: &str, min_length: usize) -> Vec<String> {
    let cleaned = raw_query
        .replace("name:", "")
        .replace("content:", "")
        .replace('"', "")
        .replace("AND", "")
        .replace("OR", "")
        .replace("NOT", "");

    cleaned
        .split_whitespace()
        .filter(|term| term.chars().count() >= min_length)
        .map(str::to_string)
        .collect()
}

/// Find the earliest case-insensitive occurrence of any candidate term.
/// Ties on position go to the term appearing earlier in the list.
fn find_first_match(content: &str, terms: &[String]) -> Option<(usize, usize)> {
    let content_lower = content.to_lowercase();
    let mut best: Option<(usize, usize)> = None;

    for term in terms {
        let term_lower = term.to_lowercase();
        if let Some(position) = content_lower.find(&term_lower) {
            if best.map_or(true, |(b, _)| position < b) {
                best = Some((position, term_lower.len()));
            }
        }
    }

    best
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(s: &str, mut index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(index) {
        index += 1;
    }
    index
}
