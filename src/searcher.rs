use std::path::Path;

use serde::{Deserialize, Serialize};
use tantivy::{Index, IndexReader, TantivyDocument, collector::TopDocs, schema::Value};
use tracing::debug;

use crate::config::SearchConfig;
use crate::error::Result;
use crate::query::{ComposedQuery, QueryRouter};
use crate::schema::DocumentSchema;
use crate::snippet::SnippetExtractor;

/// A single ranked hit returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub filename: String,
    pub snippet: String,
    pub score: f32,
}

/// Runs searches against the document index: routes the raw query, executes
/// it, and assembles ranked results with relevance snippets.
pub struct DocumentSearcher {
    schema: DocumentSchema,
    reader: IndexReader,
    router: QueryRouter,
    snippets: SnippetExtractor,
}

impl std::fmt::Debug for DocumentSearcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentSearcher")
            .field("schema", &self.schema)
            .field("router", &self.router)
            .finish()
    }
}

impl DocumentSearcher {
    /// Create a searcher over an existing index handle
    pub fn new(index: Index, schema: DocumentSchema, config: SearchConfig) -> Result<Self> {
        let reader = index
            .reader_builder()
            .reload_policy(tantivy::ReloadPolicy::OnCommitWithDelay)
            .try_into()?;

        let snippets = SnippetExtractor::new(config.max_snippet_length);
        let router = QueryRouter::new(index, schema.clone(), config);

        Ok(Self {
            schema,
            reader,
            router,
            snippets,
        })
    }

    /// Open the index stored at `dir` for searching. The index must already
    /// exist; a completed build phase commits before readers open the path.
    pub fn open(dir: &Path, config: SearchConfig) -> Result<Self> {
        let index = Index::open_in_dir(dir)?;
        Self::new(index, DocumentSchema::new(), config)
    }

    /// Reload the reader to see newly committed changes
    pub fn reload(&self) -> Result<()> {
        self.reader.reload()?;
        Ok(())
    }

    /// Number of documents visible to the current reader
    pub fn num_documents(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    /// Run a search, returning up to `max_results` hits in the engine's
    /// ranking order. An empty or whitespace-only query yields no hits.
    pub fn search(&self, raw_query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let query = match self.router.route(raw_query)? {
            ComposedQuery::MatchNothing => return Ok(Vec::new()),
            ComposedQuery::Query(query) => query,
        };
        if max_results == 0 {
            return Ok(Vec::new());
        }

        let searcher = self.reader.searcher();
        let top_docs = searcher.search(&query, &TopDocs::with_limit(max_results))?;

        debug!("Query '{}' produced {} hits", raw_query, top_docs.len());

        let mut results = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher.doc(doc_address)?;
            results.push(self.doc_to_result(&doc, score, raw_query));
        }

        Ok(results)
    }

    /// Assemble the caller-facing record for one hit. The snippet is anchored
    /// on the original query text, not the composed query.
    fn doc_to_result(&self, doc: &TantivyDocument, score: f32, raw_query: &str) -> SearchResult {
        let filename = get_text_field(doc, self.schema.filename);
        let content = get_text_field(doc, self.schema.content);
        let snippet = self.snippets.extract(&content, raw_query);

        SearchResult {
            filename,
            snippet,
            score,
        }
    }
}

fn get_text_field(doc: &TantivyDocument, field: tantivy::schema::Field) -> String {
    doc.get_first(field)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::indexer::{DocumentIndexer, MIN_WRITER_HEAP_SIZE};
    use tempfile::TempDir;

    fn setup_test_index(docs: &[(&str, &str)]) -> (DocumentSearcher, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let indexer =
            DocumentIndexer::open_or_create(temp_dir.path(), DocumentSchema::new()).unwrap();

        let mut writer = indexer.create_writer(MIN_WRITER_HEAP_SIZE).unwrap();
        for (filename, content) in docs {
            indexer.index_document(&mut writer, filename, content).unwrap();
        }
        writer.commit().unwrap();

        let searcher = DocumentSearcher::new(
            indexer.index().clone(),
            DocumentSchema::new(),
            SearchConfig::default(),
        )
        .unwrap();
        (searcher, temp_dir)
    }

    #[test]
    fn test_general_search() {
        let (searcher, _temp) = setup_test_index(&[
            ("alpha.txt", "hello world"),
            ("beta.txt", "unrelated text"),
        ]);

        let results = searcher.search("hello", 10).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].filename, "alpha.txt");
        assert!(results[0].score > 0.0);
    }

    #[test]
    fn test_name_scope_does_not_match_content() {
        let (searcher, _temp) = setup_test_index(&[
            ("report.txt", "nothing interesting here"),
            ("notes.md", "see report.txt for the details"),
        ]);

        let results = searcher.search("name:report.txt", 10).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].filename, "report.txt");
    }

    #[test]
    fn test_content_phrase_requires_word_order() {
        let (searcher, _temp) = setup_test_index(&[
            ("a.txt", "a course on data structures and algorithms"),
            ("b.txt", "structures of data in modern systems"),
        ]);

        let results = searcher
            .search("content:\"data structures\"", 10)
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].filename, "a.txt");
    }

    #[test]
    fn test_all_clauses_are_or_combined() {
        let (searcher, _temp) = setup_test_index(&[
            ("alpha.txt", "lorem ipsum"),
            ("beta.txt", "gamma rays explained"),
            ("other.txt", "epsilon appears here"),
        ]);

        // Field-scoped clauses on different fields both contribute hits
        let results = searcher.search("name:alpha content:gamma", 10).unwrap();
        let mut filenames: Vec<_> = results.iter().map(|r| r.filename.as_str()).collect();
        filenames.sort_unstable();
        assert_eq!(filenames, vec!["alpha.txt", "beta.txt"]);

        // A general clause joins the OR alongside a scoped one
        let results = searcher.search("name:alpha epsilon", 10).unwrap();
        let mut filenames: Vec<_> = results.iter().map(|r| r.filename.as_str()).collect();
        filenames.sort_unstable();
        assert_eq!(filenames, vec!["alpha.txt", "other.txt"]);
    }

    #[test]
    fn test_filename_match_ranks_above_content_match() {
        let (searcher, _temp) = setup_test_index(&[
            (
                "rust.txt",
                "an essay about systems programming in general terms",
            ),
            (
                "other.txt",
                "this longer document mentions rust somewhere in the middle of its content",
            ),
        ]);

        let results = searcher.search("rust", 10).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].filename, "rust.txt");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_empty_query_returns_no_results() {
        let (searcher, _temp) = setup_test_index(&[("a.txt", "content")]);

        assert!(searcher.search("", 10).unwrap().is_empty());
        assert!(searcher.search("   \t ", 10).unwrap().is_empty());
    }

    #[test]
    fn test_zero_limit_returns_no_results() {
        let (searcher, _temp) = setup_test_index(&[("a.txt", "content")]);

        assert!(searcher.search("content", 0).unwrap().is_empty());
    }

    #[test]
    fn test_unbalanced_quote_surfaces_grammar_error() {
        let (searcher, _temp) = setup_test_index(&[("a.txt", "content")]);

        let err = searcher.search("content:\"unterminated", 10).unwrap_err();
        assert!(matches!(err, Error::QueryGrammar(_)));
    }

    #[test]
    fn test_snippet_anchored_on_original_query() {
        let padding = "padding ".repeat(40);
        let content = format!("{padding}the elephant stands here {padding}");
        let (searcher, _temp) = setup_test_index(&[("zoo.txt", content.as_str())]);

        let results = searcher.search("content:elephant", 10).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].snippet.contains("elephant"));
        assert!(results[0].snippet.starts_with("..."));
    }

    #[test]
    fn test_results_follow_engine_ranking_order() {
        let (searcher, _temp) = setup_test_index(&[
            ("sparse.txt", "needle buried in a very long stretch of filler words that dilute term frequency for ranking purposes"),
            ("dense.txt", "needle needle needle"),
        ]);

        let results = searcher.search("needle", 10).unwrap();
        assert_eq!(results.len(), 2);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_reload_sees_new_commits() {
        let temp_dir = TempDir::new().unwrap();
        let indexer =
            DocumentIndexer::open_or_create(temp_dir.path(), DocumentSchema::new()).unwrap();
        let searcher = DocumentSearcher::new(
            indexer.index().clone(),
            DocumentSchema::new(),
            SearchConfig::default(),
        )
        .unwrap();

        let mut writer = indexer.create_writer(MIN_WRITER_HEAP_SIZE).unwrap();
        indexer
            .index_document(&mut writer, "late.txt", "late arrival")
            .unwrap();
        writer.commit().unwrap();

        searcher.reload().unwrap();
        assert_eq!(searcher.num_documents(), 1);
        assert_eq!(searcher.search("late", 10).unwrap().len(), 1);
    }

    #[test]
    fn test_search_result_serializes_for_callers() {
        let result = SearchResult {
            filename: "a.txt".to_string(),
            snippet: "...a snippet...".to_string(),
            score: 1.25,
        };

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"filename\":\"a.txt\""));

        let back: SearchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.filename, result.filename);
    }
}
