//! Full-text search over plain-text documents.
//!
//! Pairs a [tantivy] index with a query routing layer that understands
//! `name:`/`content:` field scoping, quoted phrases, and boolean syntax, and
//! a snippet extractor that pulls a bounded excerpt around the best matching
//! term of each hit.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use docsearch::{DocumentIndexer, DocumentSchema, DocumentSearcher, SearchConfig};
//!
//! # fn main() -> docsearch::Result<()> {
//! let indexer = DocumentIndexer::open_or_create(Path::new("index"), DocumentSchema::new())?;
//! indexer.index_directory(Path::new("data"))?;
//!
//! let searcher = DocumentSearcher::open(Path::new("index"), SearchConfig::default())?;
//! for hit in searcher.search("name:report content:\"data structures\"", 10)? {
//!     println!("{} ({:.4}): {}", hit.filename, hit.score, hit.snippet);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod indexer;
pub mod query;
pub mod schema;
pub mod searcher;
pub mod snippet;

pub use config::SearchConfig;
pub use error::{Error, Result};
pub use indexer::DocumentIndexer;
pub use query::{ComposedQuery, QueryRouter};
pub use schema::DocumentSchema;
pub use searcher::{DocumentSearcher, SearchResult};
pub use snippet::SnippetExtractor;
