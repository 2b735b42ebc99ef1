pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The raw query, or one of its field-scoped clauses, is not valid under
    /// the target field's grammar. The message is shown to the user verbatim.
    #[error("invalid query: {0}")]
    QueryGrammar(String),

    /// The underlying index could not be read or written.
    #[error("index error: {0}")]
    Index(#[from] tantivy::TantivyError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
