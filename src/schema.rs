use tantivy::schema::{Field, STORED, Schema, TEXT};

/// Document index schema definition
#[derive(Clone, Debug)]
pub struct DocumentSchema {
    pub schema: Schema,
    pub filename: Field,
    pub content: Field,
}

impl DocumentSchema {
    /// Create a new document schema
    pub fn new() -> Self {
        let mut builder = Schema::builder();

        // Tokenized with positions so phrase queries work against the name too
        let filename = builder.add_text_field("filename", TEXT | STORED);

        // Stored so snippets can be computed from the full text at search time
        let content = builder.add_text_field("content", TEXT | STORED);

        let schema = builder.build();

        Self {
            schema,
            filename,
            content,
        }
    }

    /// Fields searched by unscoped query text
    pub fn search_fields(&self) -> Vec<Field> {
        vec![self.filename, self.content]
    }
}

impl Default for DocumentSchema {
    fn default() -> Self {
        Self::new()
    }
}
