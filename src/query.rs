use tantivy::{
    Index,
    query::{BooleanQuery, Occur, Query, QueryParser},
};

use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::schema::DocumentSchema;

/// Document field a query clause can be scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryField {
    Filename,
    Content,
}

impl QueryField {
    /// Map a scoping prefix (without the colon) to its field
    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "name" => Some(QueryField::Filename),
            "content" => Some(QueryField::Content),
            _ => None,
        }
    }
}

/// A single token produced by scanning the raw query string
#[derive(Debug, Clone, PartialEq)]
pub enum QueryToken {
    /// A term bound to one field via a `name:`/`content:` prefix.
    /// Quoted phrases keep their quotes so the field grammar sees them.
    FieldTerm { field: QueryField, text: String },
    /// Unscoped text, searched across all fields
    PlainText(String),
}

/// Split a raw query string into field-scoped and plain tokens.
///
/// Scans left to right. A whitespace-delimited token starting with a
/// recognized field prefix becomes a [`QueryToken::FieldTerm`] whose term is
/// either a double-quoted phrase (which may span whitespace) or the maximal
/// run of non-whitespace characters. Everything else, including tokens with
/// unrecognized prefixes, becomes [`QueryToken::PlainText`].
pub fn tokenize(raw: &str) -> Vec<QueryToken> {
    let mut tokens = Vec::new();
    let mut chars = raw.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        if chars.peek().is_none() {
            break;
        }

        // Read the token head up to a ':' to check for a field prefix
        let mut head = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() || c == ':' {
                break;
            }
            head.push(c);
            chars.next();
        }

        if chars.peek() == Some(&':') {
            if let Some(field) = QueryField::from_prefix(&head) {
                chars.next();
                let text = read_field_term(&mut chars);
                // A prefix with an empty term is dropped silently
                if !text.is_empty() {
                    tokens.push(QueryToken::FieldTerm { field, text });
                }
                continue;
            }

            // Unrecognized prefix: the colon is not a scoping operator here,
            // so the whole run stays plain text
            let mut text = head;
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                text.push(c);
                chars.next();
            }
            tokens.push(QueryToken::PlainText(text));
            continue;
        }

        if !head.is_empty() {
            tokens.push(QueryToken::PlainText(head));
        }
    }

    tokens
}

/// Read the term following a field prefix: a quoted phrase or a
/// non-whitespace run. An unterminated quote is kept as-is so the field
/// grammar reports the unbalanced quote itself.
fn read_field_term(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    if chars.peek() == Some(&'"') {
        let mut text = String::from('"');
        chars.next();
        while let Some(ch) = chars.next() {
            text.push(ch);
            if ch == '"' {
                break;
            }
        }
        // An empty phrase carries no term
        if text == "\"\"" {
            return String::new();
        }
        return text;
    }

    let mut text = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            break;
        }
        text.push(c);
        chars.next();
    }
    text
}

/// An executable query, or the marker for input with no usable query text
#[derive(Debug)]
pub enum ComposedQuery {
    /// The raw query was empty or whitespace-only; matches no documents
    MatchNothing,
    Query(Box<dyn Query>),
}

/// Routes a raw query string into per-field sub-queries and composes them
/// into one executable query.
pub struct QueryRouter {
    index: Index,
    schema: DocumentSchema,
    config: SearchConfig,
}

impl std::fmt::Debug for QueryRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryRouter")
            .field("schema", &self.schema)
            .field("config", &self.config)
            .finish()
    }
}

impl QueryRouter {
    pub fn new(index: Index, schema: DocumentSchema, config: SearchConfig) -> Self {
        Self {
            index,
            schema,
            config,
        }
    }

    /// Split `raw` into field-scoped and general clauses, parse each through
    /// its field's grammar, and OR-combine every non-empty sub-query: any one
    /// clause matching a document makes that document a hit.
    pub fn route(&self, raw: &str) -> Result<ComposedQuery> {
        let mut filename_clause = String::new();
        let mut content_clause = String::new();
        let mut general_clause = String::new();

        for token in tokenize(raw) {
            match token {
                QueryToken::FieldTerm {
                    field: QueryField::Filename,
                    text,
                } => push_term(&mut filename_clause, &text),
                QueryToken::FieldTerm {
                    field: QueryField::Content,
                    text,
                } => push_term(&mut content_clause, &text),
                // The engine grammar reads ':' as a field scope, so unscoped
                // text must not carry it
                QueryToken::PlainText(text) => {
                    push_term(&mut general_clause, &text.replace(':', " "))
                }
            }
        }

        let mut subqueries: Vec<(Occur, Box<dyn Query>)> = Vec::new();

        if !filename_clause.is_empty() {
            let query = self.parse_field(QueryField::Filename, &filename_clause)?;
            subqueries.push((Occur::Should, query));
        }
        if !content_clause.is_empty() {
            let query = self.parse_field(QueryField::Content, &content_clause)?;
            subqueries.push((Occur::Should, query));
        }
        if !general_clause.is_empty() {
            let query = self.parse_general(&general_clause)?;
            subqueries.push((Occur::Should, query));
        }

        let query = match subqueries.len() {
            0 => return Ok(ComposedQuery::MatchNothing),
            1 => subqueries.into_iter().next().unwrap().1,
            _ => Box::new(BooleanQuery::new(subqueries)),
        };

        Ok(ComposedQuery::Query(query))
    }

    /// Parse a clause against a single field's grammar
    fn parse_field(&self, field: QueryField, clause: &str) -> Result<Box<dyn Query>> {
        let handle = match field {
            QueryField::Filename => self.schema.filename,
            QueryField::Content => self.schema.content,
        };
        let parser = QueryParser::for_index(&self.index, vec![handle]);
        parser
            .parse_query(clause)
            .map_err(|e| Error::QueryGrammar(e.to_string()))
    }

    /// Parse the general clause against both fields, biased toward filename
    /// matches by the configured boosts
    fn parse_general(&self, clause: &str) -> Result<Box<dyn Query>> {
        let mut parser = QueryParser::for_index(&self.index, self.schema.search_fields());
        parser.set_field_boost(self.schema.filename, self.config.filename_boost);
        parser.set_field_boost(self.schema.content, self.config.content_boost);
        parser
            .parse_query(clause)
            .map_err(|e| Error::QueryGrammar(e.to_string()))
    }
}

fn push_term(buffer: &mut String, text: &str) {
    if !buffer.is_empty() {
        buffer.push(' ');
    }
    buffer.push_str(text);
}
