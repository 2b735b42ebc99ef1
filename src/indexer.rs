use std::fs;
use std::path::Path;

use tantivy::{Index, IndexWriter, directory::MmapDirectory, doc};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::schema::DocumentSchema;

/// Default heap size for the index writer (50MB)
pub const DEFAULT_WRITER_HEAP_SIZE: usize = 50_000_000;

/// Minimum heap size accepted by tantivy 0.24 (15MB)
pub const MIN_WRITER_HEAP_SIZE: usize = 15_000_000;

/// Handles indexing of plain-text documents
#[derive(Debug)]
pub struct DocumentIndexer {
    index: Index,
    schema: DocumentSchema,
}

impl DocumentIndexer {
    /// Create an indexer over an existing index handle
    pub fn new(index: Index, schema: DocumentSchema) -> Self {
        Self { index, schema }
    }

    /// Open the index at `dir`, creating the directory and index if absent
    pub fn open_or_create(dir: &Path, schema: DocumentSchema) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let mmap = MmapDirectory::open(dir)
            .map_err(|e| tantivy::TantivyError::SystemError(e.to_string()))?;
        let index = Index::open_or_create(mmap, schema.schema.clone())?;
        Ok(Self::new(index, schema))
    }

    /// Create an index held entirely in memory (for testing)
    pub fn create_in_ram(schema: DocumentSchema) -> Self {
        let index = Index::create_in_ram(schema.schema.clone());
        Self::new(index, schema)
    }

    /// The underlying index handle, shareable with a searcher
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Create an index writer
    pub fn create_writer(&self, heap_size: usize) -> Result<IndexWriter> {
        let actual_heap = heap_size.max(MIN_WRITER_HEAP_SIZE);
        Ok(self.index.writer(actual_heap)?)
    }

    /// Add a single document to the index
    pub fn index_document(
        &self,
        writer: &mut IndexWriter,
        filename: &str,
        content: &str,
    ) -> Result<()> {
        writer.add_document(doc!(
            self.schema.filename => filename,
            self.schema.content => content,
        ))?;
        Ok(())
    }

    /// Rebuild the index from every `.txt` file under `data_dir`, walking
    /// subdirectories recursively. Returns the number of files indexed.
    /// Unreadable files are logged and skipped, not fatal.
    pub fn index_directory(&self, data_dir: &Path) -> Result<usize> {
        let mut writer = self.create_writer(DEFAULT_WRITER_HEAP_SIZE)?;

        // Rebuild from scratch
        writer.delete_all_documents()?;

        let mut indexed = 0;
        let mut errors = 0;
        self.index_directory_inner(&mut writer, data_dir, &mut indexed, &mut errors)?;

        writer.commit()?;

        info!(
            "Indexed {} files from {} ({} errors)",
            indexed,
            data_dir.display(),
            errors
        );

        Ok(indexed)
    }

    fn index_directory_inner(
        &self,
        writer: &mut IndexWriter,
        dir: &Path,
        indexed: &mut usize,
        errors: &mut usize,
    ) -> Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                self.index_directory_inner(writer, &path, indexed, errors)?;
            } else if path.extension().is_some_and(|ext| ext == "txt") {
                match self.index_file(writer, &path) {
                    Ok(()) => *indexed += 1,
                    Err(e) => {
                        warn!("Failed to index {}: {}", path.display(), e);
                        *errors += 1;
                    }
                }
            }
        }
        Ok(())
    }

    fn index_file(&self, writer: &mut IndexWriter, path: &Path) -> Result<()> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content = fs::read_to_string(path)?;

        debug!("Indexing {}", path.display());
        self.index_document(writer, &filename, &content)
    }
}
