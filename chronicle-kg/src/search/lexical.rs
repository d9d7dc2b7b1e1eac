//! BM25 lexical index backed by an in-RAM Tantivy index

use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::Value;
use tantivy::schema::{Field, Schema, STORED, STRING, TEXT};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use tracing::debug;
use uuid::Uuid;

use crate::error::{GraphError, Result};
use crate::search::text::lexical_query;

const WRITER_MEMORY_BYTES: usize = 20_000_000;

/// Keyword index keyed by UUID
pub struct LexicalIndex {
    index: Index,
    reader: IndexReader,
    writer: IndexWriter,
    id_field: Field,
    text_field: Field,
}

impl LexicalIndex {
    /// Create an empty index
    pub fn new() -> Result<Self> {
        let mut schema_builder = Schema::builder();
        let id_field = schema_builder.add_text_field("id", STRING | STORED);
        let text_field = schema_builder.add_text_field("text", TEXT);
        let schema = schema_builder.build();

        let index = Index::create_in_ram(schema);
        let writer = index.writer_with_num_threads(1, WRITER_MEMORY_BYTES)?;
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        Ok(Self {
            index,
            reader,
            writer,
            id_field,
            text_field,
        })
    }

    /// Index `text` under `id`, replacing any previous text for that id
    pub fn upsert(&mut self, id: Uuid, text: &str) -> Result<()> {
        let key = id.to_string();
        self.writer
            .delete_term(Term::from_field_text(self.id_field, &key));
        self.writer.add_document(doc!(
            self.id_field => key,
            self.text_field => text
        ))?;
        Ok(())
    }

    /// Make pending changes visible to searches
    pub fn commit(&mut self) -> Result<()> {
        self.writer.commit()?;
        self.reader.reload()?;
        Ok(())
    }

    /// Drop every document
    pub fn clear(&mut self) -> Result<()> {
        self.writer.delete_all_documents()?;
        self.commit()
    }

    /// BM25 search; ids in descending score order
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<(Uuid, f32)>> {
        let terms = lexical_query(query);
        if terms.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let searcher = self.reader.searcher();
        let parser = QueryParser::for_index(&self.index, vec![self.text_field]);
        let (parsed_query, errors) = parser.parse_query_lenient(&terms);
        if !errors.is_empty() {
            debug!("Lenient query parse of '{}' reported {} issue(s)", terms, errors.len());
        }

        let top_docs = searcher.search(&parsed_query, &TopDocs::with_limit(limit))?;

        let mut results = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let retrieved: TantivyDocument = searcher.doc(doc_address)?;
            let id = retrieved
                .get_first(self.id_field)
                .and_then(|v| v.as_str())
                .ok_or_else(|| GraphError::IndexError("document without id".to_string()))?;
            let id = Uuid::parse_str(id)
                .map_err(|e| GraphError::IndexError(format!("invalid id '{}': {}", id, e)))?;
            results.push((id, score));
        }

        Ok(results)
    }
}
