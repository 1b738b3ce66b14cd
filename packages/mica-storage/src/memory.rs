//! In-memory catalog backend read from a JSON snapshot.
//!
//! Rows are filtered with the domain evaluator, so every predicate behaves the same way it does
//! once compiled to SQL for the Postgres backend.

use std::{fs, path::Path};

use mica_domain::{predicate::Predicate, term::Vocabulary};

use crate::{
	Error, Result,
	models::{AttachmentRow, CatalogSnapshot, DocumentRow, DocumentScope, EmbeddingParent},
};

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
	snapshot: CatalogSnapshot,
}
impl MemoryStore {
	pub fn new(snapshot: CatalogSnapshot) -> Self {
		Self { snapshot }
	}

	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let raw = fs::read_to_string(path)
			.map_err(|source| Error::ReadSnapshot { path: path.to_path_buf(), source })?;
		let snapshot: CatalogSnapshot = serde_json::from_str(&raw)
			.map_err(|source| Error::ParseSnapshot { path: path.to_path_buf(), source })?;

		tracing::info!(
			path = %path.display(),
			documents = snapshot.documents.len(),
			attachments = snapshot.attachments.len(),
			"Catalog snapshot loaded."
		);

		Ok(Self::new(snapshot))
	}

	pub fn snapshot(&self) -> &CatalogSnapshot {
		&self.snapshot
	}

	pub fn vocabulary(&self) -> &Vocabulary {
		&self.snapshot.vocabulary
	}

	pub fn documents(&self, scope: DocumentScope, predicate: &Predicate) -> Vec<DocumentRow> {
		self.snapshot
			.documents
			.iter()
			.filter(|doc| doc.in_scope(scope) && predicate.evaluate(*doc))
			.cloned()
			.collect()
	}

	pub fn embedding_parents(&self, predicate: &Predicate) -> Vec<DocumentRow> {
		let papers = DocumentScope::papers();

		self.snapshot
			.documents
			.iter()
			.filter(|doc| {
				doc.in_scope(papers)
					&& doc.has_protocol_links()
					&& predicate.evaluate(&EmbeddingParent(doc))
			})
			.cloned()
			.collect()
	}

	pub fn attachments(&self, predicate: &Predicate) -> Vec<AttachmentRow> {
		self.snapshot
			.attachments
			.iter()
			.filter(|attachment| predicate.evaluate(*attachment))
			.cloned()
			.collect()
	}
}
