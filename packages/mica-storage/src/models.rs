use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use mica_domain::{
	links,
	predicate::{Signal, Subject},
	term::Vocabulary,
};

pub const RECORD_KIND_DOCUMENT: &str = "document";
pub const RECORD_KIND_ATTACHMENT: &str = "attachment";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
	Paper,
	Tool,
}
impl DocumentKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Paper => "paper",
			Self::Tool => "tool",
		}
	}
}

/// Which slice of `catalog_documents` a listing reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DocumentScope {
	pub kind: DocumentKind,
	pub protocols_only: bool,
}
impl DocumentScope {
	pub fn papers() -> Self {
		Self { kind: DocumentKind::Paper, protocols_only: false }
	}

	pub fn protocols() -> Self {
		Self { kind: DocumentKind::Paper, protocols_only: true }
	}

	pub fn tools() -> Self {
		Self { kind: DocumentKind::Tool, protocols_only: false }
	}
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct DocumentRow {
	pub document_id: i64,
	#[serde(default = "default_kind")]
	pub kind: String,
	pub title: String,
	#[serde(default)]
	pub permalink: String,
	pub doi: Option<String>,
	pub url: Option<String>,
	pub journal: Option<String>,
	pub summary: Option<String>,
	pub authors: Option<String>,
	pub year: Option<i32>,
	pub citation_count: Option<i64>,
	pub star_count: Option<i64>,
	#[serde(default)]
	pub is_protocol: bool,
	pub github_url: Option<String>,
	pub data_url: Option<String>,
	pub figure_count: Option<i32>,
	pub rrids: Option<String>,
	/// Freeform field: a JSON list or map of links, or plain text containing URLs.
	pub protocols: Option<String>,
	#[sqlx(skip)]
	#[serde(default)]
	pub terms: BTreeMap<String, Vec<String>>,
}
impl DocumentRow {
	pub fn is_kind(&self, kind: DocumentKind) -> bool {
		self.kind == kind.as_str()
	}

	pub fn in_scope(&self, scope: DocumentScope) -> bool {
		self.is_kind(scope.kind) && (!scope.protocols_only || self.is_protocol)
	}

	/// Citation count for papers, star count for tools.
	pub fn rank_signal(&self) -> Option<i64> {
		if self.is_kind(DocumentKind::Tool) { self.star_count } else { self.citation_count }
	}

	/// True only when the freeform field yields at least one link. Unparsable JSON counts as
	/// absent.
	pub fn has_protocol_links(&self) -> bool {
		self.protocols.as_deref().map(links::has_links).unwrap_or(false)
	}

	fn document_signal(&self, signal: Signal) -> bool {
		match signal {
			Signal::CodeLink => is_present(self.github_url.as_deref()),
			Signal::DataLink => is_present(self.data_url.as_deref()),
			Signal::Figures => self.figure_count.unwrap_or(0) > 0,
			Signal::Identifiers => is_present(self.rrids.as_deref()),
			Signal::ProtocolMarked => self.is_protocol,
			Signal::ProtocolLinks => self.has_protocol_links(),
		}
	}

	fn document_text(&self) -> Vec<&str> {
		let mut fields = vec![self.title.as_str()];

		for value in [&self.summary, &self.authors, &self.doi, &self.journal] {
			if let Some(value) = value.as_deref() {
				fields.push(value);
			}
		}

		fields
	}

	fn has_document_term(&self, dimension: &str, slug: &str) -> bool {
		self.terms.get(dimension).map(|slugs| slugs.iter().any(|value| value == slug)).unwrap_or(false)
	}
}
impl Subject for DocumentRow {
	fn subject_id(&self) -> Option<i64> {
		Some(self.document_id)
	}

	fn text_fields(&self) -> Vec<&str> {
		self.document_text()
	}

	fn has_term(&self, dimension: &str, slug: &str) -> bool {
		self.has_document_term(dimension, slug)
	}

	fn rank_score(&self) -> i64 {
		self.rank_signal().unwrap_or(0)
	}

	fn year(&self) -> Option<i32> {
		self.year
	}

	fn signal(&self, signal: Signal) -> bool {
		self.document_signal(signal)
	}
}

/// A primary document seen as the parent of its embedded links. Links carry no ranking signal
/// of their own, so the rank score is always zero here; everything else is the parent's.
pub struct EmbeddingParent<'a>(pub &'a DocumentRow);
impl Subject for EmbeddingParent<'_> {
	fn subject_id(&self) -> Option<i64> {
		Some(self.0.document_id)
	}

	fn text_fields(&self) -> Vec<&str> {
		let mut fields = self.0.document_text();

		if let Some(protocols) = self.0.protocols.as_deref() {
			fields.push(protocols);
		}

		fields
	}

	fn has_term(&self, dimension: &str, slug: &str) -> bool {
		self.0.has_document_term(dimension, slug)
	}

	fn rank_score(&self) -> i64 {
		0
	}

	fn year(&self) -> Option<i32> {
		self.0.year
	}

	fn signal(&self, signal: Signal) -> bool {
		self.0.document_signal(signal)
	}
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttachmentRow {
	pub attachment_id: i64,
	pub title: String,
	#[serde(default)]
	pub permalink: String,
	pub file_url: Option<String>,
	pub external_url: Option<String>,
	pub description: Option<String>,
	pub author_tag: Option<String>,
	pub author_meta: Option<String>,
	pub author_term: Option<String>,
	pub origin_tag: Option<String>,
	pub origin_meta: Option<String>,
	pub origin_term: Option<String>,
	pub year: Option<i32>,
	pub github_url: Option<String>,
	pub data_url: Option<String>,
	#[sqlx(skip)]
	#[serde(default)]
	pub terms: BTreeMap<String, Vec<String>>,
}
impl Subject for AttachmentRow {
	fn subject_id(&self) -> Option<i64> {
		Some(self.attachment_id)
	}

	fn text_fields(&self) -> Vec<&str> {
		let mut fields = vec![self.title.as_str()];

		for value in [&self.description, &self.author_tag, &self.author_meta, &self.author_term] {
			if let Some(value) = value.as_deref() {
				fields.push(value);
			}
		}

		fields
	}

	fn has_term(&self, dimension: &str, slug: &str) -> bool {
		self.terms.get(dimension).map(|slugs| slugs.iter().any(|value| value == slug)).unwrap_or(false)
	}

	fn rank_score(&self) -> i64 {
		0
	}

	fn year(&self) -> Option<i32> {
		self.year
	}

	fn signal(&self, signal: Signal) -> bool {
		match signal {
			Signal::CodeLink => is_present(self.github_url.as_deref()),
			Signal::DataLink => is_present(self.data_url.as_deref()),
			Signal::Figures | Signal::Identifiers | Signal::ProtocolLinks => false,
			// Every upload is a protocol submission.
			Signal::ProtocolMarked => true,
		}
	}
}

/// The full catalog as a single JSON document, used by the snapshot backend and for seeding.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
	#[serde(default)]
	pub vocabulary: Vocabulary,
	#[serde(default)]
	pub documents: Vec<DocumentRow>,
	#[serde(default)]
	pub attachments: Vec<AttachmentRow>,
}

pub fn is_present(value: Option<&str>) -> bool {
	value.map(|value| !value.trim().is_empty()).unwrap_or(false)
}

fn default_kind() -> String {
	DocumentKind::Paper.as_str().to_string()
}
