use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const FLAG_HAS_CODE: &str = "has_code";
pub const FLAG_HAS_DATA: &str = "has_data";
pub const FLAG_HAS_FIGURES: &str = "has_figures";
pub const FLAG_HAS_IDENTIFIERS: &str = "has_identifiers";
pub const FLAG_HAS_PROTOCOLS: &str = "has_protocols";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
	/// A full document in the store, individually flagged or listed.
	PrimaryDocument,
	/// A community-submitted record with its own minimal metadata.
	UploadedAttachment,
	/// A link found inside another primary document's metadata.
	EmbeddedReference,
}
impl SourceType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::PrimaryDocument => "primary_document",
			Self::UploadedAttachment => "uploaded_attachment",
			Self::EmbeddedReference => "embedded_reference",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRef {
	pub name: String,
	pub slug: String,
	pub url: Option<String>,
}

/// The shape every source is normalized into before merge, rank, and pagination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnifiedRecord {
	pub id: Option<i64>,
	#[serde(rename = "type")]
	pub source_type: SourceType,
	pub title: String,
	pub authors: Option<String>,
	#[serde(rename = "permalink")]
	pub canonical_url: String,
	pub external_url: Option<String>,
	#[serde(rename = "source")]
	pub origin_label: String,
	pub rank_score: u64,
	pub year: Option<i32>,
	#[serde(flatten)]
	pub categorical_attributes: BTreeMap<String, Vec<TermRef>>,
	pub flags: BTreeMap<String, bool>,
	pub linked_record_id: Option<i64>,
}
impl UnifiedRecord {
	pub fn new(source_type: SourceType, id: Option<i64>, title: impl Into<String>) -> Self {
		Self {
			id,
			source_type,
			title: title.into(),
			authors: None,
			canonical_url: String::new(),
			external_url: None,
			origin_label: String::new(),
			rank_score: 0,
			year: None,
			categorical_attributes: BTreeMap::new(),
			flags: BTreeMap::new(),
			linked_record_id: None,
		}
	}

	pub fn terms(&self, dimension: &str) -> &[TermRef] {
		self.categorical_attributes.get(dimension).map(Vec::as_slice).unwrap_or_default()
	}

	pub fn has_term(&self, dimension: &str, slug: &str) -> bool {
		self.terms(dimension).iter().any(|term| term.slug == slug)
	}

	/// Replaces the terms of one dimension, keeping the first occurrence of each slug.
	pub fn set_terms(&mut self, dimension: impl Into<String>, terms: Vec<TermRef>) {
		self.categorical_attributes.insert(dimension.into(), dedup_terms(terms));
	}

	pub fn flag(&self, name: &str) -> bool {
		self.flags.get(name).copied().unwrap_or(false)
	}

	/// Negative or missing signals collapse to zero so ordering stays total.
	pub fn score_from(signal: Option<i64>) -> u64 {
		signal.and_then(|value| u64::try_from(value).ok()).unwrap_or(0)
	}
}

pub fn dedup_terms(terms: Vec<TermRef>) -> Vec<TermRef> {
	let mut out: Vec<TermRef> = Vec::with_capacity(terms.len());

	for term in terms {
		if out.iter().any(|existing| existing.slug == term.slug) {
			continue;
		}

		out.push(term);
	}

	out
}
