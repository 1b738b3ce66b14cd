//! Canonical vocabulary and facet-value resolution.
//!
//! Facet values arrive as dropdown slugs, autocomplete text, or slugs from older links. They are
//! resolved against one dimension's vocabulary in a fixed order and the first step that hits wins:
//!
//! 1. exact canonical slug
//! 2. exact slug after folding `-`, `_`, and spaces to one separator
//! 3. case-insensitive display name
//! 4. substring of the normalized name in either direction, in vocabulary order
//!
//! A miss is not an error. Callers turn it into a filter that matches nothing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::record::TermRef;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalTerm {
	pub slug: String,
	pub name: String,
	#[serde(default)]
	pub url: Option<String>,
}
impl CanonicalTerm {
	pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
		Self { slug: slug.into(), name: name.into(), url: None }
	}

	pub fn to_ref(&self) -> TermRef {
		TermRef { name: self.name.clone(), slug: self.slug.clone(), url: self.url.clone() }
	}
}

/// Every dimension's terms, each list kept in stored order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary {
	dimensions: BTreeMap<String, Vec<CanonicalTerm>>,
}
impl Vocabulary {
	pub fn insert(&mut self, dimension: impl Into<String>, terms: Vec<CanonicalTerm>) {
		self.dimensions.insert(dimension.into(), terms);
	}

	pub fn push(&mut self, dimension: &str, term: CanonicalTerm) {
		self.dimensions.entry(dimension.to_string()).or_default().push(term);
	}

	pub fn dimensions(&self) -> impl Iterator<Item = &str> {
		self.dimensions.keys().map(String::as_str)
	}

	pub fn contains_dimension(&self, dimension: &str) -> bool {
		self.dimensions.contains_key(dimension)
	}

	pub fn terms(&self, dimension: &str) -> &[CanonicalTerm] {
		self.dimensions.get(dimension).map(Vec::as_slice).unwrap_or_default()
	}

	pub fn term(&self, dimension: &str, slug: &str) -> Option<&CanonicalTerm> {
		self.terms(dimension).iter().find(|term| term.slug == slug)
	}

	pub fn resolve(&self, dimension: &str, raw: &str) -> Option<&CanonicalTerm> {
		resolve(self.terms(dimension), raw)
	}

	/// Terms in any dimension whose normalized name contains the normalized query.
	pub fn names_containing(&self, query: &str) -> Vec<(&str, &CanonicalTerm)> {
		let needle = normalize_name(query);

		if needle.is_empty() {
			return Vec::new();
		}

		let mut out = Vec::new();

		for (dimension, terms) in &self.dimensions {
			for term in terms {
				if normalize_name(&term.name).contains(needle.as_str()) {
					out.push((dimension.as_str(), term));
				}
			}
		}

		out
	}
}

pub fn resolve<'a>(terms: &'a [CanonicalTerm], raw: &str) -> Option<&'a CanonicalTerm> {
	let raw = raw.trim();

	if raw.is_empty() {
		return None;
	}
	if let Some(term) = terms.iter().find(|term| term.slug == raw) {
		return Some(term);
	}

	let folded = fold_separators(raw);

	if let Some(term) = terms.iter().find(|term| fold_separators(&term.slug) == folded) {
		return Some(term);
	}

	let lowered = raw.to_lowercase();

	if let Some(term) = terms.iter().find(|term| term.name.trim().to_lowercase() == lowered) {
		return Some(term);
	}

	let needle = normalize_name(raw);

	if needle.is_empty() {
		return None;
	}

	terms.iter().find(|term| {
		let name = normalize_name(&term.name);

		!name.is_empty() && (name.contains(needle.as_str()) || needle.contains(name.as_str()))
	})
}

/// Lowercases and folds `_` and whitespace runs into `-`, so `two_photon`, `two-photon`, and
/// `Two Photon` compare equal.
pub fn fold_separators(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());
	let mut pending = false;

	for ch in raw.trim().chars() {
		if ch == '-' || ch == '_' || ch.is_whitespace() {
			pending = true;

			continue;
		}
		if pending && !out.is_empty() {
			out.push('-');
		}

		pending = false;

		out.extend(ch.to_lowercase());
	}

	out
}

/// NFKC, lowercase, every non-alphanumeric run collapsed to a single space.
pub fn normalize_name(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());
	let mut pending = false;

	for ch in raw.nfkc() {
		if !ch.is_alphanumeric() {
			pending = true;

			continue;
		}
		if pending && !out.is_empty() {
			out.push(' ');
		}

		pending = false;

		out.extend(ch.to_lowercase());
	}

	out
}
