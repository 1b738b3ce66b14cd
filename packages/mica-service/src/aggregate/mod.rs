//! Source aggregators. Each one reads its own source through the store and normalizes rows into
//! [`UnifiedRecord`]s; field-name differences between sources stay inside these modules.

pub mod attachment;
pub mod embedded;
pub mod primary;

use std::collections::BTreeMap;

use mica_domain::{
	predicate::{Signal, Subject},
	record::{
		FLAG_HAS_CODE, FLAG_HAS_DATA, FLAG_HAS_FIGURES, FLAG_HAS_IDENTIFIERS, FLAG_HAS_PROTOCOLS,
		UnifiedRecord,
	},
	term::Vocabulary,
};
use mica_storage::models::DocumentScope;

/// One of the three independent sources a listing merges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
	Primary(DocumentScope),
	Attachments,
	Embedded,
}
impl Source {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Primary(_) => "primary_document",
			Self::Attachments => "uploaded_attachment",
			Self::Embedded => "embedded_reference",
		}
	}
}

/// Copies stored term slugs onto the record as full term references. Every vocabulary dimension
/// is present, possibly empty. Slugs the vocabulary no longer knows are dropped.
pub(crate) fn apply_terms(
	record: &mut UnifiedRecord,
	vocabulary: &Vocabulary,
	stored: &BTreeMap<String, Vec<String>>,
) {
	for dimension in vocabulary.dimensions() {
		let refs = stored
			.get(dimension)
			.map(|slugs| {
				slugs
					.iter()
					.filter_map(|slug| vocabulary.term(dimension, slug))
					.map(|term| term.to_ref())
					.collect()
			})
			.unwrap_or_default();

		record.set_terms(dimension, refs);
	}
}

pub(crate) fn flags_of<S>(subject: &S) -> BTreeMap<String, bool>
where
	S: Subject + ?Sized,
{
	BTreeMap::from([
		(FLAG_HAS_CODE.to_string(), subject.signal(Signal::CodeLink)),
		(FLAG_HAS_DATA.to_string(), subject.signal(Signal::DataLink)),
		(FLAG_HAS_FIGURES.to_string(), subject.signal(Signal::Figures)),
		(FLAG_HAS_IDENTIFIERS.to_string(), subject.signal(Signal::Identifiers)),
		(
			FLAG_HAS_PROTOCOLS.to_string(),
			subject.signal(Signal::ProtocolMarked) || subject.signal(Signal::ProtocolLinks),
		),
	])
}

/// First non-blank value, trimmed.
pub(crate) fn first_present<'a>(
	values: impl IntoIterator<Item = Option<&'a str>>,
) -> Option<&'a str> {
	values.into_iter().flatten().map(str::trim).find(|value| !value.is_empty())
}
