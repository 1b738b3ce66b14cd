use mica_domain::{
	origin::{DEFAULT_ORIGIN_LABEL, OriginClassifier},
	record::{SourceType, UnifiedRecord},
	term::Vocabulary,
};
use mica_storage::models::DocumentRow;

use crate::aggregate::{apply_terms, first_present, flags_of};

pub(crate) fn to_record(
	doc: &DocumentRow,
	vocabulary: &Vocabulary,
	origins: &OriginClassifier,
) -> UnifiedRecord {
	let mut record =
		UnifiedRecord::new(SourceType::PrimaryDocument, Some(doc.document_id), &doc.title);
	let external_url = external_url(doc);

	record.authors = first_present([doc.authors.as_deref()]).map(str::to_string);
	record.canonical_url = doc.permalink.clone();
	record.origin_label = match first_present([doc.journal.as_deref()]) {
		Some(journal) => journal.to_string(),
		None => external_url
			.as_deref()
			.map(|url| origins.classify(url))
			.unwrap_or(DEFAULT_ORIGIN_LABEL)
			.to_string(),
	};
	record.external_url = external_url;
	record.rank_score = UnifiedRecord::score_from(doc.rank_signal());
	record.year = doc.year;
	record.flags = flags_of(doc);

	apply_terms(&mut record, vocabulary, &doc.terms);

	record
}

/// The document's own URL, else a DOI resolver link.
fn external_url(doc: &DocumentRow) -> Option<String> {
	if let Some(url) = first_present([doc.url.as_deref()]) {
		return Some(url.to_string());
	}

	first_present([doc.doi.as_deref()]).map(|doi| {
		if doi.starts_with("http://") || doi.starts_with("https://") {
			doi.to_string()
		} else {
			format!("https://doi.org/{doi}")
		}
	})
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;

	use mica_domain::{
		origin::OriginClassifier,
		term::{CanonicalTerm, Vocabulary},
	};
	use mica_storage::models::DocumentRow;

	use crate::aggregate::primary::to_record;

	#[test]
	fn normalizes_a_tool() {
		let mut vocabulary = Vocabulary::default();

		vocabulary.insert("technique", vec![CanonicalTerm::new("two_photon", "Two-Photon")]);
		vocabulary.insert("organism", vec![CanonicalTerm::new("mouse", "Mouse")]);

		let doc = DocumentRow {
			document_id: 7,
			kind: "tool".to_string(),
			title: "Suite2p".to_string(),
			url: Some("https://github.com/MouseLand/suite2p".to_string()),
			star_count: Some(900),
			citation_count: Some(3),
			github_url: Some("https://github.com/MouseLand/suite2p".to_string()),
			terms: BTreeMap::from([(
				"technique".to_string(),
				vec!["two_photon".to_string(), "retired-slug".to_string()],
			)]),
			..Default::default()
		};
		let origins = OriginClassifier::builtin().expect("builtin patterns compile");
		let record = to_record(&doc, &vocabulary, &origins);

		assert_eq!(record.rank_score, 900);
		assert_eq!(record.origin_label, "GitHub");
		assert_eq!(record.terms("technique").len(), 1);
		assert!(record.terms("organism").is_empty());
		assert!(record.categorical_attributes.contains_key("organism"));
		assert!(record.flag("has_code"));
		assert!(!record.flag("has_protocols"));
	}

	#[test]
	fn doi_becomes_a_resolver_link() {
		let doc = DocumentRow {
			document_id: 8,
			title: "Paper".to_string(),
			doi: Some("10.1000/xyz".to_string()),
			journal: Some("  ".to_string()),
			citation_count: Some(-3),
			..Default::default()
		};
		let origins = OriginClassifier::builtin().expect("builtin patterns compile");
		let record = to_record(&doc, &Vocabulary::default(), &origins);

		assert_eq!(record.external_url.as_deref(), Some("https://doi.org/10.1000/xyz"));
		assert_eq!(record.origin_label, "External");
		assert_eq!(record.rank_score, 0);
	}
}
