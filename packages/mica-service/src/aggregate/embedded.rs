//! Links embedded in a paper's freeform `protocols` field, listed as records of their own.

use mica_domain::{
	links::{EmbeddedLink, extract_links},
	origin::OriginClassifier,
	predicate::{Predicate, Signal, Subject},
	record::{SourceType, UnifiedRecord},
	term::Vocabulary,
};
use mica_storage::models::DocumentRow;

use crate::aggregate::{apply_terms, flags_of};

/// Expands matching parents into one record per link. Each link is checked against `predicate`
/// on its own, with the link URL and title searchable next to the parent's fields.
pub(crate) fn to_records(
	parents: &[DocumentRow],
	predicate: &Predicate,
	vocabulary: &Vocabulary,
	origins: &OriginClassifier,
) -> Vec<UnifiedRecord> {
	let mut out = Vec::new();

	for parent in parents {
		let Some(raw) = parent.protocols.as_deref() else { continue };

		for link in extract_links(raw) {
			let subject = LinkSubject { parent, link: &link };

			if !predicate.evaluate(&subject) {
				continue;
			}

			out.push(to_record(parent, &link, vocabulary, origins));
		}
	}

	out
}

fn to_record(
	parent: &DocumentRow,
	link: &EmbeddedLink,
	vocabulary: &Vocabulary,
	origins: &OriginClassifier,
) -> UnifiedRecord {
	let origin = origins.classify(&link.url);
	let title = match link.title.as_deref() {
		Some(title) => title.to_string(),
		None => format!("{} ({origin})", parent.title),
	};
	let mut record = UnifiedRecord::new(SourceType::EmbeddedReference, None, title);

	record.authors = parent.authors.clone();
	record.canonical_url = link.url.clone();
	record.external_url = Some(link.url.clone());
	record.origin_label = origin.to_string();
	record.year = parent.year;
	record.flags = flags_of(parent);
	record.linked_record_id = Some(parent.document_id);

	apply_terms(&mut record, vocabulary, &parent.terms);

	record
}

/// A single link read with its parent's attributes. Links have no ranking signal of their own.
struct LinkSubject<'a> {
	parent: &'a DocumentRow,
	link: &'a EmbeddedLink,
}
impl Subject for LinkSubject<'_> {
	fn subject_id(&self) -> Option<i64> {
		Some(self.parent.document_id)
	}

	fn text_fields(&self) -> Vec<&str> {
		let mut fields = self.parent.text_fields();

		fields.push(self.link.url.as_str());

		if let Some(title) = self.link.title.as_deref() {
			fields.push(title);
		}

		fields
	}

	fn has_term(&self, dimension: &str, slug: &str) -> bool {
		self.parent.has_term(dimension, slug)
	}

	fn rank_score(&self) -> i64 {
		0
	}

	fn year(&self) -> Option<i32> {
		self.parent.year
	}

	fn signal(&self, signal: Signal) -> bool {
		self.parent.signal(signal)
	}
}

#[cfg(test)]
mod tests {
	use mica_domain::{origin::OriginClassifier, predicate::Predicate, term::Vocabulary};
	use mica_storage::models::DocumentRow;

	use crate::aggregate::embedded::to_records;

	#[test]
	fn records_inherit_from_the_parent() {
		let parent = DocumentRow {
			document_id: 41,
			kind: "paper".to_string(),
			title: "Cortical Dynamics".to_string(),
			year: Some(2017),
			citation_count: Some(300),
			protocols: Some(
				"https://www.protocols.io/view/a https://lab.example.org/steps".to_string(),
			),
			..Default::default()
		};
		let origins = OriginClassifier::builtin().expect("builtin patterns compile");
		let records = to_records(&[parent], &Predicate::All, &Vocabulary::default(), &origins);

		assert_eq!(records.len(), 2);
		assert!(records.iter().all(|record| record.id.is_none()));
		assert!(records.iter().all(|record| record.linked_record_id == Some(41)));
		assert!(records.iter().all(|record| record.rank_score == 0 && record.year == Some(2017)));
		assert_eq!(records[0].title, "Cortical Dynamics (protocols.io)");
		assert_eq!(records[1].origin_label, "External");
		assert!(records[0].flag("has_protocols"));
	}

	#[test]
	fn each_link_is_filtered_on_its_own() {
		let parent = DocumentRow {
			document_id: 42,
			kind: "paper".to_string(),
			title: "Parent".to_string(),
			protocols: Some(
				r#"[{"url": "https://www.jove.com/v/9", "title": "Perfusion"}, "https://osf.io/x"]"#
					.to_string(),
			),
			..Default::default()
		};
		let origins = OriginClassifier::builtin().expect("builtin patterns compile");
		let records = to_records(
			&[parent],
			&Predicate::TextMatch { query: "perfusion".to_string() },
			&Vocabulary::default(),
			&origins,
		);

		assert_eq!(records.len(), 1);
		assert_eq!(records[0].title, "Perfusion");
	}
}
