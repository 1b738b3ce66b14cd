use mica_domain::record::UnifiedRecord;

/// Concatenates per-source lists in the order given. Records from different sources are never
/// merged with each other, even when they describe the same work.
pub fn merge(lists: Vec<Vec<UnifiedRecord>>) -> Vec<UnifiedRecord> {
	let mut out = Vec::with_capacity(lists.iter().map(Vec::len).sum());

	for list in lists {
		out.extend(list);
	}

	out
}

#[cfg(test)]
mod tests {
	use mica_domain::record::{SourceType, UnifiedRecord};

	use crate::merge::merge;

	#[test]
	fn keeps_every_record() {
		let same_title = |source_type, id| UnifiedRecord::new(source_type, id, "Same work");
		let lists = vec![
			vec![same_title(SourceType::PrimaryDocument, Some(1))],
			Vec::new(),
			vec![
				same_title(SourceType::UploadedAttachment, Some(1)),
				same_title(SourceType::EmbeddedReference, None),
				same_title(SourceType::EmbeddedReference, None),
			],
		];
		let expected: usize = lists.iter().map(Vec::len).sum();
		let merged = merge(lists);

		assert_eq!(merged.len(), expected);
		assert_eq!(merged[0].source_type, SourceType::PrimaryDocument);
		assert_eq!(merged[1].source_type, SourceType::UploadedAttachment);
	}
}
