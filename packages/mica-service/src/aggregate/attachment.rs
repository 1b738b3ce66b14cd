use mica_domain::{
	record::{SourceType, UnifiedRecord},
	term::Vocabulary,
};
use mica_storage::models::AttachmentRow;

use crate::aggregate::{apply_terms, first_present, flags_of};

pub const COMMUNITY_LABEL: &str = "Community";

pub(crate) fn to_record(attachment: &AttachmentRow, vocabulary: &Vocabulary) -> UnifiedRecord {
	let mut record = UnifiedRecord::new(
		SourceType::UploadedAttachment,
		Some(attachment.attachment_id),
		&attachment.title,
	);

	record.authors = Some(
		fallback([
			attachment.author_tag.as_deref(),
			attachment.author_meta.as_deref(),
			attachment.author_term.as_deref(),
		])
		.to_string(),
	);
	record.origin_label = fallback([
		attachment.origin_tag.as_deref(),
		attachment.origin_meta.as_deref(),
		attachment.origin_term.as_deref(),
	])
	.to_string();
	record.canonical_url = attachment.permalink.clone();
	record.external_url =
		first_present([attachment.external_url.as_deref(), attachment.file_url.as_deref()])
			.map(str::to_string);
	record.year = attachment.year;
	record.flags = flags_of(attachment);

	apply_terms(&mut record, vocabulary, &attachment.terms);

	record
}

/// Explicit tag, then explicit meta field, then the taxonomy-assigned label, then `Community`.
fn fallback(chain: [Option<&str>; 3]) -> &str {
	first_present(chain).unwrap_or(COMMUNITY_LABEL)
}
