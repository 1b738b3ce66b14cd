use std::cmp::Ordering;

use mica_domain::record::{SourceType, UnifiedRecord};

use crate::params::{SortDirection, SortKey, SortSpec};

/// Sorts in place. Ties on the sort key fall back to title ascending, then to source and id, so
/// the order is the same for the same input no matter how the sources were merged.
pub fn sort(records: &mut [UnifiedRecord], order: SortSpec) {
	records.sort_by(|a, b| compare(a, b, order));
}

pub fn compare(a: &UnifiedRecord, b: &UnifiedRecord, order: SortSpec) -> Ordering {
	let primary = if order.primary_first {
		is_primary(b).cmp(&is_primary(a))
	} else {
		Ordering::Equal
	};
	let keyed = match order.key {
		SortKey::RankScore => directed(a.rank_score.cmp(&b.rank_score), order.direction),
		SortKey::Year => compare_years(a.year, b.year, order.direction),
		SortKey::Title => directed(compare_titles(a, b), order.direction),
	};

	primary
		.then(keyed)
		.then_with(|| compare_titles(a, b))
		.then_with(|| a.source_type.cmp(&b.source_type))
		.then_with(|| a.id.cmp(&b.id))
		.then_with(|| a.linked_record_id.cmp(&b.linked_record_id))
		.then_with(|| a.canonical_url.cmp(&b.canonical_url))
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
	match direction {
		SortDirection::Asc => ordering,
		SortDirection::Desc => ordering.reverse(),
	}
}

/// Undated records go last in either direction.
fn compare_years(a: Option<i32>, b: Option<i32>, direction: SortDirection) -> Ordering {
	match (a, b) {
		(Some(a), Some(b)) => directed(a.cmp(&b), direction),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	}
}

fn is_primary(record: &UnifiedRecord) -> bool {
	record.source_type == SourceType::PrimaryDocument
}

fn compare_titles(a: &UnifiedRecord, b: &UnifiedRecord) -> Ordering {
	a.title.to_lowercase().cmp(&b.title.to_lowercase()).then_with(|| a.title.cmp(&b.title))
}
