#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
	pub records: Vec<T>,
	pub total: u64,
	pub pages: u64,
	pub page: u64,
}

/// Clamps `page` to at least 1 and `per_page` to `[1, max_per_page]`, then slices. A page past
/// the end is empty; the totals still describe the whole set.
pub fn paginate<T>(records: Vec<T>, page: i64, per_page: i64, max_per_page: u32) -> Page<T> {
	let page = u64::try_from(page.max(1)).unwrap_or(1);
	let per_page = u64::try_from(per_page.clamp(1, i64::from(max_per_page.max(1)))).unwrap_or(1);
	let total = records.len() as u64;
	let pages = total.div_ceil(per_page);
	let start = usize::try_from((page - 1).saturating_mul(per_page)).unwrap_or(usize::MAX);
	let take = usize::try_from(per_page).unwrap_or(usize::MAX);
	let records = records.into_iter().skip(start).take(take).collect();

	Page { records, total, pages, page }
}

#[cfg(test)]
mod tests {
	use crate::paginate::paginate;

	#[test]
	fn slice_length_law_holds() {
		for total in [0_usize, 1, 23, 24, 25, 100] {
			for per_page in [1_i64, 7, 24, 100] {
				let pages = (total as u64).div_ceil(per_page as u64);

				for page in 1..=pages.max(1) + 1 {
					let slice = paginate((0..total).collect(), page as i64, per_page, 100);
					let expected = if page <= pages {
						(total as u64 - (page - 1) * per_page as u64).min(per_page as u64)
					} else {
						0
					};

					assert_eq!(slice.records.len() as u64, expected, "{total}/{per_page}/{page}");
					assert_eq!(slice.pages, pages);
					assert_eq!(slice.total, total as u64);
				}
			}
		}
	}

	#[test]
	fn clamps_out_of_range_input() {
		let low = paginate((0..50).collect::<Vec<_>>(), -4, 0, 100);
		let high = paginate((0..50).collect::<Vec<_>>(), 1, 1_000, 20);

		assert_eq!(low.page, 1);
		assert_eq!(low.records, vec![0]);
		assert_eq!(low.pages, 50);
		assert_eq!(high.records.len(), 20);
		assert_eq!(high.pages, 3);
	}

	#[test]
	fn empty_set_has_zero_pages() {
		let page = paginate(Vec::<u8>::new(), 1, 24, 100);

		assert_eq!((page.total, page.pages, page.page), (0, 0, 1));
		assert!(page.records.is_empty());
	}
}
