//! Request parameters as they arrive in the query string.
//!
//! Parsing never fails. Values that do not parse are treated as absent and keys that are not
//! recognized here are kept in `attributes`, where the filter compiler checks them against the
//! vocabulary's dimensions.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Error, Result};

pub const PARAM_SEARCH: &str = "search";
pub const PARAM_IDS: &str = "ids";
pub const PARAM_YEAR_MIN: &str = "year_min";
pub const PARAM_YEAR_MAX: &str = "year_max";
pub const PARAM_CITATIONS_MIN: &str = "citations_min";
pub const PARAM_CITATIONS_MAX: &str = "citations_max";
pub const PARAM_STARS_MIN: &str = "stars_min";
pub const PARAM_STARS_MAX: &str = "stars_max";
pub const PARAM_ORDERBY: &str = "orderby";
pub const PARAM_ORDER: &str = "order";
pub const PARAM_PRIMARY_FIRST: &str = "primary_first";
pub const PARAM_PAGE: &str = "page";
pub const PARAM_PER_PAGE: &str = "per_page";

pub const FLAG_PARAMS: [&str; 5] = [
	mica_domain::record::FLAG_HAS_CODE,
	mica_domain::record::FLAG_HAS_DATA,
	mica_domain::record::FLAG_HAS_FIGURES,
	mica_domain::record::FLAG_HAS_IDENTIFIERS,
	mica_domain::record::FLAG_HAS_PROTOCOLS,
];

/// A listing page. Each surface reads a different slice of the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
	/// Flagged protocol papers, community uploads, and links embedded in other papers.
	Protocols,
	Papers,
	Tools,
}
impl Surface {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Protocols => "protocols",
			Self::Papers => "papers",
			Self::Tools => "tools",
		}
	}

	pub fn parse(raw: &str) -> Result<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"protocols" => Ok(Self::Protocols),
			"papers" => Ok(Self::Papers),
			"tools" => Ok(Self::Tools),
			other => Err(Error::NotFound { message: format!("Unknown catalog surface {other:?}.") }),
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
	#[default]
	RankScore,
	Year,
	Title,
}
impl SortKey {
	fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"citations" | "stars" | "rank_score" | "rank" => Some(Self::RankScore),
			"year" | "date" => Some(Self::Year),
			"title" => Some(Self::Title),
			_ => None,
		}
	}

	pub fn default_direction(self) -> SortDirection {
		match self {
			Self::RankScore | Self::Year => SortDirection::Desc,
			Self::Title => SortDirection::Asc,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
	Asc,
	Desc,
}
impl SortDirection {
	fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"asc" => Some(Self::Asc),
			"desc" => Some(Self::Desc),
			_ => None,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortSpec {
	pub key: SortKey,
	pub direction: SortDirection,
	/// Primary documents ahead of everything else, before the sort key applies.
	pub primary_first: bool,
}
impl Default for SortSpec {
	fn default() -> Self {
		Self { key: SortKey::RankScore, direction: SortDirection::Desc, primary_first: false }
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchParams {
	pub search: Option<String>,
	pub ids: Option<Vec<i64>>,
	pub year_min: Option<i64>,
	pub year_max: Option<i64>,
	pub citations_min: Option<i64>,
	pub citations_max: Option<i64>,
	pub stars_min: Option<i64>,
	pub stars_max: Option<i64>,
	/// Flag parameters that were set to a true value.
	pub flags: Vec<String>,
	pub sort: SortSpec,
	pub page: Option<i64>,
	pub per_page: Option<i64>,
	/// Every other non-empty parameter, candidate categorical filters.
	pub attributes: BTreeMap<String, String>,
}
impl SearchParams {
	pub fn from_query(query: &BTreeMap<String, String>) -> Self {
		let mut params = Self::default();
		let mut key = None;
		let mut direction = None;

		for (name, value) in query {
			let value = value.trim();

			match name.as_str() {
				PARAM_SEARCH =>
					if !value.is_empty() {
						params.search = Some(value.to_string());
					},
				PARAM_IDS => params.ids = parse_ids(value),
				PARAM_YEAR_MIN => params.year_min = parse_int(value),
				PARAM_YEAR_MAX => params.year_max = parse_int(value),
				PARAM_CITATIONS_MIN => params.citations_min = parse_int(value),
				PARAM_CITATIONS_MAX => params.citations_max = parse_int(value),
				PARAM_STARS_MIN => params.stars_min = parse_int(value),
				PARAM_STARS_MAX => params.stars_max = parse_int(value),
				PARAM_ORDERBY => key = SortKey::parse(value),
				PARAM_ORDER => direction = SortDirection::parse(value),
				PARAM_PRIMARY_FIRST => params.sort.primary_first = parse_bool(value),
				PARAM_PAGE => params.page = parse_int(value),
				PARAM_PER_PAGE => params.per_page = parse_int(value),
				flag if FLAG_PARAMS.contains(&flag) => {
					if parse_bool(value) {
						params.flags.push(flag.to_string());
					}
				},
				other =>
					if !value.is_empty() {
						params.attributes.insert(other.to_string(), value.to_string());
					},
			}
		}

		let key = key.unwrap_or_default();

		params.sort.key = key;
		params.sort.direction = direction.unwrap_or_else(|| key.default_direction());

		params
	}

	/// The tighter of the citation and star lower bounds. Both constrain the rank score.
	pub fn rank_min(&self) -> Option<i64> {
		match (self.citations_min, self.stars_min) {
			(Some(a), Some(b)) => Some(a.max(b)),
			(a, b) => a.or(b),
		}
	}

	pub fn rank_max(&self) -> Option<i64> {
		match (self.citations_max, self.stars_max) {
			(Some(a), Some(b)) => Some(a.min(b)),
			(a, b) => a.or(b),
		}
	}
}

/// `1`, `true`, `yes`, and `on` (any case) are true; everything else is false.
pub fn parse_bool(raw: &str) -> bool {
	matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn parse_int(raw: &str) -> Option<i64> {
	raw.trim().parse().ok()
}

/// Comma-separated ids. Pieces that are not integers are dropped; no valid piece means no
/// restriction.
fn parse_ids(raw: &str) -> Option<Vec<i64>> {
	let ids: Vec<i64> = raw.split(',').filter_map(parse_int).collect();

	if ids.is_empty() { None } else { Some(ids) }
}
