use std::{collections::HashMap, sync::Mutex, time::Duration};

use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

use mica_config::FacetCache as FacetCacheConfig;
use mica_domain::{predicate::PredicateSet, record::UnifiedRecord, term::Vocabulary};

use crate::{Error, Result, params::Surface};

const FACET_CACHE_SCHEMA_VERSION: i32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FacetCount {
	pub slug: String,
	pub name: String,
	pub url: Option<String>,
	pub count: u64,
}

/// Counts, for every term of `dimension` in vocabulary order, how many of `records` carry it.
/// `records` must come from the base predicate set, the one without this dimension's own clause.
pub fn count_facet(
	dimension: &str,
	vocabulary: &Vocabulary,
	records: &[UnifiedRecord],
) -> Vec<FacetCount> {
	vocabulary
		.terms(dimension)
		.iter()
		.map(|term| FacetCount {
			slug: term.slug.clone(),
			name: term.name.clone(),
			url: term.url.clone(),
			count: records.iter().filter(|record| record.has_term(dimension, &term.slug)).count()
				as u64,
		})
		.collect()
}

pub fn hash_cache_key(payload: &Value) -> Result<String> {
	let raw = serde_json::to_vec(payload).map_err(|err| Error::Storage {
		message: format!("Failed to encode cache key payload: {err}"),
	})?;

	Ok(blake3::hash(&raw).to_hex().to_string())
}

pub fn build_facet_cache_key(
	surface: Surface,
	dimension: &str,
	base: &PredicateSet,
) -> Result<String> {
	let payload = serde_json::json!({
		"kind": "facet_counts",
		"schema_version": FACET_CACHE_SCHEMA_VERSION,
		"surface": surface.as_str(),
		"dimension": dimension,
		"predicates": base.to_value(),
	});

	hash_cache_key(&payload)
}

pub fn cache_key_prefix(key: &str) -> &str {
	let len = key.len().min(12);

	&key[..len]
}

#[derive(Debug)]
struct CacheEntry {
	counts: Vec<FacetCount>,
	expires_at: OffsetDateTime,
}

/// Facet counts by `(surface, dimension, base predicate set)`. Entries expire after the
/// configured TTL; `invalidate` drops everything and is what record writes call.
#[derive(Debug)]
pub struct FacetCache {
	enabled: bool,
	ttl: Duration,
	max_entries: usize,
	entries: Mutex<HashMap<String, CacheEntry>>,
}
impl FacetCache {
	pub fn new(cfg: &FacetCacheConfig) -> Self {
		Self {
			enabled: cfg.enabled && cfg.max_entries > 0,
			ttl: Duration::from_secs(cfg.ttl_seconds),
			max_entries: cfg.max_entries,
			entries: Mutex::new(HashMap::new()),
		}
	}

	pub fn get(&self, key: &str, now: OffsetDateTime) -> Option<Vec<FacetCount>> {
		if !self.enabled {
			return None;
		}

		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		if let Some(entry) = entries.get(key)
			&& entry.expires_at > now
		{
			return Some(entry.counts.clone());
		}

		entries.remove(key);

		None
	}

	pub fn put(&self, key: String, counts: Vec<FacetCount>, now: OffsetDateTime) {
		if !self.enabled {
			return;
		}

		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.retain(|_, entry| entry.expires_at > now);

		while entries.len() >= self.max_entries {
			let Some(oldest) = entries
				.iter()
				.min_by_key(|(_, entry)| entry.expires_at)
				.map(|(key, _)| key.clone())
			else {
				break;
			};

			entries.remove(&oldest);
		}

		entries.insert(key, CacheEntry { counts, expires_at: now + self.ttl });
	}

	/// Drops every entry and returns how many there were.
	pub fn invalidate(&self) -> usize {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());
		let count = entries.len();

		entries.clear();

		count
	}

	pub fn len(&self) -> usize {
		self.entries.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
