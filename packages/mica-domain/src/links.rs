//! Links held in a paper's freeform `protocols` field.
//!
//! The field holds a JSON list, a JSON map, or plain text. Lists may mix bare URL strings and
//! `{url, title}` objects; maps are scanned value by value. Plain text is searched for URLs.
//! Text that starts like JSON but does not parse yields no links.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

const MAX_JSON_DEPTH: usize = 4;
const URL_KEYS: [&str; 3] = ["url", "link", "href"];
const TITLE_KEYS: [&str; 2] = ["title", "name"];

static URL_PATTERN: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r#"https?://[^\s<>"'\)\]]+"#).ok());

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbeddedLink {
	pub url: String,
	pub title: Option<String>,
}

/// Extracts the distinct links of one field, in order of first appearance.
pub fn extract_links(raw: &str) -> Vec<EmbeddedLink> {
	let trimmed = raw.trim();

	if is_trivial_freeform(trimmed) {
		return Vec::new();
	}

	let mut links = Vec::new();

	if trimmed.starts_with('[') || trimmed.starts_with('{') {
		let Ok(value) = serde_json::from_str::<Value>(trimmed) else { return Vec::new() };

		collect_value(&value, 0, &mut links);
	} else {
		collect_text(trimmed, &mut links);
	}

	dedup_links(links)
}

/// True when the field yields at least one link.
pub fn has_links(raw: &str) -> bool {
	!extract_links(raw).is_empty()
}

/// True for values that carry no links at all: blank, `[]`, `{}`, `null`, or `""`.
pub fn is_trivial_freeform(raw: &str) -> bool {
	matches!(raw.trim(), "" | "[]" | "{}" | "null" | "\"\"")
}

fn collect_value(value: &Value, depth: usize, out: &mut Vec<EmbeddedLink>) {
	if depth > MAX_JSON_DEPTH {
		return;
	}

	match value {
		Value::String(text) => collect_text(text, out),
		Value::Array(items) =>
			for item in items {
				collect_value(item, depth + 1, out);
			},
		Value::Object(map) => {
			let url = URL_KEYS
				.iter()
				.filter_map(|key| map.get(*key).and_then(Value::as_str))
				.find_map(first_url);

			if let Some(url) = url {
				let title = TITLE_KEYS
					.iter()
					.filter_map(|key| map.get(*key).and_then(Value::as_str))
					.map(str::trim)
					.find(|title| !title.is_empty())
					.map(str::to_string);

				out.push(EmbeddedLink { url, title });

				return;
			}

			for item in map.values() {
				collect_value(item, depth + 1, out);
			}
		},
		Value::Null | Value::Bool(_) | Value::Number(_) => {},
	}
}

fn collect_text(text: &str, out: &mut Vec<EmbeddedLink>) {
	let Some(pattern) = URL_PATTERN.as_ref() else { return };

	for found in pattern.find_iter(text) {
		if let Some(url) = clean_url(found.as_str()) {
			out.push(EmbeddedLink { url, title: None });
		}
	}
}

fn first_url(text: &str) -> Option<String> {
	URL_PATTERN.as_ref()?.find(text).and_then(|found| clean_url(found.as_str()))
}

/// Drops sentence punctuation that the URL pattern swallows at the end.
fn clean_url(raw: &str) -> Option<String> {
	let url = raw.trim_end_matches(['.', ',', ';', ':']);

	if url.len() <= "https://".len() { None } else { Some(url.to_string()) }
}

fn dedup_links(links: Vec<EmbeddedLink>) -> Vec<EmbeddedLink> {
	let mut out: Vec<EmbeddedLink> = Vec::with_capacity(links.len());

	for link in links {
		match out.iter_mut().find(|existing| existing.url == link.url) {
			Some(existing) =>
				if existing.title.is_none() {
					existing.title = link.title;
				},
			None => out.push(link),
		}
	}

	out
}
