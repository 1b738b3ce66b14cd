use std::collections::BTreeMap;

use serde_json::Value;

pub const PREDICATE_SET_SCHEMA_V1: &str = "catalog_predicate_set/v1";
pub const MAX_TEXT_TOKENS: usize = 16;

/// Boolean sub-resource checks a source knows how to answer for its own native rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Signal {
	CodeLink,
	DataLink,
	Figures,
	Identifiers,
	ProtocolMarked,
	ProtocolLinks,
}
impl Signal {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::CodeLink => "code_link",
			Self::DataLink => "data_link",
			Self::Figures => "figures",
			Self::Identifiers => "identifiers",
			Self::ProtocolMarked => "protocol_marked",
			Self::ProtocolLinks => "protocol_links",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RangeField {
	Year,
	RankScore,
}
impl RangeField {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Year => "year",
			Self::RankScore => "rank_score",
		}
	}
}

/// What a store row must expose for a [`Predicate`] to be evaluated against it directly.
pub trait Subject {
	fn subject_id(&self) -> Option<i64>;

	fn text_fields(&self) -> Vec<&str>;

	fn has_term(&self, dimension: &str, slug: &str) -> bool;

	fn rank_score(&self) -> i64;

	fn year(&self) -> Option<i32>;

	fn signal(&self, signal: Signal) -> bool;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
	All,
	Nothing,
	TextMatch { query: String },
	IdIn { ids: Vec<i64> },
	AttributeEquals { dimension: String, slug: String },
	Range { field: RangeField, min: Option<i64>, max: Option<i64> },
	FlagPresent { signal: Signal },
	And(Vec<Predicate>),
	Or(Vec<Predicate>),
}
impl Predicate {
	/// Conjunction with `All` dropped, nested `And` flattened, and any `Nothing` absorbing.
	pub fn and(nodes: impl IntoIterator<Item = Predicate>) -> Self {
		let mut out = Vec::new();

		for node in nodes {
			match node {
				Self::All => {},
				Self::Nothing => return Self::Nothing,
				Self::And(children) => out.extend(children),
				other => out.push(other),
			}
		}

		match out.len() {
			0 => Self::All,
			1 => out.pop().unwrap_or(Self::All),
			_ => Self::And(out),
		}
	}

	/// Disjunction with `Nothing` dropped, nested `Or` flattened, and any `All` absorbing.
	pub fn or(nodes: impl IntoIterator<Item = Predicate>) -> Self {
		let mut out = Vec::new();

		for node in nodes {
			match node {
				Self::Nothing => {},
				Self::All => return Self::All,
				Self::Or(children) => out.extend(children),
				other => out.push(other),
			}
		}

		match out.len() {
			0 => Self::Nothing,
			1 => out.pop().unwrap_or(Self::Nothing),
			_ => Self::Or(out),
		}
	}

	pub fn evaluate<S>(&self, subject: &S) -> bool
	where
		S: Subject + ?Sized,
	{
		match self {
			Self::All => true,
			Self::Nothing => false,
			Self::TextMatch { query } => text_matches(query, &subject.text_fields()),
			Self::IdIn { ids } => subject.subject_id().map(|id| ids.contains(&id)).unwrap_or(false),
			Self::AttributeEquals { dimension, slug } => subject.has_term(dimension, slug),
			Self::Range { field, min, max } => {
				let value = match field {
					RangeField::Year => subject.year().map(i64::from),
					RangeField::RankScore => Some(subject.rank_score().max(0)),
				};
				// A record without a year cannot satisfy a year bound.
				let Some(value) = value else { return min.is_none() && max.is_none() };

				min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
			},
			Self::FlagPresent { signal } => subject.signal(*signal),
			Self::And(nodes) => nodes.iter().all(|node| node.evaluate(subject)),
			Self::Or(nodes) => nodes.iter().any(|node| node.evaluate(subject)),
		}
	}

	pub fn to_value(&self) -> Value {
		match self {
			Self::All => serde_json::json!({ "op": "all" }),
			Self::Nothing => serde_json::json!({ "op": "nothing" }),
			Self::TextMatch { query } => serde_json::json!({ "op": "text", "value": query }),
			Self::IdIn { ids } => serde_json::json!({ "op": "id_in", "value": ids }),
			Self::AttributeEquals { dimension, slug } => {
				serde_json::json!({ "op": "attr_eq", "field": dimension, "value": slug })
			},
			Self::Range { field, min, max } => {
				serde_json::json!({ "op": "range", "field": field.as_str(), "min": min, "max": max })
			},
			Self::FlagPresent { signal } => {
				serde_json::json!({ "op": "flag", "field": signal.as_str() })
			},
			Self::And(nodes) => {
				serde_json::json!({ "op": "and", "args": Value::Array(nodes.iter().map(Self::to_value).collect()) })
			},
			Self::Or(nodes) => {
				serde_json::json!({ "op": "or", "args": Value::Array(nodes.iter().map(Self::to_value).collect()) })
			},
		}
	}
}

/// Slot a compiled clause occupies, so one request filter can be dropped again later.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Clause {
	Text,
	Ids,
	Attribute(String),
	Range(RangeField),
	Flag(String),
}
impl Clause {
	fn label(&self) -> String {
		match self {
			Self::Text => "text".to_string(),
			Self::Ids => "ids".to_string(),
			Self::Attribute(dimension) => format!("attr:{dimension}"),
			Self::Range(field) => format!("range:{}", field.as_str()),
			Self::Flag(name) => format!("flag:{name}"),
		}
	}
}

/// The AND of every compiled request filter, one clause per request parameter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PredicateSet {
	clauses: BTreeMap<Clause, Predicate>,
}
impl PredicateSet {
	pub fn insert(&mut self, clause: Clause, predicate: Predicate) {
		self.clauses.insert(clause, predicate);
	}

	pub fn get(&self, clause: &Clause) -> Option<&Predicate> {
		self.clauses.get(clause)
	}

	pub fn len(&self) -> usize {
		self.clauses.len()
	}

	pub fn is_empty(&self) -> bool {
		self.clauses.is_empty()
	}

	pub fn without(&self, clause: &Clause) -> Self {
		let mut out = self.clone();

		out.clauses.remove(clause);

		out
	}

	pub fn without_dimension(&self, dimension: &str) -> Self {
		self.without(&Clause::Attribute(dimension.to_string()))
	}

	pub fn root(&self) -> Predicate {
		Predicate::and(self.clauses.values().cloned())
	}

	/// Canonical form used for cache keys. Clause order is the map's sorted order.
	pub fn to_value(&self) -> Value {
		let clauses: serde_json::Map<String, Value> = self
			.clauses
			.iter()
			.map(|(clause, predicate)| (clause.label(), predicate.to_value()))
			.collect();

		serde_json::json!({ "schema": PREDICATE_SET_SCHEMA_V1, "clauses": clauses })
	}
}

/// Lowercased, deduplicated whitespace tokens of a free-text query.
pub fn text_tokens(query: &str) -> Vec<String> {
	let mut out: Vec<String> = Vec::new();

	for token in query.split_whitespace() {
		let token = token.to_lowercase();

		if out.contains(&token) {
			continue;
		}

		out.push(token);

		if out.len() >= MAX_TEXT_TOKENS {
			break;
		}
	}

	out
}

/// Every token must appear, case-insensitively, in at least one field.
pub fn text_matches(query: &str, fields: &[&str]) -> bool {
	let tokens = text_tokens(query);

	if tokens.is_empty() {
		return true;
	}

	let lowered: Vec<String> = fields.iter().map(|field| field.to_lowercase()).collect();

	tokens.iter().all(|token| lowered.iter().any(|field| field.contains(token.as_str())))
}
