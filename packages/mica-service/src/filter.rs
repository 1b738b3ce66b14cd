use mica_domain::{
	predicate::{Clause, Predicate, PredicateSet, RangeField, Signal},
	record::{
		FLAG_HAS_CODE, FLAG_HAS_DATA, FLAG_HAS_FIGURES, FLAG_HAS_IDENTIFIERS, FLAG_HAS_PROTOCOLS,
	},
	term::Vocabulary,
};

use crate::params::SearchParams;

/// Turns request parameters into one clause per active filter. Never fails: a categorical value
/// that does not resolve becomes `Nothing` for its dimension, and parameters that name no
/// dimension are ignored.
pub fn compile(params: &SearchParams, vocabulary: &Vocabulary) -> PredicateSet {
	let mut set = PredicateSet::default();

	if let Some(query) = params.search.as_deref() {
		set.insert(Clause::Text, text_predicate(query, vocabulary));
	}
	if let Some(ids) = params.ids.as_ref() {
		set.insert(Clause::Ids, Predicate::IdIn { ids: ids.clone() });
	}

	for (dimension, raw) in &params.attributes {
		if !vocabulary.contains_dimension(dimension) {
			continue;
		}

		let predicate = match vocabulary.resolve(dimension, raw) {
			Some(term) => Predicate::AttributeEquals {
				dimension: dimension.clone(),
				slug: term.slug.clone(),
			},
			None => {
				tracing::debug!(
					dimension = %dimension,
					value = %raw,
					"Facet value did not resolve."
				);

				Predicate::Nothing
			},
		};

		set.insert(Clause::Attribute(dimension.clone()), predicate);
	}

	if params.year_min.is_some() || params.year_max.is_some() {
		set.insert(Clause::Range(RangeField::Year), Predicate::Range {
			field: RangeField::Year,
			min: params.year_min,
			max: params.year_max,
		});
	}

	let (rank_min, rank_max) = (params.rank_min(), params.rank_max());

	if rank_min.is_some() || rank_max.is_some() {
		set.insert(Clause::Range(RangeField::RankScore), Predicate::Range {
			field: RangeField::RankScore,
			min: rank_min,
			max: rank_max,
		});
	}

	for flag in &params.flags {
		if let Some(predicate) = flag_predicate(flag) {
			set.insert(Clause::Flag(flag.clone()), predicate);
		}
	}

	set
}

/// Free text matches the source's text fields, or any record tagged with a term whose name
/// contains the query.
fn text_predicate(query: &str, vocabulary: &Vocabulary) -> Predicate {
	let mut nodes = vec![Predicate::TextMatch { query: query.to_string() }];

	for (dimension, term) in vocabulary.names_containing(query) {
		nodes.push(Predicate::AttributeEquals {
			dimension: dimension.to_string(),
			slug: term.slug.clone(),
		});
	}

	Predicate::or(nodes)
}

pub fn flag_predicate(flag: &str) -> Option<Predicate> {
	let signal = |signal| Predicate::FlagPresent { signal };

	match flag {
		FLAG_HAS_CODE => Some(signal(Signal::CodeLink)),
		FLAG_HAS_DATA => Some(signal(Signal::DataLink)),
		FLAG_HAS_FIGURES => Some(signal(Signal::Figures)),
		FLAG_HAS_IDENTIFIERS => Some(signal(Signal::Identifiers)),
		// Either the explicit protocol flag or a populated link field.
		FLAG_HAS_PROTOCOLS =>
			Some(Predicate::or([signal(Signal::ProtocolMarked), signal(Signal::ProtocolLinks)])),
		_ => None,
	}
}
