use sqlx::{Postgres, QueryBuilder};

use mica_domain::predicate::{Predicate, RangeField, Signal, text_tokens};

use crate::models::{RECORD_KIND_ATTACHMENT, RECORD_KIND_DOCUMENT};

/// Where one source keeps the columns a predicate can reference.
pub(crate) struct SourceColumns {
	pub record_kind: &'static str,
	pub id: &'static str,
	pub text: &'static [&'static str],
	pub rank: &'static str,
	pub year: &'static str,
	pub signal: fn(Signal) -> &'static str,
}

pub(crate) const DOCUMENTS: SourceColumns = SourceColumns {
	record_kind: RECORD_KIND_DOCUMENT,
	id: "d.document_id",
	text: &["d.title", "d.summary", "d.authors", "d.doi", "d.journal"],
	rank: concat!(
		"GREATEST(COALESCE(CASE WHEN d.kind = 'tool' THEN d.star_count ",
		"ELSE d.citation_count END, 0), 0)"
	),
	year: "d.year",
	signal: document_signal,
};

/// Documents read as parents of embedded links: the freeform field is searchable and the rank
/// is always zero.
pub(crate) const EMBEDDING_PARENTS: SourceColumns = SourceColumns {
	record_kind: RECORD_KIND_DOCUMENT,
	id: "d.document_id",
	text: &["d.title", "d.summary", "d.authors", "d.doi", "d.journal", "d.protocols"],
	rank: "0",
	year: "d.year",
	signal: document_signal,
};

pub(crate) const ATTACHMENTS: SourceColumns = SourceColumns {
	record_kind: RECORD_KIND_ATTACHMENT,
	id: "a.attachment_id",
	text: &["a.title", "a.description", "a.author_tag", "a.author_meta", "a.author_term"],
	rank: "0",
	year: "a.year",
	signal: attachment_signal,
};

/// Prefilter only: a non-trivial field can still be unparsable, so fetched rows are re-checked
/// with [`mica_domain::links::has_links`].
pub(crate) const PROTOCOL_LINKS_SQL: &str =
	"COALESCE(BTRIM(d.protocols), '') NOT IN ('', '[]', '{}', 'null', '\"\"')";

pub(crate) fn push_predicate(
	qb: &mut QueryBuilder<'_, Postgres>,
	columns: &SourceColumns,
	predicate: &Predicate,
) {
	match predicate {
		Predicate::All => {
			qb.push("TRUE");
		},
		Predicate::Nothing => {
			qb.push("FALSE");
		},
		Predicate::TextMatch { query } => push_text(qb, columns, query),
		Predicate::IdIn { ids } => {
			if ids.is_empty() {
				qb.push("FALSE");
			} else {
				qb.push(columns.id).push(" = ANY(").push_bind(ids.clone()).push(")");
			}
		},
		Predicate::AttributeEquals { dimension, slug } => {
			qb.push("EXISTS (SELECT 1 FROM catalog_record_terms rt WHERE rt.record_kind = ")
				.push_bind(columns.record_kind)
				.push(" AND rt.record_id = ")
				.push(columns.id)
				.push(" AND rt.dimension = ")
				.push_bind(dimension.clone())
				.push(" AND rt.slug = ")
				.push_bind(slug.clone())
				.push(")");
		},
		Predicate::Range { field, min, max } => push_range(qb, columns, *field, *min, *max),
		Predicate::FlagPresent { signal } => {
			qb.push("(").push((columns.signal)(*signal)).push(")");
		},
		Predicate::And(nodes) => push_joined(qb, columns, nodes, " AND ", "TRUE"),
		Predicate::Or(nodes) => push_joined(qb, columns, nodes, " OR ", "FALSE"),
	}
}

/// Escapes `%`, `_`, and `\` for use inside an `ILIKE` pattern.
pub(crate) fn escape_like(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());

	for ch in raw.chars() {
		if matches!(ch, '%' | '_' | '\\') {
			out.push('\\');
		}

		out.push(ch);
	}

	out
}

fn push_joined(
	qb: &mut QueryBuilder<'_, Postgres>,
	columns: &SourceColumns,
	nodes: &[Predicate],
	separator: &str,
	empty: &str,
) {
	if nodes.is_empty() {
		qb.push(empty);

		return;
	}

	qb.push("(");

	for (idx, node) in nodes.iter().enumerate() {
		if idx > 0 {
			qb.push(separator);
		}

		push_predicate(qb, columns, node);
	}

	qb.push(")");
}

fn push_text(qb: &mut QueryBuilder<'_, Postgres>, columns: &SourceColumns, query: &str) {
	let tokens = text_tokens(query);

	if tokens.is_empty() {
		qb.push("TRUE");

		return;
	}

	qb.push("(");

	for (token_idx, token) in tokens.iter().enumerate() {
		if token_idx > 0 {
			qb.push(" AND ");
		}

		let pattern = format!("%{}%", escape_like(token));

		qb.push("(");

		for (field_idx, field) in columns.text.iter().enumerate() {
			if field_idx > 0 {
				qb.push(" OR ");
			}

			qb.push("COALESCE(").push(*field).push(", '') ILIKE ").push_bind(pattern.clone());
		}

		qb.push(")");
	}

	qb.push(")");
}

fn push_range(
	qb: &mut QueryBuilder<'_, Postgres>,
	columns: &SourceColumns,
	field: RangeField,
	min: Option<i64>,
	max: Option<i64>,
) {
	if min.is_none() && max.is_none() {
		qb.push("TRUE");

		return;
	}

	let column = match field {
		RangeField::Year => columns.year,
		RangeField::RankScore => columns.rank,
	};

	qb.push("(").push(column).push(" IS NOT NULL");

	if let Some(min) = min {
		qb.push(" AND ").push(column).push(" >= ").push_bind(min);
	}
	if let Some(max) = max {
		qb.push(" AND ").push(column).push(" <= ").push_bind(max);
	}

	qb.push(")");
}

fn document_signal(signal: Signal) -> &'static str {
	match signal {
		Signal::CodeLink => "COALESCE(BTRIM(d.github_url), '') <> ''",
		Signal::DataLink => "COALESCE(BTRIM(d.data_url), '') <> ''",
		Signal::Figures => "COALESCE(d.figure_count, 0) > 0",
		Signal::Identifiers => "COALESCE(BTRIM(d.rrids), '') <> ''",
		Signal::ProtocolMarked => "d.is_protocol",
		Signal::ProtocolLinks => PROTOCOL_LINKS_SQL,
	}
}

fn attachment_signal(signal: Signal) -> &'static str {
	match signal {
		Signal::CodeLink => "COALESCE(BTRIM(a.github_url), '') <> ''",
		Signal::DataLink => "COALESCE(BTRIM(a.data_url), '') <> ''",
		Signal::Figures | Signal::Identifiers | Signal::ProtocolLinks => "FALSE",
		Signal::ProtocolMarked => "TRUE",
	}
}
