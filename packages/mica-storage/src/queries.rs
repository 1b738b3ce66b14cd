use std::collections::{BTreeMap, HashMap};

use sqlx::{Postgres, QueryBuilder, Transaction};

use mica_domain::{
	predicate::Predicate,
	term::{CanonicalTerm, Vocabulary},
};

use crate::{
	Result,
	db::Db,
	models::{
		AttachmentRow, CatalogSnapshot, DocumentRow, DocumentScope, EmbeddingParent,
		RECORD_KIND_ATTACHMENT, RECORD_KIND_DOCUMENT,
	},
	sql::{self, ATTACHMENTS, DOCUMENTS, EMBEDDING_PARENTS},
};

const DOCUMENT_COLUMNS: &str = "\
SELECT
	d.document_id,
	d.kind,
	d.title,
	d.permalink,
	d.doi,
	d.url,
	d.journal,
	d.summary,
	d.authors,
	d.year,
	d.citation_count,
	d.star_count,
	d.is_protocol,
	d.github_url,
	d.data_url,
	d.figure_count,
	d.rrids,
	d.protocols
FROM catalog_documents d
WHERE ";
const ATTACHMENT_COLUMNS: &str = "\
SELECT
	a.attachment_id,
	a.title,
	a.permalink,
	a.file_url,
	a.external_url,
	a.description,
	a.author_tag,
	a.author_meta,
	a.author_term,
	a.origin_tag,
	a.origin_meta,
	a.origin_term,
	a.year,
	a.github_url,
	a.data_url
FROM catalog_attachments a
WHERE ";

type TermsById = HashMap<i64, BTreeMap<String, Vec<String>>>;

pub async fn load_vocabulary(db: &Db) -> Result<Vocabulary> {
	let rows: Vec<(String, String, String, Option<String>)> = sqlx::query_as(
		"\
SELECT dimension, slug, name, url
FROM catalog_terms
ORDER BY dimension, position, slug",
	)
	.fetch_all(&db.pool)
	.await?;
	let mut vocabulary = Vocabulary::default();

	for (dimension, slug, name, url) in rows {
		vocabulary.push(&dimension, CanonicalTerm { slug, name, url });
	}

	Ok(vocabulary)
}

pub async fn fetch_documents(
	db: &Db,
	scope: DocumentScope,
	predicate: &Predicate,
) -> Result<Vec<DocumentRow>> {
	let mut qb = QueryBuilder::<Postgres>::new(DOCUMENT_COLUMNS);

	qb.push("d.kind = ").push_bind(scope.kind.as_str());

	if scope.protocols_only {
		qb.push(" AND d.is_protocol");
	}

	qb.push(" AND ");
	sql::push_predicate(&mut qb, &DOCUMENTS, predicate);

	let mut rows: Vec<DocumentRow> = qb.build_query_as().fetch_all(&db.pool).await?;

	attach_document_terms(db, &mut rows).await?;
	rows.retain(|row| predicate.evaluate(row));

	Ok(rows)
}

/// Paper documents whose freeform link field yields links and that match `predicate` when read
/// as link parents.
pub async fn fetch_embedding_parents(db: &Db, predicate: &Predicate) -> Result<Vec<DocumentRow>> {
	let mut qb = QueryBuilder::<Postgres>::new(DOCUMENT_COLUMNS);

	qb.push("d.kind = ")
		.push_bind(DocumentScope::papers().kind.as_str())
		.push(" AND ")
		.push(sql::PROTOCOL_LINKS_SQL)
		.push(" AND ");
	sql::push_predicate(&mut qb, &EMBEDDING_PARENTS, predicate);

	let mut rows: Vec<DocumentRow> = qb.build_query_as().fetch_all(&db.pool).await?;

	attach_document_terms(db, &mut rows).await?;
	// The SQL link check cannot parse JSON.
	rows.retain(|row| row.has_protocol_links() && predicate.evaluate(&EmbeddingParent(row)));

	Ok(rows)
}

pub async fn fetch_attachments(db: &Db, predicate: &Predicate) -> Result<Vec<AttachmentRow>> {
	let mut qb = QueryBuilder::<Postgres>::new(ATTACHMENT_COLUMNS);

	sql::push_predicate(&mut qb, &ATTACHMENTS, predicate);

	let mut rows: Vec<AttachmentRow> = qb.build_query_as().fetch_all(&db.pool).await?;
	let ids: Vec<i64> = rows.iter().map(|row| row.attachment_id).collect();
	let mut terms = load_terms(db, RECORD_KIND_ATTACHMENT, &ids).await?;

	for row in &mut rows {
		row.terms = terms.remove(&row.attachment_id).unwrap_or_default();
	}

	Ok(rows)
}

/// Replaces the whole catalog with `snapshot` in one transaction.
pub async fn replace_catalog(db: &Db, snapshot: &CatalogSnapshot) -> Result<()> {
	let mut tx = db.pool.begin().await?;

	sqlx::query("DELETE FROM catalog_record_terms").execute(&mut *tx).await?;
	sqlx::query("DELETE FROM catalog_documents").execute(&mut *tx).await?;
	sqlx::query("DELETE FROM catalog_attachments").execute(&mut *tx).await?;
	sqlx::query("DELETE FROM catalog_terms").execute(&mut *tx).await?;

	for dimension in snapshot.vocabulary.dimensions() {
		for (position, term) in snapshot.vocabulary.terms(dimension).iter().enumerate() {
			sqlx::query(
				"\
INSERT INTO catalog_terms (dimension, slug, name, url, position)
VALUES ($1, $2, $3, $4, $5)",
			)
			.bind(dimension)
			.bind(term.slug.as_str())
			.bind(term.name.as_str())
			.bind(term.url.as_deref())
			.bind(i32::try_from(position).unwrap_or(i32::MAX))
			.execute(&mut *tx)
			.await?;
		}
	}

	for doc in &snapshot.documents {
		insert_document(&mut tx, doc).await?;
		insert_record_terms(&mut tx, RECORD_KIND_DOCUMENT, doc.document_id, &doc.terms).await?;
	}
	for attachment in &snapshot.attachments {
		insert_attachment(&mut tx, attachment).await?;
		insert_record_terms(
			&mut tx,
			RECORD_KIND_ATTACHMENT,
			attachment.attachment_id,
			&attachment.terms,
		)
		.await?;
	}

	tx.commit().await?;

	Ok(())
}

async fn attach_document_terms(db: &Db, rows: &mut [DocumentRow]) -> Result<()> {
	let ids: Vec<i64> = rows.iter().map(|row| row.document_id).collect();
	let mut terms = load_terms(db, RECORD_KIND_DOCUMENT, &ids).await?;

	for row in rows {
		row.terms = terms.remove(&row.document_id).unwrap_or_default();
	}

	Ok(())
}

async fn load_terms(db: &Db, record_kind: &str, ids: &[i64]) -> Result<TermsById> {
	if ids.is_empty() {
		return Ok(HashMap::new());
	}

	let rows: Vec<(i64, String, String)> = sqlx::query_as(
		"\
SELECT rt.record_id, rt.dimension, rt.slug
FROM catalog_record_terms rt
LEFT JOIN catalog_terms t ON t.dimension = rt.dimension AND t.slug = rt.slug
WHERE rt.record_kind = $1
	AND rt.record_id = ANY($2)
ORDER BY rt.record_id, rt.dimension, t.position NULLS LAST, rt.slug",
	)
	.bind(record_kind)
	.bind(ids)
	.fetch_all(&db.pool)
	.await?;
	let mut out: TermsById = HashMap::new();

	for (record_id, dimension, slug) in rows {
		out.entry(record_id).or_default().entry(dimension).or_default().push(slug);
	}

	Ok(out)
}

async fn insert_document(tx: &mut Transaction<'_, Postgres>, doc: &DocumentRow) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO catalog_documents (
	document_id,
	kind,
	title,
	permalink,
	doi,
	url,
	journal,
	summary,
	authors,
	year,
	citation_count,
	star_count,
	is_protocol,
	github_url,
	data_url,
	figure_count,
	rrids,
	protocols
)
VALUES (
	$1,
	$2,
	$3,
	$4,
	$5,
	$6,
	$7,
	$8,
	$9,
	$10,
	$11,
	$12,
	$13,
	$14,
	$15,
	$16,
	$17,
	$18
)",
	)
	.bind(doc.document_id)
	.bind(doc.kind.as_str())
	.bind(doc.title.as_str())
	.bind(doc.permalink.as_str())
	.bind(doc.doi.as_deref())
	.bind(doc.url.as_deref())
	.bind(doc.journal.as_deref())
	.bind(doc.summary.as_deref())
	.bind(doc.authors.as_deref())
	.bind(doc.year)
	.bind(doc.citation_count)
	.bind(doc.star_count)
	.bind(doc.is_protocol)
	.bind(doc.github_url.as_deref())
	.bind(doc.data_url.as_deref())
	.bind(doc.figure_count)
	.bind(doc.rrids.as_deref())
	.bind(doc.protocols.as_deref())
	.execute(&mut **tx)
	.await?;

	Ok(())
}

async fn insert_attachment(
	tx: &mut Transaction<'_, Postgres>,
	attachment: &AttachmentRow,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO catalog_attachments (
	attachment_id,
	title,
	permalink,
	file_url,
	external_url,
	description,
	author_tag,
	author_meta,
	author_term,
	origin_tag,
	origin_meta,
	origin_term,
	year,
	github_url,
	data_url
)
VALUES (
	$1,
	$2,
	$3,
	$4,
	$5,
	$6,
	$7,
	$8,
	$9,
	$10,
	$11,
	$12,
	$13,
	$14,
	$15
)",
	)
	.bind(attachment.attachment_id)
	.bind(attachment.title.as_str())
	.bind(attachment.permalink.as_str())
	.bind(attachment.file_url.as_deref())
	.bind(attachment.external_url.as_deref())
	.bind(attachment.description.as_deref())
	.bind(attachment.author_tag.as_deref())
	.bind(attachment.author_meta.as_deref())
	.bind(attachment.author_term.as_deref())
	.bind(attachment.origin_tag.as_deref())
	.bind(attachment.origin_meta.as_deref())
	.bind(attachment.origin_term.as_deref())
	.bind(attachment.year)
	.bind(attachment.github_url.as_deref())
	.bind(attachment.data_url.as_deref())
	.execute(&mut **tx)
	.await?;

	Ok(())
}

async fn insert_record_terms(
	tx: &mut Transaction<'_, Postgres>,
	record_kind: &str,
	record_id: i64,
	terms: &BTreeMap<String, Vec<String>>,
) -> Result<()> {
	for (dimension, slugs) in terms {
		for slug in slugs {
			sqlx::query(
				"\
INSERT INTO catalog_record_terms (record_kind, record_id, dimension, slug)
VALUES ($1, $2, $3, $4)
ON CONFLICT DO NOTHING",
			)
			.bind(record_kind)
			.bind(record_id)
			.bind(dimension.as_str())
			.bind(slug.as_str())
			.execute(&mut **tx)
			.await?;
		}
	}

	Ok(())
}
