use std::{collections::BTreeMap, time::Duration};

use serde::Serialize;
use time::OffsetDateTime;

use mica_domain::{
	predicate::Predicate,
	record::UnifiedRecord,
	term::{CanonicalTerm, Vocabulary},
};
use mica_storage::models::DocumentScope;

use crate::{
	CatalogService, Error, Result,
	aggregate::{Source, attachment, embedded, primary},
	facets::{self, FacetCount},
	filter, merge,
	paginate::{self, Page},
	params::{SearchParams, Surface},
	rank,
};

const VOCABULARY_SOURCE: &str = "vocabulary";

#[derive(Clone, Debug, Serialize)]
pub struct SearchResponse {
	pub records: Vec<UnifiedRecord>,
	pub total: u64,
	pub pages: u64,
	pub page: u64,
	/// True when at least one source failed and its records are missing.
	pub partial: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct FacetResponse {
	pub surface: Surface,
	pub dimension: String,
	pub counts: Vec<FacetCount>,
	pub partial: bool,
	pub cached: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct VocabularyResponse {
	pub dimensions: BTreeMap<String, Vec<CanonicalTerm>>,
}

#[derive(Clone, Debug, Serialize)]
pub struct InvalidateResponse {
	pub invalidated: usize,
}

struct Fetched {
	lists: Vec<Vec<UnifiedRecord>>,
	partial: bool,
}

impl CatalogService {
	pub async fn search(&self, surface: Surface, params: SearchParams) -> Result<SearchResponse> {
		let vocabulary = self.load_vocabulary().await?;
		let predicates = filter::compile(&params, &vocabulary);
		let fetched = self.fetch_sources(surface, &predicates.root(), &vocabulary).await?;
		let mut records = merge::merge(fetched.lists);

		rank::sort(&mut records, params.sort);

		let Page { records, total, pages, page } = paginate::paginate(
			records,
			params.page.unwrap_or(1),
			params.per_page.unwrap_or(i64::from(self.cfg.search.default_per_page)),
			self.cfg.search.max_per_page,
		);

		tracing::info!(
			surface = surface.as_str(),
			clauses = predicates.len(),
			total,
			page,
			partial = fetched.partial,
			"Catalog search completed."
		);

		Ok(SearchResponse { records, total, pages, page, partial: fetched.partial })
	}

	/// Counts for every term of `dimension`, with every request filter applied except the
	/// dimension's own selection.
	pub async fn facet(
		&self,
		surface: Surface,
		dimension: &str,
		params: SearchParams,
	) -> Result<FacetResponse> {
		let vocabulary = self.load_vocabulary().await?;

		if !vocabulary.contains_dimension(dimension) {
			return Err(Error::NotFound { message: format!("Unknown facet dimension {dimension:?}.") });
		}

		let base = filter::compile(&params, &vocabulary).without_dimension(dimension);
		let key = match facets::build_facet_cache_key(surface, dimension, &base) {
			Ok(key) => Some(key),
			Err(err) => {
				tracing::warn!(error = %err, "Facet cache key build failed.");

				None
			},
		};

		if let Some(key) = key.as_deref()
			&& let Some(counts) = self.facet_cache.get(key, OffsetDateTime::now_utc())
		{
			tracing::debug!(
				cache_key_prefix = facets::cache_key_prefix(key),
				hit = true,
				"Facet cache lookup."
			);

			return Ok(FacetResponse {
				surface,
				dimension: dimension.to_string(),
				counts,
				partial: false,
				cached: true,
			});
		}

		let fetched = self.fetch_sources(surface, &base.root(), &vocabulary).await?;
		let records = merge::merge(fetched.lists);
		let counts = facets::count_facet(dimension, &vocabulary, &records);

		// Partial counts would stay wrong for a whole TTL.
		if let Some(key) = key
			&& !fetched.partial
		{
			self.facet_cache.put(key, counts.clone(), OffsetDateTime::now_utc());
		}

		Ok(FacetResponse {
			surface,
			dimension: dimension.to_string(),
			counts,
			partial: fetched.partial,
			cached: false,
		})
	}

	pub async fn vocabulary(&self) -> Result<VocabularyResponse> {
		let vocabulary = self.load_vocabulary().await?;
		let dimensions = vocabulary
			.dimensions()
			.map(|dimension| (dimension.to_string(), vocabulary.terms(dimension).to_vec()))
			.collect();

		Ok(VocabularyResponse { dimensions })
	}

	/// Clears cached facet counts. Record create, update, and delete flows call this.
	pub fn invalidate_facets(&self) -> InvalidateResponse {
		let invalidated = self.facet_cache.invalidate();

		tracing::info!(invalidated, "Facet cache invalidated.");

		InvalidateResponse { invalidated }
	}

	/// Every request needs the vocabulary, so a stalled read fails the request under the same
	/// timeout the sources use.
	async fn load_vocabulary(&self) -> Result<Vocabulary> {
		let timeout_ms = self.cfg.search.fetch_timeout_ms;

		let read = tokio::time::timeout(Duration::from_millis(timeout_ms), self.store.vocabulary());

		match read.await {
			Ok(result) => Ok(result?),
			Err(_) => Err(Error::Timeout { source_name: VOCABULARY_SOURCE, timeout_ms }),
		}
	}

	/// Runs every source the surface reads concurrently, each under its own timeout.
	async fn fetch_sources(
		&self,
		surface: Surface,
		predicate: &Predicate,
		vocabulary: &Vocabulary,
	) -> Result<Fetched> {
		let sources = surface_sources(surface);
		let (first, second, third) = tokio::join!(
			self.fetch_optional(sources[0], predicate, vocabulary),
			self.fetch_optional(sources[1], predicate, vocabulary),
			self.fetch_optional(sources[2], predicate, vocabulary),
		);
		let mut fetched = Fetched { lists: Vec::with_capacity(3), partial: false };

		for (source, result) in sources.into_iter().zip([first, second, third]) {
			let Some(source) = source else { continue };

			match result {
				Ok(records) => fetched.lists.push(records),
				Err(err) if self.cfg.search.partial_results => {
					tracing::warn!(
						error = %err,
						source = source.as_str(),
						surface = surface.as_str(),
						"Catalog source failed. Returning partial results."
					);

					fetched.partial = true;
				},
				Err(err) => return Err(err),
			}
		}

		Ok(fetched)
	}

	async fn fetch_optional(
		&self,
		source: Option<Source>,
		predicate: &Predicate,
		vocabulary: &Vocabulary,
	) -> Result<Vec<UnifiedRecord>> {
		let Some(source) = source else { return Ok(Vec::new()) };
		let timeout_ms = self.cfg.search.fetch_timeout_ms;

		match tokio::time::timeout(
			Duration::from_millis(timeout_ms),
			self.fetch_source(source, predicate, vocabulary),
		)
		.await
		{
			Ok(result) => result,
			Err(_) => Err(Error::Timeout { source_name: source.as_str(), timeout_ms }),
		}
	}

	async fn fetch_source(
		&self,
		source: Source,
		predicate: &Predicate,
		vocabulary: &Vocabulary,
	) -> Result<Vec<UnifiedRecord>> {
		let records = match source {
			Source::Primary(scope) => self
				.store
				.documents(scope, predicate)
				.await?
				.iter()
				.map(|doc| primary::to_record(doc, vocabulary, &self.origins))
				.collect(),
			Source::Attachments => self
				.store
				.attachments(predicate)
				.await?
				.iter()
				.map(|row| attachment::to_record(row, vocabulary))
				.collect(),
			Source::Embedded => {
				let parents = self.store.embedding_parents(predicate).await?;

				embedded::to_records(&parents, predicate, vocabulary, &self.origins)
			},
		};

		Ok(records)
	}
}

fn surface_sources(surface: Surface) -> [Option<Source>; 3] {
	match surface {
		Surface::Protocols => [
			Some(Source::Primary(DocumentScope::protocols())),
			Some(Source::Attachments),
			Some(Source::Embedded),
		],
		Surface::Papers => [Some(Source::Primary(DocumentScope::papers())), None, None],
		Surface::Tools => [Some(Source::Primary(DocumentScope::tools())), None, None],
	}
}
