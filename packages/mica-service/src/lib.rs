pub mod aggregate;
pub mod facets;
pub mod filter;
pub mod merge;
pub mod paginate;
pub mod params;
pub mod rank;
pub mod search;
pub mod store;

mod error;

pub use error::{Error, Result};
pub use facets::{FacetCache, FacetCount};
pub use params::{SearchParams, SortDirection, SortKey, SortSpec, Surface};
pub use search::{FacetResponse, InvalidateResponse, SearchResponse, VocabularyResponse};
pub use store::{CatalogStore, open_store};

use std::{future::Future, pin::Pin, sync::Arc};

use mica_config::Config;
use mica_domain::origin::OriginClassifier;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub struct CatalogService {
	pub cfg: Config,
	pub store: Arc<dyn CatalogStore>,
	facet_cache: FacetCache,
	origins: OriginClassifier,
}
impl CatalogService {
	pub fn new(cfg: Config, store: Arc<dyn CatalogStore>) -> Result<Self> {
		let origins = OriginClassifier::new(
			cfg.search.origins.iter().map(|origin| (origin.pattern.as_str(), origin.label.as_str())),
		)
		.map_err(|err| Error::Config { message: format!("Invalid origin pattern: {err}") })?;
		let facet_cache = FacetCache::new(&cfg.search.facets.cache);

		Ok(Self { cfg, store, facet_cache, origins })
	}

	pub fn facet_cache(&self) -> &FacetCache {
		&self.facet_cache
	}
}
