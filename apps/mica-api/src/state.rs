use std::sync::Arc;

use mica_config::Config;
use mica_service::{CatalogService, CatalogStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<CatalogService>,
}
impl AppState {
	pub async fn new(config: Config) -> color_eyre::Result<Self> {
		let store = mica_service::open_store(&config).await?;

		Self::with_store(config, store)
	}

	/// Builds the state over an already opened store.
	pub fn with_store(config: Config, store: Arc<dyn CatalogStore>) -> color_eyre::Result<Self> {
		let service = CatalogService::new(config, store)?;

		Ok(Self { service: Arc::new(service) })
	}
}
