use std::sync::Arc;

use mica_config::{BACKEND_POSTGRES, BACKEND_SNAPSHOT, Config};
use mica_domain::{predicate::Predicate, term::Vocabulary};
use mica_storage::{
	db::Db,
	memory::MemoryStore,
	models::{AttachmentRow, DocumentRow, DocumentScope},
	queries,
};

use crate::{BoxFuture, Error, Result};

/// Read access to the catalog. Each method answers for one source and filters with the
/// predicate in the backend's native form.
pub trait CatalogStore
where
	Self: Send + Sync,
{
	fn vocabulary(&self) -> BoxFuture<'_, mica_storage::Result<Vocabulary>>;

	fn documents<'a>(
		&'a self,
		scope: DocumentScope,
		predicate: &'a Predicate,
	) -> BoxFuture<'a, mica_storage::Result<Vec<DocumentRow>>>;

	fn embedding_parents<'a>(
		&'a self,
		predicate: &'a Predicate,
	) -> BoxFuture<'a, mica_storage::Result<Vec<DocumentRow>>>;

	fn attachments<'a>(
		&'a self,
		predicate: &'a Predicate,
	) -> BoxFuture<'a, mica_storage::Result<Vec<AttachmentRow>>>;
}

impl CatalogStore for Db {
	fn vocabulary(&self) -> BoxFuture<'_, mica_storage::Result<Vocabulary>> {
		Box::pin(queries::load_vocabulary(self))
	}

	fn documents<'a>(
		&'a self,
		scope: DocumentScope,
		predicate: &'a Predicate,
	) -> BoxFuture<'a, mica_storage::Result<Vec<DocumentRow>>> {
		Box::pin(queries::fetch_documents(self, scope, predicate))
	}

	fn embedding_parents<'a>(
		&'a self,
		predicate: &'a Predicate,
	) -> BoxFuture<'a, mica_storage::Result<Vec<DocumentRow>>> {
		Box::pin(queries::fetch_embedding_parents(self, predicate))
	}

	fn attachments<'a>(
		&'a self,
		predicate: &'a Predicate,
	) -> BoxFuture<'a, mica_storage::Result<Vec<AttachmentRow>>> {
		Box::pin(queries::fetch_attachments(self, predicate))
	}
}

impl CatalogStore for MemoryStore {
	fn vocabulary(&self) -> BoxFuture<'_, mica_storage::Result<Vocabulary>> {
		let vocabulary = MemoryStore::vocabulary(self).clone();

		Box::pin(async move { Ok(vocabulary) })
	}

	fn documents<'a>(
		&'a self,
		scope: DocumentScope,
		predicate: &'a Predicate,
	) -> BoxFuture<'a, mica_storage::Result<Vec<DocumentRow>>> {
		Box::pin(async move { Ok(MemoryStore::documents(self, scope, predicate)) })
	}

	fn embedding_parents<'a>(
		&'a self,
		predicate: &'a Predicate,
	) -> BoxFuture<'a, mica_storage::Result<Vec<DocumentRow>>> {
		Box::pin(async move { Ok(MemoryStore::embedding_parents(self, predicate)) })
	}

	fn attachments<'a>(
		&'a self,
		predicate: &'a Predicate,
	) -> BoxFuture<'a, mica_storage::Result<Vec<AttachmentRow>>> {
		Box::pin(async move { Ok(MemoryStore::attachments(self, predicate)) })
	}
}

/// Opens the backend named by `storage.backend`. Postgres schemas are bootstrapped on connect.
pub async fn open_store(cfg: &Config) -> Result<Arc<dyn CatalogStore>> {
	match cfg.storage.backend.as_str() {
		BACKEND_POSTGRES => {
			let Some(postgres) = cfg.storage.postgres.as_ref() else {
				return Err(Error::Config {
					message: "storage.postgres is required for the postgres backend.".to_string(),
				});
			};
			let db = Db::connect(postgres).await?;

			db.ensure_schema().await?;

			Ok(Arc::new(db))
		},
		BACKEND_SNAPSHOT => {
			let Some(snapshot) = cfg.storage.snapshot.as_ref() else {
				return Err(Error::Config {
					message: "storage.snapshot is required for the snapshot backend.".to_string(),
				});
			};

			Ok(Arc::new(MemoryStore::load(&snapshot.path)?))
		},
		other => Err(Error::Config { message: format!("Unknown storage backend {other:?}.") }),
	}
}
