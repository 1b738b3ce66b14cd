mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, FacetCache, OriginPattern, Postgres, Search, SearchFacets, Security, Service,
	Snapshot, Storage,
};

use std::{fs, path::Path};

use regex::Regex;

pub const BACKEND_POSTGRES: &str = "postgres";
pub const BACKEND_SNAPSHOT: &str = "snapshot";

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("service.admin_bind", &cfg.service.admin_bind),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	match cfg.storage.backend.as_str() {
		BACKEND_POSTGRES => {
			let Some(postgres) = cfg.storage.postgres.as_ref() else {
				return Err(Error::Validation {
					message: "storage.postgres is required when storage.backend is postgres."
						.to_string(),
				});
			};

			if postgres.dsn.trim().is_empty() {
				return Err(Error::Validation {
					message: "storage.postgres.dsn must be non-empty.".to_string(),
				});
			}
			if postgres.pool_max_conns == 0 {
				return Err(Error::Validation {
					message: "storage.postgres.pool_max_conns must be greater than zero."
						.to_string(),
				});
			}
		},
		BACKEND_SNAPSHOT => {
			let Some(snapshot) = cfg.storage.snapshot.as_ref() else {
				return Err(Error::Validation {
					message: "storage.snapshot is required when storage.backend is snapshot."
						.to_string(),
				});
			};

			if snapshot.path.trim().is_empty() {
				return Err(Error::Validation {
					message: "storage.snapshot.path must be non-empty.".to_string(),
				});
			}
		},
		_ => {
			return Err(Error::Validation {
				message: "storage.backend must be one of postgres or snapshot.".to_string(),
			});
		},
	}

	if cfg.search.max_per_page == 0 {
		return Err(Error::Validation {
			message: "search.max_per_page must be greater than zero.".to_string(),
		});
	}
	if cfg.search.default_per_page == 0 {
		return Err(Error::Validation {
			message: "search.default_per_page must be greater than zero.".to_string(),
		});
	}
	if cfg.search.default_per_page > cfg.search.max_per_page {
		return Err(Error::Validation {
			message: "search.default_per_page must not exceed search.max_per_page.".to_string(),
		});
	}
	if cfg.search.fetch_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "search.fetch_timeout_ms must be greater than zero.".to_string(),
		});
	}

	let cache = &cfg.search.facets.cache;

	if cache.enabled {
		if cache.ttl_seconds == 0 {
			return Err(Error::Validation {
				message: "search.facets.cache.ttl_seconds must be greater than zero.".to_string(),
			});
		}
		if cache.max_entries == 0 {
			return Err(Error::Validation {
				message: "search.facets.cache.max_entries must be greater than zero.".to_string(),
			});
		}
	}

	for (index, origin) in cfg.search.origins.iter().enumerate() {
		if origin.label.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("search.origins[{index}].label must be non-empty."),
			});
		}
		if let Err(err) = Regex::new(&origin.pattern) {
			return Err(Error::Validation {
				message: format!("search.origins[{index}].pattern is not a valid regex: {err}"),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.storage.backend = cfg.storage.backend.trim().to_ascii_lowercase();

	for origin in &mut cfg.search.origins {
		origin.label = origin.label.trim().to_string();
	}
}
