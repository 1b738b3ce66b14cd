use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub security: Security,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	/// Either "postgres" or "snapshot". The matching section must be present.
	pub backend: String,
	pub postgres: Option<Postgres>,
	pub snapshot: Option<Snapshot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
	/// JSON catalog file loaded into memory at startup.
	pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Search {
	pub default_per_page: u32,
	pub max_per_page: u32,
	/// Per-source store timeout. Each aggregator gets its own budget.
	pub fetch_timeout_ms: u64,
	/// When true a failing source is dropped and the response is flagged `partial`.
	pub partial_results: bool,
	pub facets: SearchFacets,
	/// Extra embedded-link origin patterns, tried before the built-in list.
	pub origins: Vec<OriginPattern>,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			default_per_page: 24,
			max_per_page: 100,
			fetch_timeout_ms: 2_000,
			partial_results: true,
			facets: SearchFacets::default(),
			origins: Vec::new(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchFacets {
	pub cache: FacetCache,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FacetCache {
	pub enabled: bool,
	pub ttl_seconds: u64,
	pub max_entries: usize,
}
impl Default for FacetCache {
	fn default() -> Self {
		Self { enabled: true, ttl_seconds: 300, max_entries: 1_024 }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct OriginPattern {
	/// Regular expression matched against the full link URL.
	pub pattern: String,
	pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Security {
	pub bind_localhost_only: bool,
}
impl Default for Security {
	fn default() -> Self {
		Self { bind_localhost_only: true }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}
