#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Failed to read catalog snapshot at {path:?}.")]
	ReadSnapshot { path: std::path::PathBuf, source: std::io::Error },
	#[error("Failed to parse catalog snapshot at {path:?}.")]
	ParseSnapshot { path: std::path::PathBuf, source: serde_json::Error },
}
