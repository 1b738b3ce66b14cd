pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Source {source_name} timed out after {timeout_ms} ms.")]
	Timeout { source_name: &'static str, timeout_ms: u64 },
	#[error("Configuration error: {message}")]
	Config { message: String },
}
impl From<mica_storage::Error> for Error {
	fn from(err: mica_storage::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
