pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Qdrant error: {message}")]
	Qdrant { message: String },
	#[error("Timed out: {message}")]
	Timeout { message: String },
}
impl From<tactile_storage::Error> for Error {
	fn from(err: tactile_storage::Error) -> Self {
		match err {
			tactile_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			tactile_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			tactile_storage::Error::Qdrant(inner) => Self::Qdrant { message: inner.to_string() },
		}
	}
}

impl From<tactile_providers::Error> for Error {
	fn from(err: tactile_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
