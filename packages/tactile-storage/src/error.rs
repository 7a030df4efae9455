#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Catalog query failed: {0}")]
	Sqlx(#[from] sqlx::Error),
	#[error("Invalid catalog request: {0}")]
	InvalidArgument(String),
	#[error("Vector index request failed: {0}")]
	Qdrant(#[from] Box<qdrant_client::QdrantError>),
}
impl From<qdrant_client::QdrantError> for Error {
	fn from(err: qdrant_client::QdrantError) -> Self {
		Self::Qdrant(Box::new(err))
	}
}
