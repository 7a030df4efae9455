pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error("Invalid header name in provider config: {0}")]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error("Invalid header value in provider config: {0}")]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("Invalid provider config: {message}")]
	InvalidConfig { message: String },
	#[error("Unexpected provider response: {message}")]
	InvalidResponse { message: String },
}
