pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	/// The static knowledge tier is unconditional; exhausting every tier is a
	/// defect, not a degraded result.
	#[error("All retrieval tiers failed, including the static fallback.")]
	TiersExhausted,
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<ember_storage::Error> for Error {
	fn from(err: ember_storage::Error) -> Self {
		match err {
			ember_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			ember_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
		}
	}
}

impl From<ember_providers::Error> for Error {
	fn from(err: ember_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
