mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, EmbeddingProviderConfig, Postgres, Providers, Retrieval, Storage};

use std::{fs, path::Path};

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
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if !cfg.providers.embedding.api_key.is_empty() {
		if cfg.providers.embedding.api_base.trim().is_empty() {
			return Err(Error::Validation {
				message: "providers.embedding.api_base must be non-empty when an api_key is set."
					.to_string(),
			});
		}
		if cfg.providers.embedding.dimensions == 0 {
			return Err(Error::Validation {
				message: "providers.embedding.dimensions must be greater than zero.".to_string(),
			});
		}
	}
	if cfg.retrieval.default_limit == 0 || cfg.retrieval.default_limit > 500 {
		return Err(Error::Validation {
			message: "retrieval.default_limit must be in the range 1-500.".to_string(),
		});
	}
	if !cfg.retrieval.similarity_threshold.is_finite() {
		return Err(Error::Validation {
			message: "retrieval.similarity_threshold must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&cfg.retrieval.similarity_threshold) {
		return Err(Error::Validation {
			message: "retrieval.similarity_threshold must be in the range 0.0-1.0.".to_string(),
		});
	}
	if cfg.retrieval.tier_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "retrieval.tier_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.retrieval.session_ttl_hours <= 0 {
		return Err(Error::Validation {
			message: "retrieval.session_ttl_hours must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.storage.postgres.dsn = cfg.storage.postgres.dsn.trim().to_string();
	cfg.providers.embedding.api_key = cfg.providers.embedding.api_key.trim().to_string();
	cfg.providers.embedding.api_base = cfg.providers.embedding.api_base.trim().to_string();
}
