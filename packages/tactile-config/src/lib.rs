mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, Contextualizer, EmbeddingProviderConfig, LlmProviderConfig, Postgres, Providers,
	Qdrant, Retrieval, Service, Storage,
};

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
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}

	let retrieval = &cfg.retrieval;

	if retrieval.k == 0 {
		return Err(Error::Validation {
			message: "retrieval.k must be greater than zero.".to_string(),
		});
	}
	if retrieval.semantic_k == 0 {
		return Err(Error::Validation {
			message: "retrieval.semantic_k must be greater than zero.".to_string(),
		});
	}
	if retrieval.lexical_limit == 0 {
		return Err(Error::Validation {
			message: "retrieval.lexical_limit must be greater than zero.".to_string(),
		});
	}
	if !retrieval.rrf_k.is_finite() {
		return Err(Error::Validation {
			message: "retrieval.rrf_k must be a finite number.".to_string(),
		});
	}
	if retrieval.rrf_k < 0.0 {
		return Err(Error::Validation {
			message: "retrieval.rrf_k must be zero or greater.".to_string(),
		});
	}
	if !retrieval.confidence_threshold.is_finite() {
		return Err(Error::Validation {
			message: "retrieval.confidence_threshold must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&retrieval.confidence_threshold) {
		return Err(Error::Validation {
			message: "retrieval.confidence_threshold must be in the range 0.0-1.0.".to_string(),
		});
	}
	if cfg.contextualizer.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "contextualizer.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (label, key) in [
		("embedding", &cfg.providers.embedding.api_key),
		("llm_rewriter", &cfg.providers.llm_rewriter.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for api_base in
		[&mut cfg.providers.embedding.api_base, &mut cfg.providers.llm_rewriter.api_base]
	{
		let trimmed = api_base.trim().trim_end_matches('/').to_string();

		*api_base = trimmed;
	}

	cfg.service.log_level = cfg.service.log_level.trim().to_string();
}
