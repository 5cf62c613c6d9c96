use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub storage: Storage,
	pub providers: Providers,
	pub retrieval: Retrieval,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	/// Empty means the embedding capability is not configured; the vector
	/// tier is skipped rather than erroring.
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Retrieval {
	#[serde(default = "default_limit")]
	pub default_limit: u32,
	#[serde(default = "default_similarity_threshold")]
	pub similarity_threshold: f32,
	#[serde(default = "default_tier_timeout_ms")]
	pub tier_timeout_ms: u64,
	#[serde(default = "default_session_ttl_hours")]
	pub session_ttl_hours: i64,
}

fn default_limit() -> u32 {
	10
}

fn default_similarity_threshold() -> f32 {
	0.7
}

fn default_tier_timeout_ms() -> u64 {
	10_000
}

fn default_session_ttl_hours() -> i64 {
	24
}
