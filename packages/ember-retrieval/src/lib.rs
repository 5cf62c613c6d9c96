pub mod canonical;
pub mod context;
pub mod executor;
pub mod fallback;
pub mod retrieve;

mod error;

pub use canonical::{
	RawRecord, ResultMetadata, RetrievalMethod, RetrievalResponse, RetrievalResult, canonicalize,
};
pub use error::{Error, Result};
pub use executor::ExecutionReport;
pub use retrieve::{ContextType, RetrieveOptions};

use std::{future::Future, pin::Pin, sync::Arc};

use sqlx::PgPool;
use time::OffsetDateTime;

use ember_config::{Config, EmbeddingProviderConfig};
use ember_storage::{
	db::Db,
	models::{KnowledgeHit, OperationalReading},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The embedding capability. Absence (no credential configured) is decided
/// once in [`Capabilities::from_config`], not at call sites.
pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

/// Knowledge-store search collaborators, one per retrieval tier.
pub trait KnowledgeStore
where
	Self: Send + Sync,
{
	fn vector_search<'a>(
		&'a self,
		embedding: &'a [f32],
		threshold: f32,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<KnowledgeHit>>>;

	fn text_search<'a>(&'a self, query: &'a str, limit: u32)
	-> BoxFuture<'a, Result<Vec<KnowledgeHit>>>;
}

/// The operational-data collaborator behind the live-data tier. Zero rows is
/// its only failure signal; any internal session fallback is its own concern.
pub trait OperationalData
where
	Self: Send + Sync,
{
	fn fetch_recent<'a>(
		&'a self,
		limit: u32,
		now: OffsetDateTime,
		session_ttl_hours: i64,
	) -> BoxFuture<'a, Result<Vec<OperationalReading>>>;
}

#[derive(Clone)]
pub struct Capabilities {
	pub embedding: Option<Arc<dyn EmbeddingProvider>>,
}
impl Capabilities {
	pub fn from_config(cfg: &Config) -> Self {
		let embedding: Option<Arc<dyn EmbeddingProvider>> =
			if cfg.providers.embedding.api_key.is_empty() {
				None
			} else {
				Some(Arc::new(HttpEmbedding))
			};

		Self { embedding }
	}

	pub fn unavailable() -> Self {
		Self { embedding: None }
	}
}

#[derive(Clone)]
pub struct Providers {
	pub knowledge: Arc<dyn KnowledgeStore>,
	pub operational: Arc<dyn OperationalData>,
}
impl Providers {
	pub fn from_pool(pool: PgPool) -> Self {
		Self {
			knowledge: Arc::new(PgKnowledge { pool: pool.clone() }),
			operational: Arc::new(PgOperational { pool }),
		}
	}
}

pub struct RetrievalService {
	pub cfg: Config,
	pub db: Db,
	pub capabilities: Capabilities,
	pub providers: Providers,
}
impl RetrievalService {
	pub fn new(cfg: Config, db: Db) -> Self {
		let capabilities = Capabilities::from_config(&cfg);
		let providers = Providers::from_pool(db.pool.clone());

		Self { cfg, db, capabilities, providers }
	}

	pub fn with_providers(
		cfg: Config,
		db: Db,
		capabilities: Capabilities,
		providers: Providers,
	) -> Self {
		Self { cfg, db, capabilities, providers }
	}
}

struct HttpEmbedding;
impl EmbeddingProvider for HttpEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move {
			ember_providers::embedding::embed(cfg, texts).await.map_err(Into::into)
		})
	}
}

struct PgKnowledge {
	pool: PgPool,
}
impl KnowledgeStore for PgKnowledge {
	fn vector_search<'a>(
		&'a self,
		embedding: &'a [f32],
		threshold: f32,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<KnowledgeHit>>> {
		Box::pin(async move {
			ember_storage::knowledge::vector_search(&self.pool, embedding, threshold, limit)
				.await
				.map_err(Into::into)
		})
	}

	fn text_search<'a>(
		&'a self,
		query: &'a str,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<KnowledgeHit>>> {
		Box::pin(async move {
			ember_storage::knowledge::text_search(&self.pool, query, limit)
				.await
				.map_err(Into::into)
		})
	}
}

struct PgOperational {
	pool: PgPool,
}
impl OperationalData for PgOperational {
	fn fetch_recent<'a>(
		&'a self,
		limit: u32,
		now: OffsetDateTime,
		session_ttl_hours: i64,
	) -> BoxFuture<'a, Result<Vec<OperationalReading>>> {
		Box::pin(async move {
			ember_storage::sessions::fetch_operational_readings(
				&self.pool,
				limit,
				now,
				session_ttl_hours,
			)
			.await
			.map_err(Into::into)
		})
	}
}
