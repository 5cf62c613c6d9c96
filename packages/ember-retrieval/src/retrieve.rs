use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::{
	Error, Result, RetrievalService,
	canonical::{RawRecord, RetrievalMethod, RetrievalResponse, canonicalize},
	context, fallback,
};
use ember_storage::models::KnowledgeHit;

/// Selects the content template for the live-data tier and the static
/// knowledge set for the terminal tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextType {
	Fire,
	#[default]
	General,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RetrieveOptions {
	pub limit: Option<u32>,
	pub threshold: Option<f32>,
	pub context_type: ContextType,
}

/// Tier priority order. Earlier tiers are more precise and more expensive;
/// the driver stops at the first tier that yields anything.
const TIER_ORDER: [RetrievalMethod; 4] = [
	RetrievalMethod::PgvectorSearch,
	RetrievalMethod::TextSearch,
	RetrievalMethod::SupabaseDataDirect,
	RetrievalMethod::HardcodedFallback,
];

impl RetrievalService {
	/// Runs the fallback chain for a user query and returns the canonical
	/// response tagged with the satisfying tier.
	///
	/// A tier error or timeout is logged and treated exactly like a tier
	/// that returned nothing. The static tier is unconditional, so the
	/// `TiersExhausted` branch indicates a defect rather than a degraded
	/// environment.
	pub async fn retrieve_context(
		&self,
		query: &str,
		options: RetrieveOptions,
	) -> Result<RetrievalResponse> {
		let limit = options.limit.unwrap_or(self.cfg.retrieval.default_limit).clamp(1, 500);
		let threshold = options.threshold.unwrap_or(self.cfg.retrieval.similarity_threshold);
		let tier_timeout = Duration::from_millis(self.cfg.retrieval.tier_timeout_ms);

		for method in TIER_ORDER {
			let attempt = timeout(
				tier_timeout,
				self.run_tier(method, query, limit, threshold, options.context_type),
			)
			.await;

			match attempt {
				Ok(Ok(records)) if !records.is_empty() => {
					debug!(
						method = method.as_str(),
						count = records.len(),
						"Retrieval tier satisfied the query."
					);

					return Ok(canonicalize(records, method));
				},
				Ok(Ok(_)) => {
					debug!(method = method.as_str(), "Retrieval tier empty; falling through.");
				},
				Ok(Err(err)) => {
					warn!(
						method = method.as_str(),
						error = %err,
						"Retrieval tier failed; falling through."
					);
				},
				Err(_) => {
					warn!(method = method.as_str(), "Retrieval tier timed out; falling through.");
				},
			}
		}

		Err(Error::TiersExhausted)
	}

	async fn run_tier(
		&self,
		method: RetrievalMethod,
		query: &str,
		limit: u32,
		threshold: f32,
		context_type: ContextType,
	) -> Result<Vec<RawRecord>> {
		match method {
			RetrievalMethod::PgvectorSearch => {
				let Some(embedding) = &self.capabilities.embedding else {
					debug!("Embedding capability not configured; skipping the vector tier.");

					return Ok(Vec::new());
				};
				let vectors =
					embedding.embed(&self.cfg.providers.embedding, &[query.to_string()]).await?;
				let Some(vector) = vectors.into_iter().next() else {
					return Err(Error::Provider {
						message: "Embedding provider returned no vectors.".to_string(),
					});
				};
				let hits =
					self.providers.knowledge.vector_search(&vector, threshold, limit).await?;

				Ok(hits.into_iter().map(knowledge_record).collect())
			},
			RetrievalMethod::TextSearch => {
				let hits = self.providers.knowledge.text_search(query, limit).await?;

				Ok(hits.into_iter().map(knowledge_record).collect())
			},
			RetrievalMethod::SupabaseDataDirect => {
				let readings = self
					.providers
					.operational
					.fetch_recent(
						limit,
						OffsetDateTime::now_utc(),
						self.cfg.retrieval.session_ttl_hours,
					)
					.await?;

				Ok(context::synthesize_context(&readings, context_type))
			},
			RetrievalMethod::HardcodedFallback => Ok(fallback::static_knowledge(context_type)),
		}
	}
}

fn knowledge_record(hit: KnowledgeHit) -> RawRecord {
	RawRecord {
		title: Some(hit.title),
		content: Some(hit.content),
		source: Some(hit.source),
		category: hit.category,
		data_type: hit.data_type,
		location: None,
		timestamp: None,
		score: Some(hit.score),
	}
}
