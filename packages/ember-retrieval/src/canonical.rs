use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Which tier satisfied a retrieval. The string tags are part of the consumer
/// contract and must not change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMethod {
	PgvectorSearch,
	TextSearch,
	SupabaseDataDirect,
	HardcodedFallback,
}
impl RetrievalMethod {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::PgvectorSearch => "pgvector_search",
			Self::TextSearch => "text_search",
			Self::SupabaseDataDirect => "supabase_data_direct",
			Self::HardcodedFallback => "hardcoded_fallback",
		}
	}
}

/// A tier-specific record before canonicalization. Every field is optional;
/// the canonicalizer substitutes defaults so downstream consumers never see a
/// hole.
#[derive(Clone, Debug, Default)]
pub struct RawRecord {
	pub title: Option<String>,
	pub content: Option<String>,
	pub source: Option<String>,
	pub category: Option<String>,
	pub data_type: Option<String>,
	pub location: Option<[f64; 2]>,
	pub timestamp: Option<OffsetDateTime>,
	pub score: Option<f32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetrievalResult {
	pub title: String,
	pub content: String,
	pub source: String,
	pub metadata: ResultMetadata,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultMetadata {
	pub category: String,
	pub data_type: String,
	pub location: [f64; 2],
	#[serde(with = "time::serde::rfc3339")]
	pub timestamp: OffsetDateTime,
	pub confidence: f32,
}

/// The envelope every retrieval returns, whichever tier produced it.
/// Constructed fresh per call and never mutated afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetrievalResponse {
	pub success: bool,
	pub results: Vec<RetrievalResult>,
	pub method: RetrievalMethod,
	pub count: usize,
	#[serde(with = "time::serde::rfc3339")]
	pub timestamp: OffsetDateTime,
}

pub const DEFAULT_TITLE: &str = "Environmental Data";
pub const DEFAULT_SOURCE: &str = "Unknown";
pub const DEFAULT_CONFIDENCE: f32 = 0.5;

/// Maps tier-specific records into the canonical shape. Total by
/// construction: any field that cannot be derived is defaulted.
pub fn canonicalize(raw: Vec<RawRecord>, method: RetrievalMethod) -> RetrievalResponse {
	let now = OffsetDateTime::now_utc();
	let results: Vec<RetrievalResult> =
		raw.into_iter().map(|record| canonicalize_record(record, now)).collect();

	RetrievalResponse { success: true, count: results.len(), results, method, timestamp: now }
}

fn canonicalize_record(record: RawRecord, now: OffsetDateTime) -> RetrievalResult {
	let title = record
		.title
		.filter(|title| !title.trim().is_empty())
		.unwrap_or_else(|| DEFAULT_TITLE.to_string());
	let source = record
		.source
		.filter(|source| !source.trim().is_empty())
		.unwrap_or_else(|| DEFAULT_SOURCE.to_string());
	let confidence = record
		.score
		.filter(|score| score.is_finite())
		.map(|score| score.clamp(0.0, 1.0))
		.unwrap_or(DEFAULT_CONFIDENCE);

	RetrievalResult {
		title,
		content: record.content.unwrap_or_default(),
		source,
		metadata: ResultMetadata {
			category: record.category.unwrap_or_else(|| "environmental".to_string()),
			data_type: record.data_type.unwrap_or_else(|| "knowledge".to_string()),
			location: record.location.unwrap_or([0.0, 0.0]),
			timestamp: record.timestamp.unwrap_or(now),
			confidence,
		},
	}
}
