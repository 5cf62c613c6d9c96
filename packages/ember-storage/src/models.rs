use time::OffsetDateTime;
use uuid::Uuid;

/// One knowledge-store match, from either the vector or the full-text path.
/// `score` is tier-specific: cosine similarity for pgvector, `ts_rank_cd` for
/// full text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct KnowledgeHit {
	pub title: String,
	pub content: String,
	pub source: String,
	pub category: Option<String>,
	pub data_type: Option<String>,
	pub score: f32,
}

/// An operational sensor row used by the live-data context tier. Coordinates
/// come from the devices join and may be absent.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OperationalReading {
	pub device_id: Option<Uuid>,
	pub device_name: Option<String>,
	pub datetime: OffsetDateTime,
	pub temperature: Option<f64>,
	pub humidity: Option<f64>,
	pub pm25: Option<f64>,
	pub pm10: Option<f64>,
	pub co2: Option<f64>,
	pub voc: Option<f64>,
	pub latitude: Option<f64>,
	pub longitude: Option<f64>,
}
