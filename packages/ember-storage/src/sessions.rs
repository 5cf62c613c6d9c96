use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{Result, models::OperationalReading};

const READING_COLUMNS: &str = "\
	r.device_id,
	d.name AS device_name,
	r.datetime,
	r.temperature,
	r.humidity,
	r.pm25,
	r.pm10,
	r.co2,
	r.voc,
	d.latitude AS latitude,
	d.longitude AS longitude";

/// Most recent operational rows for the live-data context tier.
///
/// Prefers the newest unexpired upload session; when none exists (or the
/// newest one holds no usable rows), falls back to the most recent active
/// session regardless of expiry. The TTL bound makes the staleness policy an
/// explicit parameter instead of a side effect of the store.
pub async fn fetch_operational_readings(
	pool: &PgPool,
	limit: u32,
	now: OffsetDateTime,
	session_ttl_hours: i64,
) -> Result<Vec<OperationalReading>> {
	let not_before = now - Duration::hours(session_ttl_hours);

	if let Some(session_id) = current_session(pool, now, not_before).await? {
		let rows = session_readings(pool, session_id, limit).await?;

		if !rows.is_empty() {
			return Ok(rows);
		}
	}

	let Some(session_id) = latest_active_session(pool).await? else {
		return Ok(Vec::new());
	};

	session_readings(pool, session_id, limit).await
}

async fn current_session(
	pool: &PgPool,
	now: OffsetDateTime,
	not_before: OffsetDateTime,
) -> Result<Option<Uuid>> {
	let session_id = sqlx::query_scalar::<_, Uuid>(
		"\
SELECT id
FROM upload_sessions
WHERE status = 'active'
	AND (expires_at IS NULL OR expires_at > $1)
	AND created_at > $2
ORDER BY created_at DESC
LIMIT 1",
	)
	.bind(now)
	.bind(not_before)
	.fetch_optional(pool)
	.await?;

	Ok(session_id)
}

async fn latest_active_session(pool: &PgPool) -> Result<Option<Uuid>> {
	let session_id = sqlx::query_scalar::<_, Uuid>(
		"\
SELECT id
FROM upload_sessions
WHERE status = 'active'
ORDER BY created_at DESC
LIMIT 1",
	)
	.fetch_optional(pool)
	.await?;

	Ok(session_id)
}

async fn session_readings(
	pool: &PgPool,
	session_id: Uuid,
	limit: u32,
) -> Result<Vec<OperationalReading>> {
	let sql = format!(
		"\
SELECT
{READING_COLUMNS}
FROM sensor_readings r
LEFT JOIN devices d ON d.id = r.device_id
WHERE r.session_id = $1
	AND NOT (COALESCE(r.temperature, 0) = 0 AND COALESCE(r.humidity, 0) = 0)
ORDER BY r.datetime DESC
LIMIT $2"
	);
	let rows = sqlx::query_as::<_, OperationalReading>(&sql)
		.bind(session_id)
		.bind(i64::from(limit))
		.fetch_all(pool)
		.await?;

	Ok(rows)
}
