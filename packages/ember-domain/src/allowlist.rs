use crate::fields;

/// Tables the structured query executor may touch. Anything else is rejected
/// before it reaches the store, whatever the language model produced.
pub const ALLOWED_TABLES: &[&str] = &["sensor_readings", "air_quality", "fire_data", "weather_data"];

/// Auxiliary tables a descriptor may ask to join.
pub const ALLOWED_JOINS: &[&str] = &["devices"];

/// Columns filters and ordering may reference, after normalization.
pub const ALLOWED_FIELDS: &[&str] = &[
	"id",
	"device_id",
	"session_id",
	"datetime",
	"temperature",
	"humidity",
	"pressure",
	"pm1",
	"pm25",
	"pm4",
	"pm10",
	"co2",
	"voc",
	"nox",
	"aqi",
	"latitude",
	"longitude",
	"wind_speed",
	"wind_direction",
	"rainfall",
	"uv_index",
	"fire_risk",
	"brightness",
	"confidence",
	"frp",
	"acq_date",
	"acq_time",
	"satellite",
	"battery",
];

pub fn table_allowed(table: &str) -> bool {
	let table = table.trim();

	ALLOWED_TABLES.iter().any(|allowed| *allowed == table)
}

pub fn join_allowed(join: &str) -> bool {
	let join = join.trim();

	ALLOWED_JOINS.iter().any(|allowed| *allowed == join)
}

pub fn field_allowed(field: &str) -> bool {
	let normalized = fields::normalize_field(field);

	ALLOWED_FIELDS.iter().any(|allowed| *allowed == normalized)
}
