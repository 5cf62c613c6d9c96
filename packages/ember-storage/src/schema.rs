/// Schema bootstrap for tests and local development. In production the data
/// tables belong to the ingestion side and this subsystem only reads them.
pub fn render_schema(vector_dim: u32) -> String {
	SCHEMA_SQL.replace("<VECTOR_DIM>", &vector_dim.to_string())
}

const SCHEMA_SQL: &str = "\
CREATE EXTENSION IF NOT EXISTS vector;

CREATE TABLE IF NOT EXISTS knowledge_base (
	id UUID PRIMARY KEY,
	title TEXT NOT NULL,
	content TEXT NOT NULL,
	source TEXT NOT NULL DEFAULT 'Unknown',
	category TEXT,
	data_type TEXT,
	embedding VECTOR(<VECTOR_DIM>),
	search_vec TSVECTOR GENERATED ALWAYS AS (to_tsvector('english', title || ' ' || content)) STORED,
	created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX IF NOT EXISTS knowledge_base_search_vec_idx ON knowledge_base USING GIN (search_vec);

CREATE TABLE IF NOT EXISTS devices (
	id UUID PRIMARY KEY,
	name TEXT NOT NULL,
	latitude DOUBLE PRECISION,
	longitude DOUBLE PRECISION
);

CREATE TABLE IF NOT EXISTS upload_sessions (
	id UUID PRIMARY KEY,
	status TEXT NOT NULL DEFAULT 'active',
	created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
	expires_at TIMESTAMPTZ
);

CREATE TABLE IF NOT EXISTS sensor_readings (
	id UUID PRIMARY KEY,
	device_id UUID REFERENCES devices(id),
	session_id UUID REFERENCES upload_sessions(id),
	datetime TIMESTAMPTZ NOT NULL,
	temperature DOUBLE PRECISION,
	humidity DOUBLE PRECISION,
	pressure DOUBLE PRECISION,
	pm1 DOUBLE PRECISION,
	pm25 DOUBLE PRECISION,
	pm4 DOUBLE PRECISION,
	pm10 DOUBLE PRECISION,
	co2 DOUBLE PRECISION,
	voc DOUBLE PRECISION,
	nox DOUBLE PRECISION,
	battery DOUBLE PRECISION
);

CREATE INDEX IF NOT EXISTS sensor_readings_datetime_idx ON sensor_readings (datetime DESC);

CREATE TABLE IF NOT EXISTS air_quality (
	id UUID PRIMARY KEY,
	session_id UUID REFERENCES upload_sessions(id),
	datetime TIMESTAMPTZ NOT NULL,
	temperature DOUBLE PRECISION,
	humidity DOUBLE PRECISION,
	pm25 DOUBLE PRECISION,
	pm10 DOUBLE PRECISION,
	aqi DOUBLE PRECISION,
	latitude DOUBLE PRECISION,
	longitude DOUBLE PRECISION
);

CREATE TABLE IF NOT EXISTS fire_data (
	id UUID PRIMARY KEY,
	latitude DOUBLE PRECISION,
	longitude DOUBLE PRECISION,
	brightness DOUBLE PRECISION,
	confidence DOUBLE PRECISION,
	frp DOUBLE PRECISION,
	satellite TEXT,
	acq_date DATE,
	acq_time TEXT,
	datetime TIMESTAMPTZ
);

CREATE TABLE IF NOT EXISTS weather_data (
	id UUID PRIMARY KEY,
	datetime TIMESTAMPTZ NOT NULL,
	temperature DOUBLE PRECISION,
	humidity DOUBLE PRECISION,
	pressure DOUBLE PRECISION,
	wind_speed DOUBLE PRECISION,
	wind_direction DOUBLE PRECISION,
	rainfall DOUBLE PRECISION,
	uv_index DOUBLE PRECISION,
	latitude DOUBLE PRECISION,
	longitude DOUBLE PRECISION
)";
