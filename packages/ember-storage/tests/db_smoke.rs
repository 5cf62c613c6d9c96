use serde_json::json;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use ember_config::Postgres;
use ember_domain::{Filter, FilterOp, OrderDirection, QueryDescriptor};
use ember_storage::{db::Db, knowledge, sessions, tabular};
use ember_testkit::TestDatabase;

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set EMBER_PG_DSN to run."]
async fn db_connects_and_bootstraps() {
	let Some(base_dsn) = ember_testkit::env_dsn() else {
		eprintln!("Skipping db_connects_and_bootstraps; set EMBER_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema(1_536).await.expect("Failed to ensure schema.");

	for table in ["knowledge_base", "devices", "upload_sessions", "sensor_readings", "fire_data"] {
		let count: i64 = sqlx::query_scalar(
			"SELECT count(*) FROM information_schema.tables WHERE table_name = $1",
		)
		.bind(table)
		.fetch_one(&db.pool)
		.await
		.expect("Failed to query schema tables.");

		assert_eq!(count, 1, "Expected table {table} to exist after bootstrap.");
	}

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set EMBER_PG_DSN to run."]
async fn structured_query_excludes_placeholder_rows_and_joins_devices() {
	let Some(base_dsn) = ember_testkit::env_dsn() else {
		eprintln!("Skipping; set EMBER_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema(1_536).await.expect("Failed to ensure schema.");

	let device_id = Uuid::new_v4();
	let now = OffsetDateTime::now_utc();

	sqlx::query("INSERT INTO devices (id, name, latitude, longitude) VALUES ($1, $2, $3, $4)")
		.bind(device_id)
		.bind("Ridge Station 3")
		.bind(-37.42)
		.bind(144.98)
		.execute(&db.pool)
		.await
		.expect("Failed to seed device.");

	let insert_reading = "\
INSERT INTO sensor_readings (id, device_id, datetime, temperature, humidity, pm25)
VALUES ($1, $2, $3, $4, $5, $6)";

	// One real reading and one all-zero placeholder.
	sqlx::query(insert_reading)
		.bind(Uuid::new_v4())
		.bind(device_id)
		.bind(now)
		.bind(31.5)
		.bind(22.0)
		.bind(14.0)
		.execute(&db.pool)
		.await
		.expect("Failed to seed reading.");
	sqlx::query(insert_reading)
		.bind(Uuid::new_v4())
		.bind(device_id)
		.bind(now - Duration::minutes(5))
		.bind(0.0)
		.bind(0.0)
		.bind(0.0)
		.execute(&db.pool)
		.await
		.expect("Failed to seed placeholder reading.");

	let descriptor = QueryDescriptor {
		table: "sensor_readings".to_string(),
		filters: vec![Filter {
			field: "temperature".to_string(),
			operator: FilterOp::Gt,
			value: json!(20),
		}],
		limit: 50,
		order_by: Some("datetime".to_string()),
		order_direction: OrderDirection::Desc,
		joins: Vec::new(),
	};
	let rows = tabular::fetch_rows(&db.pool, &descriptor).await.expect("Query must succeed.");

	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0]["device_name"], json!("Ridge Station 3"));
	assert_eq!(rows[0]["latitude"], json!(-37.42));
	assert_eq!(rows[0]["temperature"], json!(31.5));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set EMBER_PG_DSN to run."]
async fn text_search_ranks_seeded_knowledge() {
	let Some(base_dsn) = ember_testkit::env_dsn() else {
		eprintln!("Skipping; set EMBER_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema(1_536).await.expect("Failed to ensure schema.");

	let insert = "\
INSERT INTO knowledge_base (id, title, content, source, category, data_type)
VALUES ($1, $2, $3, $4, $5, $6)";

	sqlx::query(insert)
		.bind(Uuid::new_v4())
		.bind("Fire weather basics")
		.bind("Hot dry wind drives fire spread.")
		.bind("Knowledge base")
		.bind("fire")
		.bind("guidance")
		.execute(&db.pool)
		.await
		.expect("Failed to seed knowledge.");
	sqlx::query(insert)
		.bind(Uuid::new_v4())
		.bind("Humidity and comfort")
		.bind("Indoor humidity guidance.")
		.bind("Knowledge base")
		.bind("environmental")
		.bind("guidance")
		.execute(&db.pool)
		.await
		.expect("Failed to seed knowledge.");

	let hits =
		knowledge::text_search(&db.pool, "fire wind", 10).await.expect("Search must succeed.");

	assert_eq!(hits.len(), 1);
	assert_eq!(hits[0].title, "Fire weather basics");
	assert!(hits[0].score > 0.0);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set EMBER_PG_DSN to run."]
async fn session_readings_fall_back_to_the_latest_active_session() {
	let Some(base_dsn) = ember_testkit::env_dsn() else {
		eprintln!("Skipping; set EMBER_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema(1_536).await.expect("Failed to ensure schema.");

	let now = OffsetDateTime::now_utc();
	let stale_session = Uuid::new_v4();
	let device_id = Uuid::new_v4();

	// The only session is older than the TTL window, so the direct path finds
	// nothing and the latest-active fallback must serve it.
	sqlx::query("INSERT INTO upload_sessions (id, status, created_at) VALUES ($1, 'active', $2)")
		.bind(stale_session)
		.bind(now - Duration::hours(72))
		.execute(&db.pool)
		.await
		.expect("Failed to seed session.");
	sqlx::query("INSERT INTO devices (id, name) VALUES ($1, $2)")
		.bind(device_id)
		.bind("Valley Station 1")
		.execute(&db.pool)
		.await
		.expect("Failed to seed device.");
	sqlx::query(
		"\
INSERT INTO sensor_readings (id, device_id, session_id, datetime, temperature, humidity)
VALUES ($1, $2, $3, $4, $5, $6)",
	)
	.bind(Uuid::new_v4())
	.bind(device_id)
	.bind(stale_session)
	.bind(now - Duration::hours(72))
	.bind(24.0)
	.bind(55.0)
	.execute(&db.pool)
	.await
	.expect("Failed to seed reading.");

	let readings = sessions::fetch_operational_readings(&db.pool, 10, now, 24)
		.await
		.expect("Fetch must succeed.");

	assert_eq!(readings.len(), 1);
	assert_eq!(readings[0].device_name.as_deref(), Some("Valley Station 1"));
	assert_eq!(readings[0].temperature, Some(24.0));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
