use ember_domain::{ParsedQuery, allowlist, parse_query_params};

fn descriptor_is_safe(parsed: &ParsedQuery) -> bool {
	let descriptor = parsed.descriptor();

	allowlist::table_allowed(&descriptor.table)
		&& descriptor.filters.iter().all(|filter| allowlist::field_allowed(&filter.field))
		&& descriptor.order_by.as_deref().map(allowlist::field_allowed).unwrap_or(true)
		&& descriptor.joins.iter().all(|join| allowlist::join_allowed(join))
		&& (1..=500).contains(&descriptor.limit)
}

#[test]
fn no_input_reaches_an_unlisted_table_or_field() {
	let inputs = [
		"",
		"   ",
		"null",
		"true",
		"[]",
		"{}",
		"{\"table\": 42}",
		"{\"table\": \"sensor_readings\"}",
		"{\"table\": \"pg_shadow\"}",
		"{\"table\": \"users; DROP TABLE users;--\", \"limit\": 100}",
		"{\"table\": \"air_quality\", \"filters\": [{\"field\": \"password\", \"operator\": \"eq\", \"value\": 1}]}",
		"{\"table\": \"air_quality\", \"filters\": [{\"field\": \"temperature\", \"operator\": \"union\", \"value\": 1}]}",
		"{\"table\": \"air_quality\", \"orderBy\": \"pg_sleep(10)\"}",
		"{\"table\": \"air_quality\", \"joins\": [\"pg_catalog\"]}",
		"{\"table\": \"air_quality\", \"limit\": 99999}",
		"{\"table\": \"air_quality\", \"limit\": -5}",
		"The query you want is: {\"table\": \"air_quality\"}",
		"```json\n{\"table\": \"air_quality\"}\n```",
		"{\"table\": \"air_quality\", \"filters\": \"temperature > 20\"}",
		"{\"table\": \"weather_data\", \"filters\": [{\"field\": \"wind_speed\", \"operator\": \"gte\", \"value\": 40}], \"orderBy\": \"datetime\"}",
	];

	for input in inputs {
		let parsed = parse_query_params(input);

		assert!(
			descriptor_is_safe(&parsed),
			"Input {input:?} produced an unsafe descriptor: {parsed:?}"
		);
	}
}

#[test]
fn accepted_queries_survive_round_trips_through_the_parser() {
	let raw = r#"{"table":"fire_data","filters":[{"field":"confidence","operator":"gte","value":80}],"limit":20}"#;
	let ParsedQuery::Accepted(descriptor) = parse_query_params(raw) else {
		panic!("Query must be accepted.");
	};
	let rendered = serde_json::to_string(&descriptor).expect("Descriptor must serialize.");
	let ParsedQuery::Accepted(reparsed) = parse_query_params(&rendered) else {
		panic!("Serialized descriptor must be accepted again.");
	};

	assert_eq!(descriptor, reparsed);
}
