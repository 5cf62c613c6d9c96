use ember_domain::{FilterOp, MAX_LIMIT, OrderDirection, QueryDescriptor, allowlist, fields};
use serde_json::Value;
use sqlx::{PgPool, Row};
use tracing::warn;

use crate::{Error, Result};

/// Executes a validated descriptor against the tabular store and returns the
/// matched rows as JSON objects.
///
/// Identifiers (table, columns) are interpolated into the statement, so
/// membership in the allow-lists is re-checked here even though the parser
/// already enforced it. Values are always bound, never interpolated.
pub async fn fetch_rows(pool: &PgPool, descriptor: &QueryDescriptor) -> Result<Vec<Value>> {
	let plan = build_query(descriptor)?;
	let mut query = sqlx::query(&plan.sql);

	for bind in plan.binds {
		query = match bind {
			BindValue::Int(value) => query.bind(value),
			BindValue::Float(value) => query.bind(value),
			BindValue::Text(value) => query.bind(value),
			BindValue::Bool(value) => query.bind(value),
		};
	}

	let rows = query.fetch_all(pool).await?;
	let mut out = Vec::with_capacity(rows.len());

	for row in rows {
		out.push(row.try_get::<Value, _>("row")?);
	}

	Ok(out)
}

#[derive(Debug, Clone, PartialEq)]
enum BindValue {
	Int(i64),
	Float(f64),
	Text(String),
	Bool(bool),
}

#[derive(Debug)]
struct QueryPlan {
	sql: String,
	binds: Vec<BindValue>,
}
impl QueryPlan {
	fn placeholder(&mut self, bind: BindValue) -> String {
		self.binds.push(bind);

		format!("${}", self.binds.len())
	}
}

fn build_query(descriptor: &QueryDescriptor) -> Result<QueryPlan> {
	let table = descriptor.table.as_str();

	if !allowlist::table_allowed(table) {
		return Err(Error::InvalidArgument(format!("Table {table:?} is not allow-listed.")));
	}

	let mut plan = QueryPlan { sql: String::new(), binds: Vec::new() };
	// Readings rows are joined to their device for coordinates whether or not
	// the descriptor asked; downstream consumers need location. Tables without
	// a known join skip it silently.
	let inner = if table_has_device_join(table) {
		format!(
			"SELECT r.*, d.name AS device_name, d.latitude AS latitude, d.longitude AS longitude \
			 FROM {table} r LEFT JOIN devices d ON d.id = r.device_id"
		)
	} else {
		format!("SELECT r.* FROM {table} r")
	};
	let mut conditions = Vec::new();

	for filter in &descriptor.filters {
		// The parser normalizes field names, but descriptors can also be built
		// programmatically. Normalize again so the interpolated identifier is
		// always the canonical allow-listed spelling.
		let field = fields::normalize_field(&filter.field);

		if !allowlist::field_allowed(&field) {
			warn!(field = filter.field.as_str(), "Skipping filter on unlisted field.");

			continue;
		}
		if let Some(condition) = render_filter(&mut plan, &field, filter) {
			conditions.push(condition);
		}
	}

	// Baseline data-quality predicates are not user-controlled and always
	// apply after user filters.
	conditions.extend(baseline_predicates(table).iter().map(|predicate| predicate.to_string()));

	let order_column = match descriptor.order_by.as_deref().map(fields::normalize_field) {
		Some(field) if allowlist::field_allowed(&field) => field,
		Some(field) => {
			warn!(field = field.as_str(), "Ignoring orderBy on unlisted field.");

			"datetime".to_string()
		},
		None => "datetime".to_string(),
	};
	let order_keyword = match descriptor.order_direction {
		OrderDirection::Asc => "ASC",
		OrderDirection::Desc => "DESC",
	};
	// Defense in depth: the parser already clamps, clamp again here.
	let limit = descriptor.limit.clamp(1, MAX_LIMIT);
	let limit_placeholder = plan.placeholder(BindValue::Int(i64::from(limit)));
	let where_clause = if conditions.is_empty() {
		String::new()
	} else {
		format!(" WHERE {}", conditions.join(" AND "))
	};

	plan.sql = format!(
		"SELECT row_to_json(t) AS row FROM ({inner}{where_clause} ORDER BY r.{order_column} {order_keyword} LIMIT {limit_placeholder}) t"
	);

	Ok(plan)
}

fn render_filter(
	plan: &mut QueryPlan,
	field: &str,
	filter: &ember_domain::Filter,
) -> Option<String> {
	let column = format!("r.{field}");

	match (filter.operator, &filter.value) {
		(FilterOp::Eq, Value::Null) => Some(format!("{column} IS NULL")),
		(FilterOp::Neq, Value::Null) => Some(format!("{column} IS NOT NULL")),
		(
			FilterOp::Eq
			| FilterOp::Neq
			| FilterOp::Gt
			| FilterOp::Gte
			| FilterOp::Lt
			| FilterOp::Lte,
			value,
		) => {
			let sql_op = comparison_keyword(filter.operator);

			match value {
				Value::Number(number) =>
					if let Some(int) = number.as_i64() {
						let placeholder = plan.placeholder(BindValue::Int(int));

						Some(format!("{column} {sql_op} {placeholder}"))
					} else {
						let float = number.as_f64()?;
						let placeholder = plan.placeholder(BindValue::Float(float));

						Some(format!("{column} {sql_op} {placeholder}"))
					},
				Value::String(text) => {
					let placeholder = plan.placeholder(BindValue::Text(text.clone()));
					let cast = temporal_cast(field);

					Some(format!("{column} {sql_op} {placeholder}{cast}"))
				},
				Value::Bool(flag) if matches!(filter.operator, FilterOp::Eq | FilterOp::Neq) => {
					let placeholder = plan.placeholder(BindValue::Bool(*flag));

					Some(format!("{column} {sql_op} {placeholder}"))
				},
				_ => {
					// The operator set is closed by construction; a value the
					// operator cannot apply to becomes a no-op, not a failure.
					warn!(
						field,
						operator = filter.operator.as_str(),
						"Skipping filter with inapplicable value."
					);

					None
				},
			}
		},
		(FilterOp::Like | FilterOp::Ilike, Value::String(pattern)) => {
			let keyword = if filter.operator == FilterOp::Like { "LIKE" } else { "ILIKE" };
			let placeholder = plan.placeholder(BindValue::Text(pattern.clone()));

			Some(format!("{column} {keyword} {placeholder}"))
		},
		(FilterOp::Is, Value::Null) => Some(format!("{column} IS NULL")),
		(FilterOp::NotIs, Value::Null) => Some(format!("{column} IS NOT NULL")),
		(FilterOp::Is, Value::Bool(flag)) =>
			Some(format!("{column} IS {}", if *flag { "TRUE" } else { "FALSE" })),
		(FilterOp::NotIs, Value::Bool(flag)) =>
			Some(format!("{column} IS NOT {}", if *flag { "TRUE" } else { "FALSE" })),
		(operator, _) => {
			warn!(
				field,
				operator = operator.as_str(),
				"Skipping filter with inapplicable value."
			);

			None
		},
	}
}

fn comparison_keyword(operator: FilterOp) -> &'static str {
	match operator {
		FilterOp::Eq => "=",
		FilterOp::Neq => "<>",
		FilterOp::Gt => ">",
		FilterOp::Gte => ">=",
		FilterOp::Lt => "<",
		FilterOp::Lte => "<=",
		FilterOp::Like | FilterOp::Ilike | FilterOp::Is | FilterOp::NotIs => unreachable!(),
	}
}

/// String comparisons against temporal columns need an explicit cast; the
/// model emits dates as ISO-8601 text.
fn temporal_cast(field: &str) -> &'static str {
	match field {
		"datetime" => "::timestamptz",
		"acq_date" => "::date",
		_ => "",
	}
}

fn table_has_device_join(table: &str) -> bool {
	table == "sensor_readings"
}

/// Placeholder rows (all-zero temperature and humidity) and detections with
/// missing or null-island coordinates are excluded unconditionally.
fn baseline_predicates(table: &str) -> &'static [&'static str] {
	match table {
		"sensor_readings" | "air_quality" =>
			&["NOT (COALESCE(r.temperature, 0) = 0 AND COALESCE(r.humidity, 0) = 0)"],
		"fire_data" => &[
			"r.latitude IS NOT NULL",
			"r.longitude IS NOT NULL",
			"(r.latitude <> 0 OR r.longitude <> 0)",
		],
		_ => &[],
	}
}
