use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MAX_LIMIT: u32 = 500;
pub const DEFAULT_LIMIT: u32 = 100;

/// A structured request against the tabular store. Only descriptors that have
/// passed [`validate_descriptor`] and the allow-list checks in
/// [`crate::parser`] reach the executor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescriptor {
	pub table: String,
	#[serde(default)]
	pub filters: Vec<Filter>,
	pub limit: u32,
	pub order_by: Option<String>,
	pub order_direction: OrderDirection,
	#[serde(default)]
	pub joins: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Filter {
	pub field: String,
	pub operator: FilterOp,
	pub value: Value,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
	Eq,
	Neq,
	Gt,
	Gte,
	Lt,
	Lte,
	Like,
	Ilike,
	Is,
	NotIs,
}
impl FilterOp {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"eq" => Some(Self::Eq),
			"neq" => Some(Self::Neq),
			"gt" => Some(Self::Gt),
			"gte" => Some(Self::Gte),
			"lt" => Some(Self::Lt),
			"lte" => Some(Self::Lte),
			"like" => Some(Self::Like),
			"ilike" => Some(Self::Ilike),
			"is" => Some(Self::Is),
			"not_is" => Some(Self::NotIs),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Eq => "eq",
			Self::Neq => "neq",
			Self::Gt => "gt",
			Self::Gte => "gte",
			Self::Lt => "lt",
			Self::Lte => "lte",
			Self::Like => "like",
			Self::Ilike => "ilike",
			Self::Is => "is",
			Self::NotIs => "not_is",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderDirection {
	Asc,
	Desc,
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
	pub message: String,
	pub field_errors: Vec<String>,
}
impl ValidationError {
	fn new(message: impl Into<String>, field_errors: Vec<String>) -> Self {
		Self { message: message.into(), field_errors }
	}
}

/// Pure structural check: is the candidate well-formed? Allow-list policy is
/// deliberately not applied here; [`crate::parser`] layers it on top.
pub fn validate_descriptor(candidate: &Value) -> Result<QueryDescriptor, ValidationError> {
	let Some(object) = candidate.as_object() else {
		return Err(ValidationError::new("Query candidate must be a JSON object.", Vec::new()));
	};
	let mut field_errors = Vec::new();
	let table = match object.get("table").and_then(Value::as_str) {
		Some(table) if !table.trim().is_empty() => table.trim().to_string(),
		Some(_) => {
			field_errors.push("table must be a non-empty string.".to_string());

			String::new()
		},
		None => {
			field_errors.push("table is required and must be a string.".to_string());

			String::new()
		},
	};
	let filters = match object.get("filters") {
		None | Some(Value::Null) => Vec::new(),
		Some(Value::Array(items)) => validate_filters(items, &mut field_errors),
		Some(_) => {
			field_errors.push("filters must be an array.".to_string());

			Vec::new()
		},
	};
	let limit = match object.get("limit") {
		None | Some(Value::Null) => DEFAULT_LIMIT,
		Some(value) => match value.as_u64() {
			Some(limit) => (limit as u32).clamp(1, MAX_LIMIT),
			None => {
				field_errors.push("limit must be a positive integer.".to_string());

				DEFAULT_LIMIT
			},
		},
	};
	let order_by = match object.get("orderBy").or_else(|| object.get("order_by")) {
		None | Some(Value::Null) => None,
		Some(Value::String(field)) if !field.trim().is_empty() => Some(field.trim().to_string()),
		Some(_) => {
			field_errors.push("orderBy must be a non-empty string.".to_string());

			None
		},
	};
	let order_direction =
		match object.get("orderDirection").or_else(|| object.get("order_direction")) {
			None | Some(Value::Null) => OrderDirection::Desc,
			Some(Value::String(raw)) => match raw.as_str() {
				"asc" => OrderDirection::Asc,
				"desc" => OrderDirection::Desc,
				_ => {
					field_errors.push("orderDirection must be one of asc, desc.".to_string());

					OrderDirection::Desc
				},
			},
			Some(_) => {
				field_errors.push("orderDirection must be a string.".to_string());

				OrderDirection::Desc
			},
		};
	let joins = match object.get("joins") {
		None | Some(Value::Null) => Vec::new(),
		Some(Value::Array(items)) => {
			let mut joins = Vec::with_capacity(items.len());

			for (index, item) in items.iter().enumerate() {
				match item.as_str() {
					Some(join) if !join.trim().is_empty() => joins.push(join.trim().to_string()),
					_ => field_errors
						.push(format!("joins[{index}] must be a non-empty string.")),
				}
			}

			joins
		},
		Some(_) => {
			field_errors.push("joins must be an array of table names.".to_string());

			Vec::new()
		},
	};

	if !field_errors.is_empty() {
		return Err(ValidationError::new(
			"Query candidate does not match the descriptor shape.",
			field_errors,
		));
	}

	Ok(QueryDescriptor { table, filters, limit, order_by, order_direction, joins })
}

fn validate_filters(items: &[Value], field_errors: &mut Vec<String>) -> Vec<Filter> {
	let mut filters = Vec::with_capacity(items.len());

	for (index, item) in items.iter().enumerate() {
		let Some(object) = item.as_object() else {
			field_errors.push(format!("filters[{index}] must be an object."));

			continue;
		};
		let field = match object.get("field").and_then(Value::as_str) {
			Some(field) if !field.trim().is_empty() => field.trim().to_string(),
			_ => {
				field_errors.push(format!("filters[{index}].field must be a non-empty string."));

				continue;
			},
		};
		let operator = match object.get("operator").and_then(Value::as_str) {
			Some(raw) => match FilterOp::parse(raw) {
				Some(operator) => operator,
				None => {
					field_errors
						.push(format!("filters[{index}].operator {raw:?} is not recognized."));

					continue;
				},
			},
			None => {
				field_errors.push(format!("filters[{index}].operator must be a string."));

				continue;
			},
		};
		let value = match object.get("value") {
			Some(value @ (Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_))) =>
				value.clone(),
			Some(_) => {
				field_errors.push(format!("filters[{index}].value must be a scalar."));

				continue;
			},
			None => {
				field_errors.push(format!("filters[{index}].value is required."));

				continue;
			},
		};

		filters.push(Filter { field, operator, value });
	}

	filters
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn validates_a_full_descriptor() {
		let candidate = json!({
			"table": "air_quality",
			"filters": [{"field": "temperature", "operator": "gt", "value": 20}],
			"limit": 50,
			"orderBy": "datetime",
			"orderDirection": "desc"
		});
		let descriptor = validate_descriptor(&candidate).expect("Descriptor must validate.");

		assert_eq!(descriptor.table, "air_quality");
		assert_eq!(descriptor.limit, 50);
		assert_eq!(descriptor.filters.len(), 1);
		assert_eq!(descriptor.filters[0].operator, FilterOp::Gt);
		assert_eq!(descriptor.order_by.as_deref(), Some("datetime"));
		assert_eq!(descriptor.order_direction, OrderDirection::Desc);
	}

	#[test]
	fn defaults_limit_and_direction() {
		let descriptor = validate_descriptor(&json!({"table": "fire_data"}))
			.expect("Minimal descriptor must validate.");

		assert_eq!(descriptor.limit, DEFAULT_LIMIT);
		assert_eq!(descriptor.order_direction, OrderDirection::Desc);
		assert!(descriptor.filters.is_empty());
		assert!(descriptor.joins.is_empty());
	}

	#[test]
	fn clamps_limit_into_range() {
		let over = validate_descriptor(&json!({"table": "fire_data", "limit": 1000}))
			.expect("Descriptor with oversized limit must still validate.");
		let under = validate_descriptor(&json!({"table": "fire_data", "limit": 0}))
			.expect("Descriptor with zero limit must still validate.");

		assert_eq!(over.limit, MAX_LIMIT);
		assert_eq!(under.limit, 1);
	}

	#[test]
	fn rejects_unknown_operator_with_field_error() {
		let candidate = json!({
			"table": "air_quality",
			"filters": [{"field": "temperature", "operator": "between", "value": 20}]
		});
		let err = validate_descriptor(&candidate).expect_err("Unknown operator must fail.");

		assert_eq!(err.field_errors.len(), 1);
		assert!(err.field_errors[0].contains("between"));
	}

	#[test]
	fn rejects_missing_table() {
		assert!(validate_descriptor(&json!({"limit": 10})).is_err());
		assert!(validate_descriptor(&json!({"table": "  "})).is_err());
		assert!(validate_descriptor(&json!("not an object")).is_err());
	}

	#[test]
	fn rejects_non_scalar_filter_values() {
		let candidate = json!({
			"table": "air_quality",
			"filters": [{"field": "temperature", "operator": "eq", "value": {"gt": 20}}]
		});

		assert!(validate_descriptor(&candidate).is_err());
	}
}
