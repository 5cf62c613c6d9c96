use crate::{
	allowlist, fields,
	query::{self, OrderDirection, QueryDescriptor},
};

/// Outcome of parsing untrusted language-model output into a query
/// descriptor. There is no error variant on purpose: every failure carries a
/// fallback descriptor that is itself valid and allow-listed, so callers can
/// execute it unconditionally.
#[derive(Clone, Debug, PartialEq)]
pub enum ParsedQuery {
	Accepted(QueryDescriptor),
	Rejected { reason: RejectReason, error: String, fallback: QueryDescriptor },
}
impl ParsedQuery {
	/// The descriptor to execute, whichever branch was taken.
	pub fn descriptor(&self) -> &QueryDescriptor {
		match self {
			Self::Accepted(descriptor) => descriptor,
			Self::Rejected { fallback, .. } => fallback,
		}
	}

	pub fn is_accepted(&self) -> bool {
		matches!(self, Self::Accepted(_))
	}
}

/// Malformed input is expected noise from a language model; a policy
/// violation is well-formed JSON asking for something outside the allow-list
/// and is worth distinguishing in telemetry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
	Malformed,
	PolicyViolation,
}

/// The documented safe default: most recent sensor readings.
pub fn default_descriptor() -> QueryDescriptor {
	QueryDescriptor {
		table: "sensor_readings".to_string(),
		filters: Vec::new(),
		limit: query::DEFAULT_LIMIT,
		order_by: Some("datetime".to_string()),
		order_direction: OrderDirection::Desc,
		joins: Vec::new(),
	}
}

/// Turns raw model output into a descriptor that is safe to execute, failing
/// closed to [`default_descriptor`]. Never panics, never returns an error.
pub fn parse_query_params(raw: &str) -> ParsedQuery {
	let trimmed = raw.trim();

	if trimmed.is_empty() {
		return malformed("Model output is empty.");
	}
	// Cheap shape pre-check so prose and markdown-fenced responses are
	// rejected without invoking the JSON parser.
	if !trimmed.starts_with('{') || !trimmed.ends_with('}') {
		return malformed("Model output is not a bare JSON object.");
	}

	let candidate: serde_json::Value = match serde_json::from_str(trimmed) {
		Ok(candidate) => candidate,
		Err(err) => return malformed(format!("Model output is not valid JSON: {err}.")),
	};
	let descriptor = match query::validate_descriptor(&candidate) {
		Ok(descriptor) => descriptor,
		Err(err) => {
			let detail = if err.field_errors.is_empty() {
				err.message
			} else {
				format!("{} {}", err.message, err.field_errors.join(" "))
			};

			return malformed(detail);
		},
	};

	enforce_allowlists(descriptor)
}

fn enforce_allowlists(descriptor: QueryDescriptor) -> ParsedQuery {
	let mut violations = Vec::new();

	if !allowlist::table_allowed(&descriptor.table) {
		violations.push(format!("table {:?} is not allow-listed.", descriptor.table));
	}

	let mut filters = Vec::with_capacity(descriptor.filters.len());

	for filter in &descriptor.filters {
		let normalized = fields::normalize_field(&filter.field);

		if allowlist::field_allowed(&normalized) {
			filters.push(crate::query::Filter {
				field: normalized,
				operator: filter.operator,
				value: filter.value.clone(),
			});
		} else {
			violations.push(format!("filter field {:?} is not allow-listed.", filter.field));
		}
	}

	// orderBy names a column too; an unlisted one degrades to the default
	// ordering instead of failing the whole descriptor.
	let order_by = descriptor.order_by.as_deref().map(fields::normalize_field);
	let order_by_violation =
		order_by.as_deref().map(|field| !allowlist::field_allowed(field)).unwrap_or(false);

	if order_by_violation {
		violations.push(format!(
			"orderBy field {:?} is not allow-listed.",
			descriptor.order_by.as_deref().unwrap_or_default()
		));
	}

	for join in &descriptor.joins {
		if !allowlist::join_allowed(join) {
			violations.push(format!("join {:?} is not allow-listed.", join));
		}
	}

	if violations.is_empty() {
		return ParsedQuery::Accepted(QueryDescriptor {
			table: descriptor.table,
			filters,
			limit: descriptor.limit,
			order_by,
			order_direction: descriptor.order_direction,
			joins: descriptor.joins,
		});
	}

	// Keep the parts that already passed validation so a partially-good
	// response degrades instead of being discarded wholesale.
	let defaults = default_descriptor();
	let fallback = QueryDescriptor {
		table: defaults.table,
		filters: Vec::new(),
		limit: descriptor.limit,
		order_by: if order_by_violation { defaults.order_by } else { order_by },
		order_direction: descriptor.order_direction,
		joins: Vec::new(),
	};

	ParsedQuery::Rejected {
		reason: RejectReason::PolicyViolation,
		error: violations.join(" "),
		fallback,
	}
}

fn malformed(error: impl Into<String>) -> ParsedQuery {
	ParsedQuery::Rejected {
		reason: RejectReason::Malformed,
		error: error.into(),
		fallback: default_descriptor(),
	}
}
