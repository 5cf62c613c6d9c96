use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::RetrievalService;
use ember_domain::QueryDescriptor;
use ember_storage::tabular;

/// The executor's caller-facing result. A store failure is reported, never
/// propagated: the caller always has something structurally valid to render.
#[derive(Clone, Debug, Serialize)]
pub struct ExecutionReport {
	pub success: bool,
	pub rows: Vec<Value>,
	pub count: usize,
	pub table: String,
	pub error: Option<String>,
}

impl RetrievalService {
	pub async fn execute_query(&self, descriptor: &QueryDescriptor) -> ExecutionReport {
		match tabular::fetch_rows(&self.db.pool, descriptor).await {
			Ok(rows) => ExecutionReport {
				success: true,
				count: rows.len(),
				rows,
				table: descriptor.table.clone(),
				error: None,
			},
			Err(err) => {
				warn!(
					table = descriptor.table.as_str(),
					error = %err,
					"Structured query failed."
				);

				ExecutionReport {
					success: false,
					rows: Vec::new(),
					count: 0,
					table: descriptor.table.clone(),
					error: Some(err.to_string()),
				}
			},
		}
	}
}
