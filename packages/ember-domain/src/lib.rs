pub mod allowlist;
pub mod fields;
pub mod parser;
pub mod query;

pub use parser::{ParsedQuery, RejectReason, default_descriptor, parse_query_params};
pub use query::{
	Filter, FilterOp, MAX_LIMIT, OrderDirection, QueryDescriptor, ValidationError,
	validate_descriptor,
};
