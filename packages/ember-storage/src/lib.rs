pub mod db;
pub mod knowledge;
pub mod models;
pub mod schema;
pub mod sessions;
pub mod tabular;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Renders a vector as pgvector text (`[0.1,0.2,...]`) for `$n::text::vector`
/// binds.
pub fn vector_to_pg(vec: &[f32]) -> String {
	let mut out = String::with_capacity(vec.len() * 8);
	out.push('[');

	for (i, value) in vec.iter().enumerate() {
		if i > 0 {
			out.push(',');
		}
		out.push_str(&value.to_string());
	}

	out.push(']');

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn renders_pgvector_text() {
		assert_eq!(vector_to_pg(&[]), "[]");
		assert_eq!(vector_to_pg(&[0.5, 1.0, -2.0]), "[0.5,1,-2]");
	}
}
