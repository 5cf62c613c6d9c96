use sqlx::PgPool;

use crate::{Result, models::KnowledgeHit, vector_to_pg};

/// Nearest-neighbor search over the knowledge store. `threshold` is a minimum
/// cosine similarity in `[0, 1]`.
pub async fn vector_search(
	pool: &PgPool,
	embedding: &[f32],
	threshold: f32,
	limit: u32,
) -> Result<Vec<KnowledgeHit>> {
	let vec_text = vector_to_pg(embedding);
	let hits = sqlx::query_as::<_, KnowledgeHit>(
		"\
SELECT
	title,
	content,
	source,
	category,
	data_type,
	(1 - (embedding <=> $1::text::vector))::real AS score
FROM knowledge_base
WHERE embedding IS NOT NULL
	AND (1 - (embedding <=> $1::text::vector)) >= $2
ORDER BY embedding <=> $1::text::vector
LIMIT $3",
	)
	.bind(vec_text.as_str())
	.bind(threshold)
	.bind(i64::from(limit))
	.fetch_all(pool)
	.await?;

	Ok(hits)
}

/// Lexical search over the same store, ranked by `ts_rank_cd`.
pub async fn text_search(pool: &PgPool, query: &str, limit: u32) -> Result<Vec<KnowledgeHit>> {
	let tsquery = build_tsquery(query);

	if tsquery.is_empty() {
		return Ok(Vec::new());
	}

	let hits = sqlx::query_as::<_, KnowledgeHit>(
		"\
SELECT
	title,
	content,
	source,
	category,
	data_type,
	ts_rank_cd(search_vec, to_tsquery('english', $1))::real AS score
FROM knowledge_base
WHERE search_vec @@ to_tsquery('english', $1)
ORDER BY score DESC
LIMIT $2",
	)
	.bind(tsquery.as_str())
	.bind(i64::from(limit))
	.fetch_all(pool)
	.await?;

	Ok(hits)
}

/// Prefix-matching tsquery from free text. Terms are stripped down to
/// alphanumerics so user input can never smuggle tsquery syntax.
fn build_tsquery(query: &str) -> String {
	query
		.split_whitespace()
		.filter_map(|word| {
			let cleaned: String =
				word.chars().filter(|ch| ch.is_ascii_alphanumeric()).collect();

			if cleaned.is_empty() { None } else { Some(format!("{cleaned}:*")) }
		})
		.collect::<Vec<_>>()
		.join(" & ")
}
