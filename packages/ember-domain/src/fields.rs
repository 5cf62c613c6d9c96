/// Canonical field identity for the environmental dataset.
///
/// The upstream rows spell the same column many ways (`pm25`, `pm25Standard`,
/// `PM2.5`). Both the allow-list and the canonicalizer go through this one
/// function so they agree on what a field is called.
pub fn normalize_field(raw: &str) -> String {
	let lowered = raw.trim().to_ascii_lowercase();

	// Separator stripping is only safe on plain identifier text. Anything else
	// is left untouched so it fails the allow-list as-is.
	if !lowered.chars().all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-')) {
		return lowered;
	}

	let folded: String = lowered.chars().filter(|ch| !matches!(ch, '.' | '-')).collect();

	match folded.as_str() {
		"pm1_0" | "pm1standard" => "pm1".to_string(),
		"pm2_5" | "pm25standard" => "pm25".to_string(),
		"pm4_0" | "pm4standard" => "pm4".to_string(),
		"pm10_0" | "pm10standard" => "pm10".to_string(),
		"temp" => "temperature".to_string(),
		"rh" | "relative_humidity" | "relativehumidity" => "humidity".to_string(),
		"lat" => "latitude".to_string(),
		"lon" | "lng" | "long" => "longitude".to_string(),
		"time" | "date" | "timestamp" | "created_at" => "datetime".to_string(),
		_ => folded,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn maps_particulate_aliases() {
		assert_eq!(normalize_field("PM2.5"), "pm25");
		assert_eq!(normalize_field("pm25Standard"), "pm25");
		assert_eq!(normalize_field("pm2_5"), "pm25");
		assert_eq!(normalize_field("pm10"), "pm10");
	}

	#[test]
	fn maps_coordinate_and_weather_aliases() {
		assert_eq!(normalize_field("lat"), "latitude");
		assert_eq!(normalize_field("LNG"), "longitude");
		assert_eq!(normalize_field("rh"), "humidity");
		assert_eq!(normalize_field("temp"), "temperature");
	}

	#[test]
	fn leaves_canonical_names_alone() {
		assert_eq!(normalize_field("wind_speed"), "wind_speed");
		assert_eq!(normalize_field("datetime"), "datetime");
	}

	#[test]
	fn does_not_fold_non_identifier_text() {
		assert_eq!(normalize_field("datetime; --"), "datetime; --");
		assert_eq!(normalize_field("a b"), "a b");
	}
}
