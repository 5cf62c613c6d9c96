use crate::canonical::RawRecord;
use crate::retrieve::ContextType;

const STATIC_SOURCE: &str = "Built-in knowledge";

/// The terminal retrieval tier: a fixed in-memory knowledge set keyed by
/// context type. Must never be empty; the whole fallback chain relies on it.
pub fn static_knowledge(context_type: ContextType) -> Vec<RawRecord> {
	let snippets: &[(&str, &str, &str)] = match context_type {
		ContextType::Fire => &[
			(
				"Fire weather basics",
				"Fire spread is driven by fuel dryness, wind speed, and slope. Hot days with \
				 relative humidity below 30% and winds above 25 km/h mark elevated fire danger.",
				"fire",
			),
			(
				"Smoke and air quality",
				"Bushfire smoke raises PM2.5 sharply. Sustained PM2.5 above 35 ug/m3 is unhealthy \
				 for sensitive groups; above 150 ug/m3 everyone should limit outdoor exposure.",
				"fire",
			),
			(
				"Defensible space",
				"Clearing fine fuels within 10 meters of structures and maintaining a low-fuel \
				 buffer to 30 meters materially slows fire approach and ember ignition.",
				"fire",
			),
			(
				"Satellite hotspot confidence",
				"Thermal hotspot detections carry a confidence rating; low-confidence detections \
				 near water bodies or industrial sites are often false positives.",
				"fire",
			),
		],
		ContextType::General => &[
			(
				"PM2.5 guidance",
				"PM2.5 refers to particles under 2.5 micrometers that penetrate deep into the \
				 lungs. A 24-hour average under 12 ug/m3 is good; 12-35 is moderate.",
				"environmental",
			),
			(
				"Reading CO2 levels",
				"Outdoor CO2 sits near 420 ppm. Indoor readings above 1000 ppm indicate poor \
				 ventilation; above 2000 ppm occupants commonly report drowsiness.",
				"environmental",
			),
			(
				"Humidity and comfort",
				"Relative humidity between 30% and 60% is comfortable for most people. Very low \
				 humidity increases dust suspension and static; very high humidity slows cooling.",
				"environmental",
			),
		],
	};

	snippets
		.iter()
		.map(|(title, content, category)| RawRecord {
			title: Some((*title).to_string()),
			content: Some((*content).to_string()),
			source: Some(STATIC_SOURCE.to_string()),
			category: Some((*category).to_string()),
			data_type: Some("guidance".to_string()),
			location: None,
			timestamp: None,
			score: None,
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_context_type_has_snippets() {
		assert!(static_knowledge(ContextType::Fire).len() >= 3);
		assert!(static_knowledge(ContextType::General).len() >= 3);
	}

	#[test]
	fn snippets_are_fully_populated() {
		for context_type in [ContextType::Fire, ContextType::General] {
			for record in static_knowledge(context_type) {
				assert!(record.title.as_deref().is_some_and(|title| !title.is_empty()));
				assert!(record.content.as_deref().is_some_and(|content| !content.is_empty()));
				assert_eq!(record.source.as_deref(), Some(STATIC_SOURCE));
			}
		}
	}
}
