use ember_storage::models::OperationalReading;

use crate::canonical::RawRecord;
use crate::retrieve::ContextType;

/// Turns live sensor rows into human-readable context records, with a
/// fire-focused or general template depending on the requested context type.
pub fn synthesize_context(
	readings: &[OperationalReading],
	context_type: ContextType,
) -> Vec<RawRecord> {
	readings.iter().map(|reading| synthesize_reading(reading, context_type)).collect()
}

fn synthesize_reading(reading: &OperationalReading, context_type: ContextType) -> RawRecord {
	let station = reading.device_name.as_deref().unwrap_or("unnamed station");
	let content = match context_type {
		ContextType::Fire => fire_content(reading, station),
		ContextType::General => general_content(reading, station),
	};
	let location = match (reading.latitude, reading.longitude) {
		(Some(lat), Some(lon)) => Some([lat, lon]),
		_ => None,
	};

	RawRecord {
		title: Some(format!("Live readings: {station}")),
		content: Some(content),
		source: Some("Live sensor data".to_string()),
		category: Some(
			match context_type {
				ContextType::Fire => "fire",
				ContextType::General => "environmental",
			}
			.to_string(),
		),
		data_type: Some("sensor_reading".to_string()),
		location,
		timestamp: Some(reading.datetime),
		score: None,
	}
}

fn fire_content(reading: &OperationalReading, station: &str) -> String {
	let mut parts = vec![format!("Conditions at {station}, {}.", reading.datetime)];

	if let Some(temperature) = reading.temperature {
		parts.push(format!("Temperature {temperature:.1} C."));
	}
	if let Some(humidity) = reading.humidity {
		parts.push(format!("Relative humidity {humidity:.0}%."));
	}
	if fire_weather_elevated(reading) {
		parts.push(
			"Hot and dry readings: conditions favor fire ignition and spread.".to_string(),
		);
	}
	if let Some(pm25) = reading.pm25 {
		if pm25 >= 35.0 {
			parts.push(format!("PM2.5 at {pm25:.0} ug/m3 suggests smoke in the area."));
		} else {
			parts.push(format!("PM2.5 {pm25:.0} ug/m3."));
		}
	}

	parts.join(" ")
}

fn general_content(reading: &OperationalReading, station: &str) -> String {
	let mut parts = vec![format!("Air quality at {station}, {}.", reading.datetime)];

	if let Some(pm25) = reading.pm25 {
		parts.push(format!("PM2.5 {pm25:.0} ug/m3."));
	}
	if let Some(pm10) = reading.pm10 {
		parts.push(format!("PM10 {pm10:.0} ug/m3."));
	}
	if let Some(co2) = reading.co2 {
		parts.push(format!("CO2 {co2:.0} ppm."));
	}
	if let Some(voc) = reading.voc {
		parts.push(format!("VOC index {voc:.0}."));
	}
	if let Some(temperature) = reading.temperature {
		parts.push(format!("Temperature {temperature:.1} C."));
	}
	if let Some(humidity) = reading.humidity {
		parts.push(format!("Relative humidity {humidity:.0}%."));
	}

	parts.join(" ")
}

fn fire_weather_elevated(reading: &OperationalReading) -> bool {
	matches!(
		(reading.temperature, reading.humidity),
		(Some(temperature), Some(humidity)) if temperature >= 30.0 && humidity <= 30.0
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use time::macros::datetime;

	fn reading() -> OperationalReading {
		OperationalReading {
			device_id: None,
			device_name: Some("Ridge 3".to_string()),
			datetime: datetime!(2024-02-07 14:00 UTC),
			temperature: Some(34.0),
			humidity: Some(22.0),
			pm25: Some(48.0),
			pm10: Some(60.0),
			co2: Some(420.0),
			voc: Some(120.0),
			latitude: Some(-37.4),
			longitude: Some(144.2),
		}
	}

	#[test]
	fn produces_one_record_per_reading() {
		let records = synthesize_context(&[reading(), reading()], ContextType::Fire);

		assert_eq!(records.len(), 2);
	}

	#[test]
	fn fire_template_flags_hot_dry_smoky_conditions() {
		let records = synthesize_context(&[reading()], ContextType::Fire);
		let content = records[0].content.as_deref().unwrap_or_default();

		assert!(content.contains("favor fire ignition"));
		assert!(content.contains("smoke"));
		assert_eq!(records[0].category.as_deref(), Some("fire"));
	}

	#[test]
	fn general_template_reports_air_quality() {
		let records = synthesize_context(&[reading()], ContextType::General);
		let content = records[0].content.as_deref().unwrap_or_default();

		assert!(content.contains("PM2.5 48"));
		assert!(content.contains("CO2 420"));
		assert_eq!(records[0].category.as_deref(), Some("environmental"));
	}

	#[test]
	fn carries_location_and_timestamp_through() {
		let records = synthesize_context(&[reading()], ContextType::Fire);

		assert_eq!(records[0].location, Some([-37.4, 144.2]));
		assert_eq!(records[0].timestamp, Some(datetime!(2024-02-07 14:00 UTC)));
	}

	#[test]
	fn missing_fields_leave_no_placeholder_text() {
		let mut bare = reading();

		bare.temperature = None;
		bare.humidity = None;
		bare.pm25 = None;
		bare.device_name = None;

		let records = synthesize_context(&[bare], ContextType::Fire);
		let content = records[0].content.as_deref().unwrap_or_default();

		assert!(content.contains("unnamed station"));
		assert!(!content.contains("Temperature"));
		assert!(!content.contains("humidity"));
	}
}
