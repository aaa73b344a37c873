//! GeoJSON line loader.
//!
//! Produces the immutable line set that seeds a [`GraphStore`](super::GraphStore).
//! Anything that is not a line geometry is skipped; only a document that
//! cannot be read at all is an error.

use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

use super::types::{GeoPoint, LineGeometry};

/// Errors raised while reading line geometry.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LoadError {
	/// Not parseable as JSON of the expected shape.
	#[error("invalid GeoJSON: {0}")]
	Json(#[from] serde_json::Error),

	/// Top-level `type` was something else.
	#[error("expected a FeatureCollection, found {0:?}")]
	NotFeatureCollection(String),

	/// A vertex outside [-180, 180] x [-90, 90].
	#[error("feature {feature} has an out-of-range coordinate ({lon}, {lat})")]
	CoordinateOutOfRange {
		/// Index of the offending feature.
		feature: usize,
		/// Longitude as read.
		lon: f64,
		/// Latitude as read.
		lat: f64,
	},
}

#[derive(Deserialize)]
struct FeatureCollection {
	#[serde(rename = "type")]
	kind: String,
	#[serde(default)]
	features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
	geometry: Option<Geometry>,
}

#[derive(Deserialize)]
struct Geometry {
	#[serde(rename = "type")]
	kind: String,
	#[serde(default)]
	coordinates: serde_json::Value,
}

/// Parses a GeoJSON FeatureCollection into line geometries.
pub fn parse_feature_collection(text: &str) -> Result<Vec<LineGeometry>, LoadError> {
	let collection: FeatureCollection = serde_json::from_str(text).inspect_err(|e| {
		warn!("failed to parse network geometry: {e}");
	})?;
	if collection.kind != "FeatureCollection" {
		return Err(LoadError::NotFeatureCollection(collection.kind));
	}

	let total = collection.features.len();
	let mut lines = Vec::with_capacity(total);
	for (i, feature) in collection.features.into_iter().enumerate() {
		let Some(geometry) = feature.geometry else {
			continue;
		};
		let line = match geometry.kind.as_str() {
			"LineString" => {
				let coords: Vec<Vec<f64>> = serde_json::from_value(geometry.coordinates)?;
				LineGeometry::Line(positions(i, &coords)?)
			}
			"MultiLineString" => {
				let parts: Vec<Vec<Vec<f64>>> = serde_json::from_value(geometry.coordinates)?;
				LineGeometry::MultiLine(
					parts
						.iter()
						.map(|part| positions(i, part))
						.collect::<Result<_, _>>()?,
				)
			}
			_ => continue,
		};
		lines.push(line);
	}
	info!("loaded {} line feature(s) of {total}", lines.len());
	Ok(lines)
}

fn positions(feature: usize, coords: &[Vec<f64>]) -> Result<Vec<GeoPoint>, LoadError> {
	let mut out = Vec::with_capacity(coords.len());
	for c in coords {
		let &[lon, lat, ..] = c.as_slice() else {
			continue;
		};
		if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
			return Err(LoadError::CoordinateOutOfRange { feature, lon, lat });
		}
		out.push(GeoPoint::new(lon, lat));
	}
	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reads_lines_and_multilines() {
		let text = r#"{
			"type": "FeatureCollection",
			"features": [
				{"type": "Feature", "properties": {"highway": "footway"},
				 "geometry": {"type": "LineString", "coordinates": [[13.4, 52.5], [13.41, 52.5, 34.0]]}},
				{"type": "Feature", "properties": {},
				 "geometry": {"type": "MultiLineString", "coordinates": [[[0, 0], [1, 1]], [[1, 1], [2, 1]]]}},
				{"type": "Feature", "properties": {},
				 "geometry": {"type": "Point", "coordinates": [5, 5]}},
				{"type": "Feature", "properties": {}, "geometry": null}
			]
		}"#;
		let lines = parse_feature_collection(text).unwrap();
		assert_eq!(lines.len(), 2);
		assert_eq!(
			lines[0],
			LineGeometry::Line(vec![GeoPoint::new(13.4, 52.5), GeoPoint::new(13.41, 52.5)])
		);
		assert!(matches!(&lines[1], LineGeometry::MultiLine(parts) if parts.len() == 2));
	}

	#[test]
	fn short_positions_are_skipped() {
		let text = r#"{"type": "FeatureCollection", "features": [
			{"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[1], [1, 2], []]}}
		]}"#;
		let lines = parse_feature_collection(text).unwrap();
		assert_eq!(lines, vec![LineGeometry::Line(vec![GeoPoint::new(1.0, 2.0)])]);
	}

	#[test]
	fn malformed_documents_are_errors() {
		assert!(matches!(parse_feature_collection("{not json"), Err(LoadError::Json(_))));
		assert!(matches!(
			parse_feature_collection(r#"{"type": "Feature", "geometry": null}"#),
			Err(LoadError::NotFeatureCollection(kind)) if kind == "Feature"
		));
		let bad = r#"{"type": "FeatureCollection", "features": [
			{"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[0, 0], [200, 0]]}}
		]}"#;
		assert!(matches!(
			parse_feature_collection(bad),
			Err(LoadError::CoordinateOutOfRange { feature: 0, .. })
		));
	}
}
