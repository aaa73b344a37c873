//! Nearest-segment lookup used when inserting a node into an edge.

use super::types::GeoPoint;

/// Index `i` of the segment `(points[i], points[i + 1])` whose midpoint is
/// closest to `target`. Ties go to the lowest index.
///
/// Distances are squared Euclidean in the raw lon/lat plane.
pub fn closest_segment(points: &[GeoPoint], target: GeoPoint) -> Option<usize> {
	let mut best: Option<(usize, f64)> = None;
	for (i, pair) in points.windows(2).enumerate() {
		let dist = pair[0].midpoint(&pair[1]).distance_sq(&target);
		match best {
			Some((_, d)) if d <= dist => {}
			_ => best = Some((i, dist)),
		}
	}
	best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn p(lon: f64, lat: f64) -> GeoPoint {
		GeoPoint::new(lon, lat)
	}

	#[test]
	fn picks_segment_with_nearest_midpoint() {
		let line = [p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0)];
		assert_eq!(closest_segment(&line, p(0.4, 0.1)), Some(0));
		assert_eq!(closest_segment(&line, p(1.6, -0.2)), Some(1));
		assert_eq!(closest_segment(&line, p(9.0, 0.0)), Some(2));
	}

	#[test]
	fn ties_resolve_to_lowest_index() {
		let line = [p(0.0, 0.0), p(2.0, 0.0), p(4.0, 0.0)];
		// Equidistant from midpoints (1, 0) and (3, 0).
		assert_eq!(closest_segment(&line, p(2.0, 1.0)), Some(0));
	}

	#[test]
	fn midpoint_not_segment_distance() {
		// Long first segment passes right by the target, but its midpoint is far.
		let line = [p(0.0, 0.0), p(10.0, 0.0), p(10.0, 1.0)];
		assert_eq!(closest_segment(&line, p(9.0, 0.1)), Some(1));
	}

	#[test]
	fn needs_two_points() {
		assert_eq!(closest_segment(&[], p(0.0, 0.0)), None);
		assert_eq!(closest_segment(&[p(1.0, 1.0)], p(0.0, 0.0)), None);
	}
}
