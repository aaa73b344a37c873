//! Turns raw line geometry into a graph by merging coincident vertices.

use std::collections::HashMap;

use log::{info, warn};

use super::store::GraphStore;
use super::types::{GeoPoint, LineGeometry, NodeId};

/// Rounds coordinates to a fixed number of decimals to form dedup keys.
#[derive(Clone, Debug)]
pub struct Quantizer {
	scale: f64,
}

impl Quantizer {
	/// Six decimals is roughly 11cm at the equator.
	pub const DEFAULT_PRECISION: u32 = 6;

	/// Finest precision whose keys still fit an `i64` for any longitude.
	pub const MAX_PRECISION: u32 = 15;

	/// Quantizer keeping `precision` decimals, clamped to [`Self::MAX_PRECISION`].
	pub fn new(precision: u32) -> Self {
		if precision > Self::MAX_PRECISION {
			warn!(
				"quantizer precision {precision} too fine, clamping to {}",
				Self::MAX_PRECISION
			);
		}
		let precision = precision.min(Self::MAX_PRECISION);
		Self {
			scale: 10f64.powi(precision as i32),
		}
	}

	/// Integer key of `point`; equal keys become one node.
	pub fn key(&self, point: GeoPoint) -> (i64, i64) {
		(
			(point.lon * self.scale).round() as i64,
			(point.lat * self.scale).round() as i64,
		)
	}

	/// Builds a fresh store: one node per distinct key, one edge per line part.
	///
	/// Parts that resolve to fewer than two distinct consecutive vertices are
	/// dropped without complaint.
	pub fn build(&self, lines: &[LineGeometry]) -> GraphStore {
		let mut store = GraphStore::new();
		let mut seen: HashMap<(i64, i64), NodeId> = HashMap::new();
		let mut dropped = 0usize;

		for part in lines.iter().flat_map(LineGeometry::parts) {
			let mut keyed: Vec<((i64, i64), GeoPoint)> = Vec::with_capacity(part.len());
			for point in part {
				let key = self.key(*point);
				if keyed.last().map(|(k, _)| *k) != Some(key) {
					keyed.push((key, *point));
				}
			}
			if keyed.len() < 2 {
				dropped += 1;
				continue;
			}

			let ids: Vec<NodeId> = keyed
				.into_iter()
				.map(|(key, point)| *seen.entry(key).or_insert_with(|| store.add_node(point)))
				.collect();
			if store.add_edge(ids).is_none() {
				dropped += 1;
			}
		}

		info!(
			"quantized network: {} nodes, {} edges, {} degenerate part(s) dropped",
			store.node_count(),
			store.edge_count(),
			dropped
		);
		store
	}
}

impl Default for Quantizer {
	fn default() -> Self {
		Self::new(Self::DEFAULT_PRECISION)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn p(lon: f64, lat: f64) -> GeoPoint {
		GeoPoint::new(lon, lat)
	}

	#[test]
	fn coincident_endpoints_share_a_node() {
		let lines = vec![
			LineGeometry::Line(vec![p(13.4, 52.5), p(13.401, 52.5)]),
			// Within 1e-7 of the previous end: same key at 6 decimals.
			LineGeometry::Line(vec![p(13.40100004, 52.50000003), p(13.402, 52.501)]),
		];
		let store = Quantizer::default().build(&lines);
		assert_eq!(store.node_count(), 3);
		assert_eq!(store.edge_count(), 2);

		let shared = store
			.nodes()
			.find(|n| n.position == p(13.401, 52.5))
			.map(|n| n.id)
			.unwrap();
		assert_eq!(store.incident_edges(shared).count(), 2);
		store.assert_consistent();
	}

	#[test]
	fn multi_line_parts_become_separate_edges() {
		let lines = vec![LineGeometry::MultiLine(vec![
			vec![p(0.0, 0.0), p(0.0, 1.0), p(0.0, 2.0)],
			vec![p(0.0, 2.0), p(1.0, 2.0)],
		])];
		let store = Quantizer::default().build(&lines);
		assert_eq!(store.node_count(), 4);
		let lengths: Vec<_> = store.edges().map(|e| e.nodes.len()).collect();
		assert_eq!(lengths, vec![3, 2]);
	}

	#[test]
	fn degenerate_lines_are_dropped() {
		let lines = vec![
			LineGeometry::Line(vec![]),
			LineGeometry::Line(vec![p(1.0, 1.0)]),
			LineGeometry::Line(vec![p(2.0, 2.0), p(2.0000001, 2.0)]),
			LineGeometry::Line(vec![p(3.0, 3.0), p(4.0, 4.0)]),
		];
		let store = Quantizer::default().build(&lines);
		assert_eq!(store.edge_count(), 1);
		assert_eq!(store.node_count(), 2);
		store.assert_consistent();
	}

	#[test]
	fn coarser_precision_merges_more() {
		let lines = vec![LineGeometry::Line(vec![
			p(0.0, 0.0),
			p(0.004, 0.0),
			p(0.1, 0.0),
		])];
		assert_eq!(Quantizer::new(6).build(&lines).node_count(), 3);
		assert_eq!(Quantizer::new(2).build(&lines).node_count(), 2);
	}

	#[test]
	fn finest_precision_keeps_distinct_vertices_apart() {
		let lines = vec![LineGeometry::Line(vec![p(100.0, 10.0), p(120.0, 10.0)])];
		for precision in [Quantizer::MAX_PRECISION, 17, u32::MAX] {
			let store = Quantizer::new(precision).build(&lines);
			assert_eq!(store.node_count(), 2, "precision {precision}");
			assert_eq!(store.edge_count(), 1, "precision {precision}");
			store.assert_consistent();
		}
		let far = Quantizer::new(u32::MAX);
		assert_ne!(far.key(p(179.9, -89.9)), far.key(p(-179.9, 89.9)));
	}
}
