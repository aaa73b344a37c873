//! Renderable view of the graph, rebuilt wholesale or patched per moved node.

use std::collections::BTreeMap;
use std::rc::Rc;

use log::trace;

use super::store::GraphStore;
use super::types::{EdgeId, GeoPoint, NodeId};

/// Point primitive tagged with its node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodePoint {
	/// Node this point stands for.
	pub node: NodeId,
	/// Where to draw it.
	pub position: GeoPoint,
}

/// Polyline primitive tagged with its edge.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeLine {
	/// Edge this line stands for.
	pub edge: EdgeId,
	/// Vertex positions in polyline order.
	pub coordinates: Vec<GeoPoint>,
}

/// Nodes and edges as the renderer sees them.
///
/// Primitives are shared behind `Rc`, so a copy held by a renderer costs one
/// pointer per primitive and unchanged entries stay pointer-equal across
/// incremental updates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometrySnapshot {
	points: BTreeMap<NodeId, Rc<NodePoint>>,
	lines: BTreeMap<EdgeId, Rc<EdgeLine>>,
}

impl GeometrySnapshot {
	/// Full projection of `store`.
	pub fn from_store(store: &GraphStore) -> Self {
		let points = store
			.nodes()
			.map(|n| (n.id, Rc::new(project_point(n.id, n.position))))
			.collect();
		let lines = store
			.edges()
			.filter_map(|e| project_line(store, e.id).map(|l| (e.id, Rc::new(l))))
			.collect();
		Self { points, lines }
	}

	/// Point primitives in node id order.
	pub fn points(&self) -> impl Iterator<Item = &Rc<NodePoint>> {
		self.points.values()
	}

	/// Line primitives in edge id order.
	pub fn lines(&self) -> impl Iterator<Item = &Rc<EdgeLine>> {
		self.lines.values()
	}

	/// Point primitive of a node.
	pub fn point(&self, id: NodeId) -> Option<&Rc<NodePoint>> {
		self.points.get(&id)
	}

	/// Line primitive of an edge.
	pub fn line(&self, id: EdgeId) -> Option<&Rc<EdgeLine>> {
		self.lines.get(&id)
	}

	/// Brings this copy in line with `source` for the primitives named by `change`.
	pub fn sync_from(&mut self, source: &GeometrySnapshot, change: &SnapshotChange) {
		match change {
			SnapshotChange::Rebuilt => *self = source.clone(),
			SnapshotChange::Touched { nodes, edges } => {
				for id in nodes {
					match source.points.get(id) {
						Some(p) => self.points.insert(*id, Rc::clone(p)),
						None => self.points.remove(id),
					};
				}
				for id in edges {
					match source.lines.get(id) {
						Some(l) => self.lines.insert(*id, Rc::clone(l)),
						None => self.lines.remove(id),
					};
				}
			}
		}
	}
}

/// What changed between two pushes of the snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotChange {
	/// Everything may have changed.
	Rebuilt,
	/// Only these primitives were replaced or removed.
	Touched {
		/// Nodes whose point was replaced or removed.
		nodes: Vec<NodeId>,
		/// Edges whose line was replaced or removed.
		edges: Vec<EdgeId>,
	},
}

/// Owns the current snapshot and keeps it derived from a [`GraphStore`].
#[derive(Debug, Default)]
pub struct Projector {
	snapshot: GeometrySnapshot,
	revision: u64,
}

impl Projector {
	/// Projector holding a full projection of `store`.
	pub fn new(store: &GraphStore) -> Self {
		Self {
			snapshot: GeometrySnapshot::from_store(store),
			revision: 1,
		}
	}

	/// The current snapshot.
	pub fn snapshot(&self) -> &GeometrySnapshot {
		&self.snapshot
	}

	/// Bumped on every projection, full or incremental.
	pub fn revision(&self) -> u64 {
		self.revision
	}

	/// Regenerates everything. Use after structural edits.
	pub fn project_all(&mut self, store: &GraphStore) -> SnapshotChange {
		self.snapshot = GeometrySnapshot::from_store(store);
		self.revision += 1;
		trace!(
			"full projection r{}: {} points, {} lines",
			self.revision,
			self.snapshot.points.len(),
			self.snapshot.lines.len()
		);
		SnapshotChange::Rebuilt
	}

	/// Regenerates one node's point and the lines of its incident edges.
	/// Cost is proportional to the node's degree, not the graph size.
	pub fn project_node(&mut self, store: &GraphStore, node: NodeId) -> SnapshotChange {
		self.revision += 1;
		match store.position(node) {
			Some(position) => {
				self.snapshot
					.points
					.insert(node, Rc::new(project_point(node, position)));
			}
			None => {
				self.snapshot.points.remove(&node);
			}
		}

		let edges: Vec<EdgeId> = store.incident_edges(node).collect();
		for edge in &edges {
			match project_line(store, *edge) {
				Some(line) => self.snapshot.lines.insert(*edge, Rc::new(line)),
				None => self.snapshot.lines.remove(edge),
			};
		}
		SnapshotChange::Touched {
			nodes: vec![node],
			edges,
		}
	}
}

fn project_point(node: NodeId, position: GeoPoint) -> NodePoint {
	NodePoint { node, position }
}

/// Unresolvable vertices are skipped; fewer than two survivors yields no line.
fn project_line(store: &GraphStore, edge: EdgeId) -> Option<EdgeLine> {
	let e = store.edge(edge)?;
	let coordinates: Vec<GeoPoint> = e.nodes.iter().filter_map(|n| store.position(*n)).collect();
	(coordinates.len() >= 2).then_some(EdgeLine { edge, coordinates })
}
