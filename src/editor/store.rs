//! Node/edge tables and the node -> incident-edges adjacency index.
//!
//! Every mutating method leaves the tables and the index in agreement before it
//! returns. Unknown identities are tolerated: removals and moves of ids that are
//! not present do nothing.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, trace};

use super::spatial::closest_segment;
use super::types::{EdgeId, GeoPoint, NodeId};

/// A graph vertex.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: NodeId,
	/// Geographic position; the only mutable attribute.
	pub position: GeoPoint,
}

/// An ordered polyline over two or more nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	pub id: EdgeId,
	/// Vertices in drawing order, never fewer than two distinct ones.
	pub nodes: Vec<NodeId>,
}

/// Result of splitting an edge in two.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Split {
	/// The node inserted at the cut.
	pub node: NodeId,
	/// The edge that was replaced.
	pub removed: EdgeId,
	/// Head and tail halves, in polyline order.
	pub edges: [EdgeId; 2],
}

/// Authoritative node and edge tables for one network.
///
/// Ids come from per-kind counters and are never reused, so an id held past a
/// deletion can't alias a later primitive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphStore {
	nodes: BTreeMap<NodeId, Node>,
	edges: BTreeMap<EdgeId, Edge>,
	adjacency: BTreeMap<NodeId, BTreeSet<EdgeId>>,
	next_node: u64,
	next_edge: u64,
}

impl GraphStore {
	/// Empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an isolated node at `position`.
	pub fn add_node(&mut self, position: GeoPoint) -> NodeId {
		let id = NodeId(self.next_node);
		self.next_node += 1;
		self.nodes.insert(id, Node { id, position });
		self.adjacency.insert(id, BTreeSet::new());
		trace!("added {id} at ({}, {})", position.lon, position.lat);
		id
	}

	/// Adds an edge over `nodes` in order.
	///
	/// Returns `None` when fewer than two distinct nodes are given or when any
	/// of them is unknown.
	pub fn add_edge(&mut self, nodes: Vec<NodeId>) -> Option<EdgeId> {
		if nodes.len() < 2 || nodes.iter().all(|n| *n == nodes[0]) {
			debug!("ignoring degenerate edge over {} node(s)", nodes.len());
			return None;
		}
		if let Some(missing) = nodes.iter().find(|n| !self.nodes.contains_key(*n)) {
			debug!("ignoring edge referencing unknown {missing}");
			return None;
		}

		let id = EdgeId(self.next_edge);
		self.next_edge += 1;
		for node in &nodes {
			self.adjacency.entry(*node).or_default().insert(id);
		}
		self.edges.insert(id, Edge { id, nodes });
		trace!("added {id}");
		Some(id)
	}

	/// Removes an edge and its index entries. The endpoints stay, even when
	/// isolated. `None` for unknown ids.
	pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
		let Some(edge) = self.edges.remove(&id) else {
			debug!("remove_edge: {id} not present");
			return None;
		};
		for node in &edge.nodes {
			if let Some(incident) = self.adjacency.get_mut(node) {
				incident.remove(&id);
			}
		}
		trace!("removed {id}");
		Some(edge)
	}

	/// Removes a node and every edge incident on it. Neighbours left without
	/// edges stay in the graph.
	pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
		if !self.nodes.contains_key(&id) {
			debug!("remove_node: {id} not present");
			return None;
		}
		// Snapshot the incident set before edges start leaving it.
		let incident: Vec<EdgeId> = self.incident_edges(id).collect();
		for edge in &incident {
			self.remove_edge(*edge);
		}
		self.adjacency.remove(&id);
		let node = self.nodes.remove(&id);
		debug!("removed {id} with {} incident edge(s)", incident.len());
		node
	}

	/// Repositions a node. Topology is untouched. Returns `false` for unknown ids.
	pub fn move_node(&mut self, id: NodeId, position: GeoPoint) -> bool {
		match self.nodes.get_mut(&id) {
			Some(node) => {
				node.position = position;
				true
			}
			None => false,
		}
	}

	/// Replaces `edge` with two edges joined at a new node placed at `at`.
	///
	/// The cut goes into the segment whose midpoint lies closest to `at`;
	/// interior vertices on both sides are kept.
	pub fn split_edge(&mut self, edge: EdgeId, at: GeoPoint) -> Option<Split> {
		let Some(nodes) = self.edges.get(&edge).map(|e| e.nodes.clone()) else {
			debug!("split_edge: {edge} not present");
			return None;
		};
		let positions = nodes
			.iter()
			.map(|n| self.position(*n))
			.collect::<Option<Vec<_>>>()?;
		let i = closest_segment(&positions, at)?;

		self.remove_edge(edge);
		let node = self.add_node(at);
		let mut head = nodes[..=i].to_vec();
		head.push(node);
		let mut tail = vec![node];
		tail.extend_from_slice(&nodes[i + 1..]);

		let first = self.add_edge(head)?;
		let second = self.add_edge(tail)?;
		debug!("split {edge} at segment {i} into {first} and {second} via {node}");
		Some(Split {
			node,
			removed: edge,
			edges: [first, second],
		})
	}

	/// Node by id.
	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.get(&id)
	}

	/// Edge by id.
	pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
		self.edges.get(&id)
	}

	/// Current position of a node.
	pub fn position(&self, id: NodeId) -> Option<GeoPoint> {
		self.nodes.get(&id).map(|n| n.position)
	}

	/// Whether `id` names a live node.
	pub fn contains_node(&self, id: NodeId) -> bool {
		self.nodes.contains_key(&id)
	}

	/// Whether `id` names a live edge.
	pub fn contains_edge(&self, id: EdgeId) -> bool {
		self.edges.contains_key(&id)
	}

	/// Edges touching `id`; empty for unknown nodes.
	pub fn incident_edges(&self, id: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
		self.adjacency.get(&id).into_iter().flatten().copied()
	}

	/// Nodes directly before or after `id` along any incident edge.
	pub fn neighbors(&self, id: NodeId) -> BTreeSet<NodeId> {
		let mut out = BTreeSet::new();
		for edge in self.incident_edges(id).filter_map(|e| self.edges.get(&e)) {
			for (i, node) in edge.nodes.iter().enumerate() {
				if *node != id {
					continue;
				}
				if i > 0 {
					out.insert(edge.nodes[i - 1]);
				}
				if let Some(next) = edge.nodes.get(i + 1) {
					out.insert(*next);
				}
			}
		}
		out.remove(&id);
		out
	}

	/// All nodes in id order.
	pub fn nodes(&self) -> impl Iterator<Item = &Node> {
		self.nodes.values()
	}

	/// All edges in id order.
	pub fn edges(&self) -> impl Iterator<Item = &Edge> {
		self.edges.values()
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of edges.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// Checks the adjacency index against the edge table in both directions.
	#[cfg(test)]
	pub(crate) fn assert_consistent(&self) {
		for edge in self.edges.values() {
			for node in &edge.nodes {
				assert!(self.nodes.contains_key(node), "{} references missing {node}", edge.id);
				let incident = self.adjacency.get(node).expect("node has an index entry");
				assert!(incident.contains(&edge.id), "{node} index lacks {}", edge.id);
			}
		}
		for (node, incident) in &self.adjacency {
			assert!(self.nodes.contains_key(node), "index entry for missing {node}");
			for edge in incident {
				let e = self.edges.get(edge).expect("index names an existing edge");
				assert!(e.nodes.contains(node), "{edge} does not touch {node}");
			}
		}
		assert_eq!(self.adjacency.len(), self.nodes.len());
	}
}
