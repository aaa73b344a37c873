//! Property-based tests for the graph store and projector.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use crate::editor::{EdgeId, GeoPoint, GeometrySnapshot, GraphStore, NodeId, Projector};
	use proptest::prelude::*;

	#[derive(Clone, Debug)]
	enum Op {
		AddNode(f64, f64),
		AddEdge(Vec<usize>),
		RemoveNode(usize),
		RemoveEdge(usize),
		Split(usize, f64, f64),
		Move(usize, f64, f64),
	}

	fn coord() -> impl Strategy<Value = f64> {
		-10.0..10.0f64
	}

	fn op() -> impl Strategy<Value = Op> {
		prop_oneof![
			3 => (coord(), coord()).prop_map(|(x, y)| Op::AddNode(x, y)),
			3 => prop::collection::vec(any::<usize>(), 0..5).prop_map(Op::AddEdge),
			1 => any::<usize>().prop_map(Op::RemoveNode),
			1 => any::<usize>().prop_map(Op::RemoveEdge),
			1 => (any::<usize>(), coord(), coord()).prop_map(|(i, x, y)| Op::Split(i, x, y)),
			2 => (any::<usize>(), coord(), coord()).prop_map(|(i, x, y)| Op::Move(i, x, y)),
		]
	}

	fn pick_node(store: &GraphStore, i: usize) -> Option<NodeId> {
		let n = store.node_count();
		(n > 0).then(|| store.nodes().nth(i % n).unwrap().id)
	}

	fn pick_edge(store: &GraphStore, i: usize) -> Option<EdgeId> {
		let n = store.edge_count();
		(n > 0).then(|| store.edges().nth(i % n).unwrap().id)
	}

	fn apply(store: &mut GraphStore, op: &Op) {
		match op {
			Op::AddNode(x, y) => {
				store.add_node(GeoPoint::new(*x, *y));
			}
			Op::AddEdge(picks) => {
				let nodes: Vec<NodeId> = picks.iter().filter_map(|i| pick_node(store, *i)).collect();
				store.add_edge(nodes);
			}
			Op::RemoveNode(i) => {
				if let Some(id) = pick_node(store, *i) {
					store.remove_node(id);
				}
			}
			Op::RemoveEdge(i) => {
				if let Some(id) = pick_edge(store, *i) {
					store.remove_edge(id);
				}
			}
			Op::Split(i, x, y) => {
				if let Some(id) = pick_edge(store, *i) {
					store.split_edge(id, GeoPoint::new(*x, *y));
				}
			}
			Op::Move(i, x, y) => {
				if let Some(id) = pick_node(store, *i) {
					store.move_node(id, GeoPoint::new(*x, *y));
				}
			}
		}
	}

	proptest! {
		#[test]
		fn adjacency_index_survives_every_operation(ops in prop::collection::vec(op(), 0..60)) {
			let mut store = GraphStore::new();
			for op in &ops {
				apply(&mut store, op);
				store.assert_consistent();
			}
		}

		#[test]
		fn removing_unknown_ids_is_a_noop(ops in prop::collection::vec(op(), 0..30), raw in any::<u64>()) {
			let mut store = GraphStore::new();
			for op in &ops {
				apply(&mut store, op);
			}
			let before = store.clone();
			let missing_node = NodeId(raw.max(1_000_000));
			let missing_edge = EdgeId(raw.max(1_000_000));
			prop_assert!(store.remove_node(missing_node).is_none());
			prop_assert!(store.remove_edge(missing_edge).is_none());
			prop_assert_eq!(store, before);
		}

		#[test]
		fn incremental_projection_equals_full(
			ops in prop::collection::vec(op(), 1..30),
			moves in prop::collection::vec((any::<usize>(), coord(), coord()), 1..20),
		) {
			let mut store = GraphStore::new();
			for op in &ops {
				apply(&mut store, op);
			}
			let mut projector = Projector::new(&store);
			for (i, x, y) in moves {
				let Some(node) = pick_node(&store, i) else {
					break;
				};
				store.move_node(node, GeoPoint::new(x, y));
				projector.project_node(&store, node);
				prop_assert_eq!(projector.snapshot(), &GeometrySnapshot::from_store(&store));
			}
		}
	}
}
