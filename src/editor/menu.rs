//! Contextual action menus and routing of their confirmed actions.

use log::debug;

use super::store::{GraphStore, Split};
use super::types::{EdgeId, GeoPoint, NodeId, PrimitiveKind, ScreenPoint};

/// What a context menu was opened on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MenuTarget {
	/// An edge, offering a split.
	Edge(EdgeId),
	/// A node, offering deletion.
	Node(NodeId),
}

impl MenuTarget {
	/// Layer of the target.
	pub fn kind(&self) -> PrimitiveKind {
		match self {
			MenuTarget::Edge(_) => PrimitiveKind::Edge,
			MenuTarget::Node(_) => PrimitiveKind::Node,
		}
	}
}

/// Something a menu can offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuAction {
	/// Insert a node into an edge at the click location.
	Split,
	/// Remove a node and its edges.
	Delete,
}

impl MenuAction {
	/// Button text.
	pub fn label(&self) -> &'static str {
		match self {
			MenuAction::Split => "Split edge here",
			MenuAction::Delete => "Delete node",
		}
	}
}

/// An open context menu.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContextMenu {
	/// Primitive the menu acts on.
	pub target: MenuTarget,
	/// Screen position the menu is drawn at.
	pub anchor: ScreenPoint,
	/// Geographic position of the right-click, when the map could resolve one.
	pub clicked: Option<GeoPoint>,
}

/// Presentation-facing description of the open menu.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuDescriptor {
	pub kind: PrimitiveKind,
	pub target: MenuTarget,
	pub anchor: ScreenPoint,
	/// Offered actions, in display order.
	pub actions: Vec<MenuAction>,
}

/// Effect of confirming an offered action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MenuOutcome {
	/// The edge was replaced by two halves.
	Split(Split),
	/// The node and its incident edges are gone.
	Deleted(NodeId),
	/// The target (or the click position) was gone; nothing changed.
	Stale,
}

impl ContextMenu {
	/// Actions for this target kind.
	pub fn actions(&self) -> &'static [MenuAction] {
		match self.target {
			MenuTarget::Edge(_) => &[MenuAction::Split],
			MenuTarget::Node(_) => &[MenuAction::Delete],
		}
	}

	/// Whether `action` is on this menu.
	pub fn offers(&self, action: MenuAction) -> bool {
		self.actions().contains(&action)
	}

	/// Snapshot of the menu for the presentation layer.
	pub fn descriptor(&self) -> MenuDescriptor {
		MenuDescriptor {
			kind: self.target.kind(),
			target: self.target,
			anchor: self.anchor,
			actions: self.actions().to_vec(),
		}
	}

	/// Applies `action` to `store`. `None` means the action is not offered
	/// for this target and the menu should stay open.
	pub fn confirm(&self, store: &mut GraphStore, action: MenuAction) -> Option<MenuOutcome> {
		if !self.offers(action) {
			debug!("{action:?} is not offered for {:?}", self.target);
			return None;
		}
		let outcome = match (self.target, action) {
			(MenuTarget::Edge(edge), MenuAction::Split) => self
				.clicked
				.and_then(|at| store.split_edge(edge, at))
				.map(MenuOutcome::Split),
			(MenuTarget::Node(node), MenuAction::Delete) => {
				store.remove_node(node).map(|_| MenuOutcome::Deleted(node))
			}
			_ => None,
		};
		Some(outcome.unwrap_or(MenuOutcome::Stale))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn p(lon: f64, lat: f64) -> GeoPoint {
		GeoPoint::new(lon, lat)
	}

	fn segment() -> (GraphStore, NodeId, EdgeId) {
		let mut store = GraphStore::new();
		let a = store.add_node(p(0.0, 0.0));
		let b = store.add_node(p(1.0, 0.0));
		let e = store.add_edge(vec![a, b]).unwrap();
		(store, a, e)
	}

	#[test]
	fn descriptor_lists_actions_per_target() {
		let menu = ContextMenu {
			target: MenuTarget::Edge(EdgeId(3)),
			anchor: ScreenPoint::new(10.0, 20.0),
			clicked: Some(p(0.5, 0.0)),
		};
		let d = menu.descriptor();
		assert_eq!(d.kind, PrimitiveKind::Edge);
		assert_eq!(d.actions, vec![MenuAction::Split]);
		assert_eq!(d.anchor, ScreenPoint::new(10.0, 20.0));
	}

	#[test]
	fn split_routes_to_store() {
		let (mut store, _, e) = segment();
		let menu = ContextMenu {
			target: MenuTarget::Edge(e),
			anchor: ScreenPoint::default(),
			clicked: Some(p(0.5, 0.1)),
		};
		let Some(MenuOutcome::Split(split)) = menu.confirm(&mut store, MenuAction::Split) else {
			panic!("split should apply");
		};
		assert!(!store.contains_edge(e));
		assert_eq!(store.position(split.node), Some(p(0.5, 0.1)));
		assert_eq!(store.edge_count(), 2);
	}

	#[test]
	fn unoffered_action_is_ignored() {
		let (mut store, a, _) = segment();
		let before = store.clone();
		let menu = ContextMenu {
			target: MenuTarget::Node(a),
			anchor: ScreenPoint::default(),
			clicked: None,
		};
		assert_eq!(menu.confirm(&mut store, MenuAction::Split), None);
		assert_eq!(store, before);
	}

	#[test]
	fn stale_targets_report_stale() {
		let (mut store, a, e) = segment();
		store.remove_node(a);
		let delete = ContextMenu {
			target: MenuTarget::Node(a),
			anchor: ScreenPoint::default(),
			clicked: None,
		};
		assert_eq!(delete.confirm(&mut store, MenuAction::Delete), Some(MenuOutcome::Stale));

		let split = ContextMenu {
			target: MenuTarget::Edge(e),
			anchor: ScreenPoint::default(),
			clicked: Some(p(0.5, 0.0)),
		};
		assert_eq!(split.confirm(&mut store, MenuAction::Split), Some(MenuOutcome::Stale));
	}
}
