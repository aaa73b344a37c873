//! Pointer-driven editing state machine.
//!
//! ```text
//! Idle ──down on node──▶ Dragging ──up──▶ Idle (connect + snap back, or drop)
//!  │  ▲
//!  │  └──dismiss / confirm──┐
//!  └──right-click on node/edge──▶ ContextMenuOpen
//! ```
//!
//! The controller owns the graph and its projection. The map it is embedded in
//! is reached only through [`MapHost`].

use log::{debug, trace};

use super::config::EditorConfig;
use super::menu::{ContextMenu, MenuAction, MenuDescriptor, MenuOutcome, MenuTarget};
use super::projector::{GeometrySnapshot, Projector, SnapshotChange};
use super::store::GraphStore;
use super::types::{GeoPoint, LineGeometry, NodeId, PrimitiveId, PrimitiveKind, ScreenPoint};

/// Cursor affordance requested from the map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cursor {
	#[default]
	Default,
	Pointer,
	Grab,
	Grabbing,
}

impl Cursor {
	/// Value for the CSS `cursor` property.
	pub fn css(&self) -> &'static str {
		match self {
			Cursor::Default => "default",
			Cursor::Pointer => "pointer",
			Cursor::Grab => "grab",
			Cursor::Grabbing => "grabbing",
		}
	}
}

/// The map/rendering side the editor is embedded in.
pub trait MapHost {
	/// Primitives under `point`, restricted to `layers`, topmost first.
	fn query_at(&self, point: ScreenPoint, layers: &[PrimitiveKind]) -> Vec<PrimitiveId>;

	/// Turns camera panning on or off; off while a node is dragged.
	fn set_panning_enabled(&mut self, enabled: bool);

	/// Cursor hint. Hosts without a cursor can ignore it.
	fn set_cursor(&mut self, _cursor: Cursor) {}

	/// Receives the current snapshot together with what changed since the last push.
	fn present(&mut self, snapshot: &GeometrySnapshot, change: &SnapshotChange);
}

/// A pointer event as delivered by the map.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerEvent {
	/// Position in map pixels.
	pub screen: ScreenPoint,
	/// Unprojected position, when the map could resolve one.
	pub geo: Option<GeoPoint>,
	/// Primitive the map reports under the pointer.
	pub target: Option<PrimitiveId>,
}

/// Exactly one of these is current at any time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InteractionState {
	/// No gesture in progress.
	Idle,
	/// A node follows the pointer until release.
	Dragging {
		/// The node being dragged.
		node: NodeId,
		/// Where it was before the drag, restored on connect.
		original: GeoPoint,
	},
	/// A menu is showing; pointer gestures are suspended.
	ContextMenuOpen(ContextMenu),
}

/// Owns one network, its projection and the gesture state, and reacts to
/// events forwarded by a [`MapHost`].
pub struct InteractionController {
	store: GraphStore,
	projector: Projector,
	state: InteractionState,
	hovered: Option<NodeId>,
	cursor: Cursor,
}

impl InteractionController {
	/// Controller over `store`, idle, with a fresh projection.
	pub fn new(store: GraphStore) -> Self {
		let projector = Projector::new(&store);
		Self {
			store,
			projector,
			state: InteractionState::Idle,
			hovered: None,
			cursor: Cursor::Default,
		}
	}

	/// Seeds a new editor from loaded line geometry.
	pub fn from_lines(lines: &[LineGeometry], config: &EditorConfig) -> Self {
		Self::new(config.quantizer().build(lines))
	}

	/// The graph being edited.
	pub fn store(&self) -> &GraphStore {
		&self.store
	}

	/// Latest projection, as last pushed to the host.
	pub fn snapshot(&self) -> &GeometrySnapshot {
		self.projector.snapshot()
	}

	/// Current gesture state.
	pub fn state(&self) -> &InteractionState {
		&self.state
	}

	/// Node under the pointer, if any.
	pub fn hovered(&self) -> Option<NodeId> {
		self.hovered
	}

	/// Node being dragged, if any.
	pub fn dragged(&self) -> Option<NodeId> {
		match self.state {
			InteractionState::Dragging { node, .. } => Some(node),
			_ => None,
		}
	}

	/// What the open menu should show.
	pub fn menu(&self) -> Option<MenuDescriptor> {
		match &self.state {
			InteractionState::ContextMenuOpen(menu) => Some(menu.descriptor()),
			_ => None,
		}
	}

	/// Hands the host its initial state: panning on, default cursor, full snapshot.
	pub fn attach(&mut self, host: &mut impl MapHost) {
		host.set_panning_enabled(true);
		host.set_cursor(self.cursor);
		host.present(self.projector.snapshot(), &SnapshotChange::Rebuilt);
	}

	/// Primary button pressed.
	pub fn pointer_down(&mut self, host: &mut impl MapHost, ev: &PointerEvent) {
		match self.state {
			InteractionState::Idle => {
				let Some(node) = ev.target.and_then(|t| t.node()) else {
					return;
				};
				let Some(original) = self.store.position(node) else {
					debug!("pointer down on stale {node}");
					return;
				};
				debug!("drag start {node}");
				self.state = InteractionState::Dragging { node, original };
				self.hovered = None;
				host.set_panning_enabled(false);
				self.set_cursor(host, Cursor::Grabbing);
			}
			// Clicking anywhere while a menu is open only closes it.
			InteractionState::ContextMenuOpen(_) => self.dismiss_menu(host),
			InteractionState::Dragging { .. } => {}
		}
	}

	/// Drags the held node, or updates hover and the cursor hint when idle.
	pub fn pointer_move(&mut self, host: &mut impl MapHost, ev: &PointerEvent) {
		match self.state {
			InteractionState::Dragging { node, .. } => {
				let Some(geo) = ev.geo else {
					return;
				};
				if self.store.move_node(node, geo) {
					trace!("drag {node} to ({}, {})", geo.lon, geo.lat);
					let change = self.projector.project_node(&self.store, node);
					host.present(self.projector.snapshot(), &change);
				}
			}
			InteractionState::Idle => {
				let hovered = ev
					.target
					.and_then(|t| t.node())
					.filter(|n| self.store.contains_node(*n));
				self.hovered = hovered;
				let cursor = match (hovered, ev.target) {
					(Some(_), _) => Cursor::Grab,
					(None, Some(PrimitiveId::Edge(_))) => Cursor::Pointer,
					_ => Cursor::Default,
				};
				self.set_cursor(host, cursor);
			}
			InteractionState::ContextMenuOpen(_) => {}
		}
	}

	/// Primary button released. Ends a drag: dropping onto another node
	/// connects the two and returns the dragged node to where it started.
	pub fn pointer_up(&mut self, host: &mut impl MapHost, ev: &PointerEvent) {
		let InteractionState::Dragging { node, original } = self.state else {
			return;
		};
		self.state = InteractionState::Idle;

		let target = host
			.query_at(ev.screen, &[PrimitiveKind::Node])
			.into_iter()
			.filter_map(|hit| hit.node())
			.find(|n| *n != node && self.store.contains_node(*n));

		match target {
			Some(target) if self.store.contains_node(node) => {
				self.store.move_node(node, original);
				let edge = self.store.add_edge(vec![node, target]);
				debug!("connected {node} to {target} as {edge:?}");
				let change = self.projector.project_all(&self.store);
				host.present(self.projector.snapshot(), &change);
			}
			_ => {
				if let Some(geo) = ev.geo {
					self.store.move_node(node, geo);
				}
				debug!("dropped {node}");
				let change = self.projector.project_node(&self.store, node);
				host.present(self.projector.snapshot(), &change);
			}
		}

		host.set_panning_enabled(true);
		self.set_cursor(host, Cursor::Default);
	}

	/// Secondary button (context menu request).
	pub fn context_menu(&mut self, host: &mut impl MapHost, ev: &PointerEvent) {
		if let InteractionState::Dragging { node, .. } = self.state {
			trace!("ignoring context menu while dragging {node}");
			return;
		}
		let target = match ev.target {
			Some(PrimitiveId::Edge(edge)) if self.store.contains_edge(edge) => {
				Some(MenuTarget::Edge(edge))
			}
			Some(PrimitiveId::Node(node)) if self.store.contains_node(node) => {
				Some(MenuTarget::Node(node))
			}
			_ => None,
		};
		self.state = match target {
			Some(target) => {
				debug!("context menu on {target:?}");
				InteractionState::ContextMenuOpen(ContextMenu {
					target,
					anchor: ev.screen,
					clicked: ev.geo,
				})
			}
			None => InteractionState::Idle,
		};
		self.set_cursor(host, Cursor::Default);
	}

	/// Pointer left the map surface.
	pub fn pointer_leave(&mut self, host: &mut impl MapHost) {
		self.hovered = None;
		if matches!(self.state, InteractionState::Idle) {
			self.set_cursor(host, Cursor::Default);
		}
	}

	/// Escape dismisses an open menu; other keys are ignored.
	pub fn key_down(&mut self, host: &mut impl MapHost, key: &str) {
		if key == "Escape" {
			self.dismiss_menu(host);
		}
	}

	/// Closes the menu without acting. No-op when none is open.
	pub fn dismiss_menu(&mut self, host: &mut impl MapHost) {
		if let InteractionState::ContextMenuOpen(menu) = self.state {
			debug!("menu on {:?} dismissed", menu.target);
			self.state = InteractionState::Idle;
			self.set_cursor(host, Cursor::Default);
		}
	}

	/// Applies a menu action chosen by the presentation layer.
	///
	/// Actions the open menu does not offer are ignored and the menu stays open.
	pub fn confirm(&mut self, host: &mut impl MapHost, action: MenuAction) -> Option<MenuOutcome> {
		let InteractionState::ContextMenuOpen(menu) = self.state else {
			return None;
		};
		let outcome = menu.confirm(&mut self.store, action)?;
		self.state = InteractionState::Idle;

		match outcome {
			MenuOutcome::Stale => debug!("{action:?} target vanished"),
			MenuOutcome::Deleted(node) => {
				if self.hovered == Some(node) {
					self.hovered = None;
				}
			}
			MenuOutcome::Split(_) => {}
		}
		if outcome != MenuOutcome::Stale {
			let change = self.projector.project_all(&self.store);
			host.present(self.projector.snapshot(), &change);
		}
		Some(outcome)
	}

	fn set_cursor(&mut self, host: &mut impl MapHost, cursor: Cursor) {
		if self.cursor != cursor {
			self.cursor = cursor;
			host.set_cursor(cursor);
		}
	}
}
