//! Interactive network graph editor.
//!
//! Raw line geometry is merged into a [`GraphStore`] by the [`Quantizer`],
//! projected into a [`GeometrySnapshot`] for drawing, and edited through the
//! [`InteractionController`], which consumes pointer events from a [`MapHost`].
//! Nothing in here touches the DOM.

mod config;
mod controller;
mod loader;
mod menu;
mod projector;
mod quantize;
mod spatial;
mod store;
mod types;

#[cfg(test)]
mod proptests;

pub use config::EditorConfig;
pub use controller::{Cursor, InteractionController, InteractionState, MapHost, PointerEvent};
pub use loader::{LoadError, parse_feature_collection};
pub use menu::{ContextMenu, MenuAction, MenuDescriptor, MenuOutcome, MenuTarget};
pub use projector::{EdgeLine, GeometrySnapshot, NodePoint, Projector, SnapshotChange};
pub use quantize::Quantizer;
pub use spatial::closest_segment;
pub use store::{Edge, GraphStore, Node, Split};
pub use types::{
	EdgeId, GeoPoint, LineGeometry, NodeId, PrimitiveId, PrimitiveKind, ScreenPoint,
};
