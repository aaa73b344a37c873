use std::fmt;

/// Identity of a graph node. Never reused within one store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

/// Identity of a graph edge. Never reused within one store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub u64);

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "node-{}", self.0)
	}
}

impl fmt::Display for EdgeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "edge-{}", self.0)
	}
}

/// Geographic position in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeoPoint {
	/// Longitude, east positive.
	pub lon: f64,
	/// Latitude, north positive.
	pub lat: f64,
}

impl GeoPoint {
	/// Point at (`lon`, `lat`).
	pub const fn new(lon: f64, lat: f64) -> Self {
		Self { lon, lat }
	}

	/// Squared distance in the plain lon/lat plane.
	pub fn distance_sq(&self, other: &GeoPoint) -> f64 {
		let (dx, dy) = (self.lon - other.lon, self.lat - other.lat);
		dx * dx + dy * dy
	}

	/// Halfway point in lon/lat space.
	pub fn midpoint(&self, other: &GeoPoint) -> GeoPoint {
		GeoPoint::new((self.lon + other.lon) / 2.0, (self.lat + other.lat) / 2.0)
	}
}

/// Pixel position on the map surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
	/// Pixels from the left edge.
	pub x: f64,
	/// Pixels from the top edge.
	pub y: f64,
}

impl ScreenPoint {
	/// Point at (`x`, `y`).
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Raw line geometry as delivered by a loader.
#[derive(Clone, Debug, PartialEq)]
pub enum LineGeometry {
	/// A single vertex run.
	Line(Vec<GeoPoint>),
	/// Several runs; each becomes its own edge.
	MultiLine(Vec<Vec<GeoPoint>>),
}

impl LineGeometry {
	/// Each vertex run that becomes one edge.
	pub fn parts(&self) -> Box<dyn Iterator<Item = &[GeoPoint]> + '_> {
		match self {
			LineGeometry::Line(points) => Box::new(std::iter::once(points.as_slice())),
			LineGeometry::MultiLine(lines) => Box::new(lines.iter().map(Vec::as_slice)),
		}
	}
}

/// Layer a rendered primitive belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
	Node,
	Edge,
}

/// Rendered primitive identity, as reported back by a hit-test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveId {
	Node(NodeId),
	Edge(EdgeId),
}

impl PrimitiveId {
	/// Layer this primitive is drawn on.
	pub fn kind(&self) -> PrimitiveKind {
		match self {
			PrimitiveId::Node(_) => PrimitiveKind::Node,
			PrimitiveId::Edge(_) => PrimitiveKind::Edge,
		}
	}

	/// The node id, for node primitives.
	pub fn node(&self) -> Option<NodeId> {
		match *self {
			PrimitiveId::Node(id) => Some(id),
			PrimitiveId::Edge(_) => None,
		}
	}
}
