use web_sys::HtmlCanvasElement;

use crate::editor::{
	Cursor, EditorConfig, GeoPoint, GeometrySnapshot, InteractionController, LineGeometry,
	MapHost, PointerEvent, PrimitiveId, PrimitiveKind, ScreenPoint, SnapshotChange,
};

pub const NODE_RADIUS: f64 = 4.0;
pub const HIT_RADIUS: f64 = 9.0;
pub const EDGE_TOLERANCE: f64 = 5.0;
const FIT_MARGIN: f64 = 40.0;

/// Local equirectangular projection: `k` pixels per degree of latitude,
/// longitude shrunk by `aspect` (cosine of the centre latitude).
#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
	pub aspect: f64,
	fit_k: f64,
}

impl ViewTransform {
	/// Centres and scales the view so `points` fill the canvas.
	pub fn fit<'a>(points: impl Iterator<Item = &'a GeoPoint>, width: f64, height: f64) -> Self {
		let (mut min, mut max) = (
			GeoPoint::new(f64::INFINITY, f64::INFINITY),
			GeoPoint::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
		);
		for p in points {
			min = GeoPoint::new(min.lon.min(p.lon), min.lat.min(p.lat));
			max = GeoPoint::new(max.lon.max(p.lon), max.lat.max(p.lat));
		}
		if !min.lon.is_finite() {
			min = GeoPoint::default();
			max = GeoPoint::default();
		}

		let center = min.midpoint(&max);
		let aspect = center.lat.to_radians().cos().max(0.01);
		let span_x = ((max.lon - min.lon) * aspect).max(1e-6);
		let span_y = (max.lat - min.lat).max(1e-6);
		let k = ((width - 2.0 * FIT_MARGIN).max(1.0) / span_x)
			.min((height - 2.0 * FIT_MARGIN).max(1.0) / span_y);

		Self {
			x: width / 2.0 - center.lon * aspect * k,
			y: height / 2.0 + center.lat * k,
			k,
			aspect,
			fit_k: k,
		}
	}

	pub fn to_screen(&self, geo: GeoPoint) -> ScreenPoint {
		ScreenPoint::new(self.x + geo.lon * self.aspect * self.k, self.y - geo.lat * self.k)
	}

	pub fn to_geo(&self, screen: ScreenPoint) -> GeoPoint {
		GeoPoint::new(
			(screen.x - self.x) / (self.aspect * self.k),
			(self.y - screen.y) / self.k,
		)
	}

	/// Zooms by `factor` keeping the point under (`sx`, `sy`) fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.k * factor).clamp(self.fit_k * 0.25, self.fit_k * 500.0);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// The map side of the editor: owns the view, its own copy of the geometry,
/// and the canvas it draws to.
pub struct CanvasHost {
	canvas: HtmlCanvasElement,
	pub view: ViewTransform,
	pub pan: PanState,
	pub scene: GeometrySnapshot,
	pub width: f64,
	pub height: f64,
	pub dirty: bool,
	panning_enabled: bool,
}

impl CanvasHost {
	pub fn start_pan(&mut self, x: f64, y: f64) {
		if !self.panning_enabled {
			return;
		}
		self.pan = PanState {
			active: true,
			start_x: x,
			start_y: y,
			transform_start_x: self.view.x,
			transform_start_y: self.view.y,
		};
	}

	pub fn update_pan(&mut self, x: f64, y: f64) {
		self.view.x = self.pan.transform_start_x + (x - self.pan.start_x);
		self.view.y = self.pan.transform_start_y + (y - self.pan.start_y);
		self.dirty = true;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.dirty = true;
	}

	/// Event at (`x`, `y`) with whatever primitive lies underneath, nodes first.
	pub fn pointer_event(&self, x: f64, y: f64) -> PointerEvent {
		let screen = ScreenPoint::new(x, y);
		PointerEvent {
			target: self
				.query_at(screen, &[PrimitiveKind::Node, PrimitiveKind::Edge])
				.into_iter()
				.next(),
			..self.bare_event(x, y)
		}
	}

	/// Event at (`x`, `y`) without hit-testing; enough while dragging.
	pub fn bare_event(&self, x: f64, y: f64) -> PointerEvent {
		let screen = ScreenPoint::new(x, y);
		PointerEvent {
			screen,
			geo: Some(self.view.to_geo(screen)),
			target: None,
		}
	}
}

impl MapHost for CanvasHost {
	fn query_at(&self, point: ScreenPoint, layers: &[PrimitiveKind]) -> Vec<PrimitiveId> {
		let mut hits: Vec<(f64, PrimitiveId)> = Vec::new();
		if layers.contains(&PrimitiveKind::Node) {
			let mut nodes: Vec<(f64, PrimitiveId)> = self
				.scene
				.points()
				.filter_map(|p| {
					let s = self.view.to_screen(p.position);
					let d = ((s.x - point.x).powi(2) + (s.y - point.y).powi(2)).sqrt();
					(d <= HIT_RADIUS).then_some((d, PrimitiveId::Node(p.node)))
				})
				.collect();
			nodes.sort_by(|a, b| a.0.total_cmp(&b.0));
			hits.extend(nodes);
		}
		if layers.contains(&PrimitiveKind::Edge) {
			let mut edges: Vec<(f64, PrimitiveId)> = self
				.scene
				.lines()
				.filter_map(|line| {
					let screen: Vec<ScreenPoint> =
						line.coordinates.iter().map(|c| self.view.to_screen(*c)).collect();
					let d = screen
						.windows(2)
						.map(|w| segment_distance(point, w[0], w[1]))
						.fold(f64::INFINITY, f64::min);
					(d <= EDGE_TOLERANCE).then_some((d, PrimitiveId::Edge(line.edge)))
				})
				.collect();
			edges.sort_by(|a, b| a.0.total_cmp(&b.0));
			hits.extend(edges);
		}
		hits.into_iter().map(|(_, id)| id).collect()
	}

	fn set_panning_enabled(&mut self, enabled: bool) {
		self.panning_enabled = enabled;
		if !enabled {
			self.pan.active = false;
		}
	}

	fn set_cursor(&mut self, cursor: Cursor) {
		let _ = self.canvas.style().set_property("cursor", cursor.css());
	}

	fn present(&mut self, snapshot: &GeometrySnapshot, change: &SnapshotChange) {
		self.scene.sync_from(snapshot, change);
		self.dirty = true;
	}
}

fn segment_distance(p: ScreenPoint, a: ScreenPoint, b: ScreenPoint) -> f64 {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len_sq = dx * dx + dy * dy;
	let t = if len_sq < 1e-12 {
		0.0
	} else {
		(((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.x + t * dx, a.y + t * dy);
	((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

/// One editor bound to one canvas.
pub struct CanvasSession {
	pub editor: InteractionController,
	pub host: CanvasHost,
}

impl CanvasSession {
	pub fn new(
		lines: &[LineGeometry],
		config: &EditorConfig,
		canvas: HtmlCanvasElement,
		width: f64,
		height: f64,
	) -> Self {
		let mut editor = InteractionController::from_lines(lines, config);
		let view = ViewTransform::fit(
			editor.store().nodes().map(|n| &n.position),
			width,
			height,
		);
		let mut host = CanvasHost {
			canvas,
			view,
			pan: PanState::default(),
			scene: GeometrySnapshot::default(),
			width,
			height,
			dirty: true,
			panning_enabled: true,
		};
		editor.attach(&mut host);
		Self { editor, host }
	}
}
