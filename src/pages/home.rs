use leptos::prelude::*;

use crate::components::network_canvas::NetworkEditorCanvas;
use crate::editor::{LineGeometry, LoadError, parse_feature_collection};

const SAMPLE_NETWORK: &str = include_str!("../../assets/sample_network.geojson");

/// Loads the bundled sample network.
fn load_sample_network() -> Result<Vec<LineGeometry>, LoadError> {
	parse_feature_collection(SAMPLE_NETWORK)
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let network = load_sample_network();

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! The network could not be loaded."</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			{network
				.map(|lines| {
					view! {
						<div class="fullscreen-map">
							<NetworkEditorCanvas lines=lines fullscreen=true />
							<div class="map-overlay">
								<h1>"Pedestrian Network"</h1>
								<p class="subtitle">
									"Drag a node onto another to connect them. Right-click an edge to split it, or a node to delete it."
								</p>
							</div>
						</div>
					}
				})}
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::editor::{EditorConfig, InteractionController};

	#[test]
	fn sample_network_loads_into_a_connected_graph() {
		let lines = load_sample_network().unwrap();
		assert_eq!(lines.len(), 6);

		let editor = InteractionController::from_lines(&lines, &EditorConfig::default());
		let store = editor.store();
		assert_eq!(store.edge_count(), 7);
		assert_eq!(store.node_count(), 11);
		assert!(store.nodes().all(|n| store.incident_edges(n.id).count() > 0));
	}
}
