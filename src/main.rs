use leptos::prelude::*;
use pedestrian_network_editor::{App, EditorConfig, init_logging};

fn main() {
	init_logging(EditorConfig::default().log_level);
	mount_to_body(App)
}
