pub mod network_canvas;
