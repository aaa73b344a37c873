use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent, Window,
};

use super::render;
use super::state::CanvasSession;
use crate::editor::{EditorConfig, LineGeometry, MenuAction, MenuDescriptor};

/// What the floating menu asks the editor to do.
#[derive(Clone, Copy, Debug, PartialEq)]
enum MenuCommand {
	Confirm(MenuAction),
	Dismiss,
}

fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn window_size(window: &Window) -> (f64, f64) {
	(
		window
			.inner_width()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(800.0),
		window
			.inner_height()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(600.0),
	)
}

/// Canvas that hosts a network editor over `lines`.
#[component]
pub fn NetworkEditorCanvas(
	#[prop(into)] lines: Signal<Vec<LineGeometry>>,
	#[prop(optional)] config: EditorConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<CanvasSession>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());
	let (menu, set_menu) = signal(None::<MenuDescriptor>);
	let command = RwSignal::new(None::<MenuCommand>);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("canvas has no 2d context");
			return;
		};
		let network = lines.get();
		*state_init.borrow_mut() = Some(CanvasSession::new(&network, &config, canvas.clone(), w, h));
		set_menu.set(None);

		if fullscreen && resize_cb_init.borrow().is_none() {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.host.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		if animate_init.borrow().is_some() {
			return;
		}
		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.host.dirty {
					render::render(s, &ctx);
					s.host.dirty = false;
				}
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_cmd = state.clone();
	Effect::new(move |_| {
		let Some(cmd) = command.get() else {
			return;
		};
		if let Some(ref mut s) = *state_cmd.borrow_mut() {
			let CanvasSession { editor, host } = s;
			match cmd {
				MenuCommand::Confirm(action) => {
					editor.confirm(host, action);
				}
				MenuCommand::Dismiss => editor.dismiss_menu(host),
			}
			host.dirty = true;
			set_menu.set(editor.menu());
		}
		command.set(None);
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_point(&canvas, &ev);

		if let Some(ref mut s) = *state_md.borrow_mut() {
			let CanvasSession { editor, host } = s;
			let menu_was_open = editor.menu().is_some();
			let pe = host.pointer_event(x, y);
			editor.pointer_down(host, &pe);
			if editor.dragged().is_none() && pe.target.is_none() && !menu_was_open {
				host.start_pan(x, y);
			}
			host.dirty = true;
			set_menu.set(editor.menu());
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_point(&canvas, &ev);

		if let Some(ref mut s) = *state_mm.borrow_mut() {
			let CanvasSession { editor, host } = s;
			if host.pan.active {
				host.update_pan(x, y);
				return;
			}
			// Hit-testing is skipped mid-drag; only the drop needs it.
			let pe = if editor.dragged().is_some() {
				host.bare_event(x, y)
			} else {
				host.pointer_event(x, y)
			};
			editor.pointer_move(host, &pe);
			host.dirty = true;
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_point(&canvas, &ev);

		if let Some(ref mut s) = *state_mu.borrow_mut() {
			let CanvasSession { editor, host } = s;
			let pe = host.bare_event(x, y);
			editor.pointer_up(host, &pe);
			host.pan.active = false;
			host.dirty = true;
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_point(&canvas, &ev);

		if let Some(ref mut s) = *state_ml.borrow_mut() {
			let CanvasSession { editor, host } = s;
			if editor.dragged().is_some() {
				let pe = host.bare_event(x, y);
				editor.pointer_up(host, &pe);
			}
			editor.pointer_leave(host);
			host.pan.active = false;
			host.dirty = true;
		}
	};

	let state_cm = state.clone();
	let on_contextmenu = move |ev: MouseEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_point(&canvas, &ev);

		if let Some(ref mut s) = *state_cm.borrow_mut() {
			let CanvasSession { editor, host } = s;
			let pe = host.pointer_event(x, y);
			editor.context_menu(host, &pe);
			host.dirty = true;
			set_menu.set(editor.menu());
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_point(&canvas, &ev);

		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.host.view.zoom_at(x, y, factor);
			s.host.dirty = true;
		}
	};

	let state_kd = state.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		if let Some(ref mut s) = *state_kd.borrow_mut() {
			let CanvasSession { editor, host } = s;
			editor.key_down(host, &ev.key());
			host.dirty = true;
			set_menu.set(editor.menu());
		}
	};

	view! {
		<div class="network-editor" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="network-editor-canvas"
				tabindex="0"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:contextmenu=on_contextmenu
				on:wheel=on_wheel
				on:keydown=on_keydown
				style="display: block; outline: none;"
			/>
			{move || {
				menu.get()
					.map(|descriptor| {
						let style = format!(
							"position: absolute; left: {}px; top: {}px;",
							descriptor.anchor.x,
							descriptor.anchor.y,
						);
						view! {
							<div class="network-editor-menu" style=style>
								{descriptor
									.actions
									.into_iter()
									.map(|action| {
										view! {
											<button on:click=move |_| {
												command.set(Some(MenuCommand::Confirm(action)))
											}>{action.label()}</button>
										}
									})
									.collect_view()}
								<button on:click=move |_| {
									command.set(Some(MenuCommand::Dismiss))
								}>"Cancel"</button>
							</div>
						}
					})
			}}
		</div>
	}
}
