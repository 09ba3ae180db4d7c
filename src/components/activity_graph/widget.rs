//! The mounted widget: owns its canvas, DOM listeners, and animation loop.

use std::cell::RefCell;
use std::future::Future;
use std::rc::{Rc, Weak};

use log::{error, info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
	CanvasRenderingContext2d, Document, Element, Event, EventTarget, HtmlCanvasElement, MouseEvent,
	Response, TouchEvent, Window,
};

use super::builder::GraphBuilder;
use super::error::{GraphError, Result};
use super::lifecycle::{FrameHandle, FrameScheduler, Lifecycle, LifecycleState};
use super::model::{GraphModel, Node};
use super::options::GraphOptions;
use super::render::{Captions, Frame, Renderer};
use super::state::InteractionState;
use super::types::ActivityDocument;

const FALLBACK_WIDTH: f64 = 800.0;
const FALLBACK_HEIGHT: f64 = 600.0;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// `requestAnimationFrame`-backed scheduler.
struct RafScheduler {
	window: Window,
	callback: FrameCallback,
}

impl FrameScheduler for RafScheduler {
	fn request(&mut self) -> Option<FrameHandle> {
		let callback = self.callback.borrow();
		let cb = callback.as_ref()?;
		self.window
			.request_animation_frame(cb.as_ref().unchecked_ref())
			.ok()
	}

	fn cancel(&mut self, handle: FrameHandle) {
		let _ = self.window.cancel_animation_frame(handle);
	}
}

/// A DOM event listener that can be removed again.
struct Listener {
	target: EventTarget,
	event: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
	fn attach(
		target: &EventTarget,
		event: &'static str,
		callback: Closure<dyn FnMut(Event)>,
	) -> Result<Self> {
		target
			.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
			.map_err(|e| GraphError::Canvas(js_message(&e)))?;
		Ok(Self {
			target: target.clone(),
			event,
			callback,
		})
	}

	fn detach(self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
	}
}

struct Inner {
	window: Window,
	container: Element,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	options: GraphOptions,
	renderer: Renderer,
	lifecycle: Lifecycle<RafScheduler>,
	document: Option<ActivityDocument>,
	model: Option<GraphModel>,
	interaction: InteractionState,
	captions: Captions,
	error: Option<String>,
	/// Seconds; the animation clock of the last drawn frame.
	clock: f64,
	rng: SmallRng,
}

impl Inner {
	fn builder(&self) -> GraphBuilder {
		GraphBuilder::new(&self.options, self.renderer.width, self.renderer.height)
	}

	fn rebuild(&mut self) {
		if let Some(doc) = &self.document {
			let mut model = self.builder().build(doc, &mut self.rng);
			if let Some(previous) = &self.model {
				model.inherit_phases(previous);
			}
			self.model = Some(model);
		}
		self.interaction.invalidate();
		self.captions.reset(self.model.as_ref());
	}

	fn apply_size(&mut self, width: f64, height: f64) -> Result<()> {
		let (width, height) = (width.max(0.0), height.max(0.0));
		let dpr = match self.window.device_pixel_ratio() {
			r if r > 0.0 => r,
			_ => 1.0,
		};
		self.canvas.set_width((width * dpr).round() as u32);
		self.canvas.set_height((height * dpr).round() as u32);
		let style = self.canvas.style();
		let _ = style.set_property("width", &format!("{width}px"));
		let _ = style.set_property("height", &format!("{height}px"));
		self.ctx
			.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
			.and_then(|_| self.ctx.scale(dpr, dpr))
			.map_err(|e| GraphError::Canvas(js_message(&e)))?;
		self.renderer.width = width;
		self.renderer.height = height;
		Ok(())
	}

	fn redraw_soon(&mut self) {
		let _ = self.lifecycle.request_redraw();
	}

	fn draw(&mut self) {
		let clock = self.clock;
		self.interaction.refresh(self.model.as_ref(), clock);
		let hover = self.interaction.hover_index();
		self.captions.sync_hover(self.model.as_ref(), hover);
		let frame = Frame {
			model: self.model.as_ref(),
			hover,
			pointer: self.interaction.pointer(),
			clock,
			error: self.error.as_deref(),
			captions: Some(&self.captions),
		};
		self.renderer.draw(&self.ctx, &frame);
	}

	/// Pointer position relative to the canvas, in CSS pixels.
	fn local_point(&self, client_x: f64, client_y: f64) -> (f64, f64) {
		let rect = self.canvas.get_bounding_client_rect();
		(client_x - rect.left(), client_y - rect.top())
	}

	fn pointer_moved(&mut self, client_x: f64, client_y: f64) {
		let (x, y) = self.local_point(client_x, client_y);
		self.interaction
			.update_pointer(x, y, self.model.as_ref(), self.clock);
		if !self.lifecycle.is_running() {
			self.redraw_soon();
		}
	}

	fn pointer_left(&mut self) {
		self.interaction.clear();
		if !self.lifecycle.is_running() {
			self.redraw_soon();
		}
	}
}

struct Shared {
	inner: RefCell<Inner>,
	frame_callback: FrameCallback,
	listeners: RefCell<Vec<Listener>>,
}

impl Shared {
	fn on_frame(&self, timestamp: f64) {
		let mut inner = self.inner.borrow_mut();
		if !inner.lifecycle.on_frame() {
			return;
		}
		if inner.lifecycle.is_running() {
			inner.clock = timestamp / 1000.0;
		}
		inner.draw();
	}

	fn load_document(&self, doc: ActivityDocument) -> Result<()> {
		let mut inner = self.inner.borrow_mut();
		if inner.lifecycle.is_destroyed() {
			return Err(GraphError::Destroyed);
		}
		inner.document = Some(doc);
		inner.error = None;
		inner.rebuild();
		if let Some(model) = &inner.model {
			info!(
				"loaded activity graph: {} nodes, {} links",
				model.nodes().len(),
				model.links().len()
			);
		}
		inner.redraw_soon();
		Ok(())
	}

	/// Show a load failure on the canvas; the previous model stays in place.
	fn report(&self, err: GraphError) -> Result<()> {
		error!("{err}");
		let mut inner = self.inner.borrow_mut();
		if !inner.lifecycle.is_destroyed() {
			inner.error = Some(err.to_string());
			inner.redraw_soon();
		}
		Err(err)
	}

	fn resize(&self, width: f64, height: f64) -> Result<()> {
		let mut inner = self.inner.borrow_mut();
		if inner.lifecycle.is_destroyed() {
			warn!("resize ignored: widget destroyed");
			return Err(GraphError::Destroyed);
		}
		inner.apply_size(width, height)?;
		inner.rebuild();
		inner.redraw_soon();
		Ok(())
	}

	fn fit_container(&self) -> Result<()> {
		let (width, height) = {
			let inner = self.inner.borrow();
			container_size(&inner.container, &inner.options)
		};
		self.resize(width, height)
	}

	fn destroy(&self) {
		{
			let mut inner = self.inner.borrow_mut();
			if !inner.lifecycle.destroy() {
				return;
			}
			inner.canvas.remove();
			inner.model = None;
			inner.document = None;
			inner.interaction.clear();
		}
		for listener in self.listeners.borrow_mut().drain(..) {
			listener.detach();
		}
		self.frame_callback.borrow_mut().take();
		info!("activity graph destroyed");
	}
}

/// An activity graph mounted into a container element.
///
/// Dropping the handle tears the widget down.
pub struct ActivityGraph {
	shared: Rc<Shared>,
}

impl ActivityGraph {
	/// Mount into the first element matching `selector`.
	pub fn create_in(selector: &str, options: GraphOptions) -> Result<Self> {
		let document = browser_document()?;
		let container = document
			.query_selector(selector)
			.ok()
			.flatten()
			.ok_or_else(|| GraphError::ContainerNotFound(selector.to_string()))?;
		Self::create(&container, options)
	}

	/// Mount into `container`, which must be attached to the document.
	pub fn create(container: &Element, options: GraphOptions) -> Result<Self> {
		if !container.is_connected() {
			return Err(GraphError::ContainerNotFound(
				"element is not attached to the document".into(),
			));
		}
		let window = web_sys::window().ok_or_else(|| GraphError::Canvas("no window".into()))?;
		let document = browser_document()?;

		let canvas: HtmlCanvasElement = document
			.create_element("canvas")
			.map_err(|e| GraphError::Canvas(js_message(&e)))?
			.dyn_into()
			.map_err(|_| GraphError::Canvas("created element is not a canvas".into()))?;
		canvas.set_class_name("activity-graph-canvas");
		let _ = canvas.style().set_property("display", "block");
		container
			.append_child(&canvas)
			.map_err(|e| GraphError::Canvas(js_message(&e)))?;

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into().ok())
			.ok_or_else(|| {
				canvas.remove();
				GraphError::Canvas("2d context unavailable".into())
			})?;

		let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
		let (width, height) = container_size(container, &options);
		let mut inner = Inner {
			window: window.clone(),
			container: container.clone(),
			canvas,
			ctx,
			renderer: Renderer {
				width,
				height,
				show_labels: options.show_labels,
				show_stats: options.show_stats,
			},
			options,
			lifecycle: Lifecycle::new(RafScheduler {
				window: window.clone(),
				callback: frame_callback.clone(),
			}),
			document: None,
			model: None,
			interaction: InteractionState::default(),
			captions: Captions::default(),
			error: None,
			clock: 0.0,
			rng: SmallRng::seed_from_u64((js_sys::Math::random() * 9_007_199_254_740_992.0) as u64),
		};
		if let Err(e) = inner.apply_size(width, height) {
			inner.canvas.remove();
			return Err(e);
		}

		let graph = Self {
			shared: Rc::new(Shared {
				inner: RefCell::new(inner),
				frame_callback,
				listeners: RefCell::new(Vec::new()),
			}),
		};

		let weak = Rc::downgrade(&graph.shared);
		*graph.shared.frame_callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			if let Some(shared) = weak.upgrade() {
				shared.on_frame(timestamp);
			}
		}));
		graph.install_listeners(&window, &document)?;

		{
			let mut inner = graph.shared.inner.borrow_mut();
			let _ = inner.lifecycle.set_hidden(document.hidden());
			let started = if inner.options.animate {
				inner.lifecycle.start()
			} else {
				inner.lifecycle.request_redraw()
			};
			if started.is_err() {
				warn!("animation could not start");
			}
		}
		info!("activity graph mounted ({width}x{height})");
		Ok(graph)
	}

	fn install_listeners(&self, window: &Window, document: &Document) -> Result<()> {
		let canvas: EventTarget = self.shared.inner.borrow().canvas.clone().into();
		let fits_container = self.shared.inner.borrow().options.fits_container();
		let mut listeners = Vec::new();

		let weak = Rc::downgrade(&self.shared);
		listeners.push(Listener::attach(
			&canvas,
			"mousemove",
			Closure::new(move |ev: Event| {
				let ev: MouseEvent = ev.unchecked_into();
				if let Some(shared) = weak.upgrade() {
					shared
						.inner
						.borrow_mut()
						.pointer_moved(ev.client_x() as f64, ev.client_y() as f64);
				}
			}),
		)?);

		for event in ["touchstart", "touchmove"] {
			let weak = Rc::downgrade(&self.shared);
			listeners.push(Listener::attach(
				&canvas,
				event,
				Closure::new(move |ev: Event| {
					let ev: TouchEvent = ev.unchecked_into();
					let (Some(shared), Some(touch)) = (weak.upgrade(), ev.touches().get(0)) else {
						return;
					};
					shared
						.inner
						.borrow_mut()
						.pointer_moved(touch.client_x() as f64, touch.client_y() as f64);
				}),
			)?);
		}

		for event in ["mouseleave", "touchend", "touchcancel"] {
			let weak = Rc::downgrade(&self.shared);
			listeners.push(Listener::attach(
				&canvas,
				event,
				Closure::new(move |_: Event| {
					if let Some(shared) = weak.upgrade() {
						shared.inner.borrow_mut().pointer_left();
					}
				}),
			)?);
		}

		let weak = Rc::downgrade(&self.shared);
		let doc = document.clone();
		listeners.push(Listener::attach(
			document,
			"visibilitychange",
			Closure::new(move |_: Event| {
				if let Some(shared) = weak.upgrade() {
					let mut inner = shared.inner.borrow_mut();
					if inner.lifecycle.set_hidden(doc.hidden()).is_ok() && !inner.lifecycle.is_running()
					{
						inner.redraw_soon();
					}
				}
			}),
		)?);

		if fits_container {
			let weak = Rc::downgrade(&self.shared);
			listeners.push(Listener::attach(
				window,
				"resize",
				Closure::new(move |_: Event| {
					if let Some(shared) = weak.upgrade() {
						let _ = shared.fit_container();
					}
				}),
			)?);
		}

		self.shared.listeners.borrow_mut().extend(listeners);
		Ok(())
	}

	/// Replace the graph with one built from `value`.
	///
	/// On failure the error is drawn on the canvas, logged, and returned; the
	/// previously loaded graph stays in place.
	pub fn load_data(&self, value: Value) -> Result<()> {
		if self.is_destroyed() {
			warn!("load_data ignored: widget destroyed");
			return Err(GraphError::Destroyed);
		}
		match ActivityDocument::from_value(value) {
			Ok(doc) => self.shared.load_document(doc),
			Err(e) => self.shared.report(e),
		}
	}

	/// Draw `err` as the error banner and hand it back.
	pub fn report_error(&self, err: GraphError) -> Result<()> {
		self.shared.report(err)
	}

	pub fn load_document(&self, doc: ActivityDocument) -> Result<()> {
		self.shared.load_document(doc)
	}

	/// Fetch and load a document. The current graph keeps animating while the
	/// request is in flight.
	pub fn load_from_url(&self, url: &str) -> impl Future<Output = Result<()>> + 'static {
		load_url(Rc::downgrade(&self.shared), url.to_string())
	}

	/// Resize to `width`×`height` CSS pixels and rebuild the layout.
	pub fn resize(&self, width: f64, height: f64) -> Result<()> {
		self.shared.resize(width, height)
	}

	pub fn start(&self) -> Result<()> {
		self.shared
			.inner
			.borrow_mut()
			.lifecycle
			.start()
			.map_err(|_| GraphError::Destroyed)
	}

	pub fn stop(&self) -> Result<()> {
		let mut inner = self.shared.inner.borrow_mut();
		inner.lifecycle.stop().map_err(|_| GraphError::Destroyed)?;
		inner.redraw_soon();
		Ok(())
	}

	/// Stop the loop, remove every listener, and detach the canvas. Idempotent.
	pub fn destroy(&self) {
		self.shared.destroy();
	}

	pub fn state(&self) -> LifecycleState {
		self.shared.inner.borrow().lifecycle.state()
	}

	pub fn is_destroyed(&self) -> bool {
		self.state() == LifecycleState::Destroyed
	}

	pub fn canvas(&self) -> HtmlCanvasElement {
		self.shared.inner.borrow().canvas.clone()
	}

	/// Current error banner text, if the last load failed.
	pub fn error_message(&self) -> Option<String> {
		self.shared.inner.borrow().error.clone()
	}

	pub fn with_model<T>(&self, f: impl FnOnce(Option<&GraphModel>) -> T) -> T {
		f(self.shared.inner.borrow().model.as_ref())
	}

	pub fn hovered_node(&self) -> Option<Node> {
		let inner = self.shared.inner.borrow();
		let model = inner.model.as_ref()?;
		inner.interaction.current_hover(model).cloned()
	}

	/// Feed a pointer position in canvas-local CSS pixels.
	pub fn update_pointer(&self, x: f64, y: f64) {
		let mut inner = self.shared.inner.borrow_mut();
		let clock = inner.clock;
		let Inner {
			interaction, model, ..
		} = &mut *inner;
		interaction.update_pointer(x, y, model.as_ref(), clock);
	}
}

impl Drop for ActivityGraph {
	fn drop(&mut self) {
		self.shared.destroy();
	}
}

async fn load_url(shared: Weak<Shared>, url: String) -> Result<()> {
	info!("fetching activity data from {url}");
	let fetched = fetch_document(&url).await;
	let Some(shared) = shared.upgrade() else {
		return Err(GraphError::Destroyed);
	};
	match fetched {
		Ok(doc) => shared.load_document(doc),
		Err(e) => shared.report(e),
	}
}

async fn fetch_document(url: &str) -> Result<ActivityDocument> {
	let window = web_sys::window().ok_or_else(|| GraphError::fetch(None, "no window"))?;
	let response: Response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(|e| GraphError::fetch(None, js_message(&e)))?
		.dyn_into()
		.map_err(|_| GraphError::fetch(None, "fetch did not return a Response"))?;
	let status = response.status();
	if !response.ok() {
		return Err(GraphError::fetch(
			Some(status),
			format!("HTTP {status} {}", response.status_text()),
		));
	}
	let body = response
		.text()
		.map_err(|e| GraphError::fetch(Some(status), js_message(&e)))?;
	let text = JsFuture::from(body)
		.await
		.map_err(|e| GraphError::fetch(Some(status), js_message(&e)))?
		.as_string()
		.ok_or_else(|| GraphError::fetch(Some(status), "response body is not text"))?;
	ActivityDocument::from_json_str(&text)
}

fn browser_document() -> Result<Document> {
	web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| GraphError::ContainerNotFound("no document".into()))
}

fn container_size(container: &Element, options: &GraphOptions) -> (f64, f64) {
	let measured = |v: i32, fallback: f64| if v > 0 { v as f64 } else { fallback };
	(
		options
			.width
			.unwrap_or_else(|| measured(container.client_width(), FALLBACK_WIDTH)),
		options
			.height
			.unwrap_or_else(|| measured(container.client_height(), FALLBACK_HEIGHT)),
	)
}

pub(crate) fn js_message(value: &JsValue) -> String {
	if let Some(s) = value.as_string() {
		return s;
	}
	if let Some(e) = value.dyn_ref::<js_sys::Error>() {
		return String::from(e.message());
	}
	format!("{value:?}")
}
