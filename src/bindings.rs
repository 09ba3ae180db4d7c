//! JavaScript entry points.

use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::components::activity_graph::{
	ActivityGraph, GraphError, GraphOptions, LifecycleState, js_message,
};

fn to_js(err: GraphError) -> JsValue {
	js_sys::Error::new(&err.to_string()).into()
}

/// `new ActivityGraph(containerOrSelector, options)`.
#[wasm_bindgen(js_name = ActivityGraph)]
pub struct JsActivityGraph {
	inner: ActivityGraph,
}

#[wasm_bindgen(js_class = ActivityGraph)]
impl JsActivityGraph {
	/// Mount a new widget. `container` is an element or a CSS selector.
	/// Throws if the container cannot be resolved.
	#[wasm_bindgen(constructor)]
	pub fn new(container: JsValue, options: JsValue) -> Result<JsActivityGraph, JsValue> {
		let options: GraphOptions = if options.is_undefined() || options.is_null() {
			GraphOptions::default()
		} else {
			serde_wasm_bindgen::from_value(options)
				.map_err(|e| to_js(GraphError::data_format(format!("invalid options: {e}"))))?
		};
		let inner = if let Some(selector) = container.as_string() {
			ActivityGraph::create_in(&selector, options)
		} else if let Some(element) = container.dyn_ref::<Element>() {
			ActivityGraph::create(element, options)
		} else {
			Err(GraphError::ContainerNotFound(js_message(&container)))
		}
		.map_err(to_js)?;
		Ok(Self { inner })
	}

	/// Load an already-parsed document. Errors are shown on the canvas, not thrown.
	#[wasm_bindgen(js_name = loadData)]
	pub fn load_data(&self, document: JsValue) {
		let loaded = match serde_wasm_bindgen::from_value::<serde_json::Value>(document) {
			Ok(value) => self.inner.load_data(value),
			Err(e) => self.inner.report_error(GraphError::data_format(e.to_string())),
		};
		if let Err(e) = loaded {
			warn!("loadData: {e}");
		}
	}

	/// Fetch a document. The promise rejects on fetch or format errors.
	#[wasm_bindgen(js_name = loadFromUrl)]
	pub fn load_from_url(&self, url: String) -> js_sys::Promise {
		let pending = self.inner.load_from_url(&url);
		wasm_bindgen_futures::future_to_promise(async move {
			pending.await.map(|_| JsValue::UNDEFINED).map_err(to_js)
		})
	}

	pub fn resize(&self, width: f64, height: f64) {
		if let Err(e) = self.inner.resize(width, height) {
			warn!("resize: {e}");
		}
	}

	pub fn start(&self) {
		let _ = self.inner.start();
	}

	pub fn stop(&self) {
		let _ = self.inner.stop();
	}

	pub fn destroy(&self) {
		self.inner.destroy();
	}

	/// Text of the error banner, if the last load failed.
	#[wasm_bindgen(getter, js_name = errorMessage)]
	pub fn error_message(&self) -> Option<String> {
		self.inner.error_message()
	}

	/// One of `"idle"`, `"running"`, `"paused"`, `"destroyed"`.
	#[wasm_bindgen(getter)]
	pub fn state(&self) -> String {
		match self.inner.state() {
			LifecycleState::Idle => "idle",
			LifecycleState::Running => "running",
			LifecycleState::Paused => "paused",
			LifecycleState::Destroyed => "destroyed",
		}
		.to_string()
	}
}
