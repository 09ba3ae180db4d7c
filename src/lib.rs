//! Radial activity graph widget: Leptos client-side app wiring, routes, and
//! the embeddable canvas component.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod bindings;
mod components;
mod pages;

pub use bindings::JsActivityGraph;
pub use components::activity_graph::{
	ActivityDocument, ActivityGraph, ActivityGraphCanvas, Captions, DEFAULT_MAX_EXTENSIONS,
	DEFAULT_MAX_LANGUAGES, FLOAT_AMPLITUDE, Frame, FrameHandle, FrameScheduler, GraphBuilder,
	GraphError, GraphModel, GraphOptions, HIT_PADDING, InteractionState, KindStyle, Lifecycle,
	LifecycleError, LifecycleState, Link, Node, NodeKind, NodePayload, Point, Renderer,
	RepositoryEntry, Result, Summary, SummaryStats, animated_position, hit_test, scale,
};

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the demo page and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Activity Graph" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
