use leptos::prelude::*;
use leptos::task::spawn_local;
use log::error;
use serde_json::Value;
use web_sys::Element;

use super::options::GraphOptions;
use super::widget::ActivityGraph;

/// Leptos wrapper around [`ActivityGraph`].
///
/// The widget is created once the container div is mounted, reloads whenever
/// `document` changes, and is destroyed with the owning scope.
#[component]
pub fn ActivityGraphCanvas(
	#[prop(into, optional)] document: Option<Signal<Option<Value>>>,
	#[prop(into, optional)] url: Option<String>,
	#[prop(optional)] options: GraphOptions,
) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let widget = StoredValue::new_local(None::<ActivityGraph>);

	Effect::new(move |_| {
		let Some(container) = container_ref.get() else {
			return;
		};
		let doc = document.and_then(|d| d.get());

		if widget.with_value(|w| w.is_none()) {
			let container: Element = container.into();
			match ActivityGraph::create(&container, options.clone()) {
				Ok(graph) => {
					if let Some(url) = url.clone() {
						let pending = graph.load_from_url(&url);
						spawn_local(async move {
							let _ = pending.await;
						});
					}
					widget.set_value(Some(graph));
				}
				Err(e) => {
					error!("{e}");
					return;
				}
			}
		}

		if let Some(doc) = doc {
			widget.with_value(|w| {
				if let Some(graph) = w {
					let _ = graph.load_data(doc);
				}
			});
		}
	});

	on_cleanup(move || {
		widget.update_value(|w| {
			if let Some(graph) = w.take() {
				graph.destroy();
			}
		});
	});

	view! {
		<div
			node_ref=container_ref
			class="activity-graph"
			style="width: 100%; height: 100%; position: relative;"
		/>
	}
}
