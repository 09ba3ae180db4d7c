use serde::Deserialize;

pub const DEFAULT_MAX_LANGUAGES: usize = 12;
pub const DEFAULT_MAX_EXTENSIONS: usize = 16;

/// Widget configuration.
///
/// Deserialised with camelCase keys; unknown keys are ignored.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphOptions {
	/// CSS width in pixels. Defaults to the container's client width.
	pub width: Option<f64>,
	/// CSS height in pixels. Defaults to the container's client height.
	pub height: Option<f64>,
	pub animate: bool,
	pub show_labels: bool,
	pub show_stats: bool,
	pub max_languages: usize,
	pub max_extensions: usize,
}

impl Default for GraphOptions {
	fn default() -> Self {
		Self {
			width: None,
			height: None,
			animate: true,
			show_labels: true,
			show_stats: true,
			max_languages: DEFAULT_MAX_LANGUAGES,
			max_extensions: DEFAULT_MAX_EXTENSIONS,
		}
	}
}

impl GraphOptions {
	/// Whether the canvas follows the container size instead of a fixed size.
	pub fn fits_container(&self) -> bool {
		self.width.is_none() || self.height.is_none()
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn empty_object_yields_defaults() {
		let opts: GraphOptions = serde_json::from_value(json!({})).unwrap();
		assert_eq!(opts, GraphOptions::default());
		assert!(opts.fits_container());
	}

	#[test]
	fn recognised_keys_are_camel_case_and_unknown_keys_ignored() {
		let opts: GraphOptions = serde_json::from_value(json!({
			"width": 640,
			"height": 480,
			"animate": false,
			"showStats": false,
			"maxExtensions": 2,
			"theme": "dark"
		}))
		.unwrap();
		assert_eq!(opts.width, Some(640.0));
		assert!(!opts.animate);
		assert!(!opts.show_stats);
		assert!(opts.show_labels);
		assert_eq!(opts.max_extensions, 2);
		assert_eq!(opts.max_languages, DEFAULT_MAX_LANGUAGES);
		assert!(!opts.fits_container());
	}
}
