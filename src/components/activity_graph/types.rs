//! Schema of the activity-summary document consumed by the widget.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use super::error::{GraphError, Result};

/// Aggregated totals across every repository.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Summary {
	pub total_repos: u64,
	pub total_commits: u64,
	pub total_lines_changed: u64,
	#[serde(default)]
	pub total_lines_added: u64,
	#[serde(default)]
	pub total_lines_removed: u64,
	#[serde(default)]
	pub total_files_changed: u64,
	pub languages: BTreeMap<String, u64>,
	#[serde(default)]
	pub language_percentages: BTreeMap<String, f64>,
	pub contribution_types: BTreeMap<String, u64>,
	#[serde(default)]
	pub contribution_percentages: BTreeMap<String, f64>,
	pub file_extensions: BTreeMap<String, u64>,
	#[serde(default)]
	pub file_extension_percentages: BTreeMap<String, f64>,
}

/// Per-repository breakdown.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RepositoryEntry {
	pub name: String,
	#[serde(default)]
	pub total_commits: u64,
	#[serde(default)]
	pub total_lines_added: u64,
	#[serde(default)]
	pub total_lines_removed: u64,
	#[serde(default)]
	pub languages: BTreeMap<String, u64>,
	#[serde(default)]
	pub contribution_types: BTreeMap<String, u64>,
	#[serde(default)]
	pub file_extensions: BTreeMap<String, u64>,
}

/// A validated activity document.
///
/// Maps are ordered so that building from the same document always visits
/// entries in the same order.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ActivityDocument {
	pub summary: Summary,
	#[serde(default)]
	pub repositories: Vec<RepositoryEntry>,
	#[serde(default)]
	pub generated_at: Option<String>,
}

impl ActivityDocument {
	/// Validate a loosely-typed JSON value once, at load time.
	pub fn from_value(value: Value) -> Result<Self> {
		match value.get("summary") {
			Some(Value::Object(_)) => {}
			Some(other) => {
				return Err(GraphError::data_format(format!(
					"`summary` must be an object, found {}",
					json_type_name(other)
				)));
			}
			None => return Err(GraphError::data_format("missing `summary` object")),
		}
		Ok(serde_json::from_value(value)?)
	}

	pub fn from_json_str(text: &str) -> Result<Self> {
		let value: Value = serde_json::from_str(text)?;
		Self::from_value(value)
	}
}

fn json_type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
