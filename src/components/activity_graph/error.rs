use thiserror::Error;

/// A specialized `Result` type for activity graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors surfaced by the activity graph widget.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
	/// The container selector or handle does not resolve to a live element.
	#[error("container not found: {0}")]
	ContainerNotFound(String),

	/// The activity document is missing `summary` or has the wrong shape.
	#[error("invalid activity data: {0}")]
	DataFormat(String),

	/// Network or HTTP failure while loading a document by URL.
	#[error("failed to fetch activity data: {message}")]
	Fetch {
		/// HTTP status, when a response was received at all.
		status: Option<u16>,
		/// Status text or the underlying network error.
		message: String,
	},

	/// The browser refused a canvas or DOM operation.
	#[error("canvas error: {0}")]
	Canvas(String),

	/// The widget has already been torn down.
	#[error("widget has been destroyed")]
	Destroyed,
}

impl GraphError {
	pub fn data_format(msg: impl Into<String>) -> Self {
		Self::DataFormat(msg.into())
	}

	pub fn fetch(status: Option<u16>, message: impl Into<String>) -> Self {
		Self::Fetch {
			status,
			message: message.into(),
		}
	}

	/// Whether this error is recovered locally by rendering an in-canvas message.
	pub fn is_load_error(&self) -> bool {
		matches!(self, Self::DataFormat(_) | Self::Fetch { .. })
	}
}

impl From<serde_json::Error> for GraphError {
	fn from(e: serde_json::Error) -> Self {
		Self::DataFormat(e.to_string())
	}
}
