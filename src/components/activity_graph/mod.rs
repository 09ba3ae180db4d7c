mod builder;
mod component;
mod error;
mod lifecycle;
mod model;
mod options;
mod render;
pub mod scale;
mod state;
mod types;
mod widget;

pub use builder::GraphBuilder;
pub use component::ActivityGraphCanvas;
pub use error::{GraphError, Result};
pub use lifecycle::{FrameHandle, FrameScheduler, Lifecycle, LifecycleError, LifecycleState};
pub use model::{GraphModel, KindStyle, Link, Node, NodeKind, NodePayload, Point, SummaryStats};
pub use options::{DEFAULT_MAX_EXTENSIONS, DEFAULT_MAX_LANGUAGES, GraphOptions};
pub use render::{Captions, Frame, Renderer};
pub use state::{FLOAT_AMPLITUDE, HIT_PADDING, InteractionState, animated_position, hit_test};
pub use types::{ActivityDocument, RepositoryEntry, Summary};
pub use widget::ActivityGraph;
pub(crate) use widget::js_message;
