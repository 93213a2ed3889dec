pub mod filter;
pub mod graph;
pub mod intervals;
pub mod presets;
#[cfg(feature = "profiling")]
pub mod profiling;
pub mod search;
pub mod span_map;
pub mod stats;
pub mod summary;
pub mod task_timer;
pub mod types;

pub use filter::{filter_spans, FilterCriteria, MatchResult, TagFilter};
pub use graph::{create_graph_frames, GraphEdge, GraphFrames, GraphNode};
pub use search::SearchController;
pub use types::{GraphSpan, Span, Tag, TagValue};
