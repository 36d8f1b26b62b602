pub mod analyzer;
pub mod classify;
pub mod normalize;
pub mod relations;
pub mod segment;

pub use analyzer::DebateAnalyzer;
pub use classify::classify_segment;
pub use normalize::normalize;
pub use relations::infer_relations;
pub use segment::{local_merge, merge_segments};
