//! Request extractors that reject with JSON error bodies.

pub mod validated_json;
pub mod validated_path;

pub use validated_json::ValidatedJson;
pub use validated_path::ValidatedPath;
