pub mod change;
pub mod config;
pub mod section;
pub mod similarity;
pub mod sort_key;

pub use change::{ChangeRecord, ChangeSubtype, ChangeType, MatchKind, MatchPair, NumericDelta};
pub use config::CompareConfig;
pub use section::Section;
pub use similarity::{SemanticBackend, SimilarityResult};
pub use sort_key::normalize_identifier;
