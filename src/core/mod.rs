// Screening pipeline
pub mod analytics;
pub mod experience;
pub mod extractor;
pub mod normalizer;
pub mod ranker;
pub mod scoring;
pub mod screener;
pub mod vocabulary;

pub use analytics::aggregate;
pub use extractor::Extractor;
pub use normalizer::{normalize, NormalizedText, Section};
pub use ranker::{compare_results, rank};
pub use scoring::{DimensionScorer, EducationDimension, ExperienceDimension, Scorer, SkillsDimension};
pub use screener::{BatchOptions, BatchOutcome, Evaluation, Screener};
pub use vocabulary::{SectionKind, Vocabulary};
