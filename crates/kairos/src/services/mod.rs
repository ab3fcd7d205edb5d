//! Collaborators the engine talks to but does not own: explanation text,
//! whole-response caching and birth-profile lookup.

pub mod cache;
pub mod explain;
pub mod profiles;

pub use cache::{cache_key, MemoryCache, ResponseCache, DEFAULT_TTL};
pub use explain::{
    attach_explanations, fallback_explanation, quality_tier, Explanation, ExplanationError,
    ExplanationService,
};
pub use profiles::{BirthProfileStore, MemoryProfileStore};
