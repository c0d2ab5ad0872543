//! Catalog search: query planning, candidate gathering and the fallback ladder

pub mod fallback;
pub mod orchestrator;
pub mod planner;

pub use fallback::{default_tiers, FallbackTier, TierContext};
pub use orchestrator::{select_track, CandidateSearchOrchestrator};
pub use planner::{plan, plan_with_policy, Priority, SearchStrategy, SubsetPolicy};
