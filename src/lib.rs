pub mod audit;
pub mod cache;
pub mod llm;
pub mod outlets;
pub mod scoring;
pub mod serper;
pub mod server;
pub mod types;
pub mod verdict;

pub use audit::Engine;
pub use cache::{fingerprint, AuditCache, CacheStore, CACHE_TTL};
pub use outlets::{build_sources, outlet_name, registrable_domain};
pub use scoring::{adjust_truth_score, build_refined_summary, trust_badge};
pub use types::{
    AuditRecord, BadgeLevel, CacheStatus, CacheTier, ClaimResult, Source, TrustBadge, Verdict,
    VerificationStatus,
};
pub use verdict::{calculate_confidence, calculate_dynamic_confidence, calculate_truth_score};
