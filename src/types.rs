use serde::{Deserialize, Serialize};

/// Outcome of fact-checking a single claim. Provider output is untrusted:
/// anything that is not exactly true/false/misleading is coerced to
/// `Unverified` before scoring (see [`Verdict::normalize`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    True,
    False,
    Misleading,
    Unverified,
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Verdict::normalize(&raw))
    }
}

impl Verdict {
    pub fn normalize(raw: &str) -> Verdict {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Verdict::True,
            "false" => Verdict::False,
            "misleading" => Verdict::Misleading,
            _ => Verdict::Unverified,
        }
    }
}

/// How deeply a single claim was verified, derived from its verdict and
/// whether the evidence points at an external source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Verified,
    Partial,
    Unverified,
}

impl VerificationStatus {
    pub fn derive(verdict: Verdict, citation: Option<&str>, evidence: &str) -> Self {
        let has_source = citation.is_some() || evidence.contains("http");
        match verdict {
            Verdict::True | Verdict::False if has_source => VerificationStatus::Verified,
            Verdict::Misleading => VerificationStatus::Partial,
            Verdict::Unverified if has_source => VerificationStatus::Partial,
            _ => VerificationStatus::Unverified,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResult {
    pub claim: String,
    pub verdict: Verdict,
    pub evidence: String,
    #[serde(default)]
    pub citation: Option<String>,
    pub verification_status: VerificationStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeLevel {
    Verified,
    Partial,
    Limited,
    Manipulated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustBadge {
    pub level: BadgeLevel,
    pub label: String,
    pub description: String,
}

impl TrustBadge {
    pub fn from_level(level: BadgeLevel) -> Self {
        let (label, description) = match level {
            BadgeLevel::Verified => (
                "Verified",
                "Well-sourced reporting with no significant manipulation detected.",
            ),
            BadgeLevel::Partial => (
                "Partially Verified",
                "Reasonably sourced but with notable gaps or bias patterns.",
            ),
            BadgeLevel::Limited => (
                "Limited Reliability",
                "Few or no sources cited; treat the claims with caution.",
            ),
            BadgeLevel::Manipulated => (
                "Manipulation Detected",
                "Manipulative techniques combined with unreliable claims.",
            ),
        };
        TrustBadge {
            level,
            label: label.to_string(),
            description: description.to_string(),
        }
    }
}

/// Whether a request was served from cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    Hit,
    #[default]
    Miss,
}

/// Which cache tier served the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheTier {
    Primary,
    Fallback,
    #[default]
    None,
}

/// A citation rendered for display: one entry per registrable domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
    pub outlet: String,
}

/// The canonical analysis result. `truth_score_raw` is the model's own
/// number and is never mutated; `truth_score_adjusted`, the badge, the
/// confidence level and the transparency trail are all recomputed
/// deterministically from the rest of the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub truth_score_raw: f64,
    pub truth_score_adjusted: f64,
    pub summary: String,
    pub bias_patterns: Vec<String>,
    pub missing_angles: Vec<String>,
    pub manipulation_tactics: Vec<String>,
    pub citations: Vec<String>,
    pub fact_check_results: Vec<ClaimResult>,
    /// 0.0..=1.0, derived from the per-claim verification statuses.
    pub confidence_level: f64,
    pub trust_badge: TrustBadge,
    pub transparency: Vec<String>,
    pub sources: Vec<Source>,
    pub warnings: Vec<String>,
    #[serde(default)]
    pub cache_status: CacheStatus,
    #[serde(default)]
    pub cache_source: CacheTier,
    #[serde(default)]
    pub processing_time_ms: u64,
}

/// Raw audit JSON as produced by the model. Every field is optional on the
/// wire; missing pieces fall back to neutral defaults so a degraded provider
/// response still scores.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAudit {
    pub truth_score: f64,
    pub summary: String,
    pub bias_patterns: Vec<String>,
    pub missing_angles: Vec<String>,
    pub manipulation_tactics: Vec<String>,
    pub citations: Vec<String>,
    pub fact_check_results: Vec<RawClaim>,
}

impl Default for RawAudit {
    fn default() -> Self {
        RawAudit {
            truth_score: 5.0,
            summary: String::new(),
            bias_patterns: Vec::new(),
            missing_angles: Vec::new(),
            manipulation_tactics: Vec::new(),
            citations: Vec::new(),
            fact_check_results: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawClaim {
    pub claim: String,
    pub verdict: String,
    pub evidence: String,
    pub citation: Option<String>,
}

impl RawClaim {
    /// Normalize the untrusted verdict string and derive the verification
    /// status in one step.
    pub fn into_claim_result(self) -> ClaimResult {
        let verdict = Verdict::normalize(&self.verdict);
        let status = VerificationStatus::derive(verdict, self.citation.as_deref(), &self.evidence);
        ClaimResult {
            claim: self.claim,
            verdict,
            evidence: self.evidence,
            citation: self.citation,
            verification_status: status,
        }
    }
}
