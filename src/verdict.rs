use crate::types::{ClaimResult, Verdict, VerificationStatus};

/// Balanced 0-10 truth score from a verdict distribution. Empty input is
/// neutral (5.0) rather than an error so a record with no fact checks still
/// scores.
pub fn calculate_truth_score(verdicts: &[Verdict]) -> f64 {
    if verdicts.is_empty() {
        return 5.0;
    }
    let sum: f64 = verdicts
        .iter()
        .map(|v| match v {
            Verdict::True => 1.0,
            Verdict::Unverified => 0.5,
            Verdict::Misleading => 0.25,
            Verdict::False => 0.0,
        })
        .sum();
    let score = sum / verdicts.len() as f64 * 10.0;
    (score * 10.0).round() / 10.0
}

/// Legacy confidence: share of the claim surface that was checked at all.
/// "verified" counts any verdict other than unverified; "cited" counts
/// claims carrying a citation URL. Kept as a distinct formula; the
/// user-facing number comes from [`calculate_dynamic_confidence`].
pub fn calculate_confidence(total: usize, verified: usize, cited: usize) -> u32 {
    if total == 0 {
        return 50;
    }
    let t = total as f64;
    let confidence = (verified as f64 / t * 0.7 + cited as f64 / t * 0.3) * 100.0;
    confidence.clamp(0.0, 100.0).round() as u32
}

/// Verification-depth confidence, weighted by per-claim status and mapped
/// onto a 40-95 band so even a fully unverified audit reports some floor of
/// confidence in the analysis itself.
pub fn calculate_dynamic_confidence(claims: &[ClaimResult]) -> u32 {
    if claims.is_empty() {
        return 50;
    }
    let weighted: f64 = claims
        .iter()
        .map(|c| match c.verification_status {
            VerificationStatus::Verified => 1.0,
            VerificationStatus::Partial => 0.5,
            VerificationStatus::Unverified => 0.0,
        })
        .sum();
    let ratio = weighted / claims.len() as f64;
    (40.0 + ratio * 55.0).round() as u32
}
