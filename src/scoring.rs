use unicode_segmentation::UnicodeSegmentation;

use crate::types::{AuditRecord, BadgeLevel, TrustBadge, Verdict};
use crate::verdict::calculate_truth_score;

const MANIPULATION_CAP_TRIGGERS: [&str; 3] = ["clickbait", "misleading headline", "sensationalism"];
const SUMMARY_MAX_CHARS: usize = 500;

pub struct ScoreOutcome {
    pub adjusted: f64,
    pub transparency: Vec<String>,
}

fn fmt_score(score: f64) -> String {
    if (score - score.round()).abs() < 1e-9 {
        format!("{}", score.round() as i64)
    } else {
        format!("{score:.1}")
    }
}

fn has_cap_trigger(tactics: &[String]) -> bool {
    tactics.iter().any(|t| {
        let t = t.to_lowercase();
        MANIPULATION_CAP_TRIGGERS.iter().any(|m| t.contains(m))
    })
}

/// Deterministic score adjustment. Pure function of the record: starts from
/// the model's raw score, applies the manipulation cap, the missing-angle,
/// bias and citation penalties, blends in the verdict-based score when fact
/// checks exist, and clamps to [0, 10]. Every step that changes the score
/// appends a line to the transparency trail.
pub fn adjust_truth_score(record: &AuditRecord) -> ScoreOutcome {
    let mut score = record.truth_score_raw;
    let mut trail = vec![format!(
        "Started with base accuracy: {}/10",
        fmt_score(record.truth_score_raw)
    )];

    if has_cap_trigger(&record.manipulation_tactics) && score > 7.0 {
        score = 7.0;
        trail.push("Capped at 7/10: clickbait or sensationalist framing detected".into());
    }

    let angle_penalty = record.missing_angles.len().min(2);
    if angle_penalty > 0 {
        score -= angle_penalty as f64;
        trail.push(format!(
            "-{angle_penalty} for {} missing perspective(s)",
            record.missing_angles.len()
        ));
    }

    let bias_penalty = record.bias_patterns.len().min(3);
    if bias_penalty > 0 {
        score -= bias_penalty as f64;
        trail.push(format!(
            "-{bias_penalty} for {} bias pattern(s)",
            record.bias_patterns.len()
        ));
    }

    match record.citations.len() {
        0 => {
            score -= 2.0;
            trail.push("-2 for citing no sources".into());
        }
        1 | 2 => {
            score -= 1.0;
            trail.push(format!(
                "-1 for citing only {} source(s)",
                record.citations.len()
            ));
        }
        _ => {}
    }

    if !record.fact_check_results.is_empty() {
        let verdicts: Vec<Verdict> = record
            .fact_check_results
            .iter()
            .map(|c| c.verdict)
            .collect();
        let fact_based = calculate_truth_score(&verdicts);
        score = (score + fact_based) / 2.0;
        trail.push(format!(
            "Averaged with fact-check score of {}/10",
            fmt_score(fact_based)
        ));
    }

    let adjusted = score.clamp(0.0, 10.0);
    trail.push(format!("Final truth score: {}/10", fmt_score(adjusted)));
    ScoreOutcome {
        adjusted,
        transparency: trail,
    }
}

/// Coarse reliability classification. Conditions are checked in priority
/// order; the first match wins, so a manipulated article never shows the
/// milder `limited` badge even when both apply.
pub fn trust_badge(record: &AuditRecord, adjusted: f64) -> TrustBadge {
    let suspect_verdicts = record
        .fact_check_results
        .iter()
        .filter(|c| matches!(c.verdict, Verdict::False | Verdict::Misleading))
        .count();

    let level = if !record.manipulation_tactics.is_empty() && (adjusted < 4.0 || suspect_verdicts > 2)
    {
        BadgeLevel::Manipulated
    } else if record.citations.is_empty() || adjusted < 5.0 {
        BadgeLevel::Limited
    } else if record.citations.len() < 3 || adjusted < 7.0 || record.missing_angles.len() > 2 {
        BadgeLevel::Partial
    } else {
        BadgeLevel::Verified
    };
    TrustBadge::from_level(level)
}

fn first_sentences(text: &str, n: usize) -> String {
    text.unicode_sentences()
        .take(n)
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate_chars(s: String, max: usize) -> String {
    if s.chars().count() <= max {
        s
    } else {
        s.chars().take(max).collect()
    }
}

/// Reader-facing summary: the lede of the model's own summary plus warning
/// fragments for each detected problem category and a caution line keyed to
/// the adjusted score. Capped at 500 characters.
pub fn build_refined_summary(record: &AuditRecord, adjusted: f64) -> String {
    let mut parts = Vec::new();

    let lede = first_sentences(&record.summary, 2);
    if !lede.is_empty() {
        parts.push(lede);
    }

    if !record.manipulation_tactics.is_empty() {
        let shown: Vec<&str> = record
            .manipulation_tactics
            .iter()
            .take(2)
            .map(String::as_str)
            .collect();
        parts.push(format!("Watch for {}.", shown.join(", ")));
    }

    if !record.bias_patterns.is_empty() {
        let shown: Vec<&str> = record
            .bias_patterns
            .iter()
            .take(3)
            .map(String::as_str)
            .collect();
        parts.push(format!("Bias detected: {}.", shown.join(", ")));
    }

    if !record.missing_angles.is_empty() {
        let shown: Vec<&str> = record
            .missing_angles
            .iter()
            .take(2)
            .map(String::as_str)
            .collect();
        parts.push(format!("Unexplored angles: {}.", shown.join(", ")));
    }

    if record.citations.is_empty() {
        parts.push("No sources are cited to support these claims.".into());
    }

    if adjusted < 4.0 {
        parts.push("Treat this article with strong caution.".into());
    } else if adjusted < 7.0 {
        parts.push("Verify key claims independently before sharing.".into());
    }

    truncate_chars(parts.join(" "), SUMMARY_MAX_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CacheStatus, CacheTier, ClaimResult, VerificationStatus};

    fn base_record(raw: f64) -> AuditRecord {
        AuditRecord {
            truth_score_raw: raw,
            truth_score_adjusted: raw,
            summary: String::new(),
            bias_patterns: vec![],
            missing_angles: vec![],
            manipulation_tactics: vec![],
            citations: vec![
                "https://a.example/1".into(),
                "https://b.example/2".into(),
                "https://c.example/3".into(),
            ],
            fact_check_results: vec![],
            confidence_level: 0.5,
            trust_badge: TrustBadge::from_level(BadgeLevel::Partial),
            transparency: vec![],
            sources: vec![],
            warnings: vec![],
            cache_status: CacheStatus::Miss,
            cache_source: CacheTier::None,
            processing_time_ms: 0,
        }
    }

    fn claim(verdict: Verdict) -> ClaimResult {
        ClaimResult {
            claim: "c".into(),
            verdict,
            evidence: "https://evidence.example".into(),
            citation: None,
            verification_status: VerificationStatus::Verified,
        }
    }

    #[test]
    fn clean_record_keeps_raw_score() {
        let rec = base_record(8.0);
        let out = adjust_truth_score(&rec);
        assert_eq!(out.adjusted, 8.0);
        assert_eq!(out.transparency.first().unwrap(), "Started with base accuracy: 8/10");
        assert_eq!(out.transparency.last().unwrap(), "Final truth score: 8/10");
        // no penalty lines between start and finish
        assert_eq!(out.transparency.len(), 2);
    }

    #[test]
    fn fractional_raw_score_passes_through_unchanged() {
        // no penalties triggered: the adjusted score is exactly the raw
        // score, not a rounded rendition of it
        let rec = base_record(8.25);
        let out = adjust_truth_score(&rec);
        assert_eq!(out.adjusted, 8.25);
    }

    #[test]
    fn blended_score_keeps_full_precision() {
        let mut rec = base_record(8.0);
        rec.fact_check_results = vec![claim(Verdict::True), claim(Verdict::Unverified)];
        // fact-based score 7.5: (8 + 7.5) / 2 = 7.75, not rounded
        let out = adjust_truth_score(&rec);
        assert_eq!(out.adjusted, 7.75);
    }

    #[test]
    fn manipulation_cap_applies_before_penalties() {
        let mut rec = base_record(9.5);
        rec.manipulation_tactics = vec!["Clickbait headline framing".into()];
        let out = adjust_truth_score(&rec);
        assert_eq!(out.adjusted, 7.0);
        assert!(out
            .transparency
            .iter()
            .any(|l| l.contains("Capped at 7/10")));
    }

    #[test]
    fn missing_angle_penalty_caps_at_two() {
        let mut rec = base_record(9.0);
        rec.missing_angles = vec!["a".into(), "b".into(), "c".into(), "d".into()];
        let out = adjust_truth_score(&rec);
        assert_eq!(out.adjusted, 7.0);
        assert!(out
            .transparency
            .iter()
            .any(|l| l.starts_with("-2 for 4 missing")));
    }

    #[test]
    fn bias_penalty_caps_at_three() {
        let mut rec = base_record(9.0);
        rec.bias_patterns = (0..5).map(|i| format!("bias-{i}")).collect();
        let out = adjust_truth_score(&rec);
        assert_eq!(out.adjusted, 6.0);
    }

    #[test]
    fn citation_penalty_tiers() {
        let mut rec = base_record(8.0);
        rec.citations.clear();
        assert_eq!(adjust_truth_score(&rec).adjusted, 6.0);
        rec.citations = vec!["https://a.example".into()];
        assert_eq!(adjust_truth_score(&rec).adjusted, 7.0);
        rec.citations.push("https://b.example".into());
        assert_eq!(adjust_truth_score(&rec).adjusted, 7.0);
        rec.citations.push("https://c.example".into());
        assert_eq!(adjust_truth_score(&rec).adjusted, 8.0);
    }

    #[test]
    fn verdicts_blend_into_final_score() {
        let mut rec = base_record(8.0);
        rec.fact_check_results = vec![claim(Verdict::False), claim(Verdict::False)];
        // fact-based score 0.0: (8 + 0) / 2 = 4
        let out = adjust_truth_score(&rec);
        assert_eq!(out.adjusted, 4.0);
        assert!(out
            .transparency
            .iter()
            .any(|l| l.contains("Averaged with fact-check score of 0/10")));
    }

    #[test]
    fn score_never_leaves_bounds() {
        let mut rec = base_record(1.0);
        rec.citations.clear();
        rec.bias_patterns = vec!["a".into(); 3];
        rec.missing_angles = vec!["a".into(); 2];
        let out = adjust_truth_score(&rec);
        assert_eq!(out.adjusted, 0.0);
    }

    #[test]
    fn adjustment_is_deterministic() {
        let mut rec = base_record(6.2);
        rec.bias_patterns = vec!["loaded language".into()];
        rec.fact_check_results = vec![claim(Verdict::True), claim(Verdict::Misleading)];
        let a = adjust_truth_score(&rec);
        let b = adjust_truth_score(&rec);
        assert_eq!(a.adjusted, b.adjusted);
        assert_eq!(a.transparency, b.transparency);
        assert_eq!(trust_badge(&rec, a.adjusted), trust_badge(&rec, b.adjusted));
        assert_eq!(
            build_refined_summary(&rec, a.adjusted),
            build_refined_summary(&rec, b.adjusted)
        );
    }

    #[test]
    fn manipulated_badge_wins_over_limited() {
        let mut rec = base_record(3.0);
        rec.manipulation_tactics = vec!["fear appeal".into()];
        rec.citations.clear();
        rec.fact_check_results = vec![
            claim(Verdict::False),
            claim(Verdict::False),
            claim(Verdict::False),
        ];
        let badge = trust_badge(&rec, 3.0);
        assert_eq!(badge.level, BadgeLevel::Manipulated);
    }

    #[test]
    fn limited_badge_on_no_citations() {
        let mut rec = base_record(8.0);
        rec.citations.clear();
        assert_eq!(trust_badge(&rec, 8.0).level, BadgeLevel::Limited);
    }

    #[test]
    fn partial_badge_on_few_citations() {
        let mut rec = base_record(8.0);
        rec.citations.truncate(2);
        assert_eq!(trust_badge(&rec, 8.0).level, BadgeLevel::Partial);
    }

    #[test]
    fn verified_badge_needs_everything() {
        let rec = base_record(8.0);
        assert_eq!(trust_badge(&rec, 8.0).level, BadgeLevel::Verified);
    }

    #[test]
    fn manipulation_tactics_alone_do_not_disqualify() {
        let mut rec = base_record(8.0);
        rec.manipulation_tactics = vec!["emotional framing".into()];
        // high score, no suspect verdicts: falls through to verified
        assert_eq!(trust_badge(&rec, 8.0).level, BadgeLevel::Verified);
    }

    #[test]
    fn summary_takes_first_two_sentences() {
        let mut rec = base_record(8.0);
        rec.summary = "One. Two. Three. Four.".into();
        let s = build_refined_summary(&rec, 8.0);
        assert!(s.contains("One."));
        assert!(s.contains("Two."));
        assert!(!s.contains("Three."));
    }

    #[test]
    fn summary_flags_each_problem_category() {
        let mut rec = base_record(5.0);
        rec.summary = "An article.".into();
        rec.manipulation_tactics = vec!["fear appeal".into()];
        rec.bias_patterns = vec!["cherry picking".into()];
        rec.missing_angles = vec!["economic impact".into()];
        rec.citations.clear();
        let s = build_refined_summary(&rec, 5.0);
        assert!(s.contains("Watch for fear appeal."));
        assert!(s.contains("Bias detected: cherry picking."));
        assert!(s.contains("Unexplored angles: economic impact."));
        assert!(s.contains("No sources are cited"));
        assert!(s.contains("Verify key claims independently"));
    }

    #[test]
    fn summary_strong_caution_below_four() {
        let mut rec = base_record(3.0);
        rec.summary = "An article.".into();
        let s = build_refined_summary(&rec, 3.0);
        assert!(s.contains("strong caution"));
    }

    #[test]
    fn summary_truncates_to_500_chars() {
        let mut rec = base_record(8.0);
        rec.summary = "word ".repeat(300);
        let s = build_refined_summary(&rec, 8.0);
        assert!(s.chars().count() <= 500);
    }
}
