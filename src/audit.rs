use std::sync::Arc;
use std::time::Instant;

use anyhow::{ensure, Result};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs,
};
use futures::{stream, StreamExt};
use tracing::{info, warn};

use crate::cache::{fingerprint, AuditCache};
use crate::llm::Llm;
use crate::outlets::build_sources;
use crate::scoring::{adjust_truth_score, build_refined_summary, trust_badge};
use crate::serper::Searcher;
use crate::types::{
    AuditRecord, BadgeLevel, CacheStatus, CacheTier, ClaimResult, RawAudit, TrustBadge,
    VerificationStatus,
};
use crate::verdict::calculate_dynamic_confidence;

const MIN_CONTENT_CHARS: usize = 300;

fn build_audit_prompt(content: &str) -> Vec<ChatCompletionRequestMessage> {
    let sys = ChatCompletionRequestSystemMessageArgs::default()
        .content(
            "You are a rigorous media auditor. Analyze the article for factual \
             accuracy, bias techniques, and manipulation tactics. Respond with \
             JSON only: {\"truthScore\": 0-10, \"summary\": \"...\", \
             \"biasPatterns\": [\"...\"], \"missingAngles\": [\"...\"], \
             \"manipulationTactics\": [\"...\"], \"citations\": [\"url\", ...], \
             \"factCheckResults\": [{\"claim\": \"...\", \"verdict\": \
             \"true\"|\"false\"|\"misleading\"|\"unverified\", \"evidence\": \
             \"...\", \"citation\": \"url or null\"}]}",
        )
        .build()
        .unwrap()
        .into();
    let usr = ChatCompletionRequestUserMessageArgs::default()
        .content(format!("Article:\n{content}\n\nReturn the audit JSON."))
        .build()
        .unwrap()
        .into();
    vec![sys, usr]
}

/// Providers return prose around the JSON often enough that we slice out the
/// outermost object before parsing; anything undecodable degrades to the
/// neutral default rather than failing the audit.
fn parse_raw_audit(text: &str) -> RawAudit {
    let body = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    };
    serde_json::from_str(body).unwrap_or_default()
}

/// The request pipeline: fingerprint -> cache lookup -> on miss, one LLM
/// audit call plus citation searches -> deterministic scoring -> cache
/// write. All provenance stamping happens here, never in the scoring layer.
pub struct Engine {
    pub llm: Arc<dyn Llm>,
    pub searcher: Option<Arc<dyn Searcher>>,
    pub cache: Arc<AuditCache>,
    pub search_concurrency: usize,
}

impl Engine {
    pub async fn audit(&self, content: &str, submitted_url: Option<&str>) -> Result<AuditRecord> {
        let started = Instant::now();
        let trimmed = content.trim();
        ensure!(!trimmed.is_empty(), "no article content provided");

        let key = fingerprint(content);
        let (cached, tier) = self.cache.get(&key).await;
        if let Some(mut record) = cached {
            info!(%key, ?tier, "serving cached audit");
            // sources depend on who asked: the submitted URL may differ from
            // the one cached with the record
            record.sources = build_sources(&record.citations, submitted_url);
            record.cache_status = CacheStatus::Hit;
            record.cache_source = tier;
            record.processing_time_ms = started.elapsed().as_millis() as u64;
            return Ok(record);
        }

        let mut warnings = Vec::new();
        if trimmed.chars().count() < MIN_CONTENT_CHARS {
            warnings.push("Content is very short; the analysis may be unreliable".to_string());
        }

        let outputs = self.llm.chat_many(vec![build_audit_prompt(trimmed)]).await?;
        let raw = parse_raw_audit(outputs.first().map(String::as_str).unwrap_or(""));

        let mut claims: Vec<ClaimResult> = raw
            .fact_check_results
            .into_iter()
            .map(|c| c.into_claim_result())
            .collect();
        let mut citations = raw.citations;

        if let Some(searcher) = &self.searcher {
            self.attach_citations(searcher.as_ref(), &mut claims, &mut warnings)
                .await;
        }
        for claim in &claims {
            if let Some(c) = &claim.citation {
                if !citations.contains(c) {
                    citations.push(c.clone());
                }
            }
        }

        let mut record = AuditRecord {
            truth_score_raw: raw.truth_score.clamp(0.0, 10.0),
            truth_score_adjusted: 0.0,
            summary: raw.summary,
            bias_patterns: raw.bias_patterns,
            missing_angles: raw.missing_angles,
            manipulation_tactics: raw.manipulation_tactics,
            citations,
            fact_check_results: claims,
            confidence_level: 0.0,
            trust_badge: TrustBadge::from_level(BadgeLevel::Limited),
            transparency: vec![],
            sources: vec![],
            warnings,
            cache_status: CacheStatus::Miss,
            cache_source: CacheTier::None,
            processing_time_ms: 0,
        };

        let outcome = adjust_truth_score(&record);
        record.trust_badge = trust_badge(&record, outcome.adjusted);
        record.summary = build_refined_summary(&record, outcome.adjusted);
        record.truth_score_adjusted = outcome.adjusted;
        record.transparency = outcome.transparency;
        record.confidence_level =
            calculate_dynamic_confidence(&record.fact_check_results) as f64 / 100.0;
        record.sources = build_sources(&record.citations, submitted_url);

        if let Err(err) = self.cache.set(&key, &record).await {
            warn!(%key, error = %err, "failed to cache audit result");
        }

        record.processing_time_ms = started.elapsed().as_millis() as u64;
        Ok(record)
    }

    /// Fan out one search per uncited claim and attach the top hit. A failed
    /// search degrades to a warning; the audit still completes.
    async fn attach_citations(
        &self,
        searcher: &dyn Searcher,
        claims: &mut [ClaimResult],
        warnings: &mut Vec<String>,
    ) {
        let queries: Vec<(usize, String)> = claims
            .iter()
            .enumerate()
            .filter(|(_, c)| c.citation.is_none())
            .map(|(i, c)| (i, c.claim.clone()))
            .collect();
        if queries.is_empty() {
            return;
        }

        let results = stream::iter(queries.into_iter().map(|(i, q)| async move {
            (i, searcher.search(&q).await)
        }))
        .buffer_unordered(self.search_concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

        let mut search_failed = false;
        for (i, result) in results {
            match result {
                Ok(hits) => {
                    if let Some(top) = hits.first() {
                        let claim = &mut claims[i];
                        claim.citation = Some(top.link.clone());
                        claim.verification_status = VerificationStatus::derive(
                            claim.verdict,
                            claim.citation.as_deref(),
                            &claim.evidence,
                        );
                    }
                }
                Err(err) => {
                    warn!(error = %err, "citation search failed");
                    search_failed = true;
                }
            }
        }
        if search_failed {
            warnings.push("Citation search unavailable".to_string());
        }
    }
}
