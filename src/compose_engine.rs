//! Core ComposeEngine sequencing the intent pipeline

use crate::blood;
use crate::config::ComposeConfig;
use crate::goals;
use crate::lifestyle;
use crate::painpoints;
use crate::types::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Main compose engine (thread-safe via Arc)
///
/// Holds only read-only configuration; each `compose` call builds its own
/// intent set, so concurrent calls never share mutable state.
pub struct ComposeEngine {
    config: Arc<ComposeConfig>,
}

pub type SharedComposeEngine = Arc<ComposeEngine>;

impl ComposeEngine {
    pub fn new(config: Arc<ComposeConfig>) -> SharedComposeEngine {
        Arc::new(Self { config })
    }

    pub fn config(&self) -> &ComposeConfig {
        &self.config
    }

    /// Main entry point: painpoints → goals → lifestyle → blood → sorted result
    pub fn compose(&self, req: ComposeRequest) -> ComposeResult {
        let ComposeRequest {
            painpoints,
            lifestyle,
            goal_intents,
            blood_blocks,
        } = req;

        info!(
            "Composing intents: painpoints={}, goals={}, lifestyle={}, blood_blocks={}",
            painpoints.as_ref().map_or(0, |p| p.len()),
            goal_intents.as_ref().map_or(0, |g| g.len()),
            lifestyle.is_some(),
            blood_blocks.is_some()
        );

        let mut audit_log = Vec::new();
        let mut painpoints_applied = Vec::new();
        let mut lifestyle_rules_applied = Vec::new();
        let mut confidence_adjustments = BTreeMap::new();

        // Step 1: Painpoints create intents
        let mut intents = match painpoints {
            Some(painpoints) if !painpoints.is_empty() => {
                let resolution = painpoints::resolve(&painpoints, &self.config.painpoints);
                painpoints_applied = resolution.applied;
                audit_log.extend(resolution.audit);
                resolution.intents
            }
            _ => IntentSet::new(),
        };

        // Step 2: Goals merge in, higher priority wins
        if let Some(goal_intents) = goal_intents {
            if !goal_intents.is_empty() {
                audit_log.extend(goals::merge(&mut intents, goal_intents));
            }
        }

        // Step 3: Lifestyle adjusts what exists
        if let Some(lifestyle) = lifestyle.as_ref() {
            if !intents.is_empty() {
                let outcome = lifestyle::apply(&mut intents, lifestyle, &self.config.lifestyle);
                lifestyle_rules_applied = outcome.applied_rules;
                confidence_adjustments = outcome.confidence_adjustments;
                audit_log.extend(outcome.audit);
            } else {
                debug!("No intents to modulate; lifestyle stage skipped");
            }
        }

        // Step 4: Blood constraints override everything
        let enforcement = blood::enforce(intents, blood_blocks.as_ref());
        audit_log.extend(enforcement.audit);
        let mut final_intents = enforcement.intents;

        // Step 5: Stable sort, ties keep pipeline order
        final_intents.sort_by(|a, b| b.priority.total_cmp(&a.priority));

        info!(
            "Compose complete: {} intents, {} painpoints applied, {} lifestyle rules fired",
            final_intents.len(),
            painpoints_applied.len(),
            lifestyle_rules_applied.len()
        );

        ComposeResult {
            intents: final_intents,
            painpoints_applied,
            lifestyle_rules_applied,
            confidence_adjustments,
            audit_log,
        }
    }
}
