//! Goal handling: free-form goal strings and the "higher priority wins" merge

use crate::types::*;
use tracing::debug;

const KNOWN_GOAL_CAP: f64 = 0.9;
const FREEFORM_GOAL_PRIORITY: f64 = 0.5;
const FREEFORM_GOAL_CAP: f64 = 0.8;

/// Goal keyword → (intent id, base priority)
const GOAL_INTENTS: &[(&str, &str, f64)] = &[
    ("energy", "increase_energy", 0.7),
    ("sleep", "improve_sleep", 0.7),
    ("stress", "stress_management", 0.7),
    ("focus", "cognitive_support", 0.7),
    ("weight_loss", "weight_management", 0.7),
    ("muscle", "muscle_support", 0.7),
    ("recovery", "recovery_support", 0.7),
    ("immunity", "immune_support", 0.6),
    ("longevity", "longevity_support", 0.6),
    ("heart", "cardiovascular_health", 0.6),
    ("gut", "gut_health_support", 0.6),
    ("skin", "skin_health", 0.5),
    ("hair", "nutritional_support", 0.5),
];

/// Turn user goal strings into goal intents.
///
/// Unrecognized goals still produce an intent, keyed by the normalized goal text,
/// at a lower base priority and cap.
pub fn parse_goals(goals: &[String]) -> Vec<Intent> {
    goals
        .iter()
        .filter_map(|goal| {
            let normalized = goal.trim().to_lowercase();
            if normalized.is_empty() {
                return None;
            }

            let intent = match GOAL_INTENTS.iter().find(|(key, _, _)| *key == normalized) {
                Some((_, intent_id, priority)) => {
                    Intent::new(*intent_id, *priority, IntentSource::Goal).with_cap(KNOWN_GOAL_CAP)
                }
                None => Intent::new(
                    normalized.replace(' ', "_"),
                    FREEFORM_GOAL_PRIORITY,
                    IntentSource::Goal,
                )
                .with_cap(FREEFORM_GOAL_CAP),
            };
            Some(intent)
        })
        .collect()
}

/// Merge goal intents into the accumulated set and return the audit lines.
///
/// New ids are inserted; for existing ids only the numeric priority is replaced,
/// and only when the goal's is strictly higher.
pub fn merge(intents: &mut IntentSet, goal_intents: Vec<Intent>) -> Vec<String> {
    let mut audit = Vec::new();

    for mut goal in goal_intents {
        match intents.get_mut(&goal.id) {
            Some(existing) => {
                if goal.priority > existing.priority {
                    let before = existing.priority;
                    existing.set_priority(goal.priority);
                    if existing.priority > before {
                        debug!("{} raised by goal to {:.2}", goal.id, existing.priority);
                        audit.push(format!("[MERGE] {}: goal priority wins", goal.id));
                    }
                }
            }
            None => {
                let requested = goal.priority;
                goal.set_priority(requested);
                debug!("{} added from goal at {:.2}", goal.id, goal.priority);
                audit.push(format!("[NEW] {}: from goal", goal.id));
                let _ = intents.insert(goal);
            }
        }
    }

    audit
}
