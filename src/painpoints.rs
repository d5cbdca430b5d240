//! Painpoint resolution: reported symptoms → initial intents

use crate::config::PainpointDictionary;
use crate::types::*;
use tracing::{debug, warn};

/// Output of the painpoint stage
#[derive(Debug, Clone, Default)]
pub struct PainpointResolution {
    pub intents: IntentSet,
    pub applied: Vec<String>,
    pub audit: Vec<String>,
}

/// Map painpoints to intents with priority `severity × weight`, capped per painpoint.
///
/// Several painpoints can feed the same intent; the highest capped value wins and
/// only a strict increase records the contributing painpoint's modifier.
pub fn resolve(painpoints: &[PainpointInput], dictionary: &PainpointDictionary) -> PainpointResolution {
    let mut resolution = PainpointResolution::default();

    for painpoint in painpoints {
        let Some(entry) = dictionary.get(&painpoint.id) else {
            warn!("Unknown painpoint '{}' skipped", painpoint.id);
            resolution
                .audit
                .push(format!("[WARN] Unknown painpoint: {}", painpoint.id));
            continue;
        };

        let modifier_key = format!("painpoint:{}", painpoint.id);

        for (intent_id, weight) in &entry.mapped_intents {
            let raw = f64::from(painpoint.severity) * weight;
            let capped = raw.min(entry.max_priority_cap);

            match resolution.intents.get_mut(intent_id) {
                Some(existing) => {
                    if capped > existing.priority {
                        existing.set_priority(capped);
                        existing.applied_modifiers.insert(modifier_key.clone(), *weight);
                        debug!("{} raised to {:.2} by {}", intent_id, existing.priority, painpoint.id);
                        resolution.audit.push(format!(
                            "[MERGE] {}: updated priority to {:.2} from {}",
                            intent_id, existing.priority, painpoint.id
                        ));
                    }
                }
                None => {
                    let mut intent = Intent::new(intent_id.clone(), capped, IntentSource::Painpoint)
                        .with_cap(entry.max_priority_cap);
                    intent.set_priority(capped);
                    intent.applied_modifiers.insert(modifier_key.clone(), *weight);
                    debug!("{} created at {:.2} from {}", intent_id, intent.priority, painpoint.id);
                    resolution.audit.push(format!(
                        "[NEW] {}: priority={:.2} from {}",
                        intent_id, intent.priority, painpoint.id
                    ));
                    let _ = resolution.intents.insert(intent);
                }
            }
        }

        resolution.applied.push(painpoint.id.clone());
    }

    resolution
}
