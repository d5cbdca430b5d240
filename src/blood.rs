//! Blood constraint enforcement and routing-constraint conversion

use crate::types::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Kind of directive bloodwork routing produced for an ingredient class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintType {
    Blocked,
    Caution,
    Required,
}

/// One routing constraint emitted by the bloodwork orchestration step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingConstraint {
    pub ingredient_class: String,
    pub constraint_type: ConstraintType,
    #[serde(default)]
    pub reason: Option<String>,
}

const INGREDIENT_INTENTS: &[(&str, &[&str])] = &[
    ("iron", &["iron_supplementation", "nutritional_support"]),
    ("potassium", &["electrolyte_balance"]),
    ("magnesium", &["magnesium_support", "stress_management"]),
    ("calcium", &["calcium_supplementation", "bone_health"]),
    ("vitamin_d_high", &["high_dose_vitamin_d"]),
    ("iodine", &["thyroid_support"]),
    ("hepatotoxic", &["liver_support"]),
    ("kava", &["relaxation_techniques"]),
    ("high_dose_niacin", &["cholesterol_support"]),
    ("green_tea_extract_high", &["weight_management"]),
    ("protein_supplements", &["protein_supplementation"]),
    ("high_glycemic", &["energy_boost"]),
    ("blood_sugar_support", &["blood_sugar_management"]),
    ("immune_stimulants", &["immune_support"]),
];

/// Intents affected by an ingredient class; unmapped classes stand for themselves
pub fn intents_for_ingredient(ingredient_class: &str) -> Vec<String> {
    INGREDIENT_INTENTS
        .iter()
        .find(|(class, _)| *class == ingredient_class)
        .map(|(_, intents)| intents.iter().map(|id| id.to_string()).collect())
        .unwrap_or_else(|| vec![ingredient_class.to_string()])
}

fn push_unique(target: &mut Vec<String>, ids: Vec<String>) {
    for id in ids {
        if !target.contains(&id) {
            target.push(id);
        }
    }
}

impl BloodBlocks {
    pub fn from_routing_constraints(constraints: &[RoutingConstraint]) -> Self {
        let mut blocks = BloodBlocks::default();
        for constraint in constraints {
            let intents = intents_for_ingredient(&constraint.ingredient_class);
            match constraint.constraint_type {
                ConstraintType::Blocked => push_unique(&mut blocks.blocked_intents, intents),
                ConstraintType::Required => push_unique(&mut blocks.required_intents, intents),
                ConstraintType::Caution => push_unique(&mut blocks.caution_intents, intents),
            }
        }
        blocks
    }

    /// Union another set of directives into this one, keeping first-seen order
    pub fn extend(&mut self, other: BloodBlocks) {
        push_unique(&mut self.blocked_intents, other.blocked_intents);
        push_unique(&mut self.required_intents, other.required_intents);
        push_unique(&mut self.caution_intents, other.caution_intents);
    }
}

/// Output of the blood stage
#[derive(Debug, Clone, Default)]
pub struct BloodEnforcement {
    pub intents: Vec<Intent>,
    pub audit: Vec<String>,
}

/// Apply block/require directives. Block is checked first, so an id present in
/// both lists is removed.
pub fn enforce(intents: IntentSet, blood_blocks: Option<&BloodBlocks>) -> BloodEnforcement {
    let blocks = match blood_blocks {
        Some(blocks) if !blocks.is_empty() => blocks,
        _ => {
            return BloodEnforcement {
                intents: intents.into_vec(),
                audit: Vec::new(),
            }
        }
    };

    let mut enforcement = BloodEnforcement::default();

    for mut intent in intents.into_vec() {
        if blocks.is_blocked(&intent.id) {
            info!("Blood constraint removed intent '{}'", intent.id);
            enforcement
                .audit
                .push(format!("[BLOCK] {}: removed by blood constraint", intent.id));
            continue;
        }

        if blocks.is_required(&intent.id) {
            intent.priority = intent.bounded(intent.max_priority_cap);
            intent.source = IntentSource::Blood;
            debug!("Blood constraint forced '{}' to {:.2}", intent.id, intent.priority);
            enforcement.audit.push(format!(
                "[FORCE] {}: priority maxed by blood requirement",
                intent.id
            ));
        }

        enforcement.intents.push(intent);
    }

    enforcement
}
