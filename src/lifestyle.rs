//! Lifestyle modulation: rule-driven priority adjustments on existing intents
//!
//! Rules run in ruleset order against the request-time questionnaire. A matching
//! rule scales the priority of intents it names and, when it carries a confidence
//! penalty, lowers confidence on every intent currently in the set. Lifestyle
//! answers can never introduce an intent that earlier stages did not produce.

use crate::config::{Condition, ConditionBounds, LifestyleRuleset};
use crate::types::*;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Questionnaire fields addressable from rule conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifestyleField {
    SleepHours,
    SleepQuality,
    StressLevel,
    ActivityLevel,
    CaffeineIntake,
    AlcoholIntake,
    WorkSchedule,
    MealsPerDay,
    SugarIntake,
    Smoking,
}

/// Field name → accessor
const FIELD_TABLE: &[(&str, LifestyleField)] = &[
    ("sleep_hours", LifestyleField::SleepHours),
    ("sleep_quality", LifestyleField::SleepQuality),
    ("stress_level", LifestyleField::StressLevel),
    ("activity_level", LifestyleField::ActivityLevel),
    ("caffeine_intake", LifestyleField::CaffeineIntake),
    ("alcohol_intake", LifestyleField::AlcoholIntake),
    ("work_schedule", LifestyleField::WorkSchedule),
    ("meals_per_day", LifestyleField::MealsPerDay),
    ("sugar_intake", LifestyleField::SugarIntake),
    ("smoking", LifestyleField::Smoking),
];

/// A questionnaire answer as seen by rule conditions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(&'static str),
    Flag(bool),
}

impl LifestyleField {
    pub fn from_name(name: &str) -> Option<Self> {
        FIELD_TABLE
            .iter()
            .find(|(field_name, _)| *field_name == name)
            .map(|(_, field)| *field)
    }

    pub fn read(&self, lifestyle: &LifestyleInput) -> FieldValue {
        match self {
            Self::SleepHours => FieldValue::Number(lifestyle.sleep_hours),
            Self::SleepQuality => FieldValue::Number(lifestyle.sleep_quality as f64),
            Self::StressLevel => FieldValue::Number(lifestyle.stress_level as f64),
            Self::ActivityLevel => FieldValue::Text(lifestyle.activity_level.as_str()),
            Self::CaffeineIntake => FieldValue::Text(lifestyle.caffeine_intake.as_str()),
            Self::AlcoholIntake => FieldValue::Text(lifestyle.alcohol_intake.as_str()),
            Self::WorkSchedule => FieldValue::Text(lifestyle.work_schedule.as_str()),
            Self::MealsPerDay => FieldValue::Number(lifestyle.meals_per_day as f64),
            Self::SugarIntake => FieldValue::Text(lifestyle.sugar_intake.as_str()),
            Self::Smoking => FieldValue::Flag(lifestyle.smoking),
        }
    }
}

impl FieldValue {
    /// Exact match against a JSON literal; mismatched types never match
    fn matches(&self, expected: &Value) -> bool {
        match (self, expected) {
            (FieldValue::Number(actual), Value::Number(number)) => {
                number.as_f64().map_or(false, |n| *actual == n)
            }
            (FieldValue::Text(actual), Value::String(text)) => *actual == text.as_str(),
            (FieldValue::Flag(actual), Value::Bool(flag)) => actual == flag,
            _ => false,
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            _ => None,
        }
    }
}

fn bounds_hold(value: FieldValue, bounds: &ConditionBounds) -> bool {
    if let Some(min) = bounds.min {
        match value.as_number() {
            Some(number) if number >= min => {}
            _ => return false,
        }
    }
    if let Some(max) = bounds.max {
        match value.as_number() {
            Some(number) if number <= max => {}
            _ => return false,
        }
    }
    if let Some(expected) = &bounds.equals {
        if !value.matches(expected) {
            return false;
        }
    }
    true
}

/// True when every condition holds. Unknown fields fail the match.
pub fn conditions_match(conditions: &[(String, Condition)], lifestyle: &LifestyleInput) -> bool {
    conditions.iter().all(|(field_name, condition)| {
        let Some(field) = LifestyleField::from_name(field_name) else {
            debug!("Condition references unknown lifestyle field '{}'", field_name);
            return false;
        };
        let value = field.read(lifestyle);
        match condition {
            Condition::Literal(expected) => value.matches(expected),
            Condition::Bounds(bounds) => bounds_hold(value, bounds),
        }
    })
}

/// Output of the lifestyle stage; the intent set itself is modified in place
#[derive(Debug, Clone, Default)]
pub struct LifestyleOutcome {
    pub applied_rules: Vec<String>,
    pub confidence_adjustments: BTreeMap<String, f64>, // summed penalty per intent
    pub audit: Vec<String>,
}

/// Apply the ruleset to the intents already present.
///
/// Only `get_mut`/`iter_mut` touch the set here, so its id population is fixed
/// for the whole pass.
pub fn apply(
    intents: &mut IntentSet,
    lifestyle: &LifestyleInput,
    ruleset: &LifestyleRuleset,
) -> LifestyleOutcome {
    let mut outcome = LifestyleOutcome::default();
    let constraints = &ruleset.global_constraints;

    for rule in &ruleset.rules {
        if !conditions_match(&rule.input_conditions, lifestyle) {
            continue;
        }

        debug!("Lifestyle rule '{}' matched", rule.id);
        outcome.applied_rules.push(rule.id.clone());

        for (intent_id, raw_modifier) in &rule.effects.intent_modifiers {
            let modifier = constraints.clamp_modifier(*raw_modifier);

            let Some(intent) = intents.get_mut(intent_id) else {
                warn!("Rule '{}' targets missing intent '{}'; skipped", rule.id, intent_id);
                outcome.audit.push(format!(
                    "[SKIP] Cannot modify {} - intent does not exist (lifestyle cannot create intents)",
                    intent_id
                ));
                continue;
            };

            let before = intent.priority;
            intent.set_priority(before * (1.0 + modifier));
            intent
                .applied_modifiers
                .insert(format!("lifestyle:{}", rule.id), modifier);

            outcome.audit.push(format!(
                "[MOD] {}: {:.2} → {:.2} (rule: {}, modifier: {:+.2})",
                intent_id, before, intent.priority, rule.id, modifier
            ));
        }

        let penalty = rule.effects.confidence_penalty;
        if penalty > 0.0 {
            for intent in intents.iter_mut() {
                intent.apply_confidence_penalty(penalty);
                *outcome
                    .confidence_adjustments
                    .entry(intent.id.clone())
                    .or_insert(0.0) += penalty;
            }
            outcome.audit.push(format!(
                "[CONF] Applied {:.1}% confidence penalty from {}",
                penalty * 100.0,
                rule.id
            ));
        }
    }

    outcome
}
