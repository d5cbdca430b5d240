//! Core type definitions for intent composition

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One user-reported symptom category with its severity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PainpointInput {
    pub id: String,
    pub severity: u8, // 1-3, clamped at the request boundary
}

impl PainpointInput {
    pub fn new(id: impl Into<String>, severity: u8) -> Self {
        Self {
            id: id.into(),
            severity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    High,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

/// Shared scale for caffeine and alcohol answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeLevel {
    None,
    Low,
    Medium,
    High,
}

impl IntakeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkSchedule {
    Day,
    Night,
    Rotating,
}

impl WorkSchedule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Night => "night",
            Self::Rotating => "rotating",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SugarIntake {
    Low,
    Medium,
    High,
}

impl SugarIntake {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Lifestyle questionnaire answers.
///
/// Missing fields deserialize to neutral answers so partially filled
/// questionnaires still reach the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifestyleInput {
    #[serde(default = "default_sleep_hours")]
    pub sleep_hours: f64,
    #[serde(default = "default_sleep_quality")]
    pub sleep_quality: i64, // 1-10
    #[serde(default = "default_stress_level")]
    pub stress_level: i64, // 1-10
    #[serde(default = "default_activity_level")]
    pub activity_level: ActivityLevel,
    #[serde(default = "default_caffeine_intake")]
    pub caffeine_intake: IntakeLevel,
    #[serde(default = "default_alcohol_intake")]
    pub alcohol_intake: IntakeLevel,
    #[serde(default = "default_work_schedule")]
    pub work_schedule: WorkSchedule,
    #[serde(default = "default_meals_per_day")]
    pub meals_per_day: i64,
    #[serde(default = "default_sugar_intake")]
    pub sugar_intake: SugarIntake,
    #[serde(default)]
    pub smoking: bool,
}

fn default_sleep_hours() -> f64 {
    7.0
}

fn default_sleep_quality() -> i64 {
    7
}

fn default_stress_level() -> i64 {
    5
}

fn default_activity_level() -> ActivityLevel {
    ActivityLevel::Moderate
}

fn default_caffeine_intake() -> IntakeLevel {
    IntakeLevel::Low
}

fn default_alcohol_intake() -> IntakeLevel {
    IntakeLevel::None
}

fn default_work_schedule() -> WorkSchedule {
    WorkSchedule::Day
}

fn default_meals_per_day() -> i64 {
    3
}

fn default_sugar_intake() -> SugarIntake {
    SugarIntake::Low
}

impl Default for LifestyleInput {
    fn default() -> Self {
        Self {
            sleep_hours: default_sleep_hours(),
            sleep_quality: default_sleep_quality(),
            stress_level: default_stress_level(),
            activity_level: default_activity_level(),
            caffeine_intake: default_caffeine_intake(),
            alcohol_intake: default_alcohol_intake(),
            work_schedule: default_work_schedule(),
            meals_per_day: default_meals_per_day(),
            sugar_intake: default_sugar_intake(),
            smoking: false,
        }
    }
}

/// Stage that last established an intent's origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentSource {
    Painpoint,
    Goal,
    Blood,
}

impl IntentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Painpoint => "painpoint",
            Self::Goal => "goal",
            Self::Blood => "blood",
        }
    }
}

/// Candidate recommendation category carried through the compose pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub id: String,
    pub priority: f64,
    #[serde(default = "default_source")]
    pub source: IntentSource,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default = "default_cap")]
    pub max_priority_cap: f64,
    #[serde(default)]
    pub applied_modifiers: BTreeMap<String, f64>, // "painpoint:{id}" / "lifestyle:{rule}"
}

fn default_source() -> IntentSource {
    IntentSource::Goal
}

fn default_confidence() -> f64 {
    1.0
}

fn default_cap() -> f64 {
    1.0
}

impl Intent {
    pub fn new(id: impl Into<String>, priority: f64, source: IntentSource) -> Self {
        Self {
            id: id.into(),
            priority,
            source,
            confidence: default_confidence(),
            max_priority_cap: default_cap(),
            applied_modifiers: BTreeMap::new(),
        }
    }

    pub fn with_cap(mut self, max_priority_cap: f64) -> Self {
        self.max_priority_cap = max_priority_cap;
        self
    }

    /// Clamp a candidate priority into `[0, max_priority_cap]`
    pub fn bounded(&self, priority: f64) -> f64 {
        if priority.is_nan() {
            return 0.0;
        }
        priority.max(0.0).min(self.max_priority_cap.max(0.0))
    }

    pub fn set_priority(&mut self, priority: f64) {
        self.priority = self.bounded(priority);
    }

    /// Multiplicative penalty; confidence never rises and never leaves [0, 1]
    pub fn apply_confidence_penalty(&mut self, penalty: f64) {
        self.confidence = (self.confidence * (1.0 - penalty)).clamp(0.0, 1.0);
    }
}

/// Insertion-ordered collection of intents keyed by id.
///
/// Iteration order is the order ids were first inserted, which is what the
/// final stable sort falls back to on priority ties.
#[derive(Debug, Clone, Default)]
pub struct IntentSet {
    intents: Vec<Intent>,
    index: HashMap<String, usize>,
}

impl IntentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Intent> {
        self.index.get(id).map(|&idx| &self.intents[idx])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Intent> {
        match self.index.get(id) {
            Some(&idx) => Some(&mut self.intents[idx]),
            None => None,
        }
    }

    /// Insert a new intent. Returns the intent back if its id is already taken.
    pub fn insert(&mut self, intent: Intent) -> Result<(), Intent> {
        if self.index.contains_key(&intent.id) {
            return Err(intent);
        }
        self.index.insert(intent.id.clone(), self.intents.len());
        self.intents.push(intent);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Intent> {
        self.intents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Intent> {
        self.intents.iter_mut()
    }

    pub fn ids(&self) -> Vec<String> {
        self.intents.iter().map(|intent| intent.id.clone()).collect()
    }

    pub fn into_vec(self) -> Vec<Intent> {
        self.intents
    }
}

impl FromIterator<Intent> for IntentSet {
    /// Later duplicates of an id are dropped.
    fn from_iter<T: IntoIterator<Item = Intent>>(iter: T) -> Self {
        let mut set = IntentSet::new();
        for intent in iter {
            let _ = set.insert(intent);
        }
        set
    }
}

/// Bloodwork-derived directives with absolute precedence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodBlocks {
    #[serde(default)]
    pub blocked_intents: Vec<String>,
    #[serde(default)]
    pub required_intents: Vec<String>,
    #[serde(default)]
    pub caution_intents: Vec<String>, // informational, not enforced
}

impl BloodBlocks {
    pub fn is_empty(&self) -> bool {
        self.blocked_intents.is_empty() && self.required_intents.is_empty()
    }

    pub fn is_blocked(&self, id: &str) -> bool {
        self.blocked_intents.iter().any(|blocked| blocked == id)
    }

    pub fn is_required(&self, id: &str) -> bool {
        self.required_intents.iter().any(|required| required == id)
    }
}

/// Request to run the compose pipeline
#[derive(Debug, Clone, Default)]
pub struct ComposeRequest {
    pub painpoints: Option<Vec<PainpointInput>>,
    pub lifestyle: Option<LifestyleInput>,
    pub goal_intents: Option<Vec<Intent>>,
    pub blood_blocks: Option<BloodBlocks>,
}

/// Immutable output of one compose run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposeResult {
    pub intents: Vec<Intent>, // priority descending
    pub painpoints_applied: Vec<String>,
    pub lifestyle_rules_applied: Vec<String>,
    pub confidence_adjustments: BTreeMap<String, f64>,
    pub audit_log: Vec<String>,
}

impl ComposeResult {
    pub fn intent(&self, id: &str) -> Option<&Intent> {
        self.intents.iter().find(|intent| intent.id == id)
    }
}
