//! Intent Composer - supplement intent composition engine
//!
//! Merges user inputs into one prioritized, auditable intent list:
//! - Painpoints create intents (severity × weight, capped)
//! - Goals merge in with "higher priority wins"
//! - Lifestyle rules modulate existing intents only
//! - Blood constraints block or force intents and always win

pub mod types;
pub mod config;
pub mod painpoints;
pub mod goals;
pub mod lifestyle;
pub mod blood;
pub mod compose_engine;
pub mod server;

pub use types::*;
pub use config::{ComposeConfig, ConfigError, ServiceConfig};
pub use compose_engine::{ComposeEngine, SharedComposeEngine};
pub use blood::{ConstraintType, RoutingConstraint};
pub use goals::parse_goals;
