//! JSON-lines protocol for the planning service.
//!
//! One JSON object per line in each direction. Requests are tagged by
//! `cmd`, responses by `type`.
//!
//! # Example Session
//!
//! ```text
//! -> {"cmd":"ping"}
//! <- {"type":"pong","version":"1.0"}
//! -> {"cmd":"next_action","building_levels":{"lumberjack":1},"resources":{"wood":120}}
//! <- {"type":"next_action","action":{"type":"building","kind":"lumberjack","from_level":1,"to_level":2},"token":"building:lumberjack:2"}
//! -> {"cmd":"solve","building_levels":{...},"target_levels":{"keep":3}}
//! <- {"type":"solution","total_time_seconds":5400,"strategy":"W+1/Q+0","timeline":[...],...}
//! -> {"cmd":"oops"}
//! <- {"type":"error","message":"unknown variant `oops`, ..."}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use castle_core::prelude::{BuildingKind, CastleConfig, NextAction, TimelineEntry, UnmetTarget};

use crate::optimizer::UnitsRecommendation;

/// Protocol version reported by `pong`.
pub const PROTOCOL_VERSION: &str = "1.0";

// ============================================================================
// Requests (client -> service)
// ============================================================================

/// A castle snapshot plus optional targets.
///
/// Buildings missing from `building_levels` count as level 1; resources
/// missing from `resources` use the default stock. Empty `target_levels`
/// means the default castle targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveRequest {
    /// Current level per building name.
    pub building_levels: BTreeMap<String, u32>,
    /// Current stock per resource name.
    pub resources: BTreeMap<String, f64>,
    /// Technologies already researched.
    pub researched_technologies: Vec<String>,
    /// Units already owned, by unit name.
    pub army: BTreeMap<String, u32>,
    /// Population already consumed.
    pub food_used: u32,
    /// Wanted level per building name.
    pub target_levels: BTreeMap<String, u32>,
}

impl SolveRequest {
    /// The equivalent configuration, with unlisted buildings at level 1.
    pub fn to_config(&self) -> CastleConfig {
        let mut building_levels = self.building_levels.clone();
        for kind in BuildingKind::ALL {
            building_levels.entry(kind.name().to_string()).or_insert(1);
        }
        CastleConfig {
            building_levels,
            resources: self.resources.clone(),
            researched_technologies: self.researched_technologies.clone(),
            army: self.army.clone(),
            food_used: self.food_used,
            targets: (!self.target_levels.is_empty()).then(|| self.target_levels.clone()),
            ..CastleConfig::default()
        }
    }
}

/// Commands accepted by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Request {
    /// Solve and return the full plan.
    Solve(SolveRequest),
    /// Solve and return only the first action.
    NextAction(SolveRequest),
    /// Liveness check.
    Ping,
}

impl Request {
    /// Parse from a JSON line.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Command name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Solve(_) => "solve",
            Self::NextAction(_) => "next_action",
            Self::Ping => "ping",
        }
    }
}

// ============================================================================
// Responses (service -> client)
// ============================================================================

/// A solved plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResponse {
    /// Time until every queue is idle.
    pub total_time_seconds: u64,
    /// Winning strategy, e.g. `W+2/Q+1`.
    pub strategy: String,
    /// Building, research and training actions sorted by start.
    pub timeline: Vec<TimelineEntry>,
    /// The first action to take.
    pub next_action: NextAction,
    /// Whether every target is reachable.
    pub completed: bool,
    /// Targets the plan cannot reach.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmet_targets: Vec<UnmetTarget>,
    /// Suggested army once no building upgrades remain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units_recommendation: Option<UnitsRecommendation>,
}

/// Responses sent by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Full plan.
    Solution(SolveResponse),
    /// First action only.
    NextAction {
        /// The action.
        action: NextAction,
        /// The action as a single token, e.g. `research:Masonry`.
        token: String,
    },
    /// Reply to `ping`.
    Pong {
        /// Protocol version.
        version: String,
    },
    /// The request could not be served.
    Error {
        /// What went wrong.
        message: String,
    },
}

impl Response {
    /// Create a pong response.
    pub fn pong() -> Self {
        Self::Pong {
            version: PROTOCOL_VERSION.to_string(),
        }
    }

    /// Create an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Create a next-action response.
    pub fn next_action(action: NextAction) -> Self {
        Self::NextAction {
            token: action.to_string(),
            action,
        }
    }

    /// Serialize to a JSON line (with newline).
    pub fn to_json_line(&self) -> String {
        let mut json = serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"type":"error","message":"serialization failed: {e}"}}"#)
        });
        json.push('\n');
        json
    }
}
