//! Domain DTOs for the spy cat agency API.
//!
//! # Design
//! These types mirror the backend's JSON schema but are defined
//! independently of the mock-server crate; integration tests catch schema
//! drift between the two. The client never transforms them beyond serde.

use serde::{Deserialize, Serialize};

/// A spy cat personnel record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpyCat {
    pub id: i64,
    pub name: String,
    pub years_of_experience: u32,
    pub breed: String,
    pub salary: f64,
}

/// Request payload for recruiting a new spy cat. The breed is checked by
/// the backend against its own breed list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateSpyCat {
    pub name: String,
    pub years_of_experience: u32,
    pub breed: String,
    pub salary: f64,
}

/// Salary is the only field that can change after creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct UpdateSpyCat {
    pub salary: f64,
}

/// A sub-task of a mission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Target {
    pub id: i64,
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub notes: String,
    pub complete: bool,
    pub mission_id: i64,
}

impl Target {
    /// Notes and completion can change until the target or its mission is
    /// complete.
    pub fn is_editable(&self, mission_complete: bool) -> bool {
        !self.complete && !mission_complete
    }
}

/// Target payload nested in `CreateMission`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTarget {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub notes: String,
}

impl CreateTarget {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Partial target update. Only the fields present in the JSON are applied;
/// omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTarget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
}

/// A mission and its ordered targets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mission {
    pub id: i64,
    #[serde(default)]
    pub cat_id: Option<i64>,
    pub complete: bool,
    pub created_at: String,
    #[serde(default)]
    pub targets: Vec<Target>,
    /// Some backends embed the assigned cat; others leave the join to the
    /// caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cat: Option<SpyCat>,
}

impl Mission {
    pub fn is_assigned(&self) -> bool {
        self.cat_id.is_some()
    }

    /// An unassigned mission may be deleted; the backend refuses otherwise.
    pub fn can_delete(&self) -> bool {
        !self.is_assigned()
    }

    pub fn completed_targets(&self) -> usize {
        self.targets.iter().filter(|t| t.complete).count()
    }
}

/// Request payload for creating a mission together with its targets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateMission {
    pub targets: Vec<CreateTarget>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignMission {
    pub cat_id: i64,
}

/// Outcome of the health probe.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub is_healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            is_healthy: true,
            error: None,
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            is_healthy: false,
            error: Some(error.into()),
        }
    }
}
