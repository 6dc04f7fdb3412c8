//! In-memory rendition of the spy cat agency backend.
//!
//! Implements every endpoint the client consumes, with the backend's
//! business rules and its `{"detail": ...}` error bodies, so the client can
//! be exercised end-to-end without the real service.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

/// Breeds the backend recognises; matching is case-insensitive.
pub const KNOWN_BREEDS: &[&str] = &[
    "Abyssinian",
    "Bengal",
    "British Shorthair",
    "Maine Coon",
    "Persian",
    "Ragdoll",
    "Russian Blue",
    "Scottish Fold",
    "Siamese",
    "Sphynx",
];

pub const MAX_TARGETS: usize = 3;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SpyCat {
    pub id: i64,
    pub name: String,
    pub years_of_experience: u32,
    pub breed: String,
    pub salary: f64,
}

#[derive(Deserialize)]
pub struct CreateSpyCat {
    pub name: String,
    pub years_of_experience: u32,
    pub breed: String,
    pub salary: f64,
}

#[derive(Deserialize)]
pub struct UpdateSpyCat {
    pub salary: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Target {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub notes: String,
    pub complete: bool,
    pub mission_id: i64,
}

#[derive(Deserialize)]
pub struct CreateTarget {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTarget {
    pub notes: Option<String>,
    pub complete: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Mission {
    pub id: i64,
    pub cat_id: Option<i64>,
    pub complete: bool,
    pub created_at: String,
    pub targets: Vec<Target>,
    pub cat: Option<SpyCat>,
}

#[derive(Deserialize)]
pub struct CreateMission {
    pub targets: Vec<CreateTarget>,
}

#[derive(Deserialize)]
pub struct AssignMission {
    pub cat_id: i64,
}

#[derive(Clone, Debug)]
struct MissionRow {
    id: i64,
    cat_id: Option<i64>,
    complete: bool,
    created_at: String,
    targets: Vec<Target>,
}

#[derive(Default)]
pub struct Store {
    cats: BTreeMap<i64, SpyCat>,
    missions: BTreeMap<i64, MissionRow>,
    next_cat_id: i64,
    next_mission_id: i64,
    next_target_id: i64,
}

impl Store {
    fn has_active_mission(&self, cat_id: i64) -> bool {
        self.missions
            .values()
            .any(|m| m.cat_id == Some(cat_id) && !m.complete)
    }

    fn render(&self, row: &MissionRow) -> Mission {
        Mission {
            id: row.id,
            cat_id: row.cat_id,
            complete: row.complete,
            created_at: row.created_at.clone(),
            targets: row.targets.clone(),
            cat: row.cat_id.and_then(|id| self.cats.get(&id).cloned()),
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Error body in the backend's shape: `{"detail": ...}`.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    detail: Value,
}

impl AppError {
    fn not_found(what: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: Value::String(format!("{what} not found")),
        }
    }

    fn bad_request(detail: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: Value::String(detail.to_string()),
        }
    }

    fn invalid_field(field: &str, msg: &str) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: json!([{ "loc": ["body", field], "msg": msg, "type": "value_error" }]),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/cats/", get(list_cats).post(create_cat))
        .route("/cats/{id}", get(get_cat).put(update_cat).delete(delete_cat))
        .route("/missions/", get(list_missions).post(create_mission))
        .route("/missions/{id}", get(get_mission).delete(delete_mission))
        .route("/missions/{id}/assign", put(assign_mission))
        .route("/targets/{id}", put(update_target))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn is_known_breed(breed: &str) -> bool {
    KNOWN_BREEDS.iter().any(|known| known.eq_ignore_ascii_case(breed.trim()))
}

// --- cats ---

async fn list_cats(State(db): State<Db>) -> Json<Vec<SpyCat>> {
    let store = db.read().await;
    Json(store.cats.values().cloned().collect())
}

async fn create_cat(
    State(db): State<Db>,
    Json(input): Json<CreateSpyCat>,
) -> Result<(StatusCode, Json<SpyCat>), AppError> {
    if !is_known_breed(&input.breed) {
        return Err(AppError::bad_request(
            "Invalid cat breed. Please use a recognised breed name.",
        ));
    }
    if !(input.salary.is_finite() && input.salary >= 0.0) {
        return Err(AppError::invalid_field("salary", "salary must be non-negative"));
    }

    let mut store = db.write().await;
    store.next_cat_id += 1;
    let cat = SpyCat {
        id: store.next_cat_id,
        name: input.name,
        years_of_experience: input.years_of_experience,
        breed: input.breed,
        salary: input.salary,
    };
    store.cats.insert(cat.id, cat.clone());
    info!(id = cat.id, name = %cat.name, "cat recruited");
    Ok((StatusCode::CREATED, Json(cat)))
}

async fn get_cat(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<SpyCat>, AppError> {
    let store = db.read().await;
    store
        .cats
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found("Spy cat"))
}

async fn update_cat(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateSpyCat>,
) -> Result<Json<SpyCat>, AppError> {
    if !(input.salary.is_finite() && input.salary >= 0.0) {
        return Err(AppError::invalid_field("salary", "salary must be non-negative"));
    }
    let mut store = db.write().await;
    let cat = store
        .cats
        .get_mut(&id)
        .ok_or_else(|| AppError::not_found("Spy cat"))?;
    cat.salary = input.salary;
    Ok(Json(cat.clone()))
}

async fn delete_cat(State(db): State<Db>, Path(id): Path<i64>) -> Result<StatusCode, AppError> {
    let mut store = db.write().await;
    if !store.cats.contains_key(&id) {
        return Err(AppError::not_found("Spy cat"));
    }
    if store.has_active_mission(id) {
        return Err(AppError::bad_request("Cannot delete cat with active missions"));
    }
    store.cats.remove(&id);
    info!(id, "cat retired");
    Ok(StatusCode::NO_CONTENT)
}

// --- missions ---

async fn list_missions(State(db): State<Db>) -> Json<Vec<Mission>> {
    let store = db.read().await;
    Json(store.missions.values().map(|row| store.render(row)).collect())
}

async fn create_mission(
    State(db): State<Db>,
    Json(input): Json<CreateMission>,
) -> Result<(StatusCode, Json<Mission>), AppError> {
    if input.targets.is_empty() || input.targets.len() > MAX_TARGETS {
        return Err(AppError::invalid_field(
            "targets",
            "Mission must have between 1 and 3 targets",
        ));
    }

    let mut store = db.write().await;
    store.next_mission_id += 1;
    let mission_id = store.next_mission_id;
    let mut targets = Vec::with_capacity(input.targets.len());
    for target in input.targets {
        store.next_target_id += 1;
        targets.push(Target {
            id: store.next_target_id,
            name: target.name,
            country: target.country,
            notes: target.notes.unwrap_or_default(),
            complete: false,
            mission_id,
        });
    }
    let row = MissionRow {
        id: mission_id,
        cat_id: None,
        complete: false,
        created_at: chrono::Utc::now()
            .naive_utc()
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string(),
        targets,
    };
    let mission = store.render(&row);
    store.missions.insert(mission_id, row);
    info!(id = mission_id, targets = mission.targets.len(), "mission created");
    Ok((StatusCode::CREATED, Json(mission)))
}

async fn get_mission(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Mission>, AppError> {
    let store = db.read().await;
    let row = store
        .missions
        .get(&id)
        .ok_or_else(|| AppError::not_found("Mission"))?;
    Ok(Json(store.render(row)))
}

async fn assign_mission(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<AssignMission>,
) -> Result<Json<Mission>, AppError> {
    let mut store = db.write().await;
    if !store.missions.contains_key(&id) {
        return Err(AppError::not_found("Mission"));
    }
    if !store.cats.contains_key(&input.cat_id) {
        return Err(AppError::not_found("Spy cat"));
    }
    if store.has_active_mission(input.cat_id) {
        return Err(AppError::bad_request("Cat already has an active mission"));
    }
    let row = store
        .missions
        .get_mut(&id)
        .ok_or_else(|| AppError::not_found("Mission"))?;
    row.cat_id = Some(input.cat_id);
    let row = row.clone();
    info!(mission = id, cat = input.cat_id, "mission assigned");
    Ok(Json(store.render(&row)))
}

async fn delete_mission(State(db): State<Db>, Path(id): Path<i64>) -> Result<StatusCode, AppError> {
    let mut store = db.write().await;
    let row = store
        .missions
        .get(&id)
        .ok_or_else(|| AppError::not_found("Mission"))?;
    if row.cat_id.is_some() {
        return Err(AppError::bad_request(
            "Cannot delete mission that is assigned to a cat",
        ));
    }
    store.missions.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

// --- targets ---

async fn update_target(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTarget>,
) -> Result<Json<Target>, AppError> {
    let mut store = db.write().await;
    let mission = store
        .missions
        .values_mut()
        .find(|m| m.targets.iter().any(|t| t.id == id))
        .ok_or_else(|| AppError::not_found("Target"))?;
    let mission_complete = mission.complete;
    let target = mission
        .targets
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| AppError::not_found("Target"))?;

    if target.complete || mission_complete {
        return Err(AppError::bad_request(
            "Cannot update completed target or target in completed mission",
        ));
    }
    if let Some(notes) = input.notes {
        target.notes = notes;
    }
    if let Some(complete) = input.complete {
        target.complete = complete;
    }
    let updated = target.clone();

    if mission.targets.iter().all(|t| t.complete) {
        mission.complete = true;
        info!(mission = mission.id, "mission complete");
    }
    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breed_check_ignores_case_and_padding() {
        assert!(is_known_breed("siamese"));
        assert!(is_known_breed(" Maine Coon "));
        assert!(!is_known_breed("Tiger"));
    }

    #[test]
    fn error_body_uses_detail_key() {
        let err = AppError::not_found("Spy cat");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.detail, "Spy cat not found");
    }

    #[test]
    fn field_errors_use_validation_list_shape() {
        let err = AppError::invalid_field("targets", "Mission must have between 1 and 3 targets");
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.detail[0]["loc"][1], "targets");
        assert_eq!(err.detail[0]["msg"], "Mission must have between 1 and 3 targets");
    }

    #[test]
    fn create_target_notes_are_optional() {
        let input: CreateTarget = serde_json::from_str(r#"{"name":"Vault","country":"CH"}"#).unwrap();
        assert!(input.notes.is_none());
    }

    #[test]
    fn active_mission_blocks_only_incomplete_assignments() {
        let mut store = Store::default();
        store.missions.insert(
            1,
            MissionRow {
                id: 1,
                cat_id: Some(7),
                complete: true,
                created_at: String::new(),
                targets: Vec::new(),
            },
        );
        assert!(!store.has_active_mission(7));
        store.missions.insert(
            2,
            MissionRow {
                id: 2,
                cat_id: Some(7),
                complete: false,
                created_at: String::new(),
                targets: Vec::new(),
            },
        );
        assert!(store.has_active_mission(7));
    }
}
