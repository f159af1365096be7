// The lock guard returned by `AppState::update` is intentionally dropped at once
// where the handler does not need it.
#![allow(let_underscore_lock)]

use std::sync::{Mutex, MutexGuard, PoisonError};

use actix_files::Files;
use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::http::StatusCode;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, ResponseError, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::display::render_schedule;
use crate::error::SchedulerError;
use crate::export::export_schedule_csv;
use crate::import::{apply_requests, load_requests};
use crate::planner::Planner;
use crate::schedule::{
    Availability, Day, EditSession, EmployeeId, Move, Roster, Slot, StaffingCap, WeekSchedule,
};
use crate::storage::Store;
use crate::week::Week;

const EDIT_SESSION_KEY: &str = "edit_session";

pub struct AppState {
    planner: Mutex<Planner>,
    store: Store,
}

impl AppState {
    pub fn new(planner: Planner, store: Store) -> Self {
        AppState { planner: Mutex::new(planner), store }
    }

    fn planner(&self) -> MutexGuard<'_, Planner> {
        self.planner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `change` on a copy of the planner and swaps the copy in only
    /// after it is saved, so a failed write leaves the live state as it was.
    /// Returns the change's result and the lock on the updated planner.
    fn update<T>(
        &self,
        change: impl FnOnce(&mut Planner) -> std::result::Result<T, SchedulerError>,
    ) -> std::result::Result<(T, MutexGuard<'_, Planner>), SchedulerError> {
        let mut planner = self.planner();
        let mut next = planner.clone();
        let value = change(&mut next)?;
        if let Err(e) = self.store.save_planner(&next) {
            warn!(error = %e, "save failed, change discarded");
            return Err(e);
        }
        *planner = next;
        Ok((value, planner))
    }
}

impl ResponseError for SchedulerError {
    fn status_code(&self) -> StatusCode {
        match self {
            SchedulerError::CapacityExceeded { .. } => StatusCode::CONFLICT,
            SchedulerError::UnknownDay(_)
            | SchedulerError::HourOutOfRange(_)
            | SchedulerError::WeekOutOfRange
            | SchedulerError::Csv(_) => StatusCode::BAD_REQUEST,
            SchedulerError::EmployeeNotFound(_) => StatusCode::NOT_FOUND,
            SchedulerError::UnsupportedVersion { .. }
            | SchedulerError::Io(_)
            | SchedulerError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "code": self.code(),
            "error": self.to_string(),
        }))
    }
}

#[derive(Deserialize)]
pub struct AddEmployeeRequest {
    name: String,
}

#[derive(Deserialize)]
pub struct SelectEmployeeRequest {
    employee_id: EmployeeId,
}

#[derive(Deserialize)]
pub struct ToggleRequest {
    day: Day,
    hour: u8,
}

#[derive(Deserialize)]
pub struct MaxStaffRequest {
    max_staff_per_slot: u32,
}

#[derive(Deserialize)]
pub struct WeekQuery {
    date: Option<NaiveDate>,
    offset: Option<i64>,
}

#[derive(Serialize)]
pub struct StateResponse<'a> {
    employees: &'a Roster,
    availability: &'a Availability,
    schedule: &'a WeekSchedule,
    max_staff_per_slot: u32,
    session: EditSession,
}

fn edit_session(session: &Session) -> EditSession {
    session
        .get::<EditSession>(EDIT_SESSION_KEY)
        .ok()
        .flatten()
        .unwrap_or_default()
}

fn current_week(query: &WeekQuery) -> std::result::Result<Week, SchedulerError> {
    let date = query.date.unwrap_or_else(|| Local::now().date_naive());
    Week::containing(date)?.offset(query.offset.unwrap_or(0))
}

async fn get_state(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    let planner = state.planner();
    Ok(HttpResponse::Ok().json(StateResponse {
        employees: planner.roster(),
        availability: planner.availability(),
        schedule: planner.schedule(),
        max_staff_per_slot: planner.cap().value(),
        session: edit_session(&session),
    }))
}

async fn add_employee(
    req: web::Json<AddEmployeeRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (added, _) = state.update(|planner| Ok(planner.add_employee(&req.name)))?;
    match added {
        Some(id) => Ok(HttpResponse::Created().json(serde_json::json!({"success": true, "id": id}))),
        None => Ok(HttpResponse::Ok().json(serde_json::json!({"success": false, "id": null}))),
    }
}

async fn remove_employee(
    path: web::Path<EmployeeId>,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let (employee, _) = state.update(|planner| {
        planner
            .remove_employee(id)
            .ok_or(SchedulerError::EmployeeNotFound(id))
    })?;

    if edit_session(&session).allows(id) {
        session.insert(EDIT_SESSION_KEY, EditSession::Idle)?;
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "removed": employee})))
}

async fn get_session(session: Session) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(edit_session(&session)))
}

async fn select_employee(
    req: web::Json<SelectEmployeeRequest>,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse> {
    if !state.planner().roster().contains(req.employee_id) {
        return Err(SchedulerError::EmployeeNotFound(req.employee_id).into());
    }
    let mut edit = edit_session(&session);
    edit.select(req.employee_id);
    session.insert(EDIT_SESSION_KEY, edit)?;
    Ok(HttpResponse::Ok().json(edit))
}

async fn save_session(session: Session) -> Result<HttpResponse> {
    let mut edit = edit_session(&session);
    edit.save();
    session.insert(EDIT_SESSION_KEY, edit)?;
    Ok(HttpResponse::Ok().json(edit))
}

async fn toggle_availability(
    req: web::Json<ToggleRequest>,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse> {
    let edit = edit_session(&session);
    let Some(id) = edit.editing() else {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "No employee selected for editing"
        })));
    };

    Slot::new(req.day, req.hour)?;
    let (available, _) = state.update(|planner| {
        planner
            .toggle_availability(&edit, id, req.day, req.hour)
            .ok_or(SchedulerError::EmployeeNotFound(id))
    })?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "employee_id": id,
        "day": req.day,
        "hour": req.hour,
        "available": available,
    })))
}

async fn generate(state: web::Data<AppState>) -> Result<HttpResponse> {
    let (_, planner) = state.update(|planner| {
        planner.generate();
        Ok(())
    })?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "schedule": planner.schedule(),
        "stats": planner.stats(),
    })))
}

async fn move_assignment(req: web::Json<Move>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let (outcome, planner) = state.update(|planner| planner.move_assignment(&req))?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "outcome": outcome,
        "schedule": planner.schedule(),
    })))
}

async fn remove_assignment(path: web::Path<EmployeeId>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let id = path.into_inner();
    let (removed, _) = state.update(|planner| Ok(planner.remove_assignment(id)))?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "removed_slots": removed})))
}

async fn reset_data(state: web::Data<AppState>) -> Result<HttpResponse> {
    state.update(|planner| {
        planner.reset();
        Ok(())
    })?;
    warn!("all schedule and availability data reset");
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
}

async fn set_max_staff(req: web::Json<MaxStaffRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut planner = state.planner();
    planner.set_cap(StaffingCap::new(req.max_staff_per_slot));
    info!(max_staff_per_slot = req.max_staff_per_slot, "staffing cap changed");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "max_staff_per_slot": planner.cap().value(),
    })))
}

async fn get_stats(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.planner().stats()))
}

async fn get_week(query: web::Query<WeekQuery>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(current_week(&query)?.view()))
}

async fn export_csv(state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut body = Vec::new();
    export_schedule_csv(&state.planner(), &mut body)?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(("Content-Disposition", "attachment; filename=\"shift_schedule.csv\""))
        .body(body))
}

async fn export_text(query: web::Query<WeekQuery>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let week = current_week(&query)?;
    let text = render_schedule(&state.planner(), Some(&week))?;
    Ok(HttpResponse::Ok().content_type("text/plain; charset=utf-8").body(text))
}

async fn import_requests(body: web::Bytes, state: web::Data<AppState>) -> Result<HttpResponse> {
    let requests = load_requests(&body[..])?;
    let (summary, _) = state.update(|planner| Ok(apply_requests(planner, &requests)))?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "summary": summary})))
}

/// Registers the JSON API.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/state", web::get().to(get_state))
        .route("/api/employees", web::post().to(add_employee))
        .route("/api/employees/{id}", web::delete().to(remove_employee))
        .route("/api/session", web::get().to(get_session))
        .route("/api/session/select", web::post().to(select_employee))
        .route("/api/session/save", web::post().to(save_session))
        .route("/api/availability/toggle", web::post().to(toggle_availability))
        .route("/api/schedule/generate", web::post().to(generate))
        .route("/api/schedule/move", web::post().to(move_assignment))
        .route("/api/schedule/employees/{id}", web::delete().to(remove_assignment))
        .route("/api/reset", web::post().to(reset_data))
        .route("/api/config/max-staff", web::put().to(set_max_staff))
        .route("/api/stats", web::get().to(get_stats))
        .route("/api/week", web::get().to(get_week))
        .route("/api/export/csv", web::get().to(export_csv))
        .route("/api/export/text", web::get().to(export_text))
        .route("/api/import", web::post().to(import_requests));
}

/// Cookie-backed storage for each browser's edit session.
pub fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(false)
        .build()
}

pub async fn start_server(config: &Config, planner: Planner) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(planner, config.store()));
    let key = Key::generate();
    let static_dir = config.static_dir.clone();

    info!(bind = %config.bind, port = config.port, "starting web server");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(session_middleware(key.clone()))
            .wrap(middleware::Logger::default())
            .configure(configure)
            .service(Files::new("/", &static_dir).index_file("index.html"))
    })
    .bind((config.bind.as_str(), config.port))?
    .run()
    .await
}
