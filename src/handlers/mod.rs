pub mod bookings;
pub mod health;
pub mod stations;
pub mod users;
pub mod vehicles;

use std::future::Future;
use std::sync::Arc;

use axum::http::{header, HeaderMap, Method};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::errors::ApiError;
use crate::services::cycle::LoadCycle;
use crate::services::ApiContext;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/bookings", get(bookings::list_bookings))
        .route("/api/bookings/mine", get(bookings::my_bookings))
        .route("/api/bookings/:id", get(bookings::get_booking))
        .route("/api/bookings/:id/confirm", post(bookings::confirm_booking))
        .route("/api/bookings/:id/complete", post(bookings::complete_booking))
        .route("/api/bookings/:id/deny", post(bookings::deny_booking))
        .route("/api/bookings/:id/cancel", post(bookings::cancel_booking))
        .route("/api/stations", get(stations::list_stations))
        .route("/api/stations/staff", get(stations::stations_with_staff))
        .route("/api/stations/:id", get(stations::get_station))
        .route("/api/stations/:id/bookings", get(stations::station_bookings))
        .route("/api/stations/:id/fleet", get(stations::station_fleet))
        .route("/api/stations/:id/vehicles", get(stations::station_vehicles))
        .route(
            "/api/stations/:id/vehicles/available",
            get(stations::available_vehicles),
        )
        .route(
            "/api/stations/:id/staff/:staff_id",
            post(stations::assign_staff),
        )
        .route("/api/staff/:staff_id/station", delete(stations::unassign_staff))
        .route(
            "/api/vehicles",
            get(vehicles::list_vehicles).post(vehicles::create_vehicle),
        )
        .route(
            "/api/vehicles/:id",
            get(vehicles::get_vehicle).delete(vehicles::delete_vehicle),
        )
        .route("/api/vehicles/:id/restore", post(vehicles::restore_vehicle))
        .route("/api/vehicles/:id/battery", put(vehicles::update_battery))
        .route("/api/vehicles/:id/status", put(vehicles::update_status))
        .route("/api/vehicles/:id/description", put(vehicles::update_description))
        .route("/api/vehicles/:id/transfer", post(vehicles::transfer_vehicle))
        .route("/api/users", get(users::list_users))
        .route("/api/users/:id", get(users::get_user))
        .route(
            "/api/users/:id/staff-role",
            post(users::assign_staff_role).delete(users::remove_staff_role),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs one view load cycle: fetch, normalize and enrich inside `load`, then
/// commit. The work runs on its own task so that a dropped request cancels
/// the cycle and the late result is discarded instead of half-applied.
pub(crate) async fn load_cycle<T, F, Fut>(
    state: &AppState,
    headers: &HeaderMap,
    load: F,
) -> Result<Json<T>, ApiError>
where
    F: FnOnce(ApiContext) -> Fut,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    T: Send + 'static,
{
    let ctx = state.context(headers);
    let cycle = LoadCycle::new();
    let guard = cycle.guard();

    let work = load(ctx);
    let task = tokio::spawn(async move {
        let value = work.await?;
        cycle.commit(value)
    });

    let outcome = task.await;
    guard.disarm();
    match outcome {
        Ok(result) => result.map(Json),
        Err(e) => {
            tracing::error!(error = %e, "load cycle task failed");
            Err(ApiError::Unknown {
                status: 500,
                message: e.to_string(),
            })
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }

    pub fn page_size(&self, config: &AppConfig) -> u32 {
        self.page_size
            .filter(|s| *s > 0)
            .unwrap_or(config.list_page_size)
    }
}

/// Optional `{ "reason": "..." }` body shared by the cancel/deny/role/transfer routes.
#[derive(Debug, Default, Deserialize)]
pub struct ReasonBody {
    #[serde(default)]
    pub reason: Option<String>,
}

impl ReasonBody {
    pub fn text(&self) -> &str {
        self.reason.as_deref().unwrap_or("")
    }
}
