use serde_json::{json, Value};

use crate::errors::ApiError;
use crate::models::User;
use crate::services::http::{segment, RequestSpec};
use crate::services::normalize::aliases::user as alias;
use crate::services::normalize::normalize_user;
use crate::services::{require, written_record, ApiContext};

pub async fn list_users(ctx: &ApiContext, page: u32, page_size: u32) -> Result<Vec<User>, ApiError> {
    let candidates = ["/Users/Get-All", "/Admin/Users", "/users"].map(|path| {
        RequestSpec::get(path)
            .query("pageNumber", page)
            .query("pageSize", page_size)
    });
    let raw = ctx.fetch_list("list_users", &candidates).await?;
    Ok(normalize_all(&raw))
}

pub async fn get_user(ctx: &ApiContext, user_id: &str) -> Result<User, ApiError> {
    let user_id = require(user_id, "userId")?;
    let id = segment(user_id);
    let mut candidates = vec![
        RequestSpec::get(format!("/Users/Get-By-{id}")),
        RequestSpec::get(format!("/Users/Get-By-Id/{id}")),
        RequestSpec::get(format!("/Users/{id}")),
        RequestSpec::get(format!("/users/{id}")),
        RequestSpec::get(format!("/User/{id}")),
        RequestSpec::get(format!("/Users/Details/{id}")),
    ];
    for path in ["/Users/Get-By-Id", "/users/Get-By-Id", "/Users/Get-By", "/users/Get-By"] {
        candidates.push(RequestSpec::get(path).query("id", user_id));
    }

    ctx.fetch_record("get_user", &candidates, alias::ID, user_id)
        .await?
        .map(|raw| normalize_user(&raw))
        .ok_or_else(|| ApiError::NotFound {
            entity: "user",
            id: user_id.to_string(),
        })
}

pub async fn staff_by_station(ctx: &ApiContext, station_id: &str) -> Result<Vec<User>, ApiError> {
    let station_id = require(station_id, "stationId")?;
    let id = segment(station_id);
    let candidates = [
        RequestSpec::get(format!("/Admin/Staff/By-Station/{id}")),
        RequestSpec::get(format!("/Staff/By-Station/{id}")),
        RequestSpec::get("/Admin/Staff/By-Station").query("stationId", station_id),
    ];
    let raw = ctx.fetch_list("staff_by_station", &candidates).await?;
    Ok(normalize_all(&raw))
}

pub async fn assign_staff_role(ctx: &ApiContext, user_id: &str, reason: &str) -> Result<User, ApiError> {
    change_staff_role(ctx, "assign_staff_role", "Assign-Staff-Role", user_id, reason).await
}

pub async fn remove_staff_role(ctx: &ApiContext, user_id: &str, reason: &str) -> Result<User, ApiError> {
    change_staff_role(ctx, "remove_staff_role", "Remove-Staff-Role", user_id, reason).await
}

async fn change_staff_role(
    ctx: &ApiContext,
    operation: &str,
    action: &str,
    user_id: &str,
    reason: &str,
) -> Result<User, ApiError> {
    let user_id = require(user_id, "userId")?;
    let id = segment(user_id);
    let reason = reason.trim();
    let body = if reason.is_empty() {
        json!({ "userId": user_id })
    } else {
        json!({ "userId": user_id, "reason": reason })
    };
    let candidates = [
        format!("/Admin/Users/{id}/{action}"),
        format!("/Users/{id}/{action}"),
        format!("/Admin/Users/{action}"),
    ]
    .map(|path| {
        let spec = RequestSpec::post(path).json(body.clone());
        if reason.is_empty() {
            spec
        } else {
            spec.query("reason", reason)
        }
    });

    let payload = ctx.invoke(operation, &candidates).await?;
    tracing::info!(operation, user = user_id, "staff role changed");
    settle(ctx, user_id, payload).await
}

pub async fn assign_staff_to_station(ctx: &ApiContext, station_id: &str, staff_id: &str) -> Result<User, ApiError> {
    let station_id = require(station_id, "stationId")?;
    let staff_id = require(staff_id, "staffId")?;
    let id = segment(station_id);
    let candidates = [
        RequestSpec::post(format!("/Stations/{id}/Assign-Staff")).query("staffId", staff_id),
        RequestSpec::post(format!("/Admin/Stations/{id}/Assign-Staff")).query("staffId", staff_id),
    ];
    let payload = ctx.invoke("assign_staff", &candidates).await?;
    tracing::info!(station = station_id, staff = staff_id, "staff assigned to station");
    settle(ctx, staff_id, payload).await
}

pub async fn unassign_staff(ctx: &ApiContext, staff_id: &str) -> Result<User, ApiError> {
    let staff_id = require(staff_id, "staffId")?;
    let candidates = [
        RequestSpec::post("/Stations/Unassign-Staff").query("staffId", staff_id),
        RequestSpec::post("/Admin/Stations/Unassign-Staff").query("staffId", staff_id),
    ];
    let payload = ctx.invoke("unassign_staff", &candidates).await?;
    tracing::info!(staff = staff_id, "staff unassigned from station");
    settle(ctx, staff_id, payload).await
}

async fn settle(ctx: &ApiContext, user_id: &str, payload: Value) -> Result<User, ApiError> {
    match written_record(payload, alias::ID, user_id) {
        Some(raw) => Ok(normalize_user(&raw)),
        None => get_user(ctx, user_id).await,
    }
}

fn normalize_all(raw: &[Value]) -> Vec<User> {
    raw.iter()
        .map(normalize_user)
        .filter(|u| u.id.is_some())
        .collect()
}
