use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::leave_application::{LeaveApplication, LeaveStatus};
use crate::model::role::Role;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeave {
    #[schema(example = "Sick")]
    pub leave_type: String,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Medical")]
    pub reason: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecideLeave {
    /// Approved or Rejected
    #[schema(example = "Approved")]
    pub status: String,
    #[schema(example = "ok")]
    pub approver_remarks: Option<String>,
}

const LEAVE_COLUMNS: &str = "id, applicant_id, applicant_name, applicant_role, leave_type, \
     start_date, end_date, reason, status, submitted_at, \
     approver_id, approver_name, approved_at, approver_remarks";

/// The range is inclusive; a single-day leave has start == end.
fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ApiError> {
    if start > end {
        return Err(ApiError::InvalidInput(
            "startDate cannot be after endDate".to_string(),
        ));
    }
    Ok(())
}

/* =========================
Submit leave application
========================= */
#[utoipa::path(
    post,
    path = "/api/leaves",
    request_body(
        content = CreateLeave,
        description = "Leave application payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave application submitted", body = Object, example = json!({
            "message": "Leave application submitted",
            "leaveId": 1
        })),
        (status = 400, description = "Missing field or bad date range"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn submit_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeave>,
) -> Result<HttpResponse, ApiError> {
    let leave_type = payload.leave_type.trim();
    let reason = payload.reason.trim();

    if leave_type.is_empty() || reason.is_empty() {
        return Err(ApiError::InvalidInput(
            "All leave fields are required".to_string(),
        ));
    }

    validate_date_range(payload.start_date, payload.end_date)?;

    let done = sqlx::query(
        r#"
        INSERT INTO leave_applications
            (applicant_id, applicant_name, applicant_role, leave_type,
             start_date, end_date, reason, status, submitted_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, NOW())
        "#,
    )
    .bind(auth.user_id)
    .bind(&auth.name)
    .bind(auth.role.to_string())
    .bind(leave_type)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(reason)
    .bind(LeaveStatus::Pending.as_str())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, applicant_id = auth.user_id, "Failed to submit leave application");
        ApiError::Internal
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Leave application submitted",
        "leaveId": done.last_insert_id()
    })))
}

/* =========================
My leave applications
========================= */
#[utoipa::path(
    get,
    path = "/api/leaves/my",
    responses(
        (status = 200, description = "Caller's applications, newest first", body = [LeaveApplication]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn my_leaves(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    let sql = format!(
        "SELECT {LEAVE_COLUMNS} FROM leave_applications \
         WHERE applicant_id = ? ORDER BY submitted_at DESC"
    );

    let leaves = sqlx::query_as::<_, LeaveApplication>(&sql)
        .bind(auth.user_id)
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(leaves))
}

/* =========================
Pending queue (teacher/admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/leaves/pending",
    responses(
        (status = 200, description = "Pending applications, oldest first", body = [LeaveApplication]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn pending_leaves(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_approver()?;

    // Oldest first so the queue is reviewed in submission order.
    // Teachers only ever see student applications.
    let leaves = if auth.role == Role::Teacher {
        let sql = format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_applications \
             WHERE status = ? AND applicant_role = ? ORDER BY submitted_at ASC"
        );
        sqlx::query_as::<_, LeaveApplication>(&sql)
            .bind(LeaveStatus::Pending.as_str())
            .bind(Role::Student.to_string())
            .fetch_all(pool.get_ref())
            .await?
    } else {
        let sql = format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_applications \
             WHERE status = ? ORDER BY submitted_at ASC"
        );
        sqlx::query_as::<_, LeaveApplication>(&sql)
            .bind(LeaveStatus::Pending.as_str())
            .fetch_all(pool.get_ref())
            .await?
    };

    Ok(HttpResponse::Ok().json(leaves))
}

/* =========================
Application detail
========================= */
#[utoipa::path(
    get,
    path = "/api/leaves/{id}",
    params(
        ("id" = u64, Path, description = "ID of the leave application to fetch")
    ),
    responses(
        (status = 200, description = "Leave application found", body = LeaveApplication),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave application not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let leave_id = path.into_inner();

    let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_applications WHERE id = ?");

    let leave = sqlx::query_as::<_, LeaveApplication>(&sql)
        .bind(leave_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Leave application not found".to_string()))?;

    let applicant_role: Role = leave.applicant_role.parse().map_err(|_| {
        tracing::error!(leave_id, role = %leave.applicant_role, "Unknown applicant role stored");
        ApiError::Internal
    })?;

    if !auth
        .role
        .can_view(applicant_role, leave.applicant_id == auth.user_id)
    {
        return Err(ApiError::Forbidden(
            "You do not have access to this leave application".to_string(),
        ));
    }

    Ok(HttpResponse::Ok().json(leave))
}

/* =========================
Decide (approve/reject)
========================= */
#[utoipa::path(
    put,
    path = "/api/leaves/{id}/status",
    params(
        ("id" = u64, Path, description = "ID of the leave application to decide")
    ),
    request_body(
        content = DecideLeave,
        description = "Decision payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Decision recorded", body = Object, example = json!({
            "message": "Leave Approved successfully"
        })),
        (status = 400, description = "Invalid status or application not pending"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave application not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn decide_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<DecideLeave>,
) -> Result<HttpResponse, ApiError> {
    auth.require_approver()?;

    let leave_id = path.into_inner();

    let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_applications WHERE id = ?");

    let leave = sqlx::query_as::<_, LeaveApplication>(&sql)
        .bind(leave_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Leave application not found".to_string()))?;

    if leave.status != LeaveStatus::Pending.as_str() {
        return Err(ApiError::InvalidState(
            "Leave application is not pending".to_string(),
        ));
    }

    let status = payload
        .status
        .parse::<LeaveStatus>()
        .ok()
        .filter(|s| s.is_decision())
        .ok_or_else(|| ApiError::InvalidInput("Invalid status provided".to_string()))?;

    let applicant_role: Role = leave.applicant_role.parse().map_err(|_| {
        tracing::error!(leave_id, role = %leave.applicant_role, "Unknown applicant role stored");
        ApiError::Internal
    })?;

    if !auth.role.can_decide_for(applicant_role) {
        return Err(ApiError::Forbidden(
            "Teachers can only approve or reject student leave".to_string(),
        ));
    }

    // The status guard in the WHERE clause makes the transition a
    // compare-and-swap: if another approver decided between the check
    // above and this update, zero rows match.
    let done = sqlx::query(
        r#"
        UPDATE leave_applications
        SET status = ?,
            approver_id = ?,
            approver_name = ?,
            approved_at = NOW(),
            approver_remarks = ?
        WHERE id = ?
        AND status = ?
        "#,
    )
    .bind(status.as_str())
    .bind(auth.user_id)
    .bind(&auth.name)
    .bind(payload.approver_remarks.as_deref())
    .bind(leave_id)
    .bind(LeaveStatus::Pending.as_str())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to record leave decision");
        ApiError::Internal
    })?;

    if done.rows_affected() == 0 {
        return Err(ApiError::InvalidState(
            "Leave application is not pending".to_string(),
        ));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Leave {} successfully", status)
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn start_after_end_is_rejected() {
        assert!(validate_date_range(date("2024-01-12"), date("2024-01-10")).is_err());
    }

    #[test]
    fn single_day_leave_is_valid() {
        assert!(validate_date_range(date("2024-01-10"), date("2024-01-10")).is_ok());
    }

    #[test]
    fn ordinary_range_is_valid() {
        assert!(validate_date_range(date("2024-01-10"), date("2024-01-12")).is_ok());
    }

    #[test]
    fn decision_status_parsing() {
        let parse = |s: &str| s.parse::<LeaveStatus>().ok().filter(|v| v.is_decision());

        assert_eq!(parse("Approved"), Some(LeaveStatus::Approved));
        assert_eq!(parse("Rejected"), Some(LeaveStatus::Rejected));
        // Pending is a valid status but never a valid decision.
        assert_eq!(parse("Pending"), None);
        assert_eq!(parse("approved"), None);
        assert_eq!(parse("Cancelled"), None);
    }
}
