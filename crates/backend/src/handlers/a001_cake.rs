use axum::{extract::Path, http::StatusCode, Json};
use serde_json::json;

use crate::domain::a001_cake::{self, lifecycle::LifecycleError};
use contracts::domain::common::AggregateId;

fn status_for(err: &LifecycleError) -> StatusCode {
    match err {
        LifecycleError::DuplicateSku { .. } => StatusCode::CONFLICT,
        LifecycleError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        LifecycleError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// GET /api/cakes
pub async fn list_all(
) -> Result<Json<Vec<contracts::domain::a001_cake::aggregate::Cake>>, StatusCode> {
    match a001_cake::service::list_all().await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list cakes: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/cakes/:id
pub async fn get_by_id(
    Path(id): Path<String>,
) -> Result<Json<contracts::domain::a001_cake::aggregate::Cake>, StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(StatusCode::BAD_REQUEST),
    };
    match a001_cake::service::get_by_id(uuid).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to get cake {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/cakes
pub async fn create(
    Json(draft): Json<contracts::domain::a001_cake::aggregate::CakeDraft>,
) -> Result<
    Json<contracts::domain::a001_cake::aggregate::Cake>,
    (StatusCode, Json<serde_json::Value>),
> {
    match a001_cake::service::create(draft).await {
        Ok(cake) => Ok(Json(cake)),
        Err(e) => {
            let status = status_for(&e);
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                tracing::error!("Failed to create cake: {}", e);
            }
            Err((status, Json(json!({ "error": e.to_string() }))))
        }
    }
}

/// POST /api/cakes/mark-sold
pub async fn mark_sold(
    Json(request): Json<contracts::domain::a001_cake::aggregate::MarkSoldRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let mut cake_ids = Vec::with_capacity(request.cake_ids.len());
    for raw in &request.cake_ids {
        match contracts::domain::a001_cake::aggregate::CakeId::from_string(raw) {
            Ok(id) => cake_ids.push(id),
            Err(e) => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": format!("bad cake id '{}': {}", raw, e) })),
                ))
            }
        }
    }

    match a001_cake::service::mark_sold(
        &cake_ids,
        &request.customer_name,
        &request.customer_phone,
    )
    .await
    {
        Ok(report) => Ok(Json(json!({
            "updatedCount": report.updated_count(),
            "updated": report.updated,
            "failed": report.failed,
        }))),
        Err(e) => {
            let status = status_for(&e);
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                tracing::error!("Failed to mark cakes sold: {}", e);
            }
            Err((status, Json(json!({ "error": e.to_string() }))))
        }
    }
}

/// POST /api/cakes/sweep-expired
pub async fn sweep_expired(
) -> Result<Json<contracts::domain::a001_cake::aggregate::SweepReport>, StatusCode> {
    match a001_cake::service::sweep_expired().await {
        Ok(report) => {
            if !report.expired.is_empty() {
                tracing::info!("Expired {} cake(s)", report.expired.len());
            }
            Ok(Json(report))
        }
        Err(e) => {
            tracing::error!("Failed to sweep expired cakes: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
