use axum::{http::StatusCode, Json};

use crate::projections::p900_sales::service;
use contracts::projections::p900_sales::dto::SalesRow;

/// GET /api/sales
pub async fn list() -> Result<Json<Vec<SalesRow>>, StatusCode> {
    match service::list_sold().await {
        Ok(rows) => Ok(Json(rows)),
        Err(e) => {
            tracing::error!("Failed to list sales: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
