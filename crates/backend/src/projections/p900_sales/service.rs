use super::repository;
use contracts::projections::p900_sales::dto::SalesRow;

/// Получение списка продаж
pub async fn list_sold() -> anyhow::Result<Vec<SalesRow>> {
    repository::list_sold().await
}
