use uuid::Uuid;

use super::lifecycle::{CakeLifecycle, LifecycleError, SystemClock};
use super::repository::{self, SeaOrmCakeStore};
use contracts::domain::a001_cake::aggregate::{
    Cake, CakeDraft, CakeId, MarkSoldReport, SweepReport,
};

fn lifecycle() -> CakeLifecycle<SeaOrmCakeStore, SystemClock> {
    CakeLifecycle::new(SeaOrmCakeStore, SystemClock)
}

/// Создание нового торта (с проверкой уникальности SKU)
pub async fn create(draft: CakeDraft) -> Result<Cake, LifecycleError> {
    lifecycle().create(draft).await
}

/// Отметить выбранные торты проданными
pub async fn mark_sold(
    cake_ids: &[CakeId],
    customer_name: &str,
    customer_phone: &str,
) -> Result<MarkSoldReport, LifecycleError> {
    lifecycle()
        .mark_sold(cake_ids, customer_name, customer_phone)
        .await
}

/// Проход по просроченным записям
pub async fn sweep_expired() -> Result<SweepReport, LifecycleError> {
    lifecycle().sweep_expired().await
}

/// Получение торта по ID
pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Cake>> {
    repository::get_by_id(id).await
}

/// Получение списка всех тортов (новые сверху)
pub async fn list_all() -> anyhow::Result<Vec<Cake>> {
    repository::list_all().await
}
