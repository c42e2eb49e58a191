use contracts::enums::cake_status::CakeStatus;
use contracts::projections::p900_sales::dto::SalesRow;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::domain::a001_cake::repository as cake_repository;
use crate::shared::data::db::get_connection;

/// Список продаж: проданные торты с данными покупателя.
///
/// Проекция читает ту же таблицу a001_cake, но наружу отдаёт плоские
/// строки для таблицы продаж.
pub async fn list_sold() -> anyhow::Result<Vec<SalesRow>> {
    let models = cake_repository::Entity::find()
        .filter(cake_repository::Column::Status.eq(CakeStatus::Sold.code()))
        .filter(cake_repository::Column::IsDeleted.eq(false))
        .all(get_connection())
        .await?;

    let mut rows: Vec<SalesRow> = models
        .into_iter()
        .filter_map(|m| {
            // строки без данных покупателя в проекцию не попадают
            let (name, phone, sold_at) = match (m.customer_name, m.customer_phone, m.sold_at) {
                (Some(n), Some(p), Some(s)) => (n, p, s),
                _ => return None,
            };
            Some(SalesRow {
                id: m.id,
                sku: m.sku,
                name: m.name,
                price: m.price,
                weight: m.weight,
                customer_name: name,
                customer_phone: phone,
                sold_at,
            })
        })
        .collect();

    // свежие продажи сверху
    rows.sort_by(|a, b| b.sold_at.cmp(&a.sold_at));
    Ok(rows)
}
