use async_trait::async_trait;
use contracts::domain::a001_cake::aggregate::{Cake, CakeId, CustomerInfo};
use contracts::enums::cake_status::CakeStatus;
use contracts::enums::cake_type::CakeType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::domain::a001_cake::lifecycle::RecordStore;
use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_cake")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub cake_type: String,
    pub image_url: Option<String>,
    pub price: f64,
    pub weight: f64,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub expiry_at: chrono::DateTime<chrono::Utc>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub sold_at: Option<chrono::DateTime<chrono::Utc>>,
    pub is_deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Cake {
    fn from(m: Model) -> Self {
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        // customer присутствует только у проданных записей
        let customer = match (m.customer_name, m.customer_phone, m.sold_at) {
            (Some(name), Some(phone), Some(sold_at)) => Some(CustomerInfo {
                name,
                phone,
                sold_at,
            }),
            _ => None,
        };

        Cake {
            id: CakeId::new(uuid),
            sku: m.sku,
            name: m.name,
            description: m.description,
            cake_type: CakeType::from_code(&m.cake_type).unwrap_or(CakeType::Vegetarian),
            image_url: m.image_url,
            price: m.price,
            weight: m.weight,
            status: CakeStatus::from_code(&m.status).unwrap_or(CakeStatus::Available),
            created_at: m.created_at,
            expiry_at: m.expiry_at,
            customer,
            is_deleted: m.is_deleted,
        }
    }
}

fn active_model(cake: &Cake) -> ActiveModel {
    ActiveModel {
        id: Set(cake.id.value().to_string()),
        sku: Set(cake.sku.clone()),
        name: Set(cake.name.clone()),
        description: Set(cake.description.clone()),
        cake_type: Set(cake.cake_type.code().to_string()),
        image_url: Set(cake.image_url.clone()),
        price: Set(cake.price),
        weight: Set(cake.weight),
        status: Set(cake.status.code().to_string()),
        created_at: Set(cake.created_at),
        expiry_at: Set(cake.expiry_at),
        customer_name: Set(cake.customer.as_ref().map(|c| c.name.clone())),
        customer_phone: Set(cake.customer.as_ref().map(|c| c.phone.clone())),
        sold_at: Set(cake.customer.as_ref().map(|c| c.sold_at)),
        is_deleted: Set(cake.is_deleted),
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn list_all() -> anyhow::Result<Vec<Cake>> {
    let mut items: Vec<Cake> = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Cake>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

/// Хранилище записей поверх sea-orm / SQLite
#[derive(Debug, Clone, Copy, Default)]
pub struct SeaOrmCakeStore;

#[async_trait]
impl RecordStore for SeaOrmCakeStore {
    async fn insert(&self, cake: &Cake) -> anyhow::Result<CakeId> {
        active_model(cake).insert(conn()).await?;
        Ok(cake.id)
    }

    async fn find_by_sku(&self, sku: &str) -> anyhow::Result<Option<Cake>> {
        let result = Entity::find()
            .filter(Column::Sku.eq(sku))
            .filter(Column::IsDeleted.eq(false))
            .one(conn())
            .await?;
        Ok(result.map(Into::into))
    }

    async fn fetch_all(&self) -> anyhow::Result<Vec<Cake>> {
        let items = Entity::find()
            .filter(Column::IsDeleted.eq(false))
            .all(conn())
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        Ok(items)
    }

    async fn update_status(
        &self,
        id: CakeId,
        status: CakeStatus,
        customer: Option<CustomerInfo>,
    ) -> anyhow::Result<()> {
        use sea_orm::sea_query::Expr;
        let result = Entity::update_many()
            .col_expr(Column::Status, Expr::value(status.code()))
            .col_expr(
                Column::CustomerName,
                Expr::value(customer.as_ref().map(|c| c.name.clone())),
            )
            .col_expr(
                Column::CustomerPhone,
                Expr::value(customer.as_ref().map(|c| c.phone.clone())),
            )
            .col_expr(
                Column::SoldAt,
                Expr::value(customer.as_ref().map(|c| c.sold_at)),
            )
            .filter(Column::Id.eq(id.value().to_string()))
            .exec(conn())
            .await?;
        if result.rows_affected == 0 {
            anyhow::bail!("запись {} не найдена", id.value());
        }
        Ok(())
    }
}
