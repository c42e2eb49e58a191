use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::AggregateId;
use crate::enums::cake_status::CakeStatus;
use crate::enums::cake_type::CakeType;

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор торта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CakeId(pub Uuid);

impl CakeId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for CakeId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(CakeId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Данные покупателя; присутствуют тогда и только тогда, когда торт продан
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    #[serde(rename = "soldAt")]
    pub sold_at: DateTime<Utc>,
}

/// Торт (учётная запись склада кондитерской)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cake {
    pub id: CakeId,

    /// Артикул; уникален среди неудалённых записей, неизменяем после создания
    pub sku: String,

    pub name: String,
    pub description: Option<String>,

    #[serde(rename = "cakeType")]
    pub cake_type: CakeType,

    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,

    /// Цена, руб.
    pub price: f64,

    /// Вес, граммы
    pub weight: f64,

    pub status: CakeStatus,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    /// Срок годности; задаётся при создании и не меняется, на него
    /// реагирует только `status`
    #[serde(rename = "expiryAt")]
    pub expiry_at: DateTime<Utc>,

    pub customer: Option<CustomerInfo>,

    #[serde(rename = "isDeleted", default)]
    pub is_deleted: bool,
}

impl Cake {
    /// Создать новый торт для вставки в БД (status = Available)
    pub fn new_for_insert(draft: CakeDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: CakeId::new_v4(),
            sku: draft.sku,
            name: draft.name,
            description: draft.description,
            cake_type: draft.cake_type,
            image_url: draft.image_url,
            price: draft.price,
            weight: draft.weight,
            status: CakeStatus::Available,
            created_at: now,
            expiry_at: draft.expiry_at,
            customer: None,
            is_deleted: false,
        }
    }

    /// Получить ID как строку
    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.sku.trim().is_empty() {
            return Err("Артикул (SKU) не может быть пустым".into());
        }
        if self.name.trim().is_empty() {
            return Err("Название не может быть пустым".into());
        }
        if self.price <= 0.0 {
            return Err("Цена должна быть больше нуля".into());
        }
        if self.weight <= 0.0 {
            return Err("Вес должен быть больше нуля".into());
        }
        Ok(())
    }

    /// Единый предикат просроченности: Available и срок годности строго
    /// в прошлом. Им пользуются и sweep, и отображение — других проверок
    /// срока в коде быть не должно.
    pub fn is_expired_as_of(&self, now: DateTime<Utc>) -> bool {
        self.status == CakeStatus::Available && self.expiry_at < now
    }

    /// Перевести в Sold с данными покупателя
    pub fn mark_sold(&mut self, name: String, phone: String, sold_at: DateTime<Utc>) {
        self.status = CakeStatus::Sold;
        self.customer = Some(CustomerInfo {
            name,
            phone,
            sold_at,
        });
    }

    /// Перевести в Expired (поле customer не трогаем)
    pub fn expire(&mut self) {
        self.status = CakeStatus::Expired;
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO формы добавления торта
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CakeDraft {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "cakeType")]
    pub cake_type: CakeType,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    pub price: f64,
    pub weight: f64,
    #[serde(rename = "expiryAt")]
    pub expiry_at: DateTime<Utc>,
}

/// DTO формы "отметить проданным"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkSoldRequest {
    #[serde(rename = "cakeIds")]
    pub cake_ids: Vec<String>,
    #[serde(rename = "customerName")]
    pub customer_name: String,
    #[serde(rename = "customerPhone")]
    pub customer_phone: String,
}

/// Неудачное обновление одной записи в массовой операции
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemFailure {
    pub id: CakeId,
    pub reason: String,
}

/// Итог операции mark_sold: по каждой записи отдельный исход,
/// никакой атомарности "всё или ничего"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkSoldReport {
    pub updated: Vec<CakeId>,
    pub failed: Vec<ItemFailure>,
}

impl MarkSoldReport {
    /// Количество успешно обновлённых записей
    pub fn updated_count(&self) -> usize {
        self.updated.len()
    }
}

/// Итог прохода по просроченным
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    /// Записи, реально переведённые в Expired этим проходом
    pub expired: Vec<CakeId>,
    pub failed: Vec<ItemFailure>,
}
