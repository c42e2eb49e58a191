use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Строка списка продаж (P900): проданный торт + данные покупателя
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRow {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub price: f64,
    pub weight: f64,

    // Customer fields
    #[serde(rename = "customerName")]
    pub customer_name: String,
    #[serde(rename = "customerPhone")]
    pub customer_phone: String,
    #[serde(rename = "soldAt")]
    pub sold_at: DateTime<Utc>,
}
