use serde::{Deserialize, Serialize};

/// Статус жизненного цикла торта.
///
/// Переходы только вперёд: Available -> Sold, Available -> Expired.
/// Sold и Expired — терминальные состояния.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CakeStatus {
    Available,
    Sold,
    Expired,
}

impl CakeStatus {
    /// Получить код статуса (как он хранится в БД)
    pub fn code(&self) -> &'static str {
        match self {
            CakeStatus::Available => "Available",
            CakeStatus::Sold => "Sold",
            CakeStatus::Expired => "Expired",
        }
    }

    /// Парсинг из строки
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Available" => Some(CakeStatus::Available),
            "Sold" => Some(CakeStatus::Sold),
            "Expired" => Some(CakeStatus::Expired),
            _ => None,
        }
    }

    /// Терминальный ли статус (автоматических переходов из него нет)
    pub fn is_terminal(&self) -> bool {
        matches!(self, CakeStatus::Sold | CakeStatus::Expired)
    }
}

impl std::fmt::Display for CakeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
