use serde::{Deserialize, Serialize};

/// Типы тортов по составу
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CakeType {
    Vegetarian,
    Eggless,
    Egg,
}

impl CakeType {
    /// Получить код типа (как он хранится в БД)
    pub fn code(&self) -> &'static str {
        match self {
            CakeType::Vegetarian => "Vegetarian",
            CakeType::Eggless => "Eggless",
            CakeType::Egg => "Egg",
        }
    }

    /// Получить человекочитаемое название
    pub fn display_name(&self) -> &'static str {
        match self {
            CakeType::Vegetarian => "Вегетарианский",
            CakeType::Eggless => "Без яиц",
            CakeType::Egg => "С яйцом",
        }
    }

    /// Получить все типы
    pub fn all() -> Vec<CakeType> {
        vec![CakeType::Vegetarian, CakeType::Eggless, CakeType::Egg]
    }

    /// Парсинг из строки
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Vegetarian" => Some(CakeType::Vegetarian),
            "Eggless" => Some(CakeType::Eggless),
            "Egg" => Some(CakeType::Egg),
            _ => None,
        }
    }
}

impl std::fmt::Display for CakeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
