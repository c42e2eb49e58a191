//! Ядро учёта: правила жизненного цикла торта.
//!
//! Все "внешние" зависимости — хранилище записей и часы — вынесены за
//! трейты, чтобы правила можно было проверять без БД. Атомарности между
//! отдельными вызовами хранилища нет и не предполагается: каждый insert
//! и каждый update — самостоятельный запрос.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use contracts::domain::a001_cake::aggregate::{
    Cake, CakeDraft, CakeId, CustomerInfo, ItemFailure, MarkSoldReport, SweepReport,
};
use contracts::enums::cake_status::CakeStatus;

/// Хранилище записей. Ровно четыре операции: вставка с возвратом ID,
/// выборка по равенству SKU, полная выборка, обновление полей по ID.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, cake: &Cake) -> anyhow::Result<CakeId>;

    /// Поиск по SKU среди неудалённых записей
    async fn find_by_sku(&self, sku: &str) -> anyhow::Result<Option<Cake>>;

    async fn fetch_all(&self) -> anyhow::Result<Vec<Cake>>;

    /// Обновить статус и поле customer одной записи
    async fn update_status(
        &self,
        id: CakeId,
        status: CakeStatus,
        customer: Option<CustomerInfo>,
    ) -> anyhow::Result<()>;
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for &T {
    async fn insert(&self, cake: &Cake) -> anyhow::Result<CakeId> {
        (**self).insert(cake).await
    }

    async fn find_by_sku(&self, sku: &str) -> anyhow::Result<Option<Cake>> {
        (**self).find_by_sku(sku).await
    }

    async fn fetch_all(&self) -> anyhow::Result<Vec<Cake>> {
        (**self).fetch_all().await
    }

    async fn update_status(
        &self,
        id: CakeId,
        status: CakeStatus,
        customer: Option<CustomerInfo>,
    ) -> anyhow::Result<()> {
        (**self).update_status(id, status, customer).await
    }
}

/// Часы. Продакшен — системное время, тесты — фиксированное.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Системные часы (Utc::now)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Ошибки жизненного цикла. Ни одна не фатальна для процесса,
/// все возвращаются вызывающему без повторных попыток.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Запись с таким SKU уже существует
    #[error("торт с SKU '{sku}' уже существует")]
    DuplicateSku { sku: String },

    /// Некорректные входные данные
    #[error("валидация не пройдена: {0}")]
    Validation(String),

    /// Отказ хранилища (сеть, таймаут и т.п.)
    #[error("хранилище недоступно: {0}")]
    Store(#[from] anyhow::Error),
}

/// Менеджер жизненного цикла торта
pub struct CakeLifecycle<S, C> {
    store: S,
    clock: C,
}

impl<S: RecordStore, C: Clock> CakeLifecycle<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Создание торта: проверка уникальности SKU, затем запись.
    ///
    /// Проверка и запись — два отдельных вызова хранилища; гонку двух
    /// одновременных create с одинаковым SKU эта схема не закрывает
    /// (унаследовано от исходной системы, см. DESIGN.md).
    pub async fn create(&self, draft: CakeDraft) -> Result<Cake, LifecycleError> {
        let now = self.clock.now();
        let mut cake = Cake::new_for_insert(draft, now);
        cake.validate().map_err(LifecycleError::Validation)?;

        if self.store.find_by_sku(&cake.sku).await?.is_some() {
            return Err(LifecycleError::DuplicateSku {
                sku: cake.sku.clone(),
            });
        }

        let id = self.store.insert(&cake).await?;
        cake.id = id;
        Ok(cake)
    }

    /// Отметить записи проданными.
    ///
    /// Каждая запись обновляется независимо; отказ по одному ID не
    /// прерывает остальные. Текущий статус записи перед записью НЕ
    /// перепроверяется — отбор доступных строк лежит на вызывающем
    /// (в исходной системе чекбоксы Sold/Expired были отключены в UI).
    pub async fn mark_sold(
        &self,
        cake_ids: &[CakeId],
        customer_name: &str,
        customer_phone: &str,
    ) -> Result<MarkSoldReport, LifecycleError> {
        if cake_ids.is_empty() {
            return Err(LifecycleError::Validation(
                "не выбрано ни одной записи".into(),
            ));
        }
        if customer_name.trim().is_empty() || customer_phone.trim().is_empty() {
            return Err(LifecycleError::Validation(
                "имя и телефон покупателя обязательны".into(),
            ));
        }

        // одно значение sold_at на весь вызов
        let sold_at = self.clock.now();
        let mut report = MarkSoldReport {
            updated: Vec::new(),
            failed: Vec::new(),
        };

        for &id in cake_ids {
            let customer = CustomerInfo {
                name: customer_name.trim().to_string(),
                phone: customer_phone.trim().to_string(),
                sold_at,
            };
            match self
                .store
                .update_status(id, CakeStatus::Sold, Some(customer))
                .await
            {
                Ok(()) => report.updated.push(id),
                Err(e) => report.failed.push(ItemFailure {
                    id,
                    reason: e.to_string(),
                }),
            }
        }

        Ok(report)
    }

    /// Проход по просроченным: все Available с expiry_at в прошлом
    /// переводятся в Expired. Идемпотентен: Sold/Expired под единый
    /// предикат не попадают и не трогаются.
    pub async fn sweep_expired(&self) -> Result<SweepReport, LifecycleError> {
        // одно значение now на весь проход
        let now = self.clock.now();
        let all = self.store.fetch_all().await?;

        let mut report = SweepReport {
            expired: Vec::new(),
            failed: Vec::new(),
        };

        for cake in all.iter().filter(|c| c.is_expired_as_of(now)) {
            match self
                .store
                .update_status(cake.id, CakeStatus::Expired, None)
                .await
            {
                Ok(()) => report.expired.push(cake.id),
                Err(e) => report.failed.push(ItemFailure {
                    id: cake.id,
                    reason: e.to_string(),
                }),
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use contracts::enums::cake_type::CakeType;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Хранилище в памяти для тестов; update по указанным ID можно
    /// заставить отказывать
    #[derive(Default)]
    struct MemoryStore {
        cakes: Mutex<Vec<Cake>>,
        fail_updates_for: Mutex<HashSet<CakeId>>,
    }

    impl MemoryStore {
        fn get(&self, id: CakeId) -> Option<Cake> {
            self.cakes
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.id == id)
                .cloned()
        }

        fn fail_update(&self, id: CakeId) {
            self.fail_updates_for.lock().unwrap().insert(id);
        }
    }

    #[async_trait]
    impl RecordStore for MemoryStore {
        async fn insert(&self, cake: &Cake) -> anyhow::Result<CakeId> {
            self.cakes.lock().unwrap().push(cake.clone());
            Ok(cake.id)
        }

        async fn find_by_sku(&self, sku: &str) -> anyhow::Result<Option<Cake>> {
            Ok(self
                .cakes
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.sku == sku && !c.is_deleted)
                .cloned())
        }

        async fn fetch_all(&self) -> anyhow::Result<Vec<Cake>> {
            Ok(self.cakes.lock().unwrap().clone())
        }

        async fn update_status(
            &self,
            id: CakeId,
            status: CakeStatus,
            customer: Option<CustomerInfo>,
        ) -> anyhow::Result<()> {
            if self.fail_updates_for.lock().unwrap().contains(&id) {
                anyhow::bail!("simulated store failure");
            }
            let mut cakes = self.cakes.lock().unwrap();
            let cake = cakes
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| anyhow::anyhow!("record not found"))?;
            cake.status = status;
            cake.customer = customer;
            Ok(())
        }
    }

    /// Фиксированные часы
    #[derive(Clone, Copy)]
    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn base_time() -> DateTime<Utc> {
        "2025-06-01T12:00:00Z".parse().unwrap()
    }

    fn draft(sku: &str, expiry_at: DateTime<Utc>) -> CakeDraft {
        CakeDraft {
            sku: sku.into(),
            name: "Наполеон".into(),
            description: Some("Классический слоёный".into()),
            cake_type: CakeType::Eggless,
            image_url: None,
            price: 950.0,
            weight: 1200.0,
            expiry_at,
        }
    }

    fn manager(store: &MemoryStore) -> CakeLifecycle<&MemoryStore, FixedClock> {
        CakeLifecycle::new(store, FixedClock(base_time()))
    }

    #[tokio::test]
    async fn create_stores_available_cake() {
        let store = MemoryStore::default();
        let mgr = manager(&store);

        let cake = mgr
            .create(draft("K-AB12", base_time() + Duration::days(2)))
            .await
            .unwrap();

        assert_eq!(cake.status, CakeStatus::Available);
        assert_eq!(cake.created_at, base_time());
        assert!(cake.customer.is_none());
        assert!(store.get(cake.id).is_some());
    }

    #[tokio::test]
    async fn second_create_with_same_sku_fails_and_writes_nothing() {
        let store = MemoryStore::default();
        let mgr = manager(&store);
        let expiry = base_time() + Duration::days(2);

        mgr.create(draft("K-AB12", expiry)).await.unwrap();
        let err = mgr.create(draft("K-AB12", expiry)).await.unwrap_err();

        assert!(matches!(err, LifecycleError::DuplicateSku { ref sku } if sku == "K-AB12"));
        assert_eq!(store.fetch_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_invalid_draft_before_any_store_write() {
        let store = MemoryStore::default();
        let mgr = manager(&store);

        let mut bad = draft("K-XX01", base_time() + Duration::days(1));
        bad.price = 0.0;
        let err = mgr.create(bad).await.unwrap_err();

        assert!(matches!(err, LifecycleError::Validation(_)));
        assert!(store.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mark_sold_sets_customer_on_every_selected_record() {
        let store = MemoryStore::default();
        let mgr = manager(&store);
        let expiry = base_time() + Duration::days(2);

        let a = mgr.create(draft("K-01", expiry)).await.unwrap();
        let b = mgr.create(draft("K-02", expiry)).await.unwrap();

        let report = mgr
            .mark_sold(&[a.id, b.id], "Анна", "+7 900 123-45-67")
            .await
            .unwrap();

        assert_eq!(report.updated_count(), 2);
        assert!(report.failed.is_empty());
        for id in [a.id, b.id] {
            let cake = store.get(id).unwrap();
            assert_eq!(cake.status, CakeStatus::Sold);
            let customer = cake.customer.unwrap();
            assert_eq!(customer.name, "Анна");
            assert_eq!(customer.sold_at, base_time());
        }
    }

    #[tokio::test]
    async fn mark_sold_rejects_empty_inputs() {
        let store = MemoryStore::default();
        let mgr = manager(&store);
        let expiry = base_time() + Duration::days(2);
        let cake = mgr.create(draft("K-01", expiry)).await.unwrap();

        let err = mgr.mark_sold(&[], "Анна", "+7 900").await.unwrap_err();
        assert!(matches!(err, LifecycleError::Validation(_)));

        let err = mgr.mark_sold(&[cake.id], "", "+7 900").await.unwrap_err();
        assert!(matches!(err, LifecycleError::Validation(_)));

        let err = mgr.mark_sold(&[cake.id], "Анна", "   ").await.unwrap_err();
        assert!(matches!(err, LifecycleError::Validation(_)));

        // запись не тронута
        assert_eq!(store.get(cake.id).unwrap().status, CakeStatus::Available);
    }

    #[tokio::test]
    async fn mark_sold_reports_per_id_outcomes_on_partial_failure() {
        let store = MemoryStore::default();
        let mgr = manager(&store);
        let expiry = base_time() + Duration::days(2);

        let a = mgr.create(draft("K-01", expiry)).await.unwrap();
        let b = mgr.create(draft("K-02", expiry)).await.unwrap();
        store.fail_update(a.id);

        let report = mgr
            .mark_sold(&[a.id, b.id], "Анна", "+7 900 123-45-67")
            .await
            .unwrap();

        assert_eq!(report.updated_count(), 1);
        assert_eq!(report.updated, vec![b.id]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].id, a.id);

        // A не изменился, B продан
        assert_eq!(store.get(a.id).unwrap().status, CakeStatus::Available);
        assert_eq!(store.get(b.id).unwrap().status, CakeStatus::Sold);
    }

    #[tokio::test]
    async fn sweep_expires_only_past_available_records() {
        let store = MemoryStore::default();
        let mgr = manager(&store);

        let past = mgr
            .create(draft("K-PAST", base_time() - Duration::days(1)))
            .await
            .unwrap();
        let future = mgr
            .create(draft("K-FUT", base_time() + Duration::days(1)))
            .await
            .unwrap();
        let sold = mgr
            .create(draft("K-SOLD", base_time() - Duration::days(2)))
            .await
            .unwrap();
        mgr.mark_sold(&[sold.id], "Анна", "+7 900").await.unwrap();

        let report = mgr.sweep_expired().await.unwrap();

        assert_eq!(report.expired, vec![past.id]);
        assert!(report.failed.is_empty());
        assert_eq!(store.get(past.id).unwrap().status, CakeStatus::Expired);
        assert_eq!(store.get(future.id).unwrap().status, CakeStatus::Available);
        assert_eq!(store.get(sold.id).unwrap().status, CakeStatus::Sold);
    }

    #[tokio::test]
    async fn sweep_is_idempotent_under_fixed_clock() {
        let store = MemoryStore::default();
        let mgr = manager(&store);

        mgr.create(draft("K-PAST", base_time() - Duration::days(1)))
            .await
            .unwrap();

        let first = mgr.sweep_expired().await.unwrap();
        assert_eq!(first.expired.len(), 1);

        let second = mgr.sweep_expired().await.unwrap();
        assert!(second.expired.is_empty());
        assert!(second.failed.is_empty());
    }

    #[tokio::test]
    async fn sweep_failure_on_one_record_does_not_block_others() {
        let store = MemoryStore::default();
        let mgr = manager(&store);

        let a = mgr
            .create(draft("K-A", base_time() - Duration::days(1)))
            .await
            .unwrap();
        let b = mgr
            .create(draft("K-B", base_time() - Duration::days(1)))
            .await
            .unwrap();
        store.fail_update(a.id);

        let report = mgr.sweep_expired().await.unwrap();

        assert_eq!(report.expired, vec![b.id]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].id, a.id);
        assert_eq!(store.get(b.id).unwrap().status, CakeStatus::Expired);
    }

    // Сценарий из исходной системы: торт со вчерашним сроком годности
    // сразу после создания просрочивается sweep'ом; mark_sold по нему
    // статус НЕ перепроверяет и перезапишет Expired на Sold. Это
    // задокументированный пробел контракта, а не гарантия.
    #[tokio::test]
    async fn mark_sold_overwrites_expired_record_documented_gap() {
        let store = MemoryStore::default();
        let mgr = manager(&store);

        let cake = mgr
            .create(draft("K-AB12", base_time() - Duration::days(1)))
            .await
            .unwrap();

        let report = mgr.sweep_expired().await.unwrap();
        assert_eq!(report.expired, vec![cake.id]);
        assert_eq!(store.get(cake.id).unwrap().status, CakeStatus::Expired);

        let report = mgr
            .mark_sold(&[cake.id], "Анна", "+7 900 123-45-67")
            .await
            .unwrap();
        assert_eq!(report.updated_count(), 1);
        assert_eq!(store.get(cake.id).unwrap().status, CakeStatus::Sold);
    }

    // Инвариант "Sold <=> customer присутствует" на уровне данных
    #[tokio::test]
    async fn sold_records_always_carry_customer() {
        let store = MemoryStore::default();
        let mgr = manager(&store);
        let expiry = base_time() + Duration::days(2);

        let a = mgr.create(draft("K-01", expiry)).await.unwrap();
        let b = mgr.create(draft("K-02", expiry)).await.unwrap();
        mgr.mark_sold(&[b.id], "Анна", "+7 900").await.unwrap();
        mgr.sweep_expired().await.unwrap();

        for cake in store.fetch_all().await.unwrap() {
            let is_sold = cake.status == CakeStatus::Sold;
            let has_customer = cake
                .customer
                .as_ref()
                .map(|c| !c.name.is_empty() && !c.phone.is_empty())
                .unwrap_or(false);
            assert_eq!(is_sold, has_customer, "запись {:?}", cake.sku);
        }
        assert_eq!(store.get(a.id).unwrap().status, CakeStatus::Available);
    }
}
