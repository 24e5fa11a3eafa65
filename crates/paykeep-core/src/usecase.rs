//! # Payment Use Cases
//!
//! Orchestration between the transport boundary and the storage gateway:
//! keyset pagination with an opaque cursor, uniqueness-conflict detection
//! on create, existence checks before mutation and deletion, and a
//! per-operation deadline on every storage round trip.

use crate::error::{PaymentError, PaymentResult};
use crate::payment::Payment;
use crate::repository::BoxedPaymentRepository;
use chrono::Utc;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Page size applied when the caller asks for zero or a negative count
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Use-case layer over a [`PaymentRepository`](crate::repository::PaymentRepository).
///
/// Stateless apart from the configured timeout and the shared repository
/// handle, so a single instance serves concurrent requests.
#[derive(Clone)]
pub struct PaymentService {
    repo: BoxedPaymentRepository,
    timeout: Duration,
}

impl PaymentService {
    /// Create a service with an explicit per-operation timeout.
    pub fn new(repo: BoxedPaymentRepository, timeout: Duration) -> Self {
        Self { repo, timeout }
    }

    /// Run one operation under the configured deadline. All storage calls
    /// an operation makes share a single bound; on expiry the in-flight
    /// call is dropped and `Timeout` is surfaced.
    async fn bounded<T>(&self, op: impl Future<Output = PaymentResult<T>>) -> PaymentResult<T> {
        let timeout_ms = self.timeout.as_millis() as u64;
        match tokio::time::timeout(self.timeout, op).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout_ms, "storage call exceeded deadline");
                Err(PaymentError::Timeout { timeout_ms })
            }
        }
    }

    /// Fetch one page of records after `cursor`, plus the next-cursor token.
    ///
    /// The cursor encodes the last-seen id; empty (or unparseable) means
    /// scan from the start. A page that comes back exactly full signals
    /// "more may exist" by returning the last id as the next cursor; this
    /// is a heuristic, so a table size that is an exact multiple of the
    /// page size costs one extra empty page on the following call.
    pub async fn fetch(&self, cursor: &str, num: i64) -> PaymentResult<(Vec<Payment>, String)> {
        let num = if num <= 0 { DEFAULT_PAGE_SIZE } else { num };
        let after_id = cursor.parse::<i64>().unwrap_or(0);

        let page = self.bounded(self.repo.fetch(after_id, num)).await?;

        let next_cursor = match page.last() {
            Some(last) if page.len() as i64 == num => last.id.to_string(),
            _ => String::new(),
        };

        Ok((page, next_cursor))
    }

    /// Get a payment by surrogate key.
    pub async fn get_by_id(&self, id: i64) -> PaymentResult<Payment> {
        self.bounded(async {
            self.repo.find_by_id(id).await?.ok_or(PaymentError::NotFound)
        })
        .await
    }

    /// Get a payment by business key.
    pub async fn get_by_payment_id(&self, payment_id: &str) -> PaymentResult<Payment> {
        self.bounded(async {
            self.repo
                .find_by_payment_id(payment_id)
                .await?
                .ok_or(PaymentError::NotFound)
        })
        .await
    }

    /// Store a new payment, returning it with the storage-assigned id.
    ///
    /// The business key is checked for an existing record first; a hit
    /// fails with `Conflict` and performs no write. The check is
    /// read-then-write and therefore racy on its own; the backing
    /// table's unique constraint is the authoritative guard, and the
    /// gateway reports its violation as `Conflict` as well.
    pub async fn store(&self, mut candidate: Payment) -> PaymentResult<Payment> {
        self.bounded(async {
            if self
                .repo
                .find_by_payment_id(&candidate.payment_id)
                .await?
                .is_some()
            {
                return Err(PaymentError::Conflict {
                    payment_id: candidate.payment_id.clone(),
                });
            }

            candidate.id = self.repo.insert(&candidate).await?;
            Ok(candidate)
        })
        .await
    }

    /// Update an existing payment in place.
    ///
    /// The caller supplies the full current record with the mutable
    /// field(s) changed; `updated_at` is stamped here just before the
    /// write. An affected-row count other than exactly one is a fatal
    /// anomaly, covering both "no such id" and an unexpected multi-row
    /// mutation.
    pub async fn update(&self, mut payment: Payment) -> PaymentResult<Payment> {
        payment.updated_at = Utc::now();

        self.bounded(async {
            let affected = self.repo.update(&payment).await?;
            if affected != 1 {
                warn!(id = payment.id, affected, "update row-count anomaly");
                return Err(PaymentError::RowCountAnomaly { affected });
            }
            Ok(payment)
        })
        .await
    }

    /// Delete a payment by id.
    ///
    /// Absent records fail with `NotFound` before any delete is attempted.
    pub async fn delete(&self, id: i64) -> PaymentResult<bool> {
        self.bounded(async {
            if self.repo.find_by_id(id).await?.is_none() {
                return Err(PaymentError::NotFound);
            }

            let affected = self.repo.delete(id).await?;
            if affected != 1 {
                warn!(id, affected, "delete row-count anomaly");
                return Err(PaymentError::RowCountAnomaly { affected });
            }
            Ok(true)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::PaymentRepository;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::{Arc, Mutex};

    /// In-memory repository backing the use-case tests.
    #[derive(Default)]
    struct MemRepo {
        rows: Mutex<Vec<Payment>>,
        next_id: AtomicI64,
    }

    impl MemRepo {
        fn new() -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
                next_id: AtomicI64::new(1),
            }
        }

        fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PaymentRepository for MemRepo {
        async fn fetch(&self, after_id: i64, limit: i64) -> PaymentResult<Vec<Payment>> {
            let mut rows: Vec<Payment> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.id > after_id)
                .cloned()
                .collect();
            rows.sort_by_key(|p| p.id);
            rows.truncate(limit as usize);
            Ok(rows)
        }

        async fn find_by_id(&self, id: i64) -> PaymentResult<Option<Payment>> {
            Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
        }

        async fn find_by_payment_id(&self, payment_id: &str) -> PaymentResult<Option<Payment>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.payment_id == payment_id)
                .cloned())
        }

        async fn insert(&self, candidate: &Payment) -> PaymentResult<i64> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            let now = Utc::now();
            self.rows.lock().unwrap().push(Payment {
                id,
                payment_id: candidate.payment_id.clone(),
                organisation: candidate.organisation.clone(),
                updated_at: now,
                created_at: now,
            });
            Ok(id)
        }

        async fn update(&self, payment: &Payment) -> PaymentResult<u64> {
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|p| p.id == payment.id) {
                Some(row) => {
                    row.payment_id = payment.payment_id.clone();
                    row.organisation = payment.organisation.clone();
                    row.updated_at = payment.updated_at;
                    Ok(1)
                }
                None => Ok(0),
            }
        }

        async fn delete(&self, id: i64) -> PaymentResult<u64> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|p| p.id != id);
            Ok((before - rows.len()) as u64)
        }
    }

    /// Repository that fails every call, for error-propagation tests.
    struct FailingRepo;

    #[async_trait]
    impl PaymentRepository for FailingRepo {
        async fn fetch(&self, _after_id: i64, _limit: i64) -> PaymentResult<Vec<Payment>> {
            Err(PaymentError::Storage("connection reset".into()))
        }
        async fn find_by_id(&self, _id: i64) -> PaymentResult<Option<Payment>> {
            Err(PaymentError::Storage("connection reset".into()))
        }
        async fn find_by_payment_id(&self, _payment_id: &str) -> PaymentResult<Option<Payment>> {
            Err(PaymentError::Storage("connection reset".into()))
        }
        async fn insert(&self, _candidate: &Payment) -> PaymentResult<i64> {
            Err(PaymentError::Storage("connection reset".into()))
        }
        async fn update(&self, _payment: &Payment) -> PaymentResult<u64> {
            Err(PaymentError::Storage("connection reset".into()))
        }
        async fn delete(&self, _id: i64) -> PaymentResult<u64> {
            Err(PaymentError::Storage("connection reset".into()))
        }
    }

    /// Repository that never answers, for deadline tests.
    struct StalledRepo;

    #[async_trait]
    impl PaymentRepository for StalledRepo {
        async fn fetch(&self, _after_id: i64, _limit: i64) -> PaymentResult<Vec<Payment>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }
        async fn find_by_id(&self, _id: i64) -> PaymentResult<Option<Payment>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(None)
        }
        async fn find_by_payment_id(&self, _payment_id: &str) -> PaymentResult<Option<Payment>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(None)
        }
        async fn insert(&self, _candidate: &Payment) -> PaymentResult<i64> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(0)
        }
        async fn update(&self, _payment: &Payment) -> PaymentResult<u64> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(0)
        }
        async fn delete(&self, _id: i64) -> PaymentResult<u64> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(0)
        }
    }

    fn service(repo: Arc<dyn PaymentRepository>) -> PaymentService {
        PaymentService::new(repo, Duration::from_secs(2))
    }

    async fn seed(svc: &PaymentService, count: usize) {
        for i in 1..=count {
            svc.store(Payment::draft(format!("PAY-{i:03}"), "acme-corp"))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_fetch_normalizes_page_size() {
        let repo = Arc::new(MemRepo::new());
        let svc = service(repo.clone());
        seed(&svc, 15).await;

        let (page, next_cursor) = svc.fetch("", 0).await.unwrap();
        assert_eq!(page.len(), DEFAULT_PAGE_SIZE as usize);
        assert_eq!(next_cursor, "10");

        let (page, _) = svc.fetch("", -3).await.unwrap();
        assert_eq!(page.len(), DEFAULT_PAGE_SIZE as usize);
    }

    #[tokio::test]
    async fn test_fetch_after_cursor() {
        let repo = Arc::new(MemRepo::new());
        let svc = service(repo.clone());
        seed(&svc, 3).await;

        // ids {1,2,3}: page after "2" is exactly full, so the heuristic
        // signals more data even though the table is exhausted
        let (page, next_cursor) = svc.fetch("2", 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, 3);
        assert_eq!(next_cursor, "3");

        let (page, next_cursor) = svc.fetch("3", 1).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(next_cursor, "");
    }

    #[tokio::test]
    async fn test_fetch_partial_page_ends_pagination() {
        let repo = Arc::new(MemRepo::new());
        let svc = service(repo.clone());
        seed(&svc, 3).await;

        let (page, next_cursor) = svc.fetch("", 5).await.unwrap();
        assert_eq!(page.len(), 3);
        assert_eq!(next_cursor, "");
    }

    #[tokio::test]
    async fn test_fetch_is_ordered_and_strictly_after_cursor() {
        let repo = Arc::new(MemRepo::new());
        let svc = service(repo.clone());
        seed(&svc, 8).await;

        let (page, _) = svc.fetch("3", 4).await.unwrap();
        let ids: Vec<i64> = page.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![4, 5, 6, 7]);
    }

    #[tokio::test]
    async fn test_fetch_unparseable_cursor_scans_from_start() {
        let repo = Arc::new(MemRepo::new());
        let svc = service(repo.clone());
        seed(&svc, 2).await;

        let (page, _) = svc.fetch("not-a-number", 5).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, 1);
    }

    #[tokio::test]
    async fn test_fetch_propagates_storage_error() {
        let svc = service(Arc::new(FailingRepo));
        let err = svc.fetch("12", 1).await.unwrap_err();
        assert!(matches!(err, PaymentError::Storage(_)));
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let repo = Arc::new(MemRepo::new());
        let svc = service(repo.clone());
        seed(&svc, 1).await;

        let found = svc.get_by_id(1).await.unwrap();
        assert_eq!(found.payment_id, "PAY-001");

        let err = svc.get_by_id(99).await.unwrap_err();
        assert!(matches!(err, PaymentError::NotFound));
    }

    #[tokio::test]
    async fn test_get_by_payment_id() {
        let repo = Arc::new(MemRepo::new());
        let svc = service(repo.clone());
        seed(&svc, 1).await;

        let found = svc.get_by_payment_id("PAY-001").await.unwrap();
        assert_eq!(found.id, 1);

        let err = svc.get_by_payment_id("PAY-999").await.unwrap_err();
        assert!(matches!(err, PaymentError::NotFound));
    }

    #[tokio::test]
    async fn test_store_assigns_id_and_stamps_creation() {
        let repo = Arc::new(MemRepo::new());
        let svc = service(repo.clone());

        let stored = svc.store(Payment::draft("PAY-001", "acme-corp")).await.unwrap();
        assert_eq!(stored.id, 1);
        assert!(stored.is_stored());

        let row = svc.get_by_id(stored.id).await.unwrap();
        assert_eq!(row.created_at, row.updated_at);
    }

    #[tokio::test]
    async fn test_store_duplicate_business_key_conflicts() {
        let repo = Arc::new(MemRepo::new());
        let svc = service(repo.clone());

        svc.store(Payment::draft("P1", "ORG")).await.unwrap();
        let err = svc.store(Payment::draft("P1", "ORG")).await.unwrap_err();

        assert!(matches!(err, PaymentError::Conflict { ref payment_id } if payment_id == "P1"));
        // conflict performs no write
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_update_bumps_updated_at_only() {
        let repo = Arc::new(MemRepo::new());
        let svc = service(repo.clone());
        seed(&svc, 1).await;

        let mut current = svc.get_by_id(1).await.unwrap();
        let pre_update = current.updated_at;
        let created = current.created_at;

        std::thread::sleep(Duration::from_millis(5));
        current.organisation = "globex".into();
        let updated = svc.update(current).await.unwrap();

        assert_eq!(updated.organisation, "globex");
        assert!(updated.updated_at > pre_update);
        assert_eq!(updated.created_at, created);

        let row = svc.get_by_id(1).await.unwrap();
        assert_eq!(row.organisation, "globex");
        assert_eq!(row.created_at, created);
    }

    #[tokio::test]
    async fn test_update_missing_id_is_row_count_anomaly() {
        let repo = Arc::new(MemRepo::new());
        let svc = service(repo.clone());

        let mut ghost = Payment::draft("PAY-404", "acme-corp");
        ghost.id = 42;
        let err = svc.update(ghost).await.unwrap_err();

        assert!(matches!(err, PaymentError::RowCountAnomaly { affected: 0 }));
        assert!(err.is_storage_failure());
    }

    #[tokio::test]
    async fn test_delete_existing() {
        let repo = Arc::new(MemRepo::new());
        let svc = service(repo.clone());
        seed(&svc, 2).await;

        assert!(svc.delete(1).await.unwrap());
        assert_eq!(repo.len(), 1);
        assert!(matches!(svc.get_by_id(1).await.unwrap_err(), PaymentError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let repo = Arc::new(MemRepo::new());
        let svc = service(repo.clone());
        seed(&svc, 1).await;

        let err = svc.delete(99).await.unwrap_err();
        assert!(matches!(err, PaymentError::NotFound));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_storage_times_out() {
        let svc = PaymentService::new(Arc::new(StalledRepo), Duration::from_millis(50));

        let err = svc.fetch("", 10).await.unwrap_err();
        assert!(matches!(err, PaymentError::Timeout { timeout_ms: 50 }));

        let err = svc.delete(1).await.unwrap_err();
        assert!(matches!(err, PaymentError::Timeout { .. }));
    }
}
