//! In-process implementation of the URL repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// URL repository backed by a sharded concurrent map.
///
/// Every per-code mutation runs under the shard lock of that code, which
/// makes insert, visit increment, delete and category update atomic with
/// respect to each other. Operations on codes in different shards never
/// contend.
///
/// Records live only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryUrlRepository {
    records: DashMap<String, UrlRecord>,
    last_id: AtomicI64,
}

impl MemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Collects the owner's records matching `filter`, oldest first.
    fn collect_owned<F>(&self, owner_id: &str, filter: F) -> Vec<UrlRecord>
    where
        F: Fn(&UrlRecord) -> bool,
    {
        let mut records: Vec<UrlRecord> = self
            .records
            .iter()
            .filter(|r| r.is_owned_by(owner_id) && filter(r.value()))
            .map(|r| r.value().clone())
            .collect();
        records.sort_by_key(|r| r.id);
        records
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}

fn forbidden(code: &str) -> AppError {
    AppError::forbidden("Short link belongs to another owner", json!({ "code": code }))
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        match self.records.entry(new_record.code.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(
                "Short code already exists",
                json!({ "code": new_record.code }),
            )),
            Entry::Vacant(slot) => {
                let record = UrlRecord {
                    id: self.last_id.fetch_add(1, Ordering::SeqCst) + 1,
                    code: new_record.code,
                    original_url: new_record.original_url,
                    owner_id: new_record.owner_id,
                    category: new_record.category,
                    created_at: Utc::now(),
                    visit_count: 0,
                };
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, AppError> {
        Ok(self.records.get(code).map(|r| r.value().clone()))
    }

    async fn increment_visit(&self, code: &str) -> Result<(), AppError> {
        let Some(mut record) = self.records.get_mut(code) else {
            return Err(not_found(code));
        };
        record.visit_count += 1;
        Ok(())
    }

    async fn delete(&self, code: &str, owner_id: &str) -> Result<(), AppError> {
        match self.records.entry(code.to_string()) {
            Entry::Occupied(slot) if slot.get().is_owned_by(owner_id) => {
                slot.remove();
                Ok(())
            }
            Entry::Occupied(_) => Err(forbidden(code)),
            Entry::Vacant(_) => Err(not_found(code)),
        }
    }

    async fn list_by_category(
        &self,
        owner_id: &str,
        category: &str,
    ) -> Result<Vec<UrlRecord>, AppError> {
        Ok(self.collect_owned(owner_id, |r| r.has_category(category)))
    }

    async fn update_category(
        &self,
        code: &str,
        owner_id: &str,
        category: Option<String>,
    ) -> Result<UrlRecord, AppError> {
        let Some(mut record) = self.records.get_mut(code) else {
            return Err(not_found(code));
        };
        if !record.is_owned_by(owner_id) {
            return Err(forbidden(code));
        }
        record.category = category;
        Ok(record.value().clone())
    }

    async fn export_all(&self, owner_id: &str) -> Result<Vec<UrlRecord>, AppError> {
        Ok(self.collect_owned(owner_id, |_| true))
    }

    async fn list_by_owner(
        &self,
        owner_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<UrlRecord>, AppError> {
        let mut records = self.collect_owned(owner_id, |_| true);
        records.reverse();

        Ok(records
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count_by_owner(&self, owner_id: &str) -> Result<i64, AppError> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.is_owned_by(owner_id))
            .count() as i64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
