use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::collection::{Collection, Document, StoreError};

/// Process-local collection used when no database is configured and in tests.
pub struct MemoryCollection<T: Document> {
    documents: Arc<RwLock<HashMap<String, T>>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> MemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(HashMap::new())),
            _marker: PhantomData,
        }
    }

    fn field_matches(document: &T, field: &str, value: &str) -> Result<bool, StoreError> {
        let serialized = serde_json::to_value(document)?;
        Ok(match serialized.get(field) {
            Some(Value::String(s)) => s == value,
            Some(Value::Bool(b)) => b.to_string() == value,
            Some(Value::Number(n)) => n.to_string() == value,
            _ => false,
        })
    }

    /// First unique field whose value another stored document already holds.
    fn duplicate_field(documents: &HashMap<String, T>, document: &T) -> Result<Option<&'static str>, StoreError> {
        if T::UNIQUE_FIELDS.is_empty() {
            return Ok(None);
        }
        let serialized = serde_json::to_value(document)?;
        for field in T::UNIQUE_FIELDS {
            let Some(value) = serialized.get(*field).filter(|v| !v.is_null()) else {
                continue;
            };
            for (id, other) in documents {
                if id != document.id() && serde_json::to_value(other)?.get(*field) == Some(value) {
                    return Ok(Some(*field));
                }
            }
        }
        Ok(None)
    }

    fn check_unique(documents: &HashMap<String, T>, document: &T) -> Result<(), StoreError> {
        match Self::duplicate_field(documents, document)? {
            Some(field) => Err(StoreError::Duplicate {
                collection: T::COLLECTION,
                field: field.to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl<T: Document> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn newest_first<T: Document>(mut documents: Vec<T>) -> Vec<T> {
    documents.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    documents
}

#[async_trait]
impl<T: Document> Collection<T> for MemoryCollection<T> {
    async fn insert(&self, document: T) -> Result<T, StoreError> {
        let mut documents = self.documents.write().await;
        Self::check_unique(&documents, &document)?;
        documents.insert(document.id().to_string(), document.clone());
        Ok(document)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<T>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<T>, StoreError> {
        let documents = self.documents.read().await;
        Ok(newest_first(documents.values().cloned().collect()))
    }

    async fn find_by_field(&self, field: &str, value: &str) -> Result<Vec<T>, StoreError> {
        let documents = self.documents.read().await;
        let mut found = Vec::new();
        for document in documents.values() {
            if Self::field_matches(document, field, value)? {
                found.push(document.clone());
            }
        }
        Ok(newest_first(found))
    }

    async fn replace(&self, document: T) -> Result<Option<T>, StoreError> {
        let mut documents = self.documents.write().await;
        if !documents.contains_key(document.id()) {
            return Ok(None);
        }
        Self::check_unique(&documents, &document)?;
        match documents.get_mut(document.id()) {
            Some(slot) => {
                *slot = document.clone();
                Ok(Some(document))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut documents = self.documents.write().await;
        Ok(documents.remove(id).is_some())
    }

    async fn delete_by_field(&self, field: &str, value: &str) -> Result<u64, StoreError> {
        let mut documents = self.documents.write().await;
        let mut doomed = Vec::new();
        for (id, document) in documents.iter() {
            if Self::field_matches(document, field, value)? {
                doomed.push(id.clone());
            }
        }
        for id in &doomed {
            documents.remove(id);
        }
        Ok(doomed.len() as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
