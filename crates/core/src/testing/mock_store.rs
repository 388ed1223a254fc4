//! Mock object store for tests.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use crate::uploader::{ObjectStore, ObjectStoreError};

/// A recorded PUT call.
#[derive(Debug, Clone)]
pub struct RecordedPut {
    pub key: String,
    pub body: Bytes,
    pub content_type: String,
}

/// In-memory object store that records every PUT and can be told to
/// fail the first `n` calls, or all of them.
#[derive(Default)]
pub struct MockObjectStore {
    puts: Mutex<Vec<RecordedPut>>,
    fail_first: AtomicU32,
    fail_always: std::sync::atomic::AtomicBool,
    calls: AtomicU32,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the first `n` PUT calls, then succeeds.
    pub fn failing_first(n: u32) -> Self {
        let store = Self::default();
        store.fail_first.store(n, Ordering::SeqCst);
        store
    }

    /// Fails every PUT call.
    pub fn failing_always() -> Self {
        let store = Self::default();
        store.fail_always.store(true, Ordering::SeqCst);
        store
    }

    /// Number of PUT calls received so far.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Successful PUTs recorded so far.
    pub fn puts(&self) -> Vec<RecordedPut> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), ObjectStoreError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_always.load(Ordering::SeqCst) || call < self.fail_first.load(Ordering::SeqCst)
        {
            return Err(ObjectStoreError::PutFailed {
                key: key.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        self.puts.lock().unwrap().push(RecordedPut {
            key: key.to_string(),
            body,
            content_type: content_type.to_string(),
        });
        Ok(())
    }
}
