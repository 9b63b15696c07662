use crate::store::{DocumentStore, StoredDocument};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::JoinHandle;

type WriteKey = (String, String);

#[derive(Default)]
struct WriterState {
    pending: HashMap<WriteKey, StoredDocument>,
    order: VecDeque<WriteKey>,
    in_flight: Option<WriteKey>,
    committed: HashMap<WriteKey, String>,
    failures: usize,
    shutdown: bool,
}

impl WriterState {
    fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.in_flight.is_none()
    }
}

struct Shared {
    state: Mutex<WriterState>,
    wake: Condvar,
    idle: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, WriterState> {
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }
}

/// Background persistence for editor snapshots.
///
/// Callers enqueue and return immediately. A single worker thread commits
/// snapshots one at a time; while a write is in flight, newer snapshots for
/// the same key replace the pending one, so each key commits in issuance
/// order and at most one write per key is outstanding. Failed writes are
/// logged and dropped.
pub struct DocumentWriter {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl DocumentWriter {
    pub fn spawn(store: Arc<dyn DocumentStore>) -> std::io::Result<Self> {
        let shared = Arc::new(Shared {
            state: Mutex::new(WriterState::default()),
            wake: Condvar::new(),
            idle: Condvar::new(),
        });
        let worker = Arc::clone(&shared);
        let handle = std::thread::Builder::new()
            .name("draftly-writer".into())
            .spawn(move || run_worker(&worker, store.as_ref()))?;
        Ok(Self {
            shared,
            handle: Some(handle),
        })
    }

    /// Queues `value` for `store`, replacing any snapshot still waiting for
    /// the same key.
    pub fn enqueue(&self, store: &str, value: StoredDocument) {
        let key = (store.to_string(), value.id.clone());
        let mut state = self.shared.lock();
        if state.pending.insert(key.clone(), value).is_none() {
            state.order.push_back(key);
        }
        self.shared.wake.notify_one();
    }

    /// Blocks until every queued snapshot has been written or dropped.
    pub fn flush(&self) {
        let mut state = self.shared.lock();
        while !state.is_idle() {
            state = self
                .shared
                .idle
                .wait(state)
                .unwrap_or_else(|err| err.into_inner());
        }
    }

    pub fn failure_count(&self) -> usize {
        self.shared.lock().failures
    }
}

impl Drop for DocumentWriter {
    fn drop(&mut self) {
        {
            let mut state = self.shared.lock();
            state.shutdown = true;
        }
        self.shared.wake.notify_all();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("document writer thread panicked");
            }
        }
    }
}

fn run_worker(shared: &Shared, store: &dyn DocumentStore) {
    loop {
        let (key, value, last_digest) = {
            let mut state = shared.lock();
            loop {
                if let Some(key) = state.order.pop_front() {
                    if let Some(value) = state.pending.remove(&key) {
                        state.in_flight = Some(key.clone());
                        let last = state.committed.get(&key).cloned();
                        break (key, value, last);
                    }
                    continue;
                }
                if state.shutdown {
                    return;
                }
                state = shared.wake.wait(state).unwrap_or_else(|err| err.into_inner());
            }
        };

        let digest = content_digest(&value);
        let outcome = if digest.is_some() && digest == last_digest {
            tracing::debug!(store = %key.0, id = %key.1, "skipping unchanged snapshot");
            Ok(())
        } else {
            store.put(&key.0, &value)
        };

        let mut state = shared.lock();
        match outcome {
            Ok(()) => {
                if let Some(digest) = digest {
                    state.committed.insert(key.clone(), digest);
                }
            }
            Err(err) => {
                state.failures += 1;
                tracing::error!(store = %key.0, id = %key.1, error = ?err, "failed to save document");
            }
        }
        state.in_flight = None;
        if state.is_idle() {
            shared.idle.notify_all();
        }
    }
}

/// SHA-256 over the serialized blocks. The timestamp is left out so a
/// snapshot with identical blocks is recognised as unchanged.
fn content_digest(value: &StoredDocument) -> Option<String> {
    let bytes = serde_json::to_vec(&value.content).ok()?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Some(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::DocumentWriter;
    use crate::blocks::{Block, BlockId, BlockType};
    use crate::store::{DocumentStore, MemoryStore, StoreError, StoredDocument};
    use std::sync::{Arc, Mutex};

    fn snapshot(text: &str) -> StoredDocument {
        StoredDocument::new(
            "root-editor",
            vec![Block::new(BlockId::new("a"), BlockType::Text, text)],
        )
    }

    #[derive(Default)]
    struct RecordingStore {
        writes: Mutex<Vec<String>>,
    }

    impl DocumentStore for RecordingStore {
        fn get(&self, _store: &str, _id: &str) -> Result<Option<StoredDocument>, StoreError> {
            Ok(None)
        }

        fn put(&self, _store: &str, value: &StoredDocument) -> Result<(), StoreError> {
            let mut writes = self.writes.lock().expect("lock");
            writes.push(value.content[0].content.clone());
            Ok(())
        }
    }

    #[test]
    fn writes_land_in_issue_order() {
        let store = Arc::new(RecordingStore::default());
        let writer = DocumentWriter::spawn(store.clone()).expect("spawn");
        for text in ["h", "he", "hel", "hell", "hello"] {
            writer.enqueue("notes", snapshot(text));
        }
        writer.flush();

        let writes = store.writes.lock().expect("lock").clone();
        assert!(!writes.is_empty());
        assert_eq!(writes.last().map(String::as_str), Some("hello"));
        let mut sorted = writes.clone();
        sorted.sort_by_key(|text| text.len());
        assert_eq!(writes, sorted);
    }

    #[test]
    fn unchanged_snapshot_is_skipped() {
        let store = Arc::new(MemoryStore::new());
        let writer = DocumentWriter::spawn(store.clone()).expect("spawn");
        writer.enqueue("notes", snapshot("same"));
        writer.flush();
        writer.enqueue("notes", snapshot("same"));
        writer.flush();
        assert_eq!(store.put_count(), 1);
    }

    #[test]
    fn failed_write_is_counted_and_swallowed() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_writes(true);
        let writer = DocumentWriter::spawn(store.clone()).expect("spawn");
        writer.enqueue("notes", snapshot("lost"));
        writer.flush();
        assert_eq!(writer.failure_count(), 1);

        store.set_fail_writes(false);
        writer.enqueue("notes", snapshot("lost"));
        writer.flush();
        assert_eq!(store.put_count(), 1);
    }

    #[test]
    fn drop_drains_pending_writes() {
        let store = Arc::new(MemoryStore::new());
        {
            let writer = DocumentWriter::spawn(store.clone()).expect("spawn");
            writer.enqueue("notes", snapshot("final"));
        }
        let saved = store
            .get("notes", "root-editor")
            .expect("get")
            .expect("saved");
        assert_eq!(saved.content[0].content, "final");
    }
}
