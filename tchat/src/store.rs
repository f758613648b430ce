//! Per-provider, per-thread conversation logs with per-thread exclusion.
//!
//! The outer map lock is only held to look up or insert a thread handle.
//! All reads and writes of a thread's log go through that thread's own async
//! lock, so work on distinct threads never waits on each other.
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use tchat::ConversationStore;
//! use tcommon::ThreadId;
//! use tprovider::{Message, Role};
//!
//! let store = ConversationStore::new();
//! let thread = ThreadId::from("thread_1");
//! store.register(thread.clone());
//!
//! let mut log = store.lock(&thread).await.expect("registered thread");
//! log.append(Message::new(Role::User, "hi"));
//! drop(log);
//!
//! assert_eq!(store.history(&thread).await.len(), 1);
//! assert!(store.clear(&thread).await);
//! assert!(store.history(&thread).await.is_empty());
//! # }
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tcommon::ThreadId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tprovider::Message;

#[derive(Debug, Default)]
struct ThreadEntry {
    messages: Vec<Message>,
    remote_id: Option<ThreadId>,
}

type ThreadHandle = Arc<AsyncMutex<ThreadEntry>>;

#[derive(Debug, Default)]
pub struct ConversationStore {
    threads: Mutex<HashMap<ThreadId, ThreadHandle>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    // The map stays structurally valid if a holder panicked.
    fn threads(&self) -> MutexGuard<'_, HashMap<ThreadId, ThreadHandle>> {
        self.threads.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handle(&self, thread_id: &ThreadId) -> Option<ThreadHandle> {
        self.threads().get(thread_id).cloned()
    }

    /// Registers an empty thread. Returns `false` if the id is already known.
    pub fn register(&self, thread_id: ThreadId) -> bool {
        self.insert(thread_id, ThreadEntry::default())
    }

    /// Registers an empty thread bound to a backend-side thread.
    pub fn register_remote(&self, thread_id: ThreadId, remote_id: ThreadId) -> bool {
        self.insert(
            thread_id,
            ThreadEntry {
                messages: Vec::new(),
                remote_id: Some(remote_id),
            },
        )
    }

    fn insert(&self, thread_id: ThreadId, entry: ThreadEntry) -> bool {
        match self.threads().entry(thread_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(AsyncMutex::new(entry)));
                true
            }
        }
    }

    pub fn contains(&self, thread_id: &ThreadId) -> bool {
        self.threads().contains_key(thread_id)
    }

    /// Exclusive access to one thread's log; waits for any in-flight holder.
    pub async fn lock(&self, thread_id: &ThreadId) -> Option<ThreadLog> {
        let handle = self.handle(thread_id)?;
        let entry = handle.lock_owned().await;
        Some(ThreadLog {
            thread_id: thread_id.clone(),
            entry,
        })
    }

    /// Snapshot of the log; empty for unknown threads.
    ///
    /// Takes the same per-thread lock as a send, so a read on a thread with an
    /// exchange in flight waits until that exchange finishes. For run-based
    /// adapters this is bounded by the poll policy's `max_wait`.
    pub async fn history(&self, thread_id: &ThreadId) -> Vec<Message> {
        match self.lock(thread_id).await {
            Some(log) => log.messages().to_vec(),
            None => Vec::new(),
        }
    }

    /// Truncates the log and drops any remote binding. `false` for unknown threads.
    pub async fn clear(&self, thread_id: &ThreadId) -> bool {
        match self.lock(thread_id).await {
            Some(mut log) => {
                log.clear();
                true
            }
            None => false,
        }
    }

    pub fn thread_count(&self) -> usize {
        self.threads().len()
    }
}

/// Guard over one thread's log; released on drop.
#[derive(Debug)]
pub struct ThreadLog {
    thread_id: ThreadId,
    entry: OwnedMutexGuard<ThreadEntry>,
}

impl ThreadLog {
    pub fn thread_id(&self) -> &ThreadId {
        &self.thread_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.entry.messages
    }

    pub fn is_empty(&self) -> bool {
        self.entry.messages.is_empty()
    }

    pub fn append(&mut self, message: Message) {
        self.entry.messages.push(message);
    }

    pub fn remote_id(&self) -> Option<&ThreadId> {
        self.entry.remote_id.as_ref()
    }

    pub fn bind_remote(&mut self, remote_id: ThreadId) {
        self.entry.remote_id = Some(remote_id);
    }

    pub fn clear(&mut self) {
        self.entry.messages.clear();
        self.entry.remote_id = None;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tprovider::Role;

    use super::*;

    #[tokio::test]
    async fn register_is_idempotent_and_does_not_reset_the_log() {
        let store = ConversationStore::new();
        let thread = ThreadId::from("thread_a");

        assert!(store.register(thread.clone()));
        store
            .lock(&thread)
            .await
            .expect("thread")
            .append(Message::new(Role::User, "hi"));

        assert!(!store.register(thread.clone()));
        assert_eq!(store.history(&thread).await.len(), 1);
        assert_eq!(store.thread_count(), 1);
    }

    #[tokio::test]
    async fn unknown_threads_are_empty_and_not_clearable() {
        let store = ConversationStore::new();
        let known = ThreadId::from("thread_known");
        store.register(known.clone());
        store
            .lock(&known)
            .await
            .expect("thread")
            .append(Message::new(Role::User, "keep me"));

        let unknown = ThreadId::from("thread_missing");
        assert!(store.lock(&unknown).await.is_none());
        assert!(store.history(&unknown).await.is_empty());
        assert!(!store.clear(&unknown).await);
        assert_eq!(store.history(&known).await.len(), 1);
    }

    #[tokio::test]
    async fn clear_truncates_and_unbinds_remote() {
        let store = ConversationStore::new();
        let thread = ThreadId::from("thread_r");
        store.register_remote(thread.clone(), ThreadId::from("remote_1"));

        {
            let mut log = store.lock(&thread).await.expect("thread");
            assert_eq!(log.remote_id(), Some(&ThreadId::from("remote_1")));
            log.append(Message::new(Role::User, "a"));
            log.append(Message::new(Role::Assistant, "b"));
        }

        assert!(store.clear(&thread).await);

        let log = store.lock(&thread).await.expect("thread");
        assert!(log.is_empty());
        assert!(log.remote_id().is_none());
    }

    #[tokio::test]
    async fn holder_of_one_thread_does_not_block_another() {
        let store = Arc::new(ConversationStore::new());
        let first = ThreadId::from("thread_1");
        let second = ThreadId::from("thread_2");
        store.register(first.clone());
        store.register(second.clone());

        let _held = store.lock(&first).await.expect("first");

        let other = tokio::time::timeout(Duration::from_secs(1), store.lock(&second))
            .await
            .expect("distinct thread should not wait");
        assert!(other.is_some());

        let same = tokio::time::timeout(Duration::from_millis(50), store.lock(&first)).await;
        assert!(same.is_err(), "same thread must wait for the holder");
    }

    #[tokio::test(start_paused = true)]
    async fn history_waits_for_an_exchange_in_flight() {
        let store = Arc::new(ConversationStore::new());
        let thread = ThreadId::from("thread_busy");
        store.register(thread.clone());

        let mut log = store.lock(&thread).await.expect("thread");
        let blocked = tokio::time::timeout(Duration::from_millis(50), store.history(&thread)).await;
        assert!(blocked.is_err(), "history must wait for the in-flight exchange");

        log.append(Message::new(Role::User, "q"));
        log.append(Message::new(Role::Assistant, "a"));
        drop(log);

        assert_eq!(store.history(&thread).await.len(), 2);
    }
}
