//! Per-conversation mutual exclusion for read-modify-write of checkpoints.

use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Async locks keyed by conversation id.
///
/// Two turns of the same conversation would otherwise both read the same
/// checkpoint and archive overlapping slices. Unused entries are pruned on
/// each acquire.
#[derive(Debug, Clone, Default)]
pub struct ConversationLocks {
    locks: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

/// Held while a conversation turn is processed; releases on drop.
#[derive(Debug)]
pub struct ConversationGuard {
    _guard: OwnedMutexGuard<()>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a conversation.
    pub async fn acquire(&self, conversation_id: &str) -> ConversationGuard {
        let lock = {
            let mut locks = self.locks.lock();
            // An entry only referenced by the map has no holder or waiter.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry(conversation_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        debug!("acquiring conversation lock (conversation_id={})", conversation_id);
        ConversationGuard {
            _guard: lock.lock_owned().await,
        }
    }

    /// Number of conversations with a live lock entry.
    pub fn tracked(&self) -> usize {
        self.locks.lock().len()
    }
}
