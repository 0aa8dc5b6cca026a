//! Bounded per-session conversation history.
//!
//! Sessions live in an LRU cache so long-running processes cannot accumulate
//! session keys without bound; each session keeps its most recent N turns,
//! dropping the oldest on overflow. One lock serializes append/read per
//! store, which also serializes them per session.

use lru::LruCache;
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use newsqa_core::config::SessionConfig;
use newsqa_core::types::ConversationTurn;

pub struct ConversationStore {
    sessions: Mutex<LruCache<String, VecDeque<ConversationTurn>>>,
    max_turns: usize,
}

impl ConversationStore {
    pub fn new(config: &SessionConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_sessions).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: Mutex::new(LruCache::new(capacity)),
            max_turns: config.max_turns.max(1),
        }
    }

    pub fn append(&self, session_id: &str, turn: ConversationTurn) {
        let Ok(mut sessions) = self.sessions.lock() else {
            return;
        };
        if sessions.peek(session_id).is_none() && sessions.len() == sessions.cap().get() {
            tracing::debug!("session store full, evicting least recently used session");
        }
        let turns = sessions.get_or_insert_mut(session_id.to_string(), VecDeque::new);
        turns.push_back(turn);
        while turns.len() > self.max_turns {
            turns.pop_front();
        }
    }

    /// Oldest-first history for a session; empty for unknown sessions.
    pub fn read(&self, session_id: &str) -> Vec<ConversationTurn> {
        let Ok(mut sessions) = self.sessions.lock() else {
            return Vec::new();
        };
        sessions
            .get(session_id)
            .map(|turns| turns.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear(&self, session_id: &str) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.pop(session_id);
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(max_turns: usize, max_sessions: usize) -> ConversationStore {
        ConversationStore::new(&SessionConfig {
            max_turns,
            max_sessions,
            history_in_prompt: 3,
        })
    }

    #[test]
    fn overflow_drops_the_oldest_turn() {
        let store = store(10, 4);
        for i in 0..11 {
            store.append("s1", ConversationTurn::user(format!("turn {i}")));
        }
        let turns = store.read("s1");
        assert_eq!(turns.len(), 10);
        assert_eq!(turns[0].content, "turn 1", "oldest turn was dropped");
        assert_eq!(turns[9].content, "turn 10");
    }

    #[test]
    fn sessions_are_isolated() {
        let store = store(10, 4);
        store.append("s1", ConversationTurn::user("hello"));
        assert!(store.read("s2").is_empty());
        assert_eq!(store.read("s1").len(), 1);
    }

    #[test]
    fn clear_removes_a_session() {
        let store = store(10, 4);
        store.append("s1", ConversationTurn::user("hello"));
        store.clear("s1");
        assert!(store.read("s1").is_empty());
        assert_eq!(store.session_count(), 0);
    }

    #[test]
    fn session_cache_evicts_least_recently_used() {
        let store = store(10, 2);
        store.append("s1", ConversationTurn::user("one"));
        store.append("s2", ConversationTurn::user("two"));
        store.append("s1", ConversationTurn::user("again"));
        store.append("s3", ConversationTurn::user("three"));

        assert_eq!(store.session_count(), 2);
        assert!(store.read("s2").is_empty(), "s2 was the least recently used");
        assert_eq!(store.read("s1").len(), 2);
    }
}
