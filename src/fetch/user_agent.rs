//! User-agent rotation
//!
//! Every request picks the next agent from a fixed list. The cursor is an
//! atomic counter so clones of one [`UserAgentPool`] handed to concurrent
//! fetches keep rotating through the same sequence.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Round-robin pool of user-agent strings
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Arc<[String]>,
    cursor: Arc<AtomicUsize>,
}

impl UserAgentPool {
    /// Creates a pool; an empty list yields no user-agent header at all
    pub fn new(agents: Vec<String>) -> Self {
        Self {
            agents: agents.into(),
            cursor: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns the next agent in rotation
    pub fn next_agent(&self) -> Option<&str> {
        if self.agents.is_empty() {
            return None;
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.agents.len();
        Some(self.agents[index].as_str())
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
