//! Cancellable delayed delivery of the search term.
//!
//! Each [`Debouncer::schedule`] bumps an internal tag and returns a tick
//! command carrying that tag. When the tick arrives as a [`DebounceMsg`], only
//! the message with the latest tag is accepted; everything scheduled before it,
//! or before a [`Debouncer::cancel`], is dropped on arrival.
//!
//! ```rust
//! use pokedex_tui::debounce::{DebounceMsg, Debouncer};
//! use std::time::Duration;
//!
//! let mut debouncer = Debouncer::new(Duration::from_millis(300));
//! let _first = debouncer.schedule("pika");
//! let _second = debouncer.schedule("pikachu");
//!
//! // The first tick fires with a stale tag and is ignored.
//! let stale = DebounceMsg { id: debouncer.id(), tag: 1, value: "pika".into() };
//! assert_eq!(debouncer.accept(&stale), None);
//! ```

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Fired when a scheduled delay elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebounceMsg {
    /// Debouncer that scheduled the delay.
    pub id: i64,
    /// Schedule sequence number; only the latest is honored.
    pub tag: i64,
    /// Value captured at schedule time.
    pub value: String,
}

/// Timer handle for one debounced input.
#[derive(Debug, Clone)]
pub struct Debouncer {
    id: i64,
    tag: i64,
    delay: Duration,
    pending: bool,
}

impl Debouncer {
    /// Creates a debouncer with its own id.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            id: next_id(),
            tag: 0,
            delay,
            pending: false,
        }
    }

    /// Instance id carried by this debouncer's messages.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Delay before a scheduled value is delivered.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a scheduled value has not been delivered or cancelled yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Supersedes any pending delay and schedules `value` after the delay.
    pub fn schedule(&mut self, value: impl Into<String>) -> Cmd {
        self.tag += 1;
        self.pending = true;
        let id = self.id;
        let tag = self.tag;
        let value = value.into();
        bubbletea_tick(self.delay, move |_| {
            Box::new(DebounceMsg {
                id,
                tag,
                value: value.clone(),
            }) as Msg
        })
    }

    /// Invalidates the pending delay, if any.
    pub fn cancel(&mut self) {
        if self.pending {
            self.tag += 1;
            self.pending = false;
        }
    }

    /// Returns the value when `msg` is the latest tick for this debouncer.
    pub fn accept(&mut self, msg: &DebounceMsg) -> Option<String> {
        if msg.id != self.id || msg.tag != self.tag || !self.pending {
            return None;
        }
        self.pending = false;
        Some(msg.value.clone())
    }
}
