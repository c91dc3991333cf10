//! Visibility-triggered "load more".
//!
//! The grid renders a sentinel row after its last card and reports where that
//! row sits relative to the viewport in a [`VisibilityMsg`]. When the sentinel
//! comes within `threshold` lines of the visible area, the loader enters a
//! short preparing phase and then emits a [`LoadMoreMsg`] for its owner.
//!
//! The loader never fires while its owner reports a load in progress or once
//! the owner reports there is nothing more to load. After firing it latches
//! until the owner reports its state again, so a burst of scroll events
//! between the fire and the owner's reaction cannot trigger a second request.
//!
//! # Example
//!
//! ```rust
//! use pokedex_tui::loader::{Loader, LoaderOptions, ScrollMetrics, Trigger};
//!
//! let mut loader = Loader::new(LoaderOptions::default());
//! loader.set_state(true, false);
//!
//! let metrics = ScrollMetrics { offset: 0, viewport_height: 20, content_height: 24, sentinel_row: Some(24) };
//! assert_eq!(loader.evaluate(&metrics), Trigger::Prepare);
//! assert!(loader.is_preparing());
//!
//! // The preparing timer fires: the owner is asked for more.
//! let done = loader.prepare_done_msg();
//! assert!(loader.finish_preparing(&done));
//! ```

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use serde::{Deserialize, Serialize};

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Default distance, in lines, at which the sentinel counts as visible.
pub const DEFAULT_THRESHOLD: usize = 8;

/// Default length of the preparing phase.
pub const DEFAULT_PREPARE_DELAY: Duration = Duration::from_millis(150);

/// How the loader decides the end of the list is near.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObserveMode {
    /// Watch the sentinel row; fires after the preparing phase.
    #[default]
    Intersection,
    /// Fallback for views without a sentinel: compare remaining content
    /// below the viewport against the threshold and fire immediately.
    ScrollEvents,
}

impl std::str::FromStr for ObserveMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "intersection" => Ok(Self::Intersection),
            "scroll-events" => Ok(Self::ScrollEvents),
            other => Err(format!(
                "unknown observe mode {other:?}; expected intersection or scroll-events"
            )),
        }
    }
}

/// The scrolling area the loader observes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScrollRoot {
    /// The main terminal viewport.
    #[default]
    Viewport,
    /// A named scrolling region inside the screen.
    Region(String),
}

/// Position of the scrolling content relative to its viewport, in lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    /// First visible content row.
    pub offset: usize,
    /// Rows the viewport shows.
    pub viewport_height: usize,
    /// Total content lines, the sentinel included.
    pub content_height: usize,
    /// Row of the sentinel, when one is rendered.
    pub sentinel_row: Option<usize>,
}

impl ScrollMetrics {
    /// Content lines below the last visible line.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.content_height
            .saturating_sub(self.offset + self.viewport_height)
    }

    /// Whether the sentinel lies within `threshold` lines of the visible area.
    #[must_use]
    pub fn sentinel_near(&self, threshold: usize) -> bool {
        let Some(row) = self.sentinel_row else {
            return false;
        };
        row + threshold >= self.offset && row < self.offset + self.viewport_height + threshold
    }
}

/// Loader configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Proximity margin in lines.
    pub threshold: usize,
    /// Scrolling area observed.
    pub root: ScrollRoot,
    /// Detection strategy.
    pub mode: ObserveMode,
    /// Length of the preparing phase.
    pub prepare_delay: Duration,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            root: ScrollRoot::Viewport,
            mode: ObserveMode::Intersection,
            prepare_delay: DEFAULT_PREPARE_DELAY,
        }
    }
}

/// Handle the grid attaches to the row it renders after its last card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelRef {
    /// Loader that handed out the sentinel.
    pub loader_id: i64,
    /// Area the sentinel is rendered in.
    pub root: ScrollRoot,
}

impl SentinelRef {
    /// Packs the current layout into a message addressed to the loader.
    #[must_use]
    pub fn visibility(&self, metrics: ScrollMetrics) -> VisibilityMsg {
        VisibilityMsg {
            loader_id: self.loader_id,
            root: self.root.clone(),
            metrics,
        }
    }
}

/// Layout report from the scrolling view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityMsg {
    /// Loader the report is for.
    pub loader_id: i64,
    /// Area the report describes.
    pub root: ScrollRoot,
    /// Current layout.
    pub metrics: ScrollMetrics,
}

/// End of the preparing phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareDoneMsg {
    /// Loader that started the timer.
    pub id: i64,
    tag: i64,
}

/// The owner should load the next page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadMoreMsg {
    /// Loader that fired.
    pub id: i64,
}

/// Outcome of evaluating a layout report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Nothing to do.
    Ignore,
    /// Preparing phase started; a [`PrepareDoneMsg`] is due.
    Prepare,
    /// Load more now.
    Fire,
}

/// Sentinel observer.
#[derive(Debug, Clone)]
pub struct Loader {
    id: i64,
    tag: i64,
    options: LoaderOptions,
    attached: bool,
    has_more: bool,
    is_loading: bool,
    latched: bool,
    preparing: bool,
}

impl Loader {
    /// An attached loader that will not fire until [`set_state`](Self::set_state) reports more to load.
    #[must_use]
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            id: next_id(),
            tag: 0,
            options,
            attached: true,
            has_more: false,
            is_loading: false,
            latched: false,
            preparing: false,
        }
    }

    /// Instance id carried by this loader's messages.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Handle for the sentinel row, `None` while released.
    #[must_use]
    pub fn sentinel(&self) -> Option<SentinelRef> {
        self.attached.then(|| SentinelRef {
            loader_id: self.id,
            root: self.options.root.clone(),
        })
    }

    /// Whether the preparing phase is running.
    #[must_use]
    pub fn is_preparing(&self) -> bool {
        self.preparing
    }

    /// Owner state. Also clears the post-fire latch.
    pub fn set_state(&mut self, has_more: bool, is_loading: bool) {
        self.has_more = has_more;
        self.is_loading = is_loading;
        self.latched = false;
        if !has_more && self.preparing {
            // Nothing left to prepare for; drop the pending timer.
            self.preparing = false;
            self.tag += 1;
        }
    }

    fn can_fire(&self) -> bool {
        self.attached && self.has_more && !self.is_loading && !self.latched
    }

    /// Decides what a layout report means, updating preparing/latch state.
    pub fn evaluate(&mut self, metrics: &ScrollMetrics) -> Trigger {
        if !self.can_fire() || self.preparing {
            return Trigger::Ignore;
        }
        match self.options.mode {
            ObserveMode::Intersection => {
                if !metrics.sentinel_near(self.options.threshold) {
                    return Trigger::Ignore;
                }
                self.preparing = true;
                self.tag += 1;
                tracing::debug!(target: "pokedex::loader", id = self.id, "sentinel in range, preparing");
                Trigger::Prepare
            }
            ObserveMode::ScrollEvents => {
                if metrics.remaining() > self.options.threshold {
                    return Trigger::Ignore;
                }
                self.latched = true;
                tracing::debug!(target: "pokedex::loader", id = self.id, "scroll end reached");
                Trigger::Fire
            }
        }
    }

    /// The message the current preparing timer will deliver.
    #[must_use]
    pub fn prepare_done_msg(&self) -> PrepareDoneMsg {
        PrepareDoneMsg {
            id: self.id,
            tag: self.tag,
        }
    }

    /// Ends the preparing phase; returns whether the owner should load more.
    pub fn finish_preparing(&mut self, msg: &PrepareDoneMsg) -> bool {
        if msg.id != self.id || msg.tag != self.tag || !self.preparing {
            return false;
        }
        self.preparing = false;
        if !self.can_fire() {
            return false;
        }
        self.latched = true;
        tracing::debug!(target: "pokedex::loader", id = self.id, "load more");
        true
    }

    /// Routes loader messages; returns the follow-up command, if any.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if let Some(visibility) = msg.downcast_ref::<VisibilityMsg>() {
            if visibility.loader_id != self.id || visibility.root != self.options.root {
                return None;
            }
            return match self.evaluate(&visibility.metrics) {
                Trigger::Ignore => None,
                Trigger::Prepare => Some(self.prepare_cmd()),
                Trigger::Fire => Some(self.load_more_cmd()),
            };
        }

        if let Some(done) = msg.downcast_ref::<PrepareDoneMsg>() {
            if self.finish_preparing(done) {
                return Some(self.load_more_cmd());
            }
        }

        None
    }

    fn prepare_cmd(&self) -> Cmd {
        let done = self.prepare_done_msg();
        bubbletea_tick(self.options.prepare_delay, move |_| Box::new(done.clone()) as Msg)
    }

    fn load_more_cmd(&self) -> Cmd {
        let id = self.id;
        Box::pin(async move { Some(Box::new(LoadMoreMsg { id }) as Msg) })
    }

    /// Stops observing. Pending preparing timers become stale.
    pub fn release(&mut self) {
        self.attached = false;
        self.preparing = false;
        self.tag += 1;
    }

    /// Releases, then observes again with new options.
    pub fn reconfigure(&mut self, options: LoaderOptions) {
        self.release();
        self.options = options;
        self.attached = true;
    }
}
