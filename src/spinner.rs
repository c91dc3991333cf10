//! Activity indicator for loading states.
//!
//! The spinner only ticks while it is active. Each accepted tick bumps a tag
//! and schedules the next one, so duplicate tick chains (for instance after a
//! quick stop/start) die out instead of making the spinner run fast.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use lipgloss_extras::prelude::*;
use once_cell::sync::Lazy;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Frames plus frame interval.
#[derive(Debug, Clone)]
pub struct Spinner {
    /// Frames shown in order.
    pub frames: Vec<String>,
    /// Time between frames.
    pub fps: Duration,
}

/// Braille dots; the default.
pub static DOT: Lazy<Spinner> = Lazy::new(|| Spinner {
    frames: ["⣾ ", "⣽ ", "⣻ ", "⢿ ", "⡿ ", "⣟ ", "⣯ ", "⣷ "]
        .iter()
        .map(|f| (*f).to_string())
        .collect(),
    fps: Duration::from_millis(100),
});

/// Plain ASCII line, for terminals without braille glyphs.
pub static LINE: Lazy<Spinner> = Lazy::new(|| Spinner {
    frames: ["|", "/", "-", "\\"].iter().map(|f| (*f).to_string()).collect(),
    fps: Duration::from_millis(100),
});

/// Advances one spinner by a frame.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// Spinner the tick belongs to.
    pub id: i64,
    tag: i64,
}

/// Spinner state.
#[derive(Debug, Clone)]
pub struct Model {
    spinner: Spinner,
    style: Style,
    frame: usize,
    id: i64,
    tag: i64,
    active: bool,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// A stopped spinner with the default frames.
    #[must_use]
    pub fn new() -> Self {
        Self {
            spinner: DOT.clone(),
            style: Style::new(),
            frame: 0,
            id: next_id(),
            tag: 0,
            active: false,
        }
    }

    /// Uses another frame set.
    #[must_use]
    pub fn with_spinner(mut self, spinner: Spinner) -> Self {
        self.spinner = spinner;
        self
    }

    /// Sets the frame style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Instance id carried by this spinner's ticks.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Whether the spinner is ticking.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Starts or stops the animation. Starting returns the first tick.
    pub fn set_active(&mut self, active: bool) -> Option<Cmd> {
        if active == self.active {
            return None;
        }
        self.active = active;
        self.tag += 1;
        if active {
            Some(self.tick())
        } else {
            self.frame = 0;
            None
        }
    }

    fn tick(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.spinner.fps, move |_| Box::new(TickMsg { id, tag }) as Msg)
    }

    /// Handles [`TickMsg`]s addressed to this spinner.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        let tick = msg.downcast_ref::<TickMsg>()?;
        if tick.id != self.id || tick.tag != self.tag || !self.active {
            return None;
        }
        self.frame = (self.frame + 1) % self.spinner.frames.len().max(1);
        self.tag += 1;
        Some(self.tick())
    }

    /// The current frame followed by a space, or nothing when stopped.
    #[must_use]
    pub fn view(&self) -> String {
        match self.spinner.frames.get(self.frame) {
            Some(frame) => self.style.render(frame),
            None => String::new(),
        }
    }
}
