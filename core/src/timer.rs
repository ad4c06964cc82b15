use alloc::rc::Rc;
use core::cell::Cell as SharedCell;
use core::time::Duration;
use web_time::Instant;

/// Monotonic time source, measured from an arbitrary fixed origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`web_time::Instant`], usable on native and wasm hosts.
#[derive(Copy, Clone, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<SharedCell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Elapsed-time ticker for a running game.
///
/// The host drives it from its own periodic callback (see [`Ticker::PERIOD`])
/// by calling `BoardEngine::tick`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Ticker {
    started_at: Option<Duration>,
}

impl Ticker {
    pub const PERIOD: Duration = Duration::from_secs(1);

    /// Returns `false` if the ticker was already running.
    pub fn start(&mut self, now: Duration) -> bool {
        if self.started_at.is_some() {
            return false;
        }
        self.started_at = Some(now);
        true
    }

    /// Returns `false` if the ticker was not running.
    pub fn stop(&mut self) -> bool {
        self.started_at.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    /// Whole seconds since start, `None` while stopped.
    pub fn elapsed_seconds(&self, now: Duration) -> Option<u32> {
        let started_at = self.started_at?;
        let secs = now.saturating_sub(started_at).as_secs();
        Some(secs.try_into().unwrap_or(u32::MAX))
    }
}
