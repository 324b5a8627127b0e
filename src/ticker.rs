//! Display-refresh tick scheduling for decoupled consumption.
//!
//! In decoupled mode the pipeline does not push angles to the render sink
//! per sample; instead it registers a zero-argument callback with a
//! [`DisplayTicker`] and the host fires it once per display refresh.

use std::time::Duration;

/// Callback invoked once per display refresh
pub type TickCallback = Box<dyn FnMut() + Send>;

/// External scheduler standing in for the platform's display link.
///
/// The pipeline registers on `start()` and deregisters on `stop()`;
/// `deregister` must be a no-op when nothing is registered.
pub trait DisplayTicker {
    /// Install the callback to fire on each refresh
    fn register(&mut self, callback: TickCallback);

    /// Remove the installed callback, if any
    fn deregister(&mut self);
}

/// Ticker fired explicitly by the host via [`tick`](ManualTicker::tick).
///
/// For hosts that already have a vsync-driven render loop.
#[derive(Default)]
pub struct ManualTicker {
    callback: Option<TickCallback>,
}

impl ManualTicker {
    /// Create an empty ticker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the registered callback once.
    ///
    /// Returns false if nothing is registered.
    pub fn tick(&mut self) -> bool {
        match &mut self.callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// True if a callback is registered
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.callback.is_some()
    }
}

impl DisplayTicker for ManualTicker {
    fn register(&mut self, callback: TickCallback) {
        self.callback = Some(callback);
    }

    fn deregister(&mut self) {
        self.callback = None;
    }
}

/// Ticker that fires on a fixed interval of advanced time.
///
/// The host advances it alongside the motion source from a single loop, so
/// sensor and display cadences stay independent without a second thread.
pub struct IntervalTicker {
    interval: Duration,
    pending: Duration,
    callback: Option<TickCallback>,
}

impl IntervalTicker {
    /// Create a ticker firing once per `interval` of advanced time
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: Duration::ZERO,
            callback: None,
        }
    }

    /// Create a ticker from a refresh rate in Hz
    #[must_use]
    pub fn from_refresh_rate(hz: f64) -> Self {
        Self::new(Duration::from_secs_f64(1.0 / hz))
    }

    /// Advance the ticker's clock, firing the callback once per elapsed
    /// interval. Returns the number of ticks fired.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if self.callback.is_none() {
            return 0;
        }

        self.pending += dt;
        let mut fired = 0;

        while self.pending >= self.interval {
            self.pending -= self.interval;
            if let Some(callback) = &mut self.callback {
                callback();
            }
            fired += 1;
        }

        fired
    }
}

impl DisplayTicker for IntervalTicker {
    fn register(&mut self, callback: TickCallback) {
        self.callback = Some(callback);
    }

    fn deregister(&mut self) {
        self.callback = None;
        self.pending = Duration::ZERO;
    }
}
