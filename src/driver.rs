//! Frame driver: the Running/Suspended state machine behind the render loop.
//!
//! The driver models the platform frame-callback primitive explicitly.  While
//! running, exactly one [`FrameHandle`] is outstanding; the host runs that
//! frame and the driver issues the next handle when the frame finishes.
//! Cancelling drops the outstanding handle, so a frame requested before the
//! cancellation can never execute after it.

/// Token for the single outstanding frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverState {
    Running,
    #[default]
    Suspended,
}

/// Elapsed time and measured rate for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    /// Milliseconds since the previous frame; zero on the first frame.
    pub delta_ms: f64,
    /// Instantaneous frame rate, `None` when it cannot be measured.
    pub fps: Option<f64>,
}

/// `1000 / delta` when the delta is finite and positive.
pub fn measure_fps(delta_ms: f64) -> Option<f64> {
    (delta_ms.is_finite() && delta_ms > 0.0).then(|| 1000.0 / delta_ms)
}

#[derive(Debug, Default)]
pub struct FrameDriver {
    state: DriverState,
    last_timestamp: Option<f64>,
    pending: Option<FrameHandle>,
    next_id: u64,
    clear_requested: bool,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    /// The frame the host should run next, if any.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Enter Running with no timing history and request the first frame.
    pub fn start(&mut self) {
        self.state = DriverState::Running;
        self.last_timestamp = None;
        self.clear_requested = false;
        self.request_frame();
    }

    /// Enter Suspended, cancel the outstanding frame and ask for one clear.
    pub fn suspend(&mut self) {
        self.state = DriverState::Suspended;
        self.last_timestamp = None;
        self.cancel();
        self.clear_requested = true;
    }

    /// Drop the outstanding frame request.  Safe to call repeatedly.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Consume `handle` and compute this frame's timing.
    ///
    /// Returns `None` for a handle that is not the outstanding one (stale or
    /// cancelled); the caller must then do nothing.
    pub fn begin_frame(&mut self, handle: FrameHandle, timestamp: f64) -> Option<FrameTiming> {
        if self.state != DriverState::Running || self.pending != Some(handle) {
            return None;
        }
        self.pending = None;

        let delta_ms = match self.last_timestamp {
            Some(last) if timestamp.is_finite() => (timestamp - last).max(0.0),
            _ => 0.0,
        };
        Some(FrameTiming {
            delta_ms,
            fps: self.last_timestamp.and(measure_fps(delta_ms)),
        })
    }

    /// Record `timestamp` and request the next frame unless the loop should
    /// stop.
    pub fn finish_frame(&mut self, timestamp: f64, keep_running: bool) {
        if timestamp.is_finite() {
            self.last_timestamp = Some(timestamp);
        }
        if !keep_running {
            self.suspend();
            return;
        }
        if self.is_running() && self.pending.is_none() {
            self.request_frame();
        }
    }

    /// True exactly once after a suspension.
    pub fn take_clear_request(&mut self) -> bool {
        std::mem::take(&mut self.clear_requested)
    }

    fn request_frame(&mut self) {
        self.next_id += 1;
        self.pending = Some(FrameHandle(self.next_id));
    }
}
