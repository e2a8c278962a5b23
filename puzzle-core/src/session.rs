/// Reported once, when the last piece snaps.
#[derive(Clone, Debug, PartialEq)]
pub struct Completion {
    pub elapsed_ms: f64,
    pub time_label: String,
}

/// Score and clock for one puzzle run.
///
/// The clock starts on the first drag movement of the run and stops on
/// completion. Both transitions happen at most once until `reset`.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    correct: usize,
    total: usize,
    start_ms: Option<f64>,
    stop_ms: Option<f64>,
    completed: bool,
}

impl SessionState {
    pub fn new(total: usize) -> Self {
        SessionState {
            total,
            ..Default::default()
        }
    }

    pub fn reset(&mut self, total: usize) {
        *self = SessionState::new(total);
    }

    pub fn correct_count(&self) -> usize {
        self.correct
    }

    pub fn total_pieces(&self) -> usize {
        self.total
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn started_at(&self) -> Option<f64> {
        self.start_ms
    }

    /// Returns `true` only for the call that actually started the clock.
    pub fn start_timer(&mut self, now: f64) -> bool {
        if self.start_ms.is_some() || self.stop_ms.is_some() {
            return false;
        }
        self.start_ms = Some(now);
        log::info!("timer started");
        true
    }

    pub fn stop_timer(&mut self, now: f64) -> bool {
        if self.stop_ms.is_some() {
            return false;
        }
        self.stop_ms = Some(now);
        true
    }

    pub fn elapsed_ms(&self, now: f64) -> f64 {
        match (self.start_ms, self.stop_ms) {
            (Some(start), Some(stop)) => (stop - start).max(0.0),
            (Some(start), None) => (now - start).max(0.0),
            (None, _) => 0.0,
        }
    }

    pub fn timer_label(&self, now: f64) -> String {
        format_mm_ss(self.elapsed_ms(now))
    }

    pub fn score_label(&self) -> String {
        format!("{} / {}", self.correct, self.total)
    }

    /// Count one snapped piece. Yields the completion exactly once, when the
    /// count first reaches the total.
    pub fn record_correct(&mut self, now: f64) -> Option<Completion> {
        if self.completed {
            return None;
        }
        self.correct += 1;
        if self.correct < self.total {
            return None;
        }
        self.completed = true;
        self.stop_timer(now);
        let elapsed_ms = self.elapsed_ms(now);
        log::info!("puzzle completed in {}", format_mm_ss(elapsed_ms));
        Some(Completion {
            elapsed_ms,
            time_label: format_mm_ss(elapsed_ms),
        })
    }
}

/// Whole seconds as `mm:ss`; minutes keep counting past 59.
pub fn format_mm_ss(ms: f64) -> String {
    let secs = (ms.max(0.0) / 1000.0).floor() as u64;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn congratulations(time_label: &str) -> String {
    format!("Congratulations! You completed the map in {time_label}.")
}
