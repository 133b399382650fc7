use std::num::NonZeroU32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerState {
    Stopped,
    Ticking,
}

/// Identifies one run of the timer. Ticks scheduled for an earlier run
/// carry a stale handle and are dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Ignored,
    Ticked { remaining: u32 },
    Expired,
}

/// Whole-second countdown. Holds no clock; the caller delivers one tick per
/// elapsed second.
#[derive(Debug)]
pub struct SessionTimer {
    state: TimerState,
    duration: u32,
    remaining: u32,
    generation: u64,
}

impl SessionTimer {
    pub fn new(duration: NonZeroU32) -> Self {
        Self {
            state: TimerState::Stopped,
            duration: duration.get(),
            remaining: duration.get(),
            generation: 0,
        }
    }

    /// Begins a new run. Returns the live handle unchanged when already ticking.
    pub fn start(&mut self, duration: NonZeroU32) -> TimerHandle {
        if self.state == TimerState::Ticking {
            return TimerHandle(self.generation);
        }

        self.generation += 1;
        self.state = TimerState::Ticking;
        self.duration = duration.get();
        self.remaining = duration.get();
        TimerHandle(self.generation)
    }

    pub fn tick(&mut self, handle: TimerHandle) -> TickOutcome {
        if self.state != TimerState::Ticking || handle.0 != self.generation {
            return TickOutcome::Ignored;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = TimerState::Stopped;
            TickOutcome::Expired
        } else {
            TickOutcome::Ticked {
                remaining: self.remaining,
            }
        }
    }

    pub fn stop(&mut self) {
        self.state = TimerState::Stopped;
    }

    /// Stops and rewinds to a full `duration`; outstanding handles stay dead.
    pub fn rewind(&mut self, duration: NonZeroU32) {
        self.stop();
        self.duration = duration.get();
        self.remaining = duration.get();
    }

    pub fn handle(&self) -> Option<TimerHandle> {
        match self.state {
            TimerState::Ticking => Some(TimerHandle(self.generation)),
            TimerState::Stopped => None,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn elapsed(&self) -> u32 {
        self.duration - self.remaining
    }
}
