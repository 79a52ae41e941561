use crate::config::{MAX_TIME, TIME_STEP};
use crate::simulation::kinetics::{Concentrations, RateConstants};

/// Run state of the integrator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Stopped,
}

/// Identifies one scheduled tick. Only the ticket currently held by the
/// integrator's schedule slot is accepted by [`Integrator::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

/// Single-slot schedule: at most one pending tick at a time.
#[derive(Debug, Default)]
struct Schedule {
    generation: u64,
    pending: Option<Ticket>,
}

impl Schedule {
    /// Invalidate whatever was pending, then hand out a fresh ticket
    fn schedule(&mut self) -> Ticket {
        self.cancel();
        self.generation += 1;
        let ticket = Ticket(self.generation);
        self.pending = Some(ticket);
        ticket
    }

    fn cancel(&mut self) {
        self.pending = None;
    }

    /// Consume the pending slot if `ticket` is the one it holds
    fn claim(&mut self, ticket: Ticket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

/// Result of presenting a ticket to the integrator
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// One Euler step was applied; the clock now reads `clock`
    Advanced { clock: f64 },
    /// The clock had reached the maximum; the run is now stopped
    Finished,
    /// The ticket was stale or the integrator is not running; nothing happened
    Rejected,
}

/// Fixed-step explicit Euler integrator with a start/stop state machine.
///
/// Owns the simulation clock and concentrations; everything else reads them.
#[derive(Debug)]
pub struct Integrator {
    state: RunState,
    clock: f64,
    concentrations: Concentrations,
    schedule: Schedule,
    time_step: f64,
    max_time: f64,
}

impl Default for Integrator {
    fn default() -> Self {
        Self::new(TIME_STEP, MAX_TIME)
    }
}

impl Integrator {
    pub fn new(time_step: f64, max_time: f64) -> Self {
        Self {
            state: RunState::Idle,
            clock: 0.0,
            concentrations: Concentrations::initial(),
            schedule: Schedule::default(),
            time_step,
            max_time,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn concentrations(&self) -> Concentrations {
        self.concentrations
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn max_time(&self) -> f64 {
        self.max_time
    }

    /// The ticket of the tick waiting to run, if any
    pub fn pending(&self) -> Option<Ticket> {
        self.schedule.pending
    }

    /// Begin a fresh run and return the ticket of its first tick.
    ///
    /// Restarting while running stops the current run first, so the previous
    /// ticket is dead before the new one exists.
    pub fn start(&mut self) -> Ticket {
        if self.state == RunState::Running {
            self.stop();
        }
        self.rewind();
        self.state = RunState::Running;
        log::info!("Run started");
        self.schedule.schedule()
    }

    /// Cancel the pending tick and halt the run
    pub fn stop(&mut self) {
        self.schedule.cancel();
        if self.state == RunState::Running {
            log::info!("Run stopped at t = {:.1}", self.clock);
        }
        self.state = RunState::Stopped;
    }

    /// Cancel the pending tick and return to the initial state
    pub fn reset(&mut self) {
        self.schedule.cancel();
        self.rewind();
        self.state = RunState::Idle;
    }

    /// Run the tick identified by `ticket`.
    ///
    /// `forward_rate` is read fresh by the caller for every tick. The next
    /// tick is not scheduled here; callers finish their per-tick work and
    /// then call [`Integrator::schedule_next`].
    pub fn tick(&mut self, ticket: Ticket, forward_rate: f64) -> TickOutcome {
        if self.state != RunState::Running || !self.schedule.claim(ticket) {
            log::trace!("Rejected stale tick {:?}", ticket);
            return TickOutcome::Rejected;
        }

        if self.clock >= self.max_time {
            log::info!("Reached t = {:.1}, run finished", self.clock);
            self.state = RunState::Stopped;
            return TickOutcome::Finished;
        }

        let k = RateConstants::with_forward(forward_rate);
        self.concentrations.step(&k, self.time_step);
        self.clock += self.time_step;

        TickOutcome::Advanced { clock: self.clock }
    }

    /// Schedule the tick that follows a completed one.
    /// Returns `None` once the run is no longer active.
    pub fn schedule_next(&mut self) -> Option<Ticket> {
        if self.state == RunState::Running {
            Some(self.schedule.schedule())
        } else {
            None
        }
    }

    fn rewind(&mut self) {
        self.clock = 0.0;
        self.concentrations = Concentrations::initial();
    }
}
