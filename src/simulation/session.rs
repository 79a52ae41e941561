use crate::controls::{ControlAction, Controls};
use crate::simulation::chart::ChartRecorder;
use crate::simulation::display::Readout;
use crate::simulation::integrator::{Integrator, RunState, TickOutcome};
use crate::simulation::particles::ParticleAnimator;

/// Everything one simulation window needs, wired in tick order:
/// kinetics, readout, particles, chart.
pub struct Session {
    pub integrator: Integrator,
    pub controls: Controls,
    pub readout: Readout,
    pub particles: ParticleAnimator,
    pub chart: ChartRecorder,
}

impl Session {
    /// Build a session in its freshly reset state
    pub fn new(integrator: Integrator, controls: Controls, particles: ParticleAnimator) -> Self {
        let mut session = Self {
            integrator,
            controls,
            readout: Readout::default(),
            particles,
            chart: ChartRecorder::new(),
        };
        session.reset();
        session
    }

    pub fn handle(&mut self, action: ControlAction) {
        match action {
            ControlAction::Start => self.start(),
            ControlAction::Reset => self.reset(),
            ControlAction::AdjustRate(delta) => {
                if self.controls.adjust_rate(delta) {
                    log::info!("Forward rate: {:.2}", self.controls.forward_rate());
                } else {
                    log::debug!("Forward rate is locked while running");
                }
            }
        }
    }

    /// Reset everything, then begin a run with its first tick pending
    pub fn start(&mut self) {
        self.reset();
        self.integrator.start();
        self.controls.lock();
        log::info!("Forward rate for this run: {:.2}", self.controls.forward_rate());
    }

    /// Cancel any pending tick and restore the initial state
    pub fn reset(&mut self) {
        self.integrator.reset();
        self.controls.unlock();
        self.chart.clear();
        self.particles.clear();

        let clock = self.integrator.clock();
        let c = self.integrator.concentrations();
        self.readout.update(clock, c.prod);
        self.particles.advance(clock, &c);
    }

    /// Run the pending tick, if there is one. Called once per frame.
    pub fn frame(&mut self) -> TickOutcome {
        let Some(ticket) = self.integrator.pending() else {
            return TickOutcome::Rejected;
        };

        let outcome = self.integrator.tick(ticket, self.controls.forward_rate());
        match outcome {
            TickOutcome::Advanced { clock } => {
                let c = self.integrator.concentrations();
                self.readout.update(clock, c.prod);
                self.particles.advance(clock, &c);
                self.chart.record(clock, &c);
                self.integrator.schedule_next();
            }
            TickOutcome::Finished => {
                self.controls.unlock();
            }
            TickOutcome::Rejected => {}
        }
        outcome
    }

    pub fn is_running(&self) -> bool {
        self.integrator.state() == RunState::Running
    }

    /// Drive frames until the run ends. Returns the number of Euler steps.
    pub fn run_to_completion(&mut self) -> usize {
        let mut steps = 0;
        while self.is_running() {
            match self.frame() {
                TickOutcome::Advanced { .. } => steps += 1,
                TickOutcome::Finished => break,
                TickOutcome::Rejected => {
                    log::warn!("Run lost its pending tick at t = {:.1}", self.integrator.clock());
                    self.integrator.stop();
                    self.controls.unlock();
                }
            }
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::chart::should_record;
    use crate::simulation::display::yield_percent;
    use crate::simulation::kinetics::Concentrations;

    fn session(forward_rate: f64, max_time: f64) -> Session {
        Session::new(
            Integrator::new(0.1, max_time),
            Controls::new(forward_rate),
            ParticleAnimator::new(400.0, 300.0, Some(11)),
        )
    }

    #[test]
    fn test_new_session_is_reset() {
        let s = session(0.5, 10.0);
        assert_eq!(s.integrator.state(), RunState::Idle);
        assert_eq!(s.readout.time, "0.0");
        assert_eq!(s.readout.yield_percent, "0.0");
        assert!(s.chart.series().is_empty());
        assert_eq!(s.particles.particles().len(), 200);
        assert!(s.controls.rate_enabled());
    }

    #[test]
    fn test_idle_frame_does_nothing() {
        let mut s = session(0.5, 10.0);
        assert_eq!(s.frame(), TickOutcome::Rejected);
        assert_eq!(s.integrator.clock(), 0.0);
    }

    #[test]
    fn test_start_locks_controls_until_finished() {
        let mut s = session(0.5, 1.0);
        s.handle(ControlAction::Start);
        assert!(!s.controls.rate_enabled());
        assert!(!s.controls.start_enabled());

        s.handle(ControlAction::AdjustRate(0.1));
        assert_eq!(s.controls.forward_rate(), 0.5);

        s.run_to_completion();
        assert_eq!(s.integrator.state(), RunState::Stopped);
        assert!(s.controls.rate_enabled());
        assert!(s.controls.start_enabled());
    }

    #[test]
    fn test_reset_mid_run_restores_everything() {
        let mut s = session(1.0, 10.0);
        s.start();
        for _ in 0..30 {
            s.frame();
        }
        assert!(!s.chart.series().is_empty());

        s.handle(ControlAction::Reset);
        assert_eq!(s.integrator.state(), RunState::Idle);
        assert_eq!(s.integrator.clock(), 0.0);
        assert_eq!(s.integrator.concentrations(), Concentrations::initial());
        assert!(s.chart.series().is_empty());
        assert_eq!(s.readout.time, "0.0");
        assert!(s.controls.rate_enabled());
        assert_eq!(s.particles.particles().len(), 200);

        // No tick survives the reset
        assert_eq!(s.frame(), TickOutcome::Rejected);
    }

    #[test]
    fn test_chart_samples_match_decimation() {
        let mut s = session(0.8, 10.0);
        s.start();
        let mut expected = 0;
        for _ in 0..50 {
            if let TickOutcome::Advanced { clock } = s.frame() {
                if should_record(clock) {
                    expected += 1;
                }
            }
        }
        assert!(expected > 0);
        assert_eq!(s.chart.series().len(), expected);
    }

    #[test]
    fn test_double_start_single_chain() {
        let mut a = session(1.0, 3.0);
        a.start();
        let single = a.run_to_completion();

        let mut b = session(1.0, 3.0);
        b.start();
        b.start();
        let double = b.run_to_completion();

        assert_eq!(single, double);
        assert_eq!(a.integrator.concentrations(), b.integrator.concentrations());
        assert_eq!(a.chart.series().len(), b.chart.series().len());
    }

    #[test]
    fn test_rate_read_live_each_tick() {
        let mut s = session(0.0, 10.0);
        s.start();
        for _ in 0..5 {
            s.frame();
        }
        assert_eq!(s.integrator.concentrations(), Concentrations::initial());

        // Simulate a live input change; the very next tick uses it
        s.controls.unlock();
        s.controls.adjust_rate(1.0);
        s.controls.lock();
        s.frame();
        assert!(s.integrator.concentrations().enol > 0.0);
    }

    #[test]
    fn test_concentrations_non_negative_over_full_run() {
        let mut s = session(2.0, 100.0);
        s.start();
        while s.is_running() {
            s.frame();
            let c = s.integrator.concentrations();
            assert!(c.eta >= 0.0 && c.enol >= 0.0 && c.prod >= 0.0);
        }
        let steps_taken = (s.integrator.clock() / 0.1).round() as usize;
        assert!(steps_taken >= 1000);
    }

    #[test]
    fn test_huge_forward_rate_keeps_particles_bounded() {
        let mut s = session(1.0e6, 10.0);
        s.start();
        assert!(matches!(s.frame(), TickOutcome::Advanced { .. }));
        assert!(s.integrator.concentrations().enol > 1.0e4);
        assert!(s.particles.particles().len() <= crate::config::MAX_PARTICLES);
    }

    #[test]
    fn test_readout_tracks_state() {
        let mut s = session(1.0, 10.0);
        s.start();
        for _ in 0..20 {
            s.frame();
        }
        let c = s.integrator.concentrations();
        assert_eq!(s.readout.time, format!("{:.1}", s.integrator.clock()));
        assert_eq!(s.readout.yield_percent, format!("{:.1}", yield_percent(c.prod, 1.0)));
    }
}
