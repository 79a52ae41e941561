use winit::keyboard::KeyCode;

use crate::config::{FORWARD_RATE_MAX, FORWARD_RATE_MIN, FORWARD_RATE_STEP};

/// User-triggered actions
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlAction {
    Start,
    Reset,
    /// Nudge the forward rate by this amount
    AdjustRate(f64),
}

impl ControlAction {
    /// Keyboard binding for each action
    pub fn from_key(key_code: KeyCode) -> Option<Self> {
        match key_code {
            KeyCode::Space | KeyCode::Enter => Some(ControlAction::Start),
            KeyCode::KeyR => Some(ControlAction::Reset),
            KeyCode::ArrowUp | KeyCode::ArrowRight | KeyCode::Equal => {
                Some(ControlAction::AdjustRate(FORWARD_RATE_STEP))
            }
            KeyCode::ArrowDown | KeyCode::ArrowLeft | KeyCode::Minus => {
                Some(ControlAction::AdjustRate(-FORWARD_RATE_STEP))
            }
            _ => None,
        }
    }
}

/// Forward-rate input plus the enabled state of the start action.
///
/// The rate is read fresh at the top of every tick. While a run is active the
/// input is locked so a change cannot be attributed to the wrong run.
#[derive(Clone, Debug)]
pub struct Controls {
    forward_rate: f64,
    rate_enabled: bool,
    start_enabled: bool,
}

impl Controls {
    /// No validation: whatever value is given flows into the kinetics
    pub fn new(forward_rate: f64) -> Self {
        Self {
            forward_rate,
            rate_enabled: true,
            start_enabled: true,
        }
    }

    pub fn forward_rate(&self) -> f64 {
        self.forward_rate
    }

    pub fn rate_enabled(&self) -> bool {
        self.rate_enabled
    }

    pub fn start_enabled(&self) -> bool {
        self.start_enabled
    }

    /// Step the rate within the keyboard range. Returns false while locked.
    pub fn adjust_rate(&mut self, delta: f64) -> bool {
        if !self.rate_enabled {
            return false;
        }
        let stepped = ((self.forward_rate + delta) / FORWARD_RATE_STEP).round() * FORWARD_RATE_STEP;
        self.forward_rate = stepped.clamp(FORWARD_RATE_MIN, FORWARD_RATE_MAX);
        true
    }

    /// A run has started
    pub fn lock(&mut self) {
        self.rate_enabled = false;
        self.start_enabled = false;
    }

    /// A run has stopped or been reset
    pub fn unlock(&mut self) {
        self.rate_enabled = true;
        self.start_enabled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(ControlAction::from_key(KeyCode::Space), Some(ControlAction::Start));
        assert_eq!(ControlAction::from_key(KeyCode::KeyR), Some(ControlAction::Reset));
        assert_eq!(
            ControlAction::from_key(KeyCode::ArrowUp),
            Some(ControlAction::AdjustRate(FORWARD_RATE_STEP))
        );
        assert_eq!(
            ControlAction::from_key(KeyCode::Minus),
            Some(ControlAction::AdjustRate(-FORWARD_RATE_STEP))
        );
        assert_eq!(ControlAction::from_key(KeyCode::KeyZ), None);
    }

    #[test]
    fn test_adjust_rate_steps_and_clamps() {
        let mut controls = Controls::new(0.5);
        assert!(controls.adjust_rate(0.1));
        assert!((controls.forward_rate() - 0.6).abs() < 1e-9);

        for _ in 0..100 {
            controls.adjust_rate(0.1);
        }
        assert!((controls.forward_rate() - FORWARD_RATE_MAX).abs() < 1e-9);

        for _ in 0..100 {
            controls.adjust_rate(-0.1);
        }
        assert_eq!(controls.forward_rate(), FORWARD_RATE_MIN);
    }

    #[test]
    fn test_locked_rate_ignores_input() {
        let mut controls = Controls::new(0.5);
        controls.lock();
        assert!(!controls.rate_enabled());
        assert!(!controls.start_enabled());
        assert!(!controls.adjust_rate(0.1));
        assert_eq!(controls.forward_rate(), 0.5);

        controls.unlock();
        assert!(controls.rate_enabled());
        assert!(controls.adjust_rate(0.1));
    }

    #[test]
    fn test_unvalidated_rate_passes_through() {
        let controls = Controls::new(-3.0);
        assert_eq!(controls.forward_rate(), -3.0);
        assert!(Controls::new(f64::NAN).forward_rate().is_nan());
    }
}
