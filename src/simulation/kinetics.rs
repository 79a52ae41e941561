use crate::config::{COUPLING_RATE, INITIAL_ETA, REVERSE_RATE};

/// Concentrations (mol/L) of the three tracked species.
///
/// Every field stays >= 0 after [`Concentrations::step`]. Mass balance is not
/// enforced; explicit Euler at coarse steps is allowed to drift.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Concentrations {
    /// Ethyl acetate (reactant)
    pub eta: f64,
    /// Enolate (intermediate)
    pub enol: f64,
    /// Ethyl acetoacetate (product)
    pub prod: f64,
}

impl Default for Concentrations {
    fn default() -> Self {
        Self::initial()
    }
}

/// Rate constants for one step. `forward` comes from the control surface,
/// the other two are fixed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateConstants {
    pub forward: f64,
    pub reverse: f64,
    pub coupling: f64,
}

impl RateConstants {
    pub fn with_forward(forward: f64) -> Self {
        Self {
            forward,
            reverse: REVERSE_RATE,
            coupling: COUPLING_RATE,
        }
    }
}

/// Instantaneous reaction rates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rates {
    pub enol_formation: f64,
    pub enol_reverse: f64,
    pub coupling: f64,
}

impl Concentrations {
    /// State at reset: only reactant present
    pub fn initial() -> Self {
        Self {
            eta: INITIAL_ETA,
            enol: 0.0,
            prod: 0.0,
        }
    }

    pub fn rates(&self, k: &RateConstants) -> Rates {
        Rates {
            enol_formation: k.forward * self.eta,
            enol_reverse: k.reverse * self.enol,
            coupling: k.coupling * self.enol * self.eta,
        }
    }

    /// Advance by one explicit Euler step of length `dt`.
    ///
    /// Each species is floored at zero independently; nothing is renormalized.
    pub fn step(&mut self, k: &RateConstants, dt: f64) {
        let r = self.rates(k);

        let delta_eta = (-r.enol_formation + r.enol_reverse - r.coupling) * dt;
        let delta_enol = (r.enol_formation - r.enol_reverse - r.coupling) * dt;
        let delta_prod = r.coupling * dt;

        self.eta = (self.eta + delta_eta).max(0.0);
        self.enol = (self.enol + delta_enol).max(0.0);
        self.prod = (self.prod + delta_prod).max(0.0);
    }

    /// Sum of all species; not conserved
    #[allow(dead_code)]
    pub fn total(&self) -> f64 {
        self.eta + self.enol + self.prod
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TIME_STEP;

    #[test]
    fn test_initial_state() {
        let c = Concentrations::initial();
        assert_eq!(c.eta, 1.0);
        assert_eq!(c.enol, 0.0);
        assert_eq!(c.prod, 0.0);
        assert_eq!(Concentrations::default(), c);
    }

    #[test]
    fn test_rates_follow_rate_law() {
        let c = Concentrations { eta: 0.5, enol: 0.2, prod: 0.1 };
        let r = c.rates(&RateConstants::with_forward(0.8));
        assert!((r.enol_formation - 0.4).abs() < 1e-12);
        assert!((r.enol_reverse - 0.3).abs() < 1e-12);
        assert!((r.coupling - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_single_step_deltas() {
        let mut c = Concentrations::initial();
        c.step(&RateConstants::with_forward(1.0), TIME_STEP);
        // Only enol formation is non-zero at t = 0
        assert!((c.eta - 0.9).abs() < 1e-12);
        assert!((c.enol - 0.1).abs() < 1e-12);
        assert_eq!(c.prod, 0.0);
    }

    #[test]
    fn test_no_reaction_without_forward_rate() {
        let mut c = Concentrations::initial();
        let k = RateConstants::with_forward(0.0);
        for _ in 0..1000 {
            c.step(&k, TIME_STEP);
        }
        assert_eq!(c, Concentrations::initial());
    }

    #[test]
    fn test_concentrations_never_negative() {
        for &forward in &[0.1, 1.0, 5.0, 25.0, 1e3] {
            let mut c = Concentrations::initial();
            let k = RateConstants::with_forward(forward);
            for _ in 0..1000 {
                c.step(&k, TIME_STEP);
                assert!(c.eta >= 0.0, "EtA went negative at k_fwd = {}", forward);
                assert!(c.enol >= 0.0, "Enol went negative at k_fwd = {}", forward);
                assert!(c.prod >= 0.0, "Prod went negative at k_fwd = {}", forward);
            }
        }
    }

    #[test]
    fn test_overshoot_is_clamped_not_renormalized() {
        // k_fwd * dt > 1 drives EtA below zero in one step
        let mut c = Concentrations::initial();
        c.step(&RateConstants::with_forward(20.0), TIME_STEP);
        assert_eq!(c.eta, 0.0);
        assert!((c.enol - 2.0).abs() < 1e-12);
        assert!(c.total() > Concentrations::initial().total());
    }

    #[test]
    fn test_nan_forward_rate_floors_to_zero() {
        // f64::max drops the NaN operand, so the poisoned species read 0
        let mut c = Concentrations::initial();
        let k = RateConstants::with_forward(f64::NAN);
        for _ in 0..10 {
            c.step(&k, TIME_STEP);
            assert!(!c.eta.is_nan() && !c.enol.is_nan() && !c.prod.is_nan());
        }
        assert_eq!(c, Concentrations { eta: 0.0, enol: 0.0, prod: 0.0 });
    }

    #[test]
    fn test_product_accumulates() {
        let mut c = Concentrations::initial();
        let k = RateConstants::with_forward(0.5);
        let mut last = c.prod;
        for _ in 0..200 {
            c.step(&k, TIME_STEP);
            assert!(c.prod >= last);
            last = c.prod;
        }
        assert!(c.prod > 0.0);
    }
}
