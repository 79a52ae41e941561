use crate::config::INITIAL_ETA;

/// Product yield as a percentage of the theoretical maximum.
/// Two ethyl acetate molecules make one product, hence the factor of 2.
pub fn yield_percent(prod: f64, initial_eta: f64) -> f64 {
    (prod * 2.0 / initial_eta) * 100.0
}

/// User-visible readouts, rewritten once per tick
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Readout {
    /// Elapsed simulated time, one decimal
    pub time: String,
    /// Yield percentage, one decimal
    pub yield_percent: String,
}

impl Readout {
    pub fn update(&mut self, clock: f64, prod: f64) {
        self.time = format!("{:.1}", clock);
        self.yield_percent = format!("{:.1}", yield_percent(prod, INITIAL_ETA));
    }
}
