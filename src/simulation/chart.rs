use crate::config::CHART_DECIMATION;
use crate::simulation::kinetics::Concentrations;

/// Time-series data handed to the chart renderer: one label per sample and
/// three parallel value sequences, in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub eta: Vec<f64>,
    pub enol: Vec<f64>,
    pub prod: Vec<f64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn push(&mut self, label: String, c: &Concentrations) {
        self.labels.push(label);
        self.eta.push(c.eta);
        self.enol.push(c.enol);
        self.prod.push(c.prod);
    }

    fn clear(&mut self) {
        self.labels.clear();
        self.eta.clear();
        self.enol.clear();
        self.prod.clear();
    }
}

/// Whether a tick at `clock` contributes a chart sample
pub fn should_record(clock: f64) -> bool {
    ((clock * 10.0).floor() as i64).rem_euclid(CHART_DECIMATION) == 0
}

/// Appends a decimated sample of the state to the chart series.
#[derive(Debug, Default)]
pub struct ChartRecorder {
    series: ChartSeries,
    /// Bumped on every change so renderers know when to re-upload
    revision: u64,
}

impl ChartRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn series(&self) -> &ChartSeries {
        &self.series
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns true if a sample was appended
    pub fn record(&mut self, clock: f64, c: &Concentrations) -> bool {
        if !should_record(clock) {
            return false;
        }
        self.series.push(format!("{:.1}", clock), c);
        self.revision += 1;
        log::trace!("Chart sample {} at t = {:.1}", self.series.len(), clock);
        true
    }

    pub fn clear(&mut self) {
        self.series.clear();
        self.revision += 1;
    }
}
