// ============================================
// Reaction Kinetics
// ============================================

/// Simulated time advanced per tick
pub const TIME_STEP: f64 = 0.1;

/// A run stops once the clock reaches this value
pub const MAX_TIME: f64 = 100.0;

/// Starting ethyl acetate concentration (mol/L), also the yield reference
pub const INITIAL_ETA: f64 = 1.0;

/// Enolate -> ethyl acetate reverse rate constant
pub const REVERSE_RATE: f64 = 1.5;

/// Enolate + ethyl acetate coupling rate constant
pub const COUPLING_RATE: f64 = 1.0;

/// Forward (enolate formation) rate constant used before any user input
pub const DEFAULT_FORWARD_RATE: f64 = 0.5;

/// Keyboard adjustment range for the forward rate
pub const FORWARD_RATE_MIN: f64 = 0.0;
pub const FORWARD_RATE_MAX: f64 = 2.0;
pub const FORWARD_RATE_STEP: f64 = 0.1;

// ============================================
// Chart
// ============================================

/// Record a chart sample when floor(clock * 10) is a multiple of this
pub const CHART_DECIMATION: i64 = 5;

/// Fixed upper bound of the concentration axis
pub const CHART_Y_MAX: f64 = 1.1;

// ============================================
// Particle Animation
// ============================================

/// Number of particles representing a concentration equal to INITIAL_ETA
pub const PARTICLE_POOL_SIZE: usize = 200;

/// Upper bound on the pool when concentrations blow up under extreme rates
pub const MAX_PARTICLES: usize = 20 * PARTICLE_POOL_SIZE;

/// Resample the pool while floor(clock) is a multiple of this
pub const RESAMPLE_PERIOD: i64 = 5;

/// Disk radius in pixels
pub const PARTICLE_RADIUS: f32 = 5.0;

/// Largest velocity component magnitude (pixels per tick) for new particles
pub const PARTICLE_MAX_SPEED: f64 = 1.0;

// ============================================
// Species Colours (sRGB)
// ============================================

pub const ETA_COLOR: [f32; 3] = [0.204, 0.596, 0.859]; // #3498db
pub const ENOL_COLOR: [f32; 3] = [0.906, 0.298, 0.235]; // #e74c3c
pub const PROD_COLOR: [f32; 3] = [0.180, 0.800, 0.443]; // #2ecc71

/// Chart axis colour
pub const AXIS_COLOR: [f32; 3] = [0.741, 0.765, 0.780]; // #bdc3c7

// ============================================
// Window Layout
// ============================================

/// Default window size (logical pixels); left half particles, right half chart
pub const WINDOW_WIDTH: u32 = 1200;
pub const WINDOW_HEIGHT: u32 = 600;

/// Inner margin of the chart panel as a fraction of the panel size
pub const CHART_MARGIN: f32 = 0.08;
