pub mod chart;
pub mod display;
pub mod integrator;
pub mod kinetics;
pub mod particles;
mod session;

pub use chart::ChartSeries;
pub use integrator::{Integrator, RunState, TickOutcome};
pub use particles::{Particle, ParticleAnimator, Species};
pub use session::Session;
