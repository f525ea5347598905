pub mod collector;
pub mod metrics;

pub use collector::{DataCollector, SimulationSample};
pub use metrics::SimulationMetrics;
