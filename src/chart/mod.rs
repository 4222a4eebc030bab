pub mod timings;
pub mod trend;
