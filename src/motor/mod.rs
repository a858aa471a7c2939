pub mod dispatcher;
pub mod driver;
pub mod pwm;
#[cfg(test)]
pub mod recording;
pub mod selftest;
pub mod simulated;

pub use dispatcher::Dispatcher;
pub use driver::{MotorDriver, open_driver};
pub use pwm::PwmDriver;
pub use simulated::SimulatedDriver;
