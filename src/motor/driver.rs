use crate::config::DriverConfig;
use crate::error::DriverError;
use anyhow::{Context, Result};
use async_trait::async_trait;

use super::{PwmDriver, SimulatedDriver};

/// Trait for the two-motor drive train
///
/// Implementations are not expected to lock internally; callers hold
/// exclusive access for the duration of each call.
#[async_trait]
pub trait MotorDriver: Send {
    /// Run both motors forward, speed in [0.0, 1.0]
    async fn drive_forward(&mut self, speed: f64) -> Result<(), DriverError>;

    /// Run both motors backward, speed in [0.0, 1.0]
    async fn drive_backward(&mut self, speed: f64) -> Result<(), DriverError>;

    async fn stop(&mut self) -> Result<(), DriverError>;
}

/// Open the driver selected in the configuration.
///
/// Failure here is a setup failure: the robot cannot run without its motors.
pub async fn open_driver(config: &DriverConfig) -> Result<Box<dyn MotorDriver>> {
    match config {
        DriverConfig::Simulated => {
            tracing::warn!("Using simulated motor driver, no hardware will move");
            Ok(Box::new(SimulatedDriver::default()))
        }
        DriverConfig::Pwm(pwm) => {
            let driver = PwmDriver::open(pwm)
                .await
                .with_context(|| format!("Failed to open PWM motors on {:?}", pwm.chip))?;
            tracing::info!("PWM motor driver ready on {:?}", pwm.chip);
            Ok(Box::new(driver))
        }
    }
}
