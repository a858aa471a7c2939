use crate::error::DriverError;
use async_trait::async_trait;

use super::MotorDriver;

/// Driver that only logs, for running the server without motor hardware
#[derive(Debug, Default)]
pub struct SimulatedDriver;

#[async_trait]
impl MotorDriver for SimulatedDriver {
    async fn drive_forward(&mut self, speed: f64) -> Result<(), DriverError> {
        tracing::info!("Simulating AVANZAR at speed {}", speed);
        Ok(())
    }

    async fn drive_backward(&mut self, speed: f64) -> Result<(), DriverError> {
        tracing::info!("Simulating RETROCEDER at speed {}", speed);
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), DriverError> {
        tracing::info!("Simulating PARAR");
        Ok(())
    }
}
