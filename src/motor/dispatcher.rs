use crate::command::{Command, clamp_speed};
use crate::error::DispatchError;
use crate::messages::CommandRequest;
use tokio::sync::Mutex;

use super::MotorDriver;

/// Turns validated commands into motor calls
///
/// The driver sits behind a single lock: at most one actuation runs at a
/// time, and callers queue in arrival order.
pub struct Dispatcher {
    driver: Mutex<Box<dyn MotorDriver>>,
}

impl Dispatcher {
    pub fn new(driver: Box<dyn MotorDriver>) -> Self {
        Self {
            driver: Mutex::new(driver),
        }
    }

    /// Validate a request and run it.
    pub async fn handle(&self, request: &CommandRequest) -> Result<Command, DispatchError> {
        let command = validate(request)?;
        self.execute(command).await
    }

    /// Run one command against the driver and return what was executed.
    pub async fn execute(&self, command: Command) -> Result<Command, DispatchError> {
        let mut driver = self.driver.lock().await;

        match command {
            Command::Advance { speed } => driver.drive_forward(speed).await?,
            Command::Reverse { speed } => driver.drive_backward(speed).await?,
            Command::Stop => driver.stop().await?,
        }

        Ok(command)
    }
}

/// Check a request against the closed command set.
///
/// Speeds outside [0.0, 1.0] are clamped rather than rejected.
pub fn validate(request: &CommandRequest) -> Result<Command, DispatchError> {
    let name = request
        .accion
        .as_deref()
        .ok_or_else(|| DispatchError::Validation("missing accion".to_string()))?;

    if let Some(speed) = request.velocidad {
        let clamped = clamp_speed(speed);
        if clamped != speed {
            tracing::warn!("Speed {} out of range for {}, clamped to {}", speed, name, clamped);
        }
    }

    Command::from_wire(name, request.velocidad)
        .ok_or_else(|| DispatchError::Validation(format!("unknown accion {:?}", name)))
}
