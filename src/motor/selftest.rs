use crate::command::Command;
use anyhow::Result;
use std::time::Duration;

use super::Dispatcher;

/// Speed used while checking the wiring
pub const SELFTEST_SPEED: f64 = 0.8;

/// Drive forward, then backward, then stop, holding each for `step`.
///
/// The motors are stopped on the way out even when a step fails.
pub async fn run(dispatcher: &Dispatcher, step: Duration) -> Result<()> {
    let result = run_steps(dispatcher, step).await;

    tracing::info!("Stopping motors");
    dispatcher.execute(Command::Stop).await?;

    result
}

async fn run_steps(dispatcher: &Dispatcher, step: Duration) -> Result<()> {
    for command in [Command::advance(SELFTEST_SPEED), Command::reverse(SELFTEST_SPEED)] {
        tracing::info!("Motor test: {}", command);
        dispatcher.execute(command).await?;
        tokio::time::sleep(step).await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motor::recording::{Call, RecordingDriver};

    #[tokio::test]
    async fn test_runs_forward_backward_stop() {
        let driver = RecordingDriver::default();
        let dispatcher = Dispatcher::new(Box::new(driver.clone()));

        run(&dispatcher, Duration::from_millis(1)).await.unwrap();

        assert_eq!(
            driver.calls(),
            vec![Call::Forward(0.8), Call::Backward(0.8), Call::Stop]
        );
    }

    #[tokio::test]
    async fn test_failure_still_reports_error() {
        let driver = RecordingDriver::failing();
        let dispatcher = Dispatcher::new(Box::new(driver.clone()));

        assert!(run(&dispatcher, Duration::from_millis(1)).await.is_err());
        // Forward failed, then the stop attempt.
        assert_eq!(driver.calls(), vec![Call::Forward(0.8), Call::Stop]);
    }
}
