//! H-bridge motor driver on Linux sysfs PWM.
//!
//! Each motor has a forward and a backward input wired to its own PWM
//! channel. Driving one direction zeroes the opposite channel first so the
//! bridge never sees both inputs high.

use crate::config::{MotorChannels, PwmConfig};
use crate::error::DriverError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::MotorDriver;

const EXPORT_POLL_ATTEMPTS: u32 = 20;
const EXPORT_POLL_INTERVAL: Duration = Duration::from_millis(50);

struct PwmChannel {
    dir: PathBuf,
}

impl PwmChannel {
    async fn open(chip: &Path, index: u32, period_ns: u64) -> Result<Self, DriverError> {
        let dir = chip.join(format!("pwm{}", index));

        if !dir.exists() {
            tokio::fs::write(chip.join("export"), index.to_string()).await?;
            wait_for_export(&dir).await?;
        }

        let channel = Self { dir };
        // Duty must never exceed the period, so clear it before resizing.
        channel.set_duty(0).await?;
        channel.write("period", period_ns).await?;
        channel.write("enable", 1).await?;

        tracing::debug!("PWM channel ready: {:?}", channel.dir);
        Ok(channel)
    }

    async fn set_duty(&self, duty_ns: u64) -> Result<(), DriverError> {
        self.write("duty_cycle", duty_ns).await
    }

    async fn write(&self, attribute: &str, value: u64) -> Result<(), DriverError> {
        tokio::fs::write(self.dir.join(attribute), value.to_string()).await?;
        Ok(())
    }
}

async fn wait_for_export(dir: &Path) -> Result<(), DriverError> {
    for _ in 0..EXPORT_POLL_ATTEMPTS {
        if dir.exists() {
            return Ok(());
        }
        tokio::time::sleep(EXPORT_POLL_INTERVAL).await;
    }

    Err(DriverError::Hardware(format!(
        "PWM channel {:?} did not appear after export",
        dir
    )))
}

struct Motor {
    forward: PwmChannel,
    backward: PwmChannel,
}

impl Motor {
    async fn open(chip: &Path, channels: &MotorChannels, period_ns: u64) -> Result<Self, DriverError> {
        Ok(Self {
            forward: PwmChannel::open(chip, channels.forward, period_ns).await?,
            backward: PwmChannel::open(chip, channels.backward, period_ns).await?,
        })
    }

    async fn forward(&self, duty_ns: u64) -> Result<(), DriverError> {
        self.backward.set_duty(0).await?;
        self.forward.set_duty(duty_ns).await
    }

    async fn backward(&self, duty_ns: u64) -> Result<(), DriverError> {
        self.forward.set_duty(0).await?;
        self.backward.set_duty(duty_ns).await
    }

    async fn stop(&self) -> Result<(), DriverError> {
        self.forward.set_duty(0).await?;
        self.backward.set_duty(0).await
    }
}

pub struct PwmDriver {
    left: Motor,
    right: Motor,
    period_ns: u64,
}

impl PwmDriver {
    pub async fn open(config: &PwmConfig) -> Result<Self, DriverError> {
        let left = Motor::open(&config.chip, &config.left, config.period_ns).await?;
        let right = Motor::open(&config.chip, &config.right, config.period_ns).await?;

        let mut driver = Self {
            left,
            right,
            period_ns: config.period_ns,
        };
        driver.stop().await?;

        Ok(driver)
    }

    fn duty_for(&self, speed: f64) -> u64 {
        (self.period_ns as f64 * speed.clamp(0.0, 1.0)).round() as u64
    }
}

#[async_trait]
impl MotorDriver for PwmDriver {
    async fn drive_forward(&mut self, speed: f64) -> Result<(), DriverError> {
        let duty = self.duty_for(speed);
        self.left.forward(duty).await?;
        self.right.forward(duty).await
    }

    async fn drive_backward(&mut self, speed: f64) -> Result<(), DriverError> {
        let duty = self.duty_for(speed);
        self.left.backward(duty).await?;
        self.right.backward(duty).await
    }

    async fn stop(&mut self) -> Result<(), DriverError> {
        self.left.stop().await?;
        self.right.stop().await
    }
}
