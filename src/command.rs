use std::fmt;
use std::str::FromStr;

/// Speed used for ADVANCE/REVERSE when none is given
pub const DEFAULT_SPEED: f64 = 0.3;

/// Drive command exchanged between the vision process and the robot
///
/// STOP carries no speed. Speeds are always kept inside [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Advance { speed: f64 },
    Reverse { speed: f64 },
    Stop,
}

impl Command {
    pub const ADVANCE: &'static str = "AVANZAR";
    pub const REVERSE: &'static str = "RETROCEDER";
    pub const STOP: &'static str = "PARAR";

    pub fn advance(speed: f64) -> Self {
        Command::Advance {
            speed: clamp_speed(speed),
        }
    }

    pub fn reverse(speed: f64) -> Self {
        Command::Reverse {
            speed: clamp_speed(speed),
        }
    }

    /// Wire name of the command
    pub fn name(&self) -> &'static str {
        match self {
            Command::Advance { .. } => Self::ADVANCE,
            Command::Reverse { .. } => Self::REVERSE,
            Command::Stop => Self::STOP,
        }
    }

    pub fn speed(&self) -> Option<f64> {
        match self {
            Command::Advance { speed } | Command::Reverse { speed } => Some(*speed),
            Command::Stop => None,
        }
    }

    /// Build a command from its wire name and optional speed.
    ///
    /// Returns `None` for names outside the closed set.
    pub fn from_wire(name: &str, speed: Option<f64>) -> Option<Self> {
        let kind: CommandKind = name.parse().ok()?;
        let speed = speed.unwrap_or(DEFAULT_SPEED);
        Some(kind.with_speed(speed))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.speed() {
            Some(speed) => write!(f, "{} @ {:.2}", self.name(), speed),
            None => f.write_str(self.name()),
        }
    }
}

/// Command without its speed parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Advance,
    Reverse,
    Stop,
}

impl CommandKind {
    pub fn with_speed(self, speed: f64) -> Command {
        match self {
            CommandKind::Advance => Command::advance(speed),
            CommandKind::Reverse => Command::reverse(speed),
            CommandKind::Stop => Command::Stop,
        }
    }
}

impl FromStr for CommandKind {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Command::ADVANCE => Ok(CommandKind::Advance),
            Command::REVERSE => Ok(CommandKind::Reverse),
            Command::STOP => Ok(CommandKind::Stop),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown command: {0:?}")]
pub struct UnknownCommand(pub String);

/// Clamp a speed into [0.0, 1.0]. Non-finite values become 0.0.
pub fn clamp_speed(speed: f64) -> f64 {
    if speed.is_finite() {
        speed.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
