use crate::command::Command;
use crate::gesture::Landmark;
use serde::{Deserialize, Serialize};

/// Command request body (client -> robot)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accion: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocidad: Option<f64>,
}

impl From<&Command> for CommandRequest {
    fn from(command: &Command) -> Self {
        Self {
            accion: Some(command.name().to_string()),
            velocidad: command.speed(),
        }
    }
}

/// Response body (robot -> client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum CommandResponse {
    #[serde(rename = "OK")]
    Ok { accion_ejecutada: String },

    #[serde(rename = "Error")]
    Error { mensaje: String },
}

/// One line of detector output: every hand found in a camera frame
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Detection {
    #[serde(default)]
    pub hands: Vec<Vec<Landmark>>,
}
