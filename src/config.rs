use std::path::Path;

use crate::foundation::error::{SuperShowError, SuperShowResult};
use crate::measure::service::MeasureConfig;
use crate::placement::engine::PlacementConfig;
use crate::stream::controller::StreamConfig;
use crate::words::factory::FactoryConfig;

/// All tunables of a session. Every section falls back to its defaults when omitted.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SuperShowConfig {
    pub factory: FactoryConfig,
    pub measure: MeasureConfig,
    pub placement: PlacementConfig,
    pub stream: StreamConfig,
}

impl SuperShowConfig {
    pub fn from_json_str(json: &str) -> SuperShowResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SuperShowError::serde(format!("parse config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> SuperShowResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SuperShowError::input(format!("read config '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> SuperShowResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SuperShowError::serde(e.to_string()))
    }

    pub fn validate(&self) -> SuperShowResult<()> {
        self.factory.validate()?;
        self.measure.validate()?;
        self.placement.validate()?;
        self.stream.validate()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
