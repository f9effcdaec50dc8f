use super::{DeviceLocation, PermissionState, Position, PositionError};
use crate::config::DeviceConfig;

/// A device whose permission and fix come from configuration.
///
/// Stands in for an OS location service on hosts that have none (servers,
/// containers, CI); `--locate` then behaves exactly as it would against a real
/// service reporting the same state.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfiguredDevice {
    permission: PermissionState,
    position: Option<Position>,
}

impl ConfiguredDevice {
    pub const fn new(permission: PermissionState, position: Option<Position>) -> Self {
        Self {
            permission,
            position,
        }
    }
}

impl From<&DeviceConfig> for ConfiguredDevice {
    fn from(config: &DeviceConfig) -> Self {
        let position = match (config.latitude, config.longitude) {
            (Some(latitude), Some(longitude)) => Some(Position {
                latitude,
                longitude,
            }),
            _ => None,
        };
        Self::new(config.permission, position)
    }
}

impl DeviceLocation for ConfiguredDevice {
    async fn permission(&self) -> PermissionState {
        self.permission
    }

    async fn current_position(&self) -> Result<Position, PositionError> {
        self.position
            .ok_or_else(|| PositionError::Unavailable("no position configured".to_string()))
    }
}
