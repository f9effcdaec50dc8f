//! Device location handshake.
//!
//! The device side is the [`DeviceLocation`] trait: a permission query and a
//! one-shot position request, both asynchronous. [`resolve`] runs the
//! permission state machine over it and collapses every branch into a single
//! [`GeolocationOutcome`]:
//!
//! | permission | position request        | outcome                         |
//! |------------|-------------------------|---------------------------------|
//! | (no device)| -                       | `Unavailable`                   |
//! | `Denied`   | not made                | `Denied`                        |
//! | `Granted`  | once, no timeout        | `Located` / `Failed`            |
//! | `Prompt`   | once, bounded by timeout| `Located` / `Failed` / `TimedOut` |

mod device;

use std::{fmt, future::Future, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub use device::ConfiguredDevice;

/// How long the prompt path waits for a position before giving up.
pub const DEFAULT_PROMPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Permission state reported by the platform for location access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    /// The user has not decided yet; requesting a position asks them.
    Prompt,
    Denied,
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Granted => write!(f, "granted"),
            Self::Prompt => write!(f, "prompt"),
            Self::Denied => write!(f, "denied"),
        }
    }
}

/// A device fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// The user refused when asked.
    #[error("location permission refused")]
    PermissionDenied,
    #[error("position unavailable: {0}")]
    Unavailable(String),
}

/// The platform geolocation API.
pub trait DeviceLocation: Send + Sync {
    fn permission(&self) -> impl Future<Output = PermissionState> + Send;

    fn current_position(&self) -> impl Future<Output = Result<Position, PositionError>> + Send;
}

/// Terminal result of one location attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum GeolocationOutcome {
    Located(Position),
    Denied,
    Failed(PositionError),
    TimedOut,
    /// No geolocation support at all.
    Unavailable,
}

/// Run the permission handshake and, where allowed, request a position.
#[instrument(name = "Resolve device location", skip(device), level = "debug")]
pub async fn resolve<D: DeviceLocation>(
    device: Option<&D>,
    prompt_timeout: Duration,
) -> GeolocationOutcome {
    let Some(device) = device else {
        return GeolocationOutcome::Unavailable;
    };

    let permission = device.permission().await;
    debug!(%permission, "Location permission queried");

    match permission {
        PermissionState::Denied => GeolocationOutcome::Denied,
        PermissionState::Granted => settle(device.current_position().await),
        PermissionState::Prompt => {
            match tokio::time::timeout(prompt_timeout, device.current_position()).await {
                Ok(result) => settle(result),
                Err(_) => GeolocationOutcome::TimedOut,
            }
        }
    }
}

fn settle(result: Result<Position, PositionError>) -> GeolocationOutcome {
    match result {
        Ok(position) => GeolocationOutcome::Located(position),
        Err(e) => GeolocationOutcome::Failed(e),
    }
}

/// Where to turn location services back on, for the current platform.
pub const fn location_settings_hint() -> &'static str {
    if cfg!(target_os = "macos") {
        "Check that Location Services are enabled in System Settings > Privacy & Security > Location Services."
    } else if cfg!(target_os = "windows") {
        "Check that location access is turned on in Settings > Privacy & security > Location."
    } else if cfg!(target_os = "android") {
        "Check that Location is turned on in your device's quick settings."
    } else if cfg!(target_os = "ios") {
        "Check that Location Services are enabled in Settings > Privacy > Location Services."
    } else {
        "Check that your system location service (e.g. GeoClue) is running and allowed to share your position."
    }
}
