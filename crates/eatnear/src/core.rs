//! The restaurant finder form.
//!
//! [`RestaurantFinder`] owns everything the form shows: the two coordinate
//! fields, the loading flag, and the result list with its expanded row. Every
//! operation runs to completion on the caller's task and returns a
//! [`FinderError`] whose `Display` is the message to put in front of the user.
//!
//! ```rust,no_run
//! use eatnear::{FinderConfig, RestaurantFinder};
//!
//! # async fn run() -> Result<(), eatnear::error::EatnearError> {
//! let config = FinderConfig::builder().api_key("your-key").build()?;
//! let mut finder = RestaurantFinder::from_config(&config)?;
//!
//! finder.set_latitude("59.334591");
//! finder.set_longitude("18.063240");
//! finder.search().await?;
//! finder.expand(0);
//! print!("{}", finder.render());
//! # Ok(())
//! # }
//! ```

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use eatnear_places::{PlacesError, PlacesTransport, ReqwestTransport};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::{
    config::FinderConfig,
    coordinate::{Axis, CoordinateInput, Coordinates, ValidationError},
    error::EatnearError,
    geolocation::{
        self, ConfiguredDevice, DeviceLocation, GeolocationOutcome, Position, PositionError,
        location_settings_hint,
    },
    results::{ExpansionState, ResultList},
    search::{ResultSet, SearchClient, SearchError},
};

/// A failed form action, worded for the user.
#[derive(Error, Debug)]
pub enum FinderError {
    /// One message line per invalid field.
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),
    #[error("No API key configured. Set EATNEAR_API_KEY or add \"api_key\" to the config file.")]
    MissingApiKey,
    #[error("Couldn't fetch data from the places API, maybe check your internet connection?\n{0}")]
    SearchFailed(#[source] PlacesError),
    #[error("You need to give this app the right to access your current location to do so")]
    PermissionDenied,
    #[error("Couldn't get your current location. {hint}")]
    PositionUnavailable {
        hint: &'static str,
        #[source]
        source: PositionError,
    },
    #[error("Timed out waiting for your current location. {hint}")]
    PositionTimeout { hint: &'static str },
    #[error("Sorry, location is not available!")]
    GeolocationUnavailable,
}

impl From<SearchError> for FinderError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidCoordinates(e) => Self::InvalidInput(e),
            SearchError::MissingApiKey => Self::MissingApiKey,
            SearchError::Places(e) => Self::SearchFailed(e),
        }
    }
}

/// Shared view of a finder's loading flag.
///
/// Clones observe the same flag, so a spinner can poll it while the finder
/// itself is mutably borrowed by an in-flight search or locate.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Set the flag until the returned guard is dropped.
    fn raise(&self) -> LoadingGuard {
        self.0.store(true, Ordering::Release);
        LoadingGuard(Arc::clone(&self.0))
    }
}

/// Clears the loading flag on drop, including when the request future is cancelled.
#[must_use]
struct LoadingGuard(Arc<AtomicBool>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Form state plus the two collaborators it talks to.
pub struct RestaurantFinder<T, D = ConfiguredDevice> {
    client: SearchClient<T>,
    device: Option<D>,
    prompt_timeout: Duration,
    latitude: CoordinateInput,
    longitude: CoordinateInput,
    list: ResultList,
    loading: LoadingFlag,
}

impl RestaurantFinder<ReqwestTransport, ConfiguredDevice> {
    /// Finder talking to the real places API, with the configured device.
    pub fn from_config(config: &FinderConfig) -> Result<Self, EatnearError> {
        let transport = ReqwestTransport::with_timeout(config.http_timeout())?;
        let device = config.device.as_ref().map(ConfiguredDevice::from);
        Ok(Self::new(transport, device, config))
    }
}

impl<T: PlacesTransport, D: DeviceLocation> RestaurantFinder<T, D> {
    pub fn new(transport: T, device: Option<D>, config: &FinderConfig) -> Self {
        Self {
            client: SearchClient::new(transport, config.search.clone()),
            device,
            prompt_timeout: config.prompt_timeout(),
            latitude: CoordinateInput::from_value(Axis::Latitude, config.initial_latitude),
            longitude: CoordinateInput::from_value(Axis::Longitude, config.initial_longitude),
            list: ResultList::new(),
            loading: LoadingFlag::default(),
        }
    }

    pub const fn latitude(&self) -> &CoordinateInput {
        &self.latitude
    }

    pub const fn longitude(&self) -> &CoordinateInput {
        &self.longitude
    }

    /// Store typed latitude text; invalid text is kept and flagged.
    pub fn set_latitude(&mut self, raw: impl Into<String>) {
        self.latitude.set(raw);
    }

    pub fn set_longitude(&mut self, raw: impl Into<String>) {
        self.longitude.set(raw);
    }

    /// Whether the search action is enabled.
    pub const fn can_submit(&self) -> bool {
        self.latitude.is_valid() && self.longitude.is_valid()
    }

    /// Inline messages for the fields that are currently invalid.
    pub fn field_errors(&self) -> Vec<&'static str> {
        [&self.latitude, &self.longitude]
            .into_iter()
            .filter_map(CoordinateInput::error_message)
            .collect()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    /// A handle that stays readable while `search` or `locate` runs.
    pub fn loading_flag(&self) -> LoadingFlag {
        self.loading.clone()
    }

    pub const fn results(&self) -> Option<&ResultSet> {
        self.list.results()
    }

    pub const fn list(&self) -> &ResultList {
        &self.list
    }

    pub const fn expansion(&self) -> ExpansionState {
        self.list.expansion()
    }

    pub const fn client(&self) -> &SearchClient<T> {
        &self.client
    }

    pub fn expand(&mut self, index: usize) -> bool {
        self.list.expand(index)
    }

    pub fn collapse(&mut self) {
        self.list.collapse();
    }

    pub fn set_expanded(&mut self, index: usize, should_open: bool) -> bool {
        self.list.set_expanded(index, should_open)
    }

    pub fn toggle(&mut self, index: usize) -> bool {
        self.list.toggle(index)
    }

    pub fn render(&self) -> String {
        self.list.render()
    }

    /// Search around the current fields and replace the result list.
    ///
    /// Invalid fields short-circuit before the loading flag is touched and
    /// without any network call. On failure the previous results stay on
    /// screen. Returns how many rows are now listed.
    #[instrument(name = "Finder search", skip(self), level = "debug")]
    pub async fn search(&mut self) -> Result<usize, FinderError> {
        let coordinates = Coordinates::try_from_inputs(&self.latitude, &self.longitude)
            .inspect_err(|e| debug!(error = %e, "Search blocked by invalid input"))?;

        let loading = self.loading.raise();
        let outcome = self.client.search_at(coordinates).await;
        drop(loading);

        match outcome {
            Ok(results) => {
                let count = results.len();
                self.list.replace(results);
                Ok(count)
            }
            Err(e) => {
                debug!(error = %e, "Search failed, keeping previous results");
                Err(e.into())
            }
        }
    }

    /// Ask the device for its position and move the form there.
    ///
    /// On success both fields are overwritten and the result list is cleared,
    /// since it no longer matches the coordinates.
    #[instrument(name = "Finder locate", skip(self), level = "debug")]
    pub async fn locate(&mut self) -> Result<Position, FinderError> {
        let loading = self.loading.raise();
        let outcome = geolocation::resolve(self.device.as_ref(), self.prompt_timeout).await;
        drop(loading);

        let err = match outcome {
            GeolocationOutcome::Located(position) => {
                self.latitude.set_value(position.latitude);
                self.longitude.set_value(position.longitude);
                self.list.clear();
                info!(
                    latitude = position.latitude,
                    longitude = position.longitude,
                    "Moved to device location"
                );
                return Ok(position);
            }
            GeolocationOutcome::Denied
            | GeolocationOutcome::Failed(PositionError::PermissionDenied) => {
                FinderError::PermissionDenied
            }
            GeolocationOutcome::Failed(source) => FinderError::PositionUnavailable {
                hint: location_settings_hint(),
                source,
            },
            GeolocationOutcome::TimedOut => FinderError::PositionTimeout {
                hint: location_settings_hint(),
            },
            GeolocationOutcome::Unavailable => FinderError::GeolocationUnavailable,
        };
        debug!(error = %err, "Locate failed");
        Err(err)
    }
}
