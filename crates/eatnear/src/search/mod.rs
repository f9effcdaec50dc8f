//! Nearest-restaurant search.
//!
//! [`SearchClient`] turns a pair of validated coordinates into an explore call
//! and ranks what comes back into a [`ResultSet`]: nearest first, at most
//! [`MAX_RESULTS`] entries.

use std::ops::Deref;

use eatnear_places::{ExploreRequest, PlacesTransport, Restaurant, fetch_explore};
use itertools::Itertools;
use tracing::{debug, info, instrument};

pub use error::{Result, SearchError};

use crate::{
    config::SearchSettings,
    coordinate::{CoordinateInput, Coordinates},
};

/// Rows kept after ranking.
pub const MAX_RESULTS: usize = 10;

mod error {
    use thiserror::Error;

    use crate::coordinate::ValidationError;

    #[derive(Error, Debug)]
    pub enum SearchError {
        #[error(transparent)]
        InvalidCoordinates(#[from] ValidationError),
        #[error("No API key configured for the places API")]
        MissingApiKey,
        #[error(transparent)]
        Places(#[from] eatnear_places::PlacesError),
    }

    pub type Result<T> = std::result::Result<T, SearchError>;
}

/// Restaurants ordered by ascending distance, never more than [`MAX_RESULTS`].
///
/// The only way to build one is [`ResultSet::rank`], so the ordering and size
/// hold for every value of this type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet(Vec<Restaurant>);

impl ResultSet {
    /// Sort by distance and keep the nearest [`MAX_RESULTS`].
    ///
    /// The sort is stable: venues at the same distance keep upstream order.
    pub fn rank(items: impl IntoIterator<Item = Restaurant>) -> Self {
        Self(
            items
                .into_iter()
                .sorted_by(|a, b| a.distance.total_cmp(&b.distance))
                .take(MAX_RESULTS)
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[Restaurant] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Restaurant> {
        self.0
    }
}

impl Deref for ResultSet {
    type Target = [Restaurant];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Restaurant;
    type IntoIter = std::slice::Iter<'a, Restaurant>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Issues explore calls through a [`PlacesTransport`].
#[derive(Debug, Clone)]
pub struct SearchClient<T> {
    transport: T,
    settings: SearchSettings,
}

impl<T: PlacesTransport> SearchClient<T> {
    pub const fn new(transport: T, settings: SearchSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    pub const fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Search around two form fields.
    ///
    /// Fails with [`SearchError::InvalidCoordinates`] before touching the
    /// network if either field is invalid.
    pub async fn search(
        &self,
        latitude: &CoordinateInput,
        longitude: &CoordinateInput,
    ) -> Result<ResultSet> {
        let coordinates = Coordinates::try_from_inputs(latitude, longitude)?;
        self.search_at(coordinates).await
    }

    #[instrument(name = "Search restaurants", skip(self, coordinates), fields(%coordinates), level = "info")]
    pub async fn search_at(&self, coordinates: Coordinates) -> Result<ResultSet> {
        if self.settings.api_key.trim().is_empty() {
            return Err(SearchError::MissingApiKey);
        }

        let request = self.request_for(coordinates);
        let items = fetch_explore(&self.transport, &request).await?;
        let fetched = items.len();

        let results = ResultSet::rank(items);
        info!(fetched, kept = results.len(), "Search complete");
        debug!(
            nearest = ?results.first().map(|r| (&r.title, r.distance)),
            "Nearest result"
        );
        Ok(results)
    }

    fn request_for(&self, coordinates: Coordinates) -> ExploreRequest {
        ExploreRequest {
            endpoint: self.settings.endpoint.clone(),
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            radius_meters: self.settings.radius_meters,
            category: self.settings.category.clone(),
            page_size: self.settings.page_size,
            api_key: self.settings.api_key.clone(),
        }
    }
}
