//! Wire contract for the HERE Places "explore" endpoint.
//!
//! This crate knows how to build an explore request for a point and radius,
//! how to send it through a [`PlacesTransport`], and how to decode the body
//! into [`Restaurant`] records. Ranking and UI state live in the `eatnear`
//! crate.

pub mod model;
pub mod request;
pub mod transport;

pub const DEFAULT_ENDPOINT: &str = "https://places.ls.hereapi.com/places/v1/discover/explore";
/// Radius of the search circle in meters.
pub const DEFAULT_RADIUS_METERS: u32 = 10_000;
pub const DEFAULT_CATEGORY: &str = "restaurant";
/// How many items the upstream is asked for before local ranking.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum PlacesError {
        #[error("HTTP error: {0}")]
        Http(#[from] reqwest::Error),
        #[error("HTTP {status} from {endpoint}")]
        Status { status: u16, endpoint: String },
        #[error("Invalid endpoint '{endpoint}': {reason}")]
        InvalidEndpoint { endpoint: String, reason: String },
        #[error("Unexpected response shape: {0}")]
        Parse(#[from] serde_json::Error),
    }

    pub type Result<T> = std::result::Result<T, PlacesError>;
}

pub use error::{PlacesError, Result};

// Re-export main types
pub use model::{ExploreResponse, Restaurant, Tag};
pub use request::ExploreRequest;
pub use reqwest::Url;
pub use transport::{PlacesTransport, ReqwestTransport, fetch_explore};
