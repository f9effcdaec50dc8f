//! eatnear - Nearest Restaurant Finder
//!
//! eatnear takes a pair of coordinates, typed by hand or read from the device,
//! asks the HERE Places API for restaurants within 10 km, and keeps the ten
//! nearest as an expandable list.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use eatnear::{FinderConfig, RestaurantFinder};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), eatnear::error::EatnearError> {
//! // Reads $EATNEAR_CONFIG or the platform config file, then $EATNEAR_API_KEY
//! let config = FinderConfig::load()?;
//! let mut finder = RestaurantFinder::from_config(&config)?;
//!
//! finder.set_latitude("48.8566");
//! finder.set_longitude("2.3522");
//! if finder.can_submit() {
//!     let found = finder.search().await?;
//!     println!("{found} restaurants nearby");
//! }
//!
//! // Open the nearest one
//! finder.expand(0);
//! print!("{}", finder.render());
//! # Ok(())
//! # }
//! ```
//!
//! # Pieces
//!
//! - **Coordinate input**: raw text kept verbatim, validity derived from the
//!   `[-90, 90]` / `[-180, 180]` ranges ([`coordinate`])
//! - **Geolocation**: permission handshake over a [`DeviceLocation`]
//!   ([`geolocation`])
//! - **Search**: one explore call, ranked nearest first and cut to ten
//!   ([`search`])
//! - **Result list**: a single expanded row at a time ([`results`])
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

pub mod config;
mod core;
pub mod coordinate;
pub mod error;
pub mod geolocation;
pub mod results;
pub mod search;

pub use crate::core::{FinderError, LoadingFlag, RestaurantFinder};

pub use config::{DeviceConfig, FinderConfig, FinderConfigBuilder, SearchSettings};
pub use coordinate::{
    Axis, CoordinateInput, Coordinates, ValidationError, validate, validate_latitude,
    validate_longitude,
};
pub use eatnear_places as places;
pub use eatnear_places::{PlacesTransport, ReqwestTransport, Restaurant, Tag};
pub use geolocation::{
    ConfiguredDevice, DeviceLocation, GeolocationOutcome, PermissionState, Position,
    PositionError,
};
pub use results::{ExpansionState, NO_RESULTS_MESSAGE, ResultList, RowDisplay};
pub use search::{MAX_RESULTS, ResultSet, SearchClient, SearchError};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for eatnear.
///
/// Installs a `fmt` subscriber filtered at `level`, unless `RUST_LOG` is set.
/// Only the first call installs anything; later calls are no-ops.
///
/// # Examples
///
/// ```rust
/// use eatnear::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), eatnear::error::EatnearError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::EatnearError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("hyper_util=warn".parse()?)
            .add_directive("reqwest=warn".parse()?);

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .init();
        Ok(())
    })
}
