use reqwest::Url;

use crate::{
    DEFAULT_CATEGORY, DEFAULT_ENDPOINT, DEFAULT_PAGE_SIZE, DEFAULT_RADIUS_METERS, PlacesError,
    Result,
};

/// Parameters of a single explore call.
///
/// The query string has the shape
/// `in={lat},{lon};r={radius}&cat={category}&size={page_size}&apiKey={key}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExploreRequest {
    pub endpoint: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: u32,
    pub category: String,
    pub page_size: u32,
    pub api_key: String,
}

impl ExploreRequest {
    /// Request around a point with the default radius, category and page size.
    pub fn around(latitude: f64, longitude: f64, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            latitude,
            longitude,
            radius_meters: DEFAULT_RADIUS_METERS,
            category: DEFAULT_CATEGORY.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            api_key: api_key.into(),
        }
    }

    pub fn url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint).map_err(|e| PlacesError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        })?;

        // `in` keeps its literal `,` `;` `=` separators, the key is form-encoded
        url.set_query(Some(&format!(
            "in={},{};r={}&cat={}&size={}",
            self.latitude, self.longitude, self.radius_meters, self.category, self.page_size
        )));
        url.query_pairs_mut().append_pair("apiKey", &self.api_key);

        Ok(url)
    }
}
