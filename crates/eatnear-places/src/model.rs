//! Response records of the explore endpoint.

use serde::{Deserialize, Serialize};

/// Separator the upstream uses between address lines in `vicinity`.
pub const VICINITY_LINE_BREAK: &str = "<br/>";

/// Highest star count a rating can render as.
pub const MAX_STARS: usize = 5;

/// Top-level body: `{ "results": { "items": [...] } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExploreResponse {
    pub results: ExploreResults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExploreResults {
    pub items: Vec<Restaurant>,
}

impl ExploreResponse {
    /// Decode a raw response body.
    pub fn from_slice(body: &[u8]) -> crate::Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    pub fn into_items(self) -> Vec<Restaurant> {
        self.results.items
    }
}

/// A single venue as returned by the places API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    /// Distance from the search centre in meters
    pub distance: f64,
    pub title: String,
    /// Address lines joined by [`VICINITY_LINE_BREAK`]
    pub vicinity: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// `[latitude, longitude]`
    pub position: [f64; 2],
    #[serde(default)]
    pub average_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub title: String,
}

impl Restaurant {
    /// Single-line address, e.g. `"Drottninggatan 1, 111 51 Stockholm"`.
    pub fn address(&self) -> String {
        self.vicinity
            .split(VICINITY_LINE_BREAK)
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whole stars for the average rating, clamped to `0..=5`.
    pub fn stars(&self) -> usize {
        if self.average_rating.is_finite() && self.average_rating > 0.0 {
            (self.average_rating.floor() as usize).min(MAX_STARS)
        } else {
            0
        }
    }

    pub fn latitude(&self) -> f64 {
        self.position[0]
    }

    pub fn longitude(&self) -> f64 {
        self.position[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_BODY: &str = r#"{
        "results": {
            "items": [
                {
                    "distance": 120,
                    "title": "Pelikan",
                    "vicinity": "Blekingegatan 40<br/>116 62 Stockholm",
                    "tags": [{"title": "swedish"}, {"title": "husmanskost"}],
                    "position": [59.31, 18.07],
                    "averageRating": 4.3,
                    "icon": "https://download.vcdn.data.here.com/p/d/places2/icons/categories/03.icon"
                },
                {
                    "distance": 45,
                    "title": "Kiosk",
                    "vicinity": "Götgatan 1",
                    "position": [59.32, 18.071]
                }
            ]
        }
    }"#;

    #[test]
    fn test_decode_explore_response() {
        let response = ExploreResponse::from_slice(SAMPLE_BODY.as_bytes()).unwrap();
        let items = response.into_items();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Pelikan");
        assert_eq!(items[0].distance, 120.0);
        assert_eq!(items[0].tags.len(), 2);
        assert_eq!(items[0].tags[1].title, "husmanskost");
        assert_eq!(items[0].latitude(), 59.31);
        assert_eq!(items[0].longitude(), 18.07);
    }

    #[test]
    fn test_optional_fields_default() {
        let items = ExploreResponse::from_slice(SAMPLE_BODY.as_bytes())
            .unwrap()
            .into_items();

        let kiosk = &items[1];
        assert!(kiosk.tags.is_empty(), "Missing tags should decode as empty");
        assert_eq!(kiosk.average_rating, 0.0);
        assert_eq!(kiosk.stars(), 0);
    }

    #[test]
    fn test_shape_deviation_is_an_error() {
        // items nested one level too shallow
        let body = br#"{"items": []}"#;
        assert!(ExploreResponse::from_slice(body).is_err());

        // position must be a pair
        let body = br#"{"results": {"items": [{"distance": 1, "title": "x", "vicinity": "y", "position": [1.0]}]}}"#;
        assert!(ExploreResponse::from_slice(body).is_err());

        assert!(ExploreResponse::from_slice(b"<html>502 Bad Gateway</html>").is_err());
    }

    #[test]
    fn test_address_joins_vicinity_lines() {
        let restaurant = Restaurant {
            distance: 10.0,
            title: "Test".to_string(),
            vicinity: "Drottninggatan 1<br/>111 51 Stockholm".to_string(),
            tags: vec![],
            position: [0.0, 0.0],
            average_rating: 0.0,
        };
        assert_eq!(restaurant.address(), "Drottninggatan 1, 111 51 Stockholm");
    }

    #[test]
    fn test_stars() {
        let mut restaurant = Restaurant {
            distance: 10.0,
            title: "Test".to_string(),
            vicinity: String::new(),
            tags: vec![],
            position: [0.0, 0.0],
            average_rating: 4.9,
        };
        assert_eq!(restaurant.stars(), 4);

        restaurant.average_rating = 3.0;
        assert_eq!(restaurant.stars(), 3);

        restaurant.average_rating = 11.0;
        assert_eq!(restaurant.stars(), MAX_STARS);

        restaurant.average_rating = -1.0;
        assert_eq!(restaurant.stars(), 0);

        restaurant.average_rating = f64::NAN;
        assert_eq!(restaurant.stars(), 0);
    }
}
