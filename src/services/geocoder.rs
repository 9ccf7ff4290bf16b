//! Forward geocoding of free-text place descriptions.

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::phone::Coordinates;

/// Turns a place description into coordinates.
///
/// `Ok(None)` means the service answered but knew no such place.
pub trait Geocoder: Send + Sync {
    fn locate(&self, query: &str) -> Result<Option<Coordinates>>;
}

/// Best-effort wrapper used by the lookup: any failure or an empty
/// description yields `None` and never reaches the caller as an error.
pub fn resolve_coordinates(geocoder: &dyn Geocoder, description: &str) -> Option<Coordinates> {
    let description = description.trim();
    if description.is_empty() {
        return None;
    }

    match geocoder.locate(description) {
        Ok(found) => {
            debug!(target: "geocoder", "'{}' -> {:?}", description, found);
            found
        }
        Err(e) => {
            warn!(target: "geocoder", "Geocoding '{}' failed: {:#}", description, e);
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// Client for a Nominatim-compatible `/search` endpoint
pub struct NominatimGeocoder {
    client: Client,
    search_url: String,
}

impl NominatimGeocoder {
    pub fn new(client: Client, search_url: &str) -> Self {
        Self {
            client,
            search_url: search_url.to_string(),
        }
    }
}

impl Geocoder for NominatimGeocoder {
    fn locate(&self, query: &str) -> Result<Option<Coordinates>> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .with_context(|| format!("Request to {} failed", self.search_url))?;

        if !response.status().is_success() {
            return Err(anyhow!("Geocoder returned HTTP {}", response.status()));
        }

        let body = response.text()?;
        parse_search_response(&body)
    }
}

/// First hit of a Nominatim JSON search response
pub fn parse_search_response(body: &str) -> Result<Option<Coordinates>> {
    let places: Vec<NominatimPlace> =
        serde_json::from_str(body).context("Unexpected geocoder response")?;

    let Some(place) = places.into_iter().next() else {
        return Ok(None);
    };

    let latitude: f64 = place
        .lat
        .parse()
        .with_context(|| format!("Bad latitude '{}'", place.lat))?;
    let longitude: f64 = place
        .lon
        .parse()
        .with_context(|| format!("Bad longitude '{}'", place.lon))?;

    Ok(Some(Coordinates::new(latitude, longitude)))
}

/// Geocoder that never looks anything up, for when geocoding is switched off
pub struct DisabledGeocoder;

impl Geocoder for DisabledGeocoder {
    fn locate(&self, _query: &str) -> Result<Option<Coordinates>> {
        Ok(None)
    }
}
