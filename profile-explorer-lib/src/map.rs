//! Seams towards the mapping provider.
//!
//! The directory never draws maps or resolves addresses itself. Views build a
//! [`MapView`] from a profile and hand it to a [`MapRenderer`]; address lookups
//! go through an injected [`Geocoder`].

use crate::profile::{Coordinates, Profile};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_ZOOM: u8 = 12;
/// Zoom used by the profile detail page.
pub const DETAIL_ZOOM: u8 = 14;
pub const DEFAULT_MARKER_TITLE: &str = "Location";

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Marker {
    pub position: Coordinates,
    pub title: String,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub marker: Option<Marker>,
}

impl MapView {
    /// Map centred on `coordinates`, or on `{0, 0}` without a marker when
    /// there is nothing to show.
    pub fn new(coordinates: Option<Coordinates>, address: Option<&str>, zoom: u8) -> Self {
        let title = address
            .filter(|a| !a.is_empty())
            .unwrap_or(DEFAULT_MARKER_TITLE)
            .to_string();

        match coordinates {
            Some(position) => Self {
                center: position,
                zoom,
                marker: Some(Marker { position, title }),
            },
            None => Self {
                center: Coordinates::default(),
                zoom,
                marker: None,
            },
        }
    }

    /// Profiles always carry coordinates, so a marker is always placed, even
    /// on the `{0, 0}` placeholder of a profile nobody geocoded.
    pub fn for_profile(profile: &Profile, zoom: u8) -> Self {
        Self::new(Some(profile.coordinates), Some(&profile.address), zoom)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("Geocode was not successful: {0}")]
    Unsuccessful(String),
    #[error("Geocoding service unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError>;
}

/// Fixed address book. Lookups ignore case and surrounding whitespace.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    known: HashMap<String, Coordinates>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Knows the addresses of the given profiles, skipping ungeocoded ones.
    pub fn from_profiles<'a>(profiles: impl IntoIterator<Item = &'a Profile>) -> Self {
        profiles
            .into_iter()
            .filter(|p| !p.coordinates.is_unset())
            .fold(Self::new(), |geocoder, p| {
                geocoder.with_address(&p.address, p.coordinates)
            })
    }

    pub fn with_address(mut self, address: &str, coordinates: Coordinates) -> Self {
        self.known.insert(normalize(address), coordinates);
        self
    }
}

fn normalize(address: &str) -> String {
    address.trim().to_lowercase()
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        self.known
            .get(&normalize(address))
            .copied()
            .ok_or_else(|| GeocodeError::Unsuccessful("ZERO_RESULTS".to_string()))
    }
}

pub trait MapRenderer: Send + Sync {
    /// A location a browser can open to show `view`.
    fn render(&self, view: &MapView) -> String;
}

#[derive(Debug, Clone)]
pub struct OsmLinkRenderer {
    base_url: String,
}

impl OsmLinkRenderer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for OsmLinkRenderer {
    fn default() -> Self {
        Self::new("https://www.openstreetmap.org/")
    }
}

impl MapRenderer for OsmLinkRenderer {
    fn render(&self, view: &MapView) -> String {
        let center = view.center;
        let fragment = format!("#map={}/{}/{}", view.zoom, center.lat, center.lng);
        match &view.marker {
            Some(marker) => format!(
                "{}?mlat={}&mlon={}{}",
                self.base_url, marker.position.lat, marker.position.lng, fragment
            ),
            None => format!("{}{}", self.base_url, fragment),
        }
    }
}
