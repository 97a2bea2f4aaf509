use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in degrees. `{0, 0}` stands for "not geocoded yet".
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Copy, Default)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_unset(&self) -> bool {
        self.lat == 0.0 && self.lng == 0.0
    }
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub photo: String,
    pub description: String,
    pub address: String,
    pub coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
}

/// A profile as submitted for creation, before the store assigns an id.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewProfile {
    pub name: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub description: String,
    pub address: String,
    #[serde(default)]
    pub coordinates: Coordinates,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub interests: Option<Vec<String>>,
}

impl NewProfile {
    pub fn with_id(self, id: String) -> Profile {
        Profile {
            id,
            name: self.name,
            photo: self.photo,
            description: self.description,
            address: self.address,
            coordinates: self.coordinates,
            contact: self.contact,
            interests: self.interests,
        }
    }
}

/// Partial update. Every present field replaces the stored value wholesale,
/// `coordinates` included.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
}

impl ProfilePatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn coordinates(coordinates: Coordinates) -> Self {
        Self {
            coordinates: Some(coordinates),
            ..Default::default()
        }
    }

    /// Shallow merge over `profile`. The id is never touched.
    pub fn apply_to(self, profile: &mut Profile) {
        if let Some(name) = self.name {
            profile.name = name;
        }
        if let Some(photo) = self.photo {
            profile.photo = photo;
        }
        if let Some(description) = self.description {
            profile.description = description;
        }
        if let Some(address) = self.address {
            profile.address = address;
        }
        if let Some(coordinates) = self.coordinates {
            profile.coordinates = coordinates;
        }
        if let Some(contact) = self.contact {
            profile.contact = Some(contact);
        }
        if let Some(interests) = self.interests {
            profile.interests = Some(interests);
        }
    }
}
