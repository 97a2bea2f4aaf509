pub mod directory;
pub mod form;
pub mod map;
pub mod profile;
pub mod search;
pub mod store;

pub use directory::{DirectoryState, ProfileDirectory};
pub use form::{FormError, ProfileForm};
pub use map::{
    GeocodeError, Geocoder, MapRenderer, MapView, Marker, OsmLinkRenderer, StaticGeocoder,
};
pub use profile::{Coordinates, NewProfile, Profile, ProfilePatch};
pub use search::filter_profiles;
pub use store::{MockProfileStore, ProfileStore, StoreError};
