use crate::profile::{Coordinates, NewProfile, Profile, ProfilePatch};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// The admin form exactly as typed: plain strings, interests comma separated.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
#[serde(default)]
pub struct ProfileForm {
    pub name: String,
    pub photo: String,
    pub description: String,
    pub address: String,
    pub contact: String,
    pub interests: String,
}

impl ProfileForm {
    /// Pre-filled form for editing `profile`.
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            photo: profile.photo.clone(),
            description: profile.description.clone(),
            address: profile.address.clone(),
            contact: profile.contact.clone().unwrap_or_default(),
            interests: profile
                .interests
                .as_deref()
                .map(|interests| interests.join(", "))
                .unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<(), FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::MissingField("name"));
        }
        if self.address.trim().is_empty() {
            return Err(FormError::MissingField("address"));
        }
        Ok(())
    }

    /// A new profile with placeholder coordinates; nothing is geocoded here.
    pub fn into_new_profile(self) -> Result<NewProfile, FormError> {
        self.validate()?;
        let (contact, interests) = (parse_contact(&self.contact), parse_interests(&self.interests));
        Ok(NewProfile {
            name: self.name,
            photo: self.photo,
            description: self.description,
            address: self.address,
            coordinates: Coordinates::default(),
            contact,
            interests: Some(interests),
        })
    }

    /// A patch overwriting every form field while keeping `coordinates`.
    /// A blank contact is stored as an empty string so an edit can clear it.
    pub fn into_patch(self, coordinates: Coordinates) -> Result<ProfilePatch, FormError> {
        self.validate()?;
        let interests = parse_interests(&self.interests);
        Ok(ProfilePatch {
            name: Some(self.name),
            photo: Some(self.photo),
            description: Some(self.description),
            address: Some(self.address),
            coordinates: Some(coordinates),
            contact: Some(self.contact.trim().to_string()),
            interests: Some(interests),
        })
    }
}

pub fn parse_interests(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

fn parse_contact(raw: &str) -> Option<String> {
    let contact = raw.trim();
    (!contact.is_empty()).then(|| contact.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed_profiles;
    use rstest::rstest;

    fn form() -> ProfileForm {
        ProfileForm {
            name: "Amy".to_string(),
            address: "X".to_string(),
            interests: " Chess, ,Go ,Chess".to_string(),
            ..Default::default()
        }
    }

    #[rstest]
    #[case("", Vec::<&str>::new())]
    #[case(" , ,", Vec::<&str>::new())]
    #[case("Design", vec!["Design"])]
    #[case("Design, Art ,Travel", vec!["Design", "Art", "Travel"])]
    #[case("Art,Art", vec!["Art", "Art"])]
    fn interests_are_trimmed_and_blank_items_dropped(
        #[case] raw: &str,
        #[case] expected: Vec<&str>,
    ) {
        assert_eq!(parse_interests(raw), expected);
    }

    #[test]
    fn new_profile_from_form() {
        let profile = form().into_new_profile().unwrap();
        assert_eq!(profile.name, "Amy");
        assert_eq!(profile.coordinates, Coordinates::default());
        assert_eq!(profile.contact, None);
        assert_eq!(
            profile.interests,
            Some(vec!["Chess".to_string(), "Go".to_string(), "Chess".to_string()])
        );
    }

    #[test]
    fn name_and_address_are_required() {
        let mut missing_name = form();
        missing_name.name = "  ".to_string();
        assert_eq!(
            missing_name.into_new_profile().unwrap_err(),
            FormError::MissingField("name")
        );

        let mut missing_address = form();
        missing_address.address.clear();
        assert_eq!(
            missing_address.validate().unwrap_err().to_string(),
            "address is required"
        );
    }

    #[test]
    fn edit_round_trip_keeps_coordinates() {
        let profiles = seed_profiles();
        let john = &profiles[0];
        let edit = ProfileForm::from_profile(john);
        assert_eq!(edit.interests, "Programming, Hiking, Photography");
        assert_eq!(edit.contact, "john.doe@example.com");

        let mut updated = john.clone();
        edit.into_patch(john.coordinates).unwrap().apply_to(&mut updated);
        assert_eq!(&updated, john);
    }

    #[test]
    fn blank_contact_clears_on_edit() {
        let profiles = seed_profiles();
        let john = &profiles[0];
        let mut edit = ProfileForm::from_profile(john);
        edit.contact = " ".to_string();

        let patch = edit.into_patch(john.coordinates).unwrap();
        assert_eq!(patch.contact.as_deref(), Some(""));
    }
}
