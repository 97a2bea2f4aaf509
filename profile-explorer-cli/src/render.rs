use profile_explorer_lib::{DirectoryState, Profile};
use std::fmt::Write;

/// One line per profile, as shown in pick lists.
pub fn profile_line(profile: &Profile) -> String {
    format!(
        "{} - {} ({})",
        profile.name, profile.description, profile.address
    )
}

pub fn profile_details(profile: &Profile, map_url: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", profile.name);
    let _ = writeln!(out, "  {}", profile.description);
    if !profile.photo.is_empty() {
        let _ = writeln!(out, "  Photo:     {}", profile.photo);
    }
    let _ = writeln!(out, "  Address:   {}", profile.address);
    if let Some(contact) = profile.contact.as_deref().filter(|c| !c.is_empty()) {
        let _ = writeln!(out, "  Contact:   {}", contact);
    }
    if let Some(interests) = profile.interests.as_deref().filter(|i| !i.is_empty()) {
        let _ = writeln!(out, "  Interests: {}", interests.join(", "));
    }
    if profile.coordinates.is_unset() {
        let _ = writeln!(out, "  Location:  not geocoded yet");
    }
    let _ = write!(out, "  Map:       {}", map_url);
    out
}

/// The filtered view, or a hint when it is empty.
pub fn listing(state: &DirectoryState) -> String {
    if state.loading {
        return "Loading profiles...".to_string();
    }
    if state.filtered_profiles.is_empty() {
        return "No profiles found".to_string();
    }
    state
        .filtered_profiles
        .iter()
        .map(profile_line)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn error_banner(state: &DirectoryState) -> Option<String> {
    state.error.as_ref().map(|error| format!("! {}", error))
}
