use crate::profile::Profile;

/// Profiles whose name, description or address contains `query`,
/// ignoring case. An empty query keeps everything. Order is preserved.
pub fn filter_profiles(profiles: &[Profile], query: &str) -> Vec<Profile> {
    if query.is_empty() {
        return profiles.to_vec();
    }

    let needle = query.to_lowercase();
    profiles
        .iter()
        .filter(|profile| matches(profile, &needle))
        .cloned()
        .collect()
}

fn matches(profile: &Profile, needle: &str) -> bool {
    [&profile.name, &profile.description, &profile.address]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed_profiles;
    use rstest::rstest;

    fn ids(profiles: &[Profile]) -> Vec<&str> {
        profiles.iter().map(|p| p.id.as_str()).collect()
    }

    #[rstest]
    #[case("jane", &["2"])]
    #[case("JOHN", &["1"])]
    #[case("designer", &["2"])]
    #[case("mountain view", &["1"])]
    #[case(", CA", &["1", "2"])]
    #[case("hiking", &[])]
    #[case("john.doe@example.com", &[])]
    #[case("zzz", &[])]
    fn filters_on_name_description_and_address(#[case] query: &str, #[case] expected: &[&str]) {
        let profiles = seed_profiles();
        assert_eq!(ids(&filter_profiles(&profiles, query)), expected);
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let profiles = seed_profiles();
        assert_eq!(filter_profiles(&profiles, ""), profiles);
    }

    #[test]
    fn every_match_contains_the_query() {
        let profiles = seed_profiles();
        for query in ["a", "In", "oe", "1"] {
            let needle = query.to_lowercase();
            for profile in filter_profiles(&profiles, query) {
                assert!(
                    profile.name.to_lowercase().contains(&needle)
                        || profile.description.to_lowercase().contains(&needle)
                        || profile.address.to_lowercase().contains(&needle)
                );
            }
        }
    }

    #[test]
    fn filtering_is_idempotent() {
        let profiles = seed_profiles();
        let once = filter_profiles(&profiles, "ca");
        assert_eq!(filter_profiles(&once, "ca"), once);
    }
}
