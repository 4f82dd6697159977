use layers::feature::Feature;
use layers::properties::{COUNTRY_ADMIN, COUNTRY_NAME, SUBNATIONAL_NAME};

/// `"{name}, {admin}"` when both exist and differ ignoring case, otherwise
/// whichever exists.
///
/// A feature with neither property yields `None`, the same outcome as no
/// feature at all.
pub fn country_label(feature: &Feature) -> Option<String> {
    let name = feature.text(&COUNTRY_NAME);
    let admin = feature.text(&COUNTRY_ADMIN);
    match (name, admin) {
        (Some(n), Some(a)) if n.to_lowercase() != a.to_lowercase() => Some(format!("{n}, {a}")),
        (Some(n), _) => Some(n),
        (None, a) => a,
    }
}

pub fn subnational_label(feature: &Feature, nation: &str) -> Option<String> {
    feature
        .text(&SUBNATIONAL_NAME)
        .map(|state| qualified(&state, nation))
}

pub fn qualified(area: &str, nation: &str) -> String {
    format!("{area}, {nation}")
}

/// Already in `"{area}, {nation}"` form.
pub fn is_qualified(label: &str, nation: &str) -> bool {
    label
        .strip_suffix(nation)
        .is_some_and(|rest| rest.ends_with(", "))
}

/// Case-insensitive whole-word search: `"India"` matches `"Delhi, India"`
/// but not `"Indiana"`.
pub fn mentions_word(haystack: &str, word: &str) -> bool {
    let word = word.to_lowercase();
    if word.is_empty() {
        return false;
    }
    let hay = haystack.to_lowercase();
    hay.match_indices(&word).any(|(start, m)| {
        let before = hay[..start].chars().next_back();
        let after = hay[start + m.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
