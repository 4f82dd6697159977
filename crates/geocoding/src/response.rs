use foundation::fields::{FieldAliases, value_number};
use foundation::math::GeoPoint;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Most specific populated-place field first.
pub const PREFERRED_NAME: FieldAliases = FieldAliases::new(
    "address.preferred",
    &[
        "city",
        "town",
        "village",
        "hamlet",
        "locality",
        "municipality",
        "county",
        "state_district",
        "state",
        "region",
        "country",
    ],
);

/// First-level administrative area (state, province).
pub const ADMIN_AREA: FieldAliases = FieldAliases::new(
    "address.admin_area",
    &["state", "state_district", "region", "county"],
);

pub const COUNTRY: FieldAliases = FieldAliases::new("address.country", &["country"]);

/// Body of a reverse lookup. Nominatim answers with `{"error": ...}` and a
/// 200 for points it cannot name (open ocean), so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReverseGeocodeResponse {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: Option<Map<String, Value>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ReverseGeocodeResponse {
    pub fn preferred_name(&self) -> Option<String> {
        self.address.as_ref().and_then(|a| PREFERRED_NAME.text(a))
    }

    pub fn admin_area(&self) -> Option<String> {
        self.address.as_ref().and_then(|a| ADMIN_AREA.text(a))
    }

    pub fn country(&self) -> Option<String> {
        self.address.as_ref().and_then(|a| COUNTRY.text(a))
    }

    /// Leading segment of `display_name`, e.g. `"Lyon"` for
    /// `"Lyon, Métropole de Lyon, France"`.
    pub fn display_head(&self) -> Option<String> {
        let head = self.display_name.as_deref()?.split(',').next()?.trim();
        (!head.is_empty()).then(|| head.to_string())
    }
}

/// One forward-search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub point: GeoPoint,
    pub display_name: Option<String>,
}

/// Search results carry coordinates as strings.
#[derive(Debug, Deserialize)]
pub(crate) struct RawSearchHit {
    lat: Value,
    lon: Value,
    #[serde(default)]
    display_name: Option<String>,
}

impl RawSearchHit {
    pub(crate) fn into_hit(self) -> Option<SearchHit> {
        let lat = value_number(&self.lat)?;
        let lon = value_number(&self.lon)?;
        Some(SearchHit {
            point: GeoPoint::new(lat, lon),
            display_name: self.display_name,
        })
    }
}
