use std::env;
use std::str::FromStr;

use catalog::{DatasetNames, FilesystemSource, GeoDataSource, HttpSource};
use forecast::{DEFAULT_PREDICTION_URL, HttpPredictionClient};
use geocoding::{
    CachedGeocoder, DEFAULT_BASE_URL, DEFAULT_REVERSE_ZOOM, DEFAULT_USER_AGENT, GeocodeError,
    NominatimClient,
};
use resolver::{DEFAULT_FINE_GRAINED_NATION, DEFAULT_NEAREST_PLACE_KM, ResolverConfig};
use scene::picking::GlobeFrame;
use tracing::warn;

pub const DEFAULT_DATA_ROOT: &str = "geojson";
pub const DEFAULT_GEOCODE_CACHE_SIZE: usize = 1024;
pub const DEFAULT_MAP_ZOOM: u8 = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct PickerConfig {
    /// Directory of GeoJSON files, or an `http(s)://` base URL serving them.
    pub data_root: String,
    pub datasets: DatasetNames,
    pub fine_grained_nation: Option<String>,
    pub geocoder_url: String,
    pub user_agent: String,
    pub reverse_zoom: u8,
    pub geocode_cache_size: usize,
    pub prediction_url: String,
    pub nearest_place_km: f64,
    pub globe: GlobeFrame,
    pub map_zoom: u8,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl PickerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        // Empty disables.
        let optional = |key: &str, default: &str| {
            let v = text(key, default);
            let v = v.trim();
            (!v.is_empty()).then(|| v.to_string())
        };
        let defaults = DatasetNames::default();
        let globe = GlobeFrame::default();

        Self {
            data_root: text("PICKER_DATA_ROOT", DEFAULT_DATA_ROOT),
            datasets: DatasetNames {
                land: text("PICKER_LAND_DATASET", &defaults.land),
                countries: text("PICKER_COUNTRIES_DATASET", &defaults.countries),
                subnational: optional(
                    "PICKER_SUBNATIONAL_DATASET",
                    defaults.subnational.as_deref().unwrap_or_default(),
                ),
                populated_places: text("PICKER_PLACES_DATASET", &defaults.populated_places),
            },
            fine_grained_nation: optional("PICKER_FINE_GRAINED_NATION", DEFAULT_FINE_GRAINED_NATION),
            geocoder_url: text("PICKER_GEOCODER_URL", DEFAULT_BASE_URL),
            user_agent: text("PICKER_USER_AGENT", DEFAULT_USER_AGENT),
            reverse_zoom: parsed(&lookup, "PICKER_REVERSE_ZOOM", DEFAULT_REVERSE_ZOOM),
            geocode_cache_size: parsed(&lookup, "PICKER_GEOCODE_CACHE_SIZE", DEFAULT_GEOCODE_CACHE_SIZE),
            prediction_url: text("PICKER_PREDICTION_URL", DEFAULT_PREDICTION_URL),
            nearest_place_km: parsed(&lookup, "PICKER_NEAREST_PLACE_KM", DEFAULT_NEAREST_PLACE_KM),
            globe: GlobeFrame {
                radius: parsed(&lookup, "PICKER_GLOBE_RADIUS", globe.radius),
                pick_radius: parsed(&lookup, "PICKER_PICK_RADIUS", globe.pick_radius),
                camera_distance: parsed(&lookup, "PICKER_CAMERA_DISTANCE", globe.camera_distance),
                ..globe
            },
            map_zoom: parsed(&lookup, "PICKER_MAP_ZOOM", DEFAULT_MAP_ZOOM),
        }
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            nearest_place_km: self.nearest_place_km,
            fine_grained_nation: self.fine_grained_nation.clone(),
        }
    }

    pub fn data_source(&self) -> Box<dyn GeoDataSource> {
        let root = self.data_root.as_str();
        if root.starts_with("http://") || root.starts_with("https://") {
            Box::new(HttpSource::new(root))
        } else {
            Box::new(FilesystemSource::new(root))
        }
    }

    pub fn geocoder(&self) -> Result<CachedGeocoder<NominatimClient>, GeocodeError> {
        let client = NominatimClient::new(self.geocoder_url.clone(), &self.user_agent)?
            .with_zoom(self.reverse_zoom);
        Ok(CachedGeocoder::new(client, self.geocode_cache_size))
    }

    pub fn prediction_client(&self) -> HttpPredictionClient {
        HttpPredictionClient::new(self.prediction_url.clone())
    }
}

fn parsed<T: FromStr + Copy>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(key, value = raw, "unparseable setting, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PickerConfig;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> PickerConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PickerConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_match_bundled_data() {
        let c = PickerConfig::default();
        assert_eq!(c.data_root, "geojson");
        assert_eq!(c.datasets.countries, "countries_states.geojson");
        assert_eq!(c.datasets.subnational.as_deref(), Some("india_states.geojson"));
        assert_eq!(c.fine_grained_nation.as_deref(), Some("India"));
        assert_eq!(c.reverse_zoom, 10);
        assert_eq!(c.geocode_cache_size, 1024);
        assert_eq!(c.nearest_place_km, 10.0);
        assert_eq!(c.globe.pick_radius, 2.01);
        assert_eq!(c.map_zoom, 12);
    }

    #[test]
    fn overrides_and_bad_numbers() {
        let c = config(&[
            ("PICKER_NEAREST_PLACE_KM", "25"),
            ("PICKER_MAP_ZOOM", "twelve"),
            ("PICKER_SUBNATIONAL_DATASET", ""),
            ("PICKER_FINE_GRAINED_NATION", "Brazil"),
        ]);
        assert_eq!(c.nearest_place_km, 25.0);
        assert_eq!(c.map_zoom, 12, "unparseable value falls back");
        assert_eq!(c.datasets.subnational, None);
        assert_eq!(c.resolver_config().fine_grained_nation.as_deref(), Some("Brazil"));
    }

    #[test]
    fn data_root_picks_source_kind() {
        let c = config(&[("PICKER_DATA_ROOT", "https://example.org/geojson")]);
        assert_eq!(c.data_source().describe(), "http:https://example.org/geojson");
        assert_eq!(
            PickerConfig::default().data_source().describe(),
            "filesystem:geojson"
        );
    }
}
