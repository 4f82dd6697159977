use layers::feature::FeatureCollection;
use layers::places::PopulatedPlace;
use tracing::{info, warn};

use crate::source::{DataSourceError, GeoDataSource};

/// File names of the datasets to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetNames {
    pub land: String,
    pub countries: String,
    /// Optional finer boundaries (states/provinces) for one nation.
    pub subnational: Option<String>,
    pub populated_places: String,
}

impl Default for DatasetNames {
    fn default() -> Self {
        Self {
            land: "ne_110m_land.json".to_string(),
            countries: "countries_states.geojson".to_string(),
            subnational: Some("india_states.geojson".to_string()),
            populated_places: "pop_places.geojson".to_string(),
        }
    }
}

/// Geographic data loaded once at startup. Anything that failed to load is
/// `None` and the layers that need it are skipped.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    /// Base layer for the globe renderer; not used for naming.
    pub land: Option<FeatureCollection>,
    pub countries: Option<FeatureCollection>,
    pub subnational: Option<FeatureCollection>,
    pub populated_places: Option<Vec<PopulatedPlace>>,
}

impl Datasets {
    /// Loads every dataset concurrently. Never fails; see the type docs.
    pub async fn load(source: &dyn GeoDataSource, names: &DatasetNames) -> Self {
        info!(source = %source.describe(), "loading geographic datasets");

        let subnational = async {
            match &names.subnational {
                Some(name) => load_or_warn(name, load_boundaries(source, name).await),
                None => None,
            }
        };
        let (land, countries, subnational, populated_places) = futures_util::join!(
            async { load_or_warn(&names.land, load_boundaries(source, &names.land).await) },
            async {
                load_or_warn(&names.countries, load_boundaries(source, &names.countries).await)
            },
            subnational,
            async {
                load_or_warn(
                    &names.populated_places,
                    load_places(source, &names.populated_places).await,
                )
            },
        );

        Self {
            land,
            countries,
            subnational,
            populated_places,
        }
    }
}

async fn fetch_text(source: &dyn GeoDataSource, name: &str) -> Result<String, DataSourceError> {
    source
        .fetch(name)
        .await?
        .ok_or_else(|| DataSourceError::NotFound(name.to_string()))
}

pub async fn load_boundaries(
    source: &dyn GeoDataSource,
    name: &str,
) -> Result<FeatureCollection, DataSourceError> {
    let text = fetch_text(source, name).await?;
    formats::parse_boundaries(&text).map_err(|e| DataSourceError::Decode {
        name: name.to_string(),
        source: e,
    })
}

pub async fn load_places(
    source: &dyn GeoDataSource,
    name: &str,
) -> Result<Vec<PopulatedPlace>, DataSourceError> {
    let text = fetch_text(source, name).await?;
    formats::parse_populated_places(&text).map_err(|e| DataSourceError::Decode {
        name: name.to_string(),
        source: e,
    })
}

trait Counted {
    fn count(&self) -> usize;
}

impl Counted for FeatureCollection {
    fn count(&self) -> usize {
        self.len()
    }
}

impl Counted for Vec<PopulatedPlace> {
    fn count(&self) -> usize {
        self.len()
    }
}

fn load_or_warn<T: Counted>(name: &str, result: Result<T, DataSourceError>) -> Option<T> {
    match result {
        Ok(v) => {
            info!(dataset = name, features = v.count(), "dataset loaded");
            Some(v)
        }
        Err(e) => {
            warn!(dataset = name, "dataset unavailable: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DatasetNames, Datasets};
    use crate::source::MemorySource;
    use pretty_assertions::assert_eq;

    const COUNTRIES: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"name":"Squareland"},
         "geometry":{"type":"Polygon","coordinates":[[[0,0],[10,0],[10,10],[0,10]]]}}]}"#;

    const PLACES: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"NAME":"Centre"},
         "geometry":{"type":"Point","coordinates":[5,5]}}]}"#;

    #[tokio::test]
    async fn loads_present_datasets_and_skips_the_rest() {
        let names = DatasetNames::default();
        let source = MemorySource::new()
            .with(names.countries.clone(), COUNTRIES)
            .with(names.populated_places.clone(), PLACES)
            .with(names.land.clone(), "definitely not json");

        let ds = Datasets::load(&source, &names).await;
        assert_eq!(ds.countries.as_ref().map(|c| c.len()), Some(1));
        assert_eq!(ds.populated_places.as_ref().map(|p| p.len()), Some(1));
        assert!(ds.land.is_none(), "undecodable dataset is dropped");
        assert!(ds.subnational.is_none(), "missing dataset is dropped");
    }

    #[tokio::test]
    async fn subnational_is_optional() {
        let names = DatasetNames {
            subnational: None,
            ..DatasetNames::default()
        };
        let ds = Datasets::load(&MemorySource::new(), &names).await;
        assert!(ds.subnational.is_none());
        assert!(ds.countries.is_none());
    }
}
