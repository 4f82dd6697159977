use std::num::NonZeroUsize;
use std::sync::Arc;

use foundation::math::{GeoPoint, micro_degrees};
use futures_util::future::BoxFuture;
use lru::LruCache;
use parking_lot::Mutex;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use thiserror::Error;
use tracing::debug;

use crate::response::{RawSearchHit, ReverseGeocodeResponse, SearchHit};

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = "geo-picker/0.1";
pub const DEFAULT_REVERSE_ZOOM: u8 = 10;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoder request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("geocoder returned {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid user agent {0:?}")]
    InvalidUserAgent(String),
}

/// Coordinate to address and back.
///
/// Methods return boxed futures for dyn-compatibility.
pub trait Geocoder: Send + Sync {
    fn reverse(&self, point: GeoPoint) -> BoxFuture<'_, Result<ReverseGeocodeResponse, GeocodeError>>;

    /// Best match for a free-text query, `None` when nothing matched.
    fn search(&self, query: &str) -> BoxFuture<'_, Result<Option<SearchHit>, GeocodeError>>;
}

impl<G: Geocoder + ?Sized> Geocoder for Arc<G> {
    fn reverse(&self, point: GeoPoint) -> BoxFuture<'_, Result<ReverseGeocodeResponse, GeocodeError>> {
        (**self).reverse(point)
    }

    fn search(&self, query: &str) -> BoxFuture<'_, Result<Option<SearchHit>, GeocodeError>> {
        (**self).search(query)
    }
}

/// Nominatim-compatible HTTP geocoder.
pub struct NominatimClient {
    base_url: String,
    zoom: u8,
    client: reqwest::Client,
}

impl NominatimClient {
    /// Nominatim's usage policy requires an identifying User-Agent, so the
    /// client is always built with one.
    pub fn new(base_url: impl Into<String>, user_agent: &str) -> Result<Self, GeocodeError> {
        let mut headers = HeaderMap::new();
        let ua = HeaderValue::from_str(user_agent)
            .map_err(|_| GeocodeError::InvalidUserAgent(user_agent.to_string()))?;
        headers.insert(USER_AGENT, ua);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            zoom: DEFAULT_REVERSE_ZOOM,
            client,
        }
    }

    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, GeocodeError> {
        let url = format!("{}/{}", self.base_url, path);
        let resp = self.client.get(url).query(query).send().await?;
        if !resp.status().is_success() {
            return Err(GeocodeError::Status(resp.status()));
        }
        Ok(resp.json().await?)
    }
}

impl Geocoder for NominatimClient {
    fn reverse(&self, point: GeoPoint) -> BoxFuture<'_, Result<ReverseGeocodeResponse, GeocodeError>> {
        Box::pin(async move {
            let query = [
                ("format", "json".to_string()),
                ("lat", point.lat_deg.to_string()),
                ("lon", point.lon_deg.to_string()),
                ("zoom", self.zoom.to_string()),
                ("addressdetails", "1".to_string()),
            ];
            self.get_json("reverse", &query).await
        })
    }

    fn search(&self, query: &str) -> BoxFuture<'_, Result<Option<SearchHit>, GeocodeError>> {
        let q = query.to_string();
        Box::pin(async move {
            let query = [
                ("format", "json".to_string()),
                ("q", q),
                ("limit", "1".to_string()),
            ];
            let hits: Vec<RawSearchHit> = self.get_json("search", &query).await?;
            Ok(hits.into_iter().find_map(RawSearchHit::into_hit))
        })
    }
}

type CacheKey = (i64, i64);

/// Memoizes successful reverse lookups. Failures are not cached, so a
/// retried pick goes back to the network.
pub struct CachedGeocoder<G> {
    inner: G,
    cache: Mutex<LruCache<CacheKey, ReverseGeocodeResponse>>,
}

impl<G: Geocoder> CachedGeocoder<G> {
    pub fn new(inner: G, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

fn cache_key(point: GeoPoint) -> CacheKey {
    (micro_degrees(point.lat_deg), micro_degrees(point.lon_deg))
}

impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    fn reverse(&self, point: GeoPoint) -> BoxFuture<'_, Result<ReverseGeocodeResponse, GeocodeError>> {
        let key = cache_key(point);
        Box::pin(async move {
            let cached = self.cache.lock().get(&key).cloned();
            if let Some(hit) = cached {
                debug!(lat = point.lat_deg, lon = point.lon_deg, "reverse geocode cache hit");
                return Ok(hit);
            }
            let resp = self.inner.reverse(point).await?;
            self.cache.lock().put(key, resp.clone());
            Ok(resp)
        })
    }

    fn search(&self, query: &str) -> BoxFuture<'_, Result<Option<SearchHit>, GeocodeError>> {
        self.inner.search(query)
    }
}

#[cfg(test)]
mod tests {
    use super::{CachedGeocoder, GeocodeError, Geocoder, NominatimClient};
    use foundation::math::GeoPoint;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> NominatimClient {
        NominatimClient::new(server.uri(), "picker-tests/1.0").expect("client")
    }

    #[tokio::test]
    async fn reverse_sends_expected_query_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(query_param("format", "json"))
            .and(query_param("lat", "28.6"))
            .and(query_param("lon", "77.2"))
            .and(query_param("zoom", "10"))
            .and(query_param("addressdetails", "1"))
            .and(header("user-agent", "picker-tests/1.0"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "display_name": "New Delhi, Delhi, India",
                "address": { "city": "New Delhi", "state": "Delhi", "country": "India" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = client(&server)
            .reverse(GeoPoint::new(28.6, 77.2))
            .await
            .expect("reverse");
        assert_eq!(resp.preferred_name().as_deref(), Some("New Delhi"));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client(&server)
            .reverse(GeoPoint::new(0.0, 0.0))
            .await
            .expect_err("503");
        assert!(matches!(err, GeocodeError::Status(s) if s.as_u16() == 503));
    }

    #[tokio::test]
    async fn search_parses_string_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Paris"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "lat": "48.8566", "lon": "2.3522", "display_name": "Paris, France" }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Atlantis"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let c = client(&server);
        let hit = c.search("Paris").await.expect("search").expect("hit");
        assert_eq!(hit.point, GeoPoint::new(48.8566, 2.3522));
        assert_eq!(hit.display_name.as_deref(), Some("Paris, France"));
        assert!(c.search("Atlantis").await.expect("search").is_none());
    }

    #[tokio::test]
    async fn cache_serves_repeat_lookups_without_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "address": { "town": "Shimla" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let cached = CachedGeocoder::new(client(&server), 4);
        let p = GeoPoint::new(31.1048, 77.1734);
        for _ in 0..3 {
            let resp = cached.reverse(p).await.expect("reverse");
            assert_eq!(resp.preferred_name().as_deref(), Some("Shimla"));
        }
        assert_eq!(cached.len(), 1);
    }

    #[tokio::test]
    async fn cache_does_not_keep_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let cached = CachedGeocoder::new(client(&server), 4);
        let p = GeoPoint::new(1.0, 2.0);
        assert!(cached.reverse(p).await.is_err());
        assert!(cached.reverse(p).await.is_err());
        assert!(cached.is_empty());
    }
}
