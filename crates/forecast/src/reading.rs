use foundation::fields::FieldAliases;
use serde_json::{Map, Value};

pub const PRECIPITATION: FieldAliases = FieldAliases::new(
    "precipitation",
    &["prcp", "rain", "precipitation_mm", "precipitation", "precip_mm"],
);

pub const PRECIPITATION_PROBABILITY: FieldAliases = FieldAliases::new(
    "precipitation_probability",
    &[
        "precipitation_probability",
        "prcp_prob",
        "prcp_prob_percent",
        "precipitation_probability_percent",
    ],
);

pub const TEMPERATURE: FieldAliases = FieldAliases::new(
    "temperature",
    &[
        "temperature_c",
        "temp",
        "temperature",
        "t",
        "air_temperature",
        "model_output",
    ],
);

pub const RADIATION: FieldAliases = FieldAliases::new(
    "radiation",
    &["radiation", "shortwave_radiation_wm2", "global_radiation"],
);

pub const CLOUD_COVER: FieldAliases =
    FieldAliases::new("cloud_cover", &["cloud", "cloud_cover_percent", "cloud_cover"]);

pub const HUMIDITY: FieldAliases = FieldAliases::new(
    "humidity",
    &["humidity", "humidity_percent", "relative_humidity", "rh"],
);

pub const WIND_SPEED: FieldAliases = FieldAliases::new(
    "wind_speed",
    &["wind", "wind_speed", "wind_speed_ms", "windspeed_10m"],
);

pub const NOT_AVAILABLE: &str = "N/A";

/// Decoded prediction. Every field is optional; backends vary in what they
/// report and under which key.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PredictionReading {
    pub precipitation_mm: Option<f64>,
    pub precipitation_probability: Option<f64>,
    pub temperature_c: Option<f64>,
    pub radiation_wm2: Option<f64>,
    pub cloud_cover_percent: Option<f64>,
    pub humidity_percent: Option<f64>,
    pub wind_speed_ms: Option<f64>,
}

impl PredictionReading {
    pub fn from_payload(obj: &Map<String, Value>) -> Self {
        Self {
            precipitation_mm: PRECIPITATION.number(obj),
            precipitation_probability: PRECIPITATION_PROBABILITY.number(obj),
            temperature_c: TEMPERATURE.number(obj),
            radiation_wm2: RADIATION.number(obj),
            cloud_cover_percent: CLOUD_COVER.number(obj),
            humidity_percent: HUMIDITY.number(obj),
            wind_speed_ms: WIND_SPEED.number(obj),
        }
    }

    /// Decodes a full response body.
    ///
    /// The payload sits under `prediction` when that key is present and
    /// non-null, otherwise it is the body itself. A payload that is a string
    /// is parsed as JSON first. Anything that is not an object yields an
    /// empty reading.
    pub fn from_response(body: &Value) -> Self {
        let payload = match body.get("prediction") {
            Some(p) if !p.is_null() => p,
            _ => body,
        };
        let reparsed;
        let payload = match payload {
            Value::String(s) => {
                reparsed = serde_json::from_str::<Value>(s).unwrap_or(Value::Null);
                &reparsed
            }
            other => other,
        };
        match payload.as_object() {
            Some(obj) => Self::from_payload(obj),
            None => {
                tracing::debug!("prediction payload is not an object");
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn display(&self) -> PredictionDisplay {
        PredictionDisplay {
            precipitation: with_unit(self.precipitation_mm, "mm"),
            precipitation_probability: match self.precipitation_probability {
                Some(p) => format!("{p:.0} %"),
                None => NOT_AVAILABLE.to_string(),
            },
            temperature: with_unit(self.temperature_c, "°C"),
            radiation: with_unit(self.radiation_wm2, "W/m²"),
            cloud_cover: with_unit(self.cloud_cover_percent, "%"),
            humidity: with_unit(self.humidity_percent, "%"),
            wind_speed: with_unit(self.wind_speed_ms, "m/s"),
        }
    }
}

fn with_unit(v: Option<f64>, unit: &str) -> String {
    match v {
        Some(v) => format!("{v} {unit}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Ready-to-show text for each prediction field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionDisplay {
    pub precipitation: String,
    pub precipitation_probability: String,
    pub temperature: String,
    pub radiation: String,
    pub cloud_cover: String,
    pub humidity: String,
    pub wind_speed: String,
}
