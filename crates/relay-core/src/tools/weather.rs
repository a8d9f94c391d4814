//! Current weather by city name.
//!
//! Open-Meteo is the primary provider (geocoding, then forecast). When an
//! OpenWeatherMap key is configured it is tried after Open-Meteo fails.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};

use super::{string_param, title_case, ParameterSpec, Tool, WEATHER_LOOKUP};
use crate::{config::RelayConfig, error::ProviderError, models::Parameters};

const OPEN_METEO: &str = "open-meteo";
const OPENWEATHERMAP: &str = "openweathermap";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,wind_speed_10m,wind_direction_10m";

const PARAMETERS: &[ParameterSpec] = &[ParameterSpec::required("city", "City name")];

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct Place {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country: String,
    #[serde(default)]
    admin1: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Current,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Current {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    weather_code: u16,
    wind_speed_10m: f64,
    wind_direction_10m: f64,
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    name: String,
    sys: OwmSys,
    main: OwmMain,
    weather: Vec<OwmCondition>,
    wind: OwmWind,
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
    #[serde(default)]
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

/// Looks up current conditions for a city.
#[derive(Debug, Clone)]
pub struct WeatherLookup {
    client: Client,
    geocoding_base: String,
    forecast_base: String,
    openweather_base: String,
    openweather_key: Option<String>,
}

impl WeatherLookup {
    pub fn from_config(client: Client, config: &RelayConfig) -> Self {
        Self {
            client,
            geocoding_base: config.geocoding_api_base.trim_end_matches('/').to_string(),
            forecast_base: config.weather_api_base.trim_end_matches('/').to_string(),
            openweather_base: config
                .openweather_api_base
                .trim_end_matches('/')
                .to_string(),
            openweather_key: config
                .openweather_api_key
                .clone()
                .filter(|key| !key.is_empty()),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        provider: &str,
        base: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = Url::parse_with_params(&format!("{base}{path}"), query).map_err(|e| {
            ProviderError::Transport {
                provider: provider.to_string(),
                message: format!("invalid URL: {e}"),
            }
        })?;

        debug!("GET {base}{path}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(provider, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: provider.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::from_reqwest(provider, &e))
    }

    async fn open_meteo(&self, city: &str) -> Result<Value, ProviderError> {
        let geocoding: GeocodingResponse = self
            .get_json(
                OPEN_METEO,
                &self.geocoding_base,
                "/search",
                &[
                    ("name", city.to_string()),
                    ("count", "1".to_string()),
                    ("language", "en".to_string()),
                    ("format", "json".to_string()),
                ],
            )
            .await?;

        let place = geocoding.results.into_iter().next().ok_or_else(|| {
            ProviderError::invalid_response(OPEN_METEO, format!("no location found for '{city}'"))
        })?;

        let forecast: ForecastResponse = self
            .get_json(
                OPEN_METEO,
                &self.forecast_base,
                "/forecast",
                &[
                    ("latitude", place.latitude.to_string()),
                    ("longitude", place.longitude.to_string()),
                    ("current", CURRENT_FIELDS.to_string()),
                    ("timezone", "auto".to_string()),
                ],
            )
            .await?;

        let current = forecast.current;
        Ok(json!({
            "city": city,
            "country": place.country,
            "region": place.admin1,
            "latitude": place.latitude,
            "longitude": place.longitude,
            "temperature": current.temperature_2m,
            "feels_like": current.apparent_temperature,
            "humidity": current.relative_humidity_2m,
            "weather_code": current.weather_code,
            "condition": condition_for_code(current.weather_code),
            "wind_speed": current.wind_speed_10m,
            "wind_direction": current.wind_direction_10m,
            "units": units(),
            "source": "open-meteo_api",
        }))
    }

    async fn openweathermap(&self, city: &str, key: &str) -> Result<Value, ProviderError> {
        let body: OwmResponse = self
            .get_json(
                OPENWEATHERMAP,
                &self.openweather_base,
                "/data/2.5/weather",
                &[
                    ("q", city.to_string()),
                    ("appid", key.to_string()),
                    ("units", "metric".to_string()),
                ],
            )
            .await?;

        let condition = body.weather.into_iter().next().ok_or_else(|| {
            ProviderError::invalid_response(OPENWEATHERMAP, "missing weather conditions")
        })?;

        Ok(json!({
            "city": body.name,
            "country": body.sys.country,
            "temperature": body.main.temp,
            "feels_like": body.main.feels_like,
            "humidity": body.main.humidity,
            "pressure": body.main.pressure,
            "condition": condition.main,
            "description": condition.description,
            "wind_speed": body.wind.speed,
            "units": units(),
            "source": "openweathermap_api",
        }))
    }
}

#[async_trait]
impl Tool for WeatherLookup {
    fn name(&self) -> &str {
        WEATHER_LOOKUP
    }

    fn description(&self) -> &str {
        "Get current weather conditions for a city"
    }

    fn parameters(&self) -> &[ParameterSpec] {
        PARAMETERS
    }

    async fn fetch(&self, params: &Parameters) -> Result<Value, ProviderError> {
        let city = string_param(params, "city").unwrap_or_default();

        match self.open_meteo(&city).await {
            Ok(data) => Ok(data),
            Err(primary) => {
                let Some(key) = self.openweather_key.as_deref() else {
                    return Err(primary);
                };
                debug!("Open-Meteo failed ({primary}), trying OpenWeatherMap");
                self.openweathermap(&city, key).await.map_err(|secondary| {
                    warn!("OpenWeatherMap failed as well: {secondary}");
                    primary
                })
            }
        }
    }

    fn fallback(&self, params: &Parameters) -> Option<Value> {
        let city = string_param(params, "city").unwrap_or_default();
        let (temperature, condition, humidity, wind_speed) = fallback_conditions(&city);

        Some(json!({
            "city": city,
            "temperature": temperature,
            "feels_like": temperature,
            "humidity": humidity,
            "condition": condition,
            "wind_speed": wind_speed,
            "units": units(),
            "source": "fallback_data",
        }))
    }
}

fn units() -> Value {
    json!({"temperature": "°C", "wind_speed": "km/h"})
}

/// Typical conditions per city: temperature, condition, humidity, wind speed.
fn fallback_conditions(city: &str) -> (f64, &'static str, u32, f64) {
    match title_case(city).as_str() {
        "Tokyo" => (25.5, "Clear sky", 60, 12.3),
        "London" => (14.0, "Overcast", 85, 15.2),
        "New York" => (22.0, "Partly cloudy", 55, 8.7),
        "Paris" => (19.5, "Light drizzle", 70, 10.5),
        "Berlin" => (16.0, "Moderate rain", 75, 12.8),
        "Mumbai" => (32.0, "Clear sky", 80, 6.5),
        "Sydney" => (24.5, "Sunny", 65, 14.2),
        _ => (20.0, "Unknown", 50, 10.0),
    }
}

/// Describes a WMO weather interpretation code.
pub fn condition_for_code(code: u16) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}
