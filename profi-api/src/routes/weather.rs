/// Weather lookup endpoint
///
/// # Endpoint
///
/// ```text
/// GET /v1/weather?city=Berlin
/// ```
///
/// Thin proxy over the OpenWeather current-weather API. Degrades rather
/// than fails: a missing key, an unknown city, or an upstream outage all
/// return HTTP 200 with the placeholder report, since the chat surface
/// treats weather as decoration.
///
/// # Response
///
/// ```json
/// {
///   "city": "Berlin",
///   "report": "light rain, 14.2°C"
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Report returned when the lookup cannot be completed
pub const UNAVAILABLE_REPORT: &str = "Weather data unavailable";

/// Weather query parameters
#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub city: String,
}

/// Weather response
#[derive(Debug, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub city: String,
    pub report: String,
}

/// Upstream response body (only the fields we read)
#[derive(Debug, Deserialize)]
struct OpenWeatherBody {
    weather: Vec<OpenWeatherCondition>,
    main: OpenWeatherMain,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherMain {
    temp: f64,
}

/// Weather lookup handler
pub async fn weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> ApiResult<Json<WeatherResponse>> {
    let report = match &state.config.weather.api_key {
        Some(key) => fetch_report(&state.http, &query.city, key)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(city = %query.city, error = %e, "Weather lookup failed");
                UNAVAILABLE_REPORT.to_string()
            }),
        None => UNAVAILABLE_REPORT.to_string(),
    };

    Ok(Json(WeatherResponse {
        city: query.city,
        report,
    }))
}

/// One lookup round-trip against OpenWeather.
async fn fetch_report(
    client: &reqwest::Client,
    city: &str,
    api_key: &str,
) -> Result<String, reqwest::Error> {
    let body: OpenWeatherBody = client
        .get(OPENWEATHER_URL)
        .query(&[("q", city), ("appid", api_key), ("units", "metric")])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let description = body
        .weather
        .first()
        .map(|c| c.description.clone())
        .unwrap_or_else(|| "unknown conditions".to_string());

    Ok(format!("{}, {:.1}°C", description, body.main.temp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openweather_body_deserialization() {
        let json = serde_json::json!({
            "weather": [{ "id": 500, "main": "Rain", "description": "light rain" }],
            "main": { "temp": 14.23, "humidity": 81 },
            "name": "Berlin"
        });

        let body: OpenWeatherBody = serde_json::from_value(json).unwrap();
        assert_eq!(body.weather[0].description, "light rain");
        assert_eq!(body.main.temp, 14.23);
    }

    #[test]
    fn test_report_formatting() {
        let body = OpenWeatherBody {
            weather: vec![OpenWeatherCondition {
                description: "clear sky".to_string(),
            }],
            main: OpenWeatherMain { temp: 21.05 },
        };

        let description = body.weather.first().map(|c| c.description.clone()).unwrap();
        let report = format!("{}, {:.1}°C", description, body.main.temp);
        assert_eq!(report, "clear sky, 21.1°C");
    }
}
