pub mod types;
pub mod weatherstack;

use uuid::Uuid;

use crate::error::ApiError;
use crate::store::RecordStore;
use types::{UserData, WeatherRecord, WeatherRequest};
use weatherstack::WeatherstackClient;

/// Submit and fetch operations over the record store.
pub struct WeatherService {
    client: WeatherstackClient,
    store: RecordStore,
}

impl WeatherService {
    pub fn new(client: WeatherstackClient, store: RecordStore) -> Self {
        Self { client, store }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Looks up the weather for the request's location and stores the
    /// combined record. Nothing is stored unless the lookup succeeds.
    pub async fn submit(&self, request: WeatherRequest) -> Result<String, ApiError> {
        validate_request(&request)?;

        let id = Uuid::new_v4().to_string();

        let weather_data = self.client.current(&request.location).await.map_err(|e| {
            let err = ApiError::from(e);
            match &err {
                ApiError::Internal(_) => tracing::error!("Weather lookup failed: {}", err),
                _ => tracing::warn!("Weather lookup failed for {:?}: {}", request.location, err),
            }
            err
        })?;

        let record = WeatherRecord {
            id: id.clone(),
            user_data: UserData {
                date: request.date,
                location: request.location,
                notes: request.notes.unwrap_or_default(),
                created_at: chrono::Utc::now(),
            },
            weather_data,
        };

        let location = record.user_data.location.clone();
        self.store.insert(record).await;
        tracing::info!(
            "Stored weather record {} for {:?} ({} total)",
            id,
            location,
            self.store.len().await
        );

        Ok(id)
    }

    pub async fn fetch(&self, id: &str) -> Result<WeatherRecord, ApiError> {
        self.store.get(id).await.ok_or(ApiError::NotFound)
    }
}

fn validate_request(request: &WeatherRequest) -> Result<(), ApiError> {
    if request.date.trim().is_empty() {
        return Err(ApiError::Validation("date must not be empty".to_string()));
    }
    if request.location.trim().is_empty() {
        return Err(ApiError::Validation("location must not be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service_for(server: &MockServer) -> WeatherService {
        let config = Config {
            weatherstack_api_key: "test-key".to_string(),
            weatherstack_base_url: format!("{}/current", server.uri()),
            cors_allowed_origin: "http://localhost:3000".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        WeatherService::new(WeatherstackClient::new(&config).unwrap(), RecordStore::new())
    }

    fn request(date: &str, location: &str, notes: Option<&str>) -> WeatherRequest {
        WeatherRequest {
            date: date.to_string(),
            location: location.to_string(),
            notes: notes.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_submit_then_fetch() {
        let server = MockServer::start().await;
        let payload = json!({"current": {"temperature": 20}});

        Mock::given(method("GET"))
            .and(path("/current"))
            .and(query_param("query", "New York"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
            .mount(&server)
            .await;

        let service = service_for(&server);
        let before = chrono::Utc::now();
        let id = service
            .submit(request("2024-01-01", "New York", Some("test")))
            .await
            .unwrap();

        assert!(Uuid::parse_str(&id).is_ok());

        let record = service.fetch(&id).await.unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.user_data.date, "2024-01-01");
        assert_eq!(record.user_data.location, "New York");
        assert_eq!(record.user_data.notes, "test");
        assert!(record.user_data.created_at >= before);
        assert_eq!(record.weather_data, payload);
    }

    #[tokio::test]
    async fn test_submit_without_notes_stores_empty_string() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"current": {}})))
            .mount(&server)
            .await;

        let service = service_for(&server);
        let id = service.submit(request("2024-02-02", "Oslo", None)).await.unwrap();

        assert_eq!(service.fetch(&id).await.unwrap().user_data.notes, "");
    }

    #[tokio::test]
    async fn test_fetch_unknown_id() {
        let server = MockServer::start().await;
        let service = service_for(&server);

        let err = service.fetch(&Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn test_rejected_lookup_is_not_stored() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": {"code": 615, "type": "request_failed", "info": "No results"}
            })))
            .mount(&server)
            .await;

        let service = service_for(&server);
        let err = service.submit(request("2024-01-01", "Atlantis", None)).await.unwrap_err();

        assert!(matches!(err, ApiError::ProviderRejected(ref info) if info == "No results"));
        assert_eq!(service.store().len().await, 0);
    }

    #[tokio::test]
    async fn test_unavailable_lookup_is_not_stored() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let service = service_for(&server);
        let err = service.submit(request("2024-01-01", "Paris", None)).await.unwrap_err();

        assert!(matches!(err, ApiError::ProviderUnavailable(_)));
        assert_eq!(service.store().len().await, 0);
    }

    #[tokio::test]
    async fn test_non_json_lookup_is_internal_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let service = service_for(&server);
        let err = service.submit(request("2024-01-01", "Paris", None)).await.unwrap_err();

        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(service.store().len().await, 0);
    }

    #[tokio::test]
    async fn test_blank_fields_rejected_before_lookup() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"current": {}})))
            .expect(0)
            .mount(&server)
            .await;

        let service = service_for(&server);

        let err = service.submit(request("", "Paris", None)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = service.submit(request("2024-01-01", "   ", None)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        assert_eq!(service.store().len().await, 0);
    }

    #[tokio::test]
    async fn test_concurrent_submissions_stay_separate() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("query", "Tokyo"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"location": {"name": "Tokyo"}, "current": {"temperature": 12}}))
                    .set_delay(std::time::Duration::from_millis(50)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("query", "Cairo"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"location": {"name": "Cairo"}, "current": {"temperature": 31}})),
            )
            .mount(&server)
            .await;

        let service = service_for(&server);
        let (tokyo, cairo) = tokio::join!(
            service.submit(request("2024-03-01", "Tokyo", None)),
            service.submit(request("2024-03-01", "Cairo", None)),
        );
        let (tokyo, cairo) = (tokyo.unwrap(), cairo.unwrap());

        assert_ne!(tokyo, cairo);
        assert_eq!(service.store().len().await, 2);

        let tokyo = service.fetch(&tokyo).await.unwrap();
        let cairo = service.fetch(&cairo).await.unwrap();
        assert_eq!(tokyo.user_data.location, "Tokyo");
        assert_eq!(tokyo.weather_data["current"]["temperature"], 12);
        assert_eq!(cairo.user_data.location, "Cairo");
        assert_eq!(cairo.weather_data["current"]["temperature"], 31);
    }
}
