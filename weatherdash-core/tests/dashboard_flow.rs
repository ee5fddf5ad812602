use std::sync::Arc;

use weatherdash_core::{
    AlertEvaluator, AppController, AppState, ConditionCategory, LocationQuery, Presentation,
    alerts::{AlertKind, Severity},
    controller::FETCH_FAILED_MESSAGE,
    provider::weatherapi::WeatherApiClient,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIXTURE: &str = include_str!("fixtures/forecast_london.json");

async fn server_with_london() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FIXTURE))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .and(query_param("q", "Nowhere"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{"error":{"code":1006,"message":"No matching location found."}}"#,
        ))
        .mount(&server)
        .await;

    server
}

fn controller_for(server: &MockServer) -> AppController {
    let client = WeatherApiClient::new(Some("TEST_KEY".into())).with_base_url(server.uri());
    AppController::new(Arc::new(client), LocationQuery::Place("London".into()))
}

#[tokio::test]
async fn mount_fetches_and_derives_presentation() {
    let server = server_with_london().await;
    let controller = controller_for(&server);

    controller.mount().await;

    let view = controller.view();
    assert!(!view.loading);
    assert!(view.error.is_none());
    let snapshot = view.snapshot.expect("snapshot after successful mount");

    let presentation = Presentation::for_snapshot(&snapshot, &AlertEvaluator::default(), 0);
    assert_eq!(presentation.category, ConditionCategory::Rainy);
    assert_eq!(presentation.background.name, "rain");

    let alerts: Vec<_> = presentation.alerts.iter().map(|a| (a.kind, a.severity)).collect();
    assert_eq!(alerts, vec![(AlertKind::Wind, Severity::Warning)]);

    assert_eq!(presentation.temperature[0].points.len(), 4);
}

#[tokio::test]
async fn failed_search_replaces_loaded_snapshot_with_banner() {
    let server = server_with_london().await;
    let controller = controller_for(&server);

    controller.search(LocationQuery::Place("London".into())).await;
    assert!(controller.state().snapshot().is_some());

    controller.search(LocationQuery::Place("Nowhere".into())).await;

    assert_eq!(controller.state(), AppState::Failed(FETCH_FAILED_MESSAGE.to_string()));
    assert!(controller.view().snapshot.is_none());
}

#[tokio::test]
async fn missing_api_key_shows_generic_banner() {
    let server = server_with_london().await;
    let client = WeatherApiClient::new(None).with_base_url(server.uri());
    let controller = AppController::new(Arc::new(client), LocationQuery::Place("London".into()));

    controller.mount().await;

    assert_eq!(controller.view().error.as_deref(), Some(FETCH_FAILED_MESSAGE));
}
