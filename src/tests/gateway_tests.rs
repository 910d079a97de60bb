use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::errors::TaxonError;
use crate::implementations::config::GatewayConfig;
use crate::implementations::gateway::HttpKnowledgeGateway;
use crate::tests::support::setup;
use crate::traits::gateway::KnowledgeGateway;

fn gateway_for(server: &MockServer) -> HttpKnowledgeGateway {
    setup();
    let config = GatewayConfig {
        base_url: server.uri(),
        timeout_secs: Some(5),
        auth_token: None,
    };
    HttpKnowledgeGateway::new(config).unwrap()
}

#[tokio::test]
async fn lists_types_from_the_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Chair" },
            { "id": 2, "name": "Lamp" }
        ])))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let types = gateway.list_types().await.unwrap();

    assert_eq!(types.len(), 2);
    assert_eq!(types[0].id, 1);
    assert_eq!(types[0].name, "Chair");
}

#[tokio::test]
async fn creates_a_type_and_returns_the_confirmed_entity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/types"))
        .and(body_json(json!({ "name": "Chair" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": 7, "name": "Chair" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let created = gateway.create_type("Chair").await.unwrap();

    assert_eq!(created.id, 7);
    assert_eq!(created.name, "Chair");
}

#[tokio::test]
async fn surfaces_the_service_error_detail_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/types"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({
                "detail": "type 'Chair' already exists"
            })),
        )
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let err = gateway.create_type("Chair").await.unwrap_err();

    match err {
        TaxonError::RemoteRequestError(message) => {
            assert_eq!(message, "type 'Chair' already exists");
        }
        other => panic!("expected RemoteRequestError, got {:?}", other),
    }
}

#[tokio::test]
async fn falls_back_to_the_raw_body_when_detail_is_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/properties"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let err = gateway.list_properties().await.unwrap_err();

    match err {
        TaxonError::RemoteRequestError(message) => assert_eq!(message, "upstream exploded"),
        other => panic!("expected RemoteRequestError, got {:?}", other),
    }
}

#[tokio::test]
async fn percent_encodes_raw_values_in_paths() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/possible-values/Color/navy%20blue"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    gateway
        .delete_possible_value("Color", "navy blue")
        .await
        .unwrap();
}

#[tokio::test]
async fn takes_the_first_property_values_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/property-values/1/2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "values": ["red", "blue"] }])),
        )
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let values = gateway.list_property_values(1, 2).await.unwrap();
    assert_eq!(values, vec!["red", "blue"]);
}

#[tokio::test]
async fn an_empty_property_values_listing_means_no_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/property-values/1/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let values = gateway.list_property_values(1, 2).await.unwrap();
    assert!(values.is_empty());
}

#[tokio::test]
async fn parses_the_no_types_sentinel_of_the_completeness_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/completeness-check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "incomplete_types": [{ "reason": "no_types_defined" }],
            "properties_without_values": []
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let report = gateway.check_completeness().await.unwrap();

    assert!(!report.is_complete());
    assert_eq!(report.incomplete_types.len(), 1);
    assert_eq!(report.incomplete_types[0].type_name, None);
    assert_eq!(report.incomplete_types[0].reason, "no_types_defined");
}

#[tokio::test]
async fn parses_a_full_completeness_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/completeness-check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "incomplete_types": [{ "type": "Chair", "reason": "no_property_values" }],
            "properties_without_values": ["Material"]
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let report = gateway.check_completeness().await.unwrap();

    assert_eq!(
        report.incomplete_types[0].type_name.as_deref(),
        Some("Chair")
    );
    assert_eq!(report.incomplete_types[0].reason, "no_property_values");
    assert_eq!(report.properties_without_values, vec!["Material"]);
}

#[tokio::test]
async fn posts_the_classification_selection_and_parses_the_verdict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/classify"))
        .and(body_json(json!({ "properties": { "color": "red" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "Lamp",
            "explanation": ["matching types: Lamp"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let mut properties = std::collections::HashMap::new();
    properties.insert("color".to_string(), "red".to_string());
    let verdict = gateway.classify(&properties).await.unwrap();

    assert_eq!(verdict.type_name, "Lamp");
    assert_eq!(verdict.explanation, vec!["matching types: Lamp"]);
}

#[tokio::test]
async fn parses_the_learned_model_probabilities() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/classify-ai"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "Lamp",
            "explanation": ["the model predicted 'Lamp'"],
            "probabilities": { "Lamp": 0.85, "Chair": 0.15 }
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let verdict = gateway
        .classify_ai(&std::collections::HashMap::new())
        .await
        .unwrap();

    assert_eq!(verdict.type_name, "Lamp");
    assert_eq!(verdict.probabilities.get("Lamp"), Some(&0.85));
}

#[tokio::test]
async fn a_connection_failure_is_a_remote_request_error() {
    setup();
    // Nothing is listening on this port
    let config = GatewayConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: Some(1),
        auth_token: None,
    };
    let gateway = HttpKnowledgeGateway::new(config).unwrap();

    let err = gateway.list_types().await.unwrap_err();
    assert!(matches!(err, TaxonError::RemoteRequestError(_)));
}
