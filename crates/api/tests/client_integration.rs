use std::sync::Arc;
use std::time::Duration;

use beanstalk_api::{
    ApiError, Client, ClientConfig, Method, ReqwestTransport, Request, Transport,
    TransportError, TransportRequest,
};
use serde::Deserialize;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    let config = ClientConfig::new(format!("{}/api", server.uri()))
        .unwrap()
        .with_basic_auth("jane", "hunter2")
        .with_user_agent("beanstalk-tests/1.0")
        .unwrap();
    Client::from_config(config, None).unwrap()
}

#[tokio::test]
async fn test_get_sends_auth_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/projects/1"))
        .and(header("authorization", "Basic amFuZTpodW50ZXIy"))
        .and(header("user-agent", "beanstalk-tests/1.0"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1,
            "name": "ok"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Project {
        id: i64,
        name: String,
    }

    let client = client_for(&mock_server);
    let response = client.execute(&Request::get("/projects/1")).await.unwrap();
    assert_eq!(response.status, 200);
    assert!(response.decoded.is_none());

    let project: Project = client.decode(&response).unwrap();
    assert_eq!(
        project,
        Project {
            id: 1,
            name: "ok".to_string()
        }
    );
}

#[tokio::test]
async fn test_query_parameters_reach_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/changesets/repository.json"))
        .and(query_param("repository_id", "12"))
        .and(query_param("order", "newest first"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let request = Request::get("changesets/repository.json")
        .query("repository_id", 12)
        .query("order", "newest first");

    let values: Vec<serde_json::Value> = client.fetch(&request).await.unwrap();
    assert!(values.is_empty());
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let mock_server = MockServer::start().await;
    let payload = serde_json::json!({
        "repository": {"name": "marketing-site", "type_id": "git", "title": "Marketing"}
    });

    Mock::given(method("POST"))
        .and(path("/api/repositories.json"))
        .and(header("content-type", "application/json"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "repository": {"id": 77, "name": "marketing-site"}
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let created: serde_json::Value = client.post("repositories.json", &payload).await.unwrap();
    assert_eq!(created["repository"]["id"], 77);
}

#[tokio::test]
async fn test_put_and_delete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/users/5.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user": {"id": 5, "login": "jdoe", "name": "Jane Doe"}
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/users/5.json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let updated: serde_json::Value = client
        .put("users/5.json", &serde_json::json!({"user": {"name": "Jane Doe"}}))
        .await
        .unwrap();
    assert_eq!(updated["user"]["name"], "Jane Doe");

    client.delete("users/5.json").await.unwrap();
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/current.json"))
        .respond_with(ResponseTemplate::new(401).set_body_string("HTTP Basic: Access denied."))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .execute(&Request::get("users/current.json"))
        .await
        .unwrap_err();

    match err {
        ApiError::Auth { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Access denied"));
        }
        other => panic!("expected auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_maps_to_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/repositories.json"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .get::<serde_json::Value>("repositories.json")
        .await
        .unwrap_err();

    match &err {
        ApiError::Api { status, body } => {
            assert_eq!(*status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("expected api error, got {other:?}"),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_unprocessable_entity_is_not_retryable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/repositories.json"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(serde_json::json!({"errors": ["Name has already been taken"]})),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .post::<serde_json::Value, _>("repositories.json", &serde_json::json!({}))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(422));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let config = ClientConfig::new("http://127.0.0.1:1/api/").unwrap();
    let client = Client::from_config(config, None).unwrap();

    let err = client
        .execute(&Request::get("repositories.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn test_default_transport_applies_configured_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/repositories.json"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new(format!("{}/api/", mock_server.uri()))
        .unwrap()
        .with_timeout(Duration::from_millis(200));
    let client = Client::from_config(config, None).unwrap();

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        client.execute(&Request::get("repositories.json")),
    )
    .await
    .expect("default transport should give up before the server answers");

    let err = outcome.unwrap_err();
    assert!(
        matches!(err, ApiError::Network(TransportError::Timeout(_))),
        "got {err:?}"
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_malformed_header_is_not_retryable() {
    let mock_server = MockServer::start().await;

    let request = TransportRequest {
        method: Method::Get,
        url: format!("{}/api/users.json", mock_server.uri()).parse().unwrap(),
        headers: vec![("user-agent".to_string(), "bad\nagent".to_string())],
        body: None,
    };
    let err = ReqwestTransport::new()
        .unwrap()
        .execute(request)
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Build(_)), "got {err:?}");
    assert!(!ApiError::Network(err).is_retryable());
}

#[tokio::test]
async fn test_transport_timeout_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/repositories.json"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let transport: Arc<dyn Transport> =
        Arc::new(ReqwestTransport::with_timeout(Duration::from_millis(100)).unwrap());
    let config = ClientConfig::new(format!("{}/api/", mock_server.uri())).unwrap();
    let client = Client::from_config(config, Some(transport)).unwrap();

    let err = client
        .execute(&Request::get("repositories.json"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::Network(TransportError::Timeout(_))
    ));
}

#[tokio::test]
async fn test_malformed_payload_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/repositories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .execute(&Request::get("repositories.json"))
        .await
        .unwrap();

    let err = client.decode::<Vec<serde_json::Value>>(&response).unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
    assert_eq!(response.text(), "<html>maintenance</html>");
}
