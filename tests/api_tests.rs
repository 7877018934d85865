use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};
use parking_lot::Mutex;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tankobon_gateway::{routes, AppState, GatewayConfig};
use tankobon_storage::{
    ProviderMethod, ProviderRequest, ProviderResponse, StorageTransport, TransportError,
};
use tokio::net::TcpListener;

const SECRET: &str = "test-secret-123";

/// Storage provider double: fixed status per host, records every request
struct FakeProvider {
    statuses: HashMap<String, u16>,
    calls: Mutex<Vec<ProviderRequest>>,
}

impl FakeProvider {
    fn with(statuses: &[(&str, u16)]) -> Arc<Self> {
        Arc::new(Self {
            statuses: statuses.iter().map(|(h, s)| (h.to_string(), *s)).collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn hosts_called(&self) -> Vec<String> {
        self.calls.lock().iter().map(|r| r.host.clone()).collect()
    }
}

#[async_trait]
impl StorageTransport for FakeProvider {
    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse, TransportError> {
        let status = self.statuses.get(&request.host).copied().unwrap_or(401);
        self.calls.lock().push(request);
        Ok(ProviderResponse::new(status, format!("{{\"HttpCode\":{}}}", status)))
    }
}

fn configured() -> GatewayConfig {
    GatewayConfig {
        storage_zone: Some("comics".to_string()),
        storage_api_key: Some("zone-password".to_string()),
        cdn_hostname: Some("cdn.example.com".to_string()),
        admin_jwt_secret: Some(SECRET.to_string()),
        rate_limit_rps: 0,
        ..Default::default()
    }
}

// Helper to spawn a server on a random port
async fn spawn_server(config: GatewayConfig, provider: Arc<FakeProvider>) -> String {
    let state = Arc::new(AppState::with_transport(config, provider));
    let app = routes::create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/functions/v1/upload", addr)
}

fn token(claims: Value, secret: &str) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

fn admin_token() -> String {
    let exp = chrono::Utc::now().timestamp() + 3600;
    token(json!({"sub": "admin-1", "role": "admin", "exp": exp}), SECRET)
}

fn upload_form(path: &str) -> Form {
    let part = Part::bytes(b"\x89PNG fake page".to_vec())
        .file_name("page.png")
        .mime_str("image/png")
        .unwrap();
    Form::new()
        .part("file", part)
        .text("path", path.to_string())
        .text("action", "upload")
}

async fn post(url: &str, bearer: Option<&str>, form: Form) -> (StatusCode, Value) {
    let mut req = Client::new().post(url).multipart(form);
    if let Some(t) = bearer {
        req = req.header("Authorization", format!("Bearer {}", t));
    }
    let res = req.send().await.unwrap();
    let status = res.status();
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    assert_eq!(res.headers()["content-type"], "application/json");
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn test_preflight() {
    let provider = FakeProvider::with(&[]);
    let url = spawn_server(configured(), provider.clone()).await;

    let res = Client::new()
        .request(reqwest::Method::OPTIONS, &url)
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    assert_eq!(
        res.headers()["access-control-allow-headers"],
        "authorization, x-client-info, apikey, content-type"
    );
    assert_eq!(res.text().await.unwrap(), "ok");
    assert!(provider.hosts_called().is_empty());
}

#[tokio::test]
async fn test_upload_returns_cdn_url() {
    let provider = FakeProvider::with(&[("storage.bunnycdn.com", 201)]);
    let url = spawn_server(configured(), provider.clone()).await;

    let (status, body) = post(
        &url,
        Some(&admin_token()),
        upload_form("series/abc/chapters/1/1.png"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "https://cdn.example.com/series/abc/chapters/1/1.png");
    assert_eq!(body["storage_host_used"], "storage.bunnycdn.com");
    assert_eq!(body["detected_region"], Value::Null);

    let calls = provider.calls.lock();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, ProviderMethod::Put);
    assert_eq!(calls[0].zone_id, "comics");
    assert_eq!(calls[0].path, "series/abc/chapters/1/1.png");
    assert_eq!(calls[0].access_key, "zone-password");
    assert_eq!(calls[0].content_type.as_deref(), Some("image/png"));
    assert_eq!(calls[0].body.as_deref(), Some(&b"\x89PNG fake page"[..]));
}

#[tokio::test]
async fn test_upload_falls_back_to_region_that_accepts_zone() {
    let provider = FakeProvider::with(&[
        ("storage.bunnycdn.com", 401),
        ("ny.storage.bunnycdn.com", 401),
        ("la.storage.bunnycdn.com", 201),
    ]);
    let url = spawn_server(configured(), provider.clone()).await;

    let (status, body) = post(&url, Some(&admin_token()), upload_form("covers/1.png")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["storage_host_used"], "la.storage.bunnycdn.com");
    assert_eq!(body["detected_region"], "la");
    assert_eq!(
        provider.hosts_called(),
        vec![
            "storage.bunnycdn.com",
            "ny.storage.bunnycdn.com",
            "la.storage.bunnycdn.com"
        ]
    );
}

#[tokio::test]
async fn test_configured_region_is_tried_first() {
    let provider = FakeProvider::with(&[("de.storage.bunnycdn.com", 201)]);
    let mut config = configured();
    config.storage_region = Some("de".to_string());
    let url = spawn_server(config, provider.clone()).await;

    let (status, body) = post(&url, Some(&admin_token()), upload_form("covers/2.png")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detected_region"], "de");
    assert_eq!(provider.hosts_called(), vec!["de.storage.bunnycdn.com"]);
}

#[tokio::test]
async fn test_upload_all_unauthorized_lists_hosts() {
    let provider = FakeProvider::with(&[]);
    let url = spawn_server(configured(), provider.clone()).await;

    let (status, body) = post(&url, Some(&admin_token()), upload_form("covers/3.png")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    for host in provider.hosts_called() {
        assert!(message.contains(&host), "{message} should list {host}");
    }
    assert_eq!(provider.hosts_called().len(), 8);
    assert!(!message.contains("zone-password"));
}

#[tokio::test]
async fn test_upload_hard_failure_stops_probing() {
    let provider = FakeProvider::with(&[
        ("storage.bunnycdn.com", 401),
        ("ny.storage.bunnycdn.com", 500),
    ]);
    let url = spawn_server(configured(), provider.clone()).await;

    let (status, body) = post(&url, Some(&admin_token()), upload_form("covers/4.png")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("500"));
    assert_eq!(provider.hosts_called().len(), 2);
}

#[tokio::test]
async fn test_delete_not_found_is_success() {
    let provider = FakeProvider::with(&[("storage.bunnycdn.com", 404)]);
    let url = spawn_server(configured(), provider.clone()).await;

    let form = Form::new()
        .text("path", "series/abc/banner.png")
        .text("action", "delete");
    let (status, body) = post(&url, Some(&admin_token()), form).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
    let calls = provider.calls.lock();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, ProviderMethod::Delete);
    assert!(calls[0].body.is_none());
}

#[tokio::test]
async fn test_delete_without_path_never_reaches_storage() {
    let provider = FakeProvider::with(&[("storage.bunnycdn.com", 200)]);
    let url = spawn_server(configured(), provider.clone()).await;

    let (status, body) = post(&url, Some(&admin_token()), Form::new().text("action", "delete")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("path"));
    assert!(provider.hosts_called().is_empty());
}

#[tokio::test]
async fn test_invalid_tokens_are_rejected_before_storage() {
    let provider = FakeProvider::with(&[("storage.bunnycdn.com", 201)]);
    let url = spawn_server(configured(), provider.clone()).await;

    let expired = token(json!({"role": "admin", "exp": 1_000}), SECRET);
    let reader = token(json!({"role": "authenticated"}), SECRET);
    let forged = token(json!({"role": "admin"}), "not-the-secret");

    for bearer in [None, Some("garbage"), Some(expired.as_str()), Some(reader.as_str()), Some(forged.as_str())] {
        for action in ["upload", "delete"] {
            let form = upload_form("covers/5.png").text("action", action);
            let (status, body) = post(&url, bearer, form).await;

            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, json!({"error": "Unauthorized"}));
        }
    }
    assert!(provider.hosts_called().is_empty());
}

#[tokio::test]
async fn test_missing_secret_rejects_everything() {
    let provider = FakeProvider::with(&[("storage.bunnycdn.com", 201)]);
    let mut config = configured();
    config.admin_jwt_secret = None;
    let url = spawn_server(config, provider.clone()).await;

    let (status, _) = post(&url, Some(&admin_token()), upload_form("covers/6.png")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(provider.hosts_called().is_empty());
}

#[tokio::test]
async fn test_upload_without_file_is_bad_request() {
    let provider = FakeProvider::with(&[("storage.bunnycdn.com", 201)]);
    let url = spawn_server(configured(), provider.clone()).await;

    let form = Form::new().text("path", "covers/7.png").text("action", "upload");
    let (status, body) = post(&url, Some(&admin_token()), form).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "File and path are required"}));

    let part = Part::bytes(b"data".to_vec()).file_name("x.png");
    let form = Form::new().part("file", part);
    let (status, _) = post(&url, Some(&admin_token()), form).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(provider.hosts_called().is_empty());
}

#[tokio::test]
async fn test_missing_storage_config_is_server_error() {
    let provider = FakeProvider::with(&[("storage.bunnycdn.com", 201)]);
    let mut config = configured();
    config.cdn_hostname = None;
    let url = spawn_server(config, provider.clone()).await;

    let (status, body) = post(&url, Some(&admin_token()), upload_form("covers/8.png")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Storage not configured properly"}));
    assert!(provider.hosts_called().is_empty());
}

#[tokio::test]
async fn test_unknown_action_is_bad_request() {
    let provider = FakeProvider::with(&[("storage.bunnycdn.com", 201)]);
    let url = spawn_server(configured(), provider.clone()).await;

    let form = Form::new().text("path", "covers/9.png").text("action", "rename");
    let (status, body) = post(&url, Some(&admin_token()), form).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Unsupported action: rename"}));
    assert!(provider.hosts_called().is_empty());
}

#[tokio::test]
async fn test_delete_of_zone_root_never_reaches_storage() {
    let provider = FakeProvider::with(&[("storage.bunnycdn.com", 200)]);
    let url = spawn_server(configured(), provider.clone()).await;

    for path in ["/", " / ", "//"] {
        let form = Form::new().text("path", path).text("action", "delete");
        let (status, body) = post(&url, Some(&admin_token()), form).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{path:?}");
        assert!(body["error"].as_str().unwrap().contains("path"));
    }
    assert!(provider.hosts_called().is_empty());
}

#[tokio::test]
async fn test_leading_slash_is_dropped_from_stored_path_and_url() {
    let provider = FakeProvider::with(&[("storage.bunnycdn.com", 201)]);
    let url = spawn_server(configured(), provider.clone()).await;

    let (status, body) = post(&url, Some(&admin_token()), upload_form("/covers/a.png")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "https://cdn.example.com/covers/a.png");
    assert_eq!(provider.calls.lock()[0].path, "covers/a.png");
}
