use std::sync::Arc;

use actix_web::{web, App, HttpRequest, HttpResponse};
use serde_json::json;

use common::{CredentialPair, MemoryTokenStore, TokenStore};
use gateway::{ApiClient, ApiError, AuthState};

async fn echo_headers(req: HttpRequest) -> HttpResponse {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string()
    };
    HttpResponse::Ok().json(json!({
        "authorization": header("Authorization"),
        "request_id": header("X-Request-Id"),
    }))
}

async fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(json!({"detail": "Invalid token"}))
}

async fn plain_list() -> HttpResponse {
    HttpResponse::Ok().json(json!([{"id": 1, "name": "Cardiology"}]))
}

async fn paginated_list() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "count": 2,
        "results": [{"id": 1, "name": "Cardiology"}, {"id": 2, "name": "Dermatology"}]
    }))
}

async fn slot_conflict() -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "appointment_time": ["This time slot is already booked"]
    }))
}

fn stub() -> actix_test::TestServer {
    actix_test::start(|| {
        App::new()
            .route("/echo/", web::get().to(echo_headers))
            .route("/appointments/", web::get().to(unauthorized))
            .route("/doctors/", web::get().to(unauthorized))
            .route("/doctors/specialties/", web::get().to(plain_list))
            .route("/doctors/paged/", web::get().to(paginated_list))
            .route("/appointments/new/", web::post().to(slot_conflict))
    })
}

fn client_with(
    srv: &actix_test::TestServer,
    public_paths: Vec<String>,
) -> (ApiClient, Arc<AuthState>, Arc<MemoryTokenStore>) {
    let auth = Arc::new(AuthState::new());
    let store = Arc::new(MemoryTokenStore::new());
    let api = ApiClient::new(
        format!("http://{}", srv.addr()),
        auth.clone(),
        store.clone() as Arc<dyn TokenStore>,
        public_paths,
    )
    .unwrap();
    (api, auth, store)
}

fn creds() -> CredentialPair {
    CredentialPair {
        access: "access-abc".into(),
        refresh: "refresh-xyz".into(),
    }
}

#[actix_web::test]
async fn bearer_token_attached_when_credentials_present() {
    let srv = stub();
    let (api, auth, _store) = client_with(&srv, vec![]);

    // logged out: no Authorization header at all
    let echoed: serde_json::Value = api.get("/echo/").await.unwrap();
    assert_eq!(echoed["authorization"], "");
    assert_ne!(echoed["request_id"], "");

    auth.set_credentials(creds());
    let echoed: serde_json::Value = api.get("/echo/").await.unwrap();
    assert_eq!(echoed["authorization"], "Bearer access-abc");
}

#[actix_web::test]
async fn protected_401_wipes_session_and_storage() {
    let srv = stub();
    let (api, auth, store) = client_with(&srv, vec!["/auth/login/".to_string()]);
    auth.set_credentials(creds());
    store.save(&creds()).unwrap();

    let err = api.get::<serde_json::Value>("/appointments/").await.unwrap_err();
    assert!(matches!(err, ApiError::SessionExpired));
    assert!(auth.credentials().is_none());
    assert!(store.load().unwrap().is_none());
    assert!(auth.take_expired());
}

#[actix_web::test]
async fn allowlisted_401_passes_through_untouched() {
    let srv = stub();
    let (api, auth, store) = client_with(&srv, vec!["/doctors/".to_string()]);
    auth.set_credentials(creds());
    store.save(&creds()).unwrap();

    let err = api.get::<serde_json::Value>("/doctors/").await.unwrap_err();
    match &err {
        ApiError::Status { status, .. } => assert_eq!(*status, 401),
        other => panic!("expected status error, got {other:?}"),
    }
    assert_eq!(err.server_message(), Some("Invalid token"));
    // anonymous browsing not disrupted
    assert!(auth.credentials().is_some());
    assert!(store.load().unwrap().is_some());
    assert!(!auth.take_expired());
}

#[actix_web::test]
async fn allowlist_substring_covers_nested_paths() {
    let srv = stub();
    let (api, auth, _store) = client_with(&srv, vec!["/doctors/".to_string()]);
    auth.set_credentials(creds());

    // specialties listing sits under /doctors/ and must stay public
    let specs: Vec<serde_json::Value> = api.get_list("/doctors/specialties/", &[]).await.unwrap();
    assert_eq!(specs.len(), 1);
    assert!(auth.credentials().is_some());
}

#[actix_web::test]
async fn list_normalization_handles_both_shapes() {
    let srv = stub();
    let (api, _auth, _store) = client_with(&srv, vec!["/doctors/".to_string()]);

    let plain: Vec<serde_json::Value> = api.get_list("/doctors/specialties/", &[]).await.unwrap();
    assert_eq!(plain.len(), 1);

    let paged: Vec<serde_json::Value> = api.get_list("/doctors/paged/", &[]).await.unwrap();
    assert_eq!(paged.len(), 2);
    assert_eq!(paged[1]["name"], "Dermatology");
}

#[actix_web::test]
async fn field_errors_survive_in_the_status_body() {
    let srv = stub();
    let (api, _auth, _store) = client_with(&srv, vec![]);

    let err = api
        .post::<_, serde_json::Value>("/appointments/new/", &json!({"doctor_id": 3}))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.field_error("appointment_time").as_deref(),
        Some("This time slot is already booked")
    );
}
