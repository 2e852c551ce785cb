use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use actix_web::{web, App, HttpResponse};
use serde_json::{json, Value};

use common::ui::RecordingNotifier;
use common::{AppointmentStatus, DoctorUpdate, MemoryTokenStore, Schedule, TokenStore};
use doctor_portal::screens::{AppointmentsScreen, ProfileScreen, ScheduleScreen};
use doctor_portal::services::DoctorApi;
use gateway::{ApiClient, AuthState};

#[derive(Default)]
struct Hits {
    list: AtomicUsize,
    update_status: AtomicUsize,
    schedule_get: AtomicUsize,
    schedule_post: AtomicUsize,
}

fn doctor_json() -> Value {
    json!({
        "id": 9,
        "user": {
            "id": 109,
            "email": "rohit@example.com",
            "full_name": "Rohit Verma",
            "user_type": "doctor",
            "is_active": true,
            "is_verified": true
        },
        "specialization": [{"id": 1, "name": "Cardiology"}],
        "experience_years": 8,
        "qualification": "MBBS, MD",
        "registration_number": "REG-77",
        "consultation_fee": "500.00",
        "clinic_address": "12 Lake Road",
        "clinic_city": "Pune",
        "clinic_state": "MH",
        "clinic_pincode": "411001",
        "online_consultation_available": true,
        "is_approved": true,
        "is_active": true,
        "rating": "4.50",
        "total_reviews": 12
    })
}

fn appointment_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "patient": {
            "id": 5,
            "user": {
                "id": 51,
                "email": "meera@example.com",
                "full_name": "Meera Shah",
                "user_type": "patient",
                "is_active": true,
                "is_verified": true
            }
        },
        "appointment_date": "2025-03-01",
        "appointment_time": "10:30:00",
        "appointment_type": "online",
        "status": status,
        "symptoms": "persistent cough"
    })
}

async fn list_appointments(hits: web::Data<Hits>) -> HttpResponse {
    hits.list.fetch_add(1, Ordering::SeqCst);
    HttpResponse::Ok().json(json!([
        appointment_json(42, "pending"),
        appointment_json(43, "confirmed"),
    ]))
}

async fn update_status(
    hits: web::Data<Hits>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> HttpResponse {
    hits.update_status.fetch_add(1, Ordering::SeqCst);
    let status = body["status"].as_str().unwrap_or("pending").to_string();
    HttpResponse::Ok().json(appointment_json(path.into_inner(), &status))
}

async fn get_profile() -> HttpResponse {
    HttpResponse::Ok().json(doctor_json())
}

async fn update_profile(body: web::Json<Value>) -> HttpResponse {
    let mut doctor = doctor_json();
    if let Some(fee) = body["consultation_fee"].as_str() {
        doctor["consultation_fee"] = json!(fee);
    }
    HttpResponse::Ok().json(doctor)
}

async fn get_schedule(hits: web::Data<Hits>) -> HttpResponse {
    hits.schedule_get.fetch_add(1, Ordering::SeqCst);
    HttpResponse::Ok().json(json!([
        {"id": 1, "day_of_week": 0, "start_time": "09:00:00", "end_time": "13:00:00", "is_available": true, "slot_duration": 30}
    ]))
}

async fn post_schedule(hits: web::Data<Hits>, body: web::Json<Value>) -> HttpResponse {
    hits.schedule_post.fetch_add(1, Ordering::SeqCst);
    let mut row = body.into_inner();
    row["id"] = json!(2);
    HttpResponse::Created().json(row)
}

fn start_stub() -> (actix_test::TestServer, Arc<Hits>) {
    let data = web::Data::new(Hits::default());
    let hits = data.clone().into_inner();
    let srv = actix_test::start(move || {
        App::new()
            .app_data(data.clone())
            .route("/doctors/appointments/", web::get().to(list_appointments))
            .route("/appointments/{id}/update_status/", web::patch().to(update_status))
            .route("/doctors/profile/", web::get().to(get_profile))
            .route("/doctors/update_profile/", web::put().to(update_profile))
            .route(
                "/doctors/schedule/",
                web::get().to(get_schedule),
            )
            .route("/doctors/schedule/", web::post().to(post_schedule))
    });
    (srv, hits)
}

fn doctor_api(srv: &actix_test::TestServer) -> DoctorApi {
    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let api = ApiClient::new(
        format!("http://{}", srv.addr()),
        Arc::new(AuthState::new()),
        store,
        doctor_portal::public_paths(),
    )
    .unwrap();
    DoctorApi::new(api)
}

#[actix_web::test]
async fn accept_issues_one_patch_and_refetches() {
    let (srv, hits) = start_stub();
    let api = doctor_api(&srv);
    let notify = RecordingNotifier::new();

    let mut screen = AppointmentsScreen::new();
    screen.load(&api, &notify).await;
    assert_eq!(screen.appointments.len(), 2);
    assert_eq!(screen.pending().len(), 1);

    screen.accept(42, &api, &notify).await;
    assert_eq!(hits.update_status.load(Ordering::SeqCst), 1);
    assert_eq!(hits.list.load(Ordering::SeqCst), 2);
    assert_eq!(notify.last_success().as_deref(), Some("Status updated"));
}

#[actix_web::test]
async fn status_filter_is_sent_as_a_query_parameter() {
    let (srv, _hits) = start_stub();
    let api = doctor_api(&srv);

    // the stub ignores the filter; this only asserts the call shape works
    let appointments = api
        .appointments(Some(AppointmentStatus::Pending), None)
        .await
        .unwrap();
    assert_eq!(appointments.len(), 2);
}

#[actix_web::test]
async fn profile_save_updates_local_copy() {
    let (srv, _hits) = start_stub();
    let api = doctor_api(&srv);
    let notify = RecordingNotifier::new();

    let mut screen = ProfileScreen::new();
    screen.load(&api, &notify).await;
    assert_eq!(
        screen.profile.as_ref().unwrap().consultation_fee,
        "500.00"
    );

    let patch = DoctorUpdate {
        consultation_fee: Some("750.00".to_string()),
        ..DoctorUpdate::default()
    };
    screen.save(&patch, &api, &notify).await;
    assert_eq!(
        screen.profile.as_ref().unwrap().consultation_fee,
        "750.00"
    );
    assert_eq!(notify.success_count(), 1);
    assert!(!screen.saving);
}

#[actix_web::test]
async fn schedule_day_lookup_and_upsert() {
    let (srv, hits) = start_stub();
    let api = doctor_api(&srv);
    let notify = RecordingNotifier::new();

    let mut screen = ScheduleScreen::new();
    screen.load(&api, &notify).await;
    assert!(screen.day(0).is_some());
    assert!(screen.day(3).is_none());

    let row = Schedule {
        id: None,
        day_of_week: 3,
        start_time: "14:00".to_string(),
        end_time: "18:00".to_string(),
        is_available: true,
        slot_duration: 20,
    };
    screen.save_day(row, &api, &notify).await;
    assert_eq!(hits.schedule_post.load(Ordering::SeqCst), 1);
    // save re-fetches the week
    assert_eq!(hits.schedule_get.load(Ordering::SeqCst), 2);
}

#[actix_web::test]
async fn failed_load_empties_the_list_and_notifies_once() {
    // point the client at a stub with no matching route at all
    let srv = actix_test::start(|| App::new());
    let api = doctor_api(&srv);
    let notify = RecordingNotifier::new();

    let mut screen = AppointmentsScreen::new();
    screen.appointments = vec![serde_json::from_value(appointment_json(1, "pending")).unwrap()];
    screen.load(&api, &notify).await;

    assert!(screen.appointments.is_empty());
    assert_eq!(notify.error_count(), 1);
}
