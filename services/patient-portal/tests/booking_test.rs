use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use actix_web::{web, App, HttpResponse};
use chrono::NaiveDate;
use serde_json::{json, Value};

use common::ui::{RecordingNotifier, ScriptedConfirm};
use common::{MemoryTokenStore, TokenStore};
use gateway::{ApiClient, AuthState};
use patient_portal::screens::{AppointmentsScreen, BookingScreen, DoctorsScreen};
use patient_portal::services::PatientApi;

#[derive(Default)]
struct Hits {
    slots: AtomicUsize,
    book: AtomicUsize,
    list: AtomicUsize,
    cancel: AtomicUsize,
}

fn doctor_json(id: i64) -> Value {
    json!({
        "id": id,
        "user": {
            "id": 100 + id,
            "email": "rohit@example.com",
            "full_name": "Rohit Verma",
            "user_type": "doctor",
            "is_active": true,
            "is_verified": true
        },
        "specialization": [{"id": 1, "name": "Cardiology"}],
        "experience_years": 8,
        "consultation_fee": "500.00",
        "online_consultation_available": true,
        "is_approved": true,
        "is_active": true,
        "rating": "4.50",
        "total_reviews": 12
    })
}

fn appointment_json(id: i64, status: &str, time: &str) -> Value {
    json!({
        "id": id,
        "doctor": doctor_json(9),
        "appointment_date": "2025-03-02",
        "appointment_time": time,
        "appointment_type": "in_person",
        "status": status,
        "symptoms": "persistent cough"
    })
}

async fn get_doctor(path: web::Path<i64>) -> HttpResponse {
    HttpResponse::Ok().json(doctor_json(path.into_inner()))
}

// 2025-03-01 is fully booked; 2025-03-02 has three free slots.
async fn available_slots(
    hits: web::Data<Hits>,
    query: web::Query<HashMap<String, String>>,
) -> HttpResponse {
    hits.slots.fetch_add(1, Ordering::SeqCst);
    let slots: Vec<&str> = match query.get("date").map(String::as_str) {
        Some("2025-03-02") => vec!["09:00", "09:30", "10:00"],
        _ => vec![],
    };
    HttpResponse::Ok().json(json!({ "available_slots": slots }))
}

// 09:00 collides with an existing booking; anything else is accepted.
async fn book(hits: web::Data<Hits>, body: web::Json<Value>) -> HttpResponse {
    hits.book.fetch_add(1, Ordering::SeqCst);
    let time = body["appointment_time"].as_str().unwrap_or("");
    if time == "09:00" {
        return HttpResponse::BadRequest().json(json!({
            "appointment_time": ["This time slot is already booked"]
        }));
    }
    HttpResponse::Created().json(appointment_json(77, "pending", time))
}

async fn list_appointments(hits: web::Data<Hits>) -> HttpResponse {
    hits.list.fetch_add(1, Ordering::SeqCst);
    HttpResponse::Ok().json(json!([appointment_json(77, "pending", "09:30")]))
}

async fn cancel(hits: web::Data<Hits>, path: web::Path<i64>) -> HttpResponse {
    hits.cancel.fetch_add(1, Ordering::SeqCst);
    HttpResponse::Ok().json(appointment_json(path.into_inner(), "cancelled", "09:30"))
}

async fn list_doctors() -> HttpResponse {
    HttpResponse::Ok().json(json!({"results": [doctor_json(9)]}))
}

fn start_stub() -> (actix_test::TestServer, Arc<Hits>) {
    let data = web::Data::new(Hits::default());
    let hits = data.clone().into_inner();
    let srv = actix_test::start(move || {
        App::new()
            .app_data(data.clone())
            .route("/doctors/", web::get().to(list_doctors))
            .route("/doctors/{id}/", web::get().to(get_doctor))
            .route("/doctors/{id}/available_slots/", web::get().to(available_slots))
            .route("/appointments/", web::post().to(book))
            .route("/appointments/", web::get().to(list_appointments))
            .route("/appointments/{id}/cancel/", web::post().to(cancel))
    });
    (srv, hits)
}

fn patient_api(srv: &actix_test::TestServer) -> PatientApi {
    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let api = ApiClient::new(
        format!("http://{}", srv.addr()),
        Arc::new(AuthState::new()),
        store,
        patient_portal::public_paths(),
    )
    .unwrap();
    PatientApi::new(api)
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[actix_web::test]
async fn empty_slot_date_blocks_submission_entirely() {
    let (srv, hits) = start_stub();
    let api = patient_api(&srv);
    let notify = RecordingNotifier::new();

    let mut screen = BookingScreen::new(9);
    assert!(screen.load(&api, &notify).await);

    screen.set_date(date("2025-03-01"), &api, &notify).await;
    assert!(screen.slots.is_empty());
    assert_eq!(
        notify.last_error().as_deref(),
        Some("No slots available for this date")
    );
    assert!(!screen.can_submit());

    // submitting without a slot never issues the create request
    assert!(screen.submit(&api, &notify).await.is_none());
    assert_eq!(hits.book.load(Ordering::SeqCst), 0);
    assert_eq!(
        notify.last_error().as_deref(),
        Some("Please select a time slot")
    );
}

#[actix_web::test]
async fn changing_the_date_always_clears_the_chosen_time() {
    let (srv, hits) = start_stub();
    let api = patient_api(&srv);
    let notify = RecordingNotifier::new();

    let mut screen = BookingScreen::new(9);
    screen.load(&api, &notify).await;

    screen.set_date(date("2025-03-02"), &api, &notify).await;
    assert_eq!(screen.slots.len(), 3);
    assert!(screen.select_time("09:30"));
    assert!(screen.can_submit());

    screen.set_date(date("2025-03-01"), &api, &notify).await;
    assert!(screen.time.is_none());
    assert!(!screen.can_submit());
    // each date selection is a fresh slot fetch
    assert_eq!(hits.slots.load(Ordering::SeqCst), 2);
}

#[actix_web::test]
async fn successful_booking_issues_exactly_one_create() {
    let (srv, hits) = start_stub();
    let api = patient_api(&srv);
    let notify = RecordingNotifier::new();

    let mut screen = BookingScreen::new(9);
    screen.load(&api, &notify).await;
    screen.set_date(date("2025-03-02"), &api, &notify).await;
    screen.select_time("09:30");
    screen.symptoms = "persistent cough".to_string();

    let booked = screen.submit(&api, &notify).await.expect("booking");
    assert_eq!(booked.id, 77);
    assert_eq!(booked.appointment_time, "09:30");
    assert_eq!(hits.book.load(Ordering::SeqCst), 1);
    assert_eq!(
        notify.last_success().as_deref(),
        Some("Appointment booked successfully!")
    );
    assert!(!screen.submitting);
}

#[actix_web::test]
async fn server_side_conflict_surfaces_the_field_error_verbatim() {
    let (srv, hits) = start_stub();
    let api = patient_api(&srv);
    let notify = RecordingNotifier::new();

    let mut screen = BookingScreen::new(9);
    screen.load(&api, &notify).await;
    screen.set_date(date("2025-03-02"), &api, &notify).await;
    screen.select_time("09:00");
    screen.symptoms = "persistent cough".to_string();

    assert!(screen.submit(&api, &notify).await.is_none());
    assert_eq!(hits.book.load(Ordering::SeqCst), 1);
    assert_eq!(
        notify.last_error().as_deref(),
        Some("This time slot is already booked")
    );
    assert!(!screen.submitting);
}

#[actix_web::test]
async fn cancel_confirms_prompts_and_refetches() {
    let (srv, hits) = start_stub();
    let api = patient_api(&srv);
    let notify = RecordingNotifier::new();

    let mut screen = AppointmentsScreen::new();
    screen.load(&api, &notify).await;
    assert_eq!(screen.appointments.len(), 1);

    // declined confirm: nothing happens
    let confirm = ScriptedConfirm::new().confirms([false]);
    screen.cancel(77, &api, &confirm, &notify).await;
    assert_eq!(hits.cancel.load(Ordering::SeqCst), 0);

    // confirmed with an empty reason: one cancel call plus a refetch
    let confirm = ScriptedConfirm::new()
        .confirms([true])
        .prompts([Some(String::new())]);
    screen.cancel(77, &api, &confirm, &notify).await;
    assert_eq!(hits.cancel.load(Ordering::SeqCst), 1);
    assert_eq!(hits.list.load(Ordering::SeqCst), 2);
    assert_eq!(
        notify.last_success().as_deref(),
        Some("Appointment cancelled successfully")
    );
}

#[actix_web::test]
async fn doctor_browse_passes_filters_through() {
    let (srv, _hits) = start_stub();
    let api = patient_api(&srv);
    let notify = RecordingNotifier::new();

    let mut screen = DoctorsScreen::new();
    screen.search = "verma".to_string();
    screen.online_only = true;
    screen.load(&api, &notify).await;
    assert_eq!(screen.doctors.len(), 1);
    assert_eq!(screen.doctors[0].display_name(), "Rohit Verma");
    assert_eq!(notify.error_count(), 0);
}
