use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

use common::ui::{ConsoleNotifier, StdinConfirm};
use common::{
    AppointmentStatus, AppointmentType, Confirm, FileTokenStore, RegisterForm, TokenStore,
};
use gateway::{ApiClient, AuthState};
use patient_portal::public_paths;
use patient_portal::screens::booking::booking_window;
use patient_portal::screens::{
    AppointmentsScreen, BookingScreen, DashboardScreen, DoctorsScreen, ProfileScreen,
};
use patient_portal::services::PatientApi;
use patient_portal::settings::Settings;
use session::{Access, RoleGate, RouteGuard, SessionService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = Settings::from_env().context("loading settings")?;
    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(settings.token_file()));
    let auth = Arc::new(AuthState::new());
    let api = ApiClient::new(settings.api_url(), auth, store, public_paths())?;
    let session = Arc::new(SessionService::new(api.clone(), RoleGate::Any));

    if let Some(user) = session.restore().await {
        println!("signed in as {} ({})", user.full_name, user.email);
    }

    run(session, PatientApi::new(api)).await
}

async fn run(session: Arc<SessionService>, api: PatientApi) -> anyhow::Result<()> {
    let guard = RouteGuard::new(session.clone());
    let notify = ConsoleNotifier;
    let confirm = StdinConfirm;

    println!("patient portal - type `help` for commands");
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            break;
        }
        let mut parts = line.split_whitespace();
        let Some(cmd) = parts.next() else { continue };
        let args: Vec<&str> = parts.collect();

        match cmd {
            "help" => help(),
            "quit" | "exit" => break,
            "login" => {
                let &[email, password] = args.as_slice() else {
                    println!("usage: login <email> <password>");
                    continue;
                };
                match session.login(email, password).await {
                    Ok(user) => println!("signed in as {} ({})", user.full_name, user.email),
                    Err(err) => println!("error: {err}"),
                }
            }
            "register" => match register_form(&confirm) {
                Some(form) => match session.register(&form).await {
                    Ok(user) => println!("welcome, {}", user.full_name),
                    Err(err) => println!("error: {err}"),
                },
                None => println!("registration aborted"),
            },
            "logout" => {
                session.logout().await;
                println!("signed out");
            }
            "whoami" => match session.current_user() {
                Some(user) => println!("{} <{}> [{}]", user.full_name, user.email, user.user_type),
                None => println!("not signed in"),
            },
            // browsing doctors is public; everything else needs a session
            "doctors" => cmd_doctors(&args, &api, &notify).await,
            protected => {
                let Access::Granted(_) = guard.check() else {
                    println!("please log in first");
                    continue;
                };
                dispatch(protected, &args, &api, &confirm, &notify).await;
            }
        }

        if session.take_expired() {
            println!("session expired, please log in again");
        }
    }
    Ok(())
}

async fn cmd_doctors(args: &[&str], api: &PatientApi, notify: &ConsoleNotifier) {
    let mut screen = DoctorsScreen::new();
    screen.search = args.join(" ");
    screen.load_specialties(api).await;
    screen.load(api, notify).await;
    for doctor in &screen.doctors {
        println!(
            "#{:<5} Dr. {:<24} {:<18} fee {:<8} rating {} ({})",
            doctor.id,
            doctor.display_name(),
            doctor
                .specialization
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(","),
            doctor.consultation_fee,
            doctor.rating,
            doctor.total_reviews,
        );
    }
}

async fn dispatch(
    cmd: &str,
    args: &[&str],
    api: &PatientApi,
    confirm: &StdinConfirm,
    notify: &ConsoleNotifier,
) {
    match cmd {
        "book" => {
            let Some(id) = args.first().and_then(|a| a.parse().ok()) else {
                println!("usage: book <doctor-id>");
                return;
            };
            cmd_book(id, api, confirm, notify).await;
        }
        "appointments" => {
            let mut screen = AppointmentsScreen::new();
            screen.tab = args.first().and_then(|a| parse_status(a));
            screen.load(api, notify).await;
            for appt in screen.visible() {
                println!(
                    "#{:<5} {} {} {:<10} Dr. {}",
                    appt.id,
                    appt.appointment_date,
                    appt.appointment_time,
                    appt.status,
                    appt.doctor_name(),
                );
                if let Some(reason) = &appt.cancellation_reason {
                    println!("       cancelled: {reason}");
                }
            }
        }
        "cancel" => {
            let Some(id) = args.first().and_then(|a| a.parse().ok()) else {
                println!("usage: cancel <appointment-id>");
                return;
            };
            let mut screen = AppointmentsScreen::new();
            screen.load(api, notify).await;
            screen.cancel(id, api, confirm, notify).await;
        }
        "upcoming" => {
            let mut screen = DashboardScreen::new();
            screen.load(api, notify).await;
            println!(
                "{} upcoming, {} total, {} completed",
                screen.upcoming.len(),
                screen.all.len(),
                screen.completed_count(),
            );
            for appt in &screen.upcoming {
                println!(
                    "#{:<5} {} {} with Dr. {}",
                    appt.id,
                    appt.appointment_date,
                    appt.appointment_time,
                    appt.doctor_name(),
                );
            }
        }
        "profile" => {
            let mut screen = ProfileScreen::new();
            screen.load(api, notify).await;
            if let Some(profile) = &screen.profile {
                println!("{} <{}>", profile.user.full_name, profile.user.email);
                if let Some(city) = &profile.city {
                    println!("  city: {city}");
                }
                if let Some(blood_group) = &profile.blood_group {
                    println!("  blood group: {blood_group}");
                }
            }
        }
        other => println!("unknown command `{other}`, try `help`"),
    }
}

async fn cmd_book(
    doctor_id: i64,
    api: &PatientApi,
    confirm: &StdinConfirm,
    notify: &ConsoleNotifier,
) {
    let mut screen = BookingScreen::new(doctor_id);
    if !screen.load(api, notify).await {
        return;
    }
    let online_available = screen
        .doctor
        .as_ref()
        .map(|d| {
            println!(
                "booking with Dr. {} - fee {}",
                d.display_name(),
                d.consultation_fee
            );
            d.online_consultation_available
        })
        .unwrap_or(false);

    let today = chrono::Local::now().date_naive();
    let (min, max) = booking_window(today);
    let Some(raw) = confirm.prompt(&format!("date (YYYY-MM-DD, {min} to {max}):")) else {
        return;
    };
    let Ok(date) = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") else {
        println!("not a valid date");
        return;
    };

    screen.set_date(date, api, notify).await;
    if screen.slots.is_empty() {
        return;
    }
    println!("available slots: {}", screen.slots.join("  "));
    let Some(slot) = confirm.prompt("time slot:") else { return };
    if !screen.select_time(slot.trim()) {
        println!("that slot is not available");
        return;
    }

    if online_available {
        if let Some(answer) = confirm.prompt("type (in_person/online):") {
            if answer.trim() == "online" {
                screen.appointment_type = AppointmentType::Online;
            }
        }
    }

    let Some(symptoms) = confirm.prompt("symptoms:") else { return };
    screen.symptoms = symptoms;
    screen.notes = confirm.prompt("notes (optional):").unwrap_or_default();

    if let Some(appt) = screen.submit(api, notify).await {
        println!(
            "booked appointment #{} on {} at {} - status {}",
            appt.id, appt.appointment_date, appt.appointment_time, appt.status
        );
    }
}

// Dismissing any prompt aborts registration.
fn register_form(confirm: &dyn Confirm) -> Option<RegisterForm> {
    let email = confirm.prompt("email:")?;
    let password = confirm.prompt("password:")?;
    let password_confirm = confirm.prompt("confirm password:")?;
    let first_name = confirm.prompt("first name:")?;
    let last_name = confirm.prompt("last name:")?;
    let phone = confirm.prompt("phone (optional):")?;
    Some(RegisterForm {
        email,
        password,
        password_confirm,
        first_name,
        last_name,
        phone: (!phone.is_empty()).then_some(phone),
    })
}

fn parse_status(arg: &str) -> Option<AppointmentStatus> {
    match arg {
        "pending" => Some(AppointmentStatus::Pending),
        "confirmed" => Some(AppointmentStatus::Confirmed),
        "completed" => Some(AppointmentStatus::Completed),
        "cancelled" => Some(AppointmentStatus::Cancelled),
        "no_show" => Some(AppointmentStatus::NoShow),
        _ => None,
    }
}

fn help() {
    println!("commands:");
    println!("  doctors [search]         browse doctors (no login needed)");
    println!("  login <email> <password> | register | logout | whoami");
    println!("  book <doctor-id>         book an appointment");
    println!("  appointments [status]    your appointments");
    println!("  cancel <id>              cancel an appointment");
    println!("  upcoming                 dashboard summary");
    println!("  profile                  your patient profile");
    println!("  quit");
}
