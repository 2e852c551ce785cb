use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use common::ui::{ConsoleNotifier, StdinConfirm};
use common::{
    AppointmentStatus, Confirm, DoctorRegisterForm, DoctorUpdate, FileTokenStore, Schedule,
    TokenStore, UserType,
};
use doctor_portal::public_paths;
use doctor_portal::screens::schedule::DAYS;
use doctor_portal::screens::{AppointmentsScreen, ProfileScreen, ScheduleScreen};
use doctor_portal::services::DoctorApi;
use doctor_portal::settings::Settings;
use gateway::{ApiClient, AuthState};
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
    let session = Arc::new(SessionService::new(
        api.clone(),
        RoleGate::Only(UserType::Doctor),
    ));

    if let Some(user) = session.restore().await {
        println!("signed in as Dr. {} ({})", user.full_name, user.email);
    }

    run(session, DoctorApi::new(api)).await
}

async fn run(session: Arc<SessionService>, api: DoctorApi) -> anyhow::Result<()> {
    let guard = RouteGuard::new(session.clone());
    let notify = ConsoleNotifier;
    let confirm = StdinConfirm;

    println!("doctor portal - type `help` for commands");
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
                    Ok(user) => println!("signed in as Dr. {} ({})", user.full_name, user.email),
                    Err(err) => println!("error: {err}"),
                }
            }
            "register" => match register_form(&confirm) {
                Some(form) => match session.register_doctor(&form).await {
                    Ok(user) => println!(
                        "registered {} - the account is pending admin approval",
                        user.email
                    ),
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
            protected => {
                let Access::Granted(_) = guard.check() else {
                    println!("please log in first");
                    continue;
                };
                dispatch(protected, &args, &api, &notify).await;
            }
        }

        if session.take_expired() {
            println!("session expired, please log in again");
        }
    }
    Ok(())
}

async fn dispatch(cmd: &str, args: &[&str], api: &DoctorApi, notify: &ConsoleNotifier) {
    match cmd {
        "appointments" => {
            let mut screen = AppointmentsScreen::new();
            screen.status_filter = args.first().and_then(|a| parse_status(a));
            screen.load(api, notify).await;
            for appt in &screen.appointments {
                println!(
                    "#{:<5} {} {} {:<10} {}",
                    appt.id,
                    appt.appointment_date,
                    appt.appointment_time,
                    appt.status,
                    appt.patient_name(),
                );
                if !appt.symptoms.is_empty() {
                    println!("       symptoms: {}", appt.symptoms);
                }
            }
        }
        "accept" | "reject" | "complete" | "no-show" => {
            let Some(id) = args.first().and_then(|a| a.parse().ok()) else {
                println!("expected a numeric appointment id");
                return;
            };
            let status = match cmd {
                "accept" => AppointmentStatus::Confirmed,
                "reject" => AppointmentStatus::Cancelled,
                "complete" => AppointmentStatus::Completed,
                _ => AppointmentStatus::NoShow,
            };
            let mut screen = AppointmentsScreen::new();
            screen.load(api, notify).await;
            screen.update_status(id, status, api, notify).await;
        }
        "profile" => {
            let mut screen = ProfileScreen::new();
            screen.load(api, notify).await;
            if let Some(profile) = &screen.profile {
                println!("Dr. {}", profile.display_name());
                println!("  qualification: {}", profile.qualification);
                println!("  experience:    {} years", profile.experience_years);
                println!("  fee:           {}", profile.consultation_fee);
                println!(
                    "  clinic:        {}, {}",
                    profile.clinic_address, profile.clinic_city
                );
                println!(
                    "  status:        {}{}",
                    if profile.is_approved { "approved" } else { "pending approval" },
                    if profile.is_active { "" } else { ", inactive" },
                );
            }
        }
        "set-fee" => {
            let Some(fee) = args.first() else {
                println!("usage: set-fee <amount>");
                return;
            };
            let patch = DoctorUpdate {
                consultation_fee: Some((*fee).to_string()),
                ..DoctorUpdate::default()
            };
            let mut screen = ProfileScreen::new();
            screen.save(&patch, api, notify).await;
        }
        "schedule" => {
            let mut screen = ScheduleScreen::new();
            screen.load(api, notify).await;
            for (dow, name) in DAYS.iter().enumerate() {
                match screen.day(dow as u8) {
                    Some(day) if day.is_available => println!(
                        "{:<10} {} - {} ({} min slots)",
                        name, day.start_time, day.end_time, day.slot_duration
                    ),
                    _ => println!("{name:<10} not available"),
                }
            }
        }
        "set-day" => {
            let &[dow, start, end, slot] = args else {
                println!("usage: set-day <0-6> <start HH:MM> <end HH:MM> <slot-minutes>");
                return;
            };
            let (Ok(dow), Ok(slot)) = (dow.parse::<u8>(), slot.parse::<u32>()) else {
                println!("usage: set-day <0-6> <start HH:MM> <end HH:MM> <slot-minutes>");
                return;
            };
            let row = Schedule {
                id: None,
                day_of_week: dow,
                start_time: start.to_string(),
                end_time: end.to_string(),
                is_available: true,
                slot_duration: slot,
            };
            let mut screen = ScheduleScreen::new();
            screen.save_day(row, api, notify).await;
        }
        other => println!("unknown command `{other}`, try `help`"),
    }
}

// A compact interactive form; a dismissed prompt aborts registration.
fn register_form(confirm: &dyn Confirm) -> Option<DoctorRegisterForm> {
    let email = confirm.prompt("email:")?;
    let password = confirm.prompt("password:")?;
    let password_confirm = confirm.prompt("confirm password:")?;
    let first_name = confirm.prompt("first name:")?;
    let last_name = confirm.prompt("last name:")?;
    let experience_years = confirm.prompt("experience (years):")?.parse().ok()?;
    let consultation_fee = confirm.prompt("consultation fee:")?;
    Some(DoctorRegisterForm {
        email,
        password,
        password_confirm,
        first_name,
        last_name,
        phone: None,
        experience_years,
        qualification: None,
        registration_number: None,
        consultation_fee,
        specialization_ids: Vec::new(),
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
    println!("  login <email> <password>     sign in (doctor accounts only)");
    println!("  register                     doctor self-registration");
    println!("  logout | whoami");
    println!("  appointments [status]        list your appointments");
    println!("  accept <id> | reject <id> | complete <id> | no-show <id>");
    println!("  profile                      show your profile");
    println!("  set-fee <amount>             update your consultation fee");
    println!("  schedule                     show your weekly schedule");
    println!("  set-day <0-6> <start> <end> <slot-minutes>");
    println!("  quit");
}
