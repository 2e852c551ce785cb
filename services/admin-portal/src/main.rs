use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use admin_portal::public_paths;
use admin_portal::screens::appointments::StatusFilter;
use admin_portal::screens::{AppointmentsScreen, DashboardScreen, DoctorTab, DoctorsScreen, UsersScreen};
use admin_portal::services::AdminApi;
use admin_portal::settings::Settings;
use common::ui::{ConsoleNotifier, StdinConfirm};
use common::{AppointmentStatus, FileTokenStore, TokenStore, UserType};
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
        RoleGate::Only(UserType::Admin),
    ));

    if let Some(user) = session.restore().await {
        println!("signed in as {} ({})", user.full_name, user.email);
    }

    run(session, AdminApi::new(api)).await
}

async fn run(session: Arc<SessionService>, api: AdminApi) -> anyhow::Result<()> {
    let guard = RouteGuard::new(session.clone());
    let notify = ConsoleNotifier;
    let confirm = StdinConfirm;

    println!("admin portal - type `help` for commands");
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
                    Err(err) => notify_err(&err),
                }
            }
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
                dispatch(protected, &args, &api, &confirm, &notify).await;
            }
        }

        if session.take_expired() {
            println!("session expired, please log in again");
        }
    }
    Ok(())
}

async fn dispatch(
    cmd: &str,
    args: &[&str],
    api: &AdminApi,
    confirm: &StdinConfirm,
    notify: &ConsoleNotifier,
) {
    match cmd {
        "dashboard" => {
            let mut screen = DashboardScreen::new();
            screen.load(api, notify).await;
            let s = &screen.stats;
            println!("patients:            {}", s.total_patients);
            println!("doctors:             {}", s.total_doctors);
            println!("appointments:        {}", s.total_appointments);
            println!("appointments today:  {}", s.today_appointments);
            println!("pending doctors:     {}", s.pending_doctors);
        }
        "users" => {
            let mut screen = UsersScreen::new();
            screen.search = args.join(" ");
            screen.load(api, notify).await;
            for user in screen.visible() {
                println!(
                    "#{:<5} {:<28} {:<10} {}{}",
                    user.id,
                    user.email,
                    user.user_type,
                    if user.is_active { "active" } else { "inactive" },
                    if user.is_verified { ", verified" } else { "" },
                );
            }
            println!("total: {} users", screen.visible().len());
        }
        "doctors" => {
            let mut screen = DoctorsScreen::new();
            screen.tab = match args.first().copied() {
                Some("pending") => DoctorTab::Pending,
                Some("approved") => DoctorTab::Approved,
                Some("inactive") => DoctorTab::Inactive,
                _ => DoctorTab::All,
            };
            screen.load(api, notify).await;
            for doctor in screen.visible() {
                println!(
                    "#{:<5} {:<24} {:<18} fee {:<8} {}{}",
                    doctor.id,
                    doctor.display_name(),
                    doctor
                        .specialization
                        .iter()
                        .map(|s| s.name.as_str())
                        .collect::<Vec<_>>()
                        .join(","),
                    doctor.consultation_fee,
                    if doctor.is_approved { "approved" } else { "pending" },
                    if doctor.is_active { "" } else { ", inactive" },
                );
            }
        }
        "approve-doctor" => {
            let Some(id) = parse_id(args) else { return };
            let mut screen = DoctorsScreen::new();
            screen.load(api, notify).await;
            screen.approve(id, api, confirm, notify).await;
        }
        "enable-doctor" | "disable-doctor" => {
            let Some(id) = parse_id(args) else { return };
            let mut screen = DoctorsScreen::new();
            screen.load(api, notify).await;
            screen.toggle_active(id, api, confirm, notify).await;
        }
        "delete-doctor" => {
            let Some(id) = parse_id(args) else { return };
            let mut screen = DoctorsScreen::new();
            screen.load(api, notify).await;
            screen.delete(id, api, confirm, notify).await;
        }
        "appointments" => {
            let mut screen = AppointmentsScreen::new();
            screen.filter = match parse_status(args.first().copied()) {
                Some(status) => StatusFilter::Only(status),
                None => StatusFilter::All,
            };
            screen.load(api, notify).await;
            for appt in screen.visible() {
                println!(
                    "#{:<5} {} {} {:<10} {} -> {}",
                    appt.id,
                    appt.appointment_date,
                    appt.appointment_time,
                    appt.status,
                    appt.patient_name(),
                    appt.doctor_name(),
                );
            }
        }
        "approve" => {
            let Some(id) = parse_id(args) else { return };
            let mut screen = AppointmentsScreen::new();
            screen.load(api, notify).await;
            screen.approve(id, api, confirm, notify).await;
        }
        "reject" => {
            let Some(id) = parse_id(args) else { return };
            let mut screen = AppointmentsScreen::new();
            screen.load(api, notify).await;
            screen.reject(id, api, confirm, notify).await;
        }
        other => println!("unknown command `{other}`, try `help`"),
    }
}

fn parse_status(arg: Option<&str>) -> Option<AppointmentStatus> {
    match arg? {
        "pending" => Some(AppointmentStatus::Pending),
        "confirmed" => Some(AppointmentStatus::Confirmed),
        "completed" => Some(AppointmentStatus::Completed),
        "cancelled" => Some(AppointmentStatus::Cancelled),
        "no_show" => Some(AppointmentStatus::NoShow),
        _ => None,
    }
}

fn parse_id(args: &[&str]) -> Option<i64> {
    match args.first().and_then(|a| a.parse().ok()) {
        Some(id) => Some(id),
        None => {
            println!("expected a numeric id");
            None
        }
    }
}

fn notify_err(err: &session::AuthError) {
    println!("error: {err}");
}

fn help() {
    println!("commands:");
    println!("  login <email> <password>   sign in (admin accounts only)");
    println!("  logout | whoami");
    println!("  dashboard                  platform statistics");
    println!("  users [search]             list users");
    println!("  doctors [pending|approved|inactive]");
    println!("  approve-doctor <id>        approve a pending doctor");
    println!("  enable-doctor <id> | disable-doctor <id>");
    println!("  delete-doctor <id>         permanently delete a doctor");
    println!("  appointments [status]      list appointments");
    println!("  approve <id> | reject <id> act on an appointment");
    println!("  quit");
}
