//!
//! Patient portal CLI
//! ------------------
//! Interactive terminal front end for the hospital patient portal. Drives the
//! page controllers (login, register, forgot/reset password, dashboard)
//! against the remote user service, prompting per field and re-prompting on
//! validation errors, the same way the web pages validate on blur.

use std::env;

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use patient_portal::api::{HttpPortalApi, PortalApi};
use patient_portal::config::PortalConfig;
use patient_portal::form::FormState;
use patient_portal::pages::{
    DashboardPage, ForgotPasswordPage, LoginPage, Phase, RegisterPage, ResetPasswordPage,
};
use patient_portal::routes::Route;
use patient_portal::session::SessionStore;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--api-url <url>] [--session-file <path>] [--timeout <secs>]\n\nFlags:\n  --api-url <url>        Base URL of the user service (default: http://localhost:8083/api/users;\n                         also PORTAL_API_URL)\n  --session-file <path>  Persist the logged-in profile across runs (also PORTAL_SESSION_FILE)\n  --timeout <secs>       Per-request timeout (default: 10; also PORTAL_HTTP_TIMEOUT_SECS)\n  -h, --help             Show this help\n\nInteractive commands:\n  login             log in and open the dashboard\n  register          submit a patient registration\n  forgot-password   request a password-reset OTP\n  reset-password    reset the password using an OTP\n  dashboard         show the logged-in profile\n  logout            clear the session\n  status            show connection and session state\n  help              show this help\n  quit | exit       leave the portal"
    );
}

fn parse_flags(program: &str, mut cfg: PortalConfig) -> Result<PortalConfig> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--api-url" => {
                if i + 1 >= args.len() {
                    eprintln!("--api-url requires a value");
                    print_usage(program);
                    std::process::exit(2);
                }
                cfg.api_url = args[i + 1].clone();
                i += 2;
            }
            "--session-file" => {
                if i + 1 >= args.len() {
                    eprintln!("--session-file requires a value");
                    print_usage(program);
                    std::process::exit(2);
                }
                cfg.session_file = Some(args[i + 1].clone().into());
                i += 2;
            }
            "--timeout" => {
                if i + 1 >= args.len() {
                    eprintln!("--timeout requires a value");
                    print_usage(program);
                    std::process::exit(2);
                }
                let secs: u64 = args[i + 1].parse()?;
                cfg.timeout = std::time::Duration::from_secs(secs);
                i += 2;
            }
            "-h" | "--help" => {
                print_usage(program);
                std::process::exit(0);
            }
            other => {
                eprintln!("unknown flag: {other}");
                print_usage(program);
                std::process::exit(2);
            }
        }
    }
    Ok(cfg)
}

/// Prompt for every empty field of the form, validating on entry the way the
/// web pages validate on blur, and re-prompting until the field passes.
fn fill_form(rl: &mut DefaultEditor, form: &mut FormState) -> Result<bool> {
    let rules: Vec<_> = form.rules().to_vec();
    for rule in rules {
        if !form.value(rule.field).is_empty() {
            // Pre-filled (e.g. registration date/time stamps).
            let shown = if rule.secret { "********" } else { form.value(rule.field) };
            println!("{}: {}", rule.label, shown);
            continue;
        }
        loop {
            let line = match rl.readline(&format!("{}: ", rule.label)) {
                Ok(l) => l,
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(false),
                Err(e) => return Err(e.into()),
            };
            form.on_field_change(rule.field, line.trim());
            form.on_field_blur(rule.field);
            match form.error(rule.field) {
                Some(msg) => println!("  ! {msg}"),
                None => break,
            }
        }
    }
    Ok(true)
}

fn print_field_errors(form: &FormState) {
    for (field, msg) in form.errors() {
        println!("  ! {field}: {msg}");
    }
}

fn announce(route: Route) {
    println!("-> {}", route.path());
}

async fn run_login(rl: &mut DefaultEditor, api: &dyn PortalApi, session: &SessionStore) -> Result<()> {
    let mut page = LoginPage::new();
    if !fill_form(rl, &mut page.form)? {
        return Ok(());
    }
    println!("Logging In...");
    let nav = page.submit(api, session).await;
    match page.phase() {
        Phase::Success => {
            if let Some(route) = nav {
                announce(route);
            }
            show_dashboard(session);
        }
        Phase::Invalid => print_field_errors(&page.form),
        _ => {
            print_field_errors(&page.form);
            if let Some(banner) = page.banner() {
                println!("  ! {banner}");
            }
        }
    }
    Ok(())
}

async fn run_register(rl: &mut DefaultEditor, api: &dyn PortalApi) -> Result<()> {
    let mut page = RegisterPage::new();
    println!("Patient Registration Form");
    if !fill_form(rl, &mut page.form)? {
        return Ok(());
    }
    println!("Submitting form...");
    let nav = page.submit(api).await;
    match page.phase() {
        Phase::Success => {
            if let Some(banner) = page.banner() {
                println!("{banner}");
            }
            if let Some(route) = nav {
                announce(route);
            }
        }
        Phase::Invalid => {
            print_field_errors(&page.form);
            println!("Please fix the errors above before submitting.");
        }
        _ => {
            if let Some(banner) = page.banner() {
                println!("  ! {banner}");
            }
        }
    }
    Ok(())
}

async fn run_forgot_password(rl: &mut DefaultEditor, api: &dyn PortalApi) -> Result<()> {
    let mut page = ForgotPasswordPage::new();
    println!("Forgot Password");
    if !fill_form(rl, &mut page.form)? {
        return Ok(());
    }
    let nav = page.submit(api).await;
    match page.phase() {
        Phase::Success => {
            if let Some(msg) = page.success_message() {
                println!("{msg}");
            }
            if let Some(route) = nav {
                announce(route);
            }
        }
        Phase::Invalid => print_field_errors(&page.form),
        _ => {
            print_field_errors(&page.form);
            if let Some(banner) = page.banner() {
                println!("  ! {banner}");
            }
        }
    }
    Ok(())
}

async fn run_reset_password(rl: &mut DefaultEditor, api: &dyn PortalApi) -> Result<()> {
    let mut page = ResetPasswordPage::new();
    println!("Reset Password");
    if !fill_form(rl, &mut page.form)? {
        return Ok(());
    }
    page.submit(api).await;
    match page.phase() {
        Phase::Success => {
            if let Some(msg) = page.success_message() {
                println!("{msg}");
            }
        }
        Phase::Invalid => print_field_errors(&page.form),
        _ => {
            print_field_errors(&page.form);
            if let Some(banner) = page.banner() {
                println!("  ! {banner}");
            }
        }
    }
    Ok(())
}

fn show_dashboard(session: &SessionStore) {
    let page = DashboardPage::new(session.clone());
    match page.profile_lines() {
        Some(lines) => {
            println!("Profile");
            for (label, value) in lines {
                println!("  {label}: {value}");
            }
        }
        None => println!("Not logged in."),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("Patient Portal\n  Hospital Management System - Command Line Interface");

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info")).unwrap();
    fmt().with_env_filter(filter).init();

    let program = env::args().next().unwrap_or_else(|| "portal_cli".to_string());
    let cfg = parse_flags(&program, PortalConfig::from_env())?;
    info!(
        target: "portal",
        "portal starting: api_url='{}', timeout_secs={}, session_file={:?}",
        cfg.api_url,
        cfg.timeout.as_secs(),
        cfg.session_file
    );

    let api = HttpPortalApi::new(&cfg)?;
    let session = match &cfg.session_file {
        Some(path) => SessionStore::with_file(path),
        None => SessionStore::in_memory(),
    };

    let mut rl = DefaultEditor::new()?;
    println!("Type 'help' for commands.");
    loop {
        let line = match rl.readline("portal> ") {
            Ok(l) => l,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let cmd = line.trim();
        if cmd.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(cmd);
        match cmd {
            "login" => run_login(&mut rl, &api, &session).await?,
            "register" => run_register(&mut rl, &api).await?,
            "forgot-password" => run_forgot_password(&mut rl, &api).await?,
            "reset-password" => run_reset_password(&mut rl, &api).await?,
            "dashboard" => show_dashboard(&session),
            "logout" => {
                let route = DashboardPage::new(session.clone()).logout();
                announce(route);
            }
            "status" => {
                println!("api: {}", cfg.api_url);
                match session.get() {
                    Some(p) => println!("session: {} {}", p.patient_first_name, p.patient_last_name),
                    None => println!("session: none"),
                }
            }
            "help" => print_usage(&program),
            "quit" | "exit" => break,
            other => println!("unknown command: {other} (try 'help')"),
        }
    }
    Ok(())
}
