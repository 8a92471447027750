//! `auth-cli`: drive the authentication API from a terminal.
//!
//! The session persists in a JSON file between invocations, so `login`
//! followed by `whoami` or `status` behaves like a browser tab reopened on
//! the same origin. Every API call goes through the session interceptor;
//! a 401 or an expired subscription clears the file.

mod storage;
mod transport;


use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use session::{
    ApiConfig, ApiError, AuthApi, ConfigError, CurrentUser, ForgotPasswordRequest, Interceptor, KeyValueStorage,
    RegisterRequest, ResetPasswordRequest, SessionGuard, SessionRecord, SessionStore, SignInRequest,
};
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use crate::storage::FileStorage;
use crate::transport::ReqwestTransport;

const RESET_PASSWORD_PATH: &str = "/auth/reset_password";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Client(#[from] reqwest::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "auth-cli", about = "Authentication session CLI")]
struct Cli {
    #[arg(long, env = "API_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    /// Web app origin; reset links in emails point here.
    #[arg(long, env = "WEB_URL", default_value = "http://127.0.0.1:8080")]
    web_url: String,

    #[arg(long, env = "AUTH_SESSION_FILE", default_value = ".auth-session.json")]
    session_file: PathBuf,

    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and sign in.
    Register(RegisterArgs),
    /// Sign in with email and password.
    Login(LoginArgs),
    /// Email a password reset link.
    ForgotPassword(ForgotPasswordArgs),
    /// Choose a new password with a reset token.
    ResetPassword(ResetPasswordArgs),
    /// End the session on the server and locally.
    Logout,
    /// Print the stored user and session.
    Whoami,
    /// Exit 0 when signed in, 1 otherwise.
    Status,
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long, env = "AUTH_PASSWORD")]
    password: String,
    #[arg(long)]
    password_confirmation: String,
    #[arg(long, default_value = "")]
    image_url: String,
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "AUTH_PASSWORD")]
    password: String,
}

#[derive(Args, Debug)]
struct ForgotPasswordArgs {
    #[arg(long)]
    email: String,
    #[arg(long, help = "Link target in the email; defaults to the reset page on --web-url")]
    redirect_url: Option<String>,
}

#[derive(Args, Debug)]
struct ResetPasswordArgs {
    #[arg(long)]
    token: String,
    #[arg(long, env = "AUTH_PASSWORD")]
    password: String,
    #[arg(long)]
    password_confirmation: String,
}

type CliApi = AuthApi<ReqwestTransport, FileStorage>;

#[tokio::main]
async fn main() -> Result<ExitCode, CliError> {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Err(CliError::Api(e)) => {
            eprintln!("{}", serde_json::to_string_pretty(&e.normalized())?);
            Ok(ExitCode::FAILURE)
        }
        other => other,
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let config = ApiConfig::from_env()?.with_base_url(&cli.base_url)?;
    let store = SessionStore::new(FileStorage::new(&cli.session_file));
    tracing::debug!(file = %cli.session_file.display(), base_url = %config.base_url, "session store opened");
    expire_stored_session(&store);
    let timeout = Duration::from_secs(cli.timeout_secs);

    match cli.command {
        Command::Whoami => {
            print_json(&whoami(&store))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Status => Ok(if status(&store, &config) { ExitCode::SUCCESS } else { ExitCode::from(1) }),
        Command::Register(args) => {
            let api = build_api(&config, store, timeout)?;
            let request = RegisterRequest {
                name: args.name,
                email: args.email,
                password: args.password,
                password_confirmation: args.password_confirmation,
                image_url: args.image_url,
            };
            let user = api.register(&request).await?;
            print_json(&signed_in(&api, user))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Login(args) => {
            let api = build_api(&config, store, timeout)?;
            let user = api
                .sign_in(&SignInRequest { email: args.email, password: args.password })
                .await?;
            print_json(&signed_in(&api, user))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::ForgotPassword(args) => {
            let redirect_url = args.redirect_url.unwrap_or_else(|| reset_link(&cli.web_url));
            let api = build_api(&config, store, timeout)?;
            api.forgot_password(&ForgotPasswordRequest { email: args.email.clone(), redirect_url })
                .await?;
            println!("reset link requested for {}", args.email);
            Ok(ExitCode::SUCCESS)
        }
        Command::ResetPassword(args) => {
            let api = build_api(&config, store, timeout)?;
            api.reset_password(&ResetPasswordRequest {
                reset_password_token: args.token,
                password: args.password,
                password_confirmation: args.password_confirmation,
            })
            .await?;
            println!("password updated; sign in again");
            Ok(ExitCode::SUCCESS)
        }
        Command::Logout => {
            let api = build_api(&config, store, timeout)?;
            api.sign_out().await?;
            println!("signed out");
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Drop a session whose stored subscription expiry has passed. Returns
/// whether one was dropped.
fn expire_stored_session<S: KeyValueStorage>(store: &SessionStore<S>) -> bool {
    match store.expire_stale() {
        Ok(expired) => {
            if expired {
                tracing::warn!("stored subscription expired; session cleared");
            }
            expired
        }
        Err(e) => {
            tracing::warn!(error = %e, "clearing expired session failed");
            false
        }
    }
}

fn reset_link(web_url: &str) -> String {
    format!("{}{RESET_PASSWORD_PATH}", web_url.trim_end_matches('/'))
}

fn build_api(config: &ApiConfig, store: SessionStore<FileStorage>, timeout: Duration) -> Result<CliApi, CliError> {
    let transport = ReqwestTransport::new(config.clone(), timeout)?;
    let interceptor = Interceptor::from_config(transport, store, config).with_navigator(|path: &str| {
        tracing::warn!(redirect = path, "session ended; sign in again");
    });
    Ok(AuthApi::new(interceptor, config.routes.clone()))
}

fn signed_in(api: &CliApi, user: Option<CurrentUser>) -> Value {
    json!({
        "state": api.store().state(),
        "user": user.or_else(|| api.store().current_user()),
    })
}

/// Record with the access token masked; presence is all a terminal needs.
fn masked(mut record: SessionRecord) -> SessionRecord {
    if record.access_token.as_deref().is_some_and(|t| !t.is_empty()) {
        record.access_token = Some("***".to_owned());
    }
    record
}

fn whoami<S: KeyValueStorage>(store: &SessionStore<S>) -> Value {
    let record = store.get();
    json!({
        "state": record.state(),
        "subscription_expired": record.subscription_expired(OffsetDateTime::now_utc()),
        "user": store.current_user(),
        "session": masked(record),
    })
}

fn status<S: KeyValueStorage>(store: &SessionStore<S>, config: &ApiConfig) -> bool {
    let guard = SessionGuard::new(store.clone(), |path: &str| {
        eprintln!("not signed in; run `auth-cli login` (web login page: {path})");
    })
    .with_login_path(config.login_path.clone());
    let authenticated = guard.check_authenticated(None);
    if authenticated {
        println!("signed in");
    }
    authenticated
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
