use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing::{error, info};

use service::auth::repo::json_file::JsonFileUserRepo;
use service::auth::token::JwtTokenIssuer;
use service::auth::{AuthConfig, AuthError, AuthService, LoginInput, RegisterInput, RequestContext};

#[derive(Debug, Parser)]
#[command(name = "auth-cli", about = "Register and log in accounts against the local user store")]
struct Cli {
    /// Path to config.toml; defaults to $CONFIG_PATH or ./config.toml
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an account and print its access token
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Log in and print a fresh access token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Check an access token and print its claims
    VerifyToken { token: String },
}

fn load_config(path: Option<&str>) -> anyhow::Result<configs::AppConfig> {
    match path {
        Some(p) => {
            let mut cfg = configs::load_from_file(p)?;
            cfg.normalize_and_validate()?;
            Ok(cfg)
        }
        None => configs::AppConfig::load_and_validate(),
    }
}

async fn run(cli: Cli, cfg: configs::AppConfig) -> anyhow::Result<serde_json::Value> {
    let repo = Arc::new(JsonFileUserRepo::open(&cfg.storage.users_path).await?);
    let tokens = Arc::new(JwtTokenIssuer::from_settings(&cfg.token)?);
    let svc = AuthService::new(repo, tokens, AuthConfig::from(&cfg));
    let ctx = RequestContext::new();

    let out = match cli.command {
        Command::Register { email, username, password, confirm_password } => {
            let resp = svc.register(&ctx, RegisterInput { email, username, password, confirm_password }).await?;
            serde_json::to_value(resp)?
        }
        Command::Login { email, password } => {
            let resp = svc.login(&ctx, LoginInput { email, password }).await?;
            serde_json::to_value(resp)?
        }
        Command::VerifyToken { token } => serde_json::to_value(svc.authenticate(&token)?)?,
    };
    Ok(out)
}

fn main() -> ExitCode {
    dotenv().ok();
    let cli = Cli::parse();

    let cfg = match load_config(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            common::utils::logging::init_logging_default();
            error!(service = "auth-cli", event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    common::utils::logging::init_logging(&cfg.logging.format);
    info!(service = "auth-cli", event = "start", users_path = %cfg.storage.users_path, "auth-cli starting");

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "auth-cli", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli, cfg)) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            // User-facing auth errors are printed as-is; anything else stays opaque.
            match e.downcast_ref::<AuthError>() {
                Some(auth) if auth.is_user_facing() => {
                    println!("{}", serde_json::json!({ "error": auth.to_string(), "code": auth.code() }));
                }
                Some(auth) => {
                    error!(service = "auth-cli", event = "request_failed", code = auth.code(), error = ?e, "request failed");
                    println!("{}", serde_json::json!({ "error": "internal error", "code": auth.code() }));
                }
                None => {
                    error!(service = "auth-cli", event = "request_failed", error = %e, "request failed");
                    println!("{}", serde_json::json!({ "error": "internal error" }));
                }
            }
            ExitCode::FAILURE
        }
    }
}
