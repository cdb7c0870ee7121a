use std::path::PathBuf;

// Error tracing
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use portal::auth::token;
use portal::guard::{DEFAULT_LANDING, LoginRedirect};
use portal::{GuardDecision, PortalContext};
use shared::config::load_config_or_default;
use shared::types::{LoginData, RegistrationData, ResetPasswordData, Role, VerifyOtpData};

#[derive(Parser, Debug)]
#[command(name = "portal", version, about = "Mentorship portal session client")]
struct Cli {
    /// Client configuration (TOML). Defaults apply when the file is absent.
    #[arg(short, long, env = "PORTAL_CONFIG", default_value = "portal.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the restored session, if any
    Status,
    /// Sign in and persist the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "PORTAL_PASSWORD", hide_env_values = true)]
        password: String,
        /// Login location that sent us here, e.g. "/login?returnUrl=%2Fdoubts"
        #[arg(long)]
        from: Option<String>,
    },
    /// Create an account (may require `verify-otp` afterwards)
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "PORTAL_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value = "student")]
        role: Role,
    },
    /// Confirm the emailed one-time password and sign in
    VerifyOtp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        otp: String,
    },
    /// Request a password-reset email
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Set a new password with the emailed reset token
    ResetPassword {
        #[arg(long)]
        token: String,
        #[arg(long, env = "PORTAL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the persisted session
    Logout,
    /// Run the route guard for a destination
    Check { path: String },
    /// List navigation entries for the current role
    Menu,
    /// Stay on a destination until the session ends (Ctrl-C to stop)
    Watch {
        #[arg(default_value = DEFAULT_LANDING)]
        path: String,
    },
}

fn init_tracing(level: &str) {
    // RUST_LOG takes priority over the configured level, e.g.
    //   RUST_LOG=portal::session=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config_or_default(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    init_tracing(&config.logging.level);

    let ctx = PortalContext::from_config(&config);
    info!("Portal client ready ({})", config.api.resolved_base_url());

    match cli.command {
        Command::Status => print_status(&ctx),

        Command::Login {
            email,
            password,
            from,
        } => {
            let redirect = from.as_deref().and_then(LoginRedirect::parse);
            if redirect.as_ref().is_some_and(|r| r.expired) {
                println!("Your session expired. Please sign in again.");
            }

            let session = ctx
                .api
                .login(&LoginData { email, password })
                .await
                .context("Login failed")?;
            println!("Signed in: {}", session);

            let target = redirect
                .as_ref()
                .map(|r| r.resume_target())
                .unwrap_or(DEFAULT_LANDING);
            println!("Continue to {}", target);
        }

        Command::Register {
            name,
            email,
            password,
            role,
        } => {
            let data = RegistrationData {
                name,
                email,
                password,
                role,
            };
            match ctx.api.register(&data).await.context("Registration failed")? {
                Some(session) => println!("Registered and signed in: {}", session),
                None => println!("Registered. Check your email for the verification code."),
            }
        }

        Command::VerifyOtp { email, otp } => {
            let session = ctx
                .api
                .verify_otp(&VerifyOtpData { email, otp })
                .await
                .context("Verification failed")?;
            println!("Verified and signed in: {}", session);
        }

        Command::ForgotPassword { email } => {
            let ack = ctx
                .api
                .forgot_password(&email)
                .await
                .context("Password reset request failed")?;
            println!("{}", ack.message);
        }

        Command::ResetPassword { token, password } => {
            let ack = ctx
                .api
                .reset_password(&ResetPasswordData { token, password })
                .await
                .context("Password reset failed")?;
            println!("{}", ack.message);
        }

        Command::Logout => {
            ctx.store.logout();
            println!("Signed out");
        }

        Command::Check { path } => match ctx.guard.check(&path) {
            GuardDecision::Allow => println!("allow {}", path),
            GuardDecision::Redirect(r) => println!("redirect {}", r),
        },

        Command::Menu => {
            let nav = ctx.navigation();
            match nav.variant {
                Some(variant) => println!("Dashboard: {:?}", variant),
                None => println!("Signed out"),
            }
            for entry in &nav.entries {
                println!("  {}", entry);
            }
        }

        Command::Watch { path } => {
            if let GuardDecision::Redirect(r) = ctx.guard.check(&path) {
                println!("redirect {}", r);
                return Ok(());
            }
            println!(
                "Watching {} (checking every {:?})",
                path,
                ctx.store.policy().interval
            );

            tokio::select! {
                redirect = ctx.guard.wait_for_redirect(&path) => {
                    println!("redirect {}", redirect);
                }
                res = tokio::signal::ctrl_c() => {
                    res.context("Failed to listen for Ctrl-C")?;
                    info!("Interrupted");
                }
            }
        }
    }

    Ok(())
}

fn print_status(ctx: &PortalContext) {
    let Some(session) = ctx.store.current() else {
        println!("Signed out");
        return;
    };

    println!("Signed in: {}", session);
    match token::remaining(&session.token, ctx.store.now_millis()) {
        Some(left) => println!("Token expires in {}s", left.as_secs()),
        None => println!("Token expired"),
    }
}
