// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod envelope;
mod error;
mod routes;
mod session;

use axum::Router;
use carhive_api::translate_domain_error;
use carhive_domain::{Tz, parse_timezone, to_market_local};
use carhive_persistence::SqlitePersistence;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::{HttpError, ServerError};
use crate::routes::build_router;

/// Carhive Server - HTTP server for the car rental marketplace
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "CARHIVE_DATABASE")]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, env = "CARHIVE_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, env = "CARHIVE_PORT", default_value_t = 3000)]
    port: u16,

    /// IANA timezone of the marketplace, e.g. `Asia/Kolkata`
    #[arg(short, long, env = "CARHIVE_TIMEZONE", default_value = "UTC")]
    timezone: String,

    /// Lifetime of a login session in hours (1 to 8760)
    #[arg(
        long,
        env = "CARHIVE_SESSION_HOURS",
        default_value_t = 24,
        value_parser = clap::value_parser!(i64).range(1..=8760)
    )]
    session_hours: i64,

    /// Email of the admin to create when none exists yet
    #[arg(long, env = "CARHIVE_ADMIN_EMAIL")]
    admin_email: Option<String>,

    /// Password of the seeded admin
    #[arg(long, env = "CARHIVE_ADMIN_PASSWORD", hide_env_values = true)]
    admin_password: Option<String>,

    /// Display name of the seeded admin
    #[arg(long, env = "CARHIVE_ADMIN_NAME", default_value = "Administrator")]
    admin_name: String,
}

/// Source of the marketplace wall clock.
///
/// Schedules are written in marketplace-local time, so every workflow
/// compares them against the local time of the configured zone.
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    /// The system clock converted into the zone.
    System(Tz),
    /// A frozen local time.
    #[cfg_attr(not(test), allow(dead_code))]
    Fixed(PrimitiveDateTime),
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access.
#[derive(Clone)]
pub struct AppState {
    /// The persistence layer for records, sessions and the audit trail.
    pub persistence: Arc<Mutex<SqlitePersistence>>,
    /// Marketplace clock.
    pub clock: Clock,
    /// Lifetime of newly issued sessions.
    pub session_ttl: Duration,
}

impl AppState {
    /// The current marketplace-local time.
    ///
    /// # Errors
    ///
    /// Returns an error if the instant cannot be represented in the zone.
    pub fn now(&self) -> Result<PrimitiveDateTime, HttpError> {
        match self.clock {
            Clock::System(tz) => to_market_local(OffsetDateTime::now_utc(), tz)
                .map_err(|e| HttpError::from(translate_domain_error(e))),
            Clock::Fixed(now) => Ok(now),
        }
    }
}

/// Creates the configured admin when the store has none.
fn seed_admin(persistence: &mut SqlitePersistence, args: &Args) -> Result<(), ServerError> {
    match (&args.admin_email, &args.admin_password) {
        (Some(email), Some(password)) => {
            match carhive_api::bootstrap_admin(persistence, &args.admin_name, email, password)? {
                Some(user_id) => info!(user_id, email = %email, "Seeded admin account"),
                None => info!("Admin account already present, skipping seed"),
            }
        }
        (Some(_), None) | (None, Some(_)) => {
            warn!("Admin seeding needs both an email and a password, skipping");
        }
        (None, None) => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Carhive Server");

    let tz: Tz = parse_timezone(&args.timezone)?;
    info!(timezone = %tz, "Marketplace timezone");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };
    seed_admin(&mut persistence, &args)?;

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        clock: Clock::System(tz),
        session_ttl: Duration::hours(args.session_hours),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
