// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the carhive rental marketplace.
//!
//! This crate stores identities, sessions, the workflow records (cars,
//! rides, pause requests, KYC records, listings), ratings and the audit
//! trail in `SQLite` through Diesel.
//!
//! ## Guarantees
//!
//! - Migrations are embedded and applied on open.
//! - Foreign key enforcement is switched on and verified at startup.
//! - A workflow record and its audit event are written in one transaction.
//! - Each in-memory database is unique, so tests never share state.
//!
//! File databases run in WAL mode.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use carhive::TransitionResult;
use carhive_audit::{AuditEvent, EntityKind};
use carhive_domain::{
    Car, CarListing, KycKind, KycRecord, KycStatus, PauseRequest, Rating, Ride, Role, Schedule,
    User,
};
use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{CarFilter, ListingFilter, PauseFilter, RideFilter, SessionData, UserData};
pub use error::PersistenceError;

static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Type alias kept for callers that name the backend explicitly.
pub type SqlitePersistence = Persistence;

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared-cache database via an atomic
    /// counter, so tests are isolated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String =
            format!("file:memdb_carhive_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Identities & Sessions
    // ========================================================================

    /// Creates an identity with a bcrypt-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if the email is taken.
    pub fn create_user(&mut self, user: &User, password: &str) -> Result<i64, PersistenceError> {
        mutations::users::create_user(&mut self.conn, user, password)
    }

    /// Retrieves an identity by email (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_email(&mut self, email: &str) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_email(&mut self.conn, email)
    }

    /// Retrieves an identity by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_id(&mut self, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_id(&mut self.conn, user_id)
    }

    /// Lists identities, optionally of one role.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_users(&mut self, role: Option<Role>) -> Result<Vec<UserData>, PersistenceError> {
        queries::users::list_users(&mut self.conn, role)
    }

    /// Counts identities holding a role.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_users_with_role(&mut self, role: Role) -> Result<i64, PersistenceError> {
        queries::users::count_users_with_role(&mut self.conn, role)
    }

    /// Checks a password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the hash is malformed.
    pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
        queries::users::verify_password(password, password_hash)
    }

    /// Creates a new session.
    ///
    /// # Arguments
    ///
    /// * `session_token` - The unique session token
    /// * `user_id` - The user ID
    /// * `expires_at` - The expiration timestamp (ISO 8601 format)
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created.
    pub fn create_session(
        &mut self,
        session_token: &str,
        user_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::users::create_session(&mut self.conn, session_token, user_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::users::get_session_by_token(&mut self.conn, session_token)
    }

    /// Updates the last activity timestamp for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::users::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::users::delete_session(&mut self.conn, session_token)
    }

    // ========================================================================
    // Cars
    // ========================================================================

    /// Persists a car transition and its audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn persist_car_transition(
        &mut self,
        result: &TransitionResult<Car>,
    ) -> Result<i64, PersistenceError> {
        mutations::cars::persist_car_transition(&mut self.conn, result)
    }

    /// Retrieves a car by ID, including deleted cars.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_car(&mut self, car_id: i64) -> Result<Option<Car>, PersistenceError> {
        queries::cars::get_car(&mut self.conn, car_id)
    }

    /// Lists cars matching stored-column filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_cars(&mut self, filter: &CarFilter) -> Result<Vec<Car>, PersistenceError> {
        queries::cars::list_cars(&mut self.conn, filter)
    }

    /// Returns whether another car already uses the registration number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn registration_number_taken(
        &mut self,
        registration_number: &str,
        excluding_car_id: Option<i64>,
    ) -> Result<bool, PersistenceError> {
        queries::cars::registration_number_taken(
            &mut self.conn,
            registration_number,
            excluding_car_id,
        )
    }

    /// Approved ride windows and approved pause windows of a car.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_blocking_windows(
        &mut self,
        car_id: i64,
    ) -> Result<(Vec<Schedule>, Vec<Schedule>), PersistenceError> {
        queries::cars::get_blocking_windows(&mut self.conn, car_id)
    }

    // ========================================================================
    // Rides
    // ========================================================================

    /// Persists a ride transition and its audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn persist_ride_transition(
        &mut self,
        result: &TransitionResult<Ride>,
    ) -> Result<i64, PersistenceError> {
        mutations::rides::persist_ride_transition(&mut self.conn, result)
    }

    /// Retrieves a ride by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_ride(&mut self, ride_id: i64) -> Result<Option<Ride>, PersistenceError> {
        queries::rides::get_ride(&mut self.conn, ride_id)
    }

    /// Lists rides matching stored-column filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_rides(&mut self, filter: &RideFilter) -> Result<Vec<Ride>, PersistenceError> {
        queries::rides::list_rides(&mut self.conn, filter)
    }

    // ========================================================================
    // Pause requests
    // ========================================================================

    /// Persists a pause transition and its audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn persist_pause_transition(
        &mut self,
        result: &TransitionResult<PauseRequest>,
    ) -> Result<i64, PersistenceError> {
        mutations::pauses::persist_pause_transition(&mut self.conn, result)
    }

    /// Retrieves a pause request by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_pause(&mut self, pause_id: i64) -> Result<Option<PauseRequest>, PersistenceError> {
        queries::pauses::get_pause(&mut self.conn, pause_id)
    }

    /// Lists pause requests matching stored-column filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_pauses(
        &mut self,
        filter: &PauseFilter,
    ) -> Result<Vec<PauseRequest>, PersistenceError> {
        queries::pauses::list_pauses(&mut self.conn, filter)
    }

    // ========================================================================
    // KYC
    // ========================================================================

    /// Persists a KYC transition and its audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn persist_kyc_transition(
        &mut self,
        result: &TransitionResult<KycRecord>,
    ) -> Result<i64, PersistenceError> {
        mutations::kyc::persist_kyc_transition(&mut self.conn, result)
    }

    /// Retrieves an identity's record in one ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_kyc_for_user(
        &mut self,
        user_id: i64,
        kind: KycKind,
    ) -> Result<Option<KycRecord>, PersistenceError> {
        queries::kyc::get_kyc_for_user(&mut self.conn, user_id, kind)
    }

    /// Retrieves a record by ID within one ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_kyc(
        &mut self,
        kyc_id: i64,
        kind: KycKind,
    ) -> Result<Option<KycRecord>, PersistenceError> {
        queries::kyc::get_kyc(&mut self.conn, kyc_id, kind)
    }

    /// Lists one ledger, optionally by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_kyc(
        &mut self,
        kind: KycKind,
        status: Option<KycStatus>,
    ) -> Result<Vec<KycRecord>, PersistenceError> {
        queries::kyc::list_kyc(&mut self.conn, kind, status)
    }

    /// Whether the rider may book.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn is_rider_kyc_approved(&mut self, user_id: i64) -> Result<bool, PersistenceError> {
        queries::kyc::is_rider_kyc_approved(&mut self.conn, user_id)
    }

    /// Hard-deletes a KYC record together with an audit event.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the record does not exist.
    pub fn delete_kyc(&mut self, kyc_id: i64, event: &AuditEvent) -> Result<(), PersistenceError> {
        mutations::kyc::delete_kyc(&mut self.conn, kyc_id, event)
    }

    // ========================================================================
    // Listings
    // ========================================================================

    /// Persists a listing transition and its audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn persist_listing_transition(
        &mut self,
        result: &TransitionResult<CarListing>,
    ) -> Result<i64, PersistenceError> {
        mutations::listings::persist_listing_transition(&mut self.conn, result)
    }

    /// Retrieves a listing by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_listing(&mut self, listing_id: i64) -> Result<Option<CarListing>, PersistenceError> {
        queries::listings::get_listing(&mut self.conn, listing_id)
    }

    /// Lists listings matching stored-column filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_listings(
        &mut self,
        filter: &ListingFilter,
    ) -> Result<Vec<CarListing>, PersistenceError> {
        queries::listings::list_listings(&mut self.conn, filter)
    }

    // ========================================================================
    // Ratings
    // ========================================================================

    /// Stores a rating.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_rating(&mut self, rating: &Rating) -> Result<i64, PersistenceError> {
        mutations::ratings::create_rating(&mut self.conn, rating)
    }

    /// Retrieves a rating by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_rating(&mut self, rating_id: i64) -> Result<Option<Rating>, PersistenceError> {
        queries::ratings::get_rating(&mut self.conn, rating_id)
    }

    /// Lists ratings about a car and/or rider.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_ratings(
        &mut self,
        car_id: Option<i64>,
        rider_id: Option<i64>,
    ) -> Result<Vec<Rating>, PersistenceError> {
        queries::ratings::list_ratings(&mut self.conn, car_id, rider_id)
    }

    /// All scores given to a car.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn car_rates(&mut self, car_id: i64) -> Result<Vec<u8>, PersistenceError> {
        queries::ratings::car_rates(&mut self.conn, car_id)
    }

    /// Deletes a rating.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no rating has the ID.
    pub fn delete_rating(&mut self, rating_id: i64) -> Result<(), PersistenceError> {
        mutations::ratings::delete_rating(&mut self.conn, rating_id)
    }

    // ========================================================================
    // Audit
    // ========================================================================

    /// Persists a standalone audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        mutations::audit::persist_audit_event(&mut self.conn, event)
    }

    /// Retrieves an audit event by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no event has the ID.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::audit::get_audit_event(&mut self.conn, event_id)
    }

    /// Lists the events recorded against one entity, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_audit_events(
        &mut self,
        kind: EntityKind,
        entity_id: i64,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::list_audit_events(&mut self.conn, kind, entity_id)
    }
}
