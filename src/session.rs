//! Local session record
//!
//! Stands in for authentication: a single JSON record written on simulated
//! login, updated on plan selection and deleted on logout. Nothing here talks
//! to a server, and the record must never be mistaken for real credentials.
//!
//! Storage goes through the [`SessionStore`] trait so controllers receive an
//! explicit [`SessionContext`] instead of reaching for ambient state.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use thiserror::Error;
use tracing::{info, warn};

/// File name of the persisted record
pub const SESSION_FILE: &str = "binj_user.json";

/// Plans offered on the subscription screen
pub const PLANS: [&str; 3] = ["basic", "standard", "premium"];

/// Plan shown when the record has none
const DEFAULT_PLAN_LABEL: &str = "Standard";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt session record: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Record
// =============================================================================

/// `{email, loggedIn, loginTime, subscription?, subscriptionDate?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub logged_in: bool,
    #[serde(with = "chrono::serde::ts_milliseconds", default = "Utc::now")]
    pub login_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub subscription_date: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// Fresh record for a successful login
    pub fn logged_in(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            logged_in: true,
            login_time: Utc::now(),
            subscription: None,
            subscription_date: None,
        }
    }

    /// Avatar letter: upper-cased first character of the email
    pub fn initial(&self) -> Option<char> {
        self.email.chars().next().and_then(|c| c.to_uppercase().next())
    }

    pub fn display_email(&self) -> &str {
        if self.email.is_empty() {
            "Utilisateur"
        } else {
            &self.email
        }
    }

    /// "Plan premium", or "Plan Standard" when none was chosen
    pub fn plan_label(&self) -> String {
        format!(
            "Plan {}",
            self.subscription.as_deref().unwrap_or(DEFAULT_PLAN_LABEL)
        )
    }
}

// =============================================================================
// Storage
// =============================================================================

/// Load/save/clear operations for the session record
pub trait SessionStore: Send + Sync + fmt::Debug {
    fn load(&self) -> Result<Option<SessionRecord>, SessionError>;
    fn save(&self, record: &SessionRecord) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// Record persisted as a JSON file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionRecord>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, record: &SessionRecord) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string(record)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Record held in memory (tests, throwaway sessions)
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    record: Mutex<Option<SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: SessionRecord) -> Self {
        Self {
            record: Mutex::new(Some(record)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionRecord>, SessionError> {
        Ok(self
            .record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, record: &SessionRecord) -> Result<(), SessionError> {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = Some(record.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

// =============================================================================
// Login Validation
// =============================================================================

/// Field-level messages from the login form. Not an error: the form shows
/// them inline and stays put.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginValidation {
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
}

impl LoginValidation {
    pub fn check(email: &str, password: &str) -> Self {
        Self {
            email: validate_email(email),
            password: validate_password(password),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }

    /// Every field message on one line
    pub fn summary(&self) -> String {
        [self.email, self.password]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

fn looks_like_email(email: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(email))
}

/// Message for an invalid email, `None` when it is acceptable
pub fn validate_email(email: &str) -> Option<&'static str> {
    let email = email.trim();
    if email.is_empty() {
        Some("L'adresse e-mail est requise")
    } else if !looks_like_email(email) {
        Some("Veuillez entrer une adresse e-mail valide")
    } else {
        None
    }
}

/// Message for an invalid password, `None` when it is acceptable
pub fn validate_password(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        Some("Le mot de passe est requis")
    } else if password.chars().count() < 6 {
        Some("Le mot de passe doit contenir au moins 6 caractères")
    } else {
        None
    }
}

/// Why a login attempt did not produce a session
#[derive(Error, Debug)]
pub enum LoginFailure {
    #[error("Formulaire invalide")]
    Invalid(LoginValidation),

    /// The record could not be written
    #[error("Erreur de connexion. Vérifiez vos identifiants.")]
    Storage(#[from] SessionError),
}

// =============================================================================
// Page Guard
// =============================================================================

/// Pages that require a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatedPage {
    Home,
    Search,
    Details,
}

/// Outcome of checking a page against the session
#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    Granted(SessionRecord),
    /// No logged-in session: back to the entry page
    RedirectToLogin,
    /// Logged in but no plan chosen yet
    RedirectToSubscription,
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted(_))
    }
}

// =============================================================================
// Context
// =============================================================================

/// Session handle passed to every controller
#[derive(Debug, Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Context over a JSON file
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileSessionStore::new(path)))
    }

    /// Context over an in-memory record
    pub fn memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    /// Current record. Unreadable or corrupt storage counts as "no session".
    pub fn current(&self) -> Option<SessionRecord> {
        match self.store.load() {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable session record");
                None
            }
        }
    }

    /// Check access to a gated page before anything renders
    pub fn guard(&self, page: GatedPage) -> Access {
        let Some(record) = self.current().filter(|r| r.logged_in) else {
            info!(?page, "no session, redirecting to login");
            return Access::RedirectToLogin;
        };

        if record.subscription.is_none() {
            info!(?page, "no plan selected, redirecting to subscription");
            return Access::RedirectToSubscription;
        }

        Access::Granted(record)
    }

    /// Simulated login: any well-formed email with a password of at least six
    /// characters succeeds. No credential is checked.
    pub fn login(&self, email: &str, password: &str) -> Result<SessionRecord, LoginFailure> {
        let validation = LoginValidation::check(email, password);
        if !validation.is_valid() {
            return Err(LoginFailure::Invalid(validation));
        }

        let record = SessionRecord::logged_in(email.trim());
        self.store.save(&record)?;
        info!(email = %record.email, "simulated login");
        Ok(record)
    }

    /// Record the chosen plan on the current session (creating a bare record
    /// if there is none)
    pub fn subscribe(&self, plan: &str) -> Result<SessionRecord, SessionError> {
        let mut record = self.current().unwrap_or_else(|| SessionRecord {
            email: String::new(),
            logged_in: false,
            login_time: Utc::now(),
            subscription: None,
            subscription_date: None,
        });

        record.subscription = Some(plan.to_string());
        record.subscription_date = Some(Utc::now());
        self.store.save(&record)?;
        info!(plan, "plan selected");
        Ok(record)
    }

    /// Destroy the session record
    pub fn logout(&self) -> Result<(), SessionError> {
        self.store.clear()?;
        info!("logged out");
        Ok(())
    }
}
