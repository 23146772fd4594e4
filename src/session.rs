//! Session provider
//!
//! Mock authentication: any non-empty email and password log in. The current
//! user is kept as a single JSON record on disk, which is the only state that
//! outlives a process.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{GapsenseError, Result};
use crate::store::ANONYMOUS_USER;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Admin,
    Mentor,
}

impl Role {
    /// Role implied by an email address when none is chosen explicitly
    pub fn infer_from_email(email: &str) -> Self {
        let email = email.to_lowercase();
        if email.contains("admin") {
            Role::Admin
        } else if email.contains("mentor") {
            Role::Mentor
        } else {
            Role::Student
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Admin => write!(f, "admin"),
            Role::Mentor => write!(f, "mentor"),
        }
    }
}

impl FromStr for Role {
    type Err = GapsenseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            "mentor" => Ok(Role::Mentor),
            _ => Err(GapsenseError::UnknownRole(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Id recorded on a new struggle: the user's id, or the anonymous sentinel
pub fn author_id(user: Option<&User>) -> String {
    user.map(|u| u.id.clone())
        .unwrap_or_else(|| ANONYMOUS_USER.to_string())
}

/// File-backed holder of the current user
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Session file from config, defaulting to the data directory
    pub fn open(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::at(config.session_path()?))
    }

    /// Log in with any non-empty credentials. The id is derived from the
    /// email so repeated logins map to the same user.
    pub fn login(&self, email: &str, password: &str, role: Option<Role>) -> Result<User> {
        require(email, "email")?;
        require(password, "password")?;

        let user = User {
            id: stable_user_id(email),
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            role: role.unwrap_or_else(|| Role::infer_from_email(email)),
        };

        self.persist(&user)?;
        info!("Logged in {} as {}", user.email, user.role);
        Ok(user)
    }

    pub fn signup(&self, name: &str, email: &str, password: &str, role: Role) -> Result<User> {
        require(name, "name")?;
        require(email, "email")?;
        require(password, "password")?;

        let user = User {
            id: format!("user_{}", Uuid::new_v4().simple()),
            name: name.to_string(),
            email: email.to_string(),
            role,
        };

        self.persist(&user)?;
        info!("Signed up {} as {}", user.email, user.role);
        Ok(user)
    }

    /// Forget the current user. Safe to call when nobody is logged in.
    pub fn logout(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Logged out");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(GapsenseError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub fn current_user(&self) -> Result<Option<User>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(GapsenseError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let user = serde_json::from_str(&contents).map_err(|source| GapsenseError::Session {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(user))
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.current_user(), Ok(Some(_)))
    }

    fn persist(&self, user: &User) -> Result<()> {
        let io_err = |source| GapsenseError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(user).map_err(|source| GapsenseError::Session {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(io_err)?;

        debug!("Session written to {}", self.path.display());
        Ok(())
    }
}

fn require(value: &str, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        Err(GapsenseError::MissingCredentials(field))
    } else {
        Ok(())
    }
}

fn stable_user_id(email: &str) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    format!("user_{}", &hex::encode(digest)[..12])
}
