use std::time::Duration;

use serde::Deserialize;
use hirewire_core::error::{HirewireError, Result};
use hirewire_core::identity::{Role, UserId};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub limits: Limits,

    /// Seed data for the in-memory collaborators (local runs, tests).
    #[serde(default)]
    pub dev: DevSeed,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(HirewireError::UnsupportedVersion);
        }

        self.gateway.validate()?;
        self.limits.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,

    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,

    #[serde(default = "default_pong_wait_ms")]
    pub pong_wait_ms: u64,

    #[serde(default = "default_write_timeout_ms")]
    pub write_timeout_ms: u64,

    #[serde(default = "default_outbox_capacity")]
    pub outbox_capacity: usize,

    #[serde(default = "default_hub_capacity")]
    pub hub_capacity: usize,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            session_cookie: default_session_cookie(),
            ping_interval_ms: default_ping_interval_ms(),
            pong_wait_ms: default_pong_wait_ms(),
            write_timeout_ms: default_write_timeout_ms(),
            outbox_capacity: default_outbox_capacity(),
            hub_capacity: default_hub_capacity(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        if self.session_cookie.trim().is_empty() {
            return Err(HirewireError::BadRequest(
                "gateway.session_cookie must not be empty".into(),
            ));
        }
        if !(1000..=120000).contains(&self.ping_interval_ms) {
            return Err(HirewireError::BadRequest(
                "gateway.ping_interval_ms must be between 1000 and 120000".into(),
            ));
        }
        if !(2000..=600000).contains(&self.pong_wait_ms) {
            return Err(HirewireError::BadRequest(
                "gateway.pong_wait_ms must be between 2000 and 600000".into(),
            ));
        }
        // at least one ping must fit inside every read deadline window
        if self.pong_wait_ms <= self.ping_interval_ms {
            return Err(HirewireError::BadRequest(
                "gateway.pong_wait_ms must be greater than ping_interval_ms".into(),
            ));
        }
        if !(100..=60000).contains(&self.write_timeout_ms) {
            return Err(HirewireError::BadRequest(
                "gateway.write_timeout_ms must be between 100 and 60000".into(),
            ));
        }
        if !(1..=65536).contains(&self.outbox_capacity) {
            return Err(HirewireError::BadRequest(
                "gateway.outbox_capacity must be between 1 and 65536".into(),
            ));
        }
        if !(1..=65536).contains(&self.hub_capacity) {
            return Err(HirewireError::BadRequest(
                "gateway.hub_capacity must be between 1 and 65536".into(),
            ));
        }
        Ok(())
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_millis(self.ping_interval_ms)
    }

    pub fn pong_wait(&self) -> Duration {
        Duration::from_millis(self.pong_wait_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_session_cookie() -> String {
    "session_id".into()
}
fn default_ping_interval_ms() -> u64 {
    54000
}
fn default_pong_wait_ms() -> u64 {
    60000
}
fn default_write_timeout_ms() -> u64 {
    10000
}
fn default_outbox_capacity() -> usize {
    256
}
fn default_hub_capacity() -> usize {
    1024
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Limits {
    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,

    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_frame_bytes: default_max_frame_bytes(),
            max_message_chars: default_max_message_chars(),
        }
    }
}

impl Limits {
    pub fn validate(&self) -> Result<()> {
        if self.max_frame_bytes < 64 {
            return Err(HirewireError::BadRequest(
                "limits.max_frame_bytes must be at least 64".into(),
            ));
        }
        if self.max_message_chars == 0 {
            return Err(HirewireError::BadRequest(
                "limits.max_message_chars must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn default_max_frame_bytes() -> usize {
    4096
}
fn default_max_message_chars() -> usize {
    2000
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DevSeed {
    #[serde(default)]
    pub sessions: Vec<SeedSession>,
    #[serde(default)]
    pub chats: Vec<SeedChat>,
    #[serde(default)]
    pub profiles: Vec<SeedProfile>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedSession {
    pub token: String,
    pub user_id: UserId,
    /// Kept as a raw string: an unknown role must surface at connect time (403).
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedChat {
    pub id: i64,
    #[serde(default)]
    pub vacancy_id: i64,
    pub applicant_id: UserId,
    pub employer_id: UserId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedProfile {
    pub user_id: UserId,
    pub role: Role,
    pub avatar: String,
}
