//! Delivery identities.
//!
//! An [`IdentityKey`] is the registry partition key: every live connection of
//! one user in one role lives under the same key. It is not a connection id.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HirewireError;

/// Numeric user id as stored by the job-board collaborators.
pub type UserId = i64;

/// Account role. The same numeric id may exist once per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Applicant,
    Employer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Applicant => "applicant",
            Role::Employer => "employer",
        }
    }

    /// The other side of an applicant/employer conversation.
    pub fn counterpart(self) -> Role {
        match self {
            Role::Applicant => Role::Employer,
            Role::Employer => Role::Applicant,
        }
    }

    /// Role of a chat message author, from the stored `from_applicant` flag.
    pub fn of_author(from_applicant: bool) -> Role {
        if from_applicant {
            Role::Applicant
        } else {
            Role::Employer
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = HirewireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "applicant" => Ok(Role::Applicant),
            "employer" => Ok(Role::Employer),
            other => Err(HirewireError::Forbidden(format!("invalid user role: {other}"))),
        }
    }
}

/// `(user_id, role)`: who a connection belongs to, and who an event targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IdentityKey {
    pub user_id: UserId,
    pub role: Role,
}

impl IdentityKey {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn applicant(user_id: UserId) -> Self {
        Self::new(user_id, Role::Applicant)
    }

    pub fn employer(user_id: UserId) -> Self {
        Self::new(user_id, Role::Employer)
    }

    pub fn is_applicant(&self) -> bool {
        self.role == Role::Applicant
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.role, self.user_id)
    }
}
