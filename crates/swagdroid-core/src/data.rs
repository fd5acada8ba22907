//! Known Swag Labs test accounts.
//!
//! These are the values the login screen's autofill buttons fill in, used as
//! expectations by the autofill scenarios.

use serde::{Deserialize, Serialize};

/// Usernames the sample app accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AcceptedUsername {
    Standard,
    LockedOut,
    Problem,
}

impl AcceptedUsername {
    pub const ALL: [AcceptedUsername; 3] = [
        AcceptedUsername::Standard,
        AcceptedUsername::LockedOut,
        AcceptedUsername::Problem,
    ];

    pub fn username(&self) -> &'static str {
        match self {
            AcceptedUsername::Standard => "standard_user",
            AcceptedUsername::LockedOut => "locked_out_user",
            AcceptedUsername::Problem => "problem_user",
        }
    }
}

/// The shared password of every sample account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Password {
    SecretSauce,
}

impl Password {
    pub fn password(&self) -> &'static str {
        match self {
            Password::SecretSauce => "secret_sauce",
        }
    }
}
