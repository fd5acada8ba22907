//! End-to-end login scenarios for the Swag Labs app.
//!
//! Each [`Scenario`] drives the page objects of a fresh [`App`] and then
//! asserts on what the screen shows. A scenario passes when
//! [`Scenario::run`] returns `Ok(())`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, info_span, Instrument};

use crate::app::App;
use crate::config::Credentials;
use crate::data::{AcceptedUsername, Password};
use crate::engine::EngineError;
use crate::gesture::Direction;
use crate::pages::{AuthElement, LOCKED_OUT_MESSAGE};

pub const PASSWORD_REQUIRED_MESSAGE: &str = "Password is required";
pub const USERNAME_REQUIRED_MESSAGE: &str = "Username is required";
pub const CREDENTIALS_MISMATCH_MESSAGE: &str =
    "Username and password do not match any user in this service.";

/// Scenario category used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Positive,
    Negative,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Positive => "positive",
            Tag::Negative => "negative",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positive" => Ok(Tag::Positive),
            "negative" => Ok(Tag::Negative),
            _ => Err(format!("Invalid tag '{}'. Use: positive, negative", s)),
        }
    }
}

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("assertion failed: {message}")]
    Assertion { message: String },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<(), ScenarioError> {
    if condition {
        Ok(())
    } else {
        Err(ScenarioError::Assertion { message: message() })
    }
}

fn ensure_eq<T: PartialEq + fmt::Debug>(
    what: &str,
    expected: T,
    actual: T,
) -> Result<(), ScenarioError> {
    ensure(expected == actual, || {
        format!("{}: expected {:?}, got {:?}", what, expected, actual)
    })
}

/// The login scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenario {
    StandardUserLogin,
    ProblemUserLogin,
    LockedOutUserLogin,
    EmptyPassword,
    EmptyUsername,
    WrongPassword,
    Autofill(AcceptedUsername),
}

impl Scenario {
    pub const ALL: [Scenario; 9] = [
        Scenario::StandardUserLogin,
        Scenario::ProblemUserLogin,
        Scenario::LockedOutUserLogin,
        Scenario::EmptyPassword,
        Scenario::EmptyUsername,
        Scenario::WrongPassword,
        Scenario::Autofill(AcceptedUsername::Standard),
        Scenario::Autofill(AcceptedUsername::LockedOut),
        Scenario::Autofill(AcceptedUsername::Problem),
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::StandardUserLogin => "can_authenticate_with_standard_user_and_valid_password",
            Scenario::ProblemUserLogin => "can_authenticate_with_problem_user_and_valid_password",
            Scenario::LockedOutUserLogin => {
                "cant_authenticate_with_locked_out_user_and_valid_password"
            }
            Scenario::EmptyPassword => "cant_authenticate_with_empty_password",
            Scenario::EmptyUsername => "cant_authenticate_with_empty_username",
            Scenario::WrongPassword => "cant_authenticate_with_wrong_password",
            Scenario::Autofill(AcceptedUsername::Standard) => {
                "credentials_are_filled_by_standard_user_autofill"
            }
            Scenario::Autofill(AcceptedUsername::LockedOut) => {
                "credentials_are_filled_by_locked_out_user_autofill"
            }
            Scenario::Autofill(AcceptedUsername::Problem) => {
                "credentials_are_filled_by_problem_user_autofill"
            }
        }
    }

    pub fn tag(&self) -> Tag {
        match self {
            Scenario::StandardUserLogin | Scenario::ProblemUserLogin | Scenario::Autofill(_) => {
                Tag::Positive
            }
            Scenario::LockedOutUserLogin
            | Scenario::EmptyPassword
            | Scenario::EmptyUsername
            | Scenario::WrongPassword => Tag::Negative,
        }
    }

    pub fn from_name(name: &str) -> Option<Scenario> {
        Scenario::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Run the scenario against `app`.
    pub async fn run(&self, app: &App, credentials: &Credentials) -> Result<(), ScenarioError> {
        let span = info_span!("scenario", name = self.name(), tag = %self.tag());
        async {
            match self {
                Scenario::StandardUserLogin => {
                    login_lands_on_products(app, &credentials.standard_user, &credentials.password)
                        .await
                }
                Scenario::ProblemUserLogin => {
                    login_lands_on_products(app, &credentials.problem_user, &credentials.password)
                        .await
                }
                Scenario::LockedOutUserLogin => {
                    let page = app.authentication_page();
                    page.authenticate(&credentials.locked_out_user, &credentials.password)
                        .await?;
                    ensure(page.is_locked_out_error_displayed().await?, || {
                        "locked-out error message is not displayed".to_string()
                    })?;
                    ensure_eq(
                        "locked-out error text",
                        LOCKED_OUT_MESSAGE.to_string(),
                        page.locked_out_error_text().await?,
                    )
                }
                Scenario::EmptyPassword => {
                    login_shows_error(app, &credentials.standard_user, "", PASSWORD_REQUIRED_MESSAGE)
                        .await
                }
                Scenario::EmptyUsername => {
                    login_shows_error(app, "", &credentials.password, USERNAME_REQUIRED_MESSAGE)
                        .await
                }
                Scenario::WrongPassword => {
                    let wrong = format!("{}_wrong", credentials.password);
                    login_shows_error(
                        app,
                        &credentials.standard_user,
                        &wrong,
                        CREDENTIALS_MISMATCH_MESSAGE,
                    )
                    .await
                }
                Scenario::Autofill(user) => autofill_fills_credentials(app, *user).await,
            }?;
            info!("scenario passed");
            Ok(())
        }
        .instrument(span)
        .await
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

async fn login_lands_on_products(
    app: &App,
    username: &str,
    password: &str,
) -> Result<(), ScenarioError> {
    app.authentication_page()
        .authenticate(username, password)
        .await?;
    ensure(app.products_page().is_title_displayed().await?, || {
        format!("products page is not displayed after logging in as '{}'", username)
    })
}

async fn login_shows_error(
    app: &App,
    username: &str,
    password: &str,
    expected: &str,
) -> Result<(), ScenarioError> {
    let page = app.authentication_page();
    page.authenticate(username, password).await?;
    ensure_eq(
        "error message",
        expected.to_string(),
        page.error_message_text().await?,
    )
}

async fn autofill_fills_credentials(
    app: &App,
    user: AcceptedUsername,
) -> Result<(), ScenarioError> {
    let page = app.authentication_page();
    page.swipe_to(AuthElement::autofill_for(user), Direction::Down)
        .await?;
    page.click_autofill(user).await?;
    page.swipe_to(AuthElement::UsernameField, Direction::Up)
        .await?;

    ensure_eq(
        "username field",
        user.username().to_string(),
        page.username_field_text().await?,
    )?;
    ensure_eq(
        "password field length",
        Password::SecretSauce.password().chars().count(),
        page.password_field_text().await?.chars().count(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique_and_resolvable() {
        for scenario in Scenario::ALL {
            assert_eq!(Scenario::from_name(scenario.name()), Some(scenario));
        }
        let mut names: Vec<_> = Scenario::ALL.iter().map(|s| s.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Scenario::ALL.len());
        assert_eq!(Scenario::from_name("no_such_scenario"), None);
    }

    #[test]
    fn tags_split_positive_and_negative() {
        let negative: Vec<_> = Scenario::ALL
            .iter()
            .filter(|s| s.tag() == Tag::Negative)
            .collect();
        assert_eq!(negative.len(), 4);
        assert_eq!(Scenario::Autofill(AcceptedUsername::LockedOut).tag(), Tag::Positive);
    }

    #[test]
    fn tag_parses_case_insensitively() {
        assert_eq!("Positive".parse::<Tag>(), Ok(Tag::Positive));
        assert_eq!("NEGATIVE".parse::<Tag>(), Ok(Tag::Negative));
        assert!("smoke".parse::<Tag>().is_err());
    }

    #[test]
    fn assertion_error_message() {
        let err = ensure_eq("username field", "a", "b").unwrap_err();
        assert_eq!(
            err.to_string(),
            "assertion failed: username field: expected \"a\", got \"b\""
        );
    }
}
