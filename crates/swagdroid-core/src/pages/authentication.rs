use std::sync::Arc;

use crate::data::AcceptedUsername;
use crate::engine::{ActionEngine, EngineError, QueryOutcome};
use crate::gesture::Direction;
use crate::locator::{Locator, LocatorRegistry};
use crate::swipe::SwipeOutcome;

/// Text shown when a locked-out user tries to log in.
pub const LOCKED_OUT_MESSAGE: &str = "Sorry, this user has been locked out.";

/// Elements of the login screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthElement {
    UsernameField,
    PasswordField,
    LoginButton,
    LockedOutErrorMessage,
    ErrorMessage,
    StandardUserAutofill,
    LockedOutUserAutofill,
    ProblemUserAutofill,
}

impl AuthElement {
    pub fn name(&self) -> &'static str {
        match self {
            AuthElement::UsernameField => "username_field",
            AuthElement::PasswordField => "password_field",
            AuthElement::LoginButton => "login_button",
            AuthElement::LockedOutErrorMessage => "locked_out_error_message",
            AuthElement::ErrorMessage => "error_message",
            AuthElement::StandardUserAutofill => "standard_user_autofill",
            AuthElement::LockedOutUserAutofill => "locked_out_user_autofill",
            AuthElement::ProblemUserAutofill => "problem_user_autofill",
        }
    }

    /// The autofill button that fills in `user`.
    pub fn autofill_for(user: AcceptedUsername) -> Self {
        match user {
            AcceptedUsername::Standard => AuthElement::StandardUserAutofill,
            AcceptedUsername::LockedOut => AuthElement::LockedOutUserAutofill,
            AcceptedUsername::Problem => AuthElement::ProblemUserAutofill,
        }
    }
}

/// The login screen: credential form, validation messages and the
/// "accepted usernames" autofill list below the form.
pub struct AuthenticationPage {
    engine: Arc<ActionEngine>,
    locators: LocatorRegistry,
}

impl AuthenticationPage {
    pub fn new(engine: Arc<ActionEngine>) -> Self {
        let locators = LocatorRegistry::builder(engine.driver().clone())
            .cached(AuthElement::UsernameField.name(), Locator::accessibility_id("test-Username"))
            .cached(AuthElement::PasswordField.name(), Locator::accessibility_id("test-Password"))
            .cached(AuthElement::LoginButton.name(), Locator::accessibility_id("test-LOGIN"))
            .uncached(
                AuthElement::LockedOutErrorMessage.name(),
                Locator::text_view(LOCKED_OUT_MESSAGE),
            )
            .uncached(
                AuthElement::ErrorMessage.name(),
                Locator::xpath(
                    "//android.view.ViewGroup[@content-desc='test-Error message']/android.widget.TextView",
                ),
            )
            .cached(
                AuthElement::StandardUserAutofill.name(),
                Locator::accessibility_id("test-standard_user"),
            )
            .cached(
                AuthElement::LockedOutUserAutofill.name(),
                Locator::accessibility_id("test-locked_out_user"),
            )
            .cached(
                AuthElement::ProblemUserAutofill.name(),
                Locator::accessibility_id("test-problem_user"),
            )
            .build();
        Self { engine, locators }
    }

    pub fn locators(&self) -> &LocatorRegistry {
        &self.locators
    }

    // # authentication form

    pub async fn enter_username(&self, username: &str) -> Result<(), EngineError> {
        self.engine
            .type_text(&self.locators, AuthElement::UsernameField.name(), username)
            .await
    }

    pub async fn username_field_text(&self) -> Result<String, EngineError> {
        self.engine
            .text(&self.locators, AuthElement::UsernameField.name())
            .await
    }

    pub async fn enter_password(&self, password: &str) -> Result<(), EngineError> {
        self.engine
            .type_text(&self.locators, AuthElement::PasswordField.name(), password)
            .await
    }

    /// The password field's text, which the app masks character by character.
    pub async fn password_field_text(&self) -> Result<String, EngineError> {
        self.engine
            .text(&self.locators, AuthElement::PasswordField.name())
            .await
    }

    pub async fn click_login(&self) -> Result<(), EngineError> {
        self.engine
            .click(&self.locators, AuthElement::LoginButton.name())
            .await
    }

    /// Enter both credentials and submit. Not transactional: if the click
    /// fails the typed values stay in the form.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<(), EngineError> {
        self.enter_username(username).await?;
        self.enter_password(password).await?;
        self.click_login().await
    }

    pub async fn is_locked_out_error_displayed(&self) -> Result<bool, EngineError> {
        self.engine
            .is_displayed(&self.locators, AuthElement::LockedOutErrorMessage.name())
            .await
    }

    pub async fn locked_out_error_text(&self) -> Result<String, EngineError> {
        self.engine
            .text(&self.locators, AuthElement::LockedOutErrorMessage.name())
            .await
    }

    /// Text of the validation banner, or empty if none appeared.
    pub async fn error_message_text(&self) -> Result<String, EngineError> {
        self.engine
            .text(&self.locators, AuthElement::ErrorMessage.name())
            .await
    }

    pub async fn query_error_message(&self) -> Result<QueryOutcome<String>, EngineError> {
        self.engine
            .query_text(&self.locators, AuthElement::ErrorMessage.name())
            .await
    }

    // # auto-fill user credential buttons

    pub async fn click_autofill(&self, user: AcceptedUsername) -> Result<(), EngineError> {
        self.engine
            .click(&self.locators, AuthElement::autofill_for(user).name())
            .await
    }

    pub async fn is_displayed(&self, element: AuthElement) -> Result<bool, EngineError> {
        self.engine.is_displayed(&self.locators, element.name()).await
    }

    pub async fn swipe_to(
        &self,
        element: AuthElement,
        direction: Direction,
    ) -> Result<SwipeOutcome, EngineError> {
        self.engine
            .swipe_to_element(&self.locators, element.name(), direction)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autofill_buttons_map_to_users() {
        assert_eq!(
            AuthElement::autofill_for(AcceptedUsername::Problem),
            AuthElement::ProblemUserAutofill
        );
        assert_eq!(
            AuthElement::autofill_for(AcceptedUsername::LockedOut).name(),
            "locked_out_user_autofill"
        );
    }
}
