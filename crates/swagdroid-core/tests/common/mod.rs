//! Shared test helpers for swagdroid-core integration tests.
//!
//! [`FakeDevice`] is an in-memory [`AutomationDriver`] that models the Swag
//! Labs login screen closely enough to run the real page objects and
//! scenarios: a scrollable form with the autofill list below it, login
//! validation, view rebuilds that invalidate handles, and scripted
//! stale-element faults.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use swagdroid_core::app::App;
use swagdroid_core::config::Credentials;
use swagdroid_core::driver::{AutomationDriver, DriverError};
use swagdroid_core::element::{ElementHandle, ScreenSize};
use swagdroid_core::gesture::Point;
use swagdroid_core::input::InputSequence;
use swagdroid_core::locator::{Locator, Strategy};

pub const USERNAME: &str = "test-Username";
pub const PASSWORD: &str = "test-Password";
pub const LOGIN: &str = "test-LOGIN";
pub const STANDARD_AUTOFILL: &str = "test-standard_user";
pub const LOCKED_OUT_AUTOFILL: &str = "test-locked_out_user";
pub const PROBLEM_AUTOFILL: &str = "test-problem_user";
pub const ERROR_MESSAGE: &str = "error_message";
pub const LOCKED_OUT_ERROR: &str = "locked_out_error";
pub const PRODUCTS_TITLE: &str = "products_title";

const LOCKED_OUT_TEXT: &str = "Sorry, this user has been locked out.";
const VALID_PASSWORD: &str = "secret_sauce";
const MAX_SCROLL: i32 = 3;

pub const SCREEN: ScreenSize = ScreenSize {
    width: 1080,
    height: 2280,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Products,
}

#[derive(Debug)]
struct DeviceState {
    screen: Screen,
    username: String,
    password: String,
    error: Option<String>,
    scroll: i32,
    view_generation: u64,
    stale_faults: HashMap<String, u32>,
    hidden: HashSet<String>,
    disabled: HashSet<String>,
    displayed_calls: HashMap<String, u32>,
    clicks: HashMap<String, u32>,
    gestures: Vec<(Point, Point)>,
    typed: Vec<String>,
    quit: bool,
}

/// In-memory Swag Labs device.
pub struct FakeDevice {
    state: Mutex<DeviceState>,
}

impl FakeDevice {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(DeviceState {
                screen: Screen::Login,
                username: String::new(),
                password: String::new(),
                error: None,
                scroll: 0,
                view_generation: 0,
                stale_faults: HashMap::new(),
                hidden: HashSet::new(),
                disabled: HashSet::new(),
                displayed_calls: HashMap::new(),
                clicks: HashMap::new(),
                gestures: Vec::new(),
                typed: Vec::new(),
                quit: false,
            }),
        })
    }

    /// The next `times` operations on `key`'s handle fail as stale.
    pub fn stale_times(&self, key: &str, times: u32) {
        self.state
            .lock()
            .unwrap()
            .stale_faults
            .insert(key.to_string(), times);
    }

    /// Every operation on `key`'s handle fails as stale.
    pub fn always_stale(&self, key: &str) {
        self.stale_times(key, u32::MAX);
    }

    /// `key` stays in the hierarchy but reports not displayed.
    pub fn hide(&self, key: &str) {
        self.state.lock().unwrap().hidden.insert(key.to_string());
    }

    pub fn disable(&self, key: &str) {
        self.state.lock().unwrap().disabled.insert(key.to_string());
    }

    pub fn screen(&self) -> Screen {
        self.state.lock().unwrap().screen
    }

    pub fn scroll(&self) -> i32 {
        self.state.lock().unwrap().scroll
    }

    pub fn username(&self) -> String {
        self.state.lock().unwrap().username.clone()
    }

    /// Number of `is_displayed` calls on `key`'s handles. Each engine
    /// attempt makes exactly one while the element is displayed.
    pub fn displayed_calls(&self, key: &str) -> u32 {
        self.state
            .lock()
            .unwrap()
            .displayed_calls
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    pub fn clicks(&self, key: &str) -> u32 {
        self.state.lock().unwrap().clicks.get(key).copied().unwrap_or(0)
    }

    pub fn gestures(&self) -> Vec<(Point, Point)> {
        self.state.lock().unwrap().gestures.clone()
    }

    pub fn typed(&self) -> Vec<String> {
        self.state.lock().unwrap().typed.clone()
    }

    pub fn is_quit(&self) -> bool {
        self.state.lock().unwrap().quit
    }
}

impl DeviceState {
    fn key_for(locator: &Locator) -> Option<&'static str> {
        match locator.strategy {
            Strategy::AccessibilityId => [
                USERNAME,
                PASSWORD,
                LOGIN,
                STANDARD_AUTOFILL,
                LOCKED_OUT_AUTOFILL,
                PROBLEM_AUTOFILL,
            ]
            .into_iter()
            .find(|id| *id == locator.value),
            Strategy::XPath => {
                if locator.value.contains("test-Error message") {
                    Some(ERROR_MESSAGE)
                } else if locator.value == Locator::text_view(LOCKED_OUT_TEXT).value {
                    Some(LOCKED_OUT_ERROR)
                } else if locator.value == Locator::text_view("PRODUCTS").value {
                    Some(PRODUCTS_TITLE)
                } else {
                    None
                }
            }
        }
    }

    fn is_present(&self, key: &str) -> bool {
        match self.screen {
            Screen::Products => key == PRODUCTS_TITLE,
            Screen::Login => match key {
                USERNAME | PASSWORD | LOGIN => self.scroll <= 1,
                STANDARD_AUTOFILL | LOCKED_OUT_AUTOFILL | PROBLEM_AUTOFILL => self.scroll >= 2,
                ERROR_MESSAGE => self.error.is_some() && self.scroll <= 1,
                LOCKED_OUT_ERROR => {
                    self.error.as_deref() == Some(LOCKED_OUT_TEXT) && self.scroll <= 1
                }
                _ => false,
            },
        }
    }

    /// Check a handle against faults and the current view tree.
    fn live_key(&mut self, element: &ElementHandle) -> Result<String, DriverError> {
        let (key, generation) = element
            .id
            .rsplit_once('#')
            .ok_or_else(|| DriverError::NoSuchElement(element.id.clone()))?;
        if let Some(remaining) = self.stale_faults.get_mut(key) {
            if *remaining > 0 {
                if *remaining != u32::MAX {
                    *remaining -= 1;
                }
                return Err(DriverError::StaleElement(element.id.clone()));
            }
        }
        if generation != self.view_generation.to_string() || !self.is_present(key) {
            return Err(DriverError::StaleElement(element.id.clone()));
        }
        Ok(key.to_string())
    }

    fn submit_login(&mut self) {
        let error = if self.username.is_empty() {
            Some("Username is required")
        } else if self.password.is_empty() {
            Some("Password is required")
        } else if self.password != VALID_PASSWORD {
            Some("Username and password do not match any user in this service.")
        } else {
            match self.username.as_str() {
                "locked_out_user" => Some(LOCKED_OUT_TEXT),
                "standard_user" | "problem_user" => None,
                _ => Some("Username and password do not match any user in this service."),
            }
        };
        match error {
            Some(message) => self.error = Some(message.to_string()),
            None => {
                self.error = None;
                self.screen = Screen::Products;
            }
        }
        self.view_generation += 1;
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            USERNAME => Some(&mut self.username),
            PASSWORD => Some(&mut self.password),
            _ => None,
        }
    }
}

#[async_trait]
impl AutomationDriver for FakeDevice {
    async fn find_element(&self, locator: &Locator) -> Result<ElementHandle, DriverError> {
        let state = self.state.lock().unwrap();
        match DeviceState::key_for(locator) {
            Some(key) if state.is_present(key) => Ok(ElementHandle::new(format!(
                "{}#{}",
                key, state.view_generation
            ))),
            _ => Err(DriverError::NoSuchElement(locator.to_string())),
        }
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        let key = state.live_key(element)?;
        *state.clicks.entry(key.clone()).or_default() += 1;
        match key.as_str() {
            LOGIN => state.submit_login(),
            STANDARD_AUTOFILL | LOCKED_OUT_AUTOFILL | PROBLEM_AUTOFILL => {
                state.username = key.trim_start_matches("test-").to_string();
                state.password = VALID_PASSWORD.to_string();
            }
            _ => {}
        }
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        let key = state.live_key(element)?;
        if let Some(field) = state.field_mut(&key) {
            field.clear();
        }
        Ok(())
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        let key = state.live_key(element)?;
        match state.field_mut(&key) {
            Some(field) => {
                field.push_str(text);
                Ok(())
            }
            None => Err(DriverError::CommandFailed {
                code: "element not interactable".to_string(),
                message: format!("{} is not a text field", key),
            }),
        }
    }

    async fn text(&self, element: &ElementHandle) -> Result<String, DriverError> {
        let mut state = self.state.lock().unwrap();
        let key = state.live_key(element)?;
        let text = match key.as_str() {
            USERNAME => state.username.clone(),
            PASSWORD => "•".repeat(state.password.chars().count()),
            LOGIN => "LOGIN".to_string(),
            ERROR_MESSAGE | LOCKED_OUT_ERROR => state.error.clone().unwrap_or_default(),
            PRODUCTS_TITLE => "PRODUCTS".to_string(),
            autofill => autofill.trim_start_matches("test-").to_string(),
        };
        Ok(text)
    }

    async fn is_enabled(&self, element: &ElementHandle) -> Result<bool, DriverError> {
        let mut state = self.state.lock().unwrap();
        let key = state.live_key(element)?;
        Ok(!state.disabled.contains(&key))
    }

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool, DriverError> {
        let mut state = self.state.lock().unwrap();
        if let Some((key, _)) = element.id.rsplit_once('#') {
            *state.displayed_calls.entry(key.to_string()).or_default() += 1;
        }
        let key = state.live_key(element)?;
        Ok(!state.hidden.contains(&key))
    }

    async fn window_size(&self) -> Result<ScreenSize, DriverError> {
        Ok(SCREEN)
    }

    async fn perform_actions(&self, sequences: &[InputSequence]) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        for sequence in sequences {
            if let Some((start, end)) = sequence.pointer_path() {
                state.gestures.push((start, end));
                let before = state.scroll;
                if end.y < start.y {
                    state.scroll = (state.scroll + 1).min(MAX_SCROLL);
                } else if end.y > start.y {
                    state.scroll = (state.scroll - 1).max(0);
                }
                if state.scroll != before {
                    state.view_generation += 1;
                }
            }
            if let Some(text) = sequence.typed_text() {
                state.typed.push(text);
            }
        }
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
        Ok(b"\x89PNG\r\n\x1a\nfake".to_vec())
    }

    async fn quit(&self) -> Result<(), DriverError> {
        self.state.lock().unwrap().quit = true;
        Ok(())
    }
}

/// An [`App`] driving `device`.
pub fn app_on(device: &Arc<FakeDevice>) -> App {
    let driver: Arc<dyn AutomationDriver> = device.clone();
    App::with_driver(driver)
}

/// The credentials of the sample app.
pub fn sample_credentials() -> Credentials {
    Credentials {
        standard_user: "standard_user".to_string(),
        problem_user: "problem_user".to_string(),
        locked_out_user: "locked_out_user".to_string(),
        password: "secret_sauce".to_string(),
    }
}
