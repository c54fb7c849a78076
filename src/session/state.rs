//! Session State Store
//! Per-session key/value map driving the welcome gate.
//!
//! Keys are plain strings so that the store can hold arbitrary UI state, but
//! the page router only goes through the named transitions below.

use super::profile::{ProfileError, ProfileStore, UserProfile};
use std::collections::HashMap;
use thiserror::Error;

pub const KEY_PAGE: &str = "page";
pub const KEY_SHOW_FORM: &str = "show_form";
pub const KEY_USER_NAME: &str = "user_name";
pub const KEY_USER_CONTACT: &str = "user_contact";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Please enter both Name and Contact Number.")]
    Validation,
    #[error("The session has already left the welcome page")]
    PageRegression,
    #[error("Could not save your details: {0}")]
    Profile(#[from] ProfileError),
}

/// Which page the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Welcome,
    Main,
}

/// Value stored under a session key.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionValue {
    Page(Page),
    Flag(bool),
    Text(String),
}

/// Where the welcome flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    ShowingSplash,
    ShowingForm,
    Submitted,
}

/// Isolated state of one interactive session.
#[derive(Debug, Clone)]
pub struct SessionState {
    values: HashMap<String, SessionValue>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        let mut values = HashMap::new();
        values.insert(KEY_PAGE.to_string(), SessionValue::Page(Page::Welcome));
        values.insert(KEY_SHOW_FORM.to_string(), SessionValue::Flag(false));
        Self { values }
    }

    /// Read a key, storing `default` the first time it is observed.
    pub fn get(&mut self, key: &str, default: SessionValue) -> SessionValue {
        self.values
            .entry(key.to_string())
            .or_insert(default)
            .clone()
    }

    /// Store a value. Moving `page` back to welcome is rejected.
    pub fn set(&mut self, key: &str, value: SessionValue) -> Result<(), SessionError> {
        if key == KEY_PAGE
            && self.page() == Page::Main
            && value != SessionValue::Page(Page::Main)
        {
            return Err(SessionError::PageRegression);
        }
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    pub fn page(&self) -> Page {
        match self.values.get(KEY_PAGE) {
            Some(SessionValue::Page(page)) => *page,
            _ => Page::Welcome,
        }
    }

    pub fn show_form(&self) -> bool {
        matches!(self.values.get(KEY_SHOW_FORM), Some(SessionValue::Flag(true)))
    }

    pub fn user_name(&self) -> Option<&str> {
        self.text(KEY_USER_NAME)
    }

    pub fn user_contact(&self) -> Option<&str> {
        self.text(KEY_USER_CONTACT)
    }

    fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(SessionValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn gate_state(&self) -> GateState {
        if self.page() == Page::Main {
            GateState::Submitted
        } else if self.show_form() {
            GateState::ShowingForm
        } else {
            GateState::ShowingSplash
        }
    }

    /// Splash "start" action. Reveals the form without leaving the welcome page.
    pub fn open_form(&mut self) {
        if self.page() != Page::Welcome {
            return;
        }
        if self.get(KEY_SHOW_FORM, SessionValue::Flag(false)) != SessionValue::Flag(true) {
            log::debug!("Showing welcome form");
            self.values
                .insert(KEY_SHOW_FORM.to_string(), SessionValue::Flag(true));
        }
    }

    /// Validate and persist the form, then unlock the main page.
    ///
    /// Values are stored exactly as entered; only the blank check trims.
    pub fn submit_profile(
        &mut self,
        name: &str,
        contact: &str,
        store: &ProfileStore,
    ) -> Result<UserProfile, SessionError> {
        if self.page() == Page::Main {
            return Err(SessionError::PageRegression);
        }
        if name.trim().is_empty() || contact.trim().is_empty() {
            return Err(SessionError::Validation);
        }

        let profile = UserProfile {
            name: name.to_string(),
            contact: contact.to_string(),
        };
        store.save(&profile)?;

        self.set(KEY_USER_NAME, SessionValue::Text(profile.name.clone()))?;
        self.set(KEY_USER_CONTACT, SessionValue::Text(profile.contact.clone()))?;
        self.set(KEY_PAGE, SessionValue::Page(Page::Main))?;
        Ok(profile)
    }
}
