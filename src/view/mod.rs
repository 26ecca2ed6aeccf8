pub mod session;

pub use session::ProfileSession;

use crate::api::{ApiError, UserData};
use tracing::debug;

/// The only message shown when a profile cannot be loaded, whatever the cause.
pub const NOT_FOUND_MESSAGE: &str = "Sorry, Profile does not exist";

/// What the page shows right now, in render priority order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewBranch<'a> {
    Error(&'a str),
    Loading,
    Profile(&'a UserData),
}

/// Handed out by [`ProfileView::navigate`]; an outcome is only applied if its
/// ticket is still the current generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub username: String,
}

/// State of the profile page for the current route.
#[derive(Debug, Default)]
pub struct ProfileView {
    username: Option<String>,
    generation: u64,
    result: Option<UserData>,
    error: Option<String>,
    title: Option<String>,
}

impl ProfileView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the view at `username`. Everything loaded for the previous
    /// username is dropped and any fetch still in flight becomes stale.
    pub fn navigate(&mut self, username: &str) -> FetchTicket {
        self.generation += 1;
        self.username = Some(username.to_string());
        self.result = None;
        self.error = None;
        self.title = None;
        debug!(username = %username, generation = self.generation, "navigated");

        FetchTicket {
            generation: self.generation,
            username: username.to_string(),
        }
    }

    /// Commit a fetch outcome. Returns false, leaving state untouched, when the
    /// ticket belongs to an older navigation.
    pub fn apply(&mut self, ticket: &FetchTicket, outcome: Result<UserData, ApiError>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }

        match outcome {
            Ok(data) => {
                self.title = Some(format!("Profile | {}", data.title_name));
                self.result = Some(data);
                self.error = None;
            }
            Err(_) => {
                self.result = None;
                self.error = Some(NOT_FOUND_MESSAGE.to_string());
            }
        }
        true
    }

    pub fn branch(&self) -> ViewBranch<'_> {
        if let Some(error) = &self.error {
            ViewBranch::Error(error)
        } else if let Some(data) = &self.result {
            ViewBranch::Profile(data)
        } else {
            ViewBranch::Loading
        }
    }

    /// Page title, set only after a successful load.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}
