//! Todo record, title validation and partial-update payloads

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ValidationError;

/// Maximum length for todo titles, matching the `VARCHAR(200)` column
pub const MAX_TITLE_LEN: usize = 200;

/// Todo record as persisted in the `todos` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

/// Validated todo title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoTitle(String);

impl TodoTitle {
    /// Create a new todo title.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 200 characters
    ///
    /// # Example
    /// ```
    /// use todoctl_server::models::TodoTitle;
    ///
    /// assert_eq!(TodoTitle::new("  buy milk ").unwrap().as_str(), "buy milk");
    /// assert!(TodoTitle::new("").is_err());
    /// assert!(TodoTitle::new("   ").is_err());  // whitespace only
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }

        // VARCHAR length is counted in characters, not bytes
        if trimmed.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                max: MAX_TITLE_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Get the title as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

/// Unvalidated partial update, as supplied by a caller.
///
/// `None` means "leave this field alone".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl TodoChanges {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }
}

/// Validated partial update: at least one field present, title non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoPatch {
    title: Option<TodoTitle>,
    completed: Option<bool>,
}

impl TodoPatch {
    pub fn title(&self) -> Option<&TodoTitle> {
        self.title.as_ref()
    }

    pub fn completed(&self) -> Option<bool> {
        self.completed
    }

    pub fn into_parts(self) -> (Option<TodoTitle>, Option<bool>) {
        (self.title, self.completed)
    }
}

impl TryFrom<TodoChanges> for TodoPatch {
    type Error = ValidationError;

    fn try_from(changes: TodoChanges) -> Result<Self, Self::Error> {
        if changes.title.is_none() && changes.completed.is_none() {
            return Err(ValidationError::NoFields);
        }

        let title = changes
            .title
            .as_deref()
            .map(TodoTitle::new)
            .transpose()?;

        Ok(Self {
            title,
            completed: changes.completed,
        })
    }
}
