// Configuration for catalog and user directory instances.
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::queue::BookId;

/// Settings used to construct a [`crate::LibraryCatalog`] and a
/// [`crate::UserDirectory`]. Every field is optional in the JSON
/// document, missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Name of the book index, refer to [`crate::Index::id`].
    #[serde(default = "default_books_index")]
    pub books_index: String,
    /// Name of the user index.
    #[serde(default = "default_users_index")]
    pub users_index: String,
    /// First id handed out to a new book in an empty catalog.
    #[serde(default = "default_first_book_id")]
    pub first_book_id: BookId,
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
    /// Load the two starter books into a fresh catalog.
    #[serde(default)]
    pub seed_books: bool,
}

fn default_books_index() -> String {
    "books".to_string()
}

fn default_users_index() -> String {
    "users".to_string()
}

fn default_first_book_id() -> BookId {
    1
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            books_index: default_books_index(),
            users_index: default_users_index(),
            first_book_id: default_first_book_id(),
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
            seed_books: false,
        }
    }
}

impl Config {
    /// Parse configuration from a JSON document and validate it.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the catalog cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.books_index.is_empty() || self.users_index.is_empty() {
            return Err(Error::InvalidConfig("index names must be non-empty".into()));
        }
        if self.first_book_id == 0 {
            return Err(Error::InvalidConfig("first_book_id must be >= 1".into()));
        }
        if self.admin_username.is_empty() || self.admin_password.is_empty() {
            let msg = "admin credentials must be non-empty".into();
            return Err(Error::InvalidConfig(msg));
        }
        Ok(())
    }
}
