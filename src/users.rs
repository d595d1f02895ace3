use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::index::{Index, OrderedIndex};

/// A registered account. Usernames are case sensitive and unique.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub password: String,
    pub is_admin: bool,
}

impl User {
    pub fn new<S, T>(username: S, password: T, is_admin: bool) -> User
    where
        S: Into<String>,
        T: Into<String>,
    {
        User {
            username: username.into(),
            password: password.into(),
            is_admin,
        }
    }
}

/// Page the host shows after a successful login.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Landing {
    Admin,
    Customer,
}

/// Result of [`UserDirectory::authenticate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Login {
    /// Known user, password matched.
    Matched(User),
    /// Known user, password did not match.
    WrongPassword,
    /// Unknown username, a new non-admin account was registered.
    Created(User),
}

impl Login {
    /// Where to route the user, None when login was rejected.
    pub fn landing(&self) -> Option<Landing> {
        match self {
            Login::Matched(user) if user.is_admin => Some(Landing::Admin),
            Login::Matched(_) | Login::Created(_) => Some(Landing::Customer),
            Login::WrongPassword => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Login::Matched(user) | Login::Created(user) => Some(user),
            Login::WrongPassword => None,
        }
    }
}

/// UserDirectory index accounts by username.
///
/// Passwords are stored and compared in plain text, and logging in with
/// an unknown username registers it.
pub struct UserDirectory<I = Index<String, User>> {
    by_name: I,
}

impl UserDirectory {
    /// Create a directory holding the configured admin account.
    pub fn new(config: &Config) -> UserDirectory {
        let mut directory = UserDirectory::with_index(Index::new(&config.users_index));
        let admin = User::new(
            config.admin_username.as_str(),
            config.admin_password.as_str(),
            true, /*is_admin*/
        );
        directory.add_user(admin);
        directory
    }

    /// Create a directory without any account.
    pub fn empty() -> UserDirectory {
        UserDirectory::with_index(Index::new("users"))
    }
}

impl<I> UserDirectory<I>
where
    I: OrderedIndex<String, User>,
{
    pub fn with_index(by_name: I) -> UserDirectory<I> {
        UserDirectory { by_name }
    }

    /// Register `user`. An existing username keeps its first
    /// registration and false is returned.
    pub fn add_user(&mut self, user: User) -> bool {
        let username = user.username.clone();
        let ok = self.by_name.insert(username, user);
        if !ok {
            debug!(target: "users", "user already registered");
        }
        ok
    }

    pub fn find_user(&self, username: &str) -> Option<&User> {
        self.by_name.get(username)
    }

    /// Accounts in username order.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.by_name.values()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Decide a login attempt. Unknown usernames are registered as
    /// non-admin accounts with the given password.
    pub fn authenticate(&mut self, username: &str, password: &str) -> Login {
        match self.find_user(username) {
            Some(user) if user.password == password => Login::Matched(user.clone()),
            Some(_) => {
                debug!(target: "users", "wrong password for {:?}", username);
                Login::WrongPassword
            }
            None => {
                let user = User::new(username, password, false /*is_admin*/);
                self.add_user(user.clone());
                info!(target: "users", "registered new account {:?}", username);
                Login::Created(user)
            }
        }
    }
}
