//! Role-gated screens

use shared::{User, UserRole};

use crate::error::{ClientError, ClientResult};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Menu,
    Kitchen,
    Tables,
    Admin,
}

impl Screen {
    pub const ALL: [Screen; 4] = [Screen::Menu, Screen::Kitchen, Screen::Tables, Screen::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Menu => "menu",
            Screen::Kitchen => "kitchen",
            Screen::Tables => "tables",
            Screen::Admin => "admin",
        }
    }

    /// Whether `role` may open this screen
    pub fn allows(&self, role: UserRole) -> bool {
        match (self, role) {
            (Screen::Admin, UserRole::Admin) => true,
            (Screen::Admin, UserRole::Waiter | UserRole::Kitchen | UserRole::Customer) => false,
            (Screen::Menu | Screen::Kitchen | Screen::Tables, _) => true,
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Screens to list in the navigation for `user`. Nothing when logged out.
pub fn screens_for(user: Option<&User>) -> Vec<Screen> {
    match user {
        Some(user) => Screen::ALL
            .into_iter()
            .filter(|s| s.allows(user.role))
            .collect(),
        None => Vec::new(),
    }
}

/// Access check for a private screen
pub fn guard(session: &Session, screen: Screen) -> ClientResult<User> {
    let user = match session.user() {
        Some(user) if session.is_authenticated() => user,
        _ => return Err(ClientError::Unauthorized("Not logged in".to_string())),
    };
    if !screen.allows(user.role) {
        return Err(ClientError::Forbidden(format!(
            "{} role cannot open the {} screen",
            user.role, screen
        )));
    }
    Ok(user)
}
