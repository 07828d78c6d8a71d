//! Route guards
//!
//! Pure functions of the already-resolved session state; guards never
//! trigger network calls.

use common::models::User;

use crate::stores::AuthState;

/// Well-known routes
pub mod routes {
    pub const SIGN_IN: &str = "/sign-in";
    /// Landing page, reachable by anyone
    pub const PUBLIC_HOME: &str = "/";
    pub const DASHBOARD: &str = "/dashboard";
    pub const ADMIN_HOME: &str = "/admin";
}

/// Required level of access for a protected route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    #[default]
    Authenticated,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Auth status not determined yet; show a placeholder
    Loading,
    Render,
    Redirect {
        to: String,
        /// Location to return to after signing in
        from: Option<String>,
    },
}

impl GuardDecision {
    fn redirect(to: &str, from: Option<&str>) -> Self {
        GuardDecision::Redirect {
            to: to.to_string(),
            from: from.map(str::to_string),
        }
    }
}

/// Home route for a signed-in user
pub fn home_for(user: Option<&User>) -> &'static str {
    match user {
        Some(user) if user.is_admin() => routes::ADMIN_HOME,
        _ => routes::DASHBOARD,
    }
}

/// Gate a route that requires a session (and optionally the admin role)
pub fn protected(state: &AuthState, location: &str, access: Access) -> GuardDecision {
    if state.is_resolving() {
        return GuardDecision::Loading;
    }

    if !state.is_authenticated {
        return GuardDecision::redirect(routes::SIGN_IN, Some(location));
    }

    if access == Access::Admin && !state.is_admin() {
        return GuardDecision::redirect(routes::PUBLIC_HOME, None);
    }

    GuardDecision::Render
}

/// Gate a route meant only for signed-out visitors, such as sign-in
pub fn public_only(state: &AuthState) -> GuardDecision {
    if state.is_resolving() {
        return GuardDecision::Loading;
    }

    if state.is_authenticated {
        return GuardDecision::redirect(home_for(state.user.as_ref()), None);
    }

    GuardDecision::Render
}
