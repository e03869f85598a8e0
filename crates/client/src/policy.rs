//! Authorization policy for views and commands.
//!
//! One function, [`authorize`], decides whether the current session may
//! enter a view. Every front end calls it the same way instead of repeating
//! token and role checks per view.
//!
//! The decision is advisory: the role comes from the session store, not from
//! a verified token claim, so the server remains the authority.

use lopcafe_core::Role;

use crate::session::Session;

/// What a view demands of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// Anyone.
    Public,
    /// Only visitors without a token (login, signup, verify).
    GuestOnly,
    /// Any logged-in user.
    Authenticated,
    /// Logged-in admins only.
    Admin,
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Proceed.
    Allow,
    /// Not logged in: go to the login view.
    RedirectToLogin,
    /// Already logged in, or lacking the role: go to the dashboard for `Role`.
    RedirectToDashboard(Role),
}

impl Decision {
    /// Whether the view may be entered.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Route to navigate to instead, if any.
    #[must_use]
    pub const fn redirect(&self) -> Option<Route> {
        match self {
            Self::Allow => None,
            Self::RedirectToLogin => Some(Route::Login),
            Self::RedirectToDashboard(role) => Some(Route::dashboard_for(*role)),
        }
    }
}

/// Decide whether `session` satisfies `requirement`.
#[must_use]
pub const fn authorize(session: &Session, requirement: Requirement) -> Decision {
    match (requirement, session.effective_role()) {
        (Requirement::Public, _)
        | (Requirement::GuestOnly, None)
        | (Requirement::Authenticated | Requirement::Admin, Some(Role::Admin))
        | (Requirement::Authenticated, Some(Role::User)) => Decision::Allow,
        (Requirement::GuestOnly, Some(role)) => Decision::RedirectToDashboard(role),
        (Requirement::Authenticated | Requirement::Admin, None) => Decision::RedirectToLogin,
        (Requirement::Admin, Some(Role::User)) => Decision::RedirectToDashboard(Role::User),
    }
}

/// Views of the LopCafe application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    About,
    Contact,
    Recipes,
    Signup,
    Verify,
    Login,
    Orders,
    CreateRecipe,
    BrewMethods,
    Ingredients,
    AdminDashboard,
    UserDashboard,
}

impl Route {
    /// Every route.
    pub const ALL: [Self; 13] = [
        Self::Landing,
        Self::About,
        Self::Contact,
        Self::Recipes,
        Self::Signup,
        Self::Verify,
        Self::Login,
        Self::Orders,
        Self::CreateRecipe,
        Self::BrewMethods,
        Self::Ingredients,
        Self::AdminDashboard,
        Self::UserDashboard,
    ];

    /// URL path of the view.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::About => "/about",
            Self::Contact => "/contact",
            Self::Recipes => "/recipes",
            Self::Signup => "/signup",
            Self::Verify => "/verify",
            Self::Login => "/login",
            Self::Orders => "/orders",
            Self::CreateRecipe => "/create-recipe",
            Self::BrewMethods => "/brew-methods",
            Self::Ingredients => "/ingredients",
            Self::AdminDashboard => "/admin-dashboard",
            Self::UserDashboard => "/user-dashboard",
        }
    }

    /// Parse a path; `None` for unknown paths (not found).
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.split(['?', '#']).next().unwrap_or(path);
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Self::ALL.into_iter().find(|r| r.path() == normalized)
    }

    /// What the view demands of the session.
    #[must_use]
    pub const fn requirement(&self) -> Requirement {
        match self {
            Self::Landing | Self::About | Self::Contact | Self::Recipes => Requirement::Public,
            Self::Signup | Self::Verify | Self::Login => Requirement::GuestOnly,
            Self::Orders | Self::UserDashboard => Requirement::Authenticated,
            Self::CreateRecipe | Self::BrewMethods | Self::Ingredients | Self::AdminDashboard => {
                Requirement::Admin
            }
        }
    }

    /// Landing view after login for `role`.
    #[must_use]
    pub const fn dashboard_for(role: Role) -> Self {
        match role {
            Role::Admin => Self::AdminDashboard,
            Role::User => Self::UserDashboard,
        }
    }

    /// Shorthand for `authorize(session, self.requirement())`.
    #[must_use]
    pub const fn authorize(&self, session: &Session) -> Decision {
        authorize(session, self.requirement())
    }
}
