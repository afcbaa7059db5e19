//! Route guards.
//!
//! Maps a path and the session state to the view that should render. Holds
//! no state of its own.

use crate::session::SessionState;

/// Application routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Credentials form
    Login,
    /// Account creation form
    Register,
    /// Greeting
    Home,
    /// Admin dashboard
    Admin,
    /// Train search
    Search,
    /// Passenger form
    Book,
    /// The user's bookings
    MyBookings,
}

/// Who may see a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Logged-out users only
    AnonymousOnly,
    /// Any logged-in user
    Authenticated,
    /// Logged-in admins
    AdminOnly,
}

impl Route {
    /// All routes in path-table order
    pub const ALL: [Route; 7] = [
        Route::Login,
        Route::Register,
        Route::Home,
        Route::Admin,
        Route::Search,
        Route::Book,
        Route::MyBookings,
    ];

    /// URL-style path
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Home => "/",
            Self::Admin => "/admin",
            Self::Search => "/search",
            Self::Book => "/book",
            Self::MyBookings => "/my-bookings",
        }
    }

    /// Parse a path; trailing slashes are ignored
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        let normalised = if trimmed.is_empty() { "/" } else { trimmed };
        Self::ALL.into_iter().find(|r| r.path() == normalised)
    }

    /// Screen title
    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Register",
            Self::Home => "Home",
            Self::Admin => "Admin Dashboard",
            Self::Search => "Search Trains",
            Self::Book => "Book Ticket",
            Self::MyBookings => "My Bookings",
        }
    }

    /// Guard applied to this route
    pub fn access(&self) -> Access {
        match self {
            Self::Login | Self::Register => Access::AnonymousOnly,
            Self::Home | Self::Search | Self::Book | Self::MyBookings => Access::Authenticated,
            Self::Admin => Access::AdminOnly,
        }
    }
}

/// Router decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Session still loading; show only the loading indicator
    Pending,
    /// Render this route
    Render(Route),
    /// Navigate here instead
    Redirect(Route),
}

/// Decide what `path` shows for `state`
pub fn resolve(path: &str, state: &SessionState) -> Resolution {
    match Route::from_path(path) {
        Some(route) => resolve_route(route, state),
        None => Resolution::Redirect(Route::Home),
    }
}

/// Decide what a known route shows for `state`
pub fn resolve_route(route: Route, state: &SessionState) -> Resolution {
    if *state == SessionState::Loading {
        return Resolution::Pending;
    }

    match route.access() {
        Access::AnonymousOnly if state.is_authenticated() => Resolution::Redirect(Route::Home),
        Access::Authenticated if !state.is_authenticated() => Resolution::Redirect(Route::Login),
        Access::AdminOnly if !state.is_authenticated() => Resolution::Redirect(Route::Login),
        Access::AdminOnly if !state.is_admin() => Resolution::Redirect(Route::Home),
        _ => Resolution::Render(route),
    }
}

/// Follow redirects until a route renders; `None` while loading
pub fn landing(route: Route, state: &SessionState) -> Option<Route> {
    let mut current = route;
    // Every redirect target is Home or Login, so two hops always settle.
    for _ in 0..Route::ALL.len() {
        match resolve_route(current, state) {
            Resolution::Pending => return None,
            Resolution::Render(r) => return Some(r),
            Resolution::Redirect(next) => current = next,
        }
    }
    Some(current)
}

/// Navigation bar entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavBar {
    /// Link label and target
    pub links: Vec<(&'static str, Route)>,
    /// `Hello, name` for logged-in users
    pub greeting: Option<String>,
    /// Whether the logout action is offered
    pub can_logout: bool,
}

/// Navigation bar content for `state`
pub fn navbar(state: &SessionState) -> NavBar {
    match state.user() {
        Some(user) => {
            let mut links = Vec::with_capacity(3);
            if user.is_admin {
                links.push(("Admin Dashboard", Route::Admin));
            }
            links.push(("Search Trains", Route::Search));
            links.push(("My Bookings", Route::MyBookings));
            NavBar {
                links,
                greeting: Some(format!("Hello, {}", user.display_name())),
                can_logout: true,
            }
        }
        None => NavBar {
            links: vec![("Login", Route::Login), ("Register", Route::Register)],
            greeting: None,
            can_logout: false,
        },
    }
}
