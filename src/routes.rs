//! Static route table and path resolution.
//!
//! DESIGN
//! ======
//! Every literal path maps to a page plus the gates wrapping it. Protected
//! pages sit behind `Gate::Auth`; the admin page behind `Gate::Auth` then
//! `Gate::Admin`. `/login` and `/` carry their own session-presence
//! redirects, and anything unmatched falls through to the not-found page.
//! Matching ignores ASCII case, a trailing slash, the query and the fragment.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use crate::guard::{Gate, GateDecision, LANDING_PATH, LOGIN_PATH, check_all};
use crate::session::AuthState;

/// Pages the router can render. Their bodies live in the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Page {
    Login,
    Dashboard,
    About,
    Skills,
    Projects,
    Certificates,
    Contact,
    Admin,
    NotFound,
}

impl Page {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Dashboard => "Home",
            Self::About => "About",
            Self::Skills => "Skills",
            Self::Projects => "Projects",
            Self::Certificates => "Certificates",
            Self::Contact => "Contact",
            Self::Admin => "Admin",
            Self::NotFound => "Not Found",
        }
    }
}

/// How a route decides between rendering and redirecting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteKind {
    /// Rendered for everyone.
    Public(Page),
    /// Rendered only without a session; signed-in visitors go to the landing page.
    GuestOnly(Page),
    /// Renders nothing: redirects to the landing page or the login page.
    Entry,
    /// Rendered once every gate allows.
    Guarded { page: Page, gates: &'static [Gate] },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub kind: RouteKind,
}

impl Route {
    /// Short label of the route's access rule.
    #[must_use]
    pub fn access_label(&self) -> &'static str {
        match self.kind {
            RouteKind::Public(_) => "public",
            RouteKind::GuestOnly(_) => "guest-only",
            RouteKind::Entry => "redirect",
            RouteKind::Guarded { gates, .. } if gates.contains(&Gate::Admin) => "auth+admin",
            RouteKind::Guarded { .. } => "auth",
        }
    }
}

const AUTH: &[Gate] = &[Gate::Auth];
const AUTH_ADMIN: &[Gate] = &[Gate::Auth, Gate::Admin];

/// Path of the catch-all route.
pub const WILDCARD_PATH: &str = "*";

/// Route table in match order; the wildcard entry is last.
pub static ROUTES: &[Route] = &[
    Route { path: LOGIN_PATH, kind: RouteKind::GuestOnly(Page::Login) },
    Route { path: "/", kind: RouteKind::Entry },
    Route { path: LANDING_PATH, kind: RouteKind::Guarded { page: Page::Dashboard, gates: AUTH } },
    Route { path: "/about", kind: RouteKind::Guarded { page: Page::About, gates: AUTH } },
    Route { path: "/skills", kind: RouteKind::Guarded { page: Page::Skills, gates: AUTH } },
    Route { path: "/projects", kind: RouteKind::Guarded { page: Page::Projects, gates: AUTH } },
    Route { path: "/certificates", kind: RouteKind::Guarded { page: Page::Certificates, gates: AUTH } },
    Route { path: "/contact", kind: RouteKind::Guarded { page: Page::Contact, gates: AUTH } },
    Route { path: "/admin", kind: RouteKind::Guarded { page: Page::Admin, gates: AUTH_ADMIN } },
    Route { path: WILDCARD_PATH, kind: RouteKind::Public(Page::NotFound) },
];

/// Outcome of navigating to a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Auth state unresolved; show the pending placeholder.
    Pending,
    /// Replace the location with this path.
    Redirect(&'static str),
    Render(Page),
}

/// Strip query and fragment, drop trailing slashes, ensure a leading slash.
#[must_use]
pub fn normalize_path(raw: &str) -> String {
    let path = raw.split(['?', '#']).next().unwrap_or_default().trim();
    let trimmed = path.trim_matches('/');
    format!("/{trimmed}")
}

/// Find the route serving `path`, falling back to the wildcard.
#[must_use]
pub fn find_route(path: &str) -> &'static Route {
    let normalized = normalize_path(path);
    let wildcard = &ROUTES[ROUTES.len() - 1];
    ROUTES
        .iter()
        .find(|route| route.path != WILDCARD_PATH && route.path.eq_ignore_ascii_case(&normalized))
        .unwrap_or(wildcard)
}

/// Decide what navigating to `path` shows for the given auth state.
#[must_use]
pub fn resolve(path: &str, state: &AuthState) -> Navigation {
    match find_route(path).kind {
        RouteKind::Public(page) => Navigation::Render(page),
        RouteKind::GuestOnly(page) => {
            if state.is_authenticated() {
                Navigation::Redirect(LANDING_PATH)
            } else {
                Navigation::Render(page)
            }
        }
        RouteKind::Entry => {
            if state.is_authenticated() {
                Navigation::Redirect(LANDING_PATH)
            } else {
                Navigation::Redirect(LOGIN_PATH)
            }
        }
        RouteKind::Guarded { page, gates } => match check_all(gates, state) {
            GateDecision::Pending => Navigation::Pending,
            GateDecision::Redirect(to) => Navigation::Redirect(to),
            GateDecision::Allow => Navigation::Render(page),
        },
    }
}

/// Follow redirects from `path` until something renders or is pending.
///
/// Returns the final navigation and the path it settled on. Gives up after
/// a few hops so a misconfigured table cannot loop forever.
#[must_use]
pub fn resolve_final(path: &str, state: &AuthState) -> (Navigation, String) {
    const MAX_HOPS: usize = 4;

    let mut current = normalize_path(path);
    let mut navigation = resolve(&current, state);
    for _ in 0..MAX_HOPS {
        let Navigation::Redirect(to) = navigation else { break };
        current = to.to_owned();
        navigation = resolve(&current, state);
    }
    (navigation, current)
}

/// Entry in the authenticated navigation bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub path: &'static str,
}

const BASE_NAV: &[NavLink] = &[
    NavLink { label: "Home", path: LANDING_PATH },
    NavLink { label: "About", path: "/about" },
    NavLink { label: "Skills", path: "/skills" },
    NavLink { label: "Projects", path: "/projects" },
    NavLink { label: "Certificates", path: "/certificates" },
    NavLink { label: "Contact", path: "/contact" },
];

/// Navigation bar links; the admin link appears only for admins.
#[must_use]
pub fn nav_links(state: &AuthState) -> Vec<NavLink> {
    let mut links = BASE_NAV.to_vec();
    if state.is_admin() {
        links.push(NavLink { label: "Admin", path: "/admin" });
    }
    links
}
