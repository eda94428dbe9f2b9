//! Fixed route table with exact string matching.

pub const HOME_PATH: &str = "/";
pub const ABOUT_PATH: &str = "/about";
pub const NOTES_PATH: &str = "/notes";
pub const SETTINGS_PATH: &str = "/settings";

/// One navigable page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub title: &'static str,
}

const STANDARD_ROUTES: &[Route] = &[
    Route {
        path: HOME_PATH,
        title: "Home",
    },
    Route {
        path: ABOUT_PATH,
        title: "About",
    },
    Route {
        path: NOTES_PATH,
        title: "Notes",
    },
    Route {
        path: SETTINGS_PATH,
        title: "Settings",
    },
];

/// Ordered, immutable list of routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// The four pages of the application, in navigation order.
    pub fn standard() -> Self {
        Self {
            routes: STANDARD_ROUTES.to_vec(),
        }
    }

    /// Exact-string lookup; first match wins.
    ///
    /// No normalization happens: `/about/` and `/About` are unrecognized.
    pub fn match_path(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.path == path)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}
