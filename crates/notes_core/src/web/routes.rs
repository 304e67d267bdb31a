//! Named routes, path reversing and path resolving.
//!
//! # Invariants
//! - `Route::resolve(&route.path()) == Some(route)` for every valid slug.
//! - Note-scoped paths only resolve for slugs matching `[-a-zA-Z0-9_]+`.
//! - Query strings never affect which route a path resolves to.

use crate::slug::is_valid_slug;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped in the `next` value; path separators stay readable.
const NEXT_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Every endpoint of the application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Logout,
    Signup,
    List,
    Add,
    Success,
    Detail(String),
    Edit(String),
    Delete(String),
}

impl Route {
    /// Builds a route from its name. Note-scoped names require `slug`.
    pub fn from_name(name: &str, slug: Option<&str>) -> Option<Self> {
        let route = match (name, slug) {
            ("home", None) => Self::Home,
            ("login", None) => Self::Login,
            ("logout", None) => Self::Logout,
            ("signup", None) => Self::Signup,
            ("list", None) => Self::List,
            ("add", None) => Self::Add,
            ("success", None) => Self::Success,
            ("detail", Some(slug)) => Self::Detail(slug.to_string()),
            ("edit", Some(slug)) => Self::Edit(slug.to_string()),
            ("delete", Some(slug)) => Self::Delete(slug.to_string()),
            _ => return None,
        };
        Some(route)
    }

    /// Reverses the route into its path.
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/auth/login/".to_string(),
            Self::Logout => "/auth/logout/".to_string(),
            Self::Signup => "/auth/signup/".to_string(),
            Self::List => "/notes/".to_string(),
            Self::Add => "/add/".to_string(),
            Self::Success => "/done/".to_string(),
            Self::Detail(slug) => format!("/note/{slug}/"),
            Self::Edit(slug) => format!("/edit/{slug}/"),
            Self::Delete(slug) => format!("/delete/{slug}/"),
        }
    }

    /// Resolves a request path (query string allowed) into a route.
    pub fn resolve(path: &str) -> Option<Self> {
        let path = split_query(path).0;
        let route = match path {
            "/" => Self::Home,
            "/auth/login/" => Self::Login,
            "/auth/logout/" => Self::Logout,
            "/auth/signup/" => Self::Signup,
            "/notes/" => Self::List,
            "/add/" => Self::Add,
            "/done/" => Self::Success,
            _ => return resolve_note_route(path),
        };
        Some(route)
    }

    /// Private routes require an authenticated identity.
    pub fn is_private(&self) -> bool {
        !matches!(
            self,
            Self::Home | Self::Login | Self::Logout | Self::Signup
        )
    }
}

/// Reverses a route by name, e.g. `reverse("edit", Some("note-1"))`.
pub fn reverse(name: &str, slug: Option<&str>) -> Option<String> {
    Route::from_name(name, slug).map(|route| route.path())
}

/// Login path that returns to `next` after authentication.
pub fn login_redirect(next: &str) -> String {
    format!(
        "{}?next={}",
        Route::Login.path(),
        utf8_percent_encode(next, NEXT_VALUE)
    )
}

/// Returns the decoded value of query parameter `name` in `path`.
pub fn query_param(path: &str, name: &str) -> Option<String> {
    let query = split_query(path).1?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Accepts only local absolute paths as post-login targets.
pub fn is_safe_redirect(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//") && !target.contains('\\')
}

fn split_query(path: &str) -> (&str, Option<&str>) {
    match path.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path, None),
    }
}

fn resolve_note_route(path: &str) -> Option<Route> {
    let trimmed = path.strip_prefix('/')?.strip_suffix('/')?;
    let (prefix, slug) = trimmed.split_once('/')?;
    if !is_valid_slug(slug) {
        return None;
    }
    let route = match prefix {
        "note" => Route::Detail(slug.to_string()),
        "edit" => Route::Edit(slug.to_string()),
        "delete" => Route::Delete(slug.to_string()),
        _ => return None,
    };
    Some(route)
}

#[cfg(test)]
mod tests {
    use super::{is_safe_redirect, login_redirect, query_param, reverse, Route};

    #[test]
    fn named_routes_reverse_to_paths() {
        assert_eq!(reverse("home", None).as_deref(), Some("/"));
        assert_eq!(reverse("login", None).as_deref(), Some("/auth/login/"));
        assert_eq!(reverse("success", None).as_deref(), Some("/done/"));
        assert_eq!(
            reverse("edit", Some("note-1")).as_deref(),
            Some("/edit/note-1/")
        );
        assert_eq!(reverse("edit", None), None);
        assert_eq!(reverse("list", Some("note-1")), None);
    }

    #[test]
    fn every_route_resolves_back_from_its_path() {
        let routes = [
            Route::Home,
            Route::Login,
            Route::Logout,
            Route::Signup,
            Route::List,
            Route::Add,
            Route::Success,
            Route::Detail("slug-1".to_string()),
            Route::Edit("slug-1".to_string()),
            Route::Delete("slug_1".to_string()),
        ];
        for route in routes {
            assert_eq!(Route::resolve(&route.path()), Some(route.clone()), "{route:?}");
        }
    }

    #[test]
    fn resolve_ignores_query_and_rejects_unknown_paths() {
        assert_eq!(Route::resolve("/notes/?page=2"), Some(Route::List));
        assert_eq!(Route::resolve("/notes"), None);
        assert_eq!(Route::resolve("/note/"), None);
        assert_eq!(Route::resolve("/note/a/b/"), None);
        assert_eq!(Route::resolve("/note/bad slug/"), None);
        assert_eq!(Route::resolve("/unknown/x/"), None);
    }

    #[test]
    fn login_redirect_round_trips_next() {
        let location = login_redirect("/edit/note-1/");
        assert_eq!(location, "/auth/login/?next=/edit/note-1/");

        let with_query = login_redirect("/notes/?a=1&b=2");
        assert_eq!(with_query, "/auth/login/?next=/notes/%3Fa%3D1%26b%3D2");
        assert_eq!(
            query_param(&with_query, "next").as_deref(),
            Some("/notes/?a=1&b=2")
        );
    }

    #[test]
    fn query_param_decodes_plus_and_percent_escapes() {
        let path = "/auth/login/?next=%2Fnotes%2F&label=a+b%26c";
        assert_eq!(query_param(path, "next").as_deref(), Some("/notes/"));
        assert_eq!(query_param(path, "label").as_deref(), Some("a b&c"));
        assert_eq!(query_param(path, "missing"), None);
        assert_eq!(query_param("/auth/login/", "next"), None);
    }

    #[test]
    fn only_local_paths_are_safe_redirects() {
        assert!(is_safe_redirect("/notes/"));
        assert!(!is_safe_redirect("//evil.example/"));
        assert!(!is_safe_redirect("https://evil.example/"));
        assert!(!is_safe_redirect("/\\evil"));
    }
}
