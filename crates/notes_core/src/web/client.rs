//! In-process client that keeps a session across requests.

use crate::form::FormData;
use crate::model::user::User;
use crate::service::auth_service::AuthError;
use crate::web::app::NotesApp;
use crate::web::http::{Method, Page, Request, Response};

/// Cookie-jar style client bound to one application.
///
/// Several clients may share one app, each acting as a different user.
pub struct Client<'app> {
    app: &'app NotesApp,
    session: Option<String>,
}

impl<'app> Client<'app> {
    /// Anonymous client.
    pub fn new(app: &'app NotesApp) -> Self {
        Self { app, session: None }
    }

    /// Logs in as `user` without a password.
    pub fn force_login(&mut self, user: &User) -> Result<(), AuthError> {
        let token = self.app.auth()?.force_login(user.id)?;
        self.session = Some(token);
        Ok(())
    }

    /// Logs in through the login endpoint. Returns whether it succeeded.
    pub fn login(&mut self, username: &str, password: &str) -> bool {
        let form = form_data(&[("username", username), ("password", password)]);
        let response = self.post("/auth/login/", form);
        matches!(response, Response::Redirect { session: Some(_), .. })
    }

    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    pub fn get(&mut self, path: &str) -> Response {
        self.request(Method::Get, path, FormData::new())
    }

    pub fn post(&mut self, path: &str, form: FormData) -> Response {
        self.request(Method::Post, path, form)
    }

    /// Sends a request and applies session changes carried by the response.
    pub fn request(&mut self, method: Method, path: &str, form: FormData) -> Response {
        let request = Request {
            method,
            path: path.to_string(),
            form,
            session: self.session.clone(),
        };
        let response = self.app.handle(&request);
        match &response {
            Response::Redirect {
                session: Some(token),
                ..
            } => self.session = Some(token.clone()),
            Response::Ok(Page::LoggedOut) => self.session = None,
            _ => {}
        }
        response
    }
}

/// Builds form data from string pairs.
pub fn form_data(pairs: &[(&str, &str)]) -> FormData {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}
