//! Typed requests, responses and page contexts.

use crate::form::auth_form::{LoginForm, SignupForm};
use crate::form::note_form::NoteForm;
use crate::form::FormData;
use crate::model::note::Note;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// GET and HEAD never change state.
    pub fn is_safe(self) -> bool {
        matches!(self, Self::Get | Self::Head)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "HEAD" => Ok(Self::Head),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            other => Err(format!("unsupported method `{other}`")),
        }
    }
}

/// One incoming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    /// Full path, including any query string.
    pub path: String,
    pub form: FormData,
    /// Session token presented by the caller.
    pub session: Option<String>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            form: FormData::new(),
            session: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>, form: FormData) -> Self {
        Self {
            form,
            ..Self::new(Method::Post, path)
        }
    }

    pub fn with_session(mut self, token: Option<String>) -> Self {
        self.session = token;
        self
    }
}

/// Rendered page context, serialized under a `page` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page {
    Home,
    Login {
        form: LoginForm,
        next: Option<String>,
    },
    LoggedOut,
    Signup {
        form: SignupForm,
    },
    NoteList {
        object_list: Vec<Note>,
    },
    NoteForm {
        form: NoteForm,
    },
    NoteDetail {
        note: Note,
    },
    NoteDelete {
        note: Note,
    },
    Success,
}

impl Page {
    /// Notes shown on the list page.
    pub fn object_list(&self) -> Option<&[Note]> {
        match self {
            Self::NoteList { object_list } => Some(object_list),
            _ => None,
        }
    }

    /// Form of the add and edit pages.
    pub fn note_form(&self) -> Option<&NoteForm> {
        match self {
            Self::NoteForm { form } => Some(form),
            _ => None,
        }
    }

    /// Note shown on the detail and delete pages.
    pub fn note(&self) -> Option<&Note> {
        match self {
            Self::NoteDetail { note } | Self::NoteDelete { note } => Some(note),
            _ => None,
        }
    }
}

/// Outcome of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Ok(Page),
    /// 302 to `location`. `session` is set when the response logs the caller in.
    Redirect {
        location: String,
        session: Option<String>,
    },
    NotFound,
    MethodNotAllowed,
    ServerError,
}

impl Response {
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect {
            location: location.into(),
            session: None,
        }
    }

    /// HTTP status code equivalent.
    pub fn status(&self) -> u16 {
        match self {
            Self::Ok(_) => 200,
            Self::Redirect { .. } => 302,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::ServerError => 500,
        }
    }

    pub fn page(&self) -> Option<&Page> {
        match self {
            Self::Ok(page) => Some(page),
            _ => None,
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Redirect { location, .. } => Some(location),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Method, Page, Response};

    #[test]
    fn method_parses_case_insensitively() {
        assert_eq!("post".parse::<Method>(), Ok(Method::Post));
        assert_eq!(" Get ".parse::<Method>(), Ok(Method::Get));
        assert!("TRACE".parse::<Method>().is_err());
    }

    #[test]
    fn status_codes_follow_http() {
        assert_eq!(Response::Ok(Page::Home).status(), 200);
        assert_eq!(Response::redirect("/done/").status(), 302);
        assert_eq!(Response::NotFound.status(), 404);
        assert_eq!(Response::MethodNotAllowed.status(), 405);
    }

    #[test]
    fn pages_serialize_with_tag() {
        let value = serde_json::to_value(Page::Success).unwrap();
        assert_eq!(value, serde_json::json!({ "page": "success" }));
    }
}
