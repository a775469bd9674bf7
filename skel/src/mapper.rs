//! Error-to-response mapping.
//!
//! Every [`RouteOutcome`] (or router error) resolves to one of two things:
//! a component to render, or a finished redirect. Expected failures are
//! turned into normal responses here so the transport never sees them.
//!
//! | Outcome                   | Resolution                                  |
//! |---------------------------|---------------------------------------------|
//! | `Component`               | render it                                   |
//! | `Opaque` (a component)    | render it                                   |
//! | `Opaque` (anything else)  | [`AppError::InvalidRouteResult`]            |
//! | `NotFound`                | 404 error page                              |
//! | `Unauthenticated`         | 303 to `login-url`                          |
//! | `Unauthorized`            | 303 to `home-url` with the access-denied text |
//! | router error              | 500 error page                              |

use crate::{App, AppError};
use serde_json::Value;
use skel_core::{BoxError, Component, Event, Response, RouteOutcome};
use tracing::{info, warn};

/// Configuration key of the redirect target for anonymous users.
pub const LOGIN_URL_KEY: &str = "login-url";
/// Configuration key of the redirect target for denied actions.
pub const HOME_URL_KEY: &str = "home-url";

const ERROR_TEMPLATE: &str = "<h1>##errorHeader##</h1><p>##errorText##</p>";
const ERROR_DETAIL_TEMPLATE: &str =
    "<h1>##errorHeader##</h1><p>##errorText##</p><pre>##errorDetail##</pre>";

const DEFAULT_ERROR_HEADER: &str = "Error!";
const DEFAULT_ERROR_TEXT: &str = "Sorry, there was an error processing your request.";

/// Redirect statuses the coordinator can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedirectStatus {
    /// 301
    MovedPermanently,
    /// 303, also used for 302.
    #[default]
    SeeOther,
    /// 307
    TemporaryRedirect,
    /// 308
    PermanentRedirect,
}

impl RedirectStatus {
    /// Numeric status code.
    pub fn code(&self) -> u16 {
        match self {
            RedirectStatus::MovedPermanently => 301,
            RedirectStatus::SeeOther => 303,
            RedirectStatus::TemporaryRedirect => 307,
            RedirectStatus::PermanentRedirect => 308,
        }
    }

    /// Fixed reason phrase.
    pub fn reason(&self) -> &'static str {
        match self {
            RedirectStatus::MovedPermanently => "Moved Permanently",
            RedirectStatus::SeeOther => "See Other",
            RedirectStatus::TemporaryRedirect => "Temporary Redirect",
            RedirectStatus::PermanentRedirect => "Permanent Redirect",
        }
    }
}

impl TryFrom<u16> for RedirectStatus {
    type Error = AppError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            301 => Ok(RedirectStatus::MovedPermanently),
            302 | 303 => Ok(RedirectStatus::SeeOther),
            307 => Ok(RedirectStatus::TemporaryRedirect),
            308 => Ok(RedirectStatus::PermanentRedirect),
            other => Err(AppError::UnsupportedRedirectCode(other)),
        }
    }
}

/// What a routed request resolved to.
#[derive(Debug)]
pub enum Resolution {
    /// A component to render; error pages included.
    Render(Component),
    /// A finished redirect. No component exists for it.
    Redirect(Response),
}

/// Builds an error page component.
pub fn error_page(code: u16, header: &str, text: &str, detail: Option<&str>) -> Component {
    let template = if detail.is_some() {
        ERROR_DETAIL_TEMPLATE
    } else {
        ERROR_TEMPLATE
    };
    let mut component = Component::inline(template)
        .with("errorCode", code)
        .with("errorHeader", header)
        .with("errorText", text)
        .with_status(code);
    if let Some(detail) = detail {
        component.set("errorDetail", detail);
    }
    component
}

impl App {
    /// Builds the error component for `code` and fires [`Event::Error`].
    ///
    /// `header` defaults to the `err-<code>-header` string and `text` to the
    /// `err-<code>-text` string, each with a generic fallback.
    pub fn error(
        &self,
        code: u16,
        header: Option<&str>,
        text: Option<&str>,
    ) -> Result<Component, AppError> {
        self.error_with_detail(code, header, text, None)
    }

    fn error_with_detail(
        &self,
        code: u16,
        header: Option<&str>,
        text: Option<&str>,
        detail: Option<&str>,
    ) -> Result<Component, AppError> {
        let header = match header {
            Some(header) => header.to_owned(),
            None => self.str(&format!("err-{code}-header"), DEFAULT_ERROR_HEADER)?,
        };
        let text = match text {
            Some(text) => text.to_owned(),
            None => self.str(&format!("err-{code}-text"), DEFAULT_ERROR_TEXT)?,
        };

        info!(code, "serving error page");
        let component = error_page(code, &header, &text, detail);
        self.notify(&Event::Error {
            component: &component,
            code,
        })?;
        Ok(component)
    }

    /// Builds a redirect to `url`.
    ///
    /// 302 is issued as 303; codes other than 301, 302, 303, 307 and 308
    /// fail with [`AppError::UnsupportedRedirectCode`]. [`Event::Redirect`]
    /// fires with the issued code before the response is built.
    pub fn redirect(&self, url: &str, code: u16) -> Result<Response, AppError> {
        let status = RedirectStatus::try_from(code)?;
        self.notify(&Event::Redirect {
            url,
            code: status.code(),
        })?;
        info!(url, code = status.code(), "redirecting");
        Ok(Response::redirect(status.code(), status.reason(), url))
    }

    /// Resolves a router result through the transition table.
    pub(crate) fn resolve(
        &self,
        routed: Result<RouteOutcome, BoxError>,
    ) -> Result<Resolution, AppError> {
        let outcome = match routed {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "router failed");
                let detail = self.execution_profile().exposes_errors().then(|| e.to_string());
                return self
                    .error_with_detail(500, None, None, detail.as_deref())
                    .map(Resolution::Render);
            }
        };

        match outcome {
            RouteOutcome::Component(component) => Ok(Resolution::Render(component)),
            RouteOutcome::Opaque(any) => match any.downcast::<Component>() {
                Ok(component) => Ok(Resolution::Render(*component)),
                Err(_) => Err(AppError::InvalidRouteResult),
            },
            RouteOutcome::NotFound => self.error(404, None, None).map(Resolution::Render),
            RouteOutcome::Unauthenticated => {
                self.notify(&Event::UnauthenticatedUser)?;
                let url = self.config_url(LOGIN_URL_KEY);
                self.redirect(&url, 303).map(Resolution::Redirect)
            }
            RouteOutcome::Unauthorized => {
                self.notify(&Event::UnauthorizedAction)?;
                let url = self.config_url(HOME_URL_KEY);
                let denied = self.str("err-access-denied", "")?;
                let response = self.redirect(&url, 303)?.with_body(denied);
                Ok(Resolution::Redirect(response))
            }
        }
    }

    fn config_url(&self, key: &str) -> String {
        self.config()
            .get_optional(key)
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .unwrap_or("/")
            .to_owned()
    }
}
