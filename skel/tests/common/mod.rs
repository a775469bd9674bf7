#![allow(dead_code)]

use skel::{
    App, BoxError, Component, Config, Request, RouteOutcome,
    testing::{FnRouter, MemoryStore},
};

// ============================================================================
// Fixtures
// ============================================================================

pub fn config(profile: &str) -> Config {
    let mut config = Config::default();
    config
        .set("exec-profile", profile)
        .set("context-root", "/srv/app")
        .set("web-root", "/srv/app/public")
        .set("login-url", "/login")
        .set("home-url", "/home");
    config
}

pub fn store() -> MemoryStore {
    MemoryStore::new()
        .with_string("err-404-text", "Nothing lives here.")
        .with_string("greeting", "Hello")
        .with_string("blank", "")
        .with_template("page.html", "<main>##body##</main>")
}

/// An app whose router always answers with `outcome`.
pub fn app_with<F>(route: F) -> App
where
    F: Fn(&Request) -> Result<RouteOutcome, BoxError> + Send + Sync + 'static,
{
    App::new(config("test"), store(), FnRouter::new(route)).unwrap()
}

pub fn page() -> Component {
    Component::named("page.html").with("body", "welcome")
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
