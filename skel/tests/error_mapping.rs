use skel::{
    App, AppError, EventKind, ExecutionProfile, Request, RouteOutcome,
    testing::{FnRouter, MemoryStore, RecordingListener},
};

mod common;
use common::app_with;

fn record(app: &mut App, kinds: &[EventKind]) -> RecordingListener {
    let recorder = RecordingListener::new();
    for kind in kinds {
        app.register_listener(kind.clone(), "test", "record", recorder.clone())
            .unwrap();
    }
    recorder
}

#[tokio::test]
async fn test_not_found_renders_404_page() {
    let mut app = app_with(|_| Ok(RouteOutcome::NotFound));
    let recorder = record(&mut app, &[EventKind::Error, EventKind::ComponentCreated]);

    let response = app.respond(Request::get("/nowhere")).await.unwrap();

    assert_eq!(response.status(), 404);
    assert_eq!(response.reason(), "Not Found");
    let body = response.body_text();
    assert!(body.contains("404 - Not Found"));
    assert!(body.contains("Nothing lives here."));
    assert_eq!(recorder.names(), vec!["Error", "ComponentCreated"]);
    assert_eq!(recorder.details()[0], "404");
}

#[tokio::test]
async fn test_unauthenticated_redirects_to_login() {
    let mut app = app_with(|_| Ok(RouteOutcome::Unauthenticated));
    let recorder = record(
        &mut app,
        &[
            EventKind::UnauthenticatedUser,
            EventKind::Redirect,
            EventKind::ComponentCreated,
            EventKind::ResponseCreated,
        ],
    );

    let response = app.respond(Request::get("/account")).await.unwrap();

    assert_eq!(response.status(), 303);
    assert_eq!(response.reason(), "See Other");
    assert_eq!(response.location(), Some("/login"));
    assert_eq!(
        recorder.names(),
        vec!["UnauthenticatedUserException", "Redirect", "ResponseCreated"]
    );
    assert_eq!(recorder.details()[1], "303 /login");
}

#[tokio::test]
async fn test_unauthorized_redirects_home_with_message() {
    let mut app = app_with(|_| Ok(RouteOutcome::Unauthorized));
    let recorder = record(&mut app, &[EventKind::UnauthorizedAction, EventKind::Redirect]);

    let response = app.respond(Request::get("/admin")).await.unwrap();

    assert_eq!(response.status(), 303);
    assert_eq!(response.location(), Some("/home"));
    assert!(response.body_text().contains("Sorry, you can't do that"));
    assert_eq!(
        recorder.names(),
        vec!["UnauthorizedActionException", "Redirect"]
    );
}

#[tokio::test]
async fn test_redirect_targets_fall_back_to_root() {
    let mut values = common::config("test").values().clone();
    values.remove("login-url");
    let config = skel::Config::new(values);

    let router = FnRouter::new(|_: &Request| Ok(RouteOutcome::Unauthenticated));
    let mut app = App::new(config, MemoryStore::new(), router).unwrap();

    let response = app.respond(Request::get("/account")).await.unwrap();
    assert_eq!(response.location(), Some("/"));
}

#[tokio::test]
async fn test_router_error_renders_500_page() {
    let mut app = app_with(|_| Err("database unreachable".into()));

    let response = app.respond(Request::get("/")).await.unwrap();

    assert_eq!(response.status(), 500);
    let body = response.body_text();
    assert!(body.contains("Sorry, something went wrong"));
    assert!(body.contains("database unreachable"));
}

#[tokio::test]
async fn test_production_hides_error_detail() {
    let router = FnRouter::new(|_: &Request| Err("database unreachable".into()));
    let mut app = App::new(common::config("production"), MemoryStore::new(), router).unwrap();
    assert_eq!(app.execution_profile(), ExecutionProfile::Production);

    let response = app.respond(Request::get("/")).await.unwrap();

    assert_eq!(response.status(), 500);
    assert!(!response.body_text().contains("database unreachable"));
}

#[tokio::test]
async fn test_opaque_component_is_accepted() {
    let mut app = app_with(|_| Ok(RouteOutcome::opaque(common::page())));
    let response = app.respond(Request::get("/")).await.unwrap();
    assert_eq!(response.body_text(), "<main>welcome</main>");
}

#[tokio::test]
async fn test_non_component_result_is_fatal() {
    let mut app = app_with(|_| Ok(RouteOutcome::opaque("just a string")));
    let err = app.respond(Request::get("/")).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidRouteResult));
}

#[test]
fn test_redirect_codes() {
    let app = app_with(|_| Ok(RouteOutcome::NotFound));

    let found = app.redirect("/next", 302).unwrap();
    assert_eq!(found.status(), 303);
    assert_eq!(found.reason(), "See Other");

    let moved = app.redirect("/next", 301).unwrap();
    assert_eq!(moved.status_line(), "HTTP/1.1 301 Moved Permanently");

    let err = app.redirect("/next", 309).unwrap_err();
    assert!(matches!(err, AppError::UnsupportedRedirectCode(309)));
}

#[test]
fn test_error_component_defaults() {
    let app = app_with(|_| Ok(RouteOutcome::NotFound));

    let generic = app.error(418, None, None).unwrap();
    assert_eq!(generic.status(), 418);
    assert_eq!(generic.get("errorHeader").unwrap(), "Error!");
    assert_eq!(
        generic.get("errorText").unwrap(),
        "Sorry, there was an error processing your request."
    );

    let custom = app.error(403, Some("Nope"), Some("Go away")).unwrap();
    assert_eq!(custom.get("errorHeader").unwrap(), "Nope");
    assert_eq!(custom.get("errorText").unwrap(), "Go away");
}
