use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;
use threatfeed_core::{
    IncidentMetrics, NewIncident, INCIDENT_STATUSES, SEVERITY_LEVELS, THREAT_TYPES,
};
use tracing::{info, warn};

use crate::{
    page,
    session::{expired_session_cookie, session_cookie, CurrentUser},
    AppErr, AppState,
};

const LOGGED_REDIRECT: &str = "/?logged=true";

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

#[derive(Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    logged: bool,
}

#[derive(Deserialize)]
pub struct IncidentForm {
    date: String,
    category: String,
    severity: String,
    status: String,
    #[serde(default)]
    description: String,
}

pub async fn login_form() -> Html<String> {
    Html(page::login_page(None))
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppErr> {
    let (username, password) = (form.username.clone(), form.password);
    let user = state
        .with_connection(move |connection| connection.authenticate(&username, &password))
        .await?;

    match user {
        Some(user) => {
            info!(username = %user.username, "login succeeded");
            let id = state.sessions.start(user).await;
            Ok(([(SET_COOKIE, session_cookie(id))], Redirect::to("/")).into_response())
        }
        None => {
            warn!(username = %form.username, "login failed");
            Ok((
                StatusCode::UNAUTHORIZED,
                Html(page::login_page(Some("Invalid username or password."))),
            )
                .into_response())
        }
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(user) = state.sessions.end(&headers).await {
        info!(username = %user.username, "logged out");
    }
    ([(SET_COOKIE, expired_session_cookie())], Redirect::to("/login"))
}

pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
    headers: HeaderMap,
) -> Result<Response, AppErr> {
    let Some(user) = state.sessions.current_user(&headers).await else {
        return Ok((StatusCode::UNAUTHORIZED, Html(page::restricted_page())).into_response());
    };

    let incidents = state
        .with_connection(|connection| connection.get_all_incidents())
        .await?;
    let metrics = IncidentMetrics::from_batch(&incidents);
    let flash = query.logged.then_some("Incident logged successfully.");

    Ok(Html(page::dashboard_page(&user, &metrics, &incidents, flash)).into_response())
}

fn check_choice(field: &'static str, value: &str, allowed: &[&str]) -> Result<(), AppErr> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(AppErr::InvalidFieldErr {
            field,
            value: value.to_string(),
        })
    }
}

pub async fn log_incident(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<IncidentForm>,
) -> Result<Redirect, AppErr> {
    if form.date.trim().is_empty() {
        return Err(AppErr::InvalidFieldErr {
            field: "date",
            value: form.date,
        });
    }
    check_choice("category", &form.category, &THREAT_TYPES)?;
    check_choice("severity", &form.severity, &SEVERITY_LEVELS)?;
    check_choice("status", &form.status, &INCIDENT_STATUSES)?;

    let incident = NewIncident {
        date: form.date,
        category: form.category,
        severity: form.severity,
        status: form.status,
        description: form.description,
        reported_by: Some(user.username),
    };
    let id = state
        .with_connection(move |connection| connection.insert_incident(&incident))
        .await?;
    info!(id, "incident logged");

    Ok(Redirect::to(LOGGED_REDIRECT))
}

pub async fn incidents(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
) -> Result<Json<Vec<serde_json::Map<String, serde_json::Value>>>, AppErr> {
    let incidents = state
        .with_connection(|connection| connection.get_all_incidents())
        .await?;
    Ok(Json(incidents.to_records()))
}

pub async fn metrics(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
) -> Result<Json<IncidentMetrics>, AppErr> {
    let metrics = state
        .with_connection(|connection| {
            Ok(IncidentMetrics::from_batch(&connection.get_all_incidents()?))
        })
        .await?;
    Ok(Json(metrics))
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use axum::{
        body::{to_bytes, Body},
        http::{
            header::{CONTENT_TYPE, COOKIE, LOCATION},
            Request,
        },
        Router,
    };
    use threatfeed_core::{Connection, ConnectionErr};
    use tower::ServiceExt;

    use super::*;
    use crate::app;

    const TEST_DIR: &str = "../tmp";

    /// Database directory under the shared tmp dir, named after the test and
    /// removed when dropped.
    struct TestDb {
        dir: PathBuf,
    }

    impl TestDb {
        fn new(test_name: &str) -> Self {
            let dir = Path::new(TEST_DIR).join(format!("{test_name}$db"));
            let _ = std::fs::remove_dir_all(&dir);
            let connection = Connection::new(&dir).unwrap();
            connection.create_user("analyst", "s3cret", "analyst").unwrap();
            Self { dir }
        }
    }

    impl Drop for TestDb {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.dir);
        }
    }

    fn form_request(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn log_in(router: &Router) -> String {
        let response = router
            .clone()
            .oneshot(form_request("/login", "username=analyst&password=s3cret", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let set_cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_pages_require_login() {
        let db = TestDb::new("test_pages_require_login");
        let router = app(AppState::new(db.dir.clone()));

        let response = router.clone().oneshot(get_request("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_text(response).await.contains("Restricted access"));

        for uri in ["/api/incidents", "/api/metrics"] {
            let response = router.clone().oneshot(get_request(uri, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        let response = router
            .clone()
            .oneshot(form_request(
                "/incidents",
                "date=2024-03-01&category=Malware&severity=Low&status=Open",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bad_credentials_are_rejected() {
        let db = TestDb::new("test_bad_credentials_are_rejected");
        let router = app(AppState::new(db.dir.clone()));

        let response = router
            .oneshot(form_request("/login", "username=analyst&password=wrong", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(SET_COOKIE).is_none());
        assert!(body_text(response).await.contains("Invalid username or password."));
    }

    #[tokio::test]
    async fn test_log_incident_flow() {
        let db = TestDb::new("test_log_incident_flow");
        let router = app(AppState::new(db.dir.clone()));
        let cookie = log_in(&router).await;

        let response = router
            .clone()
            .oneshot(form_request(
                "/incidents",
                "date=2024-03-01&category=Phishing&severity=Critical&status=Open&description=fake+invoice",
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], LOGGED_REDIRECT);

        let response = router
            .clone()
            .oneshot(get_request(LOGGED_REDIRECT, Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Incident logged successfully."));
        assert!(html.contains("fake invoice"));

        let response = router
            .clone()
            .oneshot(get_request("/api/metrics", Some(&cookie)))
            .await
            .unwrap();
        let metrics: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(metrics["total"], 1);
        assert_eq!(metrics["critical"], 1);
        assert_eq!(metrics["open"], 1);

        let response = router
            .clone()
            .oneshot(get_request("/api/incidents", Some(&cookie)))
            .await
            .unwrap();
        let incidents: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(incidents[0]["reported_by"], "analyst");
        assert_eq!(incidents[0]["category"], "Phishing");
    }

    #[tokio::test]
    async fn test_log_incident_rejects_unknown_choices() {
        let db = TestDb::new("test_log_incident_rejects_unknown_choices");
        let router = app(AppState::new(db.dir.clone()));
        let cookie = log_in(&router).await;

        let response = router
            .clone()
            .oneshot(form_request(
                "/incidents",
                "date=2024-03-01&category=Spam&severity=Low&status=Open",
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let count = Connection::new(&db.dir)
            .unwrap()
            .get_all_incidents()
            .unwrap()
            .len();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let db = TestDb::new("test_logout_ends_session");
        let router = app(AppState::new(db.dir.clone()));
        let cookie = log_in(&router).await;

        let response = router
            .clone()
            .oneshot(form_request("/logout", "", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/login");

        let response = router
            .clone()
            .oneshot(get_request("/api/metrics", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_connection_failure_is_server_error() {
        let db = TestDb::new("test_connection_failure_is_server_error");
        let state = AppState::new(db.dir.clone());

        let exists = state
            .with_connection(|connection| connection.user_exists("analyst"))
            .await
            .unwrap();
        assert!(exists);

        let blocker = Path::new(TEST_DIR).join("test_connection_failure_is_server_error$file");
        std::fs::write(&blocker, "occupied").unwrap();
        let err = AppState::new(blocker.join("db"))
            .with_connection(|connection| connection.user_exists("analyst"))
            .await
            .unwrap_err();
        std::fs::remove_file(&blocker).unwrap();
        assert!(matches!(
            err,
            AppErr::ConnectionErr(ConnectionErr::DatabaseCreationErr { .. })
        ));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
