//! Integration tests for the admin mail-configuration pages.

use dugout::testing::{get, post, seed_admin, seed_subscriber, test_app, TestApp};

const VALID_FORM: [(&str, &str); 6] = [
    ("username", "mailer"),
    ("password", "secret"),
    ("from_email", "reports@example.com"),
    ("smtp_host", "smtp.example.com"),
    ("port", "465"),
    ("ssl", "on"),
];

async fn admin_cookie(app: &TestApp) -> String {
    seed_admin(&app.ctx, "admin@example.com", "hunter2").await;
    post(app.router(), "/login")
        .form_body(&[("email", "admin@example.com"), ("password", "hunter2")])
        .execute()
        .await
        .assert_redirect("/today")
        .session_cookie()
        .expect("login should set a session cookie")
}

// ============================================================================
// Access control
// ============================================================================

#[tokio::test]
async fn test_config_requires_login() {
    let app = test_app().await;

    get(app.router(), "/config")
        .execute()
        .await
        .assert_redirect("/login");
}

#[tokio::test]
async fn test_config_requires_admin() {
    let app = test_app().await;
    seed_subscriber(&app.ctx, "casey@example.com").await;

    let cookie = post(app.router(), "/login")
        .form_body(&[("email", "casey@example.com"), ("password", "password")])
        .execute()
        .await
        .assert_redirect("/today")
        .session_cookie()
        .expect("login should set a session cookie");

    get(app.router(), "/config")
        .cookie(&cookie)
        .execute()
        .await
        .assert_forbidden();

    post(app.router(), "/config/add")
        .cookie(&cookie)
        .form_body(&VALID_FORM)
        .execute()
        .await
        .assert_forbidden();
}

// ============================================================================
// Empty state
// ============================================================================

#[tokio::test]
async fn test_config_view_redirects_to_add_when_empty() {
    let app = test_app().await;
    let cookie = admin_cookie(&app).await;

    get(app.router(), "/config")
        .cookie(&cookie)
        .execute()
        .await
        .assert_redirect("/config/add");
}

#[tokio::test]
async fn test_edit_form_redirects_to_add_when_empty() {
    let app = test_app().await;
    let cookie = admin_cookie(&app).await;

    get(app.router(), "/config/edit")
        .cookie(&cookie)
        .execute()
        .await
        .assert_redirect("/config/add");
}

#[tokio::test]
async fn test_add_form_renders_when_empty() {
    let app = test_app().await;
    let cookie = admin_cookie(&app).await;

    get(app.router(), "/config/add")
        .cookie(&cookie)
        .execute()
        .await
        .assert_ok()
        .assert_contains("Add Mail Configuration")
        .await;
}

// ============================================================================
// Adding a configuration
// ============================================================================

#[tokio::test]
async fn test_add_then_view_shows_the_row() {
    let app = test_app().await;
    let cookie = admin_cookie(&app).await;

    post(app.router(), "/config/add")
        .cookie(&cookie)
        .form_body(&VALID_FORM)
        .execute()
        .await
        .assert_redirect("/config");

    let body = get(app.router(), "/config")
        .cookie(&cookie)
        .execute()
        .await
        .assert_ok()
        .body_string()
        .await;

    assert!(body.contains("Site config added successfully."));
    assert!(body.contains("smtp.example.com"));
    assert!(body.contains("465"));
    assert!(body.contains("SSL"));
}

#[tokio::test]
async fn test_second_add_is_refused() {
    let app = test_app().await;
    let cookie = admin_cookie(&app).await;

    post(app.router(), "/config/add")
        .cookie(&cookie)
        .form_body(&VALID_FORM)
        .execute()
        .await
        .assert_redirect("/config");

    post(app.router(), "/config/add")
        .cookie(&cookie)
        .form_body(&VALID_FORM)
        .execute()
        .await
        .assert_redirect("/config");

    get(app.router(), "/config")
        .cookie(&cookie)
        .execute()
        .await
        .assert_ok()
        .assert_contains("Site config already exists.")
        .await;
}

#[tokio::test]
async fn test_add_form_redirects_away_once_configured() {
    let app = test_app().await;
    let cookie = admin_cookie(&app).await;

    post(app.router(), "/config/add")
        .cookie(&cookie)
        .form_body(&VALID_FORM)
        .execute()
        .await
        .assert_redirect("/config");

    get(app.router(), "/config/add")
        .cookie(&cookie)
        .execute()
        .await
        .assert_redirect("/config");
}

#[tokio::test]
async fn test_invalid_add_re_renders_with_messages() {
    let app = test_app().await;
    let cookie = admin_cookie(&app).await;

    let body = post(app.router(), "/config/add")
        .cookie(&cookie)
        .form_body(&[
            ("username", ""),
            ("password", "secret"),
            ("from_email", "not-an-address"),
            ("smtp_host", "smtp.example.com"),
            ("port", "465"),
        ])
        .execute()
        .await
        .assert_ok()
        .body_string()
        .await;

    assert!(body.contains("username: is required"));
    assert!(body.contains("from_email: must be a valid email address"));
    // Nothing was stored
    let stored = app.ctx.settings.any_settings().await.unwrap();
    assert!(!stored);
}

// ============================================================================
// Editing a configuration
// ============================================================================

#[tokio::test]
async fn test_edit_form_prefills_the_stored_row() {
    let app = test_app().await;
    let cookie = admin_cookie(&app).await;

    post(app.router(), "/config/add")
        .cookie(&cookie)
        .form_body(&VALID_FORM)
        .execute()
        .await
        .assert_redirect("/config");

    let body = get(app.router(), "/config/edit")
        .cookie(&cookie)
        .execute()
        .await
        .assert_ok()
        .body_string()
        .await;

    assert!(body.contains("Edit Mail Configuration"));
    assert!(body.contains("smtp.example.com"));
    assert!(body.contains("reports@example.com"));
}

#[tokio::test]
async fn test_edit_updates_and_lands_on_the_config_view() {
    let app = test_app().await;
    let cookie = admin_cookie(&app).await;

    post(app.router(), "/config/add")
        .cookie(&cookie)
        .form_body(&VALID_FORM)
        .execute()
        .await
        .assert_redirect("/config");

    let body = post(app.router(), "/config/edit")
        .cookie(&cookie)
        .form_body(&[
            ("username", "mailer"),
            ("password", "secret"),
            ("from_email", "reports@example.com"),
            ("smtp_host", "mail.example.net"),
            ("port", "587"),
        ])
        .execute()
        .await
        .assert_ok()
        .body_string()
        .await;

    assert!(body.contains("Site config updated successfully."));
    assert!(body.contains("mail.example.net"));
    assert!(body.contains("587"));
    // The checkbox was unchecked, so the transport switched off SSL
    assert!(body.contains("Plaintext with login"));
}

// ============================================================================
// Health reflects configuration
// ============================================================================

#[tokio::test]
async fn test_health_turns_healthy_once_configured() {
    let app = test_app().await;
    let cookie = admin_cookie(&app).await;

    let before: serde_json::Value = get(app.router(), "/health")
        .execute()
        .await
        .assert_ok()
        .json()
        .await;
    assert_eq!(before["status"], "degraded");

    post(app.router(), "/config/add")
        .cookie(&cookie)
        .form_body(&VALID_FORM)
        .execute()
        .await
        .assert_redirect("/config");

    let after: serde_json::Value = get(app.router(), "/health")
        .execute()
        .await
        .assert_ok()
        .json()
        .await;
    assert_eq!(after["status"], "healthy");
}
