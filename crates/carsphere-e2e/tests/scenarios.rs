//! Scenario suite for the CarSphere harness.
//!
//! Each test is an independent scenario: it builds a scripted application
//! fixture, binds one session to it, and drives page capabilities exactly the
//! way a live run drives the deployed application.

use std::path::Path;

use carsphere_e2e::config::WaitSettings;
use carsphere_e2e::driver::{DomEdit, MockElement};
use carsphere_e2e::prelude::*;

/// Queries describing the deployed application's DOM, used to script the
/// fixture. These mirror the locators the pages resolve.
mod app {
    use carsphere_e2e::ElementQuery;

    pub fn username_input() -> ElementQuery {
        ElementQuery::xpath("//div/input[@id='username']")
    }

    pub fn password_input() -> ElementQuery {
        ElementQuery::xpath("//div/input[@id='password']")
    }

    pub fn login_button() -> ElementQuery {
        ElementQuery::xpath("//form/button[@type='submit']")
    }

    pub fn success_banner() -> ElementQuery {
        ElementQuery::css(".alert.alert-success")
    }

    pub fn danger_banner() -> ElementQuery {
        ElementQuery::css(".alert.alert-danger")
    }

    pub fn logout_link() -> ElementQuery {
        ElementQuery::xpath("//a[contains(text(), 'Sign Out')]")
    }

    pub fn add_car_link() -> ElementQuery {
        ElementQuery::xpath("//nav/a[@href='/add_car']")
    }

    pub fn delete_buttons() -> ElementQuery {
        ElementQuery::xpath("//div[@class='car-item']/form/button[@class='btn btn-danger']")
    }

    pub fn make_input() -> ElementQuery {
        ElementQuery::xpath("//input[@id='make']")
    }

    pub fn model_input() -> ElementQuery {
        ElementQuery::xpath("//input[@id='model']")
    }

    pub fn year_options() -> ElementQuery {
        ElementQuery::xpath("//select/option")
    }

    pub fn director_input() -> ElementQuery {
        ElementQuery::xpath("//input[@id='director']")
    }

    pub fn settings_input() -> ElementQuery {
        ElementQuery::id("main_settings")
    }

    pub fn description_input() -> ElementQuery {
        ElementQuery::xpath("//div/textarea[@name='description']")
    }

    pub fn image_input() -> ElementQuery {
        ElementQuery::xpath("//input[@id='image_file']")
    }

    pub fn add_car_submit() -> ElementQuery {
        ElementQuery::xpath("//input[@id='submit']")
    }

    pub fn catalog_links() -> ElementQuery {
        ElementQuery::xpath("//div/div/div/a")
    }

    pub fn review_input() -> ElementQuery {
        ElementQuery::xpath("//form/textarea")
    }

    pub fn review_submit() -> ElementQuery {
        ElementQuery::id("submit")
    }

    pub fn review_entries() -> ElementQuery {
        ElementQuery::xpath("//ul/li")
    }

    pub fn ai_review_button() -> ElementQuery {
        ElementQuery::id("ai-review-button")
    }

    pub fn ai_review_input() -> ElementQuery {
        ElementQuery::id("review-input")
    }

    pub fn linkedin_icon() -> ElementQuery {
        ElementQuery::xpath("//p/a/img[@class='linkedin-icon']")
    }

    pub fn branding_icon() -> ElementQuery {
        ElementQuery::class_name("branding-icon")
    }

    pub fn body() -> ElementQuery {
        ElementQuery::tag("body")
    }

    pub fn nav_links() -> ElementQuery {
        ElementQuery::xpath("//nav/a")
    }

    pub fn first_name_input() -> ElementQuery {
        ElementQuery::xpath("//input[@id='firstname']")
    }

    pub fn last_name_input() -> ElementQuery {
        ElementQuery::xpath("//input[@id='lastname']")
    }

    pub fn register_username_input() -> ElementQuery {
        ElementQuery::xpath("//input[@id='username']")
    }

    pub fn register_password_input() -> ElementQuery {
        ElementQuery::xpath("//input[@id='password']")
    }

    pub fn confirm_password_input() -> ElementQuery {
        ElementQuery::xpath("//input[@id='confirm_password']")
    }

    pub fn signup_button() -> ElementQuery {
        ElementQuery::xpath("//button[text()='Sign Up']")
    }

    pub fn mismatch_alert() -> ElementQuery {
        ElementQuery::id("confirm_pass")
    }
}

fn fast_config() -> HarnessConfig {
    HarnessConfig {
        wait: WaitSettings {
            element_ms: 500,
            poll_ms: 10,
            generation_ms: 500,
        },
        ..HarnessConfig::default()
    }
}

fn harness() -> (carsphere_e2e::MockDriver, Session) {
    carsphere_e2e::logging::init();
    let mock = carsphere_e2e::MockDriver::new();
    let session = Session::new(Box::new(mock.clone()), fast_config()).unwrap();
    (mock, session)
}

fn seed_login_form(mock: &carsphere_e2e::MockDriver) {
    mock.add_element(
        &app::username_input(),
        MockElement::new("username", "input"),
    );
    mock.add_element(
        &app::password_input(),
        MockElement::new("password", "input"),
    );
    mock.add_element(&app::login_button(), MockElement::new("login", "button"));
    mock.add_element(
        &app::success_banner(),
        MockElement::new("banner-success", "div"),
    );
    mock.add_element(
        &app::danger_banner(),
        MockElement::new("banner-danger", "div"),
    );
}

fn banner_after_click(
    mock: &carsphere_e2e::MockDriver,
    element_id: &str,
    text: &str,
) {
    mock.on_click(
        element_id,
        vec![DomEdit::SetText {
            query: app::success_banner(),
            index: 0,
            text: text.to_string(),
        }],
    );
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn admin_login_with_valid_credentials_shows_welcome_banner() {
    let (mock, session) = harness();
    seed_login_form(&mock);
    banner_after_click(&mock, "login", outcome::ADMIN_WELCOME);

    let login_page = LoginPage::new(&session);
    login_page.open().await.unwrap();
    login_page.login("admin", "admin").await.unwrap();

    assert_eq!(
        login_page.success_banner().await.unwrap(),
        "Welcome, Administrator Manager!"
    );
    assert!(login_page.is_login_successful().await.unwrap());
    assert!(mock.was_called("fill:username:admin"));
    assert!(mock.was_called("fill:password:admin"));
}

#[tokio::test]
async fn login_with_invalid_credentials_shows_danger_banner() {
    let (mock, session) = harness();
    seed_login_form(&mock);
    mock.on_click(
        "login",
        vec![DomEdit::SetText {
            query: app::danger_banner(),
            index: 0,
            text: outcome::LOGIN_FAILED.to_string(),
        }],
    );

    let login_page = LoginPage::new(&session);
    login_page.open().await.unwrap();
    login_page.login("admin", "1234").await.unwrap();

    assert_eq!(
        login_page.danger_banner().await.unwrap(),
        "Login Unsuccessful. Please check username and password"
    );
}

#[tokio::test]
async fn login_then_logout_round_trip_yields_logout_confirmation() {
    let (mock, session) = harness();
    seed_login_form(&mock);
    mock.add_element(&app::logout_link(), MockElement::new("signout", "a"));
    banner_after_click(&mock, "login", outcome::welcome("user3", "user3").as_str());
    banner_after_click(&mock, "signout", outcome::LOGGED_OUT);

    let user = session.config().user.clone();
    let login_page = LoginPage::new(&session);
    login_page.open().await.unwrap();
    login_page.login(&user.username, &user.password).await.unwrap();
    assert_eq!(
        login_page.success_banner().await.unwrap(),
        "Welcome, user3 user3!"
    );

    login_page.logout().await.unwrap();
    assert_eq!(
        login_page.success_banner().await.unwrap(),
        "You have been logged out."
    );
}

// ============================================================================
// Admin-only action visibility
// ============================================================================

#[tokio::test]
async fn admin_sees_add_car_and_delete_controls() {
    let (mock, session) = harness();
    mock.add_element(&app::add_car_link(), MockElement::new("add-car", "a"));
    mock.add_elements(
        &app::delete_buttons(),
        (0..7)
            .map(|i| MockElement::new(format!("delete-{i}"), "button"))
            .collect(),
    );

    let dashboard = DashboardPage::new(&session);
    dashboard.open().await.unwrap();

    assert!(dashboard.is_add_car_visible().await.unwrap());
    assert!(dashboard.delete_controls_visible().await.unwrap());
}

#[tokio::test]
async fn non_admin_sees_neither_admin_control() {
    let (_mock, session) = harness();

    let dashboard = DashboardPage::new(&session);
    dashboard.open().await.unwrap();

    // Probes answer false on timeout instead of failing the scenario.
    assert!(!dashboard.is_add_car_visible().await.unwrap());
    assert!(!dashboard.delete_controls_visible().await.unwrap());
}

// ============================================================================
// Catalog mutation
// ============================================================================

fn seed_add_car_form(mock: &carsphere_e2e::MockDriver) {
    mock.add_element(&app::add_car_link(), MockElement::new("add-car", "a"));
    mock.add_element(&app::make_input(), MockElement::new("make", "input"));
    mock.add_element(&app::model_input(), MockElement::new("model", "input"));
    mock.add_elements(
        &app::year_options(),
        (2007..2025)
            .map(|year| {
                MockElement::new(format!("year-{year}"), "option").with_text(year.to_string())
            })
            .collect(),
    );
    mock.add_element(&app::director_input(), MockElement::new("director", "input"));
    mock.add_element(&app::settings_input(), MockElement::new("settings", "input"));
    mock.add_element(
        &app::description_input(),
        MockElement::new("description", "textarea"),
    );
    mock.add_element(&app::image_input(), MockElement::new("image", "input"));
    mock.add_element(&app::add_car_submit(), MockElement::new("submit-car", "input"));
    mock.add_element(
        &app::success_banner(),
        MockElement::new("banner-success", "div"),
    );
}

#[tokio::test]
async fn add_car_confirms_only_the_exact_banner_text() {
    let (mock, session) = harness();
    seed_add_car_form(&mock);
    banner_after_click(&mock, "submit-car", "Car Tesla123 ModelY456 added successfully!");

    let dashboard = DashboardPage::new(&session);
    dashboard.open().await.unwrap();
    dashboard.open_add_car_form().await.unwrap();

    let listing = CarListing::new("Tesla123", "ModelY456")
        .with_director("Auto Director 042")
        .with_settings("Auto Settings 042")
        .with_description("Auto Description 042");

    let years = dashboard.year_options().await.unwrap();
    assert_eq!(years.len(), 18);
    let added = dashboard
        .add_car(&listing, &years[3], Path::new("test_images/AutoTestCar.jpg"))
        .await
        .unwrap();

    assert!(added);
    assert!(mock.was_called("click:year-2010"));
    assert!(mock.was_called("attach:image:test_images/AutoTestCar.jpg"));
}

#[tokio::test]
async fn add_car_rejects_a_mismatched_banner() {
    let (mock, session) = harness();
    seed_add_car_form(&mock);
    banner_after_click(&mock, "submit-car", "Car Tesla123 ModelX999 added successfully!");

    let dashboard = DashboardPage::new(&session);
    let listing = CarListing::new("Tesla123", "ModelY456");
    let years = dashboard.year_options().await.unwrap();

    let added = dashboard
        .add_car(&listing, &years[0], Path::new("test_images/AutoTestCar.jpg"))
        .await
        .unwrap();
    assert!(!added);
}

#[tokio::test]
async fn delete_refuses_at_the_safety_floor_without_clicking() {
    let (mock, session) = harness();
    mock.add_elements(
        &app::delete_buttons(),
        (0..CATALOG_SAFETY_FLOOR)
            .map(|i| MockElement::new(format!("delete-{i}"), "button"))
            .collect(),
    );

    let dashboard = DashboardPage::new(&session);
    let deleted = dashboard.delete_last_car().await.unwrap();

    assert!(!deleted);
    assert!(!mock.was_called("click:"));
}

#[tokio::test]
async fn delete_above_the_floor_clicks_the_last_control() {
    let (mock, session) = harness();
    mock.add_elements(
        &app::delete_buttons(),
        (0..7)
            .map(|i| MockElement::new(format!("delete-{i}"), "button"))
            .collect(),
    );
    mock.add_element(
        &app::success_banner(),
        MockElement::new("banner-success", "div"),
    );
    mock.on_click(
        "delete-6",
        vec![
            DomEdit::SetText {
                query: app::success_banner(),
                index: 0,
                text: outcome::CAR_DELETED.to_string(),
            },
            DomEdit::RemoveLast {
                query: app::delete_buttons(),
            },
        ],
    );

    let dashboard = DashboardPage::new(&session);
    let deleted = dashboard.delete_last_car().await.unwrap();

    assert!(deleted);
    assert!(mock.was_called("click:delete-6"));
    assert!(!mock.was_called("click:delete-0"));
}

// ============================================================================
// Reviews
// ============================================================================

#[tokio::test]
async fn manual_review_is_confirmed_and_listed() {
    let (mock, session) = harness();
    mock.add_elements(
        &app::catalog_links(),
        vec![
            MockElement::new("car-0", "a"),
            MockElement::new("car-1", "a"),
            MockElement::new("car-2", "a"),
        ],
    );
    mock.add_element(
        &app::review_input(),
        MockElement::new("review-text", "textarea"),
    );
    mock.add_element(
        &app::review_submit(),
        MockElement::new("submit-review", "input"),
    );
    mock.add_element(
        &app::success_banner(),
        MockElement::new("banner-success", "div"),
    );
    mock.add_element(
        &app::review_entries(),
        MockElement::new("review-0", "li").with_text("admin: first!"),
    );
    mock.on_click(
        "submit-review",
        vec![
            DomEdit::SetText {
                query: app::success_banner(),
                index: 0,
                text: outcome::REVIEW_ADDED.to_string(),
            },
            DomEdit::Insert {
                query: app::review_entries(),
                element: MockElement::new("review-1", "li")
                    .with_text("user3: Auto Manual Review123"),
            },
        ],
    );

    let dashboard = DashboardPage::new(&session);
    dashboard.open().await.unwrap();
    dashboard.open_last_car().await.unwrap();
    assert!(mock.was_called("click:car-2"));

    dashboard
        .submit_review("Auto Manual Review123")
        .await
        .unwrap();

    assert_eq!(
        dashboard.success_banner().await.unwrap(),
        "Review added successfully!"
    );
    assert_eq!(
        dashboard.latest_review().await.unwrap(),
        "user3: Auto Manual Review123"
    );
}

#[tokio::test]
async fn ai_review_is_generated_then_submitted() {
    let (mock, session) = harness();
    mock.add_element(
        &app::ai_review_button(),
        MockElement::new("ai-button", "button"),
    );
    mock.add_element(
        &app::ai_review_input(),
        MockElement::new("review-input", "textarea")
            .with_value_after(3, "AI says: this car is great"),
    );
    mock.add_element(
        &app::review_submit(),
        MockElement::new("submit-review", "input"),
    );
    mock.add_element(
        &app::success_banner(),
        MockElement::new("banner-success", "div"),
    );
    banner_after_click(&mock, "submit-review", outcome::REVIEW_ADDED);

    let dashboard = DashboardPage::new(&session);
    let review = dashboard.request_ai_review().await.unwrap();
    assert_eq!(review, "AI says: this car is great");

    dashboard.submit_ai_review().await.unwrap();
    assert_eq!(
        dashboard.success_banner().await.unwrap(),
        "Review added successfully!"
    );
}

#[tokio::test]
async fn ai_generation_timeout_is_not_a_not_found() {
    let (mock, session) = harness();
    mock.add_element(
        &app::ai_review_button(),
        MockElement::new("ai-button", "button"),
    );
    // Field renders but its value never arrives.
    mock.add_element(
        &app::ai_review_input(),
        MockElement::new("review-input", "textarea"),
    );

    let dashboard = DashboardPage::new(&session);
    let err = dashboard.request_ai_review().await.unwrap_err();
    assert!(err.is_generation_timeout());
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn ai_review_field_never_rendering_is_not_found() {
    let (mock, session) = harness();
    mock.add_element(
        &app::ai_review_button(),
        MockElement::new("ai-button", "button"),
    );

    let dashboard = DashboardPage::new(&session);
    let err = dashboard.request_ai_review().await.unwrap_err();
    assert!(err.is_not_found());
}

// ============================================================================
// Gallery GUI and redirections
// ============================================================================

#[tokio::test]
async fn gallery_background_and_branding_read_expected_sources() {
    let (mock, session) = harness();
    mock.add_element(
        &app::body(),
        MockElement::new("body", "body").with_css(
            "background-image",
            "url(\"https://carsphere.onrender.com/static/background_image/background_showroom.jpg\")",
        ),
    );
    mock.add_element(
        &app::branding_icon(),
        MockElement::new("branding", "img").with_attribute(
            "src",
            "https://carsphere.onrender.com/static/background_image/branding.png",
        ),
    );

    let dashboard = DashboardPage::new(&session);
    dashboard.open().await.unwrap();

    assert_eq!(
        dashboard.background_image().await.unwrap(),
        "url(\"https://carsphere.onrender.com/static/background_image/background_showroom.jpg\")"
    );
    assert_eq!(
        dashboard.branding_icon_src().await.unwrap().as_deref(),
        Some("https://carsphere.onrender.com/static/background_image/branding.png")
    );
}

#[tokio::test]
async fn linkedin_icon_opens_profile_in_secondary_window() {
    let (mock, session) = harness();
    mock.add_element(
        &app::linkedin_icon(),
        MockElement::new("linkedin", "img"),
    );
    mock.on_click(
        "linkedin",
        vec![DomEdit::OpenWindow {
            url: "https://www.linkedin.com/in/israel-wasserman/".to_string(),
        }],
    );

    let dashboard = DashboardPage::new(&session);
    dashboard.open().await.unwrap();

    let url = dashboard.open_linkedin_profile().await.unwrap();
    assert!(url.contains("israel-wasserman"));
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn registration_navigates_through_the_nav_link() {
    let (mock, session) = harness();
    mock.add_elements(
        &app::nav_links(),
        vec![
            MockElement::new("nav-login", "a")
                .with_attribute("href", "https://carsphere.onrender.com/login"),
            MockElement::new("nav-register", "a")
                .with_attribute("href", "https://carsphere.onrender.com/register"),
        ],
    );

    let register = RegisterPage::new(&session);
    register.open_via_nav().await.unwrap();
    assert!(mock.was_called("click:nav-register"));
    assert!(!mock.was_called("click:nav-login"));
}

fn seed_registration_form(mock: &carsphere_e2e::MockDriver) {
    mock.add_element(
        &app::first_name_input(),
        MockElement::new("firstname", "input"),
    );
    mock.add_element(
        &app::last_name_input(),
        MockElement::new("lastname", "input"),
    );
    mock.add_element(
        &app::register_username_input(),
        MockElement::new("reg-username", "input"),
    );
    mock.add_element(
        &app::register_password_input(),
        MockElement::new("reg-password", "input"),
    );
    mock.add_element(
        &app::confirm_password_input(),
        MockElement::new("confirm-password", "input"),
    );
    mock.add_element(&app::signup_button(), MockElement::new("signup", "button"));
}

#[tokio::test]
async fn mismatched_passwords_surface_the_inline_alert_in_red() {
    let (mock, session) = harness();
    seed_registration_form(&mock);
    mock.add_element(
        &app::mismatch_alert(),
        MockElement::new("confirm-alert", "span").with_css("color", "rgba(255, 0, 0, 1)"),
    );
    mock.on_click(
        "signup",
        vec![DomEdit::SetText {
            query: app::mismatch_alert(),
            index: 0,
            text: outcome::PASSWORD_MISMATCH.to_string(),
        }],
    );

    let username = carsphere_e2e::testdata::random_username("admin user3 user7");
    let register = RegisterPage::new(&session);
    let registration = Registration::new(
        "QAAuto_FirstName",
        "QAAuto_LastName",
        username,
        carsphere_e2e::testdata::REGISTRATION_PASSWORD,
    )
    .with_confirmation("8888");
    register.submit_registration(&registration).await.unwrap();

    let (text, color) = register.mismatch_alert().await.unwrap();
    assert_eq!(text, "Passwords are not match");
    assert_eq!(color, outcome::PASSWORD_MISMATCH_COLOR);
}

#[tokio::test]
async fn fresh_username_registers_and_lands_logged_in() {
    let (mock, session) = harness();
    seed_registration_form(&mock);
    mock.add_element(
        &app::success_banner(),
        MockElement::new("banner-success", "div"),
    );
    banner_after_click(
        &mock,
        "signup",
        outcome::registration_welcome("QAAuto_FirstName", "QAAuto_LastName").as_str(),
    );

    let username = carsphere_e2e::testdata::random_username("admin user3 user7");
    let register = RegisterPage::new(&session);
    let registration = Registration::new(
        "QAAuto_FirstName",
        "QAAuto_LastName",
        username,
        carsphere_e2e::testdata::REGISTRATION_PASSWORD,
    );
    register.submit_registration(&registration).await.unwrap();

    assert_eq!(
        register.success_banner().await.unwrap(),
        outcome::registration_welcome("QAAuto_FirstName", "QAAuto_LastName")
    );
}

#[tokio::test]
async fn duplicate_username_is_rejected_with_the_exact_alert() {
    let (mock, session) = harness();
    seed_registration_form(&mock);
    mock.add_element(
        &app::danger_banner(),
        MockElement::new("banner-danger", "div"),
    );
    mock.on_click(
        "signup",
        vec![DomEdit::SetText {
            query: app::danger_banner(),
            index: 0,
            text: outcome::duplicate_username("user3"),
        }],
    );

    let register = RegisterPage::new(&session);
    let registration =
        Registration::new("QAAuto_FirstName", "QAAuto_LastName", "user3", "1235");
    register.submit_registration(&registration).await.unwrap();

    assert_eq!(
        register.danger_banner().await.unwrap(),
        "Username 'user3' already exist, please try another username."
    );
}

// ============================================================================
// Capability composition
// ============================================================================

#[tokio::test]
async fn every_page_exposes_the_same_auth_locators() {
    let (_mock, session) = harness();

    let login = LoginPage::new(&session);
    let dashboard = DashboardPage::new(&session);
    let register = RegisterPage::new(&session);

    assert_eq!(login.auth(), dashboard.auth());
    assert_eq!(login.auth(), register.auth());
}

#[tokio::test]
async fn auth_actions_are_interchangeable_across_pages() {
    let (mock, session) = harness();
    seed_login_form(&mock);
    mock.add_element(&app::logout_link(), MockElement::new("signout", "a"));
    banner_after_click(&mock, "login", outcome::ADMIN_WELCOME);
    banner_after_click(&mock, "signout", outcome::LOGGED_OUT);

    // Log in through the dashboard capability, log out through the register
    // page; both delegate to the identical panel.
    let dashboard = DashboardPage::new(&session);
    let register = RegisterPage::new(&session);

    dashboard.login("admin", "admin").await.unwrap();
    assert_eq!(
        dashboard.success_banner().await.unwrap(),
        outcome::ADMIN_WELCOME
    );

    register.logout().await.unwrap();
    assert_eq!(
        register.success_banner().await.unwrap(),
        outcome::LOGGED_OUT
    );
}
