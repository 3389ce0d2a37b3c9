//! The sign-up screen.

use tracing::info;

use crate::pages::auth::{AuthPanel, Authenticate};
use crate::query::ElementQuery;
use crate::result::{HarnessError, HarnessResult};
use crate::session::Session;

/// Sign-up form fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Desired username
    pub username: String,
    /// Password
    pub password: String,
    /// Password confirmation
    pub confirm_password: String,
}

impl Registration {
    /// A registration whose confirmation matches the password
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let password = password.into();
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            username: username.into(),
            confirm_password: password.clone(),
            password,
        }
    }

    /// Override the confirmation field
    #[must_use]
    pub fn with_confirmation(mut self, confirm_password: impl Into<String>) -> Self {
        self.confirm_password = confirm_password.into();
        self
    }
}

/// The registration screen, composing the authentication capability
#[derive(Debug)]
pub struct RegisterPage<'s> {
    session: &'s Session,
    auth: AuthPanel,
    nav_links: ElementQuery,
    first_name_input: ElementQuery,
    last_name_input: ElementQuery,
    username_input: ElementQuery,
    password_input: ElementQuery,
    confirm_password_input: ElementQuery,
    signup_button: ElementQuery,
    mismatch_alert: ElementQuery,
}

impl<'s> RegisterPage<'s> {
    /// Bind the registration page to a session
    #[must_use]
    pub fn new(session: &'s Session) -> Self {
        Self {
            session,
            auth: AuthPanel::new(),
            nav_links: ElementQuery::xpath("//nav/a"),
            first_name_input: ElementQuery::xpath("//input[@id='firstname']"),
            last_name_input: ElementQuery::xpath("//input[@id='lastname']"),
            username_input: ElementQuery::xpath("//input[@id='username']"),
            password_input: ElementQuery::xpath("//input[@id='password']"),
            confirm_password_input: ElementQuery::xpath("//input[@id='confirm_password']"),
            signup_button: ElementQuery::xpath("//button[text()='Sign Up']"),
            mismatch_alert: ElementQuery::id("confirm_pass"),
        }
    }

    /// Reach the sign-up screen through the nav bar link
    pub async fn open_via_nav(&self) -> HarnessResult<()> {
        let links = self.session.wait_for_all(&self.nav_links).await?;
        for link in &links {
            let href = self.session.attribute_of_element(link, "href").await?;
            if href.is_some_and(|href| href.contains("register")) {
                return self.session.click_element(link).await;
            }
        }
        Err(HarnessError::Page {
            message: "no register link in the nav bar".to_string(),
        })
    }

    /// Fill and submit the sign-up form; the caller reads the outcome
    pub async fn submit_registration(&self, registration: &Registration) -> HarnessResult<()> {
        info!(username = %registration.username, "submitting registration");
        self.session
            .fill(&self.first_name_input, &registration.first_name)
            .await?;
        self.session
            .fill(&self.last_name_input, &registration.last_name)
            .await?;
        self.session
            .fill(&self.username_input, &registration.username)
            .await?;
        self.session
            .fill(&self.password_input, &registration.password)
            .await?;
        self.session
            .fill(&self.confirm_password_input, &registration.confirm_password)
            .await?;
        self.session.click(&self.signup_button).await
    }

    /// Text and computed color of the inline mismatched-password alert
    pub async fn mismatch_alert(&self) -> HarnessResult<(String, String)> {
        let text = self.session.text_of(&self.mismatch_alert).await?;
        let color = self
            .session
            .css_value_of(&self.mismatch_alert, "color")
            .await?;
        Ok((text, color))
    }
}

impl Authenticate for RegisterPage<'_> {
    fn session(&self) -> &Session {
        self.session
    }

    fn auth(&self) -> &AuthPanel {
        &self.auth
    }
}
