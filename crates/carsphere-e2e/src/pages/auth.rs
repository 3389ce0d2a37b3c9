//! Authentication capability and the login screen.
//!
//! The nav bar with sign-in/sign-out and the result banners is present on
//! every screen, so its locators live in one [`AuthPanel`] value. Pages gain
//! the capability by holding a panel and implementing [`Authenticate`], which
//! delegates every action to it; no page re-declares these locators.

use async_trait::async_trait;
use tracing::info;

use crate::query::ElementQuery;
use crate::result::HarnessResult;
use crate::session::Session;

/// Locators and actions for the authentication nav bar and result banners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPanel {
    username_input: ElementQuery,
    password_input: ElementQuery,
    login_button: ElementQuery,
    success_alert: ElementQuery,
    danger_alert: ElementQuery,
    logout_link: ElementQuery,
}

impl AuthPanel {
    /// The panel with the application's locators
    #[must_use]
    pub fn new() -> Self {
        Self {
            username_input: ElementQuery::xpath("//div/input[@id='username']"),
            password_input: ElementQuery::xpath("//div/input[@id='password']"),
            login_button: ElementQuery::xpath("//form/button[@type='submit']"),
            success_alert: ElementQuery::css(".alert.alert-success"),
            danger_alert: ElementQuery::css(".alert.alert-danger"),
            logout_link: ElementQuery::xpath("//a[contains(text(), 'Sign Out')]"),
        }
    }

    /// Fill the credential fields and submit.
    ///
    /// Does not assert the outcome; success and failure paths share this
    /// action and read the banner separately.
    pub async fn login(
        &self,
        session: &Session,
        username: &str,
        password: &str,
    ) -> HarnessResult<()> {
        info!(%username, "logging in");
        session.fill(&self.username_input, username).await?;
        session.fill(&self.password_input, password).await?;
        session.click(&self.login_button).await
    }

    /// Trigger sign-out; the caller reads the outcome banner afterwards
    pub async fn logout(&self, session: &Session) -> HarnessResult<()> {
        info!("logging out");
        session.click(&self.logout_link).await
    }

    /// Text of the success banner
    pub async fn success_banner(&self, session: &Session) -> HarnessResult<String> {
        session.text_of(&self.success_alert).await
    }

    /// Text of the danger banner
    pub async fn danger_banner(&self, session: &Session) -> HarnessResult<String> {
        session.text_of(&self.danger_alert).await
    }

    /// Query for the success banner, for screens that anchor on it
    #[must_use]
    pub const fn success_alert(&self) -> &ElementQuery {
        &self.success_alert
    }
}

impl Default for AuthPanel {
    fn default() -> Self {
        Self::new()
    }
}

/// Capability trait for any screen that carries the authentication nav bar.
///
/// Implementors supply their session and panel; the actions themselves are
/// provided here and always run against the panel's locators.
#[async_trait]
pub trait Authenticate {
    /// The session this page is bound to
    fn session(&self) -> &Session;

    /// The composed authentication panel
    fn auth(&self) -> &AuthPanel;

    /// Log in with the given credentials; outcome is read separately
    async fn login(&self, username: &str, password: &str) -> HarnessResult<()> {
        self.auth().login(self.session(), username, password).await
    }

    /// Log out; outcome is read separately
    async fn logout(&self) -> HarnessResult<()> {
        self.auth().logout(self.session()).await
    }

    /// Read the success banner
    async fn success_banner(&self) -> HarnessResult<String> {
        self.auth().success_banner(self.session()).await
    }

    /// Read the danger banner
    async fn danger_banner(&self) -> HarnessResult<String> {
        self.auth().danger_banner(self.session()).await
    }
}

/// The login screen
#[derive(Debug)]
pub struct LoginPage<'s> {
    session: &'s Session,
    auth: AuthPanel,
}

impl<'s> LoginPage<'s> {
    /// Bind the login page to a session
    #[must_use]
    pub fn new(session: &'s Session) -> Self {
        Self {
            session,
            auth: AuthPanel::new(),
        }
    }

    /// Navigate to the login screen
    pub async fn open(&self) -> HarnessResult<()> {
        self.session.open_path("login").await
    }

    /// Probe whether the last login attempt produced the success banner
    pub async fn is_login_successful(&self) -> HarnessResult<bool> {
        self.session.is_visible(self.auth.success_alert()).await
    }
}

impl Authenticate for LoginPage<'_> {
    fn session(&self) -> &Session {
        self.session
    }

    fn auth(&self) -> &AuthPanel {
        &self.auth
    }
}
