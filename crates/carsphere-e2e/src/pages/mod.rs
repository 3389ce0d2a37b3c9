//! Page objects for the CarSphere screens.
//!
//! Each page is a named capability set bound to one [`crate::session::Session`]
//! by shared reference. Screens that also carry the authentication nav bar
//! compose the [`auth::AuthPanel`] capability by delegation instead of
//! re-declaring its locators, so the login/logout contract is identical on
//! every screen that offers it.

pub mod auth;
pub mod dashboard;
pub mod register;

pub use auth::{AuthPanel, Authenticate, LoginPage};
pub use dashboard::{CarListing, DashboardPage, CATALOG_SAFETY_FLOOR};
pub use register::{RegisterPage, Registration};

/// Exact outcome strings surfaced by the application
pub mod outcome {
    /// Banner shown after a successful logout
    pub const LOGGED_OUT: &str = "You have been logged out.";

    /// Banner shown after a rejected login
    pub const LOGIN_FAILED: &str = "Login Unsuccessful. Please check username and password";

    /// Banner shown after a successful admin login
    pub const ADMIN_WELCOME: &str = "Welcome, Administrator Manager!";

    /// Banner shown after a catalog entry is deleted
    pub const CAR_DELETED: &str = "Car deleted successfully!";

    /// Banner shown after a review is submitted
    pub const REVIEW_ADDED: &str = "Review added successfully!";

    /// Inline alert shown when password and confirmation differ
    pub const PASSWORD_MISMATCH: &str = "Passwords are not match";

    /// Computed color of the password-mismatch alert
    pub const PASSWORD_MISMATCH_COLOR: &str = "rgba(255, 0, 0, 1)";

    /// Banner shown after a catalog entry is added
    #[must_use]
    pub fn car_added(make: &str, model: &str) -> String {
        format!("Car {make} {model} added successfully!")
    }

    /// Banner shown after a successful login as `first_name last_name`
    #[must_use]
    pub fn welcome(first_name: &str, last_name: &str) -> String {
        format!("Welcome, {first_name} {last_name}!")
    }

    /// Alert shown when registering an already-taken username
    #[must_use]
    pub fn duplicate_username(username: &str) -> String {
        format!("Username '{username}' already exist, please try another username.")
    }

    /// Banner shown after a successful registration
    #[must_use]
    pub fn registration_welcome(first_name: &str, last_name: &str) -> String {
        format!(
            "Welcome, {first_name} {last_name} and thanks for registration!\n\n\
             !!! You're already logged-in. Let's Begin !!!"
        )
    }

}
