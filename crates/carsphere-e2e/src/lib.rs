//! Functional UI test harness for the CarSphere gallery application.
//!
//! The harness drives a browser against the deployed application to verify
//! authentication, admin-only actions, catalog mutation, and the review flow
//! with its externally-generated AI fragment.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌─────────────────────────┐
//! │ Scenario     │──►│ Pages        │──►│ Session + Waiter        │
//! │ (tests/)     │   │ (capability  │   │ (fixed-interval polling │
//! │              │   │  composition)│   │  over a Driver backend) │
//! └──────────────┘   └──────────────┘   └─────────────────────────┘
//!                                              │
//!                                   CDP (chromiumoxide) or scripted mock
//! ```
//!
//! Every DOM lookup re-resolves its query on each poll; nothing caches nodes
//! across renders. Pages expose named actions only and read outcome banners
//! after the triggering action has observably completed.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

pub mod config;
pub mod driver;
pub mod logging;
pub mod pages;
pub mod query;
pub mod result;
pub mod session;
pub mod testdata;
pub mod wait;

/// Real browser control over the Chrome DevTools Protocol
#[cfg(feature = "browser")]
pub mod browser;

pub use config::{Credentials, HarnessConfig};
pub use driver::{Driver, ElementHandle, MockDriver, WindowHandle};
pub use query::{ElementQuery, Strategy};
pub use result::{HarnessError, HarnessResult};
pub use session::Session;
pub use wait::{WaitCondition, WaitPolicy};

#[cfg(feature = "browser")]
pub use browser::{BrowserConfig, CdpDriver};

/// Common imports for scenario suites
pub mod prelude {
    pub use crate::config::{Credentials, HarnessConfig};
    pub use crate::driver::{Driver, ElementHandle, MockDriver, WindowHandle};
    pub use crate::pages::{
        outcome, AuthPanel, Authenticate, CarListing, DashboardPage, LoginPage, RegisterPage,
        Registration, CATALOG_SAFETY_FLOOR,
    };
    pub use crate::query::ElementQuery;
    pub use crate::result::{HarnessError, HarnessResult};
    pub use crate::session::Session;
    pub use crate::wait::{WaitCondition, WaitPolicy};

    #[cfg(feature = "browser")]
    pub use crate::browser::{BrowserConfig, CdpDriver};
}
