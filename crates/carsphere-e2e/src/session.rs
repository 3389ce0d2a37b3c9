//! One browser session driving one scenario.
//!
//! A `Session` exclusively owns its driver for the lifetime of a scenario;
//! every page object constructed for the scenario borrows the same session.
//! Driver access is serialized through an async mutex and each operation holds
//! the lock from first poll to final read, so no two page objects can observe
//! different active windows.

use std::path::Path;

use tokio::sync::Mutex;
use tracing::info;

use crate::config::HarnessConfig;
use crate::driver::{Driver, ElementHandle, WindowHandle};
use crate::query::ElementQuery;
use crate::result::{HarnessError, HarnessResult};
use crate::wait::{self, WaitPolicy};

/// A live browser session bound to one scenario
pub struct Session {
    driver: Mutex<Box<dyn Driver>>,
    config: HarnessConfig,
    element_policy: WaitPolicy,
    generation_policy: WaitPolicy,
}

impl Session {
    /// Bind a driver to a configuration.
    ///
    /// Wait timing from the configuration is validated here, so a bad config
    /// file fails the scenario before the browser does anything.
    pub fn new(driver: Box<dyn Driver>, config: HarnessConfig) -> HarnessResult<Self> {
        let element_policy =
            WaitPolicy::present(config.wait.element_timeout(), config.wait.poll_interval())?;
        let generation_policy = WaitPolicy::value_non_empty(
            config.wait.generation_timeout(),
            config.wait.poll_interval(),
        )?;
        Ok(Self {
            driver: Mutex::new(driver),
            config,
            element_policy,
            generation_policy,
        })
    }

    /// The configuration this session runs against
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// The element wait policy derived from the configuration
    #[must_use]
    pub const fn element_policy(&self) -> &WaitPolicy {
        &self.element_policy
    }

    /// The generated-content wait policy derived from the configuration
    #[must_use]
    pub const fn generation_policy(&self) -> &WaitPolicy {
        &self.generation_policy
    }

    /// Navigate to the application home page
    pub async fn open_home(&self) -> HarnessResult<()> {
        let url = self.config.home_url();
        info!(%url, "opening home page");
        self.driver.lock().await.navigate(&url).await
    }

    /// Navigate to a path under the base URL
    pub async fn open_path(&self, path: &str) -> HarnessResult<()> {
        let url = self.config.url(path);
        info!(%url, "navigating");
        self.driver.lock().await.navigate(&url).await
    }

    /// URL of the active window
    pub async fn current_url(&self) -> HarnessResult<String> {
        self.driver.lock().await.current_url().await
    }

    /// All open windows, oldest first
    pub async fn windows(&self) -> HarnessResult<Vec<WindowHandle>> {
        self.driver.lock().await.windows().await
    }

    /// Explicitly move the active-window pointer
    pub async fn switch_to_window(&self, window: &WindowHandle) -> HarnessResult<()> {
        info!(window = %window.id, "switching window");
        self.driver.lock().await.switch_window(window).await
    }

    /// Switch to the most recently opened window.
    ///
    /// Fails when no secondary window exists; user actions that open one must
    /// have completed first.
    pub async fn switch_to_secondary(&self) -> HarnessResult<()> {
        let mut driver = self.driver.lock().await;
        let windows = driver.windows().await?;
        if windows.len() < 2 {
            return Err(HarnessError::Page {
                message: "no secondary window to switch to".to_string(),
            });
        }
        let last = windows[windows.len() - 1].clone();
        info!(window = %last.id, "switching to secondary window");
        driver.switch_window(&last).await
    }

    /// Wait for the first element matching `query` under the session's
    /// element policy
    pub async fn wait_for(&self, query: &ElementQuery) -> HarnessResult<ElementHandle> {
        let driver = self.driver.lock().await;
        wait::wait_for(driver.as_ref(), query, &self.element_policy).await
    }

    /// Wait for the full match set of `query`; empty after timeout
    pub async fn wait_for_all(&self, query: &ElementQuery) -> HarnessResult<Vec<ElementHandle>> {
        let driver = self.driver.lock().await;
        wait::wait_for_all(driver.as_ref(), query, &self.element_policy).await
    }

    /// Probe whether `query` is visible; a timeout is `false`, never an error
    pub async fn is_visible(&self, query: &ElementQuery) -> HarnessResult<bool> {
        let driver = self.driver.lock().await;
        wait::is_visible(driver.as_ref(), query, &self.element_policy).await
    }

    /// Block until the form value of `query` becomes non-empty, under the
    /// generated-content policy
    pub async fn wait_for_value(&self, query: &ElementQuery) -> HarnessResult<String> {
        let driver = self.driver.lock().await;
        wait::wait_for_value(driver.as_ref(), query, &self.generation_policy).await
    }

    /// Wait for `query`, then click the first match
    pub async fn click(&self, query: &ElementQuery) -> HarnessResult<()> {
        let driver = self.driver.lock().await;
        let handle = wait::wait_for(driver.as_ref(), query, &self.element_policy).await?;
        driver.click(&handle).await
    }

    /// Click an element the caller already resolved
    pub async fn click_element(&self, element: &ElementHandle) -> HarnessResult<()> {
        self.driver.lock().await.click(element).await
    }

    /// Wait for `query`, then type `text` into the first match
    pub async fn fill(&self, query: &ElementQuery, text: &str) -> HarnessResult<()> {
        let driver = self.driver.lock().await;
        let handle = wait::wait_for(driver.as_ref(), query, &self.element_policy).await?;
        driver.fill(&handle, text).await
    }

    /// Wait for `query`, then attach a local file to the first match
    pub async fn attach_file(&self, query: &ElementQuery, path: &Path) -> HarnessResult<()> {
        let driver = self.driver.lock().await;
        let handle = wait::wait_for(driver.as_ref(), query, &self.element_policy).await?;
        driver.attach_file(&handle, path).await
    }

    /// Wait for `query`, then read its live text
    pub async fn text_of(&self, query: &ElementQuery) -> HarnessResult<String> {
        let driver = self.driver.lock().await;
        let handle = wait::wait_for(driver.as_ref(), query, &self.element_policy).await?;
        driver.text(&handle).await
    }

    /// Wait for `query`, then read an attribute of the first match
    pub async fn attribute_of(
        &self,
        query: &ElementQuery,
        name: &str,
    ) -> HarnessResult<Option<String>> {
        let driver = self.driver.lock().await;
        let handle = wait::wait_for(driver.as_ref(), query, &self.element_policy).await?;
        driver.attribute(&handle, name).await
    }

    /// Wait for `query`, then read a computed CSS property of the first match
    pub async fn css_value_of(
        &self,
        query: &ElementQuery,
        property: &str,
    ) -> HarnessResult<String> {
        let driver = self.driver.lock().await;
        let handle = wait::wait_for(driver.as_ref(), query, &self.element_policy).await?;
        driver.css_value(&handle, property).await
    }

    /// Read the live text of an element the caller already resolved
    pub async fn text_of_element(&self, element: &ElementHandle) -> HarnessResult<String> {
        self.driver.lock().await.text(element).await
    }

    /// Read an attribute of an element the caller already resolved
    pub async fn attribute_of_element(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> HarnessResult<Option<String>> {
        self.driver.lock().await.attribute(element, name).await
    }

    /// Tear down the driver
    pub async fn close(&self) -> HarnessResult<()> {
        self.driver.lock().await.close().await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}
