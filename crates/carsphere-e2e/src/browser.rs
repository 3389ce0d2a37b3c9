//! Real browser control over the Chrome DevTools Protocol.
//!
//! Backed by chromiumoxide. All DOM access goes through JavaScript evaluation
//! in the page: a resolve pass finds the query's matches and tags each with a
//! synthetic handle attribute, and follow-up interactions address elements by
//! that attribute. A tagged node that has since been replaced simply stops
//! resolving, which is exactly the staleness model the waiter expects.

use std::path::Path;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::dom::{
    GetDocumentParams, QuerySelectorParams, SetFileInputFilesParams,
};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::Deserialize;
use tracing::debug;

use crate::driver::{Driver, ElementHandle, WindowHandle};
use crate::query::ElementQuery;
use crate::result::{HarnessError, HarnessResult};

/// Browser launch configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Window width
    pub window_width: u32,
    /// Window height
    pub window_height: u32,
    /// Path to the chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set window dimensions
    #[must_use]
    pub const fn with_window(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Set the chromium binary path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable the sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

#[derive(Debug, Deserialize)]
struct ResolvedNode {
    id: String,
    tag: String,
    visible: bool,
    text: String,
}

fn resolve_script(query: &ElementQuery) -> String {
    format!(
        "(() => {{ const els = {collector}; \
         if (!window.__cseSeq) {{ window.__cseSeq = 0; }} \
         return els.map((el) => {{ \
         if (!el.dataset.cseHandle) {{ window.__cseSeq += 1; el.dataset.cseHandle = String(window.__cseSeq); }} \
         const rect = el.getBoundingClientRect(); \
         const style = window.getComputedStyle(el); \
         const visible = rect.width > 0 && rect.height > 0 && style.display !== 'none' && style.visibility !== 'hidden'; \
         return {{ id: el.dataset.cseHandle, tag: el.tagName.toLowerCase(), visible: visible, \
         text: (el.innerText || el.textContent || '').trim() }}; }}); }})()",
        collector = query.to_collector_js()
    )
}

fn by_handle_script(handle_id: &str, body: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector('[data-cse-handle={handle_id:?}]'); \
         if (!el) {{ return null; }} {body} }})()"
    )
}

const CLICK_BODY: &str = "if (el.tagName === 'OPTION') { el.selected = true; \
    const sel = el.closest('select'); \
    if (sel) { sel.dispatchEvent(new Event('change', { bubbles: true })); } } \
    else { el.click(); } return true;";

fn fill_body(text: &str) -> String {
    format!(
        "el.focus(); el.value = {text:?}; \
         el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
         el.dispatchEvent(new Event('change', {{ bubbles: true }})); return true;"
    )
}

fn page_error(err: impl std::fmt::Display) -> HarnessError {
    HarnessError::Page {
        message: err.to_string(),
    }
}

/// CDP-backed driver over one chromium instance
pub struct CdpDriver {
    config: BrowserConfig,
    browser: CdpBrowser,
    active: CdpPage,
    #[allow(dead_code)]
    handler: tokio::task::JoinHandle<()>,
}

impl CdpDriver {
    /// Launch chromium and open a blank page
    pub async fn launch(config: BrowserConfig) -> HarnessResult<Self> {
        let mut builder =
            CdpConfig::builder().window_size(config.window_width, config.window_height);

        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder.build().map_err(|e| HarnessError::BrowserLaunch {
            message: e.to_string(),
        })?;

        let (browser, mut events) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| HarnessError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let active = browser
            .new_page("about:blank")
            .await
            .map_err(page_error)?;

        debug!(headless = config.headless, "browser launched");
        Ok(Self {
            config,
            browser,
            active,
            handler,
        })
    }

    /// The launch configuration
    #[must_use]
    pub const fn config(&self) -> &BrowserConfig {
        &self.config
    }

    async fn eval<T: serde::de::DeserializeOwned>(&self, script: String) -> HarnessResult<T> {
        let result = self.active.evaluate(script).await.map_err(page_error)?;
        result.into_value().map_err(page_error)
    }

    async fn act(&self, element: &ElementHandle, body: &str) -> HarnessResult<()> {
        let done: Option<bool> = self.eval(by_handle_script(&element.id, body)).await?;
        if done.unwrap_or(false) {
            Ok(())
        } else {
            Err(HarnessError::Page {
                message: format!("element handle '{}' is no longer attached", element.id),
            })
        }
    }

    async fn read<T: serde::de::DeserializeOwned>(
        &self,
        element: &ElementHandle,
        body: &str,
    ) -> HarnessResult<Option<T>> {
        self.eval(by_handle_script(&element.id, body)).await
    }
}

impl std::fmt::Debug for CdpDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdpDriver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Driver for CdpDriver {
    async fn navigate(&mut self, url: &str) -> HarnessResult<()> {
        self.active
            .goto(url)
            .await
            .map_err(|e| HarnessError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn current_url(&self) -> HarnessResult<String> {
        self.eval("window.location.href".to_string()).await
    }

    async fn resolve(&self, query: &ElementQuery) -> HarnessResult<Vec<ElementHandle>> {
        let nodes: Vec<ResolvedNode> = self.eval(resolve_script(query)).await?;
        Ok(nodes
            .into_iter()
            .map(|node| ElementHandle {
                id: node.id,
                tag: node.tag,
                visible: node.visible,
                text: node.text,
            })
            .collect())
    }

    async fn click(&self, element: &ElementHandle) -> HarnessResult<()> {
        self.act(element, CLICK_BODY).await
    }

    async fn fill(&self, element: &ElementHandle, text: &str) -> HarnessResult<()> {
        self.act(element, &fill_body(text)).await
    }

    async fn attach_file(&self, element: &ElementHandle, path: &Path) -> HarnessResult<()> {
        let doc = self
            .active
            .execute(GetDocumentParams::builder().build())
            .await
            .map_err(page_error)?;
        let selector = format!("[data-cse-handle={:?}]", element.id);
        let found = self
            .active
            .execute(
                QuerySelectorParams::builder()
                    .node_id(doc.root.node_id.clone())
                    .selector(selector)
                    .build()
                    .map_err(page_error)?,
            )
            .await
            .map_err(page_error)?;
        self.active
            .execute(
                SetFileInputFilesParams::builder()
                    .files(vec![path.display().to_string()])
                    .node_id(found.node_id.clone())
                    .build()
                    .map_err(page_error)?,
            )
            .await
            .map_err(page_error)?;
        Ok(())
    }

    async fn text(&self, element: &ElementHandle) -> HarnessResult<String> {
        let text: Option<String> = self
            .read(element, "return (el.innerText || el.textContent || '').trim();")
            .await?;
        text.ok_or_else(|| HarnessError::Page {
            message: format!("element handle '{}' is no longer attached", element.id),
        })
    }

    async fn value(&self, element: &ElementHandle) -> HarnessResult<String> {
        let value: Option<String> = self
            .read(
                element,
                "return el.value === undefined ? '' : String(el.value);",
            )
            .await?;
        value.ok_or_else(|| HarnessError::Page {
            message: format!("element handle '{}' is no longer attached", element.id),
        })
    }

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> HarnessResult<Option<String>> {
        let body = format!("return el.getAttribute({name:?});");
        self.read(element, &body).await
    }

    async fn css_value(&self, element: &ElementHandle, property: &str) -> HarnessResult<String> {
        let body = format!(
            "return window.getComputedStyle(el).getPropertyValue({property:?});"
        );
        let value: Option<String> = self.read(element, &body).await?;
        value.ok_or_else(|| HarnessError::Page {
            message: format!("element handle '{}' is no longer attached", element.id),
        })
    }

    async fn windows(&self) -> HarnessResult<Vec<WindowHandle>> {
        let pages = self.browser.pages().await.map_err(page_error)?;
        Ok((0..pages.len())
            .map(|index| WindowHandle::new(index.to_string()))
            .collect())
    }

    async fn switch_window(&mut self, window: &WindowHandle) -> HarnessResult<()> {
        let pages = self.browser.pages().await.map_err(page_error)?;
        let index: usize = window.id.parse().map_err(|_| HarnessError::Page {
            message: format!("invalid window id '{}'", window.id),
        })?;
        let page = pages.get(index).ok_or_else(|| HarnessError::Page {
            message: format!("no window with id '{}'", window.id),
        })?;
        self.active = page.clone();
        Ok(())
    }

    async fn close(&mut self) -> HarnessResult<()> {
        self.browser.close().await.map_err(page_error)?;
        Ok(())
    }
}
