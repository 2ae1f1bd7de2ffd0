use crate::ictcf_browser::{
    element::IctcfElement, launch::build_capabilities, session::BrowserSession,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use fantoccini::{elements::Element, wd::WindowHandle, Client, ClientBuilder, Locator};
use ictcf_config::BrowserConfig;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

const DOCUMENT_TEXTS_SCRIPT: &str = r#"
    const [selectors] = arguments;
    return selectors.map(selector =>
        Array.from(document.querySelectorAll(selector)).map(n => n.innerText.trim()));
"#;

/// Thin wrapper around a `fantoccini` WebDriver client.
pub struct IctcfDriver {
    client: Client,
    wait_timeout: Duration,
}

impl IctcfDriver {
    /// Create a new session on the WebDriver service at `config.webdriver_url`.
    ///
    /// The service (chromedriver, geckodriver, a grid) must already be running.
    pub async fn connect(config: &BrowserConfig) -> Result<Self> {
        let client = ClientBuilder::native()
            .capabilities(build_capabilities(config))
            .connect(&config.webdriver_url)
            .await
            .with_context(|| {
                format!("failed to connect to WebDriver at {}", config.webdriver_url)
            })?;

        info!(
            target: "browser.session",
            webdriver = %config.webdriver_url,
            headless = config.headless,
            "browser session started"
        );

        Ok(Self {
            client,
            wait_timeout: Duration::from_secs(config.wait_timeout_secs),
        })
    }

    async fn wait_for(&self, selector: &str) -> Result<Element> {
        self.client
            .wait()
            .at_most(self.wait_timeout)
            .for_element(Locator::Css(selector))
            .await
            .with_context(|| format!("element {selector:?} did not appear"))
    }

    async fn document_texts(&self, url: &str, selectors: &[&str]) -> Result<Vec<Vec<String>>> {
        self.client.goto(url).await?;
        let value = self
            .client
            .execute(DOCUMENT_TEXTS_SCRIPT, vec![json!(selectors)])
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Close `tab` if it can still be reached, then return to `origin`.
    async fn discard_tab(&self, tab: WindowHandle, origin: WindowHandle) -> Result<()> {
        match self.client.switch_to_window(tab).await {
            Ok(()) => {
                if let Err(err) = self.client.close_window().await {
                    warn!(
                        target: "browser.session",
                        error = %err,
                        "failed to close detail tab"
                    );
                }
            }
            Err(err) => {
                warn!(
                    target: "browser.session",
                    error = %err,
                    "detail tab unreachable; left open"
                );
            }
        }
        self.client.switch_to_window(origin).await?;
        Ok(())
    }
}

#[async_trait]
impl BrowserSession for IctcfDriver {
    type Element = IctcfElement;

    async fn navigate(&mut self, url: &str) -> Result<()> {
        debug!(target: "browser.session", %url, "navigate");
        self.client.goto(url).await?;
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        self.wait_for(selector).await?.click().await?;
        Ok(())
    }

    async fn query(&mut self, selector: &str) -> Result<IctcfElement> {
        let element = self.wait_for(selector).await?;
        Ok(IctcfElement::new(self.client.clone(), element))
    }

    async fn title(&mut self) -> Result<String> {
        Ok(self.client.title().await?)
    }

    async fn screenshot_png(&mut self) -> Result<Vec<u8>> {
        Ok(self.client.screenshot().await?)
    }

    async fn texts_in_new_page(
        &mut self,
        url: &str,
        selectors: &[&str],
    ) -> Result<Vec<Vec<String>>> {
        let origin = self.client.window().await?;
        let tab = self.client.new_window(true).await?.handle;

        let texts = match self.client.switch_to_window(tab.clone()).await {
            Ok(()) => self.document_texts(url, selectors).await,
            Err(err) => Err(anyhow::Error::from(err).context("failed to switch to detail tab")),
        };

        // Close before surfacing an extraction error so tabs never pile up.
        self.discard_tab(tab, origin).await?;
        texts
    }

    async fn close(self) -> Result<()> {
        self.client.close().await?;
        info!(target: "browser.session", "browser session closed");
        Ok(())
    }
}
