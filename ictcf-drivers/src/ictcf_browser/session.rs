use anyhow::Result;
use async_trait::async_trait;

/// A handle to one DOM element inside the current page.
///
/// Selector arguments are CSS and are evaluated against the element's
/// descendants, in document order.
#[async_trait]
pub trait DomElement: Send + Sync + Sized {
    /// All descendants matching `selector`.
    async fn query_all(&self, selector: &str) -> Result<Vec<Self>>;

    /// Trimmed visible text of every descendant matching `selector`.
    async fn texts_of(&self, selector: &str) -> Result<Vec<String>>;

    /// Resolved `href` of every descendant matching `selector` that has one.
    async fn hrefs_of(&self, selector: &str) -> Result<Vec<String>>;

    /// Elements matching an XPath expression evaluated with this element as
    /// the context node.
    async fn xpath(&self, expr: &str) -> Result<Vec<Self>>;

    async fn click(&self) -> Result<()>;

    /// `true` once the element has been detached from the document, e.g.
    /// after the page re-rendered.
    async fn is_stale(&self) -> Result<bool>;
}

/// A live browser session driving one main page.
///
/// Every call suspends until the browser reports completion.
#[async_trait]
pub trait BrowserSession: Send + Sync + Sized {
    type Element: DomElement;

    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Wait for `selector` on the main page and click it.
    async fn click(&mut self, selector: &str) -> Result<()>;

    /// Wait for `selector` on the main page and return the first match.
    async fn query(&mut self, selector: &str) -> Result<Self::Element>;

    async fn title(&mut self) -> Result<String>;

    /// PNG screenshot of the main page.
    async fn screenshot_png(&mut self) -> Result<Vec<u8>>;

    /// Open `url` in a separate page and collect the trimmed text of every
    /// element matching each selector, one list per selector in the given
    /// order. The page is closed again afterwards.
    ///
    /// The extra page is closed even when extraction fails; the main page
    /// is left as it was.
    async fn texts_in_new_page(
        &mut self,
        url: &str,
        selectors: &[&str],
    ) -> Result<Vec<Vec<String>>>;

    /// End the session and release the browser.
    async fn close(self) -> Result<()>;
}
