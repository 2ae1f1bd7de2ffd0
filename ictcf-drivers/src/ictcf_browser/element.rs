use crate::ictcf_browser::session::DomElement;
use anyhow::Result;
use async_trait::async_trait;
use fantoccini::{elements::Element, Client, Locator};
use serde_json::json;

/// Evaluated once per query so a whole node list costs one round trip.
const INNER_TEXTS_SCRIPT: &str = r#"
    const [root, selector] = arguments;
    return Array.from(root.querySelectorAll(selector)).map(n => n.innerText.trim());
"#;

const HREFS_SCRIPT: &str = r#"
    const [root, selector] = arguments;
    return Array.from(root.querySelectorAll(selector))
        .map(n => n.href)
        .filter(h => typeof h === "string" && h.length > 0);
"#;

/// WebDriver element handle bound to the client that produced it.
#[derive(Clone)]
pub struct IctcfElement {
    client: Client,
    element: Element,
}

impl IctcfElement {
    pub fn new(client: Client, element: Element) -> Self {
        Self { client, element }
    }

    async fn eval_strings(&self, script: &str, selector: &str) -> Result<Vec<String>> {
        let args = vec![serde_json::to_value(&self.element)?, json!(selector)];
        let value = self.client.execute(script, args).await?;
        Ok(serde_json::from_value(value)?)
    }

    fn wrap(&self, elements: Vec<Element>) -> Vec<IctcfElement> {
        elements
            .into_iter()
            .map(|element| IctcfElement::new(self.client.clone(), element))
            .collect()
    }
}

#[async_trait]
impl DomElement for IctcfElement {
    async fn query_all(&self, selector: &str) -> Result<Vec<Self>> {
        let elements = self.element.find_all(Locator::Css(selector)).await?;
        Ok(self.wrap(elements))
    }

    async fn texts_of(&self, selector: &str) -> Result<Vec<String>> {
        self.eval_strings(INNER_TEXTS_SCRIPT, selector).await
    }

    async fn hrefs_of(&self, selector: &str) -> Result<Vec<String>> {
        self.eval_strings(HREFS_SCRIPT, selector).await
    }

    async fn xpath(&self, expr: &str) -> Result<Vec<Self>> {
        let elements = self.element.find_all(Locator::XPath(expr)).await?;
        Ok(self.wrap(elements))
    }

    async fn click(&self) -> Result<()> {
        self.element.click().await?;
        Ok(())
    }

    async fn is_stale(&self) -> Result<bool> {
        match self.element.tag_name().await {
            Ok(_) => Ok(false),
            Err(err) if err.is_stale_element_reference() => Ok(true),
            Err(err) => Err(err.into()),
        }
    }
}
