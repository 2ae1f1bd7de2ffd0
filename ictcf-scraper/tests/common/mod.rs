//! In-memory stand-in for the browser used by the integration tests.
//!
//! Pages are small node trees; CSS support covers `tag` and `tag > tag`
//! chains, XPath covers `.//tag[contains(., "text")]`.
#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use ictcf_drivers::ictcf_browser::{BrowserSession, DomElement};
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct Node {
    pub tag: String,
    pub text: String,
    pub href: Option<String>,
    pub children: Vec<Arc<Node>>,
}

impl Node {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn href(mut self, href: &str) -> Self {
        self.href = Some(href.to_string());
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    fn inner_text(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.inner_text());
        }
        out.trim().to_string()
    }

    fn descendants(self: &Arc<Self>, out: &mut Vec<Arc<Node>>) {
        for child in &self.children {
            out.push(child.clone());
            child.descendants(out);
        }
    }
}

/// Cell of a data row: plain text or a link.
pub enum Cell<'a> {
    Text(&'a str),
    Link(&'a str, &'a str),
}

/// Build a results table: header row, data rows, pagination row.
pub fn results_table(headers: &[&str], rows: &[Vec<Cell<'_>>], next: bool) -> Node {
    let mut header = Node::new("tr");
    for h in headers {
        header = header.child(Node::new("th").text(&format!(" {h} ")));
    }
    let mut table = Node::new("table").child(header);
    for row in rows {
        let mut tr = Node::new("tr");
        for cell in row {
            tr = tr.child(match cell {
                Cell::Text(t) => Node::new("td").text(t),
                Cell::Link(t, href) => Node::new("td").child(Node::new("a").text(t).href(href)),
            });
        }
        table = table.child(tr);
    }
    let mut pager = Node::new("td").child(Node::new("a").text("Prev").href("#prev"));
    if next {
        pager = pager.child(Node::new("a").text("Next >").href("#next"));
    }
    table.child(Node::new("tr").child(pager))
}

/// Element of results page `page`; it goes stale once the shared cursor
/// moves to another page.
#[derive(Clone)]
pub struct FakeElement {
    node: Arc<Node>,
    page: usize,
    cursor: Arc<AtomicUsize>,
    clicks: Arc<AtomicUsize>,
    inert_next: Arc<AtomicBool>,
}

impl FakeElement {
    pub fn detached(node: Node) -> Self {
        Self {
            node: Arc::new(node),
            page: 0,
            cursor: Arc::new(AtomicUsize::new(0)),
            clicks: Arc::new(AtomicUsize::new(0)),
            inert_next: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn clicks(&self) -> usize {
        self.clicks.load(Ordering::SeqCst)
    }

    fn wrap(&self, node: Arc<Node>) -> Self {
        Self {
            node,
            ..self.clone()
        }
    }

    fn select(&self, selector: &str) -> Vec<Arc<Node>> {
        let mut steps = selector.split('>').map(str::trim);
        let Some(first) = steps.next() else {
            return Vec::new();
        };
        let mut all = Vec::new();
        self.node.descendants(&mut all);
        let mut current: Vec<Arc<Node>> = all.into_iter().filter(|n| n.tag == first).collect();
        for step in steps {
            current = current
                .iter()
                .flat_map(|n| n.children.iter().filter(|c| c.tag == step).cloned())
                .collect();
        }
        current
    }
}

#[async_trait]
impl DomElement for FakeElement {
    async fn query_all(&self, selector: &str) -> Result<Vec<Self>> {
        Ok(self.select(selector).into_iter().map(|n| self.wrap(n)).collect())
    }

    async fn texts_of(&self, selector: &str) -> Result<Vec<String>> {
        Ok(self.select(selector).iter().map(|n| n.inner_text()).collect())
    }

    async fn hrefs_of(&self, selector: &str) -> Result<Vec<String>> {
        Ok(self
            .select(selector)
            .iter()
            .filter_map(|n| n.href.clone())
            .collect())
    }

    async fn xpath(&self, expr: &str) -> Result<Vec<Self>> {
        let re = Regex::new(r#"^\.//(\w+)\[contains\(\., "(.*)"\)\]$"#)?;
        let caps = re
            .captures(expr)
            .ok_or_else(|| anyhow!("unsupported xpath: {expr}"))?;
        let (tag, needle) = (&caps[1], &caps[2]);
        let mut all = Vec::new();
        self.node.descendants(&mut all);
        Ok(all
            .into_iter()
            .filter(|n| n.tag == tag && n.inner_text().contains(needle))
            .map(|n| self.wrap(n))
            .collect())
    }

    async fn click(&self) -> Result<()> {
        self.clicks.fetch_add(1, Ordering::SeqCst);
        let advances = !self.inert_next.load(Ordering::SeqCst);
        if self.node.href.as_deref() == Some("#next") && advances {
            self.cursor.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn is_stale(&self) -> Result<bool> {
        Ok(self.cursor.load(Ordering::SeqCst) != self.page)
    }
}

/// Overview table of one detail page: value cells and, optionally, the
/// label cells naming them.
#[derive(Clone, Default)]
pub struct Overview {
    pub values: Vec<String>,
    pub labels: Vec<String>,
}

/// Browser session over a fixed list of results pages and detail pages.
pub struct FakeSession {
    pub pages: Vec<Arc<Node>>,
    pub details: HashMap<String, Overview>,
    pub cursor: Arc<AtomicUsize>,
    pub clicks: Arc<AtomicUsize>,
    pub inert_next: Arc<AtomicBool>,
    pub navigated: Vec<String>,
    pub clicked_selectors: Vec<String>,
    pub opened: Vec<String>,
    pub open_tabs: usize,
    pub closed: Arc<AtomicUsize>,
}

impl FakeSession {
    pub fn new(pages: Vec<Node>) -> Self {
        Self {
            pages: pages.into_iter().map(Arc::new).collect(),
            details: HashMap::new(),
            cursor: Arc::new(AtomicUsize::new(0)),
            clicks: Arc::new(AtomicUsize::new(0)),
            inert_next: Arc::new(AtomicBool::new(false)),
            navigated: Vec::new(),
            clicked_selectors: Vec::new(),
            opened: Vec::new(),
            open_tabs: 0,
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Detail page whose overview has value cells only.
    pub fn with_detail<S: AsRef<str>>(self, url: &str, values: &[S]) -> Self {
        self.with_labeled_detail::<S, &str>(url, &[], values)
    }

    /// Detail page whose overview names each value with a label cell.
    pub fn with_labeled_detail<S: AsRef<str>, L: AsRef<str>>(
        mut self,
        url: &str,
        labels: &[L],
        values: &[S],
    ) -> Self {
        let overview = Overview {
            values: values.iter().map(|c| c.as_ref().to_string()).collect(),
            labels: labels.iter().map(|c| c.as_ref().to_string()).collect(),
        };
        self.details.insert(url.to_string(), overview);
        self
    }

    /// Clicking "next" leaves the results table untouched.
    pub fn with_inert_next(self) -> Self {
        self.inert_next.store(true, Ordering::SeqCst);
        self
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    type Element = FakeElement;

    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.navigated.push(url.to_string());
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        self.clicked_selectors.push(selector.to_string());
        Ok(())
    }

    async fn query(&mut self, _selector: &str) -> Result<FakeElement> {
        let idx = self.cursor.load(Ordering::SeqCst);
        let page = self
            .pages
            .get(idx)
            .ok_or_else(|| anyhow!("no results page {idx}"))?;
        Ok(FakeElement {
            node: page.clone(),
            page: idx,
            cursor: self.cursor.clone(),
            clicks: self.clicks.clone(),
            inert_next: self.inert_next.clone(),
        })
    }

    async fn title(&mut self) -> Result<String> {
        Ok("iCTCF Resource".to_string())
    }

    async fn screenshot_png(&mut self) -> Result<Vec<u8>> {
        Ok(b"\x89PNG fake".to_vec())
    }

    /// Answers the first selector with the value cells and the second with
    /// the label cells.
    async fn texts_in_new_page(
        &mut self,
        url: &str,
        selectors: &[&str],
    ) -> Result<Vec<Vec<String>>> {
        self.open_tabs += 1;
        self.opened.push(url.to_string());
        let result = self
            .details
            .get(url)
            .cloned()
            .map(|overview| {
                let mut texts = vec![overview.values, overview.labels];
                texts.truncate(selectors.len());
                texts
            })
            .ok_or_else(|| anyhow!("navigation to {url} failed"));
        self.open_tabs -= 1;
        result
    }

    async fn close(self) -> Result<()> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
