use crate::detail::fetch_patient_details;
use crate::export::export_xlsx;
use crate::record::Dataset;
use crate::screenshot;
use crate::table::parse_table;
use crate::urls::build_url;
use ictcf_common::{IctcfError, Result};
use ictcf_config::IctcfConfig;
use ictcf_drivers::ictcf_browser::{BrowserSession, DomElement, IctcfDriver};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

const REFRESH_POLL: Duration = Duration::from_millis(250);

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Results pages parsed.
    pub pages: usize,
    /// Patient records exported.
    pub patients: usize,
    /// Detail pages visited.
    pub details: usize,
    pub export_path: PathBuf,
    pub screenshot: Option<PathBuf>,
}

/// Drive a whole scrape on an already open session.
///
/// Phase 1 walks the paginated results table; phase 2 visits each patient's
/// detail page; the dataset is then exported. Any failure aborts the run
/// before anything is written, including a "next" click after which the
/// table never refreshes or the new page brings no new records.
pub async fn run<S: BrowserSession>(session: &mut S, cfg: &IctcfConfig) -> Result<RunSummary> {
    let params: Vec<(&str, &str)> = cfg
        .site
        .query
        .iter()
        .map(|p| (p.key.as_str(), p.value.as_str()))
        .collect();
    let resource_url = build_url(
        &cfg.site.base_url,
        &cfg.site.resource_path,
        Some(params.as_slice()),
    )?;

    info!(target: "ictcf.run", url = %resource_url, "opening resource page");
    session.navigate(resource_url.as_str()).await?;
    session.click(&cfg.selectors.submit).await?;

    let screenshot = if cfg.export.screenshot {
        Some(screenshot::capture(session, &cfg.export.dir).await?)
    } else {
        None
    };

    let labels = cfg.overview_fields.iter().map(|f| f.label.clone()).collect();
    let mut dataset = Dataset::new(labels);
    let refresh_timeout = Duration::from_secs(cfg.browser.wait_timeout_secs);
    let mut page_num = 1;
    loop {
        info!(target: "ictcf.run", page = page_num, "scraping results page");
        let table = session.query(&cfg.selectors.table).await?;
        let outcome = parse_table(&table, &mut dataset, &cfg.selectors, page_num).await?;

        if page_num > 1 && outcome.appended == 0 {
            return Err(IctcfError::PageNotAdvanced { page: page_num });
        }
        let Some(next) = outcome.next else {
            break;
        };
        if cfg.max_pages.is_some_and(|max| page_num >= max) {
            info!(target: "ictcf.run", max_pages = page_num, "page limit reached");
            break;
        }

        let before = table.texts_of("tr").await?;
        next.click().await?;
        page_num += 1;
        wait_for_refresh(&table, &before, refresh_timeout, page_num).await?;
    }
    info!(
        target: "ictcf.run",
        pages = page_num,
        patients = dataset.len(),
        "results pages done"
    );

    let details = fetch_patient_details(
        session,
        &mut dataset,
        &cfg.overview_fields,
        &cfg.selectors,
    )
    .await?;
    let export_path = export_xlsx(&dataset, &cfg.export)?;

    Ok(RunSummary {
        pages: page_num,
        patients: dataset.len(),
        details,
        export_path,
        screenshot,
    })
}

/// Wait until the table clicked away from is replaced or re-rendered with
/// different rows.
async fn wait_for_refresh<E: DomElement>(
    table: &E,
    before: &[String],
    timeout: Duration,
    page: usize,
) -> Result<()> {
    let deadline = Instant::now() + timeout;
    loop {
        if table.is_stale().await? || table.texts_of("tr").await? != before {
            debug!(target: "ictcf.run", page, "results table refreshed");
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(IctcfError::PageNotAdvanced { page });
        }
        sleep(REFRESH_POLL).await;
    }
}

/// Run on `session`, then close it whether or not the run succeeded.
///
/// A failure to close is logged; the run's own result is returned.
pub async fn run_and_close<S: BrowserSession>(
    mut session: S,
    cfg: &IctcfConfig,
) -> Result<RunSummary> {
    let result = run(&mut session, cfg).await;

    if let Err(err) = session.close().await {
        warn!(target: "ictcf.run", error = %err, "failed to close browser session");
    }
    result
}

/// Create the export directory, open a browser session, and run on it.
pub async fn scrape(cfg: &IctcfConfig) -> Result<RunSummary> {
    tokio::fs::create_dir_all(&cfg.export.dir).await?;

    let driver = IctcfDriver::connect(&cfg.browser).await?;
    run_and_close(driver, cfg).await
}
