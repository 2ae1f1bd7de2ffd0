use clap::Parser;
use ictcf_config::IctcfConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ictcf", about = "Scrape iCTCF patient records into a spreadsheet")]
pub struct Cli {
    /// YAML config file; skipped when absent
    #[arg(short, long, env = "ICTCF_CONFIG", default_value = "ictcf.yaml")]
    pub config: PathBuf,

    /// Directory receiving the workbook (and screenshot)
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// WebDriver endpoint, e.g. http://localhost:9515
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Save a screenshot of the results page
    #[arg(long)]
    pub screenshot: bool,

    /// Stop after this many results pages
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// Flags win over file and environment values.
    pub fn apply(&self, cfg: &mut IctcfConfig) {
        if let Some(dir) = &self.export_dir {
            cfg.export.dir = dir.clone();
        }
        if let Some(url) = &self.webdriver_url {
            cfg.browser.webdriver_url = url.clone();
        }
        if self.headed {
            cfg.browser.headless = false;
        }
        if self.screenshot {
            cfg.export.screenshot = true;
        }
        if self.max_pages.is_some() {
            cfg.max_pages = self.max_pages;
        }
    }
}
