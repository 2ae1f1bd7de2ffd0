use ictcf_config::BrowserConfig;
use serde_json::{json, Map, Value};
use webdriver::capabilities::Capabilities;

/// Construct browser command-line arguments for a session.
pub fn build_browser_arguments(config: &BrowserConfig) -> Vec<String> {
    let (width, height) = config.window_size;
    let mut args = vec![
        "--disable-dev-shm-usage".to_string(),
        "--no-sandbox".to_string(),
        "--disable-extensions".to_string(),
        format!("--window-size={width},{height}"),
    ];
    if let Some(user_agent) = &config.user_agent {
        args.push(format!("--user-agent={user_agent}"));
    }
    if config.headless {
        args.push("--headless".to_string());
        args.push("--disable-gpu".to_string());
    }
    args
}

/// WebDriver capabilities carrying the launch arguments.
#[cfg(feature = "chromium")]
pub fn build_capabilities(config: &BrowserConfig) -> Capabilities {
    let mut caps = Capabilities::new();
    let mut chrome_opts = Map::new();
    chrome_opts.insert("args".to_string(), json!(build_browser_arguments(config)));
    caps.insert("goog:chromeOptions".to_string(), Value::Object(chrome_opts));
    caps
}

/// WebDriver capabilities carrying the launch arguments.
#[cfg(not(feature = "chromium"))]
pub fn build_capabilities(config: &BrowserConfig) -> Capabilities {
    let mut caps = Capabilities::new();
    let mut firefox_opts = Map::new();
    let args: Vec<String> = build_browser_arguments(config)
        .into_iter()
        .filter(|a| a == "--headless")
        .collect();
    firefox_opts.insert("args".to_string(), json!(args));
    caps.insert("moz:firefoxOptions".to_string(), Value::Object(firefox_opts));
    caps
}
