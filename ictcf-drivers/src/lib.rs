//! Driver layer for browser automation.
//!
//! The scraper talks to the browser only through the traits in
//! [`ictcf_browser::session`], which keeps the pagination and extraction
//! logic independent of WebDriver and testable against in-memory pages.
//!
//! - [`ictcf_browser::driver::IctcfDriver`]: WebDriver session wrapper
//! - [`ictcf_browser::element::IctcfElement`]: element handle with bulk text/attribute helpers
//! - [`ictcf_browser::launch`]: browser capabilities and command-line arguments
pub mod ictcf_browser;
