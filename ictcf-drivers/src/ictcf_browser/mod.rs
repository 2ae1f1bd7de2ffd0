pub mod driver;
pub mod element;
pub mod launch;
pub mod session;

pub use driver::IctcfDriver;
pub use element::IctcfElement;
pub use session::{BrowserSession, DomElement};
