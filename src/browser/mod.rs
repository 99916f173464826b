//! Browser driving over the WebDriver protocol
//!
//! The browser runtime itself is external; this module owns the wire
//! client, fixed-budget element waits, and the page objects naming the
//! discovery UI's DOM surface.

pub mod session;
pub mod types;
pub mod ui;

pub use session::{webdriver_ready, Element, Session};
