//! WindowManager service: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for locating X11 windows
//! and issuing window-state requests (maximize, focus, close) against them.
//! It MUST NOT decide when to capture or when a document has ended; that belongs
//! to the capture session controller.

mod dry_run;
mod r#trait;
mod window_manager;
mod wmctrl;
mod xdotool;

pub use self::r#trait::{create_window_manager, WindowManager};
