pub mod document;
pub mod keyboard;
pub mod page;
pub mod window;

pub use document::{DocumentKind, DriverVariant};
pub use keyboard::{KeyChord, KeyCode, KeyState, VirtualKeyEvent};
pub use page::{Fingerprint, PageArtifact};
pub use window::{WindowHandle, WindowInfo};
