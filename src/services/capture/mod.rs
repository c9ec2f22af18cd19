mod dry_run;
mod import;
mod r#trait;

pub use self::r#trait::{create_capture_provider, CaptureProvider};
