//! Capture session engine: the bounded paging-and-capture loop shared by all
//! document kinds, plus the pieces it is built from (pacing, window
//! stabilization, per-kind page drivers, page artifact storage).

mod artifacts;
mod controller;
mod drivers;
mod pacer;
mod stabilizer;

#[cfg(test)]
pub(crate) mod fakes;

pub use controller::{build_session, CaptureRequest, Termination};
pub use pacer::Pacer;
