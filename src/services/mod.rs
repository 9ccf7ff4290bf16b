//! Background services used by the lookup pipeline.

pub mod clock;
pub mod flags;
pub mod geocoder;
pub mod http;
pub mod launcher;
pub mod lookup_worker;

pub use launcher::{LookupLauncher, ThreadLauncher};
pub use lookup_worker::{LookupRequest, LookupServices, LookupWorker, WorkerEvent};
