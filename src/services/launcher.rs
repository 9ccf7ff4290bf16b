use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use tracing::{debug, error};

use super::flags::{load_flag, FlagFetcher};
use super::lookup_worker::{LookupRequest, LookupServices, LookupWorker, WorkerEvent};

/// Starts background work on behalf of the controller.
///
/// Implementations must answer every `launch_lookup` with exactly one
/// `Completed` or `Failed` event and every `launch_flag_fetch` with exactly
/// one `FlagLoaded` event on `events`.
pub trait LookupLauncher {
    fn launch_lookup(&self, request_id: u64, request: LookupRequest, events: Sender<WorkerEvent>);

    fn launch_flag_fetch(&self, request_id: u64, url: String, events: Sender<WorkerEvent>);
}

/// Runs each job on its own named OS thread
pub struct ThreadLauncher {
    services: Arc<LookupServices>,
    flags: Arc<dyn FlagFetcher>,
}

impl ThreadLauncher {
    pub fn new(services: Arc<LookupServices>, flags: Arc<dyn FlagFetcher>) -> Self {
        Self { services, flags }
    }
}

impl LookupLauncher for ThreadLauncher {
    fn launch_lookup(&self, request_id: u64, request: LookupRequest, events: Sender<WorkerEvent>) {
        let worker = LookupWorker::new(request_id, request, Arc::clone(&self.services));
        let worker_events = events.clone();

        let spawned = thread::Builder::new()
            .name(format!("lookup-{}", request_id))
            .spawn(move || worker.run(&worker_events));

        match spawned {
            Ok(_) => debug!(target: "lookup", "Started lookup worker {}", request_id),
            Err(e) => {
                error!(target: "lookup", "Could not start lookup worker: {}", e);
                let _ = events.send(WorkerEvent::Failed {
                    request_id,
                    message: format!("Could not start lookup: {}", e),
                });
            }
        }
    }

    fn launch_flag_fetch(&self, request_id: u64, url: String, events: Sender<WorkerEvent>) {
        let fetcher = Arc::clone(&self.flags);
        let fetch_events = events.clone();

        let spawned = thread::Builder::new()
            .name(format!("flag-{}", request_id))
            .spawn(move || {
                let flag = load_flag(fetcher.as_ref(), &url);
                let _ = fetch_events.send(WorkerEvent::FlagLoaded { request_id, flag });
            });

        if let Err(e) = spawned {
            error!(target: "flags", "Could not start flag fetch: {}", e);
            let _ = events.send(WorkerEvent::FlagLoaded {
                request_id,
                flag: None,
            });
        }
    }
}
