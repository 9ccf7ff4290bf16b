//! The lookup worker: one phone-number enrichment, run off the UI thread,
//! answered with exactly one [`WorkerEvent`].

use anyhow::Result;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::clock;
use super::flags::{flag_url, FlagImage};
use super::geocoder::{resolve_coordinates, Geocoder};
use crate::phone::{AnalyzedNumber, Directory, LookupResult, UNKNOWN};

/// What the user asked for: the composed number and the region hint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub phone_number: String,
    pub region_hint: String,
}

impl LookupRequest {
    /// Compose the dialable input from a calling code and the typed digits
    pub fn compose(calling_code: u16, typed: &str, region_hint: &str) -> Self {
        Self {
            phone_number: format!("+{}{}", calling_code, typed.trim()),
            region_hint: region_hint.to_string(),
        }
    }
}

/// Messages from background work to the controller
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    Completed {
        request_id: u64,
        result: LookupResult,
    },
    Failed {
        request_id: u64,
        message: String,
    },
    FlagLoaded {
        request_id: u64,
        flag: Option<FlagImage>,
    },
}

impl WorkerEvent {
    pub fn request_id(&self) -> u64 {
        match self {
            WorkerEvent::Completed { request_id, .. }
            | WorkerEvent::Failed { request_id, .. }
            | WorkerEvent::FlagLoaded { request_id, .. } => *request_id,
        }
    }
}

/// Collaborators a lookup needs; shared read-only between workers
pub struct LookupServices {
    pub directory: Arc<Directory>,
    pub geocoder: Arc<dyn Geocoder>,
    pub flag_url_base: String,
}

pub struct LookupWorker {
    request_id: u64,
    request: LookupRequest,
    services: Arc<LookupServices>,
}

impl LookupWorker {
    pub fn new(request_id: u64, request: LookupRequest, services: Arc<LookupServices>) -> Self {
        Self {
            request_id,
            request,
            services,
        }
    }

    /// Run the lookup and publish its single outcome
    pub fn run(self, events: &Sender<WorkerEvent>) {
        let event = self.outcome();
        if events.send(event).is_err() {
            warn!(
                target: "lookup",
                "Request {} finished after the controller went away",
                self.request_id
            );
        }
    }

    /// Run the lookup and turn it into the event to publish.
    ///
    /// Panics inside the parsing library are reported as failures so the
    /// controller is always answered.
    pub fn outcome(&self) -> WorkerEvent {
        let started = Instant::now();
        let request_id = self.request_id;

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            perform_lookup(&self.request, &self.services)
        }));

        let event = match result {
            Ok(Ok(result)) => WorkerEvent::Completed { request_id, result },
            Ok(Err(e)) => WorkerEvent::Failed {
                request_id,
                message: e.to_string(),
            },
            Err(_) => WorkerEvent::Failed {
                request_id,
                message: "The lookup stopped unexpectedly".to_string(),
            },
        };

        info!(
            target: "lookup",
            "Request {} for '{}' finished in {:?} ({})",
            request_id,
            self.request.phone_number,
            started.elapsed(),
            if matches!(event, WorkerEvent::Completed { .. }) { "ok" } else { "failed" }
        );
        event
    }
}

/// The blocking lookup sequence. Only parsing can fail it; the clock and
/// geocoding steps degrade to placeholders.
pub fn perform_lookup(request: &LookupRequest, services: &LookupServices) -> Result<LookupResult> {
    let number = AnalyzedNumber::parse(&request.phone_number, &request.region_hint)?;
    let directory = &services.directory;

    let region_code = number.region_code();
    let digits = number.prefix_digits();
    let valid = number.is_valid();
    let country_name = directory.country_name(region_code.as_deref());

    let carrier = if number.has_operator() {
        directory.carrier_for(&digits).unwrap_or_default().to_string()
    } else {
        String::new()
    };

    let location = match directory.description_for(&digits) {
        Some(description) => description.to_string(),
        None if valid && region_code.is_some() => country_name.clone(),
        None => String::new(),
    };

    let timezones = directory.timezones_for(&digits, region_code.as_deref());
    debug!(
        target: "lookup",
        "{}: region={:?} location='{}' zones={}",
        request.phone_number,
        region_code,
        location,
        timezones.len()
    );

    let current_time = timezones
        .first()
        .and_then(|zone| clock::current_time_in(zone))
        .unwrap_or_else(|| UNKNOWN.to_string());

    let coordinates = resolve_coordinates(services.geocoder.as_ref(), &location);

    Ok(LookupResult {
        phone_number: request.phone_number.clone(),
        valid,
        possible: number.is_possible(),
        international_format: number.international(),
        mobile_dialing_format: number.mobile_dialing(),
        e164_format: number.e164(),
        country_code: number.country_code(),
        national_number: number.national_number(),
        number_type: number.number_type(),
        carrier,
        location,
        flag_url: flag_url(&services.flag_url_base, region_code.as_deref()),
        country_name,
        region_code,
        timezones,
        current_time,
        coordinates,
    })
}
