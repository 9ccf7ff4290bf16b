//! The lookup coordinator.
//!
//! Owns everything the screen shows and is only ever touched from the UI
//! thread. Background work talks to it through a channel of
//! [`WorkerEvent`]s that the UI loop drains between frames.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::panels::{self, Panel};
use crate::phone::{Coordinates, LookupResult, RegionEntry};
use crate::services::flags::FlagImage;
use crate::services::{LookupLauncher, LookupRequest, WorkerEvent};

pub const STATUS_READY: &str = "Ready";
pub const STATUS_PROCESSING: &str = "Processing... Please wait";
pub const STATUS_ERROR: &str = "Error occurred";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupPhase {
    Idle,
    Submitting { request_id: u64 },
    Displaying,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Warning,
    Info,
    Error,
}

/// A modal message; the UI shows at most one at a time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
}

impl Dialog {
    fn new(kind: DialogKind, title: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagState {
    Hidden,
    Loading,
    Image(FlagImage),
    Label(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Started { request_id: u64 },
    /// Nothing to look up; a validation dialog is showing
    EmptyInput,
    /// A lookup is already in flight
    Busy,
}

pub struct AppController {
    launcher: Box<dyn LookupLauncher>,
    events_tx: Sender<WorkerEvent>,
    events_rx: Receiver<WorkerEvent>,
    phase: LookupPhase,
    next_request_id: u64,
    displayed_request: Option<u64>,
    last_result: Option<LookupResult>,
    coordinates: Option<Coordinates>,
    flag: FlagState,
    show_flags: bool,
    dialog: Option<Dialog>,
    status: String,
}

impl AppController {
    pub fn new(launcher: Box<dyn LookupLauncher>, show_flags: bool) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            launcher,
            events_tx,
            events_rx,
            phase: LookupPhase::Idle,
            next_request_id: 1,
            displayed_request: None,
            last_result: None,
            coordinates: None,
            flag: FlagState::Hidden,
            show_flags,
            dialog: None,
            status: STATUS_READY.to_string(),
        }
    }

    pub fn phase(&self) -> LookupPhase {
        self.phase
    }

    /// False while a lookup is in flight
    pub fn can_submit(&self) -> bool {
        !matches!(self.phase, LookupPhase::Submitting { .. })
    }

    /// Start a lookup for `typed` digits dialled with `region`'s calling code
    pub fn submit(&mut self, typed: &str, region: &RegionEntry) -> SubmitOutcome {
        if !self.can_submit() {
            debug!(target: "controller", "Submission ignored, lookup in flight");
            return SubmitOutcome::Busy;
        }

        let typed = typed.trim();
        if typed.is_empty() {
            self.dialog = Some(Dialog::new(
                DialogKind::Warning,
                "Input Error",
                "Please enter a phone number",
            ));
            return SubmitOutcome::EmptyInput;
        }

        let request_id = self.next_request_id;
        self.next_request_id += 1;

        let request = LookupRequest::compose(region.calling_code, typed, &region.code);
        info!(
            target: "controller",
            "Submitting request {}: {} (region {})",
            request_id, request.phone_number, request.region_hint
        );

        self.phase = LookupPhase::Submitting { request_id };
        self.status = STATUS_PROCESSING.to_string();
        self.launcher
            .launch_lookup(request_id, request, self.events_tx.clone());

        SubmitOutcome::Started { request_id }
    }

    /// Apply every event already waiting, without blocking
    pub fn process_pending_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.events_rx.try_recv() {
                Ok(event) => {
                    self.handle_event(event);
                    handled += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        handled
    }

    /// Block up to `timeout` for one event; returns whether one arrived
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        match self.events_rx.recv_timeout(timeout) {
            Ok(event) => {
                self.handle_event(event);
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    pub fn handle_event(&mut self, event: WorkerEvent) {
        debug!(target: "controller", "Event for request {}", event.request_id());
        match event {
            WorkerEvent::Completed { request_id, result } => {
                if !self.is_in_flight(request_id) {
                    warn!(target: "controller", "Dropping stale result for request {}", request_id);
                    return;
                }
                self.display_result(request_id, result);
            }
            WorkerEvent::Failed {
                request_id,
                message,
            } => {
                if !self.is_in_flight(request_id) {
                    warn!(target: "controller", "Dropping stale failure for request {}", request_id);
                    return;
                }
                warn!(target: "controller", "Request {} failed: {}", request_id, message);
                self.phase = LookupPhase::Failed;
                self.status = STATUS_ERROR.to_string();
                self.dialog = Some(Dialog::new(
                    DialogKind::Error,
                    "Error",
                    format!("An error occurred:\n{}", message),
                ));
            }
            WorkerEvent::FlagLoaded { request_id, flag } => {
                if self.displayed_request != Some(request_id) {
                    debug!(target: "controller", "Dropping flag for request {}", request_id);
                    return;
                }
                self.flag = match flag {
                    Some(image) => FlagState::Image(image),
                    None => FlagState::Label(format!(
                        "Flag of {}",
                        self.last_result
                            .as_ref()
                            .map(|r| r.country_name.as_str())
                            .unwrap_or_default()
                    )),
                };
            }
        }
    }

    fn is_in_flight(&self, request_id: u64) -> bool {
        self.phase == LookupPhase::Submitting { request_id }
    }

    fn display_result(&mut self, request_id: u64, result: LookupResult) {
        self.phase = LookupPhase::Displaying;
        self.status = STATUS_READY.to_string();
        self.displayed_request = Some(request_id);
        self.coordinates = result.coordinates;

        self.flag = if result.flag_url.is_empty() || !self.show_flags {
            FlagState::Hidden
        } else {
            self.launcher.launch_flag_fetch(
                request_id,
                result.flag_url.clone(),
                self.events_tx.clone(),
            );
            FlagState::Loading
        };

        self.last_result = Some(result);
        self.dialog = Some(Dialog::new(
            DialogKind::Info,
            "Success",
            "Phone number information retrieved successfully!",
        ));
    }

    pub fn last_result(&self) -> Option<&LookupResult> {
        self.last_result.as_ref()
    }

    pub fn basic_panel(&self) -> Option<Panel> {
        self.last_result.as_ref().map(panels::basic_panel)
    }

    pub fn advanced_panel(&self) -> Option<Panel> {
        self.last_result.as_ref().map(panels::advanced_panel)
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    /// The "view on map" action is only available with coordinates
    pub fn map_available(&self) -> bool {
        self.coordinates.is_some()
    }

    pub fn map_url(&self) -> Option<String> {
        self.coordinates.map(panels::map_url)
    }

    pub fn flag(&self) -> &FlagState {
        &self.flag
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialog = None;
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phone::NumberType;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Launches {
        lookups: Vec<(u64, LookupRequest)>,
        flags: Vec<(u64, String)>,
    }

    struct RecordingLauncher(Rc<RefCell<Launches>>);

    impl LookupLauncher for RecordingLauncher {
        fn launch_lookup(&self, request_id: u64, request: LookupRequest, _events: Sender<WorkerEvent>) {
            self.0.borrow_mut().lookups.push((request_id, request));
        }

        fn launch_flag_fetch(&self, request_id: u64, url: String, _events: Sender<WorkerEvent>) {
            self.0.borrow_mut().flags.push((request_id, url));
        }
    }

    fn controller() -> (AppController, Rc<RefCell<Launches>>) {
        let launches = Rc::new(RefCell::new(Launches::default()));
        let controller = AppController::new(Box::new(RecordingLauncher(launches.clone())), true);
        (controller, launches)
    }

    fn us() -> RegionEntry {
        RegionEntry {
            code: "US".to_string(),
            name: "United States".to_string(),
            calling_code: 1,
        }
    }

    fn result(phone: &str, coordinates: Option<Coordinates>) -> LookupResult {
        LookupResult {
            phone_number: phone.to_string(),
            valid: true,
            possible: true,
            international_format: "+1 202-555-0123".to_string(),
            mobile_dialing_format: "+1 202-555-0123".to_string(),
            e164_format: phone.to_string(),
            country_code: 1,
            national_number: 2025550123,
            number_type: NumberType::FixedLine,
            carrier: String::new(),
            location: "Washington D.C.".to_string(),
            region_code: Some("US".to_string()),
            country_name: "United States".to_string(),
            flag_url: "https://flagcdn.com/w40/us.png".to_string(),
            timezones: vec!["America/New_York".to_string()],
            current_time: "2024-01-15 12:30:00".to_string(),
            coordinates,
        }
    }

    fn started(outcome: SubmitOutcome) -> u64 {
        match outcome {
            SubmitOutcome::Started { request_id } => request_id,
            other => panic!("lookup not started: {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_is_rejected_synchronously() {
        let (mut controller, launches) = controller();

        assert_eq!(controller.submit("   ", &us()), SubmitOutcome::EmptyInput);

        assert!(launches.borrow().lookups.is_empty());
        assert_eq!(controller.phase(), LookupPhase::Idle);
        let dialog = controller.dialog().unwrap();
        assert_eq!(dialog.kind, DialogKind::Warning);
        assert_eq!(dialog.message, "Please enter a phone number");
    }

    #[test]
    fn test_submission_is_blocked_until_completion() {
        let (mut controller, launches) = controller();

        let id = started(controller.submit("2025550123", &us()));
        assert!(!controller.can_submit());
        assert_eq!(controller.status(), STATUS_PROCESSING);
        assert_eq!(controller.submit("2025550124", &us()), SubmitOutcome::Busy);
        assert_eq!(launches.borrow().lookups.len(), 1);
        assert_eq!(launches.borrow().lookups[0].1.phone_number, "+12025550123");
        assert_eq!(launches.borrow().lookups[0].1.region_hint, "US");

        controller.handle_event(WorkerEvent::Completed {
            request_id: id,
            result: result("+12025550123", None),
        });

        assert!(controller.can_submit());
        assert_eq!(controller.phase(), LookupPhase::Displaying);
        assert_eq!(controller.status(), STATUS_READY);
        assert_eq!(controller.dialog().unwrap().kind, DialogKind::Info);
        assert!(started(controller.submit("2025550124", &us())) > id);
    }

    #[test]
    fn test_failure_reenables_and_keeps_previous_result() {
        let (mut controller, _launches) = controller();

        let first = started(controller.submit("2025550123", &us()));
        controller.handle_event(WorkerEvent::Completed {
            request_id: first,
            result: result("+12025550123", Some(Coordinates::new(38.9, -77.0))),
        });
        controller.dismiss_dialog();

        let second = started(controller.submit("abc", &us()));
        controller.handle_event(WorkerEvent::Failed {
            request_id: second,
            message: "not a number".to_string(),
        });

        assert!(controller.can_submit());
        assert_eq!(controller.phase(), LookupPhase::Failed);
        assert_eq!(controller.status(), STATUS_ERROR);
        let dialog = controller.dialog().unwrap();
        assert_eq!(dialog.kind, DialogKind::Error);
        assert!(dialog.message.ends_with("not a number"));
        assert_eq!(
            controller.last_result().map(|r| r.phone_number.as_str()),
            Some("+12025550123")
        );
        assert!(controller.map_available());
    }

    #[test]
    fn test_new_result_overwrites_every_field() {
        let (mut controller, _launches) = controller();

        let first = started(controller.submit("2025550123", &us()));
        controller.handle_event(WorkerEvent::Completed {
            request_id: first,
            result: result("+12025550123", Some(Coordinates::new(38.9, -77.0))),
        });
        controller.handle_event(WorkerEvent::FlagLoaded {
            request_id: first,
            flag: None,
        });
        assert_eq!(controller.flag(), &FlagState::Label("Flag of United States".to_string()));

        let second = started(controller.submit("2135550100", &us()));
        let mut next = result("+12135550100", None);
        next.location = "Los Angeles, California".to_string();
        next.carrier = "Example Wireless".to_string();
        controller.handle_event(WorkerEvent::Completed {
            request_id: second,
            result: next.clone(),
        });

        assert_eq!(controller.last_result(), Some(&next));
        assert_eq!(controller.flag(), &FlagState::Loading);
        assert!(!controller.map_available());
        assert_eq!(controller.map_url(), None);

        let basic = controller.basic_panel().unwrap();
        assert_eq!(basic.value("Location"), Some("Los Angeles, California"));
        assert_eq!(basic.value("Operator"), Some("Example Wireless"));
        let advanced = controller.advanced_panel().unwrap();
        assert_eq!(advanced.value("Coordinates"), Some("Unknown"));
    }

    #[test]
    fn test_coordinates_enable_map() {
        let (mut controller, launches) = controller();
        let id = started(controller.submit("2025550123", &us()));
        controller.handle_event(WorkerEvent::Completed {
            request_id: id,
            result: result("+12025550123", Some(Coordinates::new(38.9, -77.0))),
        });

        assert!(controller.map_available());
        assert_eq!(
            controller.map_url().as_deref(),
            Some("https://www.openstreetmap.org/?mlat=38.9&mlon=-77#map=12/38.9/-77")
        );
        assert_eq!(
            launches.borrow().flags,
            vec![(id, "https://flagcdn.com/w40/us.png".to_string())]
        );
    }

    #[test]
    fn test_stale_events_are_ignored() {
        let (mut controller, _launches) = controller();
        let first = started(controller.submit("2025550123", &us()));
        controller.handle_event(WorkerEvent::Completed {
            request_id: first,
            result: result("+12025550123", None),
        });

        let second = started(controller.submit("2135550100", &us()));

        // answers for requests that are not in flight change nothing
        controller.handle_event(WorkerEvent::Failed {
            request_id: first,
            message: "late".to_string(),
        });
        assert_eq!(controller.phase(), LookupPhase::Submitting { request_id: second });

        // a flag for a result that is no longer displayed is dropped
        controller.handle_event(WorkerEvent::Completed {
            request_id: second,
            result: result("+12135550100", None),
        });
        controller.handle_event(WorkerEvent::FlagLoaded {
            request_id: first,
            flag: None,
        });
        assert_eq!(controller.flag(), &FlagState::Loading);
    }

    #[test]
    fn test_missing_region_hides_flag() {
        let (mut controller, launches) = controller();
        let id = started(controller.submit("2025550123", &us()));
        let mut no_region = result("+12025550123", None);
        no_region.region_code = None;
        no_region.flag_url.clear();

        controller.handle_event(WorkerEvent::Completed {
            request_id: id,
            result: no_region,
        });

        assert_eq!(controller.flag(), &FlagState::Hidden);
        assert!(launches.borrow().flags.is_empty());
    }

    #[test]
    fn test_events_arrive_through_the_channel() {
        let (mut controller, _launches) = controller();
        let id = started(controller.submit("2025550123", &us()));

        controller
            .events_tx
            .send(WorkerEvent::Completed {
                request_id: id,
                result: result("+12025550123", None),
            })
            .unwrap();

        assert_eq!(controller.process_pending_events(), 1);
        assert_eq!(controller.phase(), LookupPhase::Displaying);
        assert_eq!(controller.process_pending_events(), 0);
        assert!(!controller.wait_for_event(Duration::from_millis(10)));
    }
}
