use anyhow::{Context, Result};
use tracing::info;

use crate::app::controller::AppController;

/// Opens a URL with the platform's default handler
pub trait UrlOpener {
    fn open(&self, url: &str) -> Result<()>;
}

pub struct SystemBrowser;

impl UrlOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        open::that(url).with_context(|| format!("Could not open {}", url))
    }
}

/// "View on map": open the OpenStreetMap link for the current coordinates.
///
/// Returns the status message to show.
pub fn view_on_map(controller: &AppController, opener: &dyn UrlOpener) -> Result<String> {
    let Some(url) = controller.map_url() else {
        return Ok("No coordinates to show on the map".to_string());
    };
    info!(target: "map", "Opening {}", url);
    opener.open(&url)?;
    Ok("Opened map in browser".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phone::{Coordinates, LookupResult, NumberType, RegionEntry};
    use crate::services::{LookupLauncher, LookupRequest, WorkerEvent};
    use std::cell::RefCell;
    use std::sync::mpsc::Sender;

    struct NullLauncher;

    impl LookupLauncher for NullLauncher {
        fn launch_lookup(&self, _: u64, _: LookupRequest, _: Sender<WorkerEvent>) {}
        fn launch_flag_fetch(&self, _: u64, _: String, _: Sender<WorkerEvent>) {}
    }

    #[derive(Default)]
    struct RecordingOpener(RefCell<Vec<String>>);

    impl UrlOpener for RecordingOpener {
        fn open(&self, url: &str) -> Result<()> {
            self.0.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    fn controller_with(coordinates: Option<Coordinates>) -> AppController {
        let mut controller = AppController::new(Box::new(NullLauncher), false);
        let region = RegionEntry {
            code: "ID".to_string(),
            name: "Indonesia".to_string(),
            calling_code: 62,
        };
        controller.submit("2112345678", &region);
        controller.handle_event(WorkerEvent::Completed {
            request_id: 1,
            result: LookupResult {
                phone_number: "+622112345678".to_string(),
                valid: true,
                possible: true,
                international_format: "+62 21 1234 5678".to_string(),
                mobile_dialing_format: "021 1234 5678".to_string(),
                e164_format: "+622112345678".to_string(),
                country_code: 62,
                national_number: 2112345678,
                number_type: NumberType::FixedLine,
                carrier: String::new(),
                location: "Jakarta".to_string(),
                region_code: Some("ID".to_string()),
                country_name: "Indonesia".to_string(),
                flag_url: "https://flagcdn.com/w40/id.png".to_string(),
                timezones: vec!["Asia/Jakarta".to_string()],
                current_time: "2024-01-16 00:30:00".to_string(),
                coordinates,
            },
        });
        controller
    }

    #[test]
    fn test_opens_osm_link() {
        let controller = controller_with(Some(Coordinates::new(-6.175, 106.8275)));
        let opener = RecordingOpener::default();

        let message = view_on_map(&controller, &opener).unwrap();
        assert_eq!(message, "Opened map in browser");
        assert_eq!(
            opener.0.borrow().as_slice(),
            ["https://www.openstreetmap.org/?mlat=-6.175&mlon=106.8275#map=12/-6.175/106.8275".to_string()]
        );
    }

    #[test]
    fn test_without_coordinates_nothing_opens() {
        let controller = controller_with(None);
        let opener = RecordingOpener::default();

        view_on_map(&controller, &opener).unwrap();
        assert!(opener.0.borrow().is_empty());
    }
}
