//! Process-wide application context.
//!
//! Built once in `main` from the loaded [`Config`]; owns the directory and
//! the shared lookup services and hands out the controller. Dropping it
//! ends the application.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use super::controller::AppController;
use crate::config::Config;
use crate::phone::{Directory, RegionEntry};
use crate::services::flags::{FlagCdnFetcher, FlagFetcher};
use crate::services::geocoder::{DisabledGeocoder, Geocoder, NominatimGeocoder};
use crate::services::{http, LookupServices, ThreadLauncher};

pub struct AppContext {
    config: Config,
    services: Arc<LookupServices>,
    flags: Arc<dyn FlagFetcher>,
    regions: Vec<RegionEntry>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let directory = match &config.directory.extra_prefixes_file {
            Some(path) => Directory::with_extra_prefixes(path)?,
            None => Directory::builtin()?,
        };
        let directory = Arc::new(directory);

        let client = http::build_client(
            &config.lookup.user_agent,
            config.lookup.request_timeout_secs,
        )?;

        let geocoder: Arc<dyn Geocoder> = if config.lookup.geocoding_enabled {
            Arc::new(NominatimGeocoder::new(client.clone(), &config.lookup.geocoder_url))
        } else {
            info!(target: "phone_tracker", "Geocoding disabled by configuration");
            Arc::new(DisabledGeocoder)
        };

        let services = Arc::new(LookupServices {
            directory: Arc::clone(&directory),
            geocoder,
            flag_url_base: config.lookup.flag_url_base.clone(),
        });

        let regions = directory.region_entries();
        info!(
            target: "phone_tracker",
            "Context ready: {} selectable regions, default {}",
            regions.len(),
            config.lookup.default_region
        );

        Ok(Self {
            config,
            services,
            flags: Arc::new(FlagCdnFetcher::new(client)),
            regions,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn regions(&self) -> &[RegionEntry] {
        &self.regions
    }

    /// Index of the configured default region, or the first region
    pub fn default_region_index(&self) -> usize {
        let wanted = self.config.lookup.default_region.as_str();
        self.regions
            .iter()
            .position(|r| r.code == wanted)
            .unwrap_or(0)
    }

    /// A controller whose lookups run on background threads
    pub fn controller(&self) -> AppController {
        let launcher = ThreadLauncher::new(Arc::clone(&self.services), Arc::clone(&self.flags));
        AppController::new(Box::new(launcher), self.config.display.show_flag)
    }
}
