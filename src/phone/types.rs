use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder shown wherever a best-effort value could not be resolved
pub const UNKNOWN: &str = "Unknown";

/// Closed classification of a phone number, as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumberType {
    Mobile,
    FixedLine,
    Voip,
    TollFree,
    PremiumRate,
    SharedCost,
    Personal,
    Pager,
    Uan,
    Unknown,
}

impl NumberType {
    pub fn label(&self) -> &'static str {
        match self {
            NumberType::Mobile => "Mobile",
            NumberType::FixedLine => "Fixed-line",
            NumberType::Voip => "VoIP",
            NumberType::TollFree => "Toll-free",
            NumberType::PremiumRate => "Premium-rate",
            NumberType::SharedCost => "Shared-cost",
            NumberType::Personal => "Personal",
            NumberType::Pager => "Pager",
            NumberType::Uan => "UAN",
            NumberType::Unknown => UNKNOWN,
        }
    }
}

impl fmt::Display for NumberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Everything one lookup found out about a phone number.
///
/// Built once inside the worker and handed to the controller by value; the
/// controller only ever keeps the most recent one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    /// The composed input exactly as it was submitted
    pub phone_number: String,
    pub valid: bool,
    pub possible: bool,
    pub international_format: String,
    pub mobile_dialing_format: String,
    pub e164_format: String,
    pub country_code: u16,
    pub national_number: u64,
    pub number_type: NumberType,
    /// Empty when no carrier is known for the number
    pub carrier: String,
    /// Geographic description, empty when nothing is known
    pub location: String,
    pub region_code: Option<String>,
    pub country_name: String,
    /// Empty when the region is unknown
    pub flag_url: String,
    pub timezones: Vec<String>,
    pub current_time: String,
    pub coordinates: Option<Coordinates>,
}

impl LookupResult {
    /// Timezones joined for display, "Unknown" when there are none
    pub fn timezone_display(&self) -> String {
        if self.timezones.is_empty() {
            UNKNOWN.to_string()
        } else {
            self.timezones.join(", ")
        }
    }

    pub fn carrier_display(&self) -> &str {
        if self.carrier.is_empty() {
            UNKNOWN
        } else {
            &self.carrier
        }
    }

    pub fn region_display(&self) -> &str {
        self.region_code.as_deref().unwrap_or(UNKNOWN)
    }
}

/// One selectable region in the region picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionEntry {
    /// ISO 3166-1 alpha-2 code, e.g. "US"
    pub code: String,
    pub name: String,
    pub calling_code: u16,
}

impl RegionEntry {
    /// Text shown in the selector, e.g. "United States (+1)"
    pub fn display_name(&self) -> String {
        format!("{} (+{})", self.name, self.calling_code)
    }
}
