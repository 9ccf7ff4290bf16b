//! Text content of the result panels and the map link.

use crate::phone::{Coordinates, LookupResult, UNKNOWN};

#[derive(Debug, Clone, PartialEq)]
pub struct PanelSection {
    pub title: &'static str,
    pub rows: Vec<(&'static str, String)>,
}

/// A titled list of label/value rows, rendered as one tab
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub sections: Vec<PanelSection>,
}

impl Panel {
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            out.push_str(&format!("========== {} ==========\n", section.title));
            for (label, value) in &section.rows {
                out.push_str(&format!("{}: {}\n", label, value));
            }
            out.push('\n');
        }
        out.trim_end().to_string()
    }

    /// Value of the first row with this label
    pub fn value(&self, label: &str) -> Option<&str> {
        self.sections
            .iter()
            .flat_map(|s| s.rows.iter())
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
    }
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}

fn or_unknown(value: &str) -> String {
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}

/// Location, country, timezone, validity and type
pub fn basic_panel(result: &LookupResult) -> Panel {
    Panel {
        sections: vec![PanelSection {
            title: "PHONE NUMBER INFORMATION",
            rows: vec![
                ("Phone Number", result.phone_number.clone()),
                ("Location", or_unknown(&result.location)),
                ("Country", result.country_name.clone()),
                ("Region Code", result.region_display().to_string()),
                ("Timezone", result.timezone_display()),
                ("Current Time", result.current_time.clone()),
                ("Operator", result.carrier_display().to_string()),
                ("Valid Number", yes_no(result.valid)),
                ("Possible Number", yes_no(result.possible)),
                ("Number Type", result.number_type.to_string()),
            ],
        }],
    }
}

/// Formatted numbers, carrier and coordinates
pub fn advanced_panel(result: &LookupResult) -> Panel {
    let coordinates = result
        .coordinates
        .map(|c| c.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string());

    Panel {
        sections: vec![
            PanelSection {
                title: "TECHNICAL DETAILS",
                rows: vec![
                    ("International Format", result.international_format.clone()),
                    ("Mobile Dialing Format", result.mobile_dialing_format.clone()),
                    ("E.164 Format", result.e164_format.clone()),
                    ("Original Number", result.national_number.to_string()),
                    ("Country Code", format!("+{}", result.country_code)),
                    ("Local Number", result.national_number.to_string()),
                ],
            },
            PanelSection {
                title: "CARRIER INFORMATION",
                rows: vec![("Carrier", result.carrier_display().to_string())],
            },
            PanelSection {
                title: "LOCATION DATA",
                rows: vec![("Coordinates", coordinates)],
            },
        ],
    }
}

/// OpenStreetMap link centred on `coords`
pub fn map_url(coords: Coordinates) -> String {
    let (lat, lon) = (coords.latitude, coords.longitude);
    format!(
        "https://www.openstreetmap.org/?mlat={}&mlon={}#map=12/{}/{}",
        lat, lon, lat, lon
    )
}
