//! Thin adapter over the `phonenumber` crate.
//!
//! Everything the lookup needs from the parsing library goes through here so
//! the rest of the crate deals in plain strings and [`NumberType`].

use anyhow::Result;
use phonenumber::metadata::DATABASE;
use phonenumber::{country, Mode, PhoneNumber, Type};

use super::types::NumberType;

/// libphonenumber's bounds on the national significant number
const MIN_NATIONAL_DIGITS: usize = 2;
const MAX_NATIONAL_DIGITS: usize = 17;

const NANPA_CALLING_CODE: u16 = 1;

/// A parsed number plus the region hint it was parsed against
#[derive(Debug, Clone)]
pub struct AnalyzedNumber {
    number: PhoneNumber,
    region_hint: Option<String>,
}

impl AnalyzedNumber {
    /// Parse `input` using `region_hint` to resolve national-format numbers.
    ///
    /// An unknown hint is treated like no hint; numbers in international
    /// form parse either way.
    pub fn parse(input: &str, region_hint: &str) -> Result<Self> {
        let hint = region_hint.trim().to_uppercase();
        let id = hint.parse::<country::Id>().ok();
        let number = phonenumber::parse(id, input)?;

        Ok(Self {
            number,
            region_hint: (!hint.is_empty()).then_some(hint),
        })
    }

    /// Region of the number. Valid numbers the library leaves without a
    /// region (national leading zero, e.g. Italian landlines) get the main
    /// region of their calling code.
    pub fn region_code(&self) -> Option<String> {
        match self.number.country().id() {
            Some(id) => Some(format!("{:?}", id)),
            None if self.is_valid() => main_region_for_code(self.country_code()),
            None => None,
        }
    }

    pub fn country_code(&self) -> u16 {
        self.number.country().code()
    }

    pub fn national_number(&self) -> u64 {
        self.number.national().value()
    }

    pub fn is_valid(&self) -> bool {
        phonenumber::is_valid(&self.number)
    }

    /// Whether the number has a plausible shape for a known calling code
    pub fn is_possible(&self) -> bool {
        if DATABASE.by_code(&self.country_code()).is_none() {
            return false;
        }
        let digits = self
            .prefix_digits()
            .len()
            .saturating_sub(self.country_code().to_string().len());
        (MIN_NATIONAL_DIGITS..=MAX_NATIONAL_DIGITS).contains(&digits)
    }

    pub fn international(&self) -> String {
        self.format(Mode::International)
    }

    pub fn e164(&self) -> String {
        self.format(Mode::E164)
    }

    /// The form to dial from a mobile phone in the hint region.
    ///
    /// Same-region numbers use the national form, except inside NANPA where
    /// the international form always works.
    pub fn mobile_dialing(&self) -> String {
        let same_region = match (self.region_code(), self.region_hint.as_deref()) {
            (Some(region), Some(hint)) => region == hint,
            _ => false,
        };

        if same_region && self.country_code() != NANPA_CALLING_CODE {
            self.format(Mode::National)
        } else {
            self.format(Mode::International)
        }
    }

    pub fn number_type(&self) -> NumberType {
        classify(self.number.number_type(&DATABASE))
    }

    /// Whether carrier names apply to this number
    pub fn has_operator(&self) -> bool {
        carries_operator(self.number.number_type(&DATABASE))
    }

    /// E.164 digits without the leading '+', used for prefix lookups.
    /// Keeps national leading zeros, which the numeric national part drops.
    pub fn prefix_digits(&self) -> String {
        self.e164().chars().filter(|c| c.is_ascii_digit()).collect()
    }

    fn format(&self, mode: Mode) -> String {
        self.number.format().mode(mode).to_string()
    }
}

/// Map the library's number type onto the closed display classification
pub fn classify(kind: Type) -> NumberType {
    match kind {
        Type::Mobile => NumberType::Mobile,
        Type::FixedLine | Type::FixedLineOrMobile => NumberType::FixedLine,
        Type::Voip => NumberType::Voip,
        Type::TollFree => NumberType::TollFree,
        Type::PremiumRate => NumberType::PremiumRate,
        Type::SharedCost => NumberType::SharedCost,
        Type::PersonalNumber => NumberType::Personal,
        Type::Pager => NumberType::Pager,
        Type::Uan => NumberType::Uan,
        _ => NumberType::Unknown,
    }
}

/// Carrier data only exists for numbers that may be mobile
pub fn carries_operator(kind: Type) -> bool {
    matches!(kind, Type::Mobile | Type::FixedLineOrMobile | Type::Pager)
}

/// First region the metadata lists for a calling code, e.g. IT for 39
pub fn main_region_for_code(code: u16) -> Option<String> {
    DATABASE
        .by_code(&code)
        .and_then(|regions| regions.first().map(|meta| meta.id().to_string()))
}

/// Calling code for a region, if the metadata knows the region
pub fn calling_code_for_region(region: &str) -> Option<u16> {
    DATABASE.by_id(region).map(|meta| meta.country_code())
}
