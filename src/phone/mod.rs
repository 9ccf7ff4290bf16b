//! Phone number domain: result types, the parsing adapter and the
//! region/prefix directory.

pub mod directory;
pub mod number;
pub mod types;

pub use directory::Directory;
pub use number::AnalyzedNumber;
pub use types::{Coordinates, LookupResult, NumberType, RegionEntry, UNKNOWN};
