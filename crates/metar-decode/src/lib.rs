//! METAR decoding for METAR Card
//!
//! Pure, synchronous helpers that turn a raw METAR string and the upstream
//! decoded payload into display-ready text: code table lookups, observation
//! time reconstruction, remark extraction and report formatting.

pub mod decoded;
pub mod display;
pub mod error;
pub mod format;
pub mod lookup;
pub mod remark;
pub mod time;

pub use decoded::{CloudLayer, DecodedFields, VisibilityUnit};
pub use display::{DisplayModel, SummaryTiles};
pub use error::{DecodeError, FormatError};
pub use format::ReportFormatter;
pub use lookup::{CodeEntry, CodeMap, Fallback};
pub use remark::extract_remark;
pub use time::{HostZone, MetarTimeResolver, MetarTimestamp, LEGACY_MIXED_TIMEZONE_DISPLAY};
