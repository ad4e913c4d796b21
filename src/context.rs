use std::fmt;
use std::str::FromStr;

use chrono::FixedOffset;
use chrono_tz::Tz;

use crate::errors::Error;

/// Zone applied when a date/time target needs an absolute instant but the
/// text carries no zone of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    #[default]
    Utc,
    /// The running system's local zone.
    System,
    Named(Tz),
    Offset(FixedOffset),
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Utc => f.write_str("UTC"),
            Zone::System => f.write_str("system"),
            Zone::Named(tz) => write!(f, "{tz}"),
            Zone::Offset(off) => write!(f, "{off}"),
        }
    }
}

impl FromStr for Zone {
    type Err = Error;

    /// Accepts `utc`, `system` (or `local`), `±HH:MM`, or an IANA zone id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            _ if s.eq_ignore_ascii_case("utc") || s == "Z" => Ok(Zone::Utc),
            _ if s.eq_ignore_ascii_case("system") || s.eq_ignore_ascii_case("local") => {
                Ok(Zone::System)
            }
            _ if s.starts_with('+') || s.starts_with('-') => s
                .parse::<FixedOffset>()
                .map(Zone::Offset)
                .map_err(|_| Error::InvalidZone(s.to_string())),
            _ => s
                .parse::<Tz>()
                .map(Zone::Named)
                .map_err(|_| Error::InvalidZone(s.to_string())),
        }
    }
}

/// Options carried by a coercion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    pub zone: Zone,
}

impl Context {
    pub fn utc() -> Self {
        Self { zone: Zone::Utc }
    }

    pub fn system() -> Self {
        Self { zone: Zone::System }
    }

    pub fn with_zone(zone: Zone) -> Self {
        Self { zone }
    }
}
