//! Date/time values and text parsing.
//!
//! Parsing tries, in order: the target's canonical format, the date-only
//! patterns, then the date-time patterns. The first match wins, so the
//! pattern order below is a precedence order (day-first before month-first,
//! plain before zoned).

use std::cmp::Ordering;
use std::fmt;

use chrono::{
    DateTime, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    SecondsFormat, TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;
use tracing::debug;

use crate::context::Zone;
use crate::types::TypeDescriptor;

/// Legacy calendar timestamp: milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Sub-millisecond precision is truncated.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }

    pub fn millis(self) -> i64 {
        self.0
    }

    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => write!(f, "{}ms", self.0),
        }
    }
}

/// Date-time with a fixed offset and, when known, the zone it was taken in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonedDateTime {
    datetime: DateTime<FixedOffset>,
    zone: Option<Tz>,
}

impl ZonedDateTime {
    pub fn new(datetime: DateTime<FixedOffset>, zone: Option<Tz>) -> Self {
        Self { datetime, zone }
    }

    pub fn in_zone(datetime: DateTime<Tz>) -> Self {
        let zone = datetime.timezone();
        Self {
            datetime: datetime.with_timezone(&datetime.offset().fix()),
            zone: Some(zone),
        }
    }

    pub fn datetime(&self) -> DateTime<FixedOffset> {
        self.datetime
    }

    pub fn zone(&self) -> Option<Tz> {
        self.zone
    }

    pub fn to_instant(&self) -> DateTime<Utc> {
        self.datetime.with_timezone(&Utc)
    }
}

impl fmt::Display for ZonedDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.datetime.to_rfc3339_opts(SecondsFormat::AutoSi, true))?;
        if let Some(zone) = self.zone {
            write!(f, "[{zone}]")?;
        }
        Ok(())
    }
}

/// The five supported date representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    LocalDate,
    LocalDateTime,
    Zoned,
    Instant,
    Timestamp,
}

impl DateKind {
    pub fn of(ty: &TypeDescriptor) -> Option<Self> {
        Some(match ty {
            TypeDescriptor::LocalDate => DateKind::LocalDate,
            TypeDescriptor::LocalDateTime => DateKind::LocalDateTime,
            TypeDescriptor::ZonedDateTime => DateKind::Zoned,
            TypeDescriptor::Instant => DateKind::Instant,
            TypeDescriptor::Timestamp => DateKind::Timestamp,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateValue {
    LocalDate(NaiveDate),
    LocalDateTime(NaiveDateTime),
    Zoned(ZonedDateTime),
    Instant(DateTime<Utc>),
    Timestamp(Timestamp),
}

impl DateValue {
    pub fn kind(&self) -> DateKind {
        match self {
            DateValue::LocalDate(_) => DateKind::LocalDate,
            DateValue::LocalDateTime(_) => DateKind::LocalDateTime,
            DateValue::Zoned(_) => DateKind::Zoned,
            DateValue::Instant(_) => DateKind::Instant,
            DateValue::Timestamp(_) => DateKind::Timestamp,
        }
    }

    pub fn descriptor(&self) -> TypeDescriptor {
        match self.kind() {
            DateKind::LocalDate => TypeDescriptor::LocalDate,
            DateKind::LocalDateTime => TypeDescriptor::LocalDateTime,
            DateKind::Zoned => TypeDescriptor::ZonedDateTime,
            DateKind::Instant => TypeDescriptor::Instant,
            DateKind::Timestamp => TypeDescriptor::Timestamp,
        }
    }

    /// Converts an epoch-millisecond timestamp into `kind`, reading local
    /// fields in `zone`.
    pub fn from_epoch_millis(millis: i64, kind: DateKind, zone: Zone) -> Option<Self> {
        let instant = DateTime::from_timestamp_millis(millis)?;
        Some(match kind {
            DateKind::Instant => DateValue::Instant(instant),
            DateKind::Timestamp => DateValue::Timestamp(Timestamp::from_millis(millis)),
            DateKind::Zoned => DateValue::Zoned(at_instant(instant, zone)),
            DateKind::LocalDateTime => {
                DateValue::LocalDateTime(at_instant(instant, zone).datetime.naive_local())
            }
            DateKind::LocalDate => {
                DateValue::LocalDate(at_instant(instant, zone).datetime.date_naive())
            }
        })
    }

    /// The instant this value denotes; zone-less values are read in `zone`.
    pub fn to_instant(&self, zone: Zone) -> Option<DateTime<Utc>> {
        match self {
            DateValue::LocalDate(d) => {
                localize(d.and_time(NaiveTime::MIN), zone).map(|z| z.to_instant())
            }
            DateValue::LocalDateTime(dt) => localize(*dt, zone).map(|z| z.to_instant()),
            DateValue::Zoned(z) => Some(z.to_instant()),
            DateValue::Instant(i) => Some(*i),
            DateValue::Timestamp(t) => t.to_datetime(),
        }
    }
}

/// Canonical text form; parsing it back yields the same value.
impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateValue::LocalDate(d) => write!(f, "{}", d.format(LOCAL_DATE)),
            DateValue::LocalDateTime(dt) => write!(f, "{}", dt.format(LOCAL_DATE_TIME)),
            DateValue::Zoned(z) => write!(f, "{z}"),
            DateValue::Instant(i) => f.write_str(&i.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            DateValue::Timestamp(t) => write!(f, "{t}"),
        }
    }
}

const LOCAL_DATE: &str = "%Y-%m-%d";
const LOCAL_DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S%.f";

const DATE_PATTERNS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y %m %d",
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%d %m %Y",
    "%d,%m,%Y",
    "%m-%d-%Y",
    "%m/%d/%Y",
    "%d-%b-%Y",
    "%d/%b/%Y",
    "%d.%b.%Y",
    "%d %b %Y",
    "%d %b, %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%Y-%b-%d",
    "%d %B %Y",
    "%B %d, %Y",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZoneSuffix {
    None,
    /// Literal `Z` at the end of the format.
    Zulu,
    /// Numeric offset parsed by `%z` inside the format.
    Offset,
    /// Offset plus `[Region/City]`.
    OffsetAndId,
    /// `[Region/City]` after a naive date-time.
    BracketedId,
    /// ` Region/City` after a naive date-time.
    SpacedId,
}

struct DateTimePattern {
    format: &'static str,
    suffix: ZoneSuffix,
}

const fn pattern(format: &'static str, suffix: ZoneSuffix) -> DateTimePattern {
    DateTimePattern { format, suffix }
}

const DATE_TIME_PATTERNS: &[DateTimePattern] = &[
    pattern("%Y-%m-%dT%H:%M:%S%.f", ZoneSuffix::None),
    pattern("%Y-%m-%d %H:%M:%S%.f", ZoneSuffix::None),
    pattern("%Y-%m-%dT%H:%M:%S,%3f", ZoneSuffix::None),
    pattern("%Y-%m-%d %H:%M:%S,%3f", ZoneSuffix::None),
    pattern("%Y-%m-%dT%H:%M", ZoneSuffix::None),
    pattern("%Y-%m-%d %H:%M", ZoneSuffix::None),
    pattern("%Y/%m/%d %H:%M:%S%.f", ZoneSuffix::None),
    pattern("%Y/%m/%d %H:%M", ZoneSuffix::None),
    pattern("%d/%m/%Y %H:%M:%S%.f", ZoneSuffix::None),
    pattern("%d/%m/%Y %H:%M", ZoneSuffix::None),
    pattern("%d-%m-%Y %H:%M:%S%.f", ZoneSuffix::None),
    pattern("%d.%m.%Y %H:%M:%S%.f", ZoneSuffix::None),
    pattern("%d %b %Y %H:%M:%S%.f", ZoneSuffix::None),
    pattern("%b %d, %Y %H:%M:%S", ZoneSuffix::None),
    pattern("%Y-%m-%dT%H:%M:%S%.fZ", ZoneSuffix::Zulu),
    pattern("%Y-%m-%d %H:%M:%S%.fZ", ZoneSuffix::Zulu),
    pattern("%Y-%m-%dT%H:%M:%S,%3fZ", ZoneSuffix::Zulu),
    pattern("%Y-%m-%dT%H:%M:%S%.f%z", ZoneSuffix::Offset),
    pattern("%Y-%m-%d %H:%M:%S%.f%z", ZoneSuffix::Offset),
    pattern("%Y-%m-%d %H:%M:%S%.f %z", ZoneSuffix::Offset),
    pattern("%Y-%m-%dT%H:%M:%S,%3f%z", ZoneSuffix::Offset),
    pattern("%Y-%m-%dT%H:%M%z", ZoneSuffix::Offset),
    pattern("%d/%b/%Y:%H:%M:%S %z", ZoneSuffix::Offset),
    pattern("%a, %d %b %Y %H:%M:%S %z", ZoneSuffix::Offset),
    pattern("%Y-%m-%dT%H:%M:%S%.f%z", ZoneSuffix::OffsetAndId),
    pattern("%Y-%m-%dT%H:%M:%S%.f", ZoneSuffix::BracketedId),
    pattern("%Y-%m-%d %H:%M:%S%.f", ZoneSuffix::SpacedId),
    pattern("%Y-%m-%dT%H:%M:%S%.f", ZoneSuffix::SpacedId),
];

/// Intermediate parse result, before the target representation is chosen.
#[derive(Debug, Clone, Copy)]
enum Parsed {
    Naive(NaiveDateTime),
    Offset(DateTime<FixedOffset>),
    Zoned(DateTime<Tz>),
}

impl Parsed {
    fn naive_local(&self) -> NaiveDateTime {
        match self {
            Parsed::Naive(n) => *n,
            Parsed::Offset(dt) => dt.naive_local(),
            Parsed::Zoned(dt) => dt.naive_local(),
        }
    }
}

impl DateTimePattern {
    fn apply(&self, text: &str) -> Option<Parsed> {
        match self.suffix {
            ZoneSuffix::None => NaiveDateTime::parse_from_str(text, self.format)
                .ok()
                .map(Parsed::Naive),
            ZoneSuffix::Zulu => NaiveDateTime::parse_from_str(text, self.format)
                .ok()
                .map(|n| Parsed::Offset(Utc.from_utc_datetime(&n).with_timezone(&Utc.fix()))),
            ZoneSuffix::Offset => DateTime::parse_from_str(text, self.format)
                .ok()
                .map(Parsed::Offset),
            ZoneSuffix::OffsetAndId => {
                let (head, tz) = split_bracketed_zone(text)?;
                let dt = DateTime::parse_from_str(head, self.format).ok()?;
                Some(Parsed::Zoned(dt.with_timezone(&tz)))
            }
            ZoneSuffix::BracketedId => {
                let (head, tz) = split_bracketed_zone(text)?;
                let naive = NaiveDateTime::parse_from_str(head, self.format).ok()?;
                resolve_local(&tz, naive).map(Parsed::Zoned)
            }
            ZoneSuffix::SpacedId => {
                let (head, id) = text.rsplit_once(' ')?;
                let tz = id.parse::<Tz>().ok()?;
                let naive = NaiveDateTime::parse_from_str(head, self.format).ok()?;
                resolve_local(&tz, naive).map(Parsed::Zoned)
            }
        }
    }
}

fn split_bracketed_zone(text: &str) -> Option<(&str, Tz)> {
    let (head, id) = text.strip_suffix(']')?.rsplit_once('[')?;
    Some((head, id.parse::<Tz>().ok()?))
}

fn parse_canonical(text: &str, kind: DateKind) -> Option<Parsed> {
    match kind {
        DateKind::LocalDate => NaiveDate::parse_from_str(text, LOCAL_DATE)
            .ok()
            .map(|d| Parsed::Naive(d.and_time(NaiveTime::MIN))),
        DateKind::LocalDateTime => NaiveDateTime::parse_from_str(text, LOCAL_DATE_TIME)
            .ok()
            .map(Parsed::Naive),
        DateKind::Zoned => match split_bracketed_zone(text) {
            Some((head, tz)) => DateTime::parse_from_rfc3339(head)
                .ok()
                .map(|dt| Parsed::Zoned(dt.with_timezone(&tz))),
            None => DateTime::parse_from_rfc3339(text).ok().map(Parsed::Offset),
        },
        DateKind::Instant | DateKind::Timestamp => {
            DateTime::parse_from_rfc3339(text).ok().map(Parsed::Offset)
        }
    }
}

fn parse_fallback(text: &str) -> Option<Parsed> {
    let date = DATE_PATTERNS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(text, fmt)
            .ok()
            .map(|d| (*fmt, Parsed::Naive(d.and_time(NaiveTime::MIN))))
    });
    let found = date.or_else(|| {
        DATE_TIME_PATTERNS
            .iter()
            .find_map(|p| p.apply(text).map(|parsed| (p.format, parsed)))
    });
    if let Some((format, _)) = &found {
        debug!(text, format, "date matched fallback pattern");
    }
    found.map(|(_, parsed)| parsed)
}

/// Parses `text` as `kind`. Zone-less text needing an instant is read in `zone`.
pub fn parse_date(text: &str, kind: DateKind, zone: Zone) -> Option<DateValue> {
    let parsed = parse_canonical(text, kind).or_else(|| parse_fallback(text))?;
    materialize(parsed, kind, zone)
}

/// Parses `text` with a caller-supplied chrono `pattern` instead of the
/// built-in pattern list. The text is read as local fields; `zone` supplies
/// the offset when `kind` needs an instant.
pub fn parse_date_with_pattern(
    text: &str,
    pattern: &str,
    kind: DateKind,
    zone: Zone,
) -> Option<DateValue> {
    let naive = match kind {
        DateKind::LocalDate => NaiveDate::parse_from_str(text, pattern)
            .ok()?
            .and_time(NaiveTime::MIN),
        _ => NaiveDateTime::parse_from_str(text, pattern).ok()?,
    };
    materialize(Parsed::Naive(naive), kind, zone)
}

pub fn parse_date_with_utc_zone(text: &str, pattern: &str, kind: DateKind) -> Option<DateValue> {
    parse_date_with_pattern(text, pattern, kind, Zone::Utc)
}

pub fn parse_date_with_system_zone(text: &str, pattern: &str, kind: DateKind) -> Option<DateValue> {
    parse_date_with_pattern(text, pattern, kind, Zone::System)
}

/// Orders two dates by the instant they denote, reading zone-less values in
/// `zone`. `None` if either side has no representable instant.
pub fn compare_dates(lhs: &DateValue, rhs: &DateValue, zone: Zone) -> Option<Ordering> {
    Some(lhs.to_instant(zone)?.cmp(&rhs.to_instant(zone)?))
}

fn materialize(parsed: Parsed, kind: DateKind, zone: Zone) -> Option<DateValue> {
    let zoned = || match parsed {
        Parsed::Naive(naive) => localize(naive, zone),
        Parsed::Offset(dt) => Some(ZonedDateTime::new(dt, None)),
        Parsed::Zoned(dt) => Some(ZonedDateTime::in_zone(dt)),
    };
    Some(match kind {
        DateKind::LocalDate => DateValue::LocalDate(parsed.naive_local().date()),
        DateKind::LocalDateTime => DateValue::LocalDateTime(parsed.naive_local()),
        DateKind::Zoned => DateValue::Zoned(zoned()?),
        DateKind::Instant => DateValue::Instant(zoned()?.to_instant()),
        DateKind::Timestamp => DateValue::Timestamp(Timestamp::from_datetime(zoned()?.to_instant())),
    })
}

/// Attaches `zone` to a local date-time.
pub fn localize(naive: NaiveDateTime, zone: Zone) -> Option<ZonedDateTime> {
    match zone {
        Zone::Utc => Some(ZonedDateTime::in_zone(Tz::UTC.from_utc_datetime(&naive))),
        Zone::System => resolve_local(&Local, naive)
            .map(|dt| ZonedDateTime::new(dt.with_timezone(&dt.offset().fix()), None)),
        Zone::Named(tz) => resolve_local(&tz, naive).map(ZonedDateTime::in_zone),
        Zone::Offset(off) => resolve_local(&off, naive).map(|dt| ZonedDateTime::new(dt, None)),
    }
}

fn at_instant(instant: DateTime<Utc>, zone: Zone) -> ZonedDateTime {
    match zone {
        Zone::Utc => ZonedDateTime::in_zone(instant.with_timezone(&Tz::UTC)),
        Zone::System => {
            let local = instant.with_timezone(&Local);
            ZonedDateTime::new(local.with_timezone(&local.offset().fix()), None)
        }
        Zone::Named(tz) => ZonedDateTime::in_zone(instant.with_timezone(&tz)),
        Zone::Offset(off) => ZonedDateTime::new(instant.with_timezone(&off), None),
    }
}

/// Ambiguous local times take the earlier offset; times inside a gap are
/// moved forward by the length of the gap.
fn resolve_local<Z: TimeZone>(tz: &Z, naive: NaiveDateTime) -> Option<DateTime<Z>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt),
        LocalResult::None => {
            let before = tz
                .offset_from_local_datetime(&(naive - TimeDelta::days(1)))
                .earliest()?
                .fix();
            let utc = naive - TimeDelta::seconds(i64::from(before.local_minus_utc()));
            Some(tz.from_utc_datetime(&utc))
        }
    }
}
