// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ASN.1 primitives related to time types.

use {
    bcder::{
        decode::{Constructed, DecodeError, Primitive, Source},
        encode::{PrimitiveContent, Values},
        Mode, Tag,
    },
    chrono::{Datelike, TimeZone, Timelike},
    std::{
        fmt::{Display, Formatter},
        io::Write,
        ops::Deref,
        str::FromStr,
    },
};

/// Error raised when parsing string representations of times.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimeParseError(&'static str);

impl Display for TimeParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for TimeParseError {}

/// A point in time as used by X.509.
///
/// ```ASN.1
/// Time ::= CHOICE {
///   utcTime        UTCTime,
///   generalTime    GeneralizedTime }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Time {
    UtcTime(UtcTime),
    GeneralTime(GeneralizedTime),
}

impl Time {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_primitive(|tag, prim| match tag {
            Tag::UTC_TIME => Ok(Self::UtcTime(UtcTime::from_primitive(prim)?)),
            Tag::GENERALIZED_TIME => Ok(Self::GeneralTime(GeneralizedTime::from_primitive(prim)?)),
            _ => Err(prim.content_err("expected UTCTime or GeneralizedTime")),
        })
    }

    pub fn take_opt_from<S: Source>(
        cons: &mut Constructed<S>,
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        if let Some(utc) =
            cons.take_opt_primitive_if(Tag::UTC_TIME, |prim| UtcTime::from_primitive(prim))?
        {
            Ok(Some(Self::UtcTime(utc)))
        } else if let Some(gt) = cons.take_opt_primitive_if(Tag::GENERALIZED_TIME, |prim| {
            GeneralizedTime::from_primitive(prim)
        })? {
            Ok(Some(Self::GeneralTime(gt)))
        } else {
            Ok(None)
        }
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        match self {
            Self::UtcTime(utc) => (Some(utc.encode_ref()), None),
            Self::GeneralTime(gt) => (None, Some(gt.encode_ref())),
        }
    }

    /// Obtain the instant this time represents, normalized to UTC.
    pub fn to_datetime(&self) -> chrono::DateTime<chrono::Utc> {
        match self {
            Self::UtcTime(utc) => utc.0,
            Self::GeneralTime(gt) => gt.to_datetime(),
        }
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_datetime().to_rfc3339())
    }
}

impl From<&Time> for chrono::DateTime<chrono::Utc> {
    fn from(t: &Time) -> Self {
        t.to_datetime()
    }
}

impl From<chrono::DateTime<chrono::Utc>> for Time {
    /// Convert following the RFC 5280 rule: UTCTime through 2049, GeneralizedTime after.
    fn from(t: chrono::DateTime<chrono::Utc>) -> Self {
        let t = t.with_nanosecond(0).unwrap_or(t);

        if (1950..2050).contains(&t.year()) {
            Self::UtcTime(UtcTime(t))
        } else {
            Self::GeneralTime(GeneralizedTime::from(t))
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Zone {
    Utc,
    Offset(chrono::FixedOffset),
}

impl Display for Zone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Utc => f.write_str("Z"),
            Self::Offset(offset) => {
                let seconds = offset.local_minus_utc();
                let sign = if seconds < 0 { '-' } else { '+' };
                let seconds = seconds.abs();

                write!(f, "{}{:02}{:02}", sign, seconds / 3600, (seconds % 3600) / 60)
            }
        }
    }
}

/// Generalized time.
///
/// The wall clock time is stored as it appeared in the encoding, together
/// with its timezone designator and any fractional seconds, so the original
/// encoding can be reproduced.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneralizedTime {
    time: chrono::NaiveDateTime,
    fraction: Option<String>,
    timezone: Zone,
}

fn parse_digits<T: FromStr>(data: &[u8]) -> Result<T, TimeParseError> {
    if !data.iter().all(|c| c.is_ascii_digit()) {
        return Err(TimeParseError("non-digit character in time value"));
    }

    let s = std::str::from_utf8(data).map_err(|_| TimeParseError("invalid UTF-8"))?;

    T::from_str(s).map_err(|_| TimeParseError("invalid number in time value"))
}

fn naive_datetime(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Result<chrono::NaiveDateTime, TimeParseError> {
    chrono::NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .ok_or(TimeParseError("date or time component out of range"))
}

impl GeneralizedTime {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_primitive_if(Tag::GENERALIZED_TIME, |prim| Self::from_primitive(prim))
    }

    pub fn from_primitive<S: Source>(
        prim: &mut Primitive<S>,
    ) -> Result<Self, DecodeError<S::Error>> {
        let data = prim.take_all()?;

        Self::parse(data.as_ref()).map_err(|e| prim.content_err(e.0))
    }

    /// Parse GeneralizedTime string data.
    ///
    /// Accepts `YYYYMMDDHHMMSS` followed by optional fractional seconds
    /// (`.fff`) and a mandatory timezone designator (`Z` or `+hhmm`/`-hhmm`).
    pub fn parse(data: &[u8]) -> Result<Self, TimeParseError> {
        if data.len() < "YYYYMMDDHHMMSSZ".len() {
            return Err(TimeParseError("GeneralizedTime too short"));
        }

        let time = naive_datetime(
            parse_digits(&data[0..4])?,
            parse_digits(&data[4..6])?,
            parse_digits(&data[6..8])?,
            parse_digits(&data[8..10])?,
            parse_digits(&data[10..12])?,
            parse_digits(&data[12..14])?,
        )?;

        let mut remaining = &data[14..];

        let fraction = if remaining.first() == Some(&b'.') {
            let digits = remaining[1..]
                .iter()
                .take_while(|c| c.is_ascii_digit())
                .count();

            if digits == 0 {
                return Err(TimeParseError("empty fractional seconds"));
            }

            let fraction = std::str::from_utf8(&remaining[1..1 + digits])
                .map_err(|_| TimeParseError("invalid UTF-8"))?
                .to_string();
            remaining = &remaining[1 + digits..];

            Some(fraction)
        } else {
            None
        };

        let timezone = match remaining {
            [b'Z'] => Zone::Utc,
            [sign @ (b'+' | b'-'), rest @ ..] if rest.len() == 4 => {
                let hours: i32 = parse_digits(&rest[0..2])?;
                let minutes: i32 = parse_digits(&rest[2..4])?;

                if hours > 23 || minutes > 59 {
                    return Err(TimeParseError("timezone offset out of range"));
                }

                let seconds = hours * 3600 + minutes * 60;
                let seconds = if *sign == b'-' { -seconds } else { seconds };

                Zone::Offset(
                    chrono::FixedOffset::east_opt(seconds)
                        .ok_or(TimeParseError("timezone offset out of range"))?,
                )
            }
            _ => return Err(TimeParseError("invalid timezone designator")),
        };

        Ok(Self {
            time,
            fraction,
            timezone,
        })
    }

    /// Obtain the instant this time represents, normalized to UTC.
    pub fn to_datetime(&self) -> chrono::DateTime<chrono::Utc> {
        let mut time = self.time;

        if let Some(fraction) = &self.fraction {
            let digits = fraction.chars().take(9).collect::<String>();
            let nanos = u32::from_str(&format!("{:0<9}", digits)).unwrap_or(0);
            time = time.with_nanosecond(nanos).unwrap_or(time);
        }

        match self.timezone {
            Zone::Utc => chrono::Utc.from_utc_datetime(&time),
            Zone::Offset(offset) => chrono::Utc.from_utc_datetime(&(time - offset)),
        }
    }
}

impl Display for GeneralizedTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}{:02}{:02}{:02}",
            self.time.year(),
            self.time.month(),
            self.time.day(),
            self.time.hour(),
            self.time.minute(),
            self.time.second(),
        )?;

        if let Some(fraction) = &self.fraction {
            write!(f, ".{}", fraction)?;
        }

        write!(f, "{}", self.timezone)
    }
}

impl From<chrono::DateTime<chrono::Utc>> for GeneralizedTime {
    fn from(t: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            time: t.naive_utc().with_nanosecond(0).unwrap_or(t.naive_utc()),
            fraction: None,
            timezone: Zone::Utc,
        }
    }
}

impl From<GeneralizedTime> for chrono::DateTime<chrono::Utc> {
    fn from(gt: GeneralizedTime) -> Self {
        gt.to_datetime()
    }
}

impl PrimitiveContent for GeneralizedTime {
    const TAG: Tag = Tag::GENERALIZED_TIME;

    fn encoded_len(&self, _: Mode) -> usize {
        self.to_string().len()
    }

    fn write_encoded<W: Write>(&self, _: Mode, target: &mut W) -> Result<(), std::io::Error> {
        target.write_all(self.to_string().as_bytes())
    }
}

/// UTC time.
///
/// Two digit years are interpreted per RFC 5280: `50` through `99` map to
/// the 1900s, `00` through `49` to the 2000s.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UtcTime(chrono::DateTime<chrono::Utc>);

impl UtcTime {
    /// Obtain a new instance with now as the time.
    pub fn now() -> Self {
        let now = chrono::Utc::now();

        Self(now.with_nanosecond(0).unwrap_or(now))
    }

    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_primitive_if(Tag::UTC_TIME, |prim| Self::from_primitive(prim))
    }

    pub fn from_primitive<S: Source>(
        prim: &mut Primitive<S>,
    ) -> Result<Self, DecodeError<S::Error>> {
        let data = prim.take_all()?;

        Self::parse(data.as_ref()).map_err(|e| prim.content_err(e.0))
    }

    /// Parse UTCTime string data of the form `YYMMDDHHMMSSZ`.
    pub fn parse(data: &[u8]) -> Result<Self, TimeParseError> {
        if data.len() != "YYMMDDHHMMSSZ".len() {
            return Err(TimeParseError("UTCTime must be YYMMDDHHMMSSZ"));
        }

        if data[12] != b'Z' {
            return Err(TimeParseError("UTCTime must be in UTC"));
        }

        let year: i32 = parse_digits(&data[0..2])?;
        let year = if year >= 50 { year + 1900 } else { year + 2000 };

        let time = naive_datetime(
            year,
            parse_digits(&data[2..4])?,
            parse_digits(&data[4..6])?,
            parse_digits(&data[6..8])?,
            parse_digits(&data[8..10])?,
            parse_digits(&data[10..12])?,
        )?;

        Ok(Self(chrono::Utc.from_utc_datetime(&time)))
    }
}

impl Display for UtcTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}{:02}{:02}{:02}{:02}{:02}Z",
            self.0.year() % 100,
            self.0.month(),
            self.0.day(),
            self.0.hour(),
            self.0.minute(),
            self.0.second()
        )
    }
}

impl Deref for UtcTime {
    type Target = chrono::DateTime<chrono::Utc>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PrimitiveContent for UtcTime {
    const TAG: Tag = Tag::UTC_TIME;

    fn encoded_len(&self, _: Mode) -> usize {
        self.to_string().len()
    }

    fn write_encoded<W: Write>(&self, _: Mode, target: &mut W) -> Result<(), std::io::Error> {
        target.write_all(self.to_string().as_bytes())
    }
}
