use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

/// A duration that deserializes from Go-style strings.
/// Supports: "250ms", "1.5s", "2m", "1h30m". Bare integers are seconds.
///
/// Units below a millisecond are not accepted; thresholds finer than that
/// are meaningless against one-second buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Duration(StdDuration);

impl Duration {
    pub const ZERO: Duration = Duration(StdDuration::ZERO);

    pub fn from_millis(millis: u64) -> Self {
        Duration(StdDuration::from_millis(millis))
    }

    pub fn from_secs(secs: u64) -> Self {
        Duration(StdDuration::from_secs(secs))
    }

    pub fn as_millis(&self) -> u128 {
        self.0.as_millis()
    }

    pub fn as_secs(&self) -> u64 {
        self.0.as_secs()
    }

    pub fn as_std(&self) -> StdDuration {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<StdDuration> for Duration {
    fn from(d: StdDuration) -> Self {
        Duration(d)
    }
}

impl From<Duration> for StdDuration {
    fn from(d: Duration) -> Self {
        d.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDurationError(String);

impl fmt::Display for ParseDurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid duration: {}", self.0)
    }
}

impl std::error::Error for ParseDurationError {}

impl FromStr for Duration {
    type Err = ParseDurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.is_empty() {
            return Err(ParseDurationError("empty string".to_string()));
        }
        if s == "0" {
            return Ok(Duration::ZERO);
        }

        let mut total = StdDuration::ZERO;
        let mut rest = s;

        while !rest.is_empty() {
            let num_end = rest
                .find(|c: char| !c.is_ascii_digit() && c != '.')
                .unwrap_or(rest.len());
            if num_end == 0 {
                return Err(ParseDurationError(format!("expected a number in '{}'", s)));
            }
            let value: f64 = rest[..num_end]
                .parse()
                .map_err(|_| ParseDurationError(format!("invalid number '{}'", &rest[..num_end])))?;
            rest = &rest[num_end..];

            let unit_end = rest
                .find(|c: char| c.is_ascii_digit() || c == '.')
                .unwrap_or(rest.len());
            let unit = &rest[..unit_end];
            rest = &rest[unit_end..];

            let millis_per_unit = match unit {
                "ms" => 1.0,
                "s" => 1_000.0,
                "m" => 60_000.0,
                "h" => 3_600_000.0,
                "" => return Err(ParseDurationError(format!("missing unit in '{}'", s))),
                other => return Err(ParseDurationError(format!("unknown unit '{}'", other))),
            };

            let secs = value * millis_per_unit / 1_000.0;
            let segment = StdDuration::try_from_secs_f64(secs)
                .map_err(|_| ParseDurationError(format!("duration out of range: '{}'", s)))?;
            total = total
                .checked_add(segment)
                .ok_or_else(|| ParseDurationError(format!("duration out of range: '{}'", s)))?;
        }

        Ok(Duration(total))
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_millis = self.0.as_millis();

        if total_millis == 0 {
            return write!(f, "0s");
        }

        let hours = total_millis / 3_600_000;
        let minutes = total_millis % 3_600_000 / 60_000;
        let seconds = total_millis % 60_000 / 1_000;
        let millis = total_millis % 1_000;

        if hours > 0 {
            write!(f, "{}h", hours)?;
        }
        if minutes > 0 {
            write!(f, "{}m", minutes)?;
        }
        if seconds > 0 {
            write!(f, "{}s", seconds)?;
        }
        if millis > 0 {
            write!(f, "{}ms", millis)?;
        }

        Ok(())
    }
}

impl Serialize for Duration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DurationVisitor;

        impl<'de> de::Visitor<'de> for DurationVisitor {
            type Value = Duration;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a duration string like '10s', '1m30s', '100ms'")
            }

            fn visit_str<E>(self, value: &str) -> Result<Duration, E>
            where
                E: de::Error,
            {
                value.parse().map_err(de::Error::custom)
            }

            fn visit_i64<E>(self, value: i64) -> Result<Duration, E>
            where
                E: de::Error,
            {
                if value < 0 {
                    return Err(de::Error::custom("duration cannot be negative"));
                }
                Ok(Duration::from_secs(value as u64))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Duration, E>
            where
                E: de::Error,
            {
                Ok(Duration::from_secs(value))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Duration, E>
            where
                E: de::Error,
            {
                if value < 0.0 {
                    return Err(de::Error::custom("duration cannot be negative"));
                }
                Ok(Duration::from_millis((value * 1000.0) as u64))
            }
        }

        deserializer.deserialize_any(DurationVisitor)
    }
}
