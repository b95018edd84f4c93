use crate::error::{Error, Result};
use regex::Regex;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_SIZES: [usize; 4] = [10, 100, 1000, 10000];

/// How long each benchmark runs: a target wall-clock duration, or an exact iteration count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchTime {
    Duration(Duration),
    Iterations(u64),
}

impl Default for BenchTime {
    fn default() -> Self {
        BenchTime::Duration(Duration::from_secs(1))
    }
}

impl std::fmt::Display for BenchTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BenchTime::Duration(d) => write!(f, "{d:?}"),
            BenchTime::Iterations(n) => write!(f, "{n}x"),
        }
    }
}

impl FromStr for BenchTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::InvalidBenchTime(s.to_string());

        if let Some(count) = s.strip_suffix('x') {
            return match count.parse::<u64>() {
                Ok(n) if n > 0 => Ok(BenchTime::Iterations(n)),
                _ => Err(invalid()),
            };
        }

        parse_duration(s).map(BenchTime::Duration).ok_or_else(invalid)
    }
}

/// Parses durations such as `1s`, `250ms`, `1.5s` or `1m30s`.
fn parse_duration(s: &str) -> Option<Duration> {
    if s.is_empty() {
        return None;
    }

    let mut total = 0f64;
    let mut rest = s;
    while !rest.is_empty() {
        let number_end = rest.find(|c: char| !(c.is_ascii_digit() || c == '.'))?;
        if number_end == 0 {
            return None;
        }
        let value: f64 = rest[..number_end].parse().ok()?;
        rest = &rest[number_end..];

        let unit_end = rest.find(|c: char| c.is_ascii_digit() || c == '.').unwrap_or(rest.len());
        let nanos_per_unit = match &rest[..unit_end] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return None,
        };
        rest = &rest[unit_end..];
        total += value * nanos_per_unit;
    }

    Some(Duration::from_nanos(total as u64))
}

pub fn parse_sizes(s: &str) -> Result<Vec<usize>> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(Error::InvalidSize(part.to_string())),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub pattern: String,
    pub benchtime: BenchTime,
    pub count: u32,
    pub sizes: Vec<usize>,
    pub json: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            pattern: ".".to_string(),
            benchtime: BenchTime::default(),
            count: 1,
            sizes: DEFAULT_SIZES.to_vec(),
            json: false,
        }
    }
}

impl RunnerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Applies each `STRCAT_*` variable on its own; a bad value is logged and skipped.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(pattern) = lookup("STRCAT_BENCH") {
            match Regex::new(&pattern) {
                Ok(_) => config.pattern = pattern,
                Err(e) => warn!("Ignoring STRCAT_BENCH={pattern:?}: {e}"),
            }
        }

        if let Some(benchtime) = lookup("STRCAT_BENCHTIME") {
            match benchtime.parse() {
                Ok(benchtime) => config.benchtime = benchtime,
                Err(e) => warn!("Ignoring STRCAT_BENCHTIME: {e}"),
            }
        }

        if let Some(count) = lookup("STRCAT_COUNT") {
            match count.trim().parse::<u32>() {
                Ok(n) if n > 0 => config.count = n,
                _ => warn!("Ignoring STRCAT_COUNT={count:?}: expected a positive integer"),
            }
        }

        if let Some(sizes) = lookup("STRCAT_SIZES") {
            match parse_sizes(&sizes) {
                Ok(sizes) if !sizes.is_empty() => config.sizes = sizes,
                Ok(_) => warn!("Ignoring STRCAT_SIZES: no sizes given"),
                Err(e) => warn!("Ignoring STRCAT_SIZES: {e}"),
            }
        }

        config
    }

    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(Error::configuration("count must be at least 1"));
        }

        if self.sizes.is_empty() {
            return Err(Error::configuration("at least one input size is required"));
        }

        if let Some(size) = self.sizes.iter().find(|&&size| size == 0) {
            return Err(Error::InvalidSize(size.to_string()));
        }

        Ok(())
    }
}
