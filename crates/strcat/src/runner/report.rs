use crate::alloc::AllocStats;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchResult {
    pub name: String,
    pub iterations: u64,
    pub ns_per_op: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_per_op: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocs_per_op: Option<u64>,
}

impl BenchResult {
    pub fn new(
        name: impl Into<String>,
        iterations: u64,
        elapsed: Duration,
        allocs: Option<AllocStats>,
    ) -> Self {
        let n = iterations.max(1);
        Self {
            name: name.into(),
            iterations,
            ns_per_op: elapsed.as_nanos() as f64 / n as f64,
            bytes_per_op: allocs.map(|stats| stats.bytes / n),
            allocs_per_op: allocs.map(|stats| stats.allocs / n),
        }
    }

    pub fn line(&self, name_width: usize) -> String {
        let line = format!(
            "{:<name_width$}\t{:>8}\t{}",
            self.name,
            self.iterations,
            pretty(self.ns_per_op, "ns/op")
        );
        match (self.bytes_per_op, self.allocs_per_op) {
            (Some(bytes), Some(allocs)) => {
                format!("{line}\t{bytes:>8} B/op\t{allocs:>8} allocs/op")
            }
            _ => line,
        }
    }
}

/// Pads small values with more decimals so columns stay aligned.
fn pretty(x: f64, unit: &str) -> String {
    let y = x.abs();
    if y == 0.0 || y >= 999.95 {
        format!("{x:>10.0} {unit}")
    } else if y >= 99.995 {
        format!("{x:>12.1} {unit}")
    } else if y >= 9.9995 {
        format!("{x:>13.2} {unit}")
    } else if y >= 0.999_95 {
        format!("{x:>14.3} {unit}")
    } else if y >= 0.099_995 {
        format!("{x:>15.4} {unit}")
    } else if y >= 0.009_999_5 {
        format!("{x:>16.5} {unit}")
    } else if y >= 0.000_999_95 {
        format!("{x:>17.6} {unit}")
    } else {
        format!("{x:>18.7} {unit}")
    }
}

pub fn write_line<W: Write>(out: &mut W, result: &BenchResult, name_width: usize) -> Result<()> {
    writeln!(out, "{}", result.line(name_width))?;
    out.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(out: &mut W, results: &[BenchResult]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, results)?;
    writeln!(out)?;
    Ok(())
}
