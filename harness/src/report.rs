//! Report module: writes banners and one timing line per measurement.

use crate::matmul::MatmulMeasurement;
use crate::measure::Measurement;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `Time for <label> <secs> s / <rate> GB/s`
    #[default]
    Text,
    /// One JSON object per measurement, banners suppressed.
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Format a single timing line with three decimals for both numbers.
pub fn format_line(label: &str, elapsed_seconds: f64, rate: f64, unit: &str) -> String {
    format!("Time for {label} {elapsed_seconds:.3} s / {rate:.3} {unit}")
}

/// Line-oriented writer over any sink, stdout in the binary.
pub struct Reporter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl Reporter<io::Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(io::stdout(), format)
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    /// Section heading such as `Rust version: ...`. Text mode only.
    pub fn banner(&mut self, text: &str) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{text}"),
            OutputFormat::Json => Ok(()),
        }
    }

    /// One `Time for <label> <secs> s / <rate> GB/s` line.
    pub fn report(
        &mut self,
        label: &str,
        elapsed_seconds: f64,
        throughput_gbps: f64,
    ) -> io::Result<()> {
        self.rate_line(label, elapsed_seconds, throughput_gbps, "GB/s")
    }

    fn rate_line(
        &mut self,
        label: &str,
        elapsed_seconds: f64,
        rate: f64,
        unit: &str,
    ) -> io::Result<()> {
        writeln!(self.out, "{}", format_line(label, elapsed_seconds, rate, unit))
    }

    fn json_row<T: Serialize>(&mut self, row: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, row)?;
        writeln!(self.out)
    }

    pub fn measurement(&mut self, m: &Measurement) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                self.report(m.expression.label(), m.elapsed_seconds, m.throughput_gbps)
            }
            OutputFormat::Json => self.json_row(m),
        }
    }

    pub fn matmul_measurement(&mut self, m: &MatmulMeasurement) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => self.rate_line(m.label, m.elapsed_seconds, m.gflops, "GFLOPS"),
            OutputFormat::Json => self.json_row(m),
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Expression;

    fn sample() -> Measurement {
        Measurement {
            strategy: "Iterator".to_string(),
            expression: Expression::Transcendental,
            elapsed_seconds: 1.23456,
            working_set_bytes: 2_400_000_000,
            throughput_gbps: 1.81049,
        }
    }

    #[test]
    fn text_line_uses_three_decimals() {
        assert_eq!(
            format_line(Expression::Algebraic.label(), 0.5, 4.470348358154297, "GB/s"),
            "Time for an algebraic expression:     0.500 s / 4.470 GB/s"
        );
    }

    #[test]
    fn report_writes_one_line() {
        let mut r = Reporter::new(Vec::new(), OutputFormat::Text);
        r.report(Expression::Transcendental.label(), 2.0, 1.125).unwrap();
        let text = String::from_utf8(r.into_inner()).unwrap();
        assert_eq!(
            text,
            "Time for a transcendental expression: 2.000 s / 1.125 GB/s\n"
        );
    }

    #[test]
    fn matmul_line_reports_gflops() {
        let m = MatmulMeasurement {
            strategy: "Tiled".to_string(),
            label: "tiled matrix multiplication:",
            shape: crate::matmul::MatmulShape { m: 2, n: 3, p: 4 },
            elapsed_seconds: 0.25,
            gflop: 4.8e-8,
            gflops: 1.92e-7,
        };
        let mut r = Reporter::new(Vec::new(), OutputFormat::Text);
        r.matmul_measurement(&m).unwrap();
        assert_eq!(
            String::from_utf8(r.into_inner()).unwrap(),
            "Time for tiled matrix multiplication: 0.250 s / 0.000 GFLOPS\n"
        );

        let mut r = Reporter::new(Vec::new(), OutputFormat::Json);
        r.matmul_measurement(&m).unwrap();
        let v: serde_json::Value =
            serde_json::from_str(String::from_utf8(r.into_inner()).unwrap().trim()).unwrap();
        assert_eq!(v["strategy"], "Tiled");
        assert_eq!(v["shape"]["p"], 4);
    }

    #[test]
    fn text_mode_prints_banner_and_line() {
        let mut r = Reporter::new(Vec::new(), OutputFormat::Text);
        r.banner("Iterator version:").unwrap();
        r.measurement(&sample()).unwrap();
        let text = String::from_utf8(r.into_inner()).unwrap();
        assert_eq!(
            text,
            "Iterator version:\nTime for a transcendental expression: 1.235 s / 1.810 GB/s\n"
        );
    }

    #[test]
    fn json_mode_skips_banner() {
        let mut r = Reporter::new(Vec::new(), OutputFormat::Json);
        r.banner("Iterator version:").unwrap();
        r.measurement(&sample()).unwrap();
        let text = String::from_utf8(r.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 1);

        let v: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(v["strategy"], "Iterator");
        assert_eq!(v["expression"], "transcendental");
        assert_eq!(v["working_set_bytes"], 2_400_000_000u64);
    }

    #[test]
    fn parses_formats() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("csv"), None);
    }
}
