//! JaCoCo coverage extraction for commit messages
//!
//! Reads the XML report produced by `jacoco:report`, picks the `INSTRUCTION`
//! counter and renders it as a one-decimal percentage. A missing report, a
//! report without an instruction counter, or a counter with zero total all
//! render as [`NOT_AVAILABLE`]; coverage is optional metadata and never
//! blocks a commit.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;
use tracing::debug;

/// Rendered when no percentage can be computed
pub const NOT_AVAILABLE: &str = "N/A";

/// Counter type consulted for the commit line
pub const INSTRUCTION: &str = "INSTRUCTION";

/// Errors reading or parsing a coverage report that does exist
#[derive(Debug, Error)]
pub enum CoverageError {
    #[error("Failed to read coverage report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed coverage report: {0}")]
    Xml(String),

    #[error("Counter {kind} has invalid attribute {attr}: {value:?}")]
    InvalidCounter {
        kind: String,
        attr: &'static str,
        value: Option<String>,
    },
}

/// One `<counter type=".." missed=".." covered=".."/>` element
///
/// Counts are kept as written; only the counter that gets selected is
/// validated, so a broken LINE or BRANCH counter cannot spoil the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    pub kind: String,
    pub covered: Option<String>,
    pub missed: Option<String>,
    /// Element depth; direct children of the report root are at depth 1
    pub depth: usize,
}

impl Counter {
    /// Parse the `covered`/`missed` attributes
    pub fn counts(&self) -> Result<Counts, CoverageError> {
        Ok(Counts {
            covered: parse_count(&self.kind, "covered", self.covered.as_deref())?,
            missed: parse_count(&self.kind, "missed", self.missed.as_deref())?,
        })
    }
}

/// Validated counts of one counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub covered: u64,
    pub missed: u64,
}

impl Counts {
    /// Widened so two `u64` counts never overflow
    pub fn total(&self) -> u128 {
        u128::from(self.covered) + u128::from(self.missed)
    }

    /// Covered share in percent, `None` when the counter is empty
    pub fn percent(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.covered as f64 / total as f64 * 100.0),
        }
    }
}

/// All counters of a report, in document order
#[derive(Debug, Clone, Default)]
pub struct CoverageReport {
    pub counters: Vec<Counter>,
}

impl CoverageReport {
    /// Read and parse a report file
    pub fn load(path: &Path) -> Result<Self, CoverageError> {
        debug!(?path, "CoverageReport::load: called");
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse report XML
    pub fn parse(xml: &str) -> Result<Self, CoverageError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut counters = Vec::new();
        let mut depth = 0usize;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    if let Some(counter) = parse_counter(&e, depth)? {
                        counters.push(counter);
                    }
                    depth += 1;
                }
                Ok(Event::Empty(e)) => {
                    if let Some(counter) = parse_counter(&e, depth)? {
                        counters.push(counter);
                    }
                }
                Ok(Event::End(_)) => depth = depth.saturating_sub(1),
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    debug!(%e, "CoverageReport::parse: xml error");
                    return Err(CoverageError::Xml(e.to_string()));
                }
            }
        }

        debug!(count = counters.len(), "CoverageReport::parse: counters found");
        Ok(Self { counters })
    }

    /// The first INSTRUCTION counter below the root, in document order
    ///
    /// In a JaCoCo report this is usually the first method's counter.
    pub fn instruction_counter(&self) -> Option<&Counter> {
        self.counters.iter().find(|c| c.kind == INSTRUCTION && c.depth >= 1)
    }

    /// Percentage of the selected counter; `Ok(None)` when there is none or it is empty
    pub fn instruction_percent(&self) -> Result<Option<f64>, CoverageError> {
        match self.instruction_counter() {
            Some(counter) => Ok(counter.counts()?.percent()),
            None => Ok(None),
        }
    }
}

fn parse_counter(element: &BytesStart<'_>, depth: usize) -> Result<Option<Counter>, CoverageError> {
    if element.name().as_ref() != b"counter" {
        return Ok(None);
    }

    let mut kind = None;
    let mut covered = None;
    let mut missed = None;

    for attr in element.attributes() {
        let attr = attr.map_err(|e| CoverageError::Xml(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| CoverageError::Xml(e.to_string()))?
            .into_owned();
        match attr.key.as_ref() {
            b"type" => kind = Some(value),
            b"covered" => covered = Some(value),
            b"missed" => missed = Some(value),
            _ => {}
        }
    }

    Ok(kind.map(|kind| Counter {
        kind,
        covered,
        missed,
        depth,
    }))
}

fn parse_count(kind: &str, attr: &'static str, value: Option<&str>) -> Result<u64, CoverageError> {
    match value.map(|v| v.trim().parse::<u64>()) {
        Some(Ok(n)) => Ok(n),
        _ => Err(CoverageError::InvalidCounter {
            kind: kind.to_string(),
            attr,
            value: value.map(str::to_string),
        }),
    }
}

/// Render a percentage with one decimal digit, e.g. `87.3%`
pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}

/// Instruction coverage of the report at `path`, or `N/A`
///
/// A path that does not exist is not an error.
pub fn coverage_percent(path: &Path) -> Result<String, CoverageError> {
    debug!(?path, "coverage_percent: called");
    if !path.exists() {
        debug!("coverage_percent: report missing");
        return Ok(NOT_AVAILABLE.to_string());
    }

    let report = CoverageReport::load(path)?;
    Ok(report
        .instruction_percent()?
        .map(format_percent)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string()))
}

/// Append the coverage trailer to a commit message
pub fn compose_commit_message(message: &str, coverage: &str) -> String {
    format!("{}\nCoverage: {}", message, coverage)
}
