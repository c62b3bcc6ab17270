use std::fmt;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[cfg(feature = "colorized_output")]
use console::style;

/// Validation check result status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum CheckStatus {
    /// Check passed
    Ok,
    /// Check passed with warnings
    Warning(String),
    /// Check failed
    Failed(String),
}

impl CheckStatus {
    fn is_ok(&self) -> bool {
        matches!(self, CheckStatus::Ok)
    }

    fn is_warning(&self) -> bool {
        matches!(self, CheckStatus::Warning(_))
    }

    fn is_failed(&self) -> bool {
        matches!(self, CheckStatus::Failed(_))
    }

    /// Errors sort first, then warnings, then passed checks
    fn rank(&self) -> u8 {
        match self {
            CheckStatus::Failed(_) => 0,
            CheckStatus::Warning(_) => 1,
            CheckStatus::Ok => 2,
        }
    }
}

/// Where in an input a finding points
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Input file
    pub file: String,
    /// 1-based line or row number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// JSON pointer inside a JSON-LD document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
}

impl Location {
    /// Whole-file location
    pub fn file(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: None,
            pointer: None,
        }
    }

    /// Row or line inside a file
    pub fn line(file: impl Into<String>, line: usize) -> Self {
        Self {
            line: Some(line).filter(|l| *l > 0),
            ..Self::file(file)
        }
    }

    /// JSON pointer inside a file
    pub fn pointer(file: impl Into<String>, pointer: impl Into<String>) -> Self {
        Self {
            pointer: Some(pointer.into()),
            ..Self::file(file)
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file)?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(pointer) = &self.pointer {
            write!(f, "#{}", pointer)?;
        }
        Ok(())
    }
}

/// Individual validation check result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationCheck {
    /// Rule that produced the check (e.g. "Unresolved")
    pub rule: String,
    /// What the check is about
    pub name: String,
    /// Result status of the check
    #[serde(flatten)]
    pub status: CheckStatus,
    /// Input location, when the check refers to one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl ValidationCheck {
    pub(crate) fn ok(rule: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            name: name.into(),
            status: CheckStatus::Ok,
            location: None,
        }
    }

    pub(crate) fn warning(
        rule: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            name: name.into(),
            status: CheckStatus::Warning(message.into()),
            location: None,
        }
    }

    pub(crate) fn failed(
        rule: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            name: name.into(),
            status: CheckStatus::Failed(message.into()),
            location: None,
        }
    }

    pub(crate) fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

/// One input file of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportInput {
    /// Role of the input ("glossary", "mapping", ...)
    pub role: String,
    /// Path as given on the command line
    pub path: String,
}

/// Output format of the report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

#[derive(Serialize)]
struct Summary {
    passed: usize,
    warnings: usize,
    failed: usize,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    report_id: Uuid,
    generated_at: DateTime<Utc>,
    valid: bool,
    inputs: &'a [ReportInput],
    summary: Summary,
    checks: Vec<&'a ValidationCheck>,
}

/// Complete validation report for one run
#[derive(Debug)]
pub struct ValidationReport {
    /// List of individual validation check results, in insertion order
    pub checks: Vec<ValidationCheck>,
    /// Input files of the run
    pub inputs: Vec<ReportInput>,
    /// Run identifier
    pub report_id: Uuid,
    /// Creation time
    pub generated_at: DateTime<Utc>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self {
            checks: Vec::new(),
            inputs: Vec::new(),
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
        }
    }

    /// Record an input file
    pub fn add_input(&mut self, role: impl Into<String>, path: impl Into<String>) {
        self.inputs.push(ReportInput {
            role: role.into(),
            path: path.into(),
        });
    }

    /// Add a validation check result to the report
    pub fn add_check(&mut self, check: ValidationCheck) {
        self.checks.push(check);
    }

    /// Checks ordered errors first, then warnings, then passed checks;
    /// each group keeps insertion order
    pub fn ordered_checks(&self) -> Vec<&ValidationCheck> {
        let mut ordered: Vec<&ValidationCheck> = self.checks.iter().collect();
        ordered.sort_by_key(|c| c.status.rank());
        ordered
    }

    /// Checks produced by one rule, in insertion order
    pub fn checks_for_rule<'a>(&'a self, rule: &'a str) -> impl Iterator<Item = &'a ValidationCheck> {
        self.checks.iter().filter(move |c| c.rule == rule)
    }

    /// Check if any validation checks failed
    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(|c| c.status.is_failed())
    }

    /// Check if any validation checks produced warnings
    pub fn has_warnings(&self) -> bool {
        self.checks.iter().any(|c| c.status.is_warning())
    }

    /// Count the number of successful checks
    pub fn success_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_ok()).count()
    }

    /// Count the number of warnings
    pub fn warning_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_warning()).count()
    }

    /// Count the number of failures
    pub fn failure_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_failed()).count()
    }

    /// Process exit code: 0 when no check failed, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        i32::from(self.has_failures())
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let report = JsonReport {
            report_id: self.report_id,
            generated_at: self.generated_at,
            valid: !self.has_failures(),
            inputs: &self.inputs,
            summary: Summary {
                passed: self.success_count(),
                warnings: self.warning_count(),
                failed: self.failure_count(),
            },
            checks: self.ordered_checks(),
        };
        serde_json::to_string_pretty(&report)
    }

    /// Render in the given format (text is uncolored)
    pub fn render(&self, format: ReportFormat) -> Result<String, serde_json::Error> {
        match format {
            ReportFormat::Text => Ok(self.to_string()),
            ReportFormat::Json => self.to_json(),
        }
    }

    /// Write the rendered report to `path` through a temporary file in the
    /// same directory, so readers never observe a partial report
    pub fn write_to_path(&self, path: &Path, format: ReportFormat) -> std::io::Result<()> {
        let rendered = self
            .render(format)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(rendered.as_bytes())?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            static OK: Emoji<'_, '_> = Emoji("✓", "[OK]");
            static WARN: Emoji<'_, '_> = Emoji("⚠", "[WARN]");
            static FAIL: Emoji<'_, '_> = Emoji("✗", "[FAIL]");

            let mut output = String::new();

            output.push_str(&format!("{}\n", style("Mapping Validation Report").bold().cyan()));
            output.push_str(&format!("{}\n", style("=========================").cyan()));
            for input in &self.inputs {
                output.push_str(&format!("{}: {}\n", style(&input.role).bold(), input.path));
            }
            output.push('\n');

            for check in self.ordered_checks() {
                let (symbol, color_fn): (_, fn(&str) -> console::StyledObject<&str>) =
                    match &check.status {
                        CheckStatus::Ok => (OK, |s| style(s).green()),
                        CheckStatus::Warning(_) => (WARN, |s| style(s).yellow()),
                        CheckStatus::Failed(_) => (FAIL, |s| style(s).red()),
                    };

                output.push_str(&format!(
                    "[{}] {}: {}",
                    symbol,
                    style(&check.rule).bold(),
                    color_fn(&check.name)
                ));

                match &check.status {
                    CheckStatus::Ok => {}
                    CheckStatus::Warning(msg) => {
                        output.push_str(&format!(" - {}: {}", style("WARNING").yellow().bold(), msg));
                    }
                    CheckStatus::Failed(msg) => {
                        output.push_str(&format!(" - {}: {}", style("FAILED").red().bold(), msg));
                    }
                }
                if let Some(location) = &check.location {
                    output.push_str(&format!(" {}", style(format!("({})", location)).dim()));
                }
                output.push('\n');
            }

            output.push('\n');
            output.push_str(&format!(
                "{}: {} passed, {} warnings, {} failed\n",
                style("Summary").bold(),
                style(self.success_count()).green(),
                style(self.warning_count()).yellow(),
                style(self.failure_count()).red()
            ));

            output.push('\n');
            if self.has_failures() {
                output.push_str(&format!("{}\n", style("Validation FAILED").red().bold()));
            } else if self.has_warnings() {
                output.push_str(&format!(
                    "{}\n",
                    style("Validation PASSED with warnings").yellow().bold()
                ));
            } else {
                output.push_str(&format!("{}\n", style("Validation PASSED").green().bold()));
            }

            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mapping Validation Report")?;
        writeln!(f, "=========================")?;
        for input in &self.inputs {
            writeln!(f, "{}: {}", input.role, input.path)?;
        }
        writeln!(f)?;

        for check in self.ordered_checks() {
            let symbol = match &check.status {
                CheckStatus::Ok => "✓",
                CheckStatus::Warning(_) => "⚠",
                CheckStatus::Failed(_) => "✗",
            };

            write!(f, "[{}] {}: {}", symbol, check.rule, check.name)?;

            match &check.status {
                CheckStatus::Ok => {}
                CheckStatus::Warning(msg) => write!(f, " - WARNING: {}", msg)?,
                CheckStatus::Failed(msg) => write!(f, " - FAILED: {}", msg)?,
            }
            match &check.location {
                Some(location) => writeln!(f, " ({})", location)?,
                None => writeln!(f)?,
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} passed, {} warnings, {} failed",
            self.success_count(),
            self.warning_count(),
            self.failure_count()
        )?;

        writeln!(f)?;
        if self.has_failures() {
            writeln!(f, "Validation FAILED")?;
        } else if self.has_warnings() {
            writeln!(f, "Validation PASSED with warnings")?;
        } else {
            writeln!(f, "Validation PASSED")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> ValidationReport {
        let mut report = ValidationReport::new();
        report.add_input("mapping", "map.csv");
        report.add_check(ValidationCheck::ok("Resolved", "a -> xas:a"));
        report.add_check(
            ValidationCheck::failed("Unresolved", "b -> xas:b", "no such concept")
                .at(Location::line("map.csv", 3)),
        );
        report.add_check(ValidationCheck::warning("External", "c -> schema:name", "external"));
        report.add_check(
            ValidationCheck::failed("UnmappedProperty", "xas:t", "not mapped")
                .at(Location::pointer("example.jsonld", "/xas:t")),
        );
        report
    }

    #[test]
    fn test_ordering_keeps_insertion_order_within_severity() {
        let report = sample_report();
        let rules: Vec<&str> = report.ordered_checks().iter().map(|c| c.rule.as_str()).collect();
        assert_eq!(rules, vec!["Unresolved", "UnmappedProperty", "External", "Resolved"]);
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_location_display() {
        assert_eq!(Location::line("map.csv", 3).to_string(), "map.csv:3");
        assert_eq!(Location::line("map.csv", 0), Location::file("map.csv"));
        assert_eq!(
            Location::pointer("example.jsonld", "/xas:t").to_string(),
            "example.jsonld#/xas:t"
        );
    }

    #[test]
    fn test_json_shape() {
        let report = sample_report();
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["valid"], false);
        assert_eq!(json["summary"]["failed"], 2);
        assert_eq!(json["checks"][0]["rule"], "Unresolved");
        assert_eq!(json["checks"][0]["status"], "failed");
        assert_eq!(json["checks"][0]["message"], "no such concept");
        assert_eq!(json["checks"][0]["location"]["line"], 3);
        assert_eq!(json["checks"][3]["status"], "ok");
        assert!(json["checks"][3].get("message").is_none());
    }

    #[test]
    fn test_text_rendering() {
        let text = sample_report().render(ReportFormat::Text).unwrap();
        assert!(text.contains("[✗] Unresolved: b -> xas:b - FAILED: no such concept (map.csv:3)"));
        assert!(text.contains("Summary: 1 passed, 1 warnings, 2 failed"));
        assert!(text.ends_with("Validation FAILED\n"));
    }
}
