use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

use crate::error::{ErrorCategory, ErrorLevel, MzTabError};
use crate::parser::ParseResult;

/// Validation check result status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed
    Ok,
    /// Check passed with warnings
    Warning(String),
    /// Check failed
    Failed(String),
}

impl CheckStatus {
    fn is_failed(&self) -> bool {
        matches!(self, CheckStatus::Failed(_))
    }
}

/// Individual validation check result
#[derive(Debug, Clone)]
pub struct ValidationCheck {
    /// Name of the validation check
    pub name: String,
    /// Result status of the check
    pub status: CheckStatus,
}

impl ValidationCheck {
    pub(crate) fn ok(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Ok,
        }
    }

    pub(crate) fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Warning(message.into()),
        }
    }

    pub(crate) fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Failed(message.into()),
        }
    }
}

fn category_name(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::Format => "Format (1xxx)",
        ErrorCategory::Logical => "Logical consistency (2xxx)",
        ErrorCategory::CrossCheck => "Controlled vocabulary (3xxx)",
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("1 {}", word)
    } else {
        format!("{} {}s", count, word)
    }
}

/// Summary of one mzTab parse: a check per diagnostic category plus the
/// diagnostics themselves.
#[derive(Debug)]
pub struct ValidationReport {
    /// List of individual validation check results
    pub checks: Vec<ValidationCheck>,
    /// Diagnostics at or above the report level, in input order
    pub diagnostics: Vec<MzTabError>,
    /// Path of the file that was validated
    pub file_path: String,
}

impl ValidationReport {
    /// Create a new validation report for the given file path
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            checks: Vec::new(),
            diagnostics: Vec::new(),
            file_path: file_path.into(),
        }
    }

    /// Build the report for a finished parse. Diagnostics below `min_level`
    /// are counted in the checks but not listed.
    pub fn from_parse(
        file_path: impl Into<String>,
        result: &ParseResult,
        min_level: ErrorLevel,
    ) -> Self {
        let mut report = Self::new(file_path);

        match &result.abort {
            None => report.add_check(ValidationCheck::ok("Parse completed")),
            Some(abort) => report.add_check(ValidationCheck::failed(
                "Parse completed",
                abort.to_string(),
            )),
        }

        for category in [
            ErrorCategory::Format,
            ErrorCategory::Logical,
            ErrorCategory::CrossCheck,
        ] {
            let count = |level: ErrorLevel| {
                result
                    .errors
                    .iter()
                    .filter(|e| e.category() == category && e.level() == level)
                    .count()
            };
            let name = category_name(category);
            let (errors, warnings) = (count(ErrorLevel::Error), count(ErrorLevel::Warn));
            let check = if errors > 0 {
                ValidationCheck::failed(
                    name,
                    format!("{}, {}", plural(errors, "error"), plural(warnings, "warning")),
                )
            } else if warnings > 0 {
                ValidationCheck::warning(name, plural(warnings, "warning"))
            } else {
                ValidationCheck::ok(name)
            };
            report.add_check(check);
        }

        for table in result.file.tables() {
            report.add_check(ValidationCheck::ok(format!(
                "{} section: {} columns, {}",
                table.section,
                table.schema.len(),
                plural(table.len(), "row")
            )));
        }

        report.diagnostics = result.errors.filter(min_level).into_iter().cloned().collect();
        report
    }

    fn add_check(&mut self, check: ValidationCheck) {
        self.checks.push(check);
    }

    /// Check if any validation checks failed
    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(|c| c.status.is_failed())
    }

    /// Check if any validation checks produced warnings
    pub fn has_warnings(&self) -> bool {
        self.checks.iter().any(|c| matches!(c.status, CheckStatus::Warning(_)))
    }

    /// Listed diagnostics at `level`
    pub fn diagnostic_count(&self, level: ErrorLevel) -> usize {
        self.diagnostics.iter().filter(|e| e.level() == level).count()
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            self.render(|tone, text| {
                let styled = match tone {
                    Tone::Title => style(text).bold().cyan(),
                    Tone::Label => style(text).bold(),
                    Tone::Passed => style(text).green(),
                    Tone::Warning => style(text).yellow(),
                    Tone::Failed => style(text).red(),
                    Tone::Quiet => style(text).dim(),
                };
                styled.to_string()
            })
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }

    fn render(&self, paint: impl Fn(Tone, String) -> String) -> String {
        let mut out = String::new();
        out.push_str(&paint(Tone::Title, "mzTab Validation Report".to_string()));
        out.push('\n');
        out.push_str(&format!("{}: {}\n\n", paint(Tone::Label, "File".to_string()), self.file_path));

        for check in &self.checks {
            let (tone, symbol) = status_tone(&check.status);
            out.push_str(&format!("[{}] {}", symbol, paint(tone, check.name.clone())));
            match &check.status {
                CheckStatus::Ok => {}
                CheckStatus::Warning(msg) => out.push_str(&format!(" - {}", paint(tone, msg.clone()))),
                CheckStatus::Failed(msg) => out.push_str(&format!(" - {}", paint(tone, msg.clone()))),
            }
            out.push('\n');
        }

        if !self.diagnostics.is_empty() {
            out.push('\n');
            out.push_str(&paint(Tone::Label, "Diagnostics".to_string()));
            out.push('\n');
            for error in &self.diagnostics {
                let tone = match error.level() {
                    ErrorLevel::Error => Tone::Failed,
                    ErrorLevel::Warn => Tone::Warning,
                    ErrorLevel::Info => Tone::Quiet,
                };
                out.push_str(&format!("  {}\n", paint(tone, error.to_string())));
            }
        }

        out.push_str(&format!(
            "\n{}: {}, {}, {} listed\n\n",
            paint(Tone::Label, "Summary".to_string()),
            plural(self.diagnostic_count(ErrorLevel::Error), "error"),
            plural(self.diagnostic_count(ErrorLevel::Warn), "warning"),
            plural(self.diagnostic_count(ErrorLevel::Info), "notice"),
        ));

        let verdict = if self.has_failures() {
            paint(Tone::Failed, "Validation FAILED".to_string())
        } else if self.has_warnings() {
            paint(Tone::Warning, "Validation PASSED with warnings".to_string())
        } else {
            paint(Tone::Passed, "Validation PASSED".to_string())
        };
        out.push_str(&verdict);
        out.push('\n');
        out
    }
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Title,
    Label,
    Passed,
    Warning,
    Failed,
    Quiet,
}

fn status_tone(status: &CheckStatus) -> (Tone, &'static str) {
    match status {
        CheckStatus::Ok => (Tone::Passed, "✓"),
        CheckStatus::Warning(_) => (Tone::Warning, "⚠"),
        CheckStatus::Failed(_) => (Tone::Failed, "✗"),
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(|_, text| text))
    }
}
