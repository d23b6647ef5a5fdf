//! Per-line verdicts and whole-derivation reports

use serde_derive::{Deserialize, Serialize};

/// The outcome of checking one derivation line.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LineVerdict {
    /// One-based line number in the submitted text
    pub line: usize,
    /// Whether the line was accepted
    pub valid: bool,
    /// The recorded sequent, for accepted lines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequent: Option<String>,
    /// What went wrong, for rejected lines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LineVerdict {
    /// Verdict for an accepted line.
    pub fn accepted(line: usize, sequent: String) -> LineVerdict {
        LineVerdict {
            line,
            valid: true,
            sequent: Some(sequent),
            error: None,
        }
    }

    /// Verdict for a rejected line.
    pub fn rejected(line: usize, error: String) -> LineVerdict {
        LineVerdict {
            line,
            valid: false,
            sequent: None,
            error: Some(error),
        }
    }
}

/// The result of checking a whole derivation.
///
/// The field order matters for the TOML rendering: scalar fields must
/// precede the array of per-line tables.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DerivationReport {
    /// Conjunction of all per-line verdicts
    pub valid: bool,
    /// Whole-submission failure, such as an empty derivation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The number of checked lines
    pub total_lines: usize,
    /// One verdict per non-empty line
    pub results: Vec<LineVerdict>,
}

impl DerivationReport {
    /// Summarize per-line verdicts into a report.
    pub fn from_results(results: Vec<LineVerdict>) -> DerivationReport {
        DerivationReport {
            valid: results.iter().all(|verdict| verdict.valid),
            error: None,
            total_lines: results.len(),
            results,
        }
    }

    /// A report for a submission that could not be checked at all.
    pub fn rejected(error: &str) -> DerivationReport {
        DerivationReport {
            valid: false,
            error: Some(error.to_string()),
            total_lines: 0,
            results: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_validity_is_the_conjunction_of_lines() {
        let report = DerivationReport::from_results(vec![
            LineVerdict::accepted(1, "[] proves TRUE :TI".to_string()),
            LineVerdict::rejected(2, "Invalid inference for rule AE".to_string()),
        ]);
        assert!(!report.valid);
        assert_eq!(report.total_lines, 2);
        let report = DerivationReport::from_results(vec![LineVerdict::accepted(
            1,
            "[] proves TRUE :TI".to_string(),
        )]);
        assert!(report.valid);
    }

    #[test]
    fn report_serializes_to_toml() {
        let report = DerivationReport::from_results(vec![
            LineVerdict::accepted(1, "[A] proves A :AX".to_string()),
            LineVerdict::rejected(3, "Unknown inference rule: ZZ".to_string()),
        ]);
        let rendered = toml::to_string(&report).expect("report must serialize");
        assert!(rendered.contains("valid = false"));
        assert!(rendered.contains("total_lines = 2"));
        assert!(rendered.contains("[[results]]"));
    }
}
