use crate::model::{IntegrityReport, PhaseStats};

/// Render a deterministic markdown report from an integrity scan.
pub fn render_report(report: &IntegrityReport, max_examples: usize) -> String {
    let mut lines = Vec::new();

    lines.push("# HTAN Dataset Integrity Report".to_string());
    lines.push(String::new());
    lines.push("## Summary".to_string());
    let status = if report.is_clean() { "clean" } else { "violations found" };
    lines.push(format!("- status: {status}"));
    lines.push(format!("- violations: {}", report.violation_count()));
    lines.push(format!("- warnings: {}", report.warnings.len()));
    lines.push(String::new());

    lines.push("## Checks".to_string());
    lines.push("| check | records_checked | violations |".to_string());
    lines.push("| --- | --- | --- |".to_string());
    push_phase_row(&mut lines, "assay -> biospecimen", &report.assay_references);
    push_phase_row(&mut lines, "biospecimen -> parent", &report.biospecimen_parents);
    lines.push(String::new());

    if !report.warnings.is_empty() {
        lines.push("## Warnings".to_string());
        for warning in &report.warnings {
            lines.push(format!("- {}: {}", warning.path, warning.message));
        }
        lines.push(String::new());
    }

    if !report.violations.is_empty() {
        lines.push("## Top violations".to_string());
        for violation in report.violations.iter().take(max_examples) {
            lines.push(format!(
                "- [{}] {}/{} row {}: {}",
                violation.code.as_str(),
                violation.atlas,
                violation.collection,
                violation.row_index,
                violation.message()
            ));
        }
        let hidden = report.violations.len().saturating_sub(max_examples);
        if hidden > 0 {
            lines.push(format!("- ... {hidden} more"));
        }
        lines.push(String::new());
    }

    lines.push("## Recommendations".to_string());
    lines.extend(recommendations(report));
    lines.join("\n")
}

fn push_phase_row(lines: &mut Vec<String>, name: &str, stats: &PhaseStats) {
    lines.push(format!(
        "| {} | {} | {} |",
        name, stats.records_checked, stats.violations
    ));
}

fn recommendations(report: &IntegrityReport) -> Vec<String> {
    let mut lines = Vec::new();
    if report.assay_references.violations > 0 {
        lines.push(
            "- regenerate assay collections from the same lineage as Biospecimen.".to_string(),
        );
    }
    if report.biospecimen_parents.violations > 0 {
        lines.push(
            "- check that Demographics and Biospecimen come from the same atlas run.".to_string(),
        );
    }
    if !report.warnings.is_empty() {
        lines.push("- inspect warnings; some records were not checked.".to_string());
    }
    if lines.is_empty() {
        lines.push("- no violations detected.".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Violation, ViolationCode};
    use hsim_core::SimulatedValue;

    fn violation(row_index: u64) -> Violation {
        Violation {
            code: ViolationCode::UnknownBiospecimen,
            atlas: "HTA1".to_string(),
            collection: "ScRNA-seqLevel1".to_string(),
            field: "bts:HTANParentBiospecimenID".to_string(),
            value: SimulatedValue::Text(format!("X{row_index}")),
            row_index,
        }
    }

    #[test]
    fn clean_report() {
        let rendered = render_report(&IntegrityReport::default(), 5);
        assert!(rendered.contains("- status: clean"));
        assert!(rendered.contains("- no violations detected."));
        assert!(!rendered.contains("## Top violations"));
    }

    #[test]
    fn examples_are_capped() {
        let report = IntegrityReport {
            assay_references: PhaseStats {
                records_checked: 10,
                violations: 3,
            },
            violations: (0..3).map(violation).collect(),
            ..IntegrityReport::default()
        };
        let rendered = render_report(&report, 2);
        assert!(rendered.contains("| assay -> biospecimen | 10 | 3 |"));
        assert!(rendered.contains("HTA1/ScRNA-seqLevel1 row 1"));
        assert!(!rendered.contains("row 2:"));
        assert!(rendered.contains("- ... 1 more"));
    }
}
