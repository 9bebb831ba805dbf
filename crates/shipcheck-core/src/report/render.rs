use crate::TOOL_NAME;
use crate::report::model::{PlatformStatus, Report};

pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", TOOL_NAME, report.tool.version));
    out.push_str(&format!(
        "Verifying {} version {}\n",
        report.run.product, report.run.version
    ));

    for p in &report.platforms {
        match (&p.status, &p.reason) {
            (PlatformStatus::Failed, Some(reason)) => {
                out.push_str(&format!("{}: {} - {}\n", p.platform, p.status, reason));
            }
            _ => out.push_str(&format!("{}: {}\n", p.platform, p.status)),
        }
    }

    let warnings: Vec<String> = report
        .platforms
        .iter()
        .flat_map(|p| p.warnings.iter().map(move |w| format!("{}: {w}", p.platform)))
        .collect();
    if !warnings.is_empty() {
        out.push_str("Warnings:\n");
        for w in warnings {
            out.push_str(&format!("  - {w}\n"));
        }
    }

    let staged: Vec<&str> = report
        .platforms
        .iter()
        .filter_map(|p| p.staged.as_ref())
        .map(|s| s.file_name.as_str())
        .collect();
    if !staged.is_empty() {
        out.push_str(&format!("Staged assets in {}:\n", report.run.output_dir));
        for name in staged {
            out.push_str(&format!("  - {name}\n"));
        }
    }

    let total = report.platforms.len();
    if report.outcome.exit_code == 0 {
        out.push_str(&format!("All {total} platforms verified successfully\n"));
    } else {
        out.push_str(&format!(
            "Verification failed: {} failed, {} skipped, {} passed\n",
            report.outcome.failed, report.outcome.skipped, report.outcome.passed
        ));
    }
    out
}
