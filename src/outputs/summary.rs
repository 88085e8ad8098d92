//! One-line summary of a run, printed to stdout when the run ends, and the
//! process exit code derived from it.

use crate::models::{Layout, RunReport, RunStatus};
use std::process::ExitCode;

/// Exit status for a run whose page could not be fetched.
pub const EXIT_PAGE_UNAVAILABLE: u8 = 2;

/// Numeric exit status for `report`: `0` for any completed run (partial or
/// empty included), [`EXIT_PAGE_UNAVAILABLE`] when the page was unreachable.
pub fn exit_status(report: &RunReport) -> u8 {
    match report.status {
        RunStatus::Completed => 0,
        RunStatus::PageUnavailable { .. } => EXIT_PAGE_UNAVAILABLE,
    }
}

pub fn exit_code(report: &RunReport) -> ExitCode {
    ExitCode::from(exit_status(report))
}

/// Phrase the outcome of `report` for a human reader.
///
/// Dated runs say whether today's images were *updated* (stale files were
/// replaced) or *added*. Plain runs mention whether the folder was pushed.
pub fn summary_line(report: &RunReport) -> String {
    let dir = report.output_dir.display();

    if let RunStatus::PageUnavailable { reason } = &report.status {
        return format!("Page unavailable, no images downloaded: {reason}");
    }

    match report.layout {
        Layout::Dated if report.saved == 0 => {
            format!("No images downloaded for {}", report.date_stamp)
        }
        Layout::Dated => {
            let verb = if report.cleaned { "Updated" } else { "Added" };
            format!(
                "{verb} {} images for {} in {dir}",
                report.saved, report.date_stamp
            )
        }
        Layout::Plain => {
            let pushed = if report.published == Some(true) {
                " and pushed to the repo"
            } else {
                ""
            };
            format!(
                "Summary: {} images saved locally{pushed} in folder {dir}",
                report.saved
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SavedImage;
    use std::path::{Path, PathBuf};

    fn report_with(layout: Layout, saved: usize, cleaned: bool) -> RunReport {
        let mut report = RunReport::new(layout, "20250102", Path::new("images"));
        report.cleaned = cleaned;
        for ordinal in 1..=saved {
            report.record_saved(SavedImage {
                ordinal,
                source: format!("https://example.com/{ordinal}.jpg"),
                path: PathBuf::from(format!("images/img{ordinal}.jpg")),
                attempt: 1,
                bytes: 1,
            });
        }
        report
    }

    #[test]
    fn test_dated_added() {
        let report = report_with(Layout::Dated, 3, false);
        assert_eq!(summary_line(&report), "Added 3 images for 20250102 in images");
    }

    #[test]
    fn test_dated_updated() {
        let report = report_with(Layout::Dated, 2, true);
        assert_eq!(summary_line(&report), "Updated 2 images for 20250102 in images");
    }

    #[test]
    fn test_dated_nothing_downloaded() {
        // Even if stale files were removed
        let report = report_with(Layout::Dated, 0, true);
        assert_eq!(summary_line(&report), "No images downloaded for 20250102");
    }

    #[test]
    fn test_plain_pushed_and_not_pushed() {
        let mut report = report_with(Layout::Plain, 2, false);
        assert_eq!(
            summary_line(&report),
            "Summary: 2 images saved locally in folder images"
        );

        report.published = Some(true);
        assert_eq!(
            summary_line(&report),
            "Summary: 2 images saved locally and pushed to the repo in folder images"
        );

        report.published = Some(false);
        assert!(!summary_line(&report).contains("pushed"));
    }

    #[test]
    fn test_exit_status() {
        // Partial and empty runs still succeed
        assert_eq!(exit_status(&report_with(Layout::Dated, 3, false)), 0);
        assert_eq!(exit_status(&report_with(Layout::Plain, 0, false)), 0);

        let mut report = report_with(Layout::Dated, 0, false);
        report.status = RunStatus::PageUnavailable {
            reason: "timeout".to_string(),
        };
        assert_eq!(exit_status(&report), 2);
        assert_eq!(exit_status(&report), EXIT_PAGE_UNAVAILABLE);
    }

    #[test]
    fn test_page_unavailable() {
        let mut report = report_with(Layout::Dated, 0, false);
        report.status = RunStatus::PageUnavailable {
            reason: "HTTP 503 for https://dhankesari.org/".to_string(),
        };
        assert_eq!(
            summary_line(&report),
            "Page unavailable, no images downloaded: HTTP 503 for https://dhankesari.org/"
        );
    }
}
