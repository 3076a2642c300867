//! Fan-out/fan-in audit coordination
//!
//! Runs the four category scans concurrently, joins on all of them, builds
//! the aggregate notification body, and performs the single publish. Only a
//! failed publish fails the invocation; per-category failures are data, not
//! control flow.

use crate::aws::error::NotifyError;
use crate::aws::notify::Notifier;
use crate::report::{report_category, Category, CategoryReport};
use crate::scanner::{
    scan_functions, scan_instances, scan_snapshots, scan_volumes, FunctionLister, ResourceLister,
};
use tracing::{error, info};

/// Subject line of every audit notification.
pub const NOTIFICATION_SUBJECT: &str = "Un-Tagged Resources";

/// Status message returned on a successful invocation.
pub const OK_MESSAGE: &str = "Function successful";

/// Status message logged when the publish fails.
pub const FAIL_MESSAGE: &str = "Function failed";

/// Separator appended after each non-empty category report.
const REPORT_SEPARATOR: &str = "\n\n";

/// Run all four category scans concurrently and join on completion.
///
/// All four reports exist before any of them is consumed. No scan can abort
/// another: failures surface as report text, and there is no cancellation
/// once the fan-out starts.
pub async fn collect_reports<R, F>(resources: &R, functions: &F) -> [CategoryReport; 4]
where
    R: ResourceLister,
    F: FunctionLister,
{
    let (volumes, instances, snapshots, lambdas) = tokio::join!(
        report_category(Category::Volumes, scan_volumes(resources)),
        report_category(Category::Instances, scan_instances(resources)),
        report_category(Category::Snapshots, scan_snapshots(resources)),
        report_category(Category::Lambda, scan_functions(functions)),
    );

    [volumes, instances, snapshots, lambdas]
}

/// Concatenate the non-empty category reports into the notification body.
///
/// Clean categories contribute nothing; an all-clean run yields an empty
/// body. Each entry is followed by a blank-line separator.
pub fn aggregate_report(reports: &[CategoryReport]) -> String {
    let mut body = String::new();
    for report in reports {
        let text = report.render();
        if !text.is_empty() {
            body.push_str(&text);
            body.push_str(REPORT_SEPARATOR);
        }
    }
    body
}

/// One audit invocation: scan, aggregate, publish, map to a status.
///
/// The notification is published even when the body is empty; operators
/// rely on hearing from every run, clean or not.
pub async fn handle_request<R, F, N>(
    resources: &R,
    functions: &F,
    notifier: &N,
) -> Result<Vec<String>, NotifyError>
where
    R: ResourceLister,
    F: FunctionLister,
    N: Notifier,
{
    let reports = collect_reports(resources, functions).await;
    let body = aggregate_report(&reports);

    match notifier.publish(NOTIFICATION_SUBJECT, &body).await {
        Ok(()) => {
            info!("Audit notification published");
            Ok(vec![OK_MESSAGE.to_string()])
        }
        Err(err) => {
            error!(error = %err, "{FAIL_MESSAGE}");
            Err(err)
        }
    }
}
