//! AWS client modules
//!
//! Everything that touches the AWS SDKs lives here:
//! - context: load SDK configuration once, hand out service clients
//! - catalog: listing adapters behind the scanner's provider seams
//! - notify: SNS notification sink
//! - error: typed errors classified from SDK error metadata
//! - tags: governance tag constant and tag-shape helpers

pub mod catalog;
pub mod context;
pub mod error;
pub mod notify;
pub mod tags;

pub use catalog::{Ec2ResourceLister, LambdaFunctionLister};
pub use context::AwsContext;
pub use error::{NotifyError, ScanError};
pub use notify::{Notifier, SnsNotifier};
