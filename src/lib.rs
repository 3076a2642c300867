//! tagsweep - governance-tag compliance auditor for AWS accounts
//!
//! Scans EBS volumes, EC2 instances, EBS snapshots, and Lambda functions for
//! resources missing the `CostCenter` tag and publishes one consolidated SNS
//! notification per run. Designed to run as a scheduled Lambda, stateless
//! between invocations.

// The provider seam traits use `async fn`; they are consumed through generics
// within this crate, so explicit Send bounds on the returned futures are not
// needed.
#![allow(async_fn_in_trait)]

pub mod audit;
pub mod aws;
pub mod config;
pub mod report;
pub mod scanner;
