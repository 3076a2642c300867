//! tagsweep: governance-tag audit Lambda
//!
//! Invoked periodically by a scheduler. Each invocation scans EBS volumes,
//! EC2 instances, EBS snapshots, and Lambda functions for resources missing
//! the CostCenter tag and publishes one consolidated SNS notification.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tagsweep::audit;
use tagsweep::aws::{AwsContext, Ec2ResourceLister, LambdaFunctionLister, SnsNotifier};
use tagsweep::config::EnvConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Configuration failures abort here, before the runtime starts serving.
    let env = EnvConfig::from_env()?;
    info!(region = %env.region, topic_arn = %env.topic_arn, "Starting tag audit function");

    // Clients are built once and reused across warm invocations.
    let aws = AwsContext::new(&env.region).await;
    let resources = Ec2ResourceLister::new(&aws);
    let functions = LambdaFunctionLister::new(&aws);
    let notifier = SnsNotifier::new(aws.sns_client(), env.topic_arn);

    lambda_runtime::run(service_fn(move |_event: LambdaEvent<Value>| {
        let resources = resources.clone();
        let functions = functions.clone();
        let notifier = notifier.clone();
        async move {
            audit::handle_request(&resources, &functions, &notifier)
                .await
                .map_err(Error::from)
        }
    }))
    .await
}
