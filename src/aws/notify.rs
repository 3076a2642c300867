//! Notification sink
//!
//! One publish per audit run: fixed subject, configured topic, best effort.

use crate::aws::error::NotifyError;

/// Best-effort notification sink: publish text, get success or failure.
pub trait Notifier {
    async fn publish(&self, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// SNS-backed notifier bound to one topic.
#[derive(Debug, Clone)]
pub struct SnsNotifier {
    client: aws_sdk_sns::Client,
    topic_arn: String,
}

impl SnsNotifier {
    pub fn new(client: aws_sdk_sns::Client, topic_arn: String) -> Self {
        Self { client, topic_arn }
    }
}

impl Notifier for SnsNotifier {
    async fn publish(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        self.client
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(subject)
            .message(body)
            .send()
            .await
            .map_err(|err| NotifyError::from_sdk(&err))?;

        Ok(())
    }
}
