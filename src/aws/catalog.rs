//! AWS-backed listing adapters
//!
//! Implement the scanner's provider seams on top of the EC2 and Lambda
//! clients. Page size caps, server-side filters, and response-shape quirks
//! (reservation nesting, optional identifiers) live here; the scanners only
//! see the token protocol.

use crate::aws::context::AwsContext;
use crate::aws::error::ScanError;
use crate::aws::tags::extract_ec2_tags;
use crate::config::{INSTANCE_STATES, PAGE_SIZE, SNAPSHOT_OWNER};
use crate::scanner::{
    FunctionLister, FunctionPage, FunctionSummary, ResourceLister, ResourcePage, TaggedResource,
};
use aws_sdk_ec2::types::Filter;
use std::collections::HashMap;

/// EC2-backed listings for volumes, instances, and snapshots.
#[derive(Debug, Clone)]
pub struct Ec2ResourceLister {
    client: aws_sdk_ec2::Client,
}

impl Ec2ResourceLister {
    pub fn new(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.ec2_client(),
        }
    }
}

impl ResourceLister for Ec2ResourceLister {
    async fn volumes_page(&self, token: Option<String>) -> Result<ResourcePage, ScanError> {
        let output = self
            .client
            .describe_volumes()
            .max_results(PAGE_SIZE)
            .set_next_token(token)
            .send()
            .await
            .map_err(|err| ScanError::from_sdk(&err))?;

        let resources = output
            .volumes()
            .iter()
            .filter_map(|volume| {
                volume.volume_id().map(|id| TaggedResource {
                    id: id.to_string(),
                    tags: extract_ec2_tags(volume.tags()),
                })
            })
            .collect();

        Ok(ResourcePage {
            resources,
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn instances_page(&self, token: Option<String>) -> Result<ResourcePage, ScanError> {
        let mut states = Filter::builder().name("instance-state-name");
        for state in INSTANCE_STATES {
            states = states.values(*state);
        }

        let output = self
            .client
            .describe_instances()
            .filters(states.build())
            .max_results(PAGE_SIZE)
            .set_next_token(token)
            .send()
            .await
            .map_err(|err| ScanError::from_sdk(&err))?;

        // Instances arrive nested one level down, grouped by reservation.
        let resources = output
            .reservations()
            .iter()
            .flat_map(|reservation| reservation.instances())
            .filter_map(|instance| {
                instance.instance_id().map(|id| TaggedResource {
                    id: id.to_string(),
                    tags: extract_ec2_tags(instance.tags()),
                })
            })
            .collect();

        Ok(ResourcePage {
            resources,
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn snapshots_page(&self, token: Option<String>) -> Result<ResourcePage, ScanError> {
        let output = self
            .client
            .describe_snapshots()
            .owner_ids(SNAPSHOT_OWNER)
            .max_results(PAGE_SIZE)
            .set_next_token(token)
            .send()
            .await
            .map_err(|err| ScanError::from_sdk(&err))?;

        let resources = output
            .snapshots()
            .iter()
            .filter_map(|snapshot| {
                snapshot.snapshot_id().map(|id| TaggedResource {
                    id: id.to_string(),
                    tags: extract_ec2_tags(snapshot.tags()),
                })
            })
            .collect();

        Ok(ResourcePage {
            resources,
            next_token: output.next_token().map(str::to_string),
        })
    }
}

/// Lambda-backed function listing and per-function tag lookup.
#[derive(Debug, Clone)]
pub struct LambdaFunctionLister {
    client: aws_sdk_lambda::Client,
}

impl LambdaFunctionLister {
    pub fn new(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.lambda_client(),
        }
    }
}

impl FunctionLister for LambdaFunctionLister {
    async fn functions_page(&self, marker: Option<String>) -> Result<FunctionPage, ScanError> {
        let output = self
            .client
            .list_functions()
            .max_items(PAGE_SIZE)
            .set_marker(marker)
            .send()
            .await
            .map_err(|err| ScanError::from_sdk(&err))?;

        let functions = output
            .functions()
            .iter()
            .filter_map(
                |function| match (function.function_name(), function.function_arn()) {
                    (Some(name), Some(arn)) => Some(FunctionSummary {
                        name: name.to_string(),
                        arn: arn.to_string(),
                    }),
                    _ => None,
                },
            )
            .collect();

        Ok(FunctionPage {
            functions,
            next_marker: output.next_marker().map(str::to_string),
        })
    }

    async fn function_tags(
        &self,
        function_arn: &str,
    ) -> Result<HashMap<String, String>, ScanError> {
        let output = self
            .client
            .list_tags()
            .resource(function_arn)
            .send()
            .await
            .map_err(|err| ScanError::from_sdk(&err))?;

        Ok(output.tags().cloned().unwrap_or_default())
    }
}
