//! Paginated untagged-resource scanners
//!
//! Four independent scans walk their listing APIs to completion using
//! continuation tokens and collect the identifiers of resources missing the
//! governance tag. Each scan owns its accumulator and talks to nothing but
//! its lister; a failed call aborts that scan and discards anything
//! collected so far.

use crate::aws::error::ScanError;
use crate::aws::tags::{has_governance_tag, GOVERNANCE_TAG};
use std::collections::HashMap;
use tracing::debug;

/// A listed resource with its inline tag set.
#[derive(Debug, Clone)]
pub struct TaggedResource {
    pub id: String,
    pub tags: HashMap<String, String>,
}

/// One page of tagged resources plus the cursor for the next page.
///
/// `next_token: None` means this was the last page. An empty page with a
/// token is legal and does not end the scan.
#[derive(Debug, Clone, Default)]
pub struct ResourcePage {
    pub resources: Vec<TaggedResource>,
    pub next_token: Option<String>,
}

/// A listed serverless function. The listing carries no tag data; tags are
/// fetched per function through [`FunctionLister::function_tags`].
#[derive(Debug, Clone)]
pub struct FunctionSummary {
    pub name: String,
    pub arn: String,
}

/// One page of listed functions plus the cursor for the next page.
#[derive(Debug, Clone, Default)]
pub struct FunctionPage {
    pub functions: Vec<FunctionSummary>,
    pub next_marker: Option<String>,
}

/// Paginated listing surface for resources whose tags arrive inline.
///
/// Page size caps and server-side filters are the implementor's concern;
/// the scanners only see the token protocol.
pub trait ResourceLister {
    async fn volumes_page(&self, token: Option<String>) -> Result<ResourcePage, ScanError>;
    async fn instances_page(&self, token: Option<String>) -> Result<ResourcePage, ScanError>;
    async fn snapshots_page(&self, token: Option<String>) -> Result<ResourcePage, ScanError>;
}

/// Paginated listing surface for serverless functions, plus the
/// per-function tag lookup the listing response makes necessary.
pub trait FunctionLister {
    async fn functions_page(&self, marker: Option<String>) -> Result<FunctionPage, ScanError>;
    async fn function_tags(&self, function_arn: &str)
        -> Result<HashMap<String, String>, ScanError>;
}

/// Collect volume IDs missing the governance tag, in listing order.
pub async fn scan_volumes<L: ResourceLister>(lister: &L) -> Result<Vec<String>, ScanError> {
    let mut untagged = Vec::new();
    let mut token: Option<String> = None;

    loop {
        let page = lister.volumes_page(token.take()).await?;
        for resource in page.resources {
            if !has_governance_tag(&resource.tags) {
                untagged.push(resource.id);
            }
        }
        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    debug!(untagged = ?untagged, "Volumes scan complete");
    Ok(untagged)
}

/// Collect instance IDs missing the governance tag, in listing order.
///
/// The lister narrows the walk to running and stopped instances; states
/// that can no longer be tagged are excluded at the server.
pub async fn scan_instances<L: ResourceLister>(lister: &L) -> Result<Vec<String>, ScanError> {
    let mut untagged = Vec::new();
    let mut token: Option<String> = None;

    loop {
        let page = lister.instances_page(token.take()).await?;
        for resource in page.resources {
            if !has_governance_tag(&resource.tags) {
                untagged.push(resource.id);
            }
        }
        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    debug!(untagged = ?untagged, "Instances scan complete");
    Ok(untagged)
}

/// Collect snapshot IDs missing the governance tag, in listing order.
pub async fn scan_snapshots<L: ResourceLister>(lister: &L) -> Result<Vec<String>, ScanError> {
    let mut untagged = Vec::new();
    let mut token: Option<String> = None;

    loop {
        let page = lister.snapshots_page(token.take()).await?;
        for resource in page.resources {
            if !has_governance_tag(&resource.tags) {
                untagged.push(resource.id);
            }
        }
        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    debug!(untagged = ?untagged, "Snapshots scan complete");
    Ok(untagged)
}

/// Collect function names missing the governance tag, in listing order.
///
/// The listing response has no tag data, so every listed function costs one
/// extra tag-lookup call (N+1 for N functions). Acceptable for a periodic
/// batch job; a bulk tag API would remove the extra calls if this ever runs
/// at higher frequency.
pub async fn scan_functions<L: FunctionLister>(lister: &L) -> Result<Vec<String>, ScanError> {
    let mut untagged = Vec::new();
    let mut marker: Option<String> = None;

    loop {
        let page = lister.functions_page(marker.take()).await?;
        for function in page.functions {
            let tags = lister.function_tags(&function.arn).await?;
            if !tags.contains_key(GOVERNANCE_TAG) {
                untagged.push(function.name);
            }
        }
        match page.next_marker {
            Some(next) => marker = Some(next),
            None => break,
        }
    }

    debug!(untagged = ?untagged, "Lambda scan complete");
    Ok(untagged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn resource(id: &str, tags: &[(&str, &str)]) -> TaggedResource {
        TaggedResource {
            id: id.to_string(),
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn untagged(id: &str) -> TaggedResource {
        resource(id, &[])
    }

    fn page(resources: Vec<TaggedResource>, next_token: Option<&str>) -> ResourcePage {
        ResourcePage {
            resources,
            next_token: next_token.map(str::to_string),
        }
    }

    /// Serves scripted page sequences per category and records the tokens
    /// each request carried. Panics if a scan requests a page past the end
    /// of its script.
    #[derive(Default)]
    struct ScriptedLister {
        volumes: Mutex<VecDeque<Result<ResourcePage, ScanError>>>,
        instances: Mutex<VecDeque<Result<ResourcePage, ScanError>>>,
        snapshots: Mutex<VecDeque<Result<ResourcePage, ScanError>>>,
        tokens_seen: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedLister {
        fn with_volumes(pages: Vec<Result<ResourcePage, ScanError>>) -> Self {
            Self {
                volumes: Mutex::new(pages.into()),
                ..Default::default()
            }
        }

        fn next(
            &self,
            queue: &Mutex<VecDeque<Result<ResourcePage, ScanError>>>,
            token: Option<String>,
        ) -> Result<ResourcePage, ScanError> {
            self.tokens_seen.lock().unwrap().push(token);
            queue
                .lock()
                .unwrap()
                .pop_front()
                .expect("scan requested a page past the scripted end")
        }
    }

    impl ResourceLister for ScriptedLister {
        async fn volumes_page(&self, token: Option<String>) -> Result<ResourcePage, ScanError> {
            self.next(&self.volumes, token)
        }

        async fn instances_page(&self, token: Option<String>) -> Result<ResourcePage, ScanError> {
            self.next(&self.instances, token)
        }

        async fn snapshots_page(&self, token: Option<String>) -> Result<ResourcePage, ScanError> {
            self.next(&self.snapshots, token)
        }
    }

    #[tokio::test]
    async fn visits_every_page_once_in_order() {
        let lister = ScriptedLister::with_volumes(vec![
            Ok(page(
                vec![untagged("vol-1"), resource("vol-2", &[("CostCenter", "42")])],
                Some("t1"),
            )),
            Ok(page(vec![untagged("vol-3")], Some("t2"))),
            Ok(page(vec![untagged("vol-4")], None)),
        ]);

        let ids = scan_volumes(&lister).await.unwrap();
        assert_eq!(ids, vec!["vol-1", "vol-3", "vol-4"]);

        let tokens = lister.tokens_seen.lock().unwrap().clone();
        assert_eq!(
            tokens,
            vec![None, Some("t1".to_string()), Some("t2".to_string())]
        );
    }

    #[tokio::test]
    async fn empty_page_with_token_continues() {
        let lister = ScriptedLister::with_volumes(vec![
            Ok(page(Vec::new(), Some("t1"))),
            Ok(page(vec![untagged("vol-1")], None)),
        ]);

        let ids = scan_volumes(&lister).await.unwrap();
        assert_eq!(ids, vec!["vol-1"]);
    }

    #[tokio::test]
    async fn clean_listing_yields_empty_result() {
        let lister = ScriptedLister::with_volumes(vec![Ok(page(
            vec![resource("vol-1", &[("CostCenter", "ops")])],
            None,
        ))]);

        let ids = scan_volumes(&lister).await.unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn page_error_aborts_and_discards() {
        let lister = ScriptedLister::with_volumes(vec![
            Ok(page(vec![untagged("vol-1")], Some("t1"))),
            Err(ScanError::Unknown {
                message: "connection reset".to_string(),
            }),
        ]);

        let err = scan_volumes(&lister).await.unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn instances_and_snapshots_share_the_token_protocol() {
        let lister = ScriptedLister {
            instances: Mutex::new(
                vec![
                    Ok(page(vec![untagged("i-1")], Some("t1"))),
                    Ok(page(vec![untagged("i-2")], None)),
                ]
                .into(),
            ),
            snapshots: Mutex::new(vec![Ok(page(vec![untagged("snap-1")], None))].into()),
            ..Default::default()
        };

        assert_eq!(
            scan_instances(&lister).await.unwrap(),
            vec!["i-1".to_string(), "i-2".to_string()]
        );
        assert_eq!(
            scan_snapshots(&lister).await.unwrap(),
            vec!["snap-1".to_string()]
        );
    }

    /// Function listing script plus a per-ARN tag table; records every tag
    /// lookup.
    #[derive(Default)]
    struct ScriptedFunctions {
        pages: Mutex<VecDeque<Result<FunctionPage, ScanError>>>,
        tags_by_arn: HashMap<String, HashMap<String, String>>,
        failing_arn: Option<String>,
        lookups: Mutex<Vec<String>>,
    }

    fn function(name: &str) -> FunctionSummary {
        FunctionSummary {
            name: name.to_string(),
            arn: format!("arn:aws:lambda:us-east-2:123456789012:function:{name}"),
        }
    }

    impl FunctionLister for ScriptedFunctions {
        async fn functions_page(
            &self,
            _marker: Option<String>,
        ) -> Result<FunctionPage, ScanError> {
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .expect("scan requested a page past the scripted end")
        }

        async fn function_tags(
            &self,
            function_arn: &str,
        ) -> Result<HashMap<String, String>, ScanError> {
            self.lookups.lock().unwrap().push(function_arn.to_string());
            if self.failing_arn.as_deref() == Some(function_arn) {
                return Err(ScanError::Throttled {
                    code: "ThrottlingException".to_string(),
                    message: "Rate exceeded".to_string(),
                });
            }
            Ok(self.tags_by_arn.get(function_arn).cloned().unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn every_listed_function_costs_one_tag_lookup() {
        let tagged = function("billing");
        let lister = ScriptedFunctions {
            pages: Mutex::new(
                vec![
                    Ok(FunctionPage {
                        functions: vec![function("ingest"), tagged.clone()],
                        next_marker: Some("m1".to_string()),
                    }),
                    Ok(FunctionPage {
                        functions: vec![function("cleanup")],
                        next_marker: None,
                    }),
                ]
                .into(),
            ),
            tags_by_arn: HashMap::from([(
                tagged.arn.clone(),
                HashMap::from([("CostCenter".to_string(), "42".to_string())]),
            )]),
            ..Default::default()
        };

        let names = scan_functions(&lister).await.unwrap();
        // Names are reported, not ARNs; the tagged function is excluded.
        assert_eq!(names, vec!["ingest", "cleanup"]);
        assert_eq!(lister.lookups.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn tag_lookup_failure_aborts_the_scan() {
        let doomed = function("doomed");
        let lister = ScriptedFunctions {
            pages: Mutex::new(
                vec![Ok(FunctionPage {
                    functions: vec![function("ingest"), doomed.clone()],
                    next_marker: None,
                })]
                .into(),
            ),
            failing_arn: Some(doomed.arn),
            ..Default::default()
        };

        let err = scan_functions(&lister).await.unwrap_err();
        assert!(matches!(err, ScanError::Throttled { .. }));
    }
}
