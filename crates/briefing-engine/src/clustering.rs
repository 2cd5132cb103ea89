//! Greedy single-pass clustering of source items into candidate stories.
//!
//! Items are bucketed by `(primary entity, subdomain)`. Within a bucket each
//! item, in arrival order, joins the existing cluster with the highest
//! keyword Jaccard similarity at or above the bucket threshold (first cluster
//! to reach the maximum wins), or starts a new cluster. Assignments are never
//! revisited, so results depend on arrival order. This is intentional:
//! identical input order reproduces identical clusters.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use briefing_types::{SourceItem, Subdomain};

use crate::config::ClusteringConfig;
use crate::normalizer::{Fingerprint, Normalizer};
use crate::similarity::{jaccard, merge_keywords};

/// How an item entered its cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub item_id: String,
    /// Similarity to the cluster at join time; `None` for the founding item
    pub similarity: Option<f32>,
}

/// A group of source items judged to describe the same story.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub entity: String,
    pub subdomain: Subdomain,
    /// Accumulated keyword union, insertion order, capped
    pub keywords: Vec<String>,
    /// Most recent members, newest first
    pub members: Vec<SourceItem>,
    /// Items assigned before truncation
    pub absorbed: usize,
    /// Join record for every assigned item, in assignment order
    pub assignments: Vec<Assignment>,
}

impl Cluster {
    fn found(item: &SourceItem, fingerprint: Fingerprint, keyword_cap: usize) -> Self {
        let mut keywords = fingerprint.keywords;
        keywords.truncate(keyword_cap);
        Self {
            entity: fingerprint.entity,
            subdomain: fingerprint.subdomain,
            keywords,
            members: vec![item.clone()],
            absorbed: 1,
            assignments: vec![Assignment {
                item_id: item.id.clone(),
                similarity: None,
            }],
        }
    }

    fn absorb(
        &mut self,
        item: &SourceItem,
        fingerprint: &Fingerprint,
        similarity: f32,
        cap: usize,
    ) {
        merge_keywords(&mut self.keywords, &fingerprint.keywords, cap);
        self.members.push(item.clone());
        self.absorbed += 1;
        self.assignments.push(Assignment {
            item_id: item.id.clone(),
            similarity: Some(similarity),
        });
    }

    fn finalize(&mut self, max_members: usize) {
        self.members.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        self.members.truncate(max_members);
    }

    /// Publish time of the newest retained member.
    pub fn latest_published(&self) -> Option<DateTime<Utc>> {
        self.members.iter().map(|m| m.published_at).max()
    }
}

/// Merge threshold for a fingerprint's entity specificity.
pub fn merge_threshold(fingerprint: &Fingerprint, config: &ClusteringConfig) -> f32 {
    if fingerprint.has_known_entity() {
        config.known_entity_threshold
    } else {
        config.unknown_entity_threshold
    }
}

/// Cluster a batch of items.
///
/// Returns clusters ordered by most recent member, newest first; ties keep
/// bucket order.
pub fn cluster_items(
    normalizer: &Normalizer,
    items: &[SourceItem],
    config: &ClusteringConfig,
) -> Vec<Cluster> {
    let mut bucket_index: HashMap<(String, Subdomain), usize> = HashMap::new();
    let mut buckets: Vec<Vec<(&SourceItem, Fingerprint)>> = Vec::new();

    for item in items {
        let fingerprint = normalizer.fingerprint(item);
        let key = (fingerprint.entity.clone(), fingerprint.subdomain);
        let slot = *bucket_index.entry(key).or_insert_with(|| {
            buckets.push(Vec::new());
            buckets.len() - 1
        });
        buckets[slot].push((item, fingerprint));
    }

    debug!(
        items = items.len(),
        buckets = buckets.len(),
        "Bucketed items by entity and subdomain"
    );

    let mut clusters: Vec<Cluster> = Vec::new();
    for bucket in buckets {
        let mut formed: Vec<Cluster> = Vec::new();
        for (item, fingerprint) in bucket {
            let threshold = merge_threshold(&fingerprint, config);

            let mut best: Option<(usize, f32)> = None;
            for (idx, cluster) in formed.iter().enumerate() {
                let similarity = jaccard(&fingerprint.keywords, &cluster.keywords);
                if similarity < threshold {
                    continue;
                }
                if best.map_or(true, |(_, top)| similarity > top) {
                    best = Some((idx, similarity));
                }
            }

            match best {
                Some((idx, similarity)) => {
                    let cap = config.max_cluster_keywords;
                    formed[idx].absorb(item, &fingerprint, similarity, cap);
                }
                None => {
                    formed.push(Cluster::found(item, fingerprint, config.max_cluster_keywords));
                }
            }
        }
        clusters.extend(formed);
    }

    for cluster in &mut clusters {
        cluster.finalize(config.max_cluster_members);
    }
    clusters.sort_by(|a, b| b.latest_published().cmp(&a.latest_published()));

    debug!(clusters = clusters.len(), "Clustering complete");
    clusters
}
