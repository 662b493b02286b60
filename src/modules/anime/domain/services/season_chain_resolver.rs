//! Season chain resolution
//!
//! The metadata source models every season as its own entry linked by
//! prequel/sequel edges. The resolver walks those edges outward from one
//! entry and assembles the ordered season list, fetching each neighbour by
//! id as it goes.

use std::collections::HashSet;
use std::sync::Arc;

use crate::modules::anime::domain::entities::SeasonRef;
use crate::modules::anime::domain::services::title_normalizer::normalize_title;
use crate::modules::provider::domain::{
    entities::{
        media_record::{MediaRecord, FORMAT_TV},
        relation::{RelationEdge, RelationType},
    },
    repositories::MetadataProviderRepository,
};

/// Maximum edges followed in each direction
pub const MAX_WALK_DEPTH: usize = 8;

/// One resolved entry of a season chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLink {
    /// Metadata-source id
    pub id: u32,
    pub canonical_id: u32,
    pub format: Option<String>,
    /// Normalized base title
    pub title: String,
}

impl ChainLink {
    fn from_record(record: &MediaRecord) -> Self {
        Self {
            id: record.id,
            canonical_id: record.canonical_id(),
            format: record.format.clone(),
            title: normalize_title(&record.title),
        }
    }

    fn has_format(&self, format: &str) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case(format))
    }
}

/// Ordered chain, earliest season first
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeasonChain {
    pub links: Vec<ChainLink>,
}

impl SeasonChain {
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn ids(&self) -> Vec<u32> {
        self.links.iter().map(|link| link.id).collect()
    }

    /// Drop every entry of the given format (e.g. movies)
    pub fn without_format(mut self, format: &str) -> Self {
        self.links.retain(|link| !link.has_format(format));
        self
    }

    /// Season references numbered by chain position, starting at 1
    pub fn season_refs(&self) -> Vec<SeasonRef> {
        self.links
            .iter()
            .enumerate()
            .map(|(index, link)| SeasonRef {
                id: link.canonical_id,
                number: index as u32 + 1,
                title: link.title.clone(),
            })
            .collect()
    }
}

/// Pick the edge of `relation` type to follow: a TV entry if there is one,
/// otherwise the first candidate.
pub fn select_edge(record: &MediaRecord, relation: RelationType) -> Option<&RelationEdge> {
    let mut candidates = record
        .relations
        .iter()
        .filter(|edge| edge.relation_type == relation);

    let first = candidates.next()?;
    if is_tv(first) {
        return Some(first);
    }

    Some(candidates.find(|edge| is_tv(edge)).unwrap_or(first))
}

fn is_tv(edge: &RelationEdge) -> bool {
    edge.node
        .format
        .as_deref()
        .is_some_and(|f| f.eq_ignore_ascii_case(FORMAT_TV))
}

pub struct SeasonChainResolver {
    metadata: Arc<dyn MetadataProviderRepository>,
}

impl SeasonChainResolver {
    pub fn new(metadata: Arc<dyn MetadataProviderRepository>) -> Self {
        Self { metadata }
    }

    /// Resolve the chain around `start`, whose relation edges are already
    /// loaded. Never fails: a failed lookup ends the walk in that direction.
    pub async fn resolve(&self, start: &MediaRecord) -> SeasonChain {
        let mut seen = HashSet::from([start.id]);

        let back = self.walk(start, RelationType::Prequel, &mut seen).await;
        let forward = self.walk(start, RelationType::Sequel, &mut seen).await;

        let mut links = Vec::with_capacity(back.len() + 1 + forward.len());
        links.extend(back.into_iter().rev());
        links.push(ChainLink::from_record(start));
        links.extend(forward);

        log::debug!(
            "Resolved season chain of {} entries around {}",
            links.len(),
            start.id
        );
        SeasonChain { links }
    }

    async fn walk(
        &self,
        start: &MediaRecord,
        relation: RelationType,
        seen: &mut HashSet<u32>,
    ) -> Vec<ChainLink> {
        let mut accepted = Vec::new();
        let mut current = start.clone();

        for _ in 0..MAX_WALK_DEPTH {
            let Some(edge) = select_edge(&current, relation) else {
                break;
            };
            let candidate = edge.node.id;
            if seen.contains(&candidate) {
                log::debug!("Chain walk reached already seen id {}", candidate);
                break;
            }

            let record = match self.metadata.get_media(candidate).await {
                Ok(Some(record)) => record,
                Ok(None) => {
                    log::debug!("Chain walk: {} not found, truncating", candidate);
                    break;
                }
                Err(e) => {
                    log::warn!("Chain walk: lookup of {} failed, truncating: {}", candidate, e);
                    break;
                }
            };

            seen.insert(candidate);
            accepted.push(ChainLink::from_record(&record));
            current = record;
        }

        accepted
    }
}
