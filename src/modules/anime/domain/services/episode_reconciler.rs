use std::collections::HashSet;

use crate::modules::anime::domain::entities::{EpisodePage, EpisodeRecord};
use crate::modules::provider::domain::entities::raw_episode::{ProviderEpisodes, RawEpisode};
use crate::shared::application::{page_slice, Pagination};

/// Episodes per page of a reconciled list
pub const EPISODE_PAGE_SIZE: u32 = 100;

/// Rank of `provider` in `preference`; unknown providers rank last
fn preference_rank(provider: &str, preference: &[String]) -> usize {
    preference
        .iter()
        .position(|p| p.eq_ignore_ascii_case(provider))
        .unwrap_or(preference.len())
}

fn to_record(provider: &str, episode: &RawEpisode) -> EpisodeRecord {
    let id = episode
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}-{}", provider, episode.number));

    EpisodeRecord {
        id,
        number: episode.number,
        title: episode.title.clone(),
        air_date: episode.air_date.clone(),
    }
}

/// Merge per-provider episode lists into one list ordered by number.
///
/// Lists are visited in preference order (stable for ties); the first
/// provider to report a number owns it. Episodes numbered 0 are dropped.
pub fn reconcile(mut lists: Vec<ProviderEpisodes>, preference: &[String]) -> Vec<EpisodeRecord> {
    lists.sort_by_key(|list| preference_rank(&list.provider, preference));

    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for list in &lists {
        for episode in &list.episodes {
            if episode.number == 0 || !seen.insert(episode.number) {
                continue;
            }
            merged.push(to_record(&list.provider, episode));
        }
    }

    merged.sort_by_key(|episode| episode.number);

    log::debug!(
        "Reconciled {} episodes from {} provider lists",
        merged.len(),
        lists.len()
    );
    merged
}

/// One page (1-based) of a reconciled list
pub fn paginate(episodes: &[EpisodeRecord], page: u32) -> EpisodePage {
    let page = page.max(1);
    let slice = page_slice(episodes, page, EPISODE_PAGE_SIZE);

    EpisodePage {
        pagination: Pagination::for_page(page, EPISODE_PAGE_SIZE, episodes.len(), slice.len()),
        episodes: slice,
    }
}
