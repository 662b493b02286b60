pub mod episode_reconciler;
pub mod season_chain_resolver;
pub mod synopsis_cleaner;
pub mod title_normalizer;

pub use episode_reconciler::{paginate, reconcile, EPISODE_PAGE_SIZE};
pub use season_chain_resolver::{SeasonChain, SeasonChainResolver, MAX_WALK_DEPTH};
pub use synopsis_cleaner::clean_synopsis;
pub use title_normalizer::{has_season_suffix, normalize_title, slugify, TitleNormalizer};
