use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Ordering applied by the metadata source to a list query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaSort {
    Trending,
    Popularity,
    SearchMatch,
    StartDate,
}

impl MediaSort {
    pub fn as_graphql(&self) -> &'static str {
        match self {
            MediaSort::Trending => "TRENDING_DESC",
            MediaSort::Popularity => "POPULARITY_DESC",
            MediaSort::SearchMatch => "SEARCH_MATCH",
            MediaSort::StartDate => "START_DATE_DESC",
        }
    }
}

/// Broadcast season of the year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiringSeason {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl AiringSeason {
    pub fn from_month(month: u32) -> Self {
        match month {
            1..=3 => AiringSeason::Winter,
            4..=6 => AiringSeason::Spring,
            7..=9 => AiringSeason::Summer,
            _ => AiringSeason::Fall,
        }
    }

    pub fn as_graphql(&self) -> &'static str {
        match self {
            AiringSeason::Winter => "WINTER",
            AiringSeason::Spring => "SPRING",
            AiringSeason::Summer => "SUMMER",
            AiringSeason::Fall => "FALL",
        }
    }
}

/// Currently-airing window used by new-release queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AiringWindow {
    pub season: AiringSeason,
    pub year: i32,
}

impl AiringWindow {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            season: AiringSeason::from_month(date.month()),
            year: date.year(),
        }
    }

    pub fn current() -> Self {
        Self::containing(chrono::Utc::now().date_naive())
    }
}

/// Criteria for the metadata source's bulk list operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub sort: MediaSort,
    pub airing: Option<AiringWindow>,
    pub page: u32,
    pub per_page: u32,
}

impl SearchCriteria {
    pub const DEFAULT_PER_PAGE: u32 = 20;

    fn base(sort: MediaSort, page: u32) -> Self {
        Self {
            search: None,
            genre: None,
            sort,
            airing: None,
            page: page.max(1),
            per_page: Self::DEFAULT_PER_PAGE,
        }
    }

    pub fn trending(page: u32) -> Self {
        Self::base(MediaSort::Trending, page)
    }

    pub fn search(query: &str, page: u32) -> Self {
        Self {
            search: Some(query.trim().to_string()),
            ..Self::base(MediaSort::SearchMatch, page)
        }
    }

    pub fn discover(genre: Option<&str>, page: u32) -> Self {
        Self {
            genre: genre
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_string),
            ..Self::base(MediaSort::Popularity, page)
        }
    }

    pub fn new_releases(window: AiringWindow, page: u32) -> Self {
        Self {
            airing: Some(window),
            ..Self::base(MediaSort::StartDate, page)
        }
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(1, 50);
        self
    }
}
