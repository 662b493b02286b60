//! AniList GraphQL queries

/// Bulk list query shared by trending, search, discover and new releases
pub const MEDIA_PAGE_QUERY: &str = r#"
query ($page: Int, $perPage: Int, $search: String, $genre: String, $sort: [MediaSort], $season: MediaSeason, $seasonYear: Int) {
  Page(page: $page, perPage: $perPage) {
    pageInfo {
      total
      currentPage
      lastPage
      hasNextPage
      perPage
    }
    media(type: ANIME, isAdult: false, search: $search, genre: $genre, sort: $sort, season: $season, seasonYear: $seasonYear) {
      id
      idMal
      title {
        romaji
        english
        native
      }
      description(asHtml: false)
      format
      genres
      averageScore
      seasonYear
      startDate {
        year
        month
        day
      }
      coverImage {
        extraLarge
        large
        medium
      }
      relations {
        edges {
          relationType
          node {
            id
            format
          }
        }
      }
    }
  }
}
"#;

/// Single title with its relation edges, looked up in either id namespace
pub const MEDIA_DETAIL_QUERY: &str = r#"
query ($id: Int, $idMal: Int) {
  Media(id: $id, idMal: $idMal, type: ANIME) {
    id
    idMal
    title {
      romaji
      english
      native
    }
    description(asHtml: false)
    format
    genres
    averageScore
    seasonYear
    startDate {
      year
      month
      day
    }
    coverImage {
      extraLarge
      large
      medium
    }
    relations {
      edges {
        relationType
        node {
          id
          idMal
          format
          title {
            romaji
            english
          }
        }
      }
    }
  }
}
"#;

pub const GENRE_COLLECTION_QUERY: &str = r#"
query {
  GenreCollection
}
"#;
