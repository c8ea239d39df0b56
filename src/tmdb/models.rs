//! Typed views over TMDB v3 response envelopes.
//!
//! Every field the upstream may omit carries a serde default, so a response either
//! decodes completely or fails with a decode error.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub video: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub first_air_date: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub origin_country: Vec<String>,
}

/// A catalog entry whose kind is fixed when it is decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum Title {
    Movie(Movie),
    Tv(Show),
}

impl Title {
    pub fn id(&self) -> u64 {
        match self {
            Title::Movie(m) => m.id,
            Title::Tv(s) => s.id,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Title::Movie(m) => &m.title,
            Title::Tv(s) => &s.name,
        }
    }

    pub fn release_date(&self) -> &str {
        match self {
            Title::Movie(m) => &m.release_date,
            Title::Tv(s) => &s.first_air_date,
        }
    }

    pub fn poster_path(&self) -> Option<&str> {
        match self {
            Title::Movie(m) => m.poster_path.as_deref(),
            Title::Tv(s) => s.poster_path.as_deref(),
        }
    }

    pub fn backdrop_path(&self) -> Option<&str> {
        match self {
            Title::Movie(m) => m.backdrop_path.as_deref(),
            Title::Tv(s) => s.backdrop_path.as_deref(),
        }
    }

    pub fn vote_average(&self) -> f64 {
        match self {
            Title::Movie(m) => m.vote_average,
            Title::Tv(s) => s.vote_average,
        }
    }
}

impl From<Movie> for Title {
    fn from(movie: Movie) -> Self {
        Title::Movie(movie)
    }
}

impl From<Show> for Title {
    fn from(show: Show) -> Self {
        Title::Tv(show)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonSummary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub popularity: f64,
}

/// One hit from `/search/multi`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum SearchResult {
    Movie(Movie),
    Tv(Show),
    Person(PersonSummary),
    #[serde(other)]
    Other,
}

impl SearchResult {
    pub fn into_title(self) -> Option<Title> {
        match self {
            SearchResult::Movie(m) => Some(Title::Movie(m)),
            SearchResult::Tv(s) => Some(Title::Tv(s)),
            SearchResult::Person(_) | SearchResult::Other => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar_path: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub author: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub author_details: Option<AuthorDetails>,
}

/// The `{ page, results, total_pages, total_results }` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paged<T> {
    #[serde(default)]
    pub page: u32,
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreList {
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub budget: Option<u64>,
    #[serde(default)]
    pub revenue: Option<u64>,
    #[serde(default)]
    pub videos: Option<VideoList>,
    #[serde(default)]
    pub credits: Option<Credits>,
    #[serde(default)]
    pub similar: Option<Paged<Movie>>,
    #[serde(default)]
    pub recommendations: Option<Paged<Movie>>,
    #[serde(default)]
    pub reviews: Option<Paged<Review>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowDetails {
    #[serde(flatten)]
    pub show: Show,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub videos: Option<VideoList>,
    #[serde(default)]
    pub credits: Option<Credits>,
    #[serde(default)]
    pub similar: Option<Paged<Show>>,
    #[serde(default)]
    pub recommendations: Option<Paged<Show>>,
    #[serde(default)]
    pub reviews: Option<Paged<Review>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum Detail {
    Movie(Box<MovieDetails>),
    Tv(Box<ShowDetails>),
}

impl Detail {
    pub fn videos(&self) -> &[Video] {
        let list = match self {
            Detail::Movie(m) => m.videos.as_ref(),
            Detail::Tv(s) => s.videos.as_ref(),
        };
        list.map(|v| v.results.as_slice()).unwrap_or_default()
    }

    pub fn credits(&self) -> Option<&Credits> {
        match self {
            Detail::Movie(m) => m.credits.as_ref(),
            Detail::Tv(s) => s.credits.as_ref(),
        }
    }

    pub fn similar(&self) -> Vec<Title> {
        match self {
            Detail::Movie(m) => m
                .similar
                .iter()
                .flat_map(|p| p.results.iter().cloned().map(Title::Movie))
                .collect(),
            Detail::Tv(s) => s
                .similar
                .iter()
                .flat_map(|p| p.results.iter().cloned().map(Title::Tv))
                .collect(),
        }
    }
}

impl From<MovieDetails> for Detail {
    fn from(details: MovieDetails) -> Self {
        Detail::Movie(Box::new(details))
    }
}

impl From<ShowDetails> for Detail {
    fn from(details: ShowDetails) -> Self {
        Detail::Tv(Box::new(details))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditedMovie {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditedShow {
    #[serde(flatten)]
    pub show: Show,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct PersonCredits<T> {
    #[serde(default)]
    pub cast: Vec<T>,
    #[serde(default)]
    pub crew: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFile {
    pub file_path: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub iso_639_1: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonImages {
    #[serde(default)]
    pub profiles: Vec<ImageFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonDetails {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub biography: String,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub deathday: Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub movie_credits: Option<PersonCredits<CreditedMovie>>,
    #[serde(default)]
    pub tv_credits: Option<PersonCredits<CreditedShow>>,
    #[serde(default)]
    pub images: Option<PersonImages>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn multi_search_results_carry_their_media_type() {
        let raw = json!({
            "page": 1,
            "results": [
                { "media_type": "movie", "id": 1, "title": "Heat", "release_date": "1995-12-15" },
                { "media_type": "tv", "id": 2, "name": "Severance", "first_air_date": "2022-02-17" },
                { "media_type": "person", "id": 3, "name": "Al Pacino" },
                { "media_type": "collection", "id": 4, "name": "Heat Collection" }
            ]
        });
        let page: Paged<SearchResult> = serde_json::from_value(raw).unwrap();
        assert!(matches!(&page.results[0], SearchResult::Movie(m) if m.title == "Heat"));
        assert!(matches!(&page.results[1], SearchResult::Tv(s) if s.name == "Severance"));
        assert!(matches!(&page.results[2], SearchResult::Person(p) if p.name == "Al Pacino"));
        assert_eq!(page.results[3], SearchResult::Other);

        let titles: Vec<Title> = page
            .results
            .into_iter()
            .filter_map(SearchResult::into_title)
            .collect();
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[1].display_name(), "Severance");
    }

    #[test]
    fn title_serializes_with_discriminant() {
        let title = Title::from(Show {
            id: 9,
            name: "Dark".to_string(),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            first_air_date: "2017-12-01".to_string(),
            vote_average: 8.4,
            vote_count: 6000,
            genre_ids: vec![18],
            popularity: 50.0,
            original_language: "de".to_string(),
            origin_country: vec!["DE".to_string()],
        });
        let value = serde_json::to_value(&title).unwrap();
        assert_eq!(value["media_type"], "tv");
        assert_eq!(value["name"], "Dark");
    }

    #[test]
    fn movie_details_tolerate_missing_side_loads() {
        let raw = json!({
            "id": 550,
            "title": "Fight Club",
            "overview": "An insomniac office worker...",
            "release_date": "1999-10-15",
            "runtime": 139,
            "genres": [{ "id": 18, "name": "Drama" }],
            "vote_average": 8.4,
            "vote_count": 26000
        });
        let details: MovieDetails = serde_json::from_value(raw).unwrap();
        assert_eq!(details.movie.id, 550);
        assert_eq!(details.runtime, Some(139));
        assert!(details.videos.is_none());
        assert!(details.credits.is_none());

        let detail = Detail::from(details);
        assert!(detail.videos().is_empty());
        assert!(detail.similar().is_empty());
    }

    #[test]
    fn person_details_decode_with_appended_credits() {
        let raw = json!({
            "id": 287,
            "name": "Brad Pitt",
            "birthday": "1963-12-18",
            "movie_credits": {
                "cast": [
                    { "id": 550, "title": "Fight Club", "character": "Tyler Durden" },
                    { "id": 807, "title": "Se7en", "character": "David Mills" }
                ],
                "crew": [{ "id": 1, "title": "Produced Film", "job": "Producer" }]
            },
            "tv_credits": {
                "cast": [{ "id": 1668, "name": "Friends", "character": "Will Colbert" }]
            },
            "images": { "profiles": [{ "file_path": "/brad.jpg", "width": 400, "height": 600 }] }
        });
        let person: PersonDetails = serde_json::from_value(raw).unwrap();

        let movies = person.movie_credits.unwrap();
        assert_eq!(movies.cast.len(), 2);
        assert_eq!(movies.cast[0].character.as_deref(), Some("Tyler Durden"));
        assert_eq!(movies.crew[0].job.as_deref(), Some("Producer"));
        let shows = person.tv_credits.unwrap();
        assert_eq!(shows.cast[0].show.name, "Friends");
        assert!(shows.crew.is_empty());
        assert_eq!(person.images.unwrap().profiles[0].file_path, "/brad.jpg");
    }

    #[test]
    fn missing_required_field_is_a_decode_error() {
        let raw = json!({ "results": [{ "id": 1 }] });
        assert!(serde_json::from_value::<Paged<Movie>>(raw).is_err());
    }
}
