//! Derived values for the movie and TV detail pages.

use serde::Serialize;

use crate::format::{
    format_date, format_money, format_rating, format_runtime, group_thousands, image_url,
    language_name, poster_or_placeholder, release_year, ImageSize,
};
use crate::tmdb::{
    CastMember, Credits, CrewMember, Genre, MovieDetails, ShowDetails, Title, Video,
};

pub const MAX_CAST: usize = 6;
pub const MAX_SIMILAR: usize = 10;
const YOUTUBE_EMBED: &str = "https://www.youtube.com/embed/";

fn is_youtube(video: &Video) -> bool {
    video.site.eq_ignore_ascii_case("YouTube")
}

/// First YouTube video in tier order: a promo of one of `promo_kinds` named "...trailer...",
/// then any such promo, then any YouTube video at all.
pub(crate) fn pick_video<'a>(videos: &'a [Video], promo_kinds: &[&str]) -> Option<&'a Video> {
    let is_promo = |v: &Video| is_youtube(v) && promo_kinds.contains(&v.video_type.as_str());

    videos
        .iter()
        .find(|&v| is_promo(v) && v.name.to_lowercase().contains("trailer"))
        .or_else(|| videos.iter().find(|&v| is_promo(v)))
        .or_else(|| videos.iter().find(|&v| is_youtube(v)))
}

pub fn select_trailer(videos: &[Video]) -> Option<&Video> {
    pick_video(videos, &["Trailer"])
}

pub fn find_director(crew: &[CrewMember]) -> Option<&CrewMember> {
    crew.iter().find(|c| c.job == "Director")
}

pub fn top_cast(cast: &[CastMember]) -> &[CastMember] {
    &cast[..cast.len().min(MAX_CAST)]
}

pub fn similar_titles<T>(similar: &[T]) -> &[T] {
    &similar[..similar.len().min(MAX_SIMILAR)]
}

pub fn trailer_embed_url(video: &Video) -> String {
    format!("{YOUTUBE_EMBED}{}?autoplay=0&rel=0", video.key)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastCard {
    pub id: u64,
    pub name: String,
    pub character: String,
    pub profile_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleCard {
    pub id: u64,
    pub media_type: &'static str,
    pub title: String,
    pub poster_url: Option<String>,
    pub rating: String,
    pub year: Option<String>,
}

impl TitleCard {
    pub fn from_title(title: &Title, image_base: &str) -> Self {
        let media_type = match title {
            Title::Movie(_) => "movie",
            Title::Tv(_) => "tv",
        };
        Self {
            id: title.id(),
            media_type,
            title: title.display_name().to_string(),
            poster_url: image_url(image_base, ImageSize::W300, title.poster_path()),
            rating: format_rating(title.vote_average()),
            year: release_year(Some(title.release_date())),
        }
    }
}

/// Everything a detail page renders, already formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub id: u64,
    pub media_type: &'static str,
    pub title: String,
    pub tagline: Option<String>,
    pub overview: String,
    pub status: String,
    pub poster_url: String,
    pub backdrop_url: Option<String>,
    pub release_date: String,
    pub runtime: String,
    pub rating: String,
    pub votes: String,
    pub genres: Vec<Genre>,
    pub director: Option<String>,
    pub original_language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasons: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episodes: Option<u32>,
    pub trailer_url: Option<String>,
    pub cast: Vec<CastCard>,
    pub similar: Vec<TitleCard>,
}

impl DetailView {
    pub fn from_movie(details: &MovieDetails, image_base: &str) -> Self {
        let movie = &details.movie;
        let videos = details.videos.as_ref().map(|v| v.results.as_slice());
        let similar: Vec<Title> = details
            .similar
            .as_ref()
            .map(|p| similar_titles(&p.results))
            .unwrap_or_default()
            .iter()
            .cloned()
            .map(Title::Movie)
            .collect();

        Self {
            id: movie.id,
            media_type: "movie",
            title: movie.title.clone(),
            tagline: non_empty(details.tagline.as_deref()),
            overview: movie.overview.clone(),
            status: non_empty(details.status.as_deref()).unwrap_or_else(|| "N/A".to_string()),
            poster_url: poster_or_placeholder(image_base, movie.poster_path.as_deref()),
            backdrop_url: image_url(image_base, ImageSize::Original, movie.backdrop_path.as_deref()),
            release_date: format_date(Some(&movie.release_date)),
            runtime: format_runtime(details.runtime.unwrap_or(0)),
            rating: format_rating(movie.vote_average),
            votes: group_thousands(movie.vote_count),
            genres: details.genres.clone(),
            director: director_name(details.credits.as_ref()),
            original_language: language_name(&movie.original_language),
            budget: Some(format_money(details.budget)),
            revenue: Some(format_money(details.revenue)),
            seasons: None,
            episodes: None,
            trailer_url: videos.and_then(select_trailer).map(trailer_embed_url),
            cast: cast_cards(details.credits.as_ref(), image_base),
            similar: similar
                .iter()
                .map(|t| TitleCard::from_title(t, image_base))
                .collect(),
        }
    }

    pub fn from_show(details: &ShowDetails, image_base: &str) -> Self {
        let show = &details.show;
        let videos = details.videos.as_ref().map(|v| v.results.as_slice());
        let similar: Vec<Title> = details
            .similar
            .as_ref()
            .map(|p| similar_titles(&p.results))
            .unwrap_or_default()
            .iter()
            .cloned()
            .map(Title::Tv)
            .collect();
        let runtime = details.episode_run_time.first().copied().unwrap_or(0);

        Self {
            id: show.id,
            media_type: "tv",
            title: show.name.clone(),
            tagline: non_empty(details.tagline.as_deref()),
            overview: show.overview.clone(),
            status: non_empty(details.status.as_deref()).unwrap_or_else(|| "N/A".to_string()),
            poster_url: poster_or_placeholder(image_base, show.poster_path.as_deref()),
            backdrop_url: image_url(image_base, ImageSize::Original, show.backdrop_path.as_deref()),
            release_date: format_date(Some(&show.first_air_date)),
            runtime: format_runtime(runtime),
            rating: format_rating(show.vote_average),
            votes: group_thousands(show.vote_count),
            genres: details.genres.clone(),
            director: director_name(details.credits.as_ref()),
            original_language: language_name(&show.original_language),
            budget: None,
            revenue: None,
            seasons: details.number_of_seasons,
            episodes: details.number_of_episodes,
            trailer_url: videos.and_then(select_trailer).map(trailer_embed_url),
            cast: cast_cards(details.credits.as_ref(), image_base),
            similar: similar
                .iter()
                .map(|t| TitleCard::from_title(t, image_base))
                .collect(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn director_name(credits: Option<&Credits>) -> Option<String> {
    credits
        .and_then(|c| find_director(&c.crew))
        .map(|d| d.name.clone())
}

fn cast_cards(credits: Option<&Credits>, image_base: &str) -> Vec<CastCard> {
    let Some(credits) = credits else {
        return Vec::new();
    };
    top_cast(&credits.cast)
        .iter()
        .map(|c| CastCard {
            id: c.id,
            name: c.name.clone(),
            character: c.character.clone(),
            profile_url: image_url(image_base, ImageSize::W300, c.profile_path.as_deref()),
        })
        .collect()
}
