//! Display helpers shared by the detail views and the HTTP surface.

use chrono::NaiveDate;

use crate::tmdb::Video;
use crate::view::pick_video;

pub const NOT_AVAILABLE: &str = "N/A";
pub const POSTER_PLACEHOLDER: &str = "/placeholder.svg?height=750&width=500";
const YOUTUBE_WATCH: &str = "https://www.youtube.com/watch?v=";

/// TMDB image size tokens used by the views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    W300,
    W500,
    Original,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W300 => "w300",
            ImageSize::W500 => "w500",
            ImageSize::Original => "original",
        }
    }
}

pub fn image_url(base: &str, size: ImageSize, path: Option<&str>) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    Some(format!("{}/{}{}", base.trim_end_matches('/'), size.as_str(), path))
}

pub fn poster_or_placeholder(base: &str, path: Option<&str>) -> String {
    image_url(base, ImageSize::W500, path).unwrap_or_else(|| POSTER_PLACEHOLDER.to_string())
}

/// 125 -> "2h 5m", 60 -> "1h", 45 -> "45m", 0 -> "N/A".
pub fn format_runtime(minutes: u32) -> String {
    if minutes == 0 {
        return NOT_AVAILABLE.to_string();
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    match (hours, rest) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// Long en-US rendering, e.g. "January 5, 2024".
pub fn format_date(date: Option<&str>) -> String {
    parse_date(date)
        .map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn release_year(date: Option<&str>) -> Option<String> {
    parse_date(date).map(|d| d.format("%Y").to_string())
}

fn parse_date(date: Option<&str>) -> Option<NaiveDate> {
    let raw = date.map(str::trim).filter(|d| !d.is_empty())?;
    // Timestamps carry the calendar date in their first ten characters.
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

pub fn format_rating(vote_average: f64) -> String {
    format!("{:.1}", vote_average)
}

pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_money(amount: Option<u64>) -> String {
    match amount {
        Some(n) if n > 0 => format!("${}", group_thousands(n)),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Watch URL for the best YouTube trailer or teaser, falling back to any YouTube video.
pub fn trailer_url(videos: &[Video]) -> Option<String> {
    pick_video(videos, &["Trailer", "Teaser"]).map(|v| format!("{YOUTUBE_WATCH}{}", v.key))
}

pub fn language_name(code: &str) -> String {
    let name = match code {
        "en" => "English",
        "fr" => "French",
        "es" => "Spanish",
        "de" => "German",
        "it" => "Italian",
        "pt" => "Portuguese",
        "ru" => "Russian",
        "ja" => "Japanese",
        "ko" => "Korean",
        "zh" => "Chinese",
        "cn" => "Cantonese",
        "ar" => "Arabic",
        "hi" => "Hindi",
        "ta" => "Tamil",
        "te" => "Telugu",
        "sv" => "Swedish",
        "da" => "Danish",
        "no" => "Norwegian",
        "fi" => "Finnish",
        "nl" => "Dutch",
        "pl" => "Polish",
        "tr" => "Turkish",
        "cs" => "Czech",
        "el" => "Greek",
        "he" => "Hebrew",
        "id" => "Indonesian",
        "th" => "Thai",
        "vi" => "Vietnamese",
        "hu" => "Hungarian",
        "uk" => "Ukrainian",
        "fa" => "Persian",
        "" => return NOT_AVAILABLE.to_string(),
        _ => return code.to_string(),
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(site: &str, kind: &str, name: &str, key: &str) -> Video {
        Video {
            id: key.to_string(),
            key: key.to_string(),
            name: name.to_string(),
            site: site.to_string(),
            video_type: kind.to_string(),
        }
    }

    fn parse_runtime(s: &str) -> u32 {
        s.split(' ')
            .map(|part| {
                if let Some(h) = part.strip_suffix('h') {
                    h.parse::<u32>().unwrap() * 60
                } else {
                    part.strip_suffix('m').unwrap().parse::<u32>().unwrap()
                }
            })
            .sum()
    }

    #[test]
    fn runtime_examples() {
        assert_eq!(format_runtime(125), "2h 5m");
        assert_eq!(format_runtime(60), "1h");
        assert_eq!(format_runtime(45), "45m");
        assert_eq!(format_runtime(0), "N/A");
    }

    #[test]
    fn runtime_parses_back_to_its_input() {
        for m in 1..=1_500 {
            let rendered = format_runtime(m);
            assert_ne!(rendered, "N/A");
            assert_eq!(parse_runtime(&rendered), m, "round trip of {m} via {rendered}");
        }
    }

    #[test]
    fn dates_render_long_form() {
        assert_eq!(format_date(Some("2024-01-05")), "January 5, 2024");
        assert_eq!(format_date(Some("1999-10-15T00:00:00.000Z")), "October 15, 1999");
        assert_eq!(format_date(Some("")), "N/A");
        assert_eq!(format_date(None), "N/A");
        assert_eq!(format_date(Some("soon")), "N/A");
        assert_eq!(release_year(Some("2010-07-16")).as_deref(), Some("2010"));
        assert_eq!(release_year(Some("")), None);
    }

    #[test]
    fn images_degrade_to_placeholder() {
        let base = "https://image.tmdb.org/t/p";
        assert_eq!(
            image_url(base, ImageSize::W500, Some("/abc.jpg")).as_deref(),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg")
        );
        assert_eq!(image_url(base, ImageSize::Original, None), None);
        assert_eq!(
            image_url(base, ImageSize::W300, Some(" /face.jpg ")).as_deref(),
            Some("https://image.tmdb.org/t/p/w300/face.jpg")
        );
        assert_eq!(poster_or_placeholder(base, Some("")), POSTER_PLACEHOLDER);
    }

    #[test]
    fn numbers_are_grouped() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(63_000_000), "63,000,000");
        assert_eq!(format_money(Some(0)), "N/A");
        assert_eq!(format_money(None), "N/A");
        assert_eq!(format_money(Some(1_234_567)), "$1,234,567");
        assert_eq!(format_rating(7.26), "7.3");
        assert_eq!(format_rating(8.0), "8.0");
    }

    #[test]
    fn trailer_url_prefers_named_promos() {
        let videos = vec![
            video("YouTube", "Featurette", "Behind the scenes", "bts"),
            video("YouTube", "Teaser", "Teaser", "teaser"),
            video("YouTube", "Teaser", "Official Teaser Trailer", "named"),
        ];
        assert_eq!(
            trailer_url(&videos).as_deref(),
            Some("https://www.youtube.com/watch?v=named")
        );

        let unnamed = &videos[..2];
        assert_eq!(
            trailer_url(unnamed).as_deref(),
            Some("https://www.youtube.com/watch?v=teaser")
        );

        let only_extras = &videos[..1];
        assert_eq!(
            trailer_url(only_extras).as_deref(),
            Some("https://www.youtube.com/watch?v=bts")
        );

        let vimeo = vec![video("Vimeo", "Trailer", "Trailer", "v")];
        assert_eq!(trailer_url(&vimeo), None);
        assert_eq!(trailer_url(&[]), None);
    }

    #[test]
    fn language_codes_map_to_names() {
        assert_eq!(language_name("en"), "English");
        assert_eq!(language_name("ko"), "Korean");
        assert_eq!(language_name("xx"), "xx");
        assert_eq!(language_name(""), "N/A");
    }
}
