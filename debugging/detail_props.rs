//! Fetch a TMDB movie or TV detail and print the assembled detail view.
//! Usage:
//!   cargo run --bin detail_props -- movie <tmdb_id>
//!   cargo run --bin detail_props -- tv <tmdb_id>
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use cinescope::config::TmdbConfig;
use cinescope::format::trailer_url;
use cinescope::tmdb::{Detail, TmdbApi, TmdbClient};
use cinescope::view::DetailView;
use dotenvy::dotenv;
use serde_json::json;
use std::env;
use std::str::FromStr;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq)]
enum MediaKind {
    Movie,
    Tv,
}

impl FromStr for MediaKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "movie" => Ok(MediaKind::Movie),
            "tv" => Ok(MediaKind::Tv),
            _ => Err(anyhow::anyhow!("media kind must be 'movie' or 'tv'")),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();

    let mut args = env::args().skip(1);
    let kind: MediaKind = args
        .next()
        .context("usage: detail_props <movie|tv> <tmdb_id>")?
        .parse()?;
    let id = args.next().context("missing <tmdb_id>")?;

    let config = TmdbConfig::from_env()?;
    let image_base = config.image_base_url.clone();
    let client = TmdbClient::new(config)?;
    let cancel = CancellationToken::new();

    let detail: Detail = match kind {
        MediaKind::Movie => client.movie_details(&id, &cancel).await?.into(),
        MediaKind::Tv => client.show_details(&id, &cancel).await?.into(),
    };
    let view = match &detail {
        Detail::Movie(m) => DetailView::from_movie(m, &image_base),
        Detail::Tv(s) => DetailView::from_show(s, &image_base),
    };

    let output = json!({
        "view": view,
        "watch_url": trailer_url(detail.videos()),
        "video_count": detail.videos().len(),
        "similar_count": detail.similar().len(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
