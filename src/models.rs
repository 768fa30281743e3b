use std::collections::BTreeSet;

use jiff::civil::Date;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid release date {value:?}")]
    InvalidReleaseDate {
        value: String,
        #[source]
        source: jiff::Error,
    },
    #[error("vote average {0} outside 0-10")]
    VoteAverageOutOfRange(f64),
}

/// A movie as rendered by the app. Built only from [`MovieResource`].
#[derive(Clone, Debug, PartialEq)]
pub struct Movie {
    id: i32,
    title: String,
    overview: String,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    release_date: Option<Date>,
    vote_average: f64,
    vote_count: u32,
}

impl Movie {
    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn overview(&self) -> &str {
        &self.overview
    }

    pub fn poster_path(&self) -> Option<&str> {
        self.poster_path.as_deref()
    }

    pub fn backdrop_path(&self) -> Option<&str> {
        self.backdrop_path.as_deref()
    }

    pub fn release_date(&self) -> Option<Date> {
        self.release_date
    }

    pub fn vote_average(&self) -> f64 {
        self.vote_average
    }

    pub fn vote_count(&self) -> u32 {
        self.vote_count
    }
}

/// Movie shape shared by TMDB detail and list endpoints.
#[derive(Debug, Deserialize)]
pub struct MovieResource {
    pub id: i32,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
}

impl TryFrom<MovieResource> for Movie {
    type Error = ModelError;

    fn try_from(res: MovieResource) -> Result<Self, Self::Error> {
        let release_date = match res.release_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<Date>().map_err(|source| {
                ModelError::InvalidReleaseDate { value: raw.to_string(), source }
            })?),
        };
        if !(0.0..=10.0).contains(&res.vote_average) {
            return Err(ModelError::VoteAverageOutOfRange(res.vote_average));
        }

        Ok(Self {
            id: res.id,
            title: res.title,
            overview: res.overview.unwrap_or_default(),
            poster_path: res.poster_path.filter(|p| !p.is_empty()),
            backdrop_path: res.backdrop_path.filter(|p| !p.is_empty()),
            release_date,
            vote_average: res.vote_average,
            vote_count: res.vote_count,
        })
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Video {
    pub name: String,
    pub key: String,
    pub site: String,
}

impl Video {
    pub fn is_youtube(&self) -> bool {
        self.site.eq_ignore_ascii_case("youtube")
    }

    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}", self.key)
    }
}

/// Everything the home page renders.
#[derive(Clone, Debug)]
pub struct Home {
    pub top_rated: Option<Movie>,
    pub trailer: Option<Video>,
    pub genres: Vec<Genre>,
    pub selected: BTreeSet<i32>,
    pub movies: Vec<Movie>,
    pub image_base_url: Option<String>,
}

/// Genre filter form; checkboxes submit `genres` once per checked box.
#[derive(Debug, Default, Deserialize)]
pub struct GenreFilter {
    #[serde(default)]
    pub genres: Vec<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}
