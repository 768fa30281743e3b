use std::{collections::BTreeSet, sync::Arc};

use axum::{
    extract::{Path, State, rejection::PathRejection},
    response::Html,
};
use axum_extra::extract::{Query, QueryRejection};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{GenreFilter, Home, SearchQuery},
    templates,
};

/// Home page. A malformed genre filter falls back to the unfiltered list.
pub async fn index(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<GenreFilter>, QueryRejection>,
) -> Html<String> {
    let filter = match filter {
        Ok(Query(filter)) => filter,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "ignoring invalid genre filter");
            GenreFilter::default()
        }
    };
    let selected: BTreeSet<i32> = filter.genres.into_iter().collect();

    let (top_rated, genres, movies, image_base_url) = futures::join!(
        state.movies.get_top_rated_movie(),
        state.genres.get_genres(),
        state.movies.get_movies_by_genre(&selected),
        state.images.get_image_base_url(),
    );

    let trailer = match &top_rated {
        Some(movie) => state.movies.get_movie_videos(movie.id()).await.into_iter().next(),
        None => None,
    };

    Html(templates::index_page(&Home {
        top_rated,
        trailer,
        genres,
        selected,
        movies,
        image_base_url,
    }))
}

/// Modal fragment for one movie; 404 when TMDB has nothing for `id`.
pub async fn movie(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Html<String>> {
    let Ok(Path(id)) = id else {
        return Err(AppError::NotFound("movie".to_string()));
    };
    let movie = state
        .movies
        .get_movie(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("movie {id}")))?;

    let (videos, image_base_url) = futures::join!(
        state.movies.get_movie_videos(id),
        state.images.get_image_base_url(),
    );

    Ok(Html(templates::movie_modal(&movie, &videos, image_base_url.as_deref())))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchQuery>,
) -> Html<String> {
    let movies = state.movies.search(&q.q).await;
    Html(templates::search_list(&movies))
}

pub async fn not_found() -> AppError {
    AppError::NotFound("page".to_string())
}
