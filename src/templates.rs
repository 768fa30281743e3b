use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::models::{Home, Movie, Video};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

// Opens movie modals (fetched once, then reused) and drives the debounced
// live search.
const SCRIPT: &str = r#"
document.addEventListener('click', (event) => {
  const button = event.target.closest('.js-movie-card-action');
  if (!button) return;
  event.preventDefault();
  const modalId = 'movieModal-' + button.dataset.movieId;
  const existing = document.getElementById(modalId);
  if (existing) { existing.showModal(); return; }
  fetch('/movies/' + button.dataset.movieId)
    .then((response) => response.text())
    .then((html) => {
      document.querySelector('.js-modal-container').insertAdjacentHTML('beforeend', html);
      const modal = document.getElementById(modalId);
      if (modal) modal.showModal();
    })
    .catch((error) => console.log(error));
});

const searchInput = document.querySelector('.js-autocomplete-search-input');
const searchList = document.querySelector('.js-autocomplete-search-list');
let searchTimeout;
searchInput.addEventListener('input', (event) => {
  clearTimeout(searchTimeout);
  searchTimeout = setTimeout(() => {
    const q = event.target.value;
    if (q === '') { searchList.innerHTML = ''; return; }
    fetch('/search?' + new URLSearchParams({ q }))
      .then((response) => response.text())
      .then((html) => { searchList.innerHTML = html; })
      .catch((error) => console.log(error));
  }, 200);
});
searchInput.addEventListener('focusout', () => {
  setTimeout(() => { searchList.innerHTML = ''; }, 200);
});
"#;

pub fn index_page(home: &Home) -> String {
    let image_base_url = home.image_base_url.as_deref();

    page(
        "We Movies",
        html! {
            div class="min-h-screen bg-gray-50" {
                header class="bg-white shadow" {
                    div class="max-w-6xl mx-auto px-6 py-4 flex items-center justify-between gap-6" {
                        a class="text-2xl font-bold text-gray-900" href="/" { "We Movies" }
                        div class="relative w-full max-w-md" {
                            input class="js-autocomplete-search-input w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500" type="search" placeholder="Search a movie" autocomplete="off";
                            div class="js-autocomplete-search-list absolute z-10 mt-1 w-full" {}
                        }
                    }
                }

                @if let Some(movie) = &home.top_rated {
                    (hero(movie, home.trailer.as_ref(), image_base_url))
                }

                div class="max-w-6xl mx-auto px-6 py-10 grid gap-8 md:grid-cols-4" {
                    aside class="md:col-span-1" {
                        form class="bg-white shadow rounded-lg p-6 space-y-2" method="get" action="/" {
                            h2 class="text-lg font-semibold text-gray-900" { "Genres" }
                            @for genre in &home.genres {
                                label class="flex items-center gap-2 text-sm text-gray-700" {
                                    input type="checkbox" name="genres" value=(genre.id) checked[home.selected.contains(&genre.id)];
                                    (genre.name)
                                }
                            }
                            button class="mt-4 w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Filter" }
                        }
                    }

                    main class="md:col-span-3 space-y-4" {
                        @if home.movies.is_empty() {
                            div class="bg-white shadow rounded-lg p-8" {
                                p class="text-gray-600" { "No movies found." }
                            }
                        } @else {
                            @for movie in &home.movies {
                                (movie_card(movie, image_base_url))
                            }
                        }
                    }
                }
            }
            div class="js-modal-container" {}
            script { (PreEscaped(SCRIPT)) }
        },
    )
}

pub fn movie_modal(movie: &Movie, videos: &[Video], image_base_url: Option<&str>) -> String {
    html! {
        dialog id=(format!("movieModal-{}", movie.id())) class="max-w-3xl w-full rounded-lg p-0 shadow-xl backdrop:bg-black/60" {
            div class="p-6" {
                div class="flex items-start justify-between gap-4" {
                    h2 class="text-2xl font-bold text-gray-900" { (movie.title()) }
                    form method="dialog" {
                        button class="text-gray-500 hover:text-gray-800" type="submit" aria-label="Close" { "✕" }
                    }
                }
                @if let Some(video) = videos.first() {
                    div class="mt-4 aspect-video" {
                        iframe class="w-full h-full rounded" src=(video.embed_url()) title=(video.name) allowfullscreen {}
                    }
                } @else if let Some(src) = image_url(image_base_url, movie.backdrop_path()) {
                    img class="mt-4 w-full rounded" src=(src) alt=(movie.title());
                }
                p class="mt-4 text-sm text-gray-500" { (details_line(movie)) }
                p class="mt-4 text-gray-700" { (movie.overview()) }
            }
        }
    }
    .into_string()
}

pub fn search_list(movies: &[Movie]) -> String {
    html! {
        @if !movies.is_empty() {
            ul class="bg-white shadow rounded-md divide-y divide-gray-100" {
                @for movie in movies {
                    li {
                        button class="js-movie-card-action w-full px-3 py-2 text-left text-sm hover:bg-gray-50" type="button" data-movie-id=(movie.id()) {
                            (movie.title())
                            @if let Some(date) = movie.release_date() {
                                span class="ml-2 text-gray-500" { "(" (date.year()) ")" }
                            }
                        }
                    }
                }
            }
        }
    }
    .into_string()
}

pub fn error_fragment(message: &str) -> String {
    html! {
        div class="max-w-2xl mx-auto px-6 py-12" {
            div class="bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900" { "Error" }
                p class="mt-4 text-gray-700" { (message) }
                a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
            }
        }
    }
    .into_string()
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

fn hero(movie: &Movie, trailer: Option<&Video>, image_base_url: Option<&str>) -> Markup {
    html! {
        section class="bg-gray-900 text-white" {
            div class="max-w-6xl mx-auto px-6 py-10 grid gap-8 md:grid-cols-2 items-center" {
                @if let Some(video) = trailer {
                    div class="aspect-video" {
                        iframe class="w-full h-full rounded" src=(video.embed_url()) title=(video.name) allowfullscreen {}
                    }
                } @else if let Some(src) = image_url(image_base_url, movie.backdrop_path()) {
                    img class="w-full rounded" src=(src) alt=(movie.title());
                }
                div {
                    p class="text-sm uppercase tracking-wide text-gray-400" { "Top rated" }
                    h1 class="mt-2 text-3xl font-bold" { (movie.title()) }
                    p class="mt-2 text-sm text-gray-400" { (details_line(movie)) }
                    p class="mt-4 text-gray-200" { (movie.overview()) }
                    button class="js-movie-card-action mt-6 rounded-md bg-blue-600 px-4 py-2 font-semibold hover:bg-blue-700" type="button" data-movie-id=(movie.id()) { "Details" }
                }
            }
        }
    }
}

fn movie_card(movie: &Movie, image_base_url: Option<&str>) -> Markup {
    html! {
        div class="bg-white shadow rounded-lg p-4 flex gap-4" {
            @if let Some(src) = image_url(image_base_url, movie.poster_path()) {
                img class="w-24 rounded" src=(src) alt=(movie.title()) loading="lazy";
            }
            div class="flex-1" {
                h2 class="text-xl font-semibold text-gray-900" { (movie.title()) }
                p class="mt-1 text-sm text-gray-500" { (details_line(movie)) }
                p class="mt-2 text-sm text-gray-700 line-clamp-3" { (movie.overview()) }
                button class="js-movie-card-action mt-3 text-sm text-blue-600 hover:text-blue-800" type="button" data-movie-id=(movie.id()) { "Details" }
            }
        }
    }
}

fn details_line(movie: &Movie) -> String {
    let votes = format!("{:.1}/10 · {} votes", movie.vote_average(), movie.vote_count());
    match movie.release_date() {
        Some(date) => format!("{} · {votes}", date.strftime("%Y-%m-%d")),
        None => votes,
    }
}

fn image_url(base: Option<&str>, path: Option<&str>) -> Option<String> {
    Some(format!("{}{}", base?, path?))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::models::{Genre, MovieResource};

    fn movie(id: i32, title: &str) -> Movie {
        Movie::try_from(MovieResource {
            id,
            title: title.to_string(),
            overview: Some("Overview".to_string()),
            poster_path: Some("/poster.jpg".to_string()),
            backdrop_path: Some("/backdrop.jpg".to_string()),
            release_date: Some("1994-09-23".to_string()),
            vote_average: 8.714,
            vote_count: 22179,
        })
        .unwrap()
    }

    fn trailer() -> Video {
        Video {
            name: "Bande Annonce".to_string(),
            key: "dSL2Ec_0fUs".to_string(),
            site: "YouTube".to_string(),
        }
    }

    #[test]
    fn search_list_links_each_movie() {
        let html = search_list(&[movie(1, "Les Évadés"), movie(238, "Le Parrain")]);
        assert!(html.contains(r#"data-movie-id="1""#));
        assert!(html.contains(r#"data-movie-id="238""#));
        assert!(html.contains("(1994)"));
    }

    #[test]
    fn empty_search_list_renders_nothing() {
        assert_eq!(search_list(&[]), "");
    }

    #[test]
    fn modal_embeds_first_trailer() {
        let html = movie_modal(&movie(1, "Les Évadés"), &[trailer()], None);
        assert!(html.contains(r#"id="movieModal-1""#));
        assert!(html.contains("https://www.youtube.com/embed/dSL2Ec_0fUs"));
        assert!(html.contains("8.7/10 · 22179 votes"));
    }

    #[test]
    fn modal_without_trailer_shows_backdrop() {
        let html =
            movie_modal(&movie(1, "Les Évadés"), &[], Some("https://image.tmdb.org/t/p/original"));
        assert!(html.contains("https://image.tmdb.org/t/p/original/backdrop.jpg"));
    }

    #[test]
    fn images_need_a_base_url() {
        assert_eq!(image_url(None, Some("/p.jpg")), None);
        assert_eq!(image_url(Some("https://cdn/original"), None), None);
    }

    #[test]
    fn index_checks_selected_genres() {
        let home = Home {
            top_rated: Some(movie(1, "Les Évadés")),
            trailer: Some(trailer()),
            genres: vec![
                Genre { id: 28, name: "Action".to_string() },
                Genre { id: 12, name: "Aventure".to_string() },
            ],
            selected: BTreeSet::from([28]),
            movies: vec![movie(238, "Le Parrain")],
            image_base_url: Some("https://image.tmdb.org/t/p/original".to_string()),
        };

        let html = index_page(&home);

        assert!(html.contains(r#"value="28" checked"#));
        assert!(!html.contains(r#"value="12" checked"#));
        assert!(html.contains("https://image.tmdb.org/t/p/original/poster.jpg"));
        assert!(html.contains("Le Parrain"));
    }
}
