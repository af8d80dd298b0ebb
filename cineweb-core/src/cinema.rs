//! Movies, rooms and screenings.
//!
//! Screenings reference rooms by name and movies by title.
//! Names are not unique, so lookups return every match.

use std::collections::BTreeMap;

use time::PrimitiveDateTime;

use crate::{
    boundary::{Coordinate, Movie, MovieSearchResponse, Room, Screening, ScreeningWithRoom},
    datetime::{format_timestamp, parse_timestamp},
    render::{Card, Renderable},
    Failure, LoadEffect,
};

pub const NO_MOVIES: &str = "There are no movies yet.";
pub const NO_ROOMS: &str = "There are no rooms yet.";
pub const NO_SCREENINGS: &str = "There are no screenings yet.";
pub const MOVIE_NOT_FOUND: &str = "Movie not found";

fn position_line(c: Coordinate) -> String {
    format!("🌍 {}", crate::reviews::format_position(c))
}

impl Renderable for Movie {
    fn position(&self) -> Option<Coordinate> {
        None
    }

    fn card(&self) -> Card {
        Card {
            id: self.id.clone(),
            title: self.title.clone(),
            lines: self
                .created_at
                .as_deref()
                .map(|ts| format!("Added {}", format_timestamp(ts)))
                .into_iter()
                .collect(),
            rating: None,
            image_url: self.image_url().map(ToString::to_string),
        }
    }
}

impl Renderable for Room {
    fn position(&self) -> Option<Coordinate> {
        self.coordinate()
    }

    fn card(&self) -> Card {
        let mut lines = vec![format!("📍 {}", self.address)];
        lines.extend(self.coordinate().map(position_line));
        if !self.owner_email.is_empty() {
            lines.push(format!("✉️ {}", self.owner_email));
        }
        Card {
            id: self.id.clone(),
            title: self.name.clone(),
            lines,
            rating: None,
            image_url: None,
        }
    }
}

impl Renderable for Screening {
    fn position(&self) -> Option<Coordinate> {
        None
    }

    fn card(&self) -> Card {
        Card {
            id: self.id.clone(),
            title: self.movie_title.clone(),
            lines: vec![
                format!("🏛️ {}", self.room_name),
                format!("🕒 {}", format_timestamp(&self.starts_at)),
            ],
            rating: None,
            image_url: None,
        }
    }
}

/// A room shows the same movie several times,
/// so a screening of a search result is keyed by room and date.
impl Renderable for ScreeningWithRoom {
    fn position(&self) -> Option<Coordinate> {
        self.room.coordinate()
    }

    fn card(&self) -> Card {
        let mut lines = vec![
            format!("🕒 {}", format_timestamp(&self.starts_at)),
            format!("📍 {}", self.room.address),
        ];
        lines.extend(self.room.coordinate().map(position_line));
        Card {
            id: format!("{}@{}", self.room.name, self.starts_at),
            title: self.room.name.clone(),
            lines,
            rating: None,
            image_url: None,
        }
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

pub fn find_rooms_by_name<'a>(rooms: &'a [Room], name: &'a str) -> impl Iterator<Item = &'a Room> {
    rooms.iter().filter(move |r| same_name(&r.name, name))
}

pub fn find_movies_by_title<'a>(
    movies: &'a [Movie],
    title: &'a str,
) -> impl Iterator<Item = &'a Movie> {
    movies.iter().filter(move |m| same_name(&m.title, title))
}

/// Unparsable dates are sorted last.
fn date_key(s: &str) -> (bool, Option<PrimitiveDateTime>) {
    let dt = parse_timestamp(s);
    (dt.is_none(), dt)
}

pub fn sort_by_date(screenings: &mut [Screening]) {
    screenings.sort_by_cached_key(|s| date_key(&s.starts_at));
}

/// Screenings per room name, each group sorted by date.
#[must_use]
pub fn group_by_room(screenings: &[Screening]) -> BTreeMap<String, Vec<&Screening>> {
    let mut groups: BTreeMap<String, Vec<&Screening>> = BTreeMap::new();
    for s in screenings {
        groups.entry(s.room_name.clone()).or_default().push(s);
    }
    for group in groups.values_mut() {
        group.sort_by_cached_key(|s| date_key(&s.starts_at));
    }
    groups
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult {
    None,
    Searching,
    Found(MovieSearchResponse),
    NotFound,
}

/// Search of a movie and the places where it is screened.
#[derive(Debug, Clone)]
pub struct MovieSearch {
    generation: u64,
    result: SearchResult,
}

impl Default for MovieSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl MovieSearch {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            generation: 0,
            result: SearchResult::None,
        }
    }

    /// Returns the generation and the trimmed title to search for.
    pub fn begin(&mut self, title: &str) -> Option<(u64, String)> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        self.generation += 1;
        self.result = SearchResult::Searching;
        Some((self.generation, title.to_string()))
    }

    pub fn finish(
        &mut self,
        generation: u64,
        result: Result<MovieSearchResponse, Failure>,
    ) -> LoadEffect {
        if generation != self.generation {
            return LoadEffect::Stale;
        }
        match result {
            Ok(mut found) => {
                found
                    .screenings
                    .sort_by_cached_key(|s| date_key(&s.starts_at));
                self.result = SearchResult::Found(found);
                LoadEffect::Applied
            }
            Err(Failure::Backend { status: 404, .. }) => {
                self.result = SearchResult::NotFound;
                LoadEffect::Applied
            }
            Err(Failure::Unauthorized) => {
                self.result = SearchResult::None;
                LoadEffect::Logout
            }
            Err(err) => {
                log::warn!("Unable to search movie: {err}");
                self.result = SearchResult::None;
                LoadEffect::Notify(err.user_message("Unable to search the movie"))
            }
        }
    }

    #[must_use]
    pub const fn result(&self) -> &SearchResult {
        &self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        boundary::{RoomCoordinates, ScreeningRoom},
        render::{render, ListView, Viewport},
        Settings,
    };

    fn room(name: &str, coords: Option<(f64, f64)>) -> Room {
        Room {
            id: name.to_lowercase(),
            name: name.into(),
            owner_email: "owner@example.com".into(),
            address: "Gran Via 1".into(),
            coordinates: coords.map_or_else(RoomCoordinates::default, |(lat, lng)| {
                Coordinate { lat, lng }.into()
            }),
            created_at: None,
        }
    }

    fn screening(id: &str, room: &str, starts_at: &str) -> Screening {
        Screening {
            id: id.into(),
            room_name: room.into(),
            movie_title: "Solaris".into(),
            starts_at: starts_at.into(),
            created_at: None,
        }
    }

    fn movie(title: &str) -> Movie {
        Movie {
            id: title.to_lowercase(),
            title: title.into(),
            image_url: Some(String::new()),
            created_at: None,
        }
    }

    #[test]
    fn only_located_rooms_get_markers() {
        let rooms = [
            room("Sala 1", Some((40.42, -3.70))),
            room("Sala 2", None),
            room("Sala 3", Some((41.38, 2.17))),
        ];
        let frame = render(&rooms, NO_ROOMS, &Settings::default().map);
        assert_eq!(frame.markers.len(), 2);
        assert!(matches!(frame.viewport, Viewport::FitBounds(_)));
        assert_eq!(rooms[1].card().lines.len(), 2);
    }

    #[test]
    fn movie_card_without_poster() {
        let card = movie("Solaris").card();
        assert!(card.image_url.is_none());
        assert!(card.lines.is_empty());
    }

    #[test]
    fn lookup_returns_all_matches() {
        let rooms = [room("Sala 1", None), room("sala 1 ", None), room("Sala 2", None)];
        assert_eq!(find_rooms_by_name(&rooms, "SALA 1").count(), 2);
        let movies = [movie("Solaris"), movie("Stalker")];
        assert_eq!(find_movies_by_title(&movies, "stalker").count(), 1);
        assert_eq!(find_movies_by_title(&movies, "Ran").count(), 0);
    }

    #[test]
    fn sort_and_group_screenings() {
        let mut screenings = vec![
            screening("c", "Sala 2", "2024-05-03T18:00:00"),
            screening("x", "Sala 1", "someday"),
            screening("a", "Sala 1", "2024-05-01T20:30:00"),
            screening("b", "Sala 1", "2024-05-02T20:30:00.000Z"),
        ];
        let groups = group_by_room(&screenings);
        let ids: Vec<_> = groups["Sala 1"].iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "x"]);
        assert_eq!(groups["Sala 2"].len(), 1);
        sort_by_date(&mut screenings);
        let ids: Vec<_> = screenings.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c", "x"]);
    }

    fn search_response() -> MovieSearchResponse {
        let sala = |name: &str, starts_at: &str| ScreeningWithRoom {
            starts_at: starts_at.into(),
            room: ScreeningRoom {
                name: name.into(),
                address: "Gran Via 1".into(),
                owner_email: String::new(),
                coordinates: Coordinate { lat: 40.42, lng: -3.70 }.into(),
            },
        };
        MovieSearchResponse {
            movie: movie("Solaris"),
            screenings: vec![
                sala("Sala 2", "2024-05-02T20:30:00"),
                sala("Sala 1", "2024-05-01T20:30:00"),
            ],
        }
    }

    #[test]
    fn search_movie() {
        let mut search = MovieSearch::new();
        assert!(search.begin("  ").is_none());
        let (generation, title) = search.begin(" Solaris ").unwrap();
        assert_eq!(title, "Solaris");
        assert_eq!(search.result(), &SearchResult::Searching);
        assert_eq!(search.finish(generation, Ok(search_response())), LoadEffect::Applied);
        let SearchResult::Found(found) = search.result() else {
            panic!("expected result");
        };
        assert_eq!(found.screenings[0].room.name, "Sala 1");
        let frame = render(&found.screenings, NO_SCREENINGS, &Settings::default().map);
        assert_eq!(frame.markers.len(), 2);
    }

    #[test]
    fn screenings_in_the_same_room_are_distinct_cards() {
        let mut screenings = search_response().screenings;
        for (s, starts_at) in screenings
            .iter_mut()
            .zip(["2024-05-01T18:00:00", "2024-05-01T21:00:00"])
        {
            s.room.name = "Sala 1".into();
            s.starts_at = starts_at.into();
        }
        let frame = render(&screenings, NO_SCREENINGS, &Settings::default().map);
        let ListView::Cards(cards) = frame.list else {
            panic!("expected cards");
        };
        assert_eq!(cards.len(), 2);
        assert_ne!(cards[0].id, cards[1].id);
        assert_ne!(frame.markers[0].id, frame.markers[1].id);
    }

    #[test]
    fn search_unknown_movie() {
        let mut search = MovieSearch::new();
        let (generation, _) = search.begin("Ran").unwrap();
        let effect = search.finish(
            generation,
            Err(Failure::from_status(404, Some("Película no encontrada".into()))),
        );
        assert_eq!(effect, LoadEffect::Applied);
        assert_eq!(search.result(), &SearchResult::NotFound);
    }

    #[test]
    fn drop_outdated_search() {
        let mut search = MovieSearch::new();
        let (first, _) = search.begin("Solaris").unwrap();
        let (second, _) = search.begin("Stalker").unwrap();
        assert_eq!(search.finish(first, Ok(search_response())), LoadEffect::Stale);
        assert_eq!(
            search.finish(second, Err(Failure::Transport("offline".into()))),
            LoadEffect::Notify("Unable to search the movie".into())
        );
        assert_eq!(search.result(), &SearchResult::None);
    }
}
