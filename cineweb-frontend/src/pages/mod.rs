mod login;
mod movie_search;
mod movies;
mod reviews;
mod rooms;
mod screenings;

#[derive(Debug, Clone, Copy, Default)]
pub enum Page {
    #[default]
    Reviews,
    Movies,
    Rooms,
    Screenings,
    MovieSearch,
}

impl Page {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Reviews => "/",
            Self::Movies => "/movies",
            Self::Rooms => "/rooms",
            Self::Screenings => "/screenings",
            Self::MovieSearch => "/movies/search",
        }
    }
}

pub use self::{login::*, movie_search::*, movies::*, reviews::*, rooms::*, screenings::*};
