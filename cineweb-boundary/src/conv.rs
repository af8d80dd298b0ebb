use super::*;

impl From<GeocodeResult> for Coordinate {
    fn from(from: GeocodeResult) -> Self {
        let GeocodeResult { lat, lng } = from;
        Self { lat, lng }
    }
}

impl From<Coordinate> for RoomCoordinates {
    fn from(from: Coordinate) -> Self {
        let Coordinate { lat, lng } = from;
        Self {
            lat: Some(lat),
            lng: Some(lng),
        }
    }
}

impl RoomCoordinates {
    /// Both values or nothing.
    #[must_use]
    pub fn to_coordinate(&self) -> Option<Coordinate> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinate { lat, lng }),
            _ => None,
        }
    }
}

impl Review {
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

impl Movie {
    /// The backend stores an empty string for movies without a poster.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

impl Room {
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.coordinates.to_coordinate()
    }
}

impl ScreeningRoom {
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.coordinates.to_coordinate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_room_coordinates() {
        let c = RoomCoordinates {
            lat: Some(1.0),
            lng: None,
        };
        assert!(c.to_coordinate().is_none());
        let c = RoomCoordinates::from(Coordinate { lat: 1.0, lng: 2.0 });
        let Coordinate { lat, lng } = c.to_coordinate().unwrap();
        assert_eq!((lat, lng), (1.0, 2.0));
    }

    #[test]
    fn blank_movie_image_is_none() {
        let mut movie = Movie {
            id: "m".to_string(),
            title: "Amélie".to_string(),
            image_url: Some(String::new()),
            created_at: None,
        };
        assert!(movie.image_url().is_none());
        movie.image_url = Some("https://res.cloudinary.com/x.png".to_string());
        assert_eq!(movie.image_url(), Some("https://res.cloudinary.com/x.png"));
    }
}
