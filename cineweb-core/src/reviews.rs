use crate::{
    boundary::{Coordinate, Review},
    datetime::format_timestamp,
    rating::Rating,
    render::{Card, Renderable},
};

pub const EMPTY_MESSAGE: &str = "There are no reviews yet.";
pub const LOAD_ERROR: &str = "Unable to load the reviews";

#[must_use]
pub fn format_position(c: Coordinate) -> String {
    format!("{:.6}, {:.6}", c.lng, c.lat)
}

fn rating_line(rating: Rating) -> String {
    format!("{} ({rating})", rating.stars())
}

impl Renderable for Review {
    fn position(&self) -> Option<Coordinate> {
        Some(self.coordinate()).filter(|c| crate::bbox::is_valid_coordinate(*c))
    }

    fn card(&self) -> Card {
        Card {
            id: self.id.clone(),
            title: self.name.clone(),
            lines: vec![
                format!("📍 {}", self.address),
                format!("🌍 {}", format_position(self.coordinate())),
            ],
            rating: Some(rating_line(Rating::clamped(self.rating))),
            image_url: self.image_urls.first().cloned(),
        }
    }
}

/// Everything the details overlay of a review shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDetail {
    pub id: String,
    pub name: String,
    pub address: String,
    pub position: String,
    pub rating: String,
    pub image_urls: Vec<String>,
    pub author: Option<String>,
    pub created_at: Option<String>,
    pub token: Option<String>,
    pub token_issued_at: Option<String>,
    pub token_expires_at: Option<String>,
}

impl From<Review> for ReviewDetail {
    fn from(from: Review) -> Self {
        let position = format_position(from.coordinate());
        let Review {
            id,
            name,
            address,
            rating,
            image_urls,
            author_email,
            author_name,
            token,
            token_issued_at,
            token_expires_at,
            created_at,
            ..
        } = from;
        let author = match (author_name, author_email) {
            (Some(name), Some(email)) if !name.is_empty() => Some(format!("{name} ({email})")),
            (Some(name), _) if !name.is_empty() => Some(name),
            (_, email) => email,
        };
        let ts = |s: Option<String>| s.as_deref().map(format_timestamp);
        Self {
            id,
            name,
            address,
            position,
            rating: rating_line(Rating::clamped(rating)),
            image_urls,
            author,
            created_at: ts(created_at),
            token,
            token_issued_at: ts(token_issued_at),
            token_expires_at: ts(token_expires_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        render::{render, ListView, Viewport},
        Settings,
    };

    fn review(id: &str, lat: f64, lng: f64, rating: u8) -> Review {
        Review {
            id: id.into(),
            name: format!("Place {id}"),
            address: "Calle Mayor 1".into(),
            lat,
            lng,
            rating,
            image_urls: vec![],
            author_email: None,
            author_name: None,
            token: None,
            token_issued_at: None,
            token_expires_at: None,
            created_at: None,
        }
    }

    #[test]
    fn single_review_renders_card_and_centered_marker() {
        let frame = render(
            &[review("a", 40.0, -3.0, 5)],
            EMPTY_MESSAGE,
            &Settings::default().map,
        );
        let ListView::Cards(cards) = &frame.list else {
            panic!("expected cards");
        };
        assert_eq!(cards.len(), 1);
        assert!(cards[0].rating.as_ref().unwrap().starts_with("⭐⭐⭐⭐⭐ "));
        assert_eq!(frame.markers.len(), 1);
        assert_eq!(frame.markers[0].position, Coordinate { lat: 40.0, lng: -3.0 });
        assert_eq!(
            frame.viewport,
            Viewport::Center {
                center: Coordinate { lat: 40.0, lng: -3.0 },
                zoom: 13.0
            }
        );
    }

    #[test]
    fn card_lines() {
        let card = review("a", 40.4125, -3.7089, 3).card();
        assert_eq!(card.title, "Place a");
        assert_eq!(card.lines[0], "📍 Calle Mayor 1");
        assert_eq!(card.lines[1], "🌍 -3.708900, 40.412500");
        assert_eq!(card.rating.as_deref(), Some("⭐⭐⭐☆☆ (3/5)"));
        assert!(card.image_url.is_none());
    }

    #[test]
    fn empty_reviews() {
        let frame = render::<Review>(&[], EMPTY_MESSAGE, &Settings::default().map);
        assert_eq!(frame.list, ListView::Empty(EMPTY_MESSAGE.into()));
    }

    #[test]
    fn review_details() {
        let mut r = review("a", 40.0, -3.0, 4);
        r.author_name = Some("Ana".into());
        r.author_email = Some("ana@example.com".into());
        r.created_at = Some("2024-05-01T20:30:00.000Z".into());
        r.token_expires_at = Some("2024-05-01T21:30:00".into());
        let d = ReviewDetail::from(r);
        assert_eq!(d.author.as_deref(), Some("Ana (ana@example.com)"));
        assert_eq!(d.created_at.as_deref(), Some("01/05/2024 20:30"));
        assert_eq!(d.token_expires_at.as_deref(), Some("01/05/2024 21:30"));
        assert!(d.token_issued_at.is_none());
        assert_eq!(d.rating, "⭐⭐⭐⭐☆ (4/5)");
    }
}
