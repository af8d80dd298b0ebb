use std::{fmt, str::FromStr};

use thiserror::Error;

const STAR: &str = "⭐";
const EMPTY_STAR: &str = "☆";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatingError {
    #[error("The rating must be a number")]
    NotANumber,
    #[error("The rating must be between 1 and 5 stars")]
    OutOfRange,
}

impl Rating {
    pub const fn min() -> Self {
        Self(1)
    }

    pub const fn max() -> Self {
        Self(5)
    }

    /// Ratings received from the backend are displayed
    /// even if they are out of range.
    #[must_use]
    pub fn clamped(value: u8) -> Self {
        Self(value.clamp(Self::min().0, Self::max().0))
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// E.g. `⭐⭐⭐⭐⭐` for the maximum rating.
    #[must_use]
    pub fn stars(self) -> String {
        let filled = usize::from(self.0);
        let empty = usize::from(Self::max().0 - self.0);
        format!("{}{}", STAR.repeat(filled), EMPTY_STAR.repeat(empty))
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::min().0..=Self::max().0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingError::OutOfRange)
        }
    }
}

impl FromStr for Rating {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u8>()
            .map_err(|_| RatingError::NotANumber)?;
        Self::try_from(value)
    }
}

impl From<Rating> for u8 {
    fn from(from: Rating) -> Self {
        from.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::max().0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_stars() {
        assert_eq!(Rating::max().stars(), "⭐⭐⭐⭐⭐");
        assert_eq!(Rating::try_from(3).unwrap().stars(), "⭐⭐⭐☆☆");
        assert_eq!(Rating::min().stars(), "⭐☆☆☆☆");
    }

    #[test]
    fn parse_form_value() {
        assert_eq!("4".parse::<Rating>(), Ok(Rating(4)));
        assert_eq!(" 5 ".parse::<Rating>(), Ok(Rating(5)));
        assert_eq!("0".parse::<Rating>(), Err(RatingError::OutOfRange));
        assert_eq!("6".parse::<Rating>(), Err(RatingError::OutOfRange));
        assert_eq!("".parse::<Rating>(), Err(RatingError::NotANumber));
        assert_eq!("x".parse::<Rating>(), Err(RatingError::NotANumber));
    }

    #[test]
    fn clamp_backend_values() {
        assert_eq!(Rating::clamped(0), Rating::min());
        assert_eq!(Rating::clamped(9), Rating::max());
        assert_eq!(Rating::clamped(2).to_string(), "2/5");
    }
}
