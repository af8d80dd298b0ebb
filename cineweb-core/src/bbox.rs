use crate::boundary::Coordinate;

const LAT_MIN: f64 = -90.0;
const LAT_MAX: f64 = 90.0;
const LNG_MIN: f64 = -180.0;
const LNG_MAX: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBbox {
    pub sw: Coordinate,
    pub ne: Coordinate,
}

impl MapBbox {
    /// The smallest box that contains all points.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let bbox = points.fold(
            Self {
                sw: first,
                ne: first,
            },
            |bbox, p| Self {
                sw: Coordinate {
                    lat: bbox.sw.lat.min(p.lat),
                    lng: bbox.sw.lng.min(p.lng),
                },
                ne: Coordinate {
                    lat: bbox.ne.lat.max(p.lat),
                    lng: bbox.ne.lng.max(p.lng),
                },
            },
        );
        Some(bbox)
    }

    /// Extend the box on every side by the given ratio
    /// of its height and width.
    #[must_use]
    pub fn pad(&self, ratio: f64) -> Self {
        let lat_ext = (self.ne.lat - self.sw.lat).abs() * ratio;
        let lng_ext = (self.ne.lng - self.sw.lng).abs() * ratio;
        Self {
            sw: Coordinate {
                lat: LAT_MIN.max(self.sw.lat - lat_ext),
                lng: LNG_MIN.max(self.sw.lng - lng_ext),
            },
            ne: Coordinate {
                lat: LAT_MAX.min(self.ne.lat + lat_ext),
                lng: LNG_MAX.min(self.ne.lng + lng_ext),
            },
        }
    }

    #[must_use]
    pub fn center(&self) -> Coordinate {
        Coordinate {
            lat: (self.sw.lat + self.ne.lat) / 2.0,
            lng: (self.sw.lng + self.ne.lng) / 2.0,
        }
    }

    #[must_use]
    pub fn contains_point(&self, p: Coordinate) -> bool {
        p.lat >= self.sw.lat && p.lat <= self.ne.lat && p.lng >= self.sw.lng && p.lng <= self.ne.lng
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        is_valid_coordinate(self.sw) && is_valid_coordinate(self.ne) && self.sw.lat <= self.ne.lat
    }
}

#[must_use]
pub fn is_valid_coordinate(c: Coordinate) -> bool {
    c.lat.is_finite()
        && c.lng.is_finite()
        && (LAT_MIN..=LAT_MAX).contains(&c.lat)
        && (LNG_MIN..=LNG_MAX).contains(&c.lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn pt(lat: f64, lng: f64) -> Coordinate {
        Coordinate { lat, lng }
    }

    #[test]
    fn bbox_of_points() {
        let bbox = MapBbox::from_points([pt(40.0, -3.0), pt(41.0, 2.0), pt(39.5, -0.4)]).unwrap();
        assert_eq!(bbox.sw, pt(39.5, -3.0));
        assert_eq!(bbox.ne, pt(41.0, 2.0));
        assert!(bbox.is_valid());
        assert!(MapBbox::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn pad_bbox() {
        let bbox = MapBbox {
            sw: pt(40.0, -4.0),
            ne: pt(42.0, 0.0),
        };
        let padded = bbox.pad(0.1);
        assert!((padded.sw.lat - 39.8).abs() < 1e-9);
        assert!((padded.ne.lat - 42.2).abs() < 1e-9);
        assert!((padded.sw.lng + 4.4).abs() < 1e-9);
        assert!((padded.ne.lng - 0.4).abs() < 1e-9);
        assert!(padded.contains_point(bbox.center()));
    }

    #[test]
    fn pad_max_bbox() {
        let bbox = MapBbox {
            sw: pt(-89.99, -179.97),
            ne: pt(89.99, 179.97),
        };
        let padded = bbox.pad(0.1);
        assert!(padded.is_valid());
        assert_eq!(padded.sw, pt(LAT_MIN, LNG_MIN));
        assert_eq!(padded.ne, pt(LAT_MAX, LNG_MAX));
    }

    #[test]
    fn invalid_coordinates() {
        assert!(!is_valid_coordinate(pt(91.0, 0.0)));
        assert!(!is_valid_coordinate(pt(0.0, -180.5)));
        assert!(!is_valid_coordinate(pt(f64::NAN, 0.0)));
        assert!(is_valid_coordinate(pt(41.0, 2.0)));
    }
}
