//! Projection of a collection into a list of cards
//! and a set of map markers.

use crate::{bbox::MapBbox, boundary::Coordinate, config};

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub lines: Vec<String>,
    pub rating: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: String,
    pub position: Coordinate,
    pub title: String,
    pub popup_lines: Vec<String>,
}

/// A record that can be shown as a card and,
/// if it is located, as a map marker.
pub trait Renderable {
    fn position(&self) -> Option<Coordinate>;
    fn card(&self) -> Card;

    fn marker(&self) -> Option<Marker> {
        let position = self.position()?;
        let Card {
            id,
            title,
            mut lines,
            rating,
            ..
        } = self.card();
        lines.truncate(1);
        lines.extend(rating);
        Some(Marker {
            id,
            position,
            title,
            popup_lines: lines,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    Empty(String),
    Cards(Vec<Card>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Viewport {
    Unchanged,
    Center { center: Coordinate, zoom: f64 },
    /// Already padded.
    FitBounds(MapBbox),
}

/// Everything that is needed to redraw a list and its map.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub list: ListView,
    pub markers: Vec<Marker>,
    pub viewport: Viewport,
}

impl Frame {
    #[must_use]
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            list: ListView::Empty(message.into()),
            markers: vec![],
            viewport: Viewport::Unchanged,
        }
    }
}

pub fn render<T>(items: &[T], empty_message: &str, settings: &config::Map) -> Frame
where
    T: Renderable,
{
    if items.is_empty() {
        return Frame::empty(empty_message);
    }
    let cards = items.iter().map(Renderable::card).collect();
    let markers: Vec<_> = items.iter().filter_map(Renderable::marker).collect();
    let viewport = viewport(&markers, settings);
    Frame {
        list: ListView::Cards(cards),
        markers,
        viewport,
    }
}

fn viewport(markers: &[Marker], settings: &config::Map) -> Viewport {
    match markers {
        [] => Viewport::Unchanged,
        [single] => Viewport::Center {
            center: single.position,
            zoom: settings.detail_zoom,
        },
        _ => MapBbox::from_points(markers.iter().map(|m| m.position))
            .map_or(Viewport::Unchanged, |bbox| {
                Viewport::FitBounds(bbox.pad(settings.fit_bounds_padding))
            }),
    }
}

/// The native map widget.
pub trait MapWidget {
    type Marker;

    /// Only a `selectable` marker offers to show the details
    /// of the record with the marker's id.
    fn add_marker(&mut self, marker: &Marker, selectable: bool) -> Self::Marker;
    fn remove_marker(&mut self, marker: Self::Marker);
    fn set_view(&mut self, center: Coordinate, zoom: f64);
    fn fit_bounds(&mut self, bbox: &MapBbox);
    /// Destroy the widget.
    fn remove(self);
}

/// Exclusive owner of a map widget and its marker layer.
///
/// The widget must be released before a new one
/// is acquired for the same container.
pub struct MapSlot<W>
where
    W: MapWidget,
{
    widget: Option<W>,
    markers: Vec<(String, W::Marker)>,
    pin: Option<W::Marker>,
}

impl<W> Default for MapSlot<W>
where
    W: MapWidget,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<W> MapSlot<W>
where
    W: MapWidget,
{
    #[must_use]
    pub const fn new() -> Self {
        Self {
            widget: None,
            markers: Vec::new(),
            pin: None,
        }
    }

    pub fn acquire(&mut self, widget: W) {
        if self.widget.is_some() {
            log::debug!("Release previous map widget");
            self.release();
        }
        self.widget = Some(widget);
    }

    pub fn release(&mut self) {
        let Some(mut widget) = self.widget.take() else {
            return;
        };
        for (_, m) in self.markers.drain(..) {
            widget.remove_marker(m);
        }
        if let Some(pin) = self.pin.take() {
            widget.remove_marker(pin);
        }
        widget.remove();
    }

    #[must_use]
    pub const fn is_acquired(&self) -> bool {
        self.widget.is_some()
    }

    /// Replace all markers and adjust the viewport.
    ///
    /// Returns `false` if no widget has been acquired.
    pub fn apply(&mut self, frame: &Frame) -> bool {
        let Some(widget) = self.widget.as_mut() else {
            log::warn!("No map widget available");
            return false;
        };
        for (_, m) in self.markers.drain(..) {
            widget.remove_marker(m);
        }
        self.markers = frame
            .markers
            .iter()
            .map(|m| (m.id.clone(), widget.add_marker(m, true)))
            .collect();
        match frame.viewport {
            Viewport::Unchanged => {}
            Viewport::Center { center, zoom } => widget.set_view(center, zoom),
            Viewport::FitBounds(bbox) => widget.fit_bounds(&bbox),
        }
        true
    }

    /// Show a single marker that is not part of the collection,
    /// e.g. the result of an address search.
    ///
    /// The pin has no record and therefore no details.
    pub fn show_pin(&mut self, marker: &Marker, zoom: f64) -> bool {
        let Some(widget) = self.widget.as_mut() else {
            return false;
        };
        if let Some(pin) = self.pin.take() {
            widget.remove_marker(pin);
        }
        self.pin = Some(widget.add_marker(marker, false));
        widget.set_view(marker.position, zoom);
        true
    }

    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn marker_ids(&self) -> impl Iterator<Item = &str> {
        self.markers.iter().map(|(id, _)| id.as_str())
    }

    pub fn widget_mut(&mut self) -> Option<&mut W> {
        self.widget.as_mut()
    }
}

impl<W> Drop for MapSlot<W>
where
    W: MapWidget,
{
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

    use super::*;

    #[derive(Debug, Default)]
    pub struct MapLog {
        pub markers: BTreeMap<u32, Coordinate>,
        pub selectable: BTreeMap<u32, bool>,
        pub popups: BTreeMap<u32, Vec<String>>,
        pub view: Option<(Coordinate, f64)>,
        pub fitted: Option<MapBbox>,
        pub removed: bool,
    }

    #[derive(Default, Clone)]
    pub struct RecordingMap {
        pub log: Rc<RefCell<MapLog>>,
        next_id: u32,
    }

    impl MapWidget for RecordingMap {
        type Marker = u32;

        fn add_marker(&mut self, marker: &Marker, selectable: bool) -> u32 {
            self.next_id += 1;
            let mut log = self.log.borrow_mut();
            log.markers.insert(self.next_id, marker.position);
            log.selectable.insert(self.next_id, selectable);
            log.popups.insert(self.next_id, marker.popup_lines.clone());
            self.next_id
        }
        fn remove_marker(&mut self, marker: u32) {
            let mut log = self.log.borrow_mut();
            log.markers.remove(&marker);
            log.selectable.remove(&marker);
            log.popups.remove(&marker);
        }
        fn set_view(&mut self, center: Coordinate, zoom: f64) {
            self.log.borrow_mut().view = Some((center, zoom));
        }
        fn fit_bounds(&mut self, bbox: &MapBbox) {
            self.log.borrow_mut().fitted = Some(*bbox);
        }
        fn remove(self) {
            self.log.borrow_mut().removed = true;
        }
    }

    struct Spot {
        id: &'static str,
        pos: Option<Coordinate>,
    }

    impl Renderable for Spot {
        fn position(&self) -> Option<Coordinate> {
            self.pos
        }
        fn card(&self) -> Card {
            Card {
                id: self.id.to_string(),
                title: self.id.to_uppercase(),
                lines: vec!["first".into(), "second".into()],
                rating: None,
                image_url: None,
            }
        }
    }

    const fn spot(id: &'static str, lat: f64, lng: f64) -> Spot {
        Spot {
            id,
            pos: Some(Coordinate { lat, lng }),
        }
    }

    fn settings() -> config::Map {
        crate::Settings::default().map
    }

    #[test]
    fn empty_collection_renders_empty_state() {
        let frame = render::<Spot>(&[], "Nothing here", &settings());
        assert_eq!(frame.list, ListView::Empty("Nothing here".into()));
        assert!(frame.markers.is_empty());
        assert_eq!(frame.viewport, Viewport::Unchanged);
    }

    #[test]
    fn single_marker_centers_the_map() {
        let frame = render(&[spot("a", 40.0, -3.0)], "", &settings());
        assert_eq!(
            frame.viewport,
            Viewport::Center {
                center: Coordinate {
                    lat: 40.0,
                    lng: -3.0
                },
                zoom: 13.0
            }
        );
        assert_eq!(frame.markers[0].popup_lines, vec!["first".to_string()]);
    }

    #[test]
    fn many_markers_fit_padded_bounds() {
        let frame = render(
            &[spot("a", 40.0, -4.0), spot("b", 42.0, 0.0)],
            "",
            &settings(),
        );
        let Viewport::FitBounds(bbox) = frame.viewport else {
            panic!("unexpected viewport {:?}", frame.viewport);
        };
        assert!((bbox.sw.lat - 39.8).abs() < 1e-9);
        assert!((bbox.ne.lng - 0.4).abs() < 1e-9);
    }

    #[test]
    fn unlocated_records_are_listed_without_marker() {
        let items = [
            spot("a", 40.0, -4.0),
            Spot { id: "b", pos: None },
        ];
        let frame = render(&items, "", &settings());
        let ListView::Cards(cards) = &frame.list else {
            panic!("expected cards");
        };
        assert_eq!(cards.len(), 2);
        assert_eq!(frame.markers.len(), 1);
    }

    #[test]
    fn markers_follow_collection() {
        let mut slot = MapSlot::new();
        let map = RecordingMap::default();
        let log = Rc::clone(&map.log);
        slot.acquire(map);

        for n in 0..8_u32 {
            let items: Vec<_> = (0..n)
                .map(|i| spot("x", 40.0 + f64::from(i), -3.0 - f64::from(i)))
                .collect();
            let frame = render(&items, "", &settings());
            assert!(slot.apply(&frame));
            assert_eq!(slot.marker_count(), items.len());
            let log = log.borrow();
            assert_eq!(log.markers.len(), items.len());
            let mut positions: Vec<_> = log.markers.values().copied().collect();
            positions.sort_by(|a, b| a.lat.total_cmp(&b.lat));
            let expected: Vec<_> = items.iter().filter_map(Renderable::position).collect();
            assert_eq!(positions, expected);
        }
    }

    #[test]
    fn apply_without_widget_fails() {
        let mut slot = MapSlot::<RecordingMap>::new();
        assert!(!slot.apply(&Frame::empty("")));
    }

    #[test]
    fn release_before_reacquire() {
        let mut slot = MapSlot::new();
        let first = RecordingMap::default();
        let first_log = Rc::clone(&first.log);
        slot.acquire(first);
        slot.apply(&render(&[spot("a", 1.0, 1.0)], "", &settings()));
        slot.acquire(RecordingMap::default());
        assert!(first_log.borrow().removed);
        assert!(first_log.borrow().markers.is_empty());
        assert_eq!(slot.marker_count(), 0);
    }

    #[test]
    fn search_pin_is_not_part_of_the_collection() {
        let mut slot = MapSlot::new();
        let map = RecordingMap::default();
        let log = Rc::clone(&map.log);
        slot.acquire(map);
        let frame = render(&[spot("a", 1.0, 1.0), spot("b", 2.0, 2.0)], "", &settings());
        slot.apply(&frame);
        let pin = spot("pin", 5.0, 5.0).marker().unwrap();
        assert!(slot.show_pin(&pin, 13.0));
        assert!(slot.show_pin(&pin, 13.0));
        assert_eq!(slot.marker_count(), 2);
        assert_eq!(log.borrow().markers.len(), 3);
        slot.apply(&frame);
        assert_eq!(log.borrow().markers.len(), 3);
        let selectable: Vec<_> = log.borrow().selectable.values().copied().collect();
        assert_eq!(selectable.iter().filter(|s| **s).count(), 2);
        assert_eq!(selectable.iter().filter(|s| !**s).count(), 1);
        assert_eq!(log.borrow().view.map(|(c, _)| c), Some(pin.position));
    }

    #[test]
    fn markers_carry_their_popup() {
        let mut slot = MapSlot::new();
        let map = RecordingMap::default();
        let log = Rc::clone(&map.log);
        slot.acquire(map);
        slot.apply(&render(&[spot("a", 1.0, 1.0)], "", &settings()));
        let popups: Vec<_> = log.borrow().popups.values().cloned().collect();
        assert_eq!(popups, vec![vec!["first".to_string()]]);
    }

    #[test]
    fn drop_releases_widget() {
        let map = RecordingMap::default();
        let log = Rc::clone(&map.log);
        {
            let mut slot = MapSlot::new();
            slot.acquire(map);
        }
        assert!(log.borrow().removed);
    }
}
