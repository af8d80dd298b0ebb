use leaflet::{LatLng, LatLngBounds, MapOptions, MarkerOptions, TileLayer, TileLayerOptions};
use leptos::{html::Div, *};
use wasm_bindgen::{prelude::*, JsCast};

use cineweb_core::{
    bbox::MapBbox,
    boundary::Coordinate,
    config,
    render::{self, Frame, MapSlot, MapWidget},
};

/// A Leaflet map.
pub struct LeafletMap {
    map: leaflet::Map,
    on_click: Option<Callback<String>>,
    on_drag: Option<Callback<Coordinate>>,
}

/// A marker and the event handlers that must live as long as the marker.
pub struct LeafletMarker {
    marker: leaflet::Marker,
    _handlers: Vec<Closure<dyn Fn(JsValue)>>,
}

fn lat_lng(c: Coordinate) -> LatLng {
    LatLng::new(c.lat, c.lng)
}

impl LeafletMap {
    fn new(
        container: &web_sys::HtmlElement,
        settings: &config::Map,
        on_click: Option<Callback<String>>,
        on_drag: Option<Callback<Coordinate>>,
    ) -> Self {
        let map = leaflet::Map::new_with_element(container, &MapOptions::default());
        map.set_view(&lat_lng(settings.default_center), settings.default_zoom);
        let tile_options = TileLayerOptions::default();
        tile_options.set_attribution(settings.attribution.clone());
        TileLayer::new_options(&settings.tile_layer_url, &tile_options).add_to(&map);
        Self {
            map,
            on_click,
            on_drag,
        }
    }
}

/// Title, lines and, if given, a details button.
fn popup_content(
    marker: &render::Marker,
    on_details: Option<&Closure<dyn Fn(JsValue)>>,
) -> Result<web_sys::Element, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document"))?;
    let content = document.create_element("div")?;
    let title = document.create_element("strong")?;
    title.set_text_content(Some(&marker.title));
    content.append_child(&title)?;
    for line in &marker.popup_lines {
        let row = document.create_element("div")?;
        row.set_text_content(Some(line));
        content.append_child(&row)?;
    }
    if let Some(handler) = on_details {
        let button = document.create_element("button")?;
        button.set_class_name("btn-link");
        button.set_text_content(Some("View details"));
        button.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
        content.append_child(&button)?;
    }
    Ok(content)
}

fn bind_popup(marker: &leaflet::Marker, content: &JsValue) -> Result<(), JsValue> {
    let target: &JsValue = marker;
    let bind: js_sys::Function =
        js_sys::Reflect::get(target, &JsValue::from_str("bindPopup"))?.dyn_into()?;
    bind.call1(target, content)?;
    Ok(())
}

impl MapWidget for LeafletMap {
    type Marker = LeafletMarker;

    fn add_marker(&mut self, m: &render::Marker, selectable: bool) -> LeafletMarker {
        let options = MarkerOptions::default();
        options.set_title(m.title.clone());
        options.set_draggable(self.on_drag.is_some());
        let marker = leaflet::Marker::new_with_options(&lat_lng(m.position), &options);
        let mut handlers = vec![];
        let on_details = self.on_click.filter(|_| selectable).map(|on_click| {
            let id = m.id.clone();
            Closure::<dyn Fn(JsValue)>::new(move |_| on_click.call(id.clone()))
        });
        if !m.title.is_empty() || !m.popup_lines.is_empty() {
            let bound = popup_content(m, on_details.as_ref())
                .and_then(|content| bind_popup(&marker, &content));
            if let Err(err) = bound {
                log::warn!("Unable to bind popup: {err:?}");
            }
        }
        handlers.extend(on_details);
        if let Some(on_drag) = self.on_drag {
            let dragged = marker.clone();
            let handler = Closure::<dyn Fn(JsValue)>::new(move |_| {
                let p = dragged.get_lat_lng();
                on_drag.call(Coordinate {
                    lat: p.lat(),
                    lng: p.lng(),
                });
            });
            marker.on("dragend", handler.as_ref().unchecked_ref());
            handlers.push(handler);
        }
        marker.add_to(&self.map);
        LeafletMarker {
            marker,
            _handlers: handlers,
        }
    }

    fn remove_marker(&mut self, marker: LeafletMarker) {
        marker.marker.remove();
    }

    fn set_view(&mut self, center: Coordinate, zoom: f64) {
        self.map.set_view(&lat_lng(center), zoom);
    }

    fn fit_bounds(&mut self, bbox: &MapBbox) {
        let bounds = LatLngBounds::new(&lat_lng(bbox.sw), &lat_lng(bbox.ne));
        self.map.fit_bounds(&bounds);
    }

    fn remove(self) {
        log::debug!("Remove leaflet map");
        self.map.remove();
    }
}

/// Acquire a map for the given container as soon as it is mounted
/// and release it when the owning component is disposed.
fn use_map_slot(
    container: NodeRef<Div>,
    on_click: Option<Callback<String>>,
    on_drag: Option<Callback<Coordinate>>,
) -> (StoredValue<MapSlot<LeafletMap>>, ReadSignal<bool>) {
    let settings = expect_context::<crate::AppState>().settings;
    let slot = store_value(MapSlot::<LeafletMap>::new());
    let (ready, set_ready) = create_signal(false);

    container.on_load(move |div| {
        // Leaflet needs an element with a size.
        request_animation_frame(move || {
            let widget = settings.with_value(|s| LeafletMap::new(&div, &s.map, on_click, on_drag));
            slot.update_value(|slot| slot.acquire(widget));
            set_ready.set(true);
        });
    });

    on_cleanup(move || {
        slot.try_update_value(MapSlot::release);
    });

    (slot, ready)
}

/// Markers of a collection.
#[component]
pub fn CollectionMap(
    #[prop(into)] frame: Signal<Frame>,
    /// Called with the id of the marker whose details are requested.
    #[prop(optional, into)]
    on_select: Option<Callback<String>>,
    /// A single search result that is not part of the collection.
    #[prop(optional, into)]
    pin: Option<Signal<Option<render::Marker>>>,
) -> impl IntoView {
    let container = create_node_ref::<Div>();
    let (slot, ready) = use_map_slot(container, on_select, None);
    let detail_zoom = expect_context::<crate::AppState>()
        .settings
        .with_value(|s| s.map.detail_zoom);

    Effect::new(move |_| {
        if !ready.get() {
            return;
        }
        frame.with(|frame| {
            slot.update_value(|slot| {
                slot.apply(frame);
            });
        });
    });

    Effect::new(move |_| {
        let Some(pin) = pin else {
            return;
        };
        if !ready.get() {
            return;
        }
        if let Some(marker) = pin.get() {
            slot.update_value(|slot| {
                slot.show_pin(&marker, detail_zoom);
            });
        }
    });

    view! { <div class="map" node_ref=container></div> }
}

/// A map with a single draggable marker.
#[component]
pub fn PreviewMap(
    #[prop(into)] position: Signal<Option<Coordinate>>,
    #[prop(into)] on_drag: Callback<Coordinate>,
) -> impl IntoView {
    let container = create_node_ref::<Div>();
    let (slot, ready) = use_map_slot(container, None, Some(on_drag));
    let detail_zoom = expect_context::<crate::AppState>()
        .settings
        .with_value(|s| s.map.detail_zoom);

    Effect::new(move |_| {
        if !ready.get() {
            return;
        }
        let Some(position) = position.get() else {
            return;
        };
        let marker = render::Marker {
            id: String::new(),
            position,
            title: String::new(),
            popup_lines: vec![],
        };
        slot.update_value(|slot| {
            slot.show_pin(&marker, detail_zoom);
        });
    });

    view! { <div class="map preview" node_ref=container></div> }
}
