use serde::{Deserialize, Deserializer, Serialize};

mod conv;

pub use self::conv::*;

/// The backend sends `null` for values that have never been set.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct PublicConfig {
    #[serde(rename = "googleClientId")]
    pub google_client_id: Option<String>,
}

/// Request body of the Google credential exchange.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct GoogleCredential {
    pub token: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct User {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct TokenVerification {
    #[serde(default)]
    pub valid: bool,
    pub user: Option<User>,
}

/// Body of every non-2xx backend response.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct Error {
    pub error: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, Copy, PartialEq))]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct Review {
    #[serde(rename = "_id")]
    pub id              : String,
    #[serde(rename = "nombre_establecimiento")]
    pub name            : String,
    #[serde(rename = "direccion")]
    pub address         : String,
    #[serde(rename = "latitud")]
    pub lat             : f64,
    #[serde(rename = "longitud")]
    pub lng             : f64,
    #[serde(rename = "valoracion")]
    pub rating          : u8,
    #[serde(rename = "imagenes_uri", default, deserialize_with = "null_as_default")]
    pub image_urls      : Vec<String>,
    #[serde(rename = "autor_email", default)]
    pub author_email    : Option<String>,
    #[serde(rename = "autor_nombre", default)]
    pub author_name     : Option<String>,
    #[serde(default)]
    pub token           : Option<String>,
    #[serde(rename = "token_emision", default)]
    pub token_issued_at : Option<String>,
    #[serde(rename = "token_caducidad", default)]
    pub token_expires_at: Option<String>,
    #[serde(default)]
    pub created_at      : Option<String>,
}

/// Text fields of a new review.
///
/// The backend expects them as multipart form fields,
/// together with either the image files or the URLs
/// of already uploaded images.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct NewReview {
    #[serde(rename = "nombre_establecimiento")]
    pub name: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "valoracion")]
    pub rating: u8,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct GeocodeRequest {
    #[serde(rename = "direccion")]
    pub address: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, Copy, PartialEq))]
pub struct GeocodeResult {
    #[serde(rename = "latitud")]
    pub lat: f64,
    #[serde(rename = "longitud")]
    pub lng: f64,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct UploadedImage {
    pub url: String,
    pub public_id: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "imagen_uri", default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct NewMovie {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "imagen_uri", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Coordinates of a room.
///
/// The backend stores an empty object for rooms
/// that have never been located, therefore both
/// values are optional.
#[derive(Serialize, Deserialize, Default)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, Copy, PartialEq))]
pub struct RoomCoordinates {
    #[serde(rename = "latitud", default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(rename = "longitud", default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct Room {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "email_propietario", default, deserialize_with = "null_as_default")]
    pub owner_email: String,
    #[serde(rename = "direccion", default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(rename = "coordenadas", default, deserialize_with = "null_as_default")]
    pub coordinates: RoomCoordinates,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct NewRoom {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "coordenadas")]
    pub coordinates: RoomCoordinates,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct Screening {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "nombre_sala")]
    pub room_name: String,
    #[serde(rename = "titulo_pelicula")]
    pub movie_title: String,
    #[serde(rename = "fecha_proyeccion")]
    pub starts_at: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct NewScreening {
    #[serde(rename = "nombre_sala")]
    pub room_name: String,
    #[serde(rename = "titulo_pelicula")]
    pub movie_title: String,
    #[serde(rename = "fecha_proyeccion")]
    pub starts_at: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct MovieSearchResponse {
    #[serde(rename = "pelicula")]
    pub movie: Movie,
    #[serde(rename = "proyecciones", default, deserialize_with = "null_as_default")]
    pub screenings: Vec<ScreeningWithRoom>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct ScreeningWithRoom {
    #[serde(rename = "fecha_proyeccion")]
    pub starts_at: String,
    #[serde(rename = "sala")]
    pub room: ScreeningRoom,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct ScreeningRoom {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "direccion", default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(rename = "email_propietario", default, deserialize_with = "null_as_default")]
    pub owner_email: String,
    #[serde(rename = "coordenadas", default, deserialize_with = "null_as_default")]
    pub coordinates: RoomCoordinates,
}

/// A single place returned by the Nominatim search API.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct GeocodingSuggestion {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_review_without_images_and_audit_fields() {
        let json = r#"{
            "_id": "a",
            "nombre_establecimiento": "Casa Lucio",
            "direccion": "Calle Cava Baja 35, Madrid",
            "latitud": 40.4125,
            "longitud": -3.7089,
            "valoracion": 5
        }"#;
        let review: Review = serde_json::from_str(json).unwrap();
        assert_eq!(review.id, "a");
        assert_eq!(review.rating, 5);
        assert!(review.image_urls.is_empty());
        assert!(review.author_email.is_none());
        assert!(review.token_expires_at.is_none());
    }

    #[test]
    fn deserialize_room_with_empty_coordinates() {
        let json = r#"{
            "_id": "r1",
            "nombre": "Sala 1",
            "email_propietario": "owner@example.com",
            "direccion": "Gran Via 1",
            "coordenadas": {}
        }"#;
        let room: Room = serde_json::from_str(json).unwrap();
        assert!(room.coordinates.lat.is_none());
        assert!(room.coordinates.lng.is_none());
    }

    #[test]
    fn deserialize_room_with_null_fields() {
        let json = r#"{
            "_id": "r2",
            "nombre": "Sala 2",
            "email_propietario": null,
            "direccion": null,
            "coordenadas": null
        }"#;
        let room: Room = serde_json::from_str(json).unwrap();
        assert!(room.owner_email.is_empty());
        assert!(room.address.is_empty());
        assert!(room.coordinates.lat.is_none());
        let rooms: Vec<Room> =
            serde_json::from_str(&format!(r#"[{json}, {{"_id": "r3", "nombre": "Sala 3"}}]"#))
                .unwrap();
        assert_eq!(rooms.len(), 2);
    }

    #[test]
    fn serialize_new_room_with_wire_names() {
        let room = NewRoom {
            name: "Sala 2".to_string(),
            address: "Gran Via 2".to_string(),
            coordinates: RoomCoordinates {
                lat: Some(40.42),
                lng: Some(-3.70),
            },
        };
        let json = serde_json::to_value(&room).unwrap();
        assert_eq!(json["nombre"], "Sala 2");
        assert_eq!(json["coordenadas"]["latitud"], 40.42);
        assert_eq!(json["coordenadas"]["longitud"], -3.70);
    }

    #[test]
    fn new_movie_without_image_omits_the_field() {
        let movie = NewMovie {
            title: "Solaris".to_string(),
            image_url: None,
        };
        let json = serde_json::to_string(&movie).unwrap();
        assert_eq!(json, r#"{"titulo":"Solaris"}"#);
    }

    #[test]
    fn deserialize_public_config() {
        let cfg: PublicConfig = serde_json::from_str(r#"{"googleClientId":"abc"}"#).unwrap();
        assert_eq!(cfg.google_client_id.as_deref(), Some("abc"));
    }
}
