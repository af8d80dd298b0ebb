use gloo_net::http::{Request, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use web_sys::{File, FormData, RequestCredentials};

use cineweb_boundary::{
    GeocodeRequest, GeocodeResult, Movie, MovieSearchResponse, NewMovie, NewReview, NewRoom,
    NewScreening, Review, Room, Screening, TokenVerification, UploadedImage,
};

use crate::{
    bundled_review_form, encode_segment, image_upload_form, into_json, into_unit,
    review_form_with_urls, Error, Result,
};

/// Authorized CineWeb API
#[derive(Clone)]
pub struct UserApi {
    url: String,
    token: String,
}

impl UserApi {
    #[must_use]
    pub const fn new(url: String, token: String) -> Self {
        Self { url, token }
    }
    fn auth_header_value(&self) -> String {
        format!("Bearer {}", self.token)
    }
    fn add_auth_headers(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("Authorization", &self.auth_header_value())
            .credentials(RequestCredentials::Include)
    }
    async fn send<T>(&self, req: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.add_auth_headers(req).send().await?;
        into_json(response).await
    }
    async fn send_json<D, T>(&self, req: RequestBuilder, data: &D) -> Result<T>
    where
        T: DeserializeOwned,
        D: Serialize,
    {
        let response = self.add_auth_headers(req).json(data)?.send().await?;
        into_json(response).await
    }
    async fn send_form(&self, req: RequestBuilder, form: FormData) -> Result<Response> {
        // The browser sets the multipart boundary itself,
        // so there must not be a Content-Type header.
        Ok(self.add_auth_headers(req).body(form)?.send().await?)
    }
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    // -- session -- //

    /// Returns an error if the token is no longer valid.
    pub async fn verify(&self) -> Result<TokenVerification> {
        let url = format!("{}/auth/verify", self.url);
        let verification: TokenVerification = self.send(Request::get(&url)).await?;
        if verification.valid && verification.user.is_some() {
            Ok(verification)
        } else {
            Err(Error::Api {
                status: 401,
                message: None,
            })
        }
    }

    // -- reviews -- //

    pub async fn reviews(&self) -> Result<Vec<Review>> {
        let url = format!("{}/resenas", self.url);
        self.send(Request::get(&url)).await
    }
    pub async fn review(&self, id: &str) -> Result<Review> {
        let url = format!("{}/resenas/{}", self.url, encode_segment(id));
        self.send(Request::get(&url)).await
    }
    /// Create a review and let the backend upload the images.
    pub async fn create_review_bundled(&self, review: &NewReview, files: &[File]) -> Result<()> {
        let url = format!("{}/resenas", self.url);
        let form = bundled_review_form(review, files)?;
        into_unit(self.send_form(Request::post(&url), form).await?).await
    }
    /// Create a review that references pre-uploaded images.
    pub async fn create_review_with_urls(&self, review: &NewReview, urls: &[String]) -> Result<()> {
        let url = format!("{}/resenas", self.url);
        let form = review_form_with_urls(review, urls)?;
        into_unit(self.send_form(Request::post(&url), form).await?).await
    }
    pub async fn geocode(&self, address: &str) -> Result<GeocodeResult> {
        let url = format!("{}/resenas/geocode", self.url);
        let req = GeocodeRequest {
            address: address.to_string(),
        };
        self.send_json(Request::post(&url), &req).await
    }

    // -- images -- //

    pub async fn upload_image(&self, folder: &str, file: &File) -> Result<UploadedImage> {
        let url = format!("{}/upload/image", self.url);
        let req = Request::post(&url).query([("folder", folder)]);
        let form = image_upload_form(file)?;
        into_json(self.send_form(req, form).await?).await
    }
    pub async fn delete_image(&self, public_id: &str) -> Result<()> {
        let url = format!("{}/upload/image/{}", self.url, public_id_path(public_id));
        let response = self
            .add_auth_headers(Request::delete(&url))
            .send()
            .await?;
        into_unit(response).await
    }

    // -- cinema -- //

    pub async fn movies(&self) -> Result<Vec<Movie>> {
        let url = format!("{}/peliculas", self.url);
        self.send(Request::get(&url)).await
    }
    pub async fn create_movie(&self, movie: &NewMovie) -> Result<()> {
        let url = format!("{}/peliculas", self.url);
        let response = self.add_auth_headers(Request::post(&url)).json(movie)?.send().await?;
        into_unit(response).await
    }
    pub async fn search_movie(&self, title: &str) -> Result<MovieSearchResponse> {
        let url = format!("{}/peliculas/buscar/{}", self.url, encode_segment(title));
        self.send(Request::get(&url)).await
    }
    pub async fn rooms(&self) -> Result<Vec<Room>> {
        let url = format!("{}/salas", self.url);
        self.send(Request::get(&url)).await
    }
    pub async fn create_room(&self, room: &NewRoom) -> Result<()> {
        let url = format!("{}/salas", self.url);
        let response = self.add_auth_headers(Request::post(&url)).json(room)?.send().await?;
        into_unit(response).await
    }
    pub async fn screenings(&self) -> Result<Vec<Screening>> {
        let url = format!("{}/proyecciones", self.url);
        self.send(Request::get(&url)).await
    }
    pub async fn screenings_by_room(&self, room_name: &str) -> Result<Vec<Screening>> {
        let url = format!("{}/proyecciones/sala/{}", self.url, encode_segment(room_name));
        self.send(Request::get(&url)).await
    }
    pub async fn screenings_by_movie(&self, movie_title: &str) -> Result<Vec<Screening>> {
        let url = format!(
            "{}/proyecciones/pelicula/{}",
            self.url,
            encode_segment(movie_title)
        );
        self.send(Request::get(&url)).await
    }
    pub async fn create_screening(&self, screening: &NewScreening) -> Result<()> {
        let url = format!("{}/proyecciones", self.url);
        let response = self
            .add_auth_headers(Request::post(&url))
            .json(screening)?
            .send()
            .await?;
        into_unit(response).await
    }
}

/// Cloudinary IDs contain the folder, e.g. `reviews/abc123`.
fn public_id_path(public_id: &str) -> String {
    public_id
        .split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}
