use web_sys::{File, FormData};

use cineweb_boundary::NewReview;

use crate::Result;

/// Part name of the files of a bundled review.
pub const REVIEW_IMAGES_PART: &str = "imagenes";
/// Field name of the URLs of pre-uploaded review images.
pub const REVIEW_IMAGE_URLS_FIELD: &str = "imagenes_urls[]";
/// Part name of a single uploaded image.
pub const UPLOAD_IMAGE_PART: &str = "image";

/// The text fields of a review in submission order.
#[must_use]
pub fn review_fields(review: &NewReview) -> [(&'static str, String); 3] {
    let NewReview {
        name,
        address,
        rating,
    } = review;
    [
        ("nombre_establecimiento", name.clone()),
        ("direccion", address.clone()),
        ("valoracion", rating.to_string()),
    ]
}

fn text_form<'a, I>(fields: I) -> Result<FormData>
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    let form = FormData::new()?;
    for (name, value) in fields {
        form.append_with_str(name, &value)?;
    }
    Ok(form)
}

/// A review together with its image files.
pub fn bundled_review_form(review: &NewReview, files: &[File]) -> Result<FormData> {
    let form = text_form(review_fields(review))?;
    for file in files {
        form.append_with_blob_and_filename(REVIEW_IMAGES_PART, file, &file.name())?;
    }
    Ok(form)
}

/// A review that references already uploaded images.
pub fn review_form_with_urls(review: &NewReview, urls: &[String]) -> Result<FormData> {
    let urls = urls
        .iter()
        .map(|url| (REVIEW_IMAGE_URLS_FIELD, url.clone()));
    text_form(review_fields(review).into_iter().chain(urls))
}

pub fn image_upload_form(file: &File) -> Result<FormData> {
    let form = FormData::new()?;
    form.append_with_blob_and_filename(UPLOAD_IMAGE_PART, file, &file.name())?;
    Ok(form)
}
