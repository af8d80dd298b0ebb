//! Form submission pipeline.
//!
//! Images are either attached to the create request
//! ([`UploadShape::Bundled`]) or uploaded one by one right
//! after they were selected ([`UploadShape::PreUploaded`]).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    autocomplete::CoordinateFields,
    boundary::{NewMovie, NewReview, NewRoom, NewScreening, UploadedImage},
    datetime,
    rating::{Rating, RatingError},
    Failure,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UploadShape {
    Bundled,
    PreUploaded,
}

/// Rejections that happen before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("'{name}' is not a supported image (PNG, JPEG, GIF or WebP)")]
    UnsupportedFileType { name: String },
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Select a suggested address or enter the coordinates")]
    MissingCoordinates,
    #[error(transparent)]
    Rating(#[from] RatingError),
    #[error("Please wait until all images have been uploaded")]
    UploadsPending,
    #[error("Invalid date")]
    InvalidDate,
}

impl From<FormError> for Failure {
    fn from(from: FormError) -> Self {
        Self::Validation(from.to_string())
    }
}

/// The metadata of a selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

pub fn validate_image(file: &FileInfo, allowed_mime_types: &[String]) -> Result<(), FormError> {
    if allowed_mime_types
        .iter()
        .any(|t| t.eq_ignore_ascii_case(file.mime_type.trim()))
    {
        Ok(())
    } else {
        log::debug!("Reject '{}' ({})", file.name, file.mime_type);
        Err(FormError::UnsupportedFileType {
            name: file.name.clone(),
        })
    }
}

/// Validate all files of a bundled submission.
pub fn validate_images<'a, I>(files: I, allowed_mime_types: &[String]) -> Result<(), FormError>
where
    I: IntoIterator<Item = &'a FileInfo>,
{
    files
        .into_iter()
        .try_for_each(|f| validate_image(f, allowed_mime_types))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalPreviewId(u64);

impl LocalPreviewId {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Pending,
    Uploaded(UploadedImage),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub id: LocalPreviewId,
    pub file_name: String,
    pub preview_url: Option<String>,
    pub status: UploadStatus,
}

impl PendingUpload {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.status, UploadStatus::Pending)
    }

    #[must_use]
    pub const fn uploaded(&self) -> Option<&UploadedImage> {
        match &self.status {
            UploadStatus::Uploaded(img) => Some(img),
            UploadStatus::Pending => None,
        }
    }
}

/// Images that have been selected in the current form session.
#[derive(Debug, Default, Clone)]
pub struct PendingUploads {
    next_id: u64,
    entries: Vec<PendingUpload>,
}

impl PendingUploads {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Register a selected file that is about to be uploaded.
    pub fn add(
        &mut self,
        file: &FileInfo,
        allowed_mime_types: &[String],
    ) -> Result<LocalPreviewId, FormError> {
        validate_image(file, allowed_mime_types)?;
        self.next_id += 1;
        let id = LocalPreviewId(self.next_id);
        self.entries.push(PendingUpload {
            id,
            file_name: file.name.clone(),
            preview_url: None,
            status: UploadStatus::Pending,
        });
        Ok(id)
    }

    pub fn set_preview_url(&mut self, id: LocalPreviewId, url: String) {
        if let Some(e) = self.get_mut(id) {
            e.preview_url = Some(url);
        }
    }

    /// Record a finished upload.
    ///
    /// Returns `false` if the file has been removed in the meantime:
    /// the uploaded image is an orphan then.
    pub fn uploaded(&mut self, id: LocalPreviewId, image: UploadedImage) -> bool {
        let Some(e) = self.get_mut(id) else {
            log::debug!("Upload of removed image {} finished", id.0);
            return false;
        };
        log::debug!("Uploaded '{}' as {}", e.file_name, image.public_id);
        e.status = UploadStatus::Uploaded(image);
        true
    }

    /// A failed upload is dropped from the set.
    pub fn failed(&mut self, id: LocalPreviewId) -> Option<PendingUpload> {
        let removed = self.remove(id);
        if let Some(e) = &removed {
            log::warn!("Unable to upload '{}'", e.file_name);
        }
        removed
    }

    pub fn remove(&mut self, id: LocalPreviewId) -> Option<PendingUpload> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx))
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.entries.iter().any(PendingUpload::is_pending)
    }

    /// URLs of all uploaded images in selection order.
    #[must_use]
    pub fn urls(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(PendingUpload::uploaded)
            .map(|img| img.url.clone())
            .collect()
    }

    #[must_use]
    pub fn entries(&self) -> &[PendingUpload] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn get_mut(&mut self, id: LocalPreviewId) -> Option<&mut PendingUpload> {
        self.entries.iter_mut().find(|e| e.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Reset the form and refresh the collection.
    Success,
    /// Keep the form, show the message.
    Failed(String),
    Logout,
    /// The submission has been abandoned, e.g. by a logout.
    Stale,
}

/// Guards the submit control of a single form.
#[derive(Debug, Clone)]
pub struct Submission {
    generation: u64,
    in_flight: bool,
    generic_error: &'static str,
}

impl Submission {
    #[must_use]
    pub const fn new(generic_error: &'static str) -> Self {
        Self {
            generation: 0,
            in_flight: false,
            generic_error,
        }
    }

    /// Returns `None` while another submission is in flight.
    pub fn begin(&mut self) -> Option<SubmitTicket> {
        if self.in_flight {
            log::debug!("Ignore submit: already submitting");
            return None;
        }
        self.generation += 1;
        self.in_flight = true;
        Some(SubmitTicket(self.generation))
    }

    pub fn finish(&mut self, ticket: SubmitTicket, result: Result<(), Failure>) -> SubmitOutcome {
        if !self.in_flight || ticket.0 != self.generation {
            return SubmitOutcome::Stale;
        }
        self.in_flight = false;
        match result {
            Ok(()) => SubmitOutcome::Success,
            Err(Failure::Unauthorized) => SubmitOutcome::Logout,
            Err(err) => {
                log::warn!("{}: {err}", self.generic_error);
                SubmitOutcome::Failed(err.user_message(self.generic_error))
            }
        }
    }

    pub fn abandon(&mut self) {
        self.generation += 1;
        self.in_flight = false;
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.in_flight
    }

    #[must_use]
    pub const fn label(&self, idle: &'static str, busy: &'static str) -> &'static str {
        if self.in_flight {
            busy
        } else {
            idle
        }
    }
}

fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FormError::MissingField(field));
    }
    Ok(value.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    pub name: String,
    pub address: String,
    pub rating: String,
}

impl ReviewDraft {
    pub fn validate(&self) -> Result<NewReview, FormError> {
        let name = required(&self.name, "Name")?;
        let address = required(&self.address, "Address")?;
        let rating: Rating = self.rating.parse()?;
        Ok(NewReview {
            name,
            address,
            rating: rating.into(),
        })
    }

    /// Validate a submission that references pre-uploaded images.
    pub fn validate_with_uploads(
        &self,
        uploads: &PendingUploads,
    ) -> Result<(NewReview, Vec<String>), FormError> {
        if uploads.has_pending() {
            return Err(FormError::UploadsPending);
        }
        Ok((self.validate()?, uploads.urls()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieDraft {
    pub title: String,
}

impl MovieDraft {
    pub fn validate(&self, uploads: &PendingUploads) -> Result<NewMovie, FormError> {
        if uploads.has_pending() {
            return Err(FormError::UploadsPending);
        }
        let title = required(&self.title, "Title")?;
        Ok(NewMovie {
            title,
            image_url: uploads.urls().into_iter().next(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomDraft {
    pub name: String,
    pub address: String,
    pub coordinates: CoordinateFields,
}

impl RoomDraft {
    pub fn validate(&self) -> Result<NewRoom, FormError> {
        let name = required(&self.name, "Name")?;
        let address = required(&self.address, "Address")?;
        let coordinate = self
            .coordinates
            .coordinate()
            .ok_or(FormError::MissingCoordinates)?;
        Ok(NewRoom {
            name,
            address,
            coordinates: coordinate.into(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreeningDraft {
    pub room_name: String,
    pub movie_title: String,
    /// Value of a `datetime-local` input.
    pub starts_at: String,
}

impl ScreeningDraft {
    pub fn validate(&self) -> Result<NewScreening, FormError> {
        let room_name = required(&self.room_name, "Room")?;
        let movie_title = required(&self.movie_title, "Movie")?;
        required(&self.starts_at, "Date")?;
        let starts_at =
            datetime::local_input_to_wire(&self.starts_at).ok_or(FormError::InvalidDate)?;
        Ok(NewScreening {
            room_name,
            movie_title,
            starts_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        crate::Settings::default().uploads.allowed_mime_types
    }

    fn file(name: &str, mime_type: &str) -> FileInfo {
        FileInfo {
            name: name.into(),
            mime_type: mime_type.into(),
            size: 1024,
        }
    }

    fn image(n: u8) -> UploadedImage {
        UploadedImage {
            url: format!("https://res.cloudinary.com/demo/{n}.png"),
            public_id: format!("reviews/{n}"),
        }
    }

    #[test]
    fn reject_plain_text_file() {
        let mut uploads = PendingUploads::new();
        let err = uploads.add(&file("notes.txt", "text/plain"), &allowed()).unwrap_err();
        assert_eq!(
            err,
            FormError::UnsupportedFileType {
                name: "notes.txt".into()
            }
        );
        assert!(uploads.is_empty());
        assert!(validate_images(&[file("a.png", "image/png"), file("b.txt", "text/plain")], &allowed()).is_err());
        assert!(validate_images(&[file("a.png", "image/png"), file("b.webp", "image/webp")], &allowed()).is_ok());
    }

    #[test]
    fn track_uploads_in_selection_order() {
        let mut uploads = PendingUploads::new();
        let a = uploads.add(&file("a.png", "image/png"), &allowed()).unwrap();
        let b = uploads.add(&file("b.jpg", "image/jpeg"), &allowed()).unwrap();
        assert!(uploads.has_pending());
        assert!(uploads.uploaded(b, image(2)));
        assert!(uploads.has_pending());
        assert!(uploads.uploaded(a, image(1)));
        assert!(!uploads.has_pending());
        assert_eq!(
            uploads.urls(),
            vec![
                "https://res.cloudinary.com/demo/1.png".to_string(),
                "https://res.cloudinary.com/demo/2.png".to_string()
            ]
        );
    }

    #[test]
    fn removed_file_is_not_submitted() {
        let mut uploads = PendingUploads::new();
        let a = uploads.add(&file("a.png", "image/png"), &allowed()).unwrap();
        let b = uploads.add(&file("b.png", "image/png"), &allowed()).unwrap();
        uploads.uploaded(a, image(1));
        let removed = uploads.remove(b).unwrap();
        assert!(removed.is_pending());
        assert!(!uploads.uploaded(b, image(2)));
        assert_eq!(uploads.urls().len(), 1);
        let draft = ReviewDraft {
            name: "Casa Lucio".into(),
            address: "Cava Baja 35".into(),
            rating: "5".into(),
        };
        let (_, urls) = draft.validate_with_uploads(&uploads).unwrap();
        assert_eq!(urls, vec!["https://res.cloudinary.com/demo/1.png".to_string()]);
    }

    #[test]
    fn failed_upload_is_dropped() {
        let mut uploads = PendingUploads::new();
        let a = uploads.add(&file("a.png", "image/png"), &allowed()).unwrap();
        assert!(uploads.failed(a).is_some());
        assert!(uploads.is_empty());
        assert!(!uploads.has_pending());
    }

    #[test]
    fn reject_submission_with_pending_uploads() {
        let mut uploads = PendingUploads::new();
        uploads.add(&file("a.png", "image/png"), &allowed()).unwrap();
        let draft = ReviewDraft {
            name: "x".into(),
            address: "y".into(),
            rating: "3".into(),
        };
        assert_eq!(
            draft.validate_with_uploads(&uploads),
            Err(FormError::UploadsPending)
        );
        assert_eq!(
            MovieDraft { title: "Solaris".into() }.validate(&uploads),
            Err(FormError::UploadsPending)
        );
    }

    #[test]
    fn second_submit_while_in_flight_is_a_noop() {
        let mut s = Submission::new("Could not save");
        let t = s.begin().unwrap();
        assert!(s.is_busy());
        assert_eq!(s.label("Save", "Saving..."), "Saving...");
        assert!(s.begin().is_none());
        assert_eq!(s.finish(t, Ok(())), SubmitOutcome::Success);
        assert!(!s.is_busy());
        assert_eq!(s.label("Save", "Saving..."), "Save");
        assert!(s.begin().is_some());
    }

    #[test]
    fn failed_submit_restores_control() {
        let mut s = Submission::new("Could not save");
        let t = s.begin().unwrap();
        let outcome = s.finish(t, Err(Failure::from_status(400, Some("Dirección es requerida".into()))));
        assert_eq!(outcome, SubmitOutcome::Failed("Dirección es requerida".into()));
        assert!(!s.is_busy());
        let t = s.begin().unwrap();
        let outcome = s.finish(t, Err(Failure::Transport("offline".into())));
        assert_eq!(outcome, SubmitOutcome::Failed("Could not save".into()));
        let t = s.begin().unwrap();
        assert_eq!(s.finish(t, Err(Failure::Unauthorized)), SubmitOutcome::Logout);
    }

    #[test]
    fn abandoned_submission_is_stale() {
        let mut s = Submission::new("Could not save");
        let t = s.begin().unwrap();
        s.abandon();
        assert_eq!(s.finish(t, Ok(())), SubmitOutcome::Stale);
        assert!(!s.is_busy());
    }

    #[test]
    fn validate_review_draft() {
        let mut draft = ReviewDraft {
            name: "  Casa Lucio ".into(),
            address: "Cava Baja 35".into(),
            rating: "4".into(),
        };
        let review = draft.validate().unwrap();
        assert_eq!(review.name, "Casa Lucio");
        assert_eq!(review.rating, 4);
        draft.rating = "7".into();
        assert_eq!(draft.validate(), Err(FormError::Rating(RatingError::OutOfRange)));
        draft.name = " ".into();
        assert_eq!(draft.validate(), Err(FormError::MissingField("Name")));
    }

    #[test]
    fn movie_poster_is_optional() {
        let movie = MovieDraft { title: "Solaris".into() }
            .validate(&PendingUploads::new())
            .unwrap();
        assert!(movie.image_url.is_none());
        let mut uploads = PendingUploads::new();
        let id = uploads.add(&file("p.gif", "image/gif"), &allowed()).unwrap();
        uploads.uploaded(id, image(7));
        let movie = MovieDraft { title: "Solaris".into() }.validate(&uploads).unwrap();
        assert_eq!(movie.image_url.as_deref(), Some("https://res.cloudinary.com/demo/7.png"));
    }

    #[test]
    fn room_requires_coordinates() {
        let mut draft = RoomDraft {
            name: "Sala 1".into(),
            address: "Gran Via 1".into(),
            coordinates: CoordinateFields::default(),
        };
        assert_eq!(draft.validate(), Err(FormError::MissingCoordinates));
        draft.coordinates = CoordinateFields {
            lat: "40.42".into(),
            lng: "-3.70".into(),
        };
        let room = draft.validate().unwrap();
        assert_eq!(room.coordinates.lat, Some(40.42));
    }

    #[test]
    fn screening_date_gets_seconds() {
        let mut draft = ScreeningDraft {
            room_name: "Sala 1".into(),
            movie_title: "Solaris".into(),
            starts_at: "2024-05-01T20:30".into(),
        };
        assert_eq!(draft.validate().unwrap().starts_at, "2024-05-01T20:30:00");
        draft.starts_at = "tomorrow".into();
        assert_eq!(draft.validate(), Err(FormError::InvalidDate));
        draft.starts_at = String::new();
        assert_eq!(draft.validate(), Err(FormError::MissingField("Date")));
    }

    #[test]
    fn form_errors_become_validation_failures() {
        let f = Failure::from(FormError::MissingCoordinates);
        assert_eq!(
            f.user_message("generic"),
            "Select a suggested address or enter the coordinates"
        );
    }
}
