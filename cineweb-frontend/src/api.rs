use web_sys::File;

use cineweb_core::{form::FileInfo, Failure};
use cineweb_frontend_api::Error;

pub use cineweb_frontend_api::*;

pub fn failure(err: Error) -> Failure {
    match err {
        Error::Fetch(msg) => Failure::Transport(msg),
        Error::Api { status, message } => Failure::from_status(status, message),
    }
}

// JS numbers are safe integers up to 2^53.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn file_info(file: &File) -> FileInfo {
    FileInfo {
        name: file.name(),
        mime_type: file.type_(),
        size: file.size() as u64,
    }
}
