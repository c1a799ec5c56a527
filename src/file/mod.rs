//! Upload storage for photocast.
//!
//! Uploaded images are written flat into one directory under generated
//! `imageFile-<unix-millis><ext>` names. Nothing is ever deleted.

mod metadata;
mod storage;

pub use metadata::UploadedFile;
pub use storage::{FileStorage, STORED_NAME_PREFIX};
