//! TOML route source backed by [`FileSource`].
//!
//! Routes are written as an array of tables:
//!
//! ```toml
//! [[routes]]
//! incoming_path = "/foo"
//! redirect_to = "/bar"
//! ```

use std::path::PathBuf;

use super::file_source::FileSource;
use crate::store::model::RouteSet;

#[must_use]
pub fn new(path: PathBuf) -> FileSource {
    FileSource::new(path, "toml", |content| {
        toml::from_str::<RouteSet>(content)
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
    })
}
