pub mod config;
pub mod focus;
pub mod stats;
pub mod task;

use std::path::Path;
use std::rc::Rc;

use pomofocus_core::{Database, KeyValueStore};

/// Open the persistent store: an explicit database file, or the default one
/// under the data directory.
pub fn open_store(db: Option<&Path>) -> Result<Rc<dyn KeyValueStore>, Box<dyn std::error::Error>> {
    let database = match db {
        Some(path) => Database::open_at(path)?,
        None => Database::open()?,
    };
    Ok(Rc::new(database))
}
