//! Station catalog: the static table of stations and the lines serving them.
//!
//! Loaded once at startup from `mtr_location.json` and never mutated.
//! Provides nearest-station resolution and multi-line disambiguation.

mod error;
mod loader;
mod nearest;
mod policy;
mod table;

pub use error::{CatalogError, StationNotFound};
pub use loader::StationRow;
pub use nearest::{NearestStation, nearest};
pub use policy::LinePolicy;
pub use table::{LineGroup, StationCatalog, StationRecord};
