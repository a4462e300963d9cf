//! Playlist data model and playlist-file parsing.
//!
//! A source's index is read into an immutable `PlaylistCatalog`; a single
//! playlist file expands to an ordered `ResolvedFileList` whose order is the
//! playback (and copy) order.

mod model;
mod parse;

pub use model::*;
pub use parse::*;
