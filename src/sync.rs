//! Copying a resolved playlist into a destination directory in playback order.
//!
//! Files are renamed `<n> - <basename>` with a zero-padded number so that a
//! name sort matches playback order, then re-touched newest-first so that a
//! modification-time sort does too. Afterwards the filesystem is flushed
//! through a pluggable `FilesystemFlush` strategy.

mod engine;
mod flush;
mod plan;

pub use engine::*;
pub use flush::*;

#[cfg(test)]
mod tests;
