pub mod albums;
pub mod builder;
pub mod report;
pub mod scrape;

pub use builder::{BuildOptions, LineupPlaylistBuilder};
pub use report::{AlbumPick, LineupReport};
pub use scrape::{LineupArtist, LineupScraper};
