pub mod beats;

pub use beats::{summarize, BeatReport};
