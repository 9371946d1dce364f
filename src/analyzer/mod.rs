pub mod ffprobe;

pub use ffprobe::{parse_audio_streams, scan};
