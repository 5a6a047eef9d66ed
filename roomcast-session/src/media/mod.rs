mod local_media;
mod media_stream;

pub use local_media::*;
pub use media_stream::*;
