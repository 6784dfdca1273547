//! Image decoding and encoding at the edges of the pipeline.
//!
//! - [`decode_image`]: bytes → upright RGBA, with RAW preview extraction
//! - [`encode_jpeg`]: finished canvas → JPEG bytes

pub mod decode;
pub mod encoder;
pub mod orientation;

pub use decode::{decode_embedded_preview, decode_image, extract_jpegs};
pub use encoder::encode_jpeg;
pub use orientation::{apply_orientation, read_exif_orientation};
