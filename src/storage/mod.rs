#[cfg(test)]
pub(crate) mod memory;
pub mod s3;
pub mod traits;

#[cfg(test)]
pub(crate) use memory::MemoryObjectStore;
pub use s3::S3ObjectStore;
pub use traits::ObjectStore;

pub const AUDIO_CONTENT_TYPE: &str = "audio/wav";
pub const IMAGE_CONTENT_TYPE: &str = "image/png";

/// Fresh `<uuid>.<extension>` object key.
pub fn new_object_key(extension: &str) -> String {
    format!("{}.{}", uuid::Uuid::new_v4(), extension)
}
