pub mod image;
pub mod music;
pub mod request;
pub mod response;
pub mod storage;
pub mod text;

pub use image::*;
pub use music::*;
pub use request::*;
pub use response::*;
pub use storage::*;
pub use text::*;
