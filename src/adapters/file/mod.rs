pub mod file_sink;
pub mod image_source;
