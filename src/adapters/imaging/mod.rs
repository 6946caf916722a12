pub mod annotate;
pub mod decoder;
