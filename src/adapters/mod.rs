pub mod file;
pub mod http;
pub mod imaging;
pub mod onnx;
pub mod v4l2;
