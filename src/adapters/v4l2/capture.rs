use anyhow::{anyhow, Result};
use image::{ImageFormat, RgbImage};
use v4l::format::FourCC;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::Device;

use crate::application::ports::FrameSourcePort;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::source::{CameraId, CameraMode};

/// Cámara V4L2 en vivo como fuente de frames RGB (MJPG o YUYV).
pub struct V4l2Capture {
    stream: Stream<'static>,
    fourcc: FourCC,
    width: u32,
    height: u32,
}

impl V4l2Capture {
    /// Abre el dispositivo y configura formato, FPS y el flujo MMAP.
    pub fn open(camera: &CameraId, mode: &CameraMode) -> Result<Self> {
        let dev = Device::with_path(&camera.path)?;

        let mut fmt = dev.format()?;
        let b = mode.format.as_bytes();
        if b.len() != 4 {
            return Err(anyhow!("FourCC debe tener 4 caracteres"));
        }
        fmt.fourcc = FourCC::new(&[b[0], b[1], b[2], b[3]]);
        fmt.width = mode.size.width;
        fmt.height = mode.size.height;

        // El driver puede ajustar los valores a los más cercanos soportados.
        let actual_fmt = dev.set_format(&fmt)?;

        let mut params = dev.params()?;
        params.interval.numerator = 1;
        params.interval.denominator = mode.fps.max(1);
        let _ = dev.set_params(&params);

        // El stream necesita el dispositivo vivo durante todo el proceso.
        let dev_static: &'static Device = Box::leak(Box::new(dev));
        let stream = Stream::with_buffers(dev_static, v4l::buffer::Type::VideoCapture, 4)?;

        tracing::info!(
            "Cámara abierta: {} {}x{} [{}] a {} FPS",
            camera.path, actual_fmt.width, actual_fmt.height, actual_fmt.fourcc, mode.fps
        );

        Ok(Self {
            stream,
            fourcc: actual_fmt.fourcc,
            width: actual_fmt.width,
            height: actual_fmt.height,
        })
    }

    pub fn next_rgb(&mut self) -> Result<RgbImage> {
        let (data, _) = self.stream.next()?;
        let fcc_str = self.fourcc.str().map_err(|_| anyhow!("FourCC inválido"))?;

        match fcc_str {
            "MJPG" => {
                let img = image::load_from_memory_with_format(data, ImageFormat::Jpeg)?;
                Ok(img.to_rgb8())
            }
            "YUYV" => Ok(yuyv_to_rgb(data, self.width, self.height)),
            _ => Err(anyhow!("Formato de cámara {} no soportado", fcc_str)),
        }
    }
}

impl FrameSourcePort for V4l2Capture {
    fn next_frame(&mut self) -> DomainResult<Option<RgbImage>> {
        self.next_rgb()
            .map(Some)
            .map_err(|e| DomainError::SourceUnavailable(e.to_string()))
    }
}

/// Convierte un buffer YUYV (YUV 4:2:2) a RgbImage.
/// Cada bloque de 4 bytes `[Y0, U, Y1, V]` define dos píxeles (BT.601).
pub fn yuyv_to_rgb(yuyv: &[u8], w: u32, h: u32) -> RgbImage {
    let mut out = RgbImage::new(w, h);

    for (i, chunk) in yuyv.chunks_exact(4).enumerate() {
        let y0 = chunk[0] as f32;
        let u  = chunk[1] as f32 - 128.0;
        let y1 = chunk[2] as f32;
        let v  = chunk[3] as f32 - 128.0;

        let pixel_idx = i as u32 * 2;
        let x = pixel_idx % w;
        let y = pixel_idx / w;

        if y < h {
            out.put_pixel(x, y, yuv_to_rgb(y0, u, v));
            if x + 1 < w {
                out.put_pixel(x + 1, y, yuv_to_rgb(y1, u, v));
            }
        }
    }
    out
}

fn yuv_to_rgb(y: f32, u: f32, v: f32) -> image::Rgb<u8> {
    let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
    let g = (y - 0.344136 * u - 0.714136 * v).clamp(0.0, 255.0) as u8;
    let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;
    image::Rgb([r, g, b])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_chroma_gives_gray() {
        // Dos píxeles por bloque, crominancia neutra (128).
        let data = [200, 128, 50, 128];
        let rgb = yuyv_to_rgb(&data, 2, 1);
        assert_eq!(rgb.get_pixel(0, 0).0, [200, 200, 200]);
        assert_eq!(rgb.get_pixel(1, 0).0, [50, 50, 50]);
    }

    #[test]
    fn short_buffer_leaves_remaining_pixels_black() {
        let data = [255, 128, 255, 128];
        let rgb = yuyv_to_rgb(&data, 2, 2);
        assert_eq!(rgb.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(rgb.get_pixel(0, 1).0, [0, 0, 0]);
    }
}
