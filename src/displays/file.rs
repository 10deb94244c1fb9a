// std
use std::path::PathBuf;
// others
use image::{Rgb, RgbImage};
// lumen
use crate::core::display::{Display, PixelBuffer};
use crate::core::error::LumenError;
use crate::core::lumen::Spectrum;

/// Collects buckets in memory and writes an 8-bit sRGB image when
/// the render ends. The format follows the file extension.
#[derive(Debug)]
pub struct FileDisplay {
    filename: PathBuf,
    buffer: PixelBuffer,
}

impl FileDisplay {
    pub fn new<P: Into<PathBuf>>(filename: P) -> Self {
        FileDisplay {
            filename: filename.into(),
            buffer: PixelBuffer::default(),
        }
    }
    pub fn write_image(&self) -> Result<(), LumenError> {
        let (width, height) = self.buffer.dimensions();
        let pixels: Vec<Spectrum> = self.buffer.snapshot();
        let mut img = RgbImage::new(width.max(0) as u32, height.max(0) as u32);
        for (i, c) in pixels.iter().enumerate() {
            let x = (i as i32 % width) as u32;
            let y = (i as i32 / width) as u32;
            img.put_pixel(x, y, Rgb(c.to_srgb8()));
        }
        img.save(&self.filename).map_err(|source| LumenError::ImageOutput {
            filename: self.filename.display().to_string(),
            source,
        })
    }
}

impl Display for FileDisplay {
    fn image_begin(&self, width: i32, height: i32, _bucket_size: i32) {
        self.buffer.resize(width, height);
    }
    fn image_prepare(&self, _x: i32, _y: i32, _w: i32, _h: i32, _id: usize) {}
    fn image_update(&self, x: i32, y: i32, w: i32, h: i32, data: &[Spectrum]) {
        self.buffer.write_region(x, y, w, h, data);
    }
    fn image_end(&self) {
        match self.write_image() {
            Ok(()) => log::info!("wrote {:?}", self.filename),
            Err(e) => log::error!("{}", e),
        }
    }
}
