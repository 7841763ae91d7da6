//! # 像素网格模块
//!
//! 隐写核心只通过 [`PixelGrid`] 访问像素，不关心图像来自哪种文件格式。
//! 本模块为 `image` crate 的 RGBA8 与 RGB8 缓冲区提供了实现。

use image::{Rgb, RgbImage, Rgba, RgbaImage};

/// 一个像素的三个颜色通道 `[R, G, B]`。
pub type Channels = [u8; 3];

/// 可按坐标读写 RGB 通道的矩形像素网格。
///
/// 坐标满足 `0 <= x < width()` 且 `0 <= y < height()`，越界访问会 panic。
pub trait PixelGrid {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// 读取 `(x, y)` 处像素的 RGB 通道。
    fn get(&self, x: u32, y: u32) -> Channels;

    /// 写入 `(x, y)` 处像素的 RGB 通道。若网格带有 Alpha 通道，其值保持不变。
    fn set(&mut self, x: u32, y: u32, rgb: Channels);

    /// 创建一个同类型、全黑且完全不透明的新网格。
    fn blank(width: u32, height: u32) -> Self
    where
        Self: Sized;

    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

impl PixelGrid for RgbaImage {
    fn width(&self) -> u32 {
        RgbaImage::width(self)
    }

    fn height(&self) -> u32 {
        RgbaImage::height(self)
    }

    fn get(&self, x: u32, y: u32) -> Channels {
        let Rgba([r, g, b, _]) = *self.get_pixel(x, y);
        [r, g, b]
    }

    fn set(&mut self, x: u32, y: u32, [r, g, b]: Channels) {
        let pixel = self.get_pixel_mut(x, y);
        pixel.0[..3].copy_from_slice(&[r, g, b]);
    }

    fn blank(width: u32, height: u32) -> Self {
        RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, u8::MAX]))
    }
}

impl PixelGrid for RgbImage {
    fn width(&self) -> u32 {
        RgbImage::width(self)
    }

    fn height(&self) -> u32 {
        RgbImage::height(self)
    }

    fn get(&self, x: u32, y: u32) -> Channels {
        self.get_pixel(x, y).0
    }

    fn set(&mut self, x: u32, y: u32, rgb: Channels) {
        self.put_pixel(x, y, Rgb(rgb));
    }

    fn blank(width: u32, height: u32) -> Self {
        RgbImage::new(width, height)
    }
}
