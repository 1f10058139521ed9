//! 二维码编码
//!
//! 纠错等级、输出宽度、边距均为固定值；相同输入总是得到相同的图像。

use crate::error::{CertError, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{GrayImage, ImageFormat, Luma};
use qrcode::render::svg;
use qrcode::{Color, EcLevel, QrCode};
use std::io::Cursor;

/// 编码参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrOptions {
    pub ec_level: EcLevel,
    /// 输出图像边长（像素）
    pub width: u32,
    /// 四周留白（模块数）
    pub margin: u32,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            ec_level: EcLevel::H,
            width: 300,
            margin: 2,
        }
    }
}

/// 已生成的 PNG 图像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrImage {
    pub png: Vec<u8>,
}

impl QrImage {
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

fn build_code(url: &str, options: &QrOptions) -> Result<QrCode> {
    QrCode::with_error_correction_level(url.as_bytes(), options.ec_level)
        .map_err(|err| CertError::qr(err.to_string()))
}

/// 将 URL 编码为灰度 PNG
pub fn encode_png(url: &str, options: &QrOptions) -> Result<QrImage> {
    let code = build_code(url, options)?;
    let modules = code.width();
    let colors = code.to_colors();

    let total_modules = modules as u32 + options.margin * 2;
    if options.width < total_modules {
        return Err(CertError::qr(format!(
            "width {} too small for {} modules",
            options.width, total_modules
        )));
    }

    // 模块按浮点比例缩放，像素坐标向下取整映射回模块
    let scale = options.width as f64 / total_modules as f64;
    let size = options.width;
    let scaled_margin = (options.margin as f64 * scale).floor() as u32;

    let raster = GrayImage::from_fn(size, size, |x, y| {
        let inside = x >= scaled_margin
            && y >= scaled_margin
            && x < size - scaled_margin
            && y < size - scaled_margin;
        if !inside {
            return Luma([255u8]);
        }
        let col = (((x - scaled_margin) as f64 / scale).floor() as usize).min(modules - 1);
        let row = (((y - scaled_margin) as f64 / scale).floor() as usize).min(modules - 1);
        match colors[row * modules + col] {
            Color::Dark => Luma([0u8]),
            Color::Light => Luma([255u8]),
        }
    });

    let mut png = Vec::new();
    raster.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(QrImage { png })
}

/// 将 URL 编码为 SVG 字符串
pub fn encode_svg(url: &str, options: &QrOptions) -> Result<String> {
    let code = build_code(url, options)?;
    Ok(code
        .render::<svg::Color<'_>>()
        .min_dimensions(options.width, options.width)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build())
}
