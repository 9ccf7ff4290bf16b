//! Country flags: URL construction, download and decoding into a grid of
//! colours small enough to draw with half-block characters.

use anyhow::{anyhow, Context, Result};
use image::imageops::FilterType;
use reqwest::blocking::Client;

pub const DEFAULT_FLAG_URL_BASE: &str = "https://flagcdn.com/w40";

/// Width of a decoded flag in terminal columns
pub const FLAG_COLUMNS: u32 = 20;

/// Flag URL for a region, empty when the region is unknown
pub fn flag_url(base: &str, region_code: Option<&str>) -> String {
    match region_code {
        Some(code) if !code.is_empty() => format!(
            "{}/{}.png",
            base.trim_end_matches('/'),
            code.to_lowercase()
        ),
        _ => String::new(),
    }
}

/// Downloads raw flag image bytes
pub trait FlagFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

pub struct FlagCdnFetcher {
    client: Client,
}

impl FlagCdnFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl FlagFetcher for FlagCdnFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Request to {} failed", url))?;
        if !response.status().is_success() {
            return Err(anyhow!("Flag request returned HTTP {}", response.status()));
        }
        Ok(response.bytes()?.to_vec())
    }
}

/// A decoded flag: `width` x `height` RGB pixels, row-major.
///
/// `height` is always even so two pixel rows fit one text row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 3]>,
}

impl FlagImage {
    /// Decode PNG/JPEG/WebP bytes and scale to `columns` pixels wide
    pub fn decode(bytes: &[u8], columns: u32) -> Result<Self> {
        let image = image::load_from_memory(bytes).context("Could not decode flag image")?;
        if image.width() == 0 || image.height() == 0 || columns == 0 {
            return Err(anyhow!("Flag image has no pixels"));
        }

        let scaled = (columns as f64 * image.height() as f64 / image.width() as f64).round() as u32;
        let height = (scaled.max(2) + 1) & !1;

        let rgb = image
            .resize_exact(columns, height, FilterType::Triangle)
            .to_rgb8();
        let pixels = rgb.pixels().map(|p| p.0).collect();

        Ok(Self {
            width: columns,
            height,
            pixels,
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Number of text rows needed to draw the flag
    pub fn text_rows(&self) -> u16 {
        (self.height / 2) as u16
    }
}

/// Download and decode a flag; `None` on any failure
pub fn load_flag(fetcher: &dyn FlagFetcher, url: &str) -> Option<FlagImage> {
    let result = fetcher
        .fetch(url)
        .and_then(|bytes| FlagImage::decode(&bytes, FLAG_COLUMNS));

    match result {
        Ok(flag) => Some(flag),
        Err(e) => {
            tracing::warn!(target: "flags", "Flag {} unavailable: {:#}", url, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn two_band_png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_fn(width, height, |_, y| {
            if y < height / 2 {
                Rgb([255, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    struct StaticFetcher(Result<Vec<u8>, String>);

    impl FlagFetcher for StaticFetcher {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
            self.0.clone().map_err(|e| anyhow!(e))
        }
    }

    #[test]
    fn test_flag_url() {
        assert_eq!(
            flag_url(DEFAULT_FLAG_URL_BASE, Some("ID")),
            "https://flagcdn.com/w40/id.png"
        );
        assert_eq!(flag_url("https://example.com/flags/", Some("US")), "https://example.com/flags/us.png");
        assert_eq!(flag_url(DEFAULT_FLAG_URL_BASE, None), "");
        assert_eq!(flag_url(DEFAULT_FLAG_URL_BASE, Some("")), "");
    }

    #[test]
    fn test_decode_scales_to_columns() {
        // Indonesia's flag is 40x27 at w40
        let flag = FlagImage::decode(&two_band_png(40, 27), FLAG_COLUMNS).unwrap();
        assert_eq!(flag.width, FLAG_COLUMNS);
        assert_eq!(flag.height % 2, 0);
        assert_eq!(flag.height, 14);
        assert_eq!(flag.text_rows(), 7);
        assert_eq!(flag.pixels.len(), (flag.width * flag.height) as usize);

        assert_eq!(flag.pixel(0, 0), Some([255, 0, 0]));
        assert_eq!(flag.pixel(0, flag.height - 1), Some([255, 255, 255]));
        assert_eq!(flag.pixel(flag.width, 0), None);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(FlagImage::decode(b"not an image", FLAG_COLUMNS).is_err());
    }

    #[test]
    fn test_load_flag_is_best_effort() {
        let ok = StaticFetcher(Ok(two_band_png(40, 20)));
        assert!(load_flag(&ok, "https://flagcdn.com/w40/id.png").is_some());

        let down = StaticFetcher(Err("503".to_string()));
        assert!(load_flag(&down, "https://flagcdn.com/w40/id.png").is_none());

        let corrupt = StaticFetcher(Ok(vec![0, 1, 2, 3]));
        assert!(load_flag(&corrupt, "https://flagcdn.com/w40/id.png").is_none());
    }
}
