//! Sprite assets: manifest, PNG decoding and availability
//!
//! Loading never fails the game. Every manifest entry settles either as a
//! decoded image or as a recorded failure, and the presentation layer falls
//! back to a solid fill for anything that is missing.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::sim::ObstacleKind;

/// Identifies one sprite slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetKey {
    Player,
    Background,
    Obstacle(ObstacleKind),
    /// Index into the configured landmark list
    Landmark(usize),
}

impl AssetKey {
    pub fn label(&self) -> String {
        match self {
            AssetKey::Player => "player".to_string(),
            AssetKey::Background => "background".to_string(),
            AssetKey::Obstacle(kind) => format!("obstacle:{}", kind.as_str()),
            AssetKey::Landmark(index) => format!("landmark:{}", index),
        }
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("invalid PNG: {0}")]
    Decode(#[from] png::DecodingError),
    #[error("unsupported PNG format: {0}")]
    UnsupportedFormat(String),
}

/// Relative image path for every sprite slot, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetManifest {
    entries: Vec<(AssetKey, String)>,
}

impl AssetManifest {
    /// Add or replace the path for `key`
    pub fn insert(&mut self, key: AssetKey, path: &str) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = path.to_string(),
            None => self.entries.push((key, path.to_string())),
        }
    }

    pub fn path(&self, key: AssetKey) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, p)| p.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetKey, &str)> {
        self.entries.iter().map(|(k, p)| (*k, p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An image decoded to tightly packed 8-bit RGBA
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decode PNG bytes into RGBA8, expanding palette, grey and RGB inputs
pub fn decode_png(bytes: &[u8]) -> Result<DecodedImage, AssetError> {
    let mut decoder = png::Decoder::new(std::io::Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;

    let (color_type, bit_depth) = reader.output_color_type();
    if bit_depth != png::BitDepth::Eight {
        return Err(AssetError::UnsupportedFormat(format!("bit depth {:?}", bit_depth)));
    }
    let channels = match color_type {
        png::ColorType::Rgba => 4,
        png::ColorType::Rgb => 3,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Grayscale => 1,
        other => {
            return Err(AssetError::UnsupportedFormat(format!("color type {:?}", other)));
        }
    };

    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    let pixels = width as usize * height as usize;
    let mut buf = vec![0u8; pixels * channels];
    reader.next_frame(&mut buf)?;

    let rgba = match channels {
        4 => buf,
        3 => buf
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        2 => buf
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0], px[1]])
            .collect(),
        _ => buf.iter().flat_map(|&g| [g, g, g, 255]).collect(),
    };

    Ok(DecodedImage {
        width,
        height,
        rgba,
    })
}

/// Which sprite slots have a usable image
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetAvailability {
    available: BTreeMap<AssetKey, bool>,
    /// Pixel size of the background image, when it loaded
    background_size: Option<(u32, u32)>,
}

impl AssetAvailability {
    /// Every slot in the manifest marked unavailable
    pub fn none(manifest: &AssetManifest) -> Self {
        Self {
            available: manifest.iter().map(|(key, _)| (key, false)).collect(),
            background_size: None,
        }
    }

    pub fn mark_available(&mut self, key: AssetKey, size: Option<(u32, u32)>) {
        self.available.insert(key, true);
        if key == AssetKey::Background {
            self.background_size = size;
        }
    }

    pub fn mark_missing(&mut self, key: AssetKey) {
        self.available.insert(key, false);
        if key == AssetKey::Background {
            self.background_size = None;
        }
    }

    pub fn is_available(&self, key: AssetKey) -> bool {
        self.available.get(&key).copied().unwrap_or(false)
    }

    /// Width of one background tile once scaled to `canvas_height`
    pub fn background_width(&self, canvas_height: f32) -> Option<f32> {
        if !self.is_available(AssetKey::Background) {
            return None;
        }
        let (w, h) = self.background_size?;
        if w == 0 || h == 0 {
            return None;
        }
        Some(w as f32 * canvas_height / h as f32)
    }

    pub fn available_count(&self) -> usize {
        self.available.values().filter(|&&ok| ok).count()
    }

    /// Number of slots the loader settled
    pub fn len(&self) -> usize {
        self.available.len()
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }
}

/// Decoded sprites plus the slots that failed
#[derive(Debug, Default)]
pub struct AssetStore {
    images: BTreeMap<AssetKey, DecodedImage>,
    failures: Vec<(AssetKey, String)>,
}

impl AssetStore {
    /// Decode `bytes` into the slot, recording a failure if they are not a PNG
    pub fn insert_bytes(&mut self, key: AssetKey, source: &str, bytes: &[u8]) {
        match decode_png(bytes) {
            Ok(image) => {
                log::debug!(
                    "Loaded {} from {} ({}x{})",
                    key.label(),
                    source,
                    image.width,
                    image.height
                );
                self.images.insert(key, image);
            }
            Err(err) => self.record_failure(key, err),
        }
    }

    pub fn record_failure(&mut self, key: AssetKey, err: AssetError) {
        log::warn!("Asset {} unavailable, using solid fill: {}", key.label(), err);
        self.images.remove(&key);
        self.failures.push((key, err.to_string()));
    }

    pub fn image(&self, key: AssetKey) -> Option<&DecodedImage> {
        self.images.get(&key)
    }

    pub fn images(&self) -> impl Iterator<Item = (AssetKey, &DecodedImage)> {
        self.images.iter().map(|(k, img)| (*k, img))
    }

    pub fn failures(&self) -> &[(AssetKey, String)] {
        &self.failures
    }

    /// Availability over the whole manifest, failures included
    pub fn availability(&self, manifest: &AssetManifest) -> AssetAvailability {
        let mut availability = AssetAvailability::none(manifest);
        for (key, image) in &self.images {
            availability.mark_available(*key, Some((image.width, image.height)));
        }
        availability
    }

    /// Read every manifest entry from a directory on disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_dir(root: &std::path::Path, manifest: &AssetManifest) -> Self {
        let mut store = Self::default();
        for (key, path) in manifest.iter() {
            let full = root.join(path);
            match std::fs::read(&full) {
                Ok(bytes) => store.insert_bytes(key, &full.display().to_string(), &bytes),
                Err(source) => store.record_failure(
                    key,
                    AssetError::Io {
                        path: full.display().to_string(),
                        source,
                    },
                ),
            }
        }
        log::info!(
            "Asset loading settled: {} loaded, {} missing",
            store.images.len(),
            store.failures.len()
        );
        store
    }

    /// Fetch every manifest entry relative to `base_url`
    #[cfg(target_arch = "wasm32")]
    pub async fn fetch(base_url: &str, manifest: &AssetManifest) -> Self {
        let mut store = Self::default();
        for (key, path) in manifest.iter() {
            let url = if base_url.is_empty() {
                path.to_string()
            } else {
                format!("{}/{}", base_url.trim_end_matches('/'), path)
            };
            match fetch_bytes(&url).await {
                Ok(bytes) => store.insert_bytes(key, &url, &bytes),
                Err(err) => store.record_failure(key, err),
            }
        }
        log::info!(
            "Asset loading settled: {} loaded, {} missing",
            store.images.len(),
            store.failures.len()
        );
        store
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_bytes(url: &str) -> Result<Vec<u8>, AssetError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let fail = |reason: String| AssetError::Fetch {
        url: url.to_string(),
        reason,
    };

    let window = web_sys::window().ok_or_else(|| fail("no window".to_string()))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| fail(format!("{:?}", e)))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|_| fail("not a Response".to_string()))?;
    if !response.ok() {
        return Err(fail(format!("HTTP {}", response.status())));
    }
    let buffer = response.array_buffer().map_err(|e| fail(format!("{:?}", e)))?;
    let buffer = JsFuture::from(buffer)
        .await
        .map_err(|e| fail(format!("{:?}", e)))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        out
    }

    fn manifest() -> AssetManifest {
        let mut manifest = AssetManifest::default();
        manifest.insert(AssetKey::Player, "images/player.png");
        manifest.insert(AssetKey::Background, "images/background.png");
        manifest.insert(AssetKey::Obstacle(ObstacleKind::Cone), "images/cone.png");
        manifest
    }

    #[test]
    fn test_decode_rgba() {
        let data = [255, 0, 0, 255, 0, 255, 0, 128];
        let image = decode_png(&encode(2, 1, png::ColorType::Rgba, &data)).unwrap();
        assert_eq!((image.width, image.height), (2, 1));
        assert_eq!(image.rgba, data);
    }

    #[test]
    fn test_decode_expands_rgb_and_grey() {
        let rgb = decode_png(&encode(1, 2, png::ColorType::Rgb, &[1, 2, 3, 4, 5, 6])).unwrap();
        assert_eq!(rgb.rgba, [1, 2, 3, 255, 4, 5, 6, 255]);

        let grey = decode_png(&encode(2, 1, png::ColorType::Grayscale, &[10, 20])).unwrap();
        assert_eq!(grey.rgba, [10, 10, 10, 255, 20, 20, 20, 255]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_png(b"not a png"), Err(AssetError::Decode(_))));
        assert!(decode_png(&[]).is_err());
    }

    #[test]
    fn test_manifest_insert_replaces() {
        let mut manifest = manifest();
        manifest.insert(AssetKey::Player, "images/runner.png");
        assert_eq!(manifest.len(), 3);
        assert_eq!(manifest.path(AssetKey::Player), Some("images/runner.png"));
        assert_eq!(manifest.path(AssetKey::Landmark(0)), None);
    }

    #[test]
    fn test_store_availability_with_partial_failure() {
        let manifest = manifest();
        let mut store = AssetStore::default();
        let png = encode(4, 2, png::ColorType::Rgba, &[200; 32]);
        store.insert_bytes(AssetKey::Background, "mem", &png);
        store.insert_bytes(AssetKey::Player, "mem", b"broken");

        let availability = store.availability(&manifest);
        assert_eq!(availability.len(), 3);
        assert_eq!(availability.available_count(), 1);
        assert!(availability.is_available(AssetKey::Background));
        assert!(!availability.is_available(AssetKey::Player));
        assert!(!availability.is_available(AssetKey::Obstacle(ObstacleKind::Cone)));
        assert_eq!(store.failures().len(), 1);
        // 4x2 image drawn 400 high is 800 wide
        assert_eq!(availability.background_width(400.0), Some(800.0));
    }

    #[test]
    fn test_background_width_needs_background() {
        let mut availability = AssetAvailability::none(&manifest());
        assert_eq!(availability.background_width(400.0), None);
        availability.mark_available(AssetKey::Background, Some((0, 10)));
        assert_eq!(availability.background_width(400.0), None);
        availability.mark_missing(AssetKey::Background);
        assert!(!availability.is_available(AssetKey::Background));
    }

    #[test]
    fn test_load_from_missing_dir_settles() {
        let manifest = manifest();
        let store = AssetStore::load_from_dir(std::path::Path::new("/nonexistent/assets"), &manifest);
        assert_eq!(store.failures().len(), manifest.len());
        assert_eq!(store.availability(&manifest).available_count(), 0);
    }
}
