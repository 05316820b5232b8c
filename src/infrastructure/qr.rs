use crate::domain::ports::QrRenderer;
use crate::error::{PixError, Result};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

/// Renders payloads as 256px black-on-white PNG QR codes, returned as
/// `data:image/png;base64,...` URLs.
///
/// Uses error-correction level M, which is what Pix payment apps expect from
/// printed and on-screen codes.
#[derive(Default, Clone)]
pub struct PngRenderer;

impl PngRenderer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl QrRenderer for PngRenderer {
    async fn render(&self, payload: &str) -> Result<String> {
        let payload = payload.to_string();

        // Rasterization is CPU-bound; keep it off the async workers.
        let png = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
            let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
                .map_err(|e| PixError::Render(e.to_string()))?;
            let image = code
                .render::<Luma<u8>>()
                .min_dimensions(256, 256)
                .build();

            let mut png = Vec::new();
            image
                .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
                .map_err(|e| PixError::Render(e.to_string()))?;
            Ok(png)
        })
        .await
        .map_err(|e| PixError::Render(e.to_string()))??;

        Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_renders_data_url() {
        let renderer = PngRenderer::new();
        let image = renderer
            .render("00020101021226360014BR.GOV.BCB.PIX0114+55119999999996304ABCD")
            .await
            .unwrap();
        assert!(image.starts_with("data:image/png;base64,"));
        assert!(image.len() > 100);
    }

    #[tokio::test]
    async fn test_render_is_deterministic() {
        let renderer = PngRenderer::new();
        let a = renderer.render("000201").await.unwrap();
        let b = renderer.render("000201").await.unwrap();
        assert_eq!(a, b);
    }
}
