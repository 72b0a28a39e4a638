use base64::{engine::general_purpose::STANDARD, Engine};

/// An image received as a `data:<mime>;base64,<payload>` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base64Image {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl Base64Image {
    const INVALID: &'static str = "Invalid image format.";

    /// The stored mime type comes from the decoded bytes, not from the declared header.
    pub fn decode(data: &str) -> Result<Self, String> {
        let (header, payload) = data
            .split_once(";base64,")
            .ok_or_else(|| Self::INVALID.to_owned())?;

        let declared = header
            .strip_prefix("data:")
            .ok_or_else(|| Self::INVALID.to_owned())?;
        if !declared.starts_with("image/") {
            return Err(Self::INVALID.to_owned());
        }

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|_| Self::INVALID.to_owned())?;
        let format = image::guess_format(&bytes).map_err(|_| Self::INVALID.to_owned())?;

        Ok(Self {
            bytes,
            mime: format.to_mime_type().to_owned(),
        })
    }
}

pub fn encode(bytes: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

#[cfg(test)]
pub(crate) const PIXEL_PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_png_data_uri() {
        let image = Base64Image::decode(PIXEL_PNG).unwrap();

        assert_eq!(image.mime, "image/png");
        assert_eq!(&image.bytes[1..4], b"PNG");
    }

    #[test]
    fn encoding_restores_the_data_uri() {
        let image = Base64Image::decode(PIXEL_PNG).unwrap();

        assert_eq!(encode(&image.bytes, &image.mime), PIXEL_PNG);
    }

    #[test]
    fn rejects_missing_header() {
        assert!(Base64Image::decode("iVBORw0KGgo=").is_err());
    }

    #[test]
    fn rejects_non_image_mime() {
        assert!(Base64Image::decode("data:text/plain;base64,aGVsbG8=").is_err());
    }

    #[test]
    fn rejects_bytes_that_are_not_an_image() {
        assert!(Base64Image::decode("data:image/png;base64,aGVsbG8gd29ybGQ=").is_err());
    }

    #[test]
    fn rejects_broken_base64() {
        assert!(Base64Image::decode("data:image/png;base64,***").is_err());
    }
}
