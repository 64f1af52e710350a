//! Image detection for attachment selection.
//!
//! The resolver keeps the first attachment that either carries an image
//! filename extension or an `image/` content type; both checks live here.

/// Filename extensions accepted as receipt images.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Whether a filename carries one of the accepted image extensions
/// (case-insensitive).
pub fn has_image_extension(filename: &str) -> bool {
    let ext = match filename.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => return false,
    };
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// Whether a content type denotes an image (case-insensitive prefix check).
pub fn is_image(content_type: &str) -> bool {
    content_type.to_lowercase().starts_with("image/")
}

/// MIME type for an image filename, used when re-uploading to the host.
pub fn mime_for_filename(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, e)| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_image_extensions_case_insensitively() {
        assert!(has_image_extension("recibo.png"));
        assert!(has_image_extension("RECIBO.JPEG"));
        assert!(has_image_extension("pago.WebP"));
        assert!(!has_image_extension("factura.pdf"));
        assert!(!has_image_extension("no-extension"));
    }

    #[test]
    fn image_mime_prefix() {
        assert!(is_image("image/png"));
        assert!(is_image("IMAGE/JPEG"));
        assert!(!is_image("application/pdf"));
    }

    #[test]
    fn mime_for_known_and_unknown_filenames() {
        assert_eq!(mime_for_filename("a.jpg"), "image/jpeg");
        assert_eq!(mime_for_filename("a.bin"), "application/octet-stream");
    }
}
