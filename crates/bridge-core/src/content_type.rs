//! Shared content-type tables used by the attachment processor.

/// File extensions (without the leading dot, lowercase) treated as text
/// documents even when the chat platform reports no MIME type.
const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "markdown", "rs", "py", "js", "ts", "jsx", "tsx", "go", "java", "c", "h", "cpp",
    "hpp", "cs", "rb", "php", "sh", "bash", "zsh", "yaml", "yml", "json", "toml", "ini", "cfg",
    "conf", "log", "csv", "tsv", "sql", "html", "css", "xml", "diff", "patch",
];

/// Whether `extension` (case-insensitive, no leading dot) is a known text
/// extension.
pub fn is_known_text_extension(extension: &str) -> bool {
    let lower = extension.to_ascii_lowercase();
    TEXT_EXTENSIONS.contains(&lower.as_str())
}

/// Magic-byte sniffing result for image formats understood by the agent
/// SDK's `image` content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
}

impl ImageFormat {
    pub fn media_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
        }
    }
}

/// Sniff the image format from leading magic bytes. Returns `None` if the
/// bytes don't match any known image signature.
pub fn sniff_image_format(bytes: &[u8]) -> Option<ImageFormat> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some(ImageFormat::Png)
    } else if bytes.starts_with(b"\xff\xd8\xff") {
        Some(ImageFormat::Jpeg)
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some(ImageFormat::Gif)
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some(ImageFormat::WebP)
    } else {
        None
    }
}

/// Whether `bytes` begins with the PDF magic header.
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_known_text_extensions() {
        assert!(is_known_text_extension("RS"));
        assert!(is_known_text_extension("py"));
        assert!(!is_known_text_extension("xlsx"));
    }

    #[test]
    fn sniffs_png_magic_bytes() {
        let bytes = b"\x89PNG\r\n\x1a\nrest-of-file";
        assert_eq!(sniff_image_format(bytes), Some(ImageFormat::Png));
    }

    #[test]
    fn sniffs_jpeg_magic_bytes() {
        let bytes = [0xff, 0xd8, 0xff, 0xe0, 0x00];
        assert_eq!(sniff_image_format(&bytes), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn sniffs_webp_with_riff_container() {
        let mut bytes = b"RIFF".to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes.extend_from_slice(b"WEBP");
        assert_eq!(sniff_image_format(&bytes), Some(ImageFormat::WebP));
    }

    #[test]
    fn unknown_bytes_sniff_to_none() {
        assert_eq!(sniff_image_format(b"not an image"), None);
    }

    #[test]
    fn recognizes_pdf_header() {
        assert!(is_pdf(b"%PDF-1.4 rest"));
        assert!(!is_pdf(b"plain text"));
    }
}
