//! Content classification by file signature.
//!
//! Response headers are ignored; only the leading bytes decide.

/// Number of leading bytes inspected.
pub const INSPECTED_LEN: usize = 10;

/// Image formats recognised by their magic numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ImageSignature {
    Bmp,
    Jpeg,
    Png,
    Jpeg2000,
    Tiff,
}

const SIGNATURES: [(ImageSignature, &[u8]); 6] = [
    (ImageSignature::Bmp, &[0x42, 0x4D]),
    (ImageSignature::Jpeg, &[0xFF, 0xD8, 0xFF]),
    (
        ImageSignature::Png,
        &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
    ),
    (
        ImageSignature::Jpeg2000,
        &[0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20],
    ),
    (ImageSignature::Tiff, &[0x49, 0x49, 0x2A, 0x00]),
    (ImageSignature::Tiff, &[0x4D, 0x4D, 0x00, 0x2A]),
];

/// Detects the image format of a payload. Payloads shorter than a
/// signature never match it.
#[must_use]
pub fn detect(bytes: &[u8]) -> Option<ImageSignature> {
    let head = &bytes[..bytes.len().min(INSPECTED_LEN)];
    SIGNATURES
        .iter()
        .find(|(_, magic)| head.starts_with(magic))
        .map(|(signature, _)| *signature)
}

/// Returns true if the payload starts with a known image signature.
#[must_use]
pub fn is_image_data(bytes: &[u8]) -> bool {
    detect(bytes).is_some()
}
