use image::ImageFormat;

/// The formats an upload is allowed to arrive in. Everything is re-encoded
/// to JPEG on the way out, so this only gates decoding.
pub const ALLOWED_FORMATS: [ImageFormat; 4] = [
	ImageFormat::Jpeg,
	ImageFormat::Png,
	ImageFormat::Gif,
	ImageFormat::WebP,
];

/// The maximum file size an image may be in order to be optimized.
///
/// This value is in MiB.
pub const MAXIMUM_FILE_SIZE: u64 = MIB * 10;

/// Images are downscaled to fit within a square of this many pixels per side.
/// Smaller images are never upscaled.
pub const MAXIMUM_DIMENSION: u32 = 1200;

/// Quality used when re-encoding to JPEG, 0-100.
pub const JPEG_QUALITY: u8 = 85;

/// The size of 1MiB in bytes
const MIB: u64 = 1_048_576;
