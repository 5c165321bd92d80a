use crate::{
	consts::{ALLOWED_FORMATS, JPEG_QUALITY, MAXIMUM_DIMENSION, MAXIMUM_FILE_SIZE},
	error::{Error, Result},
};
use image::{codecs::jpeg::JpegEncoder, imageops::FilterType, GenericImageView};
use std::io::Cursor;

/// An optimized image, re-encoded as JPEG.
#[derive(Debug, Clone)]
pub struct Optimized {
	pub bytes: Vec<u8>,
	pub width: u32,
	pub height: u32,
}

/// Validates, downscales and re-encodes a raw upload.
///
/// The input must sniff as one of [`ALLOWED_FORMATS`] and be at most
/// [`MAXIMUM_FILE_SIZE`] bytes. The decoded image is scaled to fit within
/// [`MAXIMUM_DIMENSION`] on both axes, preserving aspect ratio and never
/// upscaling, then encoded as JPEG at [`JPEG_QUALITY`].
pub fn optimize(data: &[u8]) -> Result<Optimized> {
	if data.len() as u64 > MAXIMUM_FILE_SIZE {
		return Err(Error::TooLarge);
	}

	let format = image::guess_format(data).map_err(|_| Error::Unsupported)?;
	if !ALLOWED_FORMATS.contains(&format) {
		return Err(Error::Unsupported);
	}

	let image = image::load_from_memory_with_format(data, format)?;
	let (width, height) = image.dimensions();

	let image = if width > MAXIMUM_DIMENSION || height > MAXIMUM_DIMENSION {
		image.resize(MAXIMUM_DIMENSION, MAXIMUM_DIMENSION, FilterType::Triangle)
	} else {
		image
	};
	let (width, height) = image.dimensions();

	// JPEG has no alpha channel
	let rgb = image.to_rgb8();

	let mut bytes = Cursor::new(Vec::new());
	let mut encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
	encoder.encode_image(&rgb)?;

	Ok(Optimized {
		bytes: bytes.into_inner(),
		width,
		height,
	})
}
