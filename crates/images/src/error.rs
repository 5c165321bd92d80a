pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("error while loading the image (via the `image` crate): {0}")]
	Image(#[from] image::ImageError),
	#[error("only JPG, PNG, GIF and WEBP images are accepted")]
	Unsupported,
	#[error("the image provided is too large (over 10MiB)")]
	TooLarge,
}
