pub type AvatarResult<T> = Result<T, AvatarError>;

#[derive(thiserror::Error, Debug)]
pub enum AvatarError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("resource error: {0}")]
    Resource(String),

    #[error("encoding error: {0}")]
    Encoding(String),
}

impl AvatarError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }
}

impl From<image::ImageError> for AvatarError {
    fn from(err: image::ImageError) -> Self {
        Self::Encoding(err.to_string())
    }
}
