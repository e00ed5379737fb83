use thiserror::Error;

/// Hard failures. Each one aborts the single merge or tonemap call that
/// raised it; callers decide whether to skip the group and carry on.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No images provided for HDR merge")]
    NoImages,

    #[error("Number of exposure times ({times}) must match number of images ({images})")]
    ExposureCountMismatch { images: usize, times: usize },

    #[error("Exposure times must be positive values, got {0}")]
    InvalidExposureTime(f64),

    #[error("Image dimensions differ: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Unknown tonemap operator: {0}")]
    UnknownOperator(String),

    #[error("Invalid tone parameter {name}: {value}")]
    InvalidToneParameter { name: &'static str, value: f32 },

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
