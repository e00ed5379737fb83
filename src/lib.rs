pub mod hdr_pipeline;
pub mod logger;
