pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;

pub use client::{enhance, AssetUploader, GenerationClient, JobPoller, JobSubmitter};
pub use config::{Config, ImgbbConfig, KieConfig, PollConfig};
pub use error::{GenError, Result};
pub use models::{
    AspectRatio, GenerationRequest, GenerationResult, ImageBlob, Job, JobStatus, Quality,
    UploadedAsset,
};
