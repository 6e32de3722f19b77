pub mod async_client;
pub mod client;
pub mod config;
pub mod data_models;
pub mod endpoints;
pub mod error;
pub mod parser;
pub mod request;
pub mod transport;

pub use async_client::AsyncStartpageClient;
pub use client::StartpageClient;
pub use config::ClientConfig;
pub use data_models::{
    Category, ImageResult, InstantAnswerBundle, KnowledgePanel, NewsResult, PlaceDataSource,
    PlaceResult, ResultPage, ResultRecord, SearchOptions, VideoResult, WebResult,
};
pub use error::{Result, StartpageError};
