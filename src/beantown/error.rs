use thiserror::Error;

#[derive(Error, Debug)]
pub enum BeanError {
    /// The data source answered with the invalid-response sentinel.
    #[error("Failed to fetch page: {0} of Jelly Beans")]
    PageFetch(u32),

    #[error("Network error while fetching page {page}: {source}")]
    Transport {
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, BeanError>;
