use crate::config::BeanTownConfig;
use crate::model::JellyBean;
use std::path::PathBuf;

pub mod config;
pub mod list;
pub mod refresh;
pub mod show;
pub mod status;

use status::CacheStatus;

#[derive(Debug, Clone)]
pub struct BeanTownPaths {
    /// Holds `jellybean.json` and `config.json`
    pub data_dir: PathBuf,
}

impl BeanTownPaths {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub listed_beans: Vec<JellyBean>,
    pub bean: Option<JellyBean>,
    pub status: Option<CacheStatus>,
    pub config: Option<BeanTownConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_beans(mut self, beans: Vec<JellyBean>) -> Self {
        self.listed_beans = beans;
        self
    }

    pub fn with_bean(mut self, bean: JellyBean) -> Self {
        self.bean = Some(bean);
        self
    }

    pub fn with_status(mut self, status: CacheStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_config(mut self, config: BeanTownConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}
