use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;

/// Where notes and tasks are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// One JSON file per collection.
    Json,
    /// SQLite document collections.
    Document,
}

/// Server options. Every flag can also be set through its environment variable.
#[derive(Debug, Clone, Parser)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "NOTEBOOK_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port for HTTP API
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Directory holding the collections and the uploads directory
    #[arg(long, env = "NOTEBOOK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Persistence backend
    #[arg(long, env = "NOTEBOOK_BACKEND", value_enum, default_value_t = Backend::Json)]
    pub backend: Backend,

    /// Largest accepted request body, in megabytes
    #[arg(long, env = "NOTEBOOK_MAX_UPLOAD_MB", default_value_t = 25)]
    pub max_upload_mb: usize,

    /// Static frontend to serve under /app
    #[arg(long, env = "NOTEBOOK_FRONTEND_DIR")]
    pub frontend_dir: Option<PathBuf>,
}

impl ServeArgs {
    pub fn into_config(self) -> AppConfig {
        AppConfig {
            host: self.host,
            port: self.port,
            data_dir: self.data_dir.unwrap_or_else(default_data_dir),
            backend: self.backend,
            max_upload_bytes: self.max_upload_mb.saturating_mul(1024 * 1024),
            frontend_dir: self.frontend_dir,
        }
    }
}

/// Resolved configuration.
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub backend: Backend,
    pub max_upload_bytes: usize,
    pub frontend_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Defaults rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            data_dir: data_dir.into(),
            backend: Backend::Json,
            max_upload_bytes: 25 * 1024 * 1024,
            frontend_dir: None,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn notes_path(&self) -> PathBuf {
        self.data_dir.join("notes.json")
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir.join("tasks.json")
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("notebook.db")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }
}

fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "notebook")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("data"))
}
