//! # Processor Module
//!
//! Modulo che separa le responsabilità in sottomoduli:
//! - `batch_processor`: Orchestratore principale
//! - `thumbnail_task`: Worker per singoli file
//! - `path_resolver`: Logica di calcolo path centralizzata

pub mod batch_processor;
pub mod path_resolver;
pub mod thumbnail_task;

pub use batch_processor::{BatchReport, FileFailure, ThumbnailBatchProcessor};
pub use path_resolver::{PathResolver, ResolvedFolders};
pub use thumbnail_task::{TaskOutcome, ThumbnailTask};
