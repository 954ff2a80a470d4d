//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per uso programmatico.
//!
//! ## Responsabilità:
//! - Emette una riga JSON su stdout per ogni evento del batch
//! - Fornisce interfaccia standardizzata per comunicazione inter-processo
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio del batch (cartelle risolte, size, numero candidati)
//! - `file_complete`: Fine elaborazione di un file (creato, saltato o fallito)
//! - `complete`: Fine del batch con statistiche finali
//! - `error`: Errore che ha interrotto il batch

use crate::progress::BatchStats;
use crate::resize::OutputSize;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Esito di un singolo file nei messaggi `file_complete`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Created,
    Skipped,
    Failed,
}

/// Tipo di messaggio JSON
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JsonMessage {
    /// Inizio del batch
    #[serde(rename = "start")]
    Start {
        input_dir: PathBuf,
        output_dir: PathBuf,
        output_size: OutputSize,
        total_files: usize,
    },

    /// Fine elaborazione di un file specifico
    #[serde(rename = "file_complete")]
    FileComplete {
        input: PathBuf,
        output: PathBuf,
        index: usize,
        total: usize,
        status: FileStatus,
        dimensions: Option<(u32, u32)>,
        error: Option<String>,
    },

    /// Batch completato
    #[serde(rename = "complete")]
    Complete {
        created: Vec<PathBuf>,
        stats: BatchStats,
        duration_seconds: f64,
    },

    /// Errore che ha interrotto il batch
    #[serde(rename = "error")]
    Error {
        message: String,
        details: Option<String>,
    },
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    /// Crea un messaggio di errore a partire da un errore con catena di cause
    pub fn error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        JsonMessage::Error {
            message: err.to_string(),
            details: if causes.is_empty() {
                None
            } else {
                Some(causes.join(": "))
            },
        }
    }
}
