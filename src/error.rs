/*
 * Error Module
 *
 * The engine is pure computation over in-memory data, so its failure
 * surface is narrow: the only recoverable condition a consumer can see is
 * the pipeline having terminated.
 */

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    // The pipeline has shut down; no further snapshot will arrive.
    #[error("simulation pipeline stopped")]
    Stopped,
}
