use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

/// Everything that can stop a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("missing required arguments")]
    MissingArguments,
    #[error("Unsupported policy '{0}'. Use FIFO, LRU, LFU, or S3FIFO.")]
    UnknownPolicy(String),
    #[error("invalid value for {name}: '{value}'")]
    InvalidNumber { name: &'static str, value: String },
    #[error("total_frames must be between 1 and 1048576, got {0}")]
    InvalidFrameCount(usize),
    #[error("tlb_size must be at most 1048576, got {0}")]
    InvalidTlbSize(usize),
    #[error("unknown option '{0}'")]
    UnknownFlag(String),
    /// The fault handler found neither a reclaimed nor an unused frame.
    #[error("no free frame available ({total} frames all in use)")]
    FramesExhausted { total: u32 },
    #[error("line {line}: '{token}' is not a 32-bit hexadecimal address")]
    MalformedAddress { line: usize, token: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SimError {
    /// Errors caused by the command line rather than by the run itself.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            SimError::MissingArguments
                | SimError::UnknownPolicy(_)
                | SimError::InvalidNumber { .. }
                | SimError::InvalidFrameCount(_)
                | SimError::InvalidTlbSize(_)
                | SimError::UnknownFlag(_)
        )
    }
}
