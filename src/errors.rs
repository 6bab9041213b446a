use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Node HTTP operations
    #[error("Node error: {0}")]
    Node(#[from] NodeError),

    /// Building or signing a transaction
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Submitting a transaction
    #[error("Submit error: {0}")]
    Submit(#[from] SubmitError),

    /// Reading relationship state
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Scenario step failures
    #[error("Step error: {0}")]
    Step(#[from] StepError),

    /// Polling outside of transaction confirmation (liveness probe)
    #[error("Poll error: {0}")]
    Poll(#[from] PollError),

    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation/parsing
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Errors raised while building or signing a transaction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The transaction kind has no binary layout for this version
    #[error("Unsupported version {version} for {kind} transaction")]
    UnsupportedVersion { kind: &'static str, version: u8 },

    /// Address string is not valid base58 or has the wrong shape
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Lease id is not a base58-encoded 32 byte value
    #[error("Invalid lease id: {0}")]
    InvalidLeaseId(String),

    /// A length-prefixed field does not fit its u16 prefix
    #[error("Field {field} too long: {len} bytes")]
    FieldTooLong { field: &'static str, len: usize },

    /// Chain id must be a single ASCII byte
    #[error("Invalid chain id: {0}")]
    InvalidChainId(String),
}

/// Node HTTP error types
#[derive(Error, Debug)]
pub enum NodeError {
    /// Failed to reach the node at all
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Node answered with a non-success status (e.g. broadcast rejected)
    #[error("Node rejected {operation} ({status}): {message}")]
    Rejected {
        operation: String,
        status: u16,
        message: String,
    },

    /// Failed to deserialise response data
    #[error("Deserialisation failed: {0}")]
    DeserialisationFailed(String),

    /// Node returned unexpected or malformed response data
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors from the fixed-interval poll loop
#[derive(Error, Debug)]
pub enum PollError {
    /// Condition was not met within the wait budget
    #[error("Timed out after {waited_seconds}s waiting for {what}")]
    Timeout { what: String, waited_seconds: u64 },

    /// A query inside the loop failed
    #[error("{0}")]
    Node(#[from] NodeError),
}

/// Errors from the transaction submitter
#[derive(Error, Debug)]
pub enum SubmitError {
    /// Transaction could not be built or signed
    #[error("Failed to build transaction: {0}")]
    Build(#[from] LedgerError),

    /// Node refused the broadcast
    #[error("Broadcast rejected: {0}")]
    Rejected(NodeError),

    /// Broadcast accepted but confirmation never observed
    #[error("Transaction {id} not confirmed after {waited_seconds}s")]
    ConfirmationTimeout { id: String, waited_seconds: u64 },

    /// Status query failed while waiting for confirmation
    #[error("Confirmation query failed for {id}: {source}")]
    Confirmation {
        id: String,
        #[source]
        source: NodeError,
    },

    /// Lookup needed before building the transaction failed
    #[error("{0}")]
    Lookup(#[from] QueryError),
}

/// Errors from relationship and balance queries
#[derive(Error, Debug)]
pub enum QueryError {
    /// Node read failed
    #[error("{0}")]
    Node(#[from] NodeError),

    /// Requested relationship does not exist
    #[error("No {relationship} found from {from} to {to}")]
    NotFound {
        relationship: &'static str,
        from: String,
        to: String,
    },
}

/// Errors surfaced by scenario steps
#[derive(Error, Debug)]
pub enum StepError {
    /// No step definition matches the text
    #[error("Undefined step: {0}")]
    Unmatched(String),

    /// A step matched but is not valid under this keyword
    #[error("Step '{text}' cannot be used as a {keyword} step")]
    WrongKeyword { keyword: String, text: String },

    /// Post-condition did not hold
    #[error("Assertion failed: {0}")]
    Assertion(String),

    /// Transaction submission failed
    #[error("{0}")]
    Submit(#[from] SubmitError),

    /// State query failed
    #[error("{0}")]
    Query(#[from] QueryError),

    /// Amount or number in the step text did not parse
    #[error("Invalid step argument: {0}")]
    InvalidArgument(String),
}

impl StepError {
    /// Failures a "tries to" step is allowed to absorb.
    ///
    /// Rejections, build errors, confirmation timeouts and missing
    /// relationships are all ways an attempted action can legitimately fail.
    /// Transport failures and assertion errors are not.
    pub fn is_expected_failure(&self) -> bool {
        match self {
            StepError::Submit(e) => match e {
                SubmitError::Build(_)
                | SubmitError::Rejected(_)
                | SubmitError::ConfirmationTimeout { .. } => true,
                SubmitError::Lookup(QueryError::NotFound { .. }) => true,
                SubmitError::Lookup(QueryError::Node(_)) | SubmitError::Confirmation { .. } => {
                    false
                }
            },
            StepError::Query(QueryError::NotFound { .. }) => true,
            _ => false,
        }
    }
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

/// Result type for node operations
pub type NodeResult<T> = Result<T, NodeError>;

/// Result type for ledger build/sign operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Result type for submitter operations
pub type SubmitResult<T> = Result<T, SubmitError>;

/// Result type for queries
pub type QueryResult<T> = Result<T, QueryError>;

/// Result type for scenario steps
pub type StepResult<T> = Result<T, StepError>;

impl From<serde_json::Error> for NodeError {
    fn from(err: serde_json::Error) -> Self {
        NodeError::DeserialisationFailed(format!("JSON error: {}", err))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<glob::PatternError> for AppError {
    fn from(err: glob::PatternError) -> Self {
        AppError::Config(format!("Glob pattern error: {}", err))
    }
}

impl From<glob::GlobError> for AppError {
    fn from(err: glob::GlobError) -> Self {
        AppError::Config(format!("Glob error: {}", err))
    }
}
