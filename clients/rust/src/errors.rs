use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DacError>;

/// Anchor offsets custom program errors by this value.
pub const PROGRAM_ERROR_OFFSET: u32 = 6000;

#[derive(Debug, Error)]
pub enum DacError {
    #[error("subscription transport is not configured")]
    MissingSubscriptionTransport,
    #[error("timed out waiting for {expected} account(s) to reach status {status}")]
    Timeout { expected: usize, status: String },
    #[error("subscription ended unexpectedly while waiting for status {status}")]
    StreamEnded { status: String },
    #[error("wait cancelled")]
    Cancelled,
    #[error("at least one target key is required")]
    EmptyTargets,
    #[error("account data too short: {len} bytes")]
    AccountTooShort { len: usize },
    #[error("invalid discriminator for {account}")]
    InvalidDiscriminator { account: &'static str },
    #[error("event payload too short: {len} bytes")]
    EventTooShort { len: usize },
    #[error("unknown event discriminator {0:?}")]
    UnknownEvent([u8; 8]),
    #[error("invalid base64 payload: {0}")]
    InvalidPayload(#[from] base64::DecodeError),
    #[error("account not found: {0}")]
    AccountNotFound(String),
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("signing failed: {0}")]
    Signing(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("program error: {0}")]
    Program(DacProgramError),
}

impl DacError {
    /// Maps a custom error code reported by the runtime to a program error,
    /// falling back to a transport error for codes the program does not define.
    pub fn from_custom_code(code: u32) -> Self {
        code.checked_sub(PROGRAM_ERROR_OFFSET)
            .and_then(DacProgramError::from_u32)
            .map(DacError::Program)
            .unwrap_or_else(|| DacError::Transport(format!("custom program error: {code:#x}")))
    }

    pub fn transport(err: impl std::fmt::Display) -> Self {
        DacError::Transport(err.to_string())
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum DacProgramError {
    #[error("Overflow")]
    Overflow,
    #[error("Missing account")]
    MissingAccount,
    #[error("Need at least one code measurement")]
    NeedAtLeastOneCodeMeasurement,
    #[error("At most 10 code measurements are allowed")]
    TooManyCodeMeasurements,
    #[error("Invalid PDA account")]
    InvalidPDAAccount,
    #[error("Account already initialized")]
    AccountAlreadyInitialized,
    #[error("Invalid node type")]
    InvalidNodeType,
    #[error("Invalid node status")]
    InvalidNodeStatus,
    #[error("Invalid TEE signature")]
    InvalidTeeSignature,
    #[error("Code measurement not approved")]
    CodeMeasurementNotApproved,
    #[error("Node already registered")]
    NodeAlreadyRegistered,
    #[error("Invalid instruction sysvar")]
    InvalidInstructionSysvar,
    #[error("Bad Ed25519 program")]
    BadEd25519Program,
    #[error("Bad Ed25519 accounts")]
    BadEd25519Accounts,
    #[error("Invalid validator TEE signing pubkey")]
    InvalidValidatorTeeSigningPubkey,
    #[error("Invalid compute node pubkey")]
    InvalidComputeNodePubkey,
    #[error("Underflow")]
    Underflow,
    #[error("Insufficient balance")]
    InsufficientBalance,
    #[error("Deposit too small")]
    DepositTooSmall,
    #[error("Invalid session owner")]
    InvalidSessionOwner,
    #[error("Invalid task status")]
    InvalidTaskStatus,
    #[error("Invalid agent status")]
    InvalidAgentStatus,
    #[error("Vault has leftover funds from previous session")]
    VaultHasLeftoverFunds,
    #[error("Invalid validator message")]
    InvalidValidatorMessage,
    #[error("Invalid ipfs CID")]
    InvalidCID,
    #[error("Invalid authority")]
    InvalidAuthority,
    #[error("Duplicate validation")]
    DuplicateValidation,
    #[error("No approved nodes available for task assignment")]
    NoApprovedNodes,
    #[error("Validator was not assigned to this task")]
    ValidatorNotAssigned,
    #[error("Not enough approved nodes to assign required validators")]
    NotEnoughValidators,
    #[error("Invalid session")]
    InvalidSession,
    #[error("Invalid session status")]
    InvalidSessionStatus,
}
