pub mod client;
pub mod config;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod monitor;
pub mod pda;
pub mod rpc;
pub mod state;
pub mod utils;

pub use client::*;
pub use config::*;
pub use errors::*;
pub use events::*;
pub use monitor::*;
pub use rpc::*;
pub use state::*;

use solana_pubkey::Pubkey;

pub const DAC_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("C821M111okror4TN2gjdUBJK58Mbd2s94pZc8xH6S5BQ");

pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::from_str_const("11111111111111111111111111111111");

pub const INSTRUCTIONS_SYSVAR_ID: Pubkey =
    Pubkey::from_str_const("Sysvar1nstructions1111111111111111111111111");

pub const ED25519_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("Ed25519SigVerify111111111111111111111111111");
