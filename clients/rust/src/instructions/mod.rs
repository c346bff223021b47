//! Instruction builders for the DAC program.
//!
//! Each builder takes the keys and slot ids an instruction needs, derives the
//! program accounts from them and encodes `discriminator || borsh(args)`.

use borsh::BorshSerialize;
use solana_pubkey::Pubkey;
use solana_sdk::instruction::{AccountMeta, Instruction};

use crate::errors::{DacError, Result};
use crate::utils::DISCRIMINATOR_LEN;

pub mod agent;
pub mod network;
pub mod node;
pub mod session;
pub mod task;

pub use agent::*;
pub use network::*;
pub use node::*;
pub use session::*;
pub use task::*;

pub const INITIALIZE_NETWORK_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = [75, 50, 251, 50, 0, 159, 20, 5];
pub const UPDATE_NETWORK_CONFIG_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] =
    [45, 224, 17, 25, 202, 30, 112, 84];
pub const REGISTER_NODE_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = [102, 85, 117, 114, 194, 188, 211, 168];
pub const CLAIM_COMPUTE_NODE_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] =
    [202, 199, 87, 60, 125, 64, 171, 108];
pub const CLAIM_CONFIDENTIAL_NODE_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] =
    [79, 215, 217, 190, 247, 159, 228, 186];
pub const VALIDATE_PUBLIC_NODE_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] =
    [60, 125, 238, 128, 0, 198, 237, 58];
pub const ACTIVATE_NODE_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = [82, 132, 214, 216, 231, 212, 232, 250];
pub const CREATE_AGENT_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = [143, 66, 198, 95, 110, 85, 83, 249];
pub const VALIDATE_AGENT_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = [204, 64, 254, 54, 198, 119, 179, 36];
pub const CREATE_SESSION_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = [242, 193, 143, 179, 150, 25, 122, 227];
pub const SET_SESSION_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = [156, 135, 126, 111, 184, 206, 194, 141];
pub const CONTRIBUTE_TO_SESSION_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] =
    [202, 45, 115, 86, 65, 234, 184, 110];
pub const WITHDRAW_FROM_SESSION_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] =
    [192, 130, 131, 90, 159, 72, 26, 2];
pub const SUBMIT_TASK_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = [148, 183, 26, 116, 107, 213, 118, 213];
pub const CLAIM_TASK_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = [49, 222, 219, 238, 155, 68, 221, 136];
pub const SUBMIT_TASK_RESULT_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = [39, 108, 74, 4, 66, 125, 157, 7];
pub const SUBMIT_TASK_VALIDATION_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] =
    [57, 139, 43, 229, 231, 44, 47, 164];

pub(crate) fn required<T>(value: Option<T>, field: &'static str) -> Result<T> {
    value.ok_or(DacError::MissingField(field))
}

pub(crate) fn build_instruction<A: BorshSerialize>(
    program_id: Pubkey,
    name: &'static str,
    discriminator: [u8; DISCRIMINATOR_LEN],
    args: &A,
    accounts: Vec<AccountMeta>,
) -> Result<Instruction> {
    let mut data = discriminator.to_vec();
    args.serialize(&mut data)
        .map_err(|source| DacError::Encode { what: name, source })?;

    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}
