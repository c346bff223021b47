use borsh::BorshDeserialize;

use crate::errors::{DacError, Result};
use crate::utils::DISCRIMINATOR_LEN;

pub mod agent;
pub mod contribution;
pub mod network_config;
pub mod node_info;
pub mod session;
pub mod task;

pub use agent::*;
pub use contribution::*;
pub use network_config::*;
pub use node_info::*;
pub use session::*;
pub use task::*;

/// An account owned by the DAC program: an 8-byte discriminator followed by
/// the Borsh body and any unused allocated space.
pub trait DacAccount: BorshDeserialize {
    const NAME: &'static str;
    const DISCRIMINATOR: [u8; DISCRIMINATOR_LEN];

    fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < DISCRIMINATOR_LEN {
            return Err(DacError::AccountTooShort { len: data.len() });
        }
        if data[..DISCRIMINATOR_LEN] != Self::DISCRIMINATOR {
            return Err(DacError::InvalidDiscriminator {
                account: Self::NAME,
            });
        }
        let mut body = &data[DISCRIMINATOR_LEN..];
        Self::deserialize(&mut body).map_err(|source| DacError::Decode {
            what: Self::NAME,
            source,
        })
    }
}

/// A single-byte enum field the program stores at a fixed offset, usable in
/// server-side memcmp filters.
pub trait StatusField: Copy + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    fn to_byte(self) -> u8;
}
