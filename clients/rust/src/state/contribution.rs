use borsh::{BorshDeserialize, BorshSerialize};
use solana_pubkey::Pubkey;

use super::DacAccount;

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Contribution {
    pub session: Pubkey,
    pub contributor: Pubkey,
    pub shares: u64,
    pub refund_amount: u64,
    pub bump: u8,
}

impl DacAccount for Contribution {
    const NAME: &'static str = "Contribution";
    const DISCRIMINATOR: [u8; 8] = [182, 187, 14, 111, 72, 167, 242, 212];
}
