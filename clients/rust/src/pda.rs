use solana_pubkey::Pubkey;

pub const NETWORK_CONFIG_SEED: &[u8] = b"dac_network_config";
pub const NODE_INFO_SEED: &[u8] = b"node_info";
pub const NODE_TREASURY_SEED: &[u8] = b"node_treasury";
pub const AGENT_SEED: &[u8] = b"agent";
pub const SESSION_SEED: &[u8] = b"session";
pub const SESSION_VAULT_SEED: &[u8] = b"session_vault";
pub const TASK_SEED: &[u8] = b"task";
pub const CONTRIBUTION_SEED: &[u8] = b"contribution";

pub fn find_network_config_pda(program_id: &Pubkey, authority: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[NETWORK_CONFIG_SEED, authority.as_ref()], program_id)
}

pub fn find_node_info_pda(program_id: &Pubkey, node_pubkey: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[NODE_INFO_SEED, node_pubkey.as_ref()], program_id)
}

pub fn find_node_treasury_pda(program_id: &Pubkey, node_info: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[NODE_TREASURY_SEED, node_info.as_ref()], program_id)
}

pub fn find_agent_pda(
    program_id: &Pubkey,
    network_config: &Pubkey,
    agent_slot_id: u64,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            AGENT_SEED,
            network_config.as_ref(),
            &agent_slot_id.to_le_bytes(),
        ],
        program_id,
    )
}

pub fn find_session_pda(
    program_id: &Pubkey,
    network_config: &Pubkey,
    session_slot_id: u64,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            SESSION_SEED,
            network_config.as_ref(),
            &session_slot_id.to_le_bytes(),
        ],
        program_id,
    )
}

pub fn find_session_vault_pda(program_id: &Pubkey, session: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[SESSION_VAULT_SEED, session.as_ref()], program_id)
}

pub fn find_task_pda(program_id: &Pubkey, network_config: &Pubkey, task_slot_id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[TASK_SEED, network_config.as_ref(), &task_slot_id.to_le_bytes()],
        program_id,
    )
}

pub fn find_contribution_pda(
    program_id: &Pubkey,
    session: &Pubkey,
    contributor: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[CONTRIBUTION_SEED, session.as_ref(), contributor.as_ref()],
        program_id,
    )
}

/// Task accounts passed as remaining accounts when the network is initialized
/// with pre-allocated tasks.
pub fn find_task_pdas(program_id: &Pubkey, network_config: &Pubkey, count: u64) -> Vec<Pubkey> {
    (0..count)
        .map(|task_slot_id| find_task_pda(program_id, network_config, task_slot_id).0)
        .collect()
}
