#![no_std]
#![allow(missing_docs)]

use soroban_sdk::{
    contract, contractclient, contracterror, contractimpl, contracttype, Address, BytesN, Env,
    Vec,
};

#[cfg(test)]
mod test;

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Admin,
    Token,
    CampaignWasm,
    CampaignCount,
    Campaigns,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum FactoryError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
}

#[contractclient(name = "CampaignClient")]
pub trait Campaign {
    fn initialize(env: Env, manager: Address, token: Address, minimum_contribution: i128);
}

#[contract]
pub struct FactoryContract;

#[contractimpl]
impl FactoryContract {
    pub fn initialize(
        env: Env,
        admin: Address,
        campaign_wasm_hash: BytesN<32>,
        token: Address,
    ) -> Result<(), FactoryError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(FactoryError::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Token, &token);
        env.storage()
            .instance()
            .set(&DataKey::CampaignWasm, &campaign_wasm_hash);
        env.storage().instance().set(&DataKey::CampaignCount, &0u32);

        let empty_campaigns: Vec<Address> = Vec::new(&env);
        env.storage()
            .persistent()
            .set(&DataKey::Campaigns, &empty_campaigns);

        Ok(())
    }

    pub fn set_campaign_wasm(env: Env, admin: Address, campaign_wasm_hash: BytesN<32>) {
        let stored_admin: Address = env.storage().instance().get(&DataKey::Admin).unwrap();
        if admin != stored_admin {
            panic!("not authorized");
        }

        admin.require_auth();
        env.storage()
            .instance()
            .set(&DataKey::CampaignWasm, &campaign_wasm_hash);
    }

    pub fn create_campaign(
        env: Env,
        creator: Address,
        minimum_contribution: i128,
    ) -> Result<Address, FactoryError> {
        creator.require_auth();

        let wasm_hash: BytesN<32> = env
            .storage()
            .instance()
            .get(&DataKey::CampaignWasm)
            .ok_or(FactoryError::NotInitialized)?;
        let token: Address = env.storage().instance().get(&DataKey::Token).unwrap();

        let count: u32 = env
            .storage()
            .instance()
            .get(&DataKey::CampaignCount)
            .unwrap_or(0);

        // Count-derived salt keeps each campaign address deterministic.
        let mut salt_bytes = [0u8; 32];
        salt_bytes[..4].copy_from_slice(&count.to_be_bytes());
        let salt = BytesN::from_array(&env, &salt_bytes);

        let campaign = env
            .deployer()
            .with_current_contract(salt)
            .deploy_v2(wasm_hash, ());

        let campaign_client = CampaignClient::new(&env, &campaign);
        campaign_client.initialize(&creator, &token, &minimum_contribution);

        let mut campaigns: Vec<Address> = env
            .storage()
            .persistent()
            .get(&DataKey::Campaigns)
            .unwrap_or_else(|| Vec::new(&env));
        campaigns.push_back(campaign.clone());
        env.storage()
            .persistent()
            .set(&DataKey::Campaigns, &campaigns);
        env.storage()
            .persistent()
            .extend_ttl(&DataKey::Campaigns, 100, 100);

        env.storage()
            .instance()
            .set(&DataKey::CampaignCount, &(count + 1));

        env.events()
            .publish(("factory", "campaign_created"), (campaign.clone(), creator));

        Ok(campaign)
    }

    pub fn campaigns(env: Env) -> Vec<Address> {
        env.storage()
            .persistent()
            .get(&DataKey::Campaigns)
            .unwrap_or_else(|| Vec::new(&env))
    }

    pub fn campaign_count(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::CampaignCount)
            .unwrap_or(0)
    }

    pub fn get_campaign(env: Env, index: u32) -> Option<Address> {
        let campaigns: Vec<Address> = env
            .storage()
            .persistent()
            .get(&DataKey::Campaigns)
            .unwrap_or_else(|| Vec::new(&env));
        campaigns.get(index)
    }

    pub fn admin(env: Env) -> Address {
        env.storage().instance().get(&DataKey::Admin).unwrap()
    }

    pub fn token(env: Env) -> Address {
        env.storage().instance().get(&DataKey::Token).unwrap()
    }

    pub fn campaign_wasm(env: Env) -> BytesN<32> {
        env.storage()
            .instance()
            .get(&DataKey::CampaignWasm)
            .unwrap()
    }
}
