use soroban_sdk::{testutils::Address as _, Address, BytesN, Env};

use crate::{FactoryContract, FactoryContractClient, FactoryError};

fn setup_env() -> (Env, FactoryContractClient<'static>) {
    let env = Env::default();
    env.mock_all_auths();

    let factory_id = env.register(FactoryContract, ());
    let factory = FactoryContractClient::new(&env, &factory_id);

    (env, factory)
}

#[test]
fn test_empty_registry() {
    let (_env, factory) = setup_env();

    let campaigns = factory.campaigns();
    assert_eq!(campaigns.len(), 0);
    assert_eq!(factory.campaign_count(), 0);
}

#[test]
fn test_initialize_stores_config() {
    let (env, factory) = setup_env();

    let admin = Address::generate(&env);
    let token = Address::generate(&env);
    let wasm_hash = BytesN::from_array(&env, &[7u8; 32]);

    factory.initialize(&admin, &wasm_hash, &token);

    assert_eq!(factory.admin(), admin);
    assert_eq!(factory.token(), token);
    assert_eq!(factory.campaign_wasm(), wasm_hash);
    assert_eq!(factory.campaign_count(), 0);
    assert_eq!(factory.campaigns().len(), 0);
}

#[test]
fn test_initialize_twice_returns_error() {
    let (env, factory) = setup_env();

    let admin = Address::generate(&env);
    let token = Address::generate(&env);
    let wasm_hash = BytesN::from_array(&env, &[7u8; 32]);

    factory.initialize(&admin, &wasm_hash, &token);

    let result = factory.try_initialize(&admin, &wasm_hash, &token);
    assert_eq!(
        result.unwrap_err().unwrap(),
        FactoryError::AlreadyInitialized
    );
}

#[test]
fn test_create_campaign_requires_initialization() {
    let (env, factory) = setup_env();

    let creator = Address::generate(&env);
    let result = factory.try_create_campaign(&creator, &100);
    assert_eq!(result.unwrap_err().unwrap(), FactoryError::NotInitialized);
}

#[test]
fn test_set_campaign_wasm_rejects_non_admin() {
    let (env, factory) = setup_env();

    let admin = Address::generate(&env);
    let token = Address::generate(&env);
    let wasm_hash = BytesN::from_array(&env, &[7u8; 32]);

    factory.initialize(&admin, &wasm_hash, &token);

    let outsider = Address::generate(&env);
    let rotated = BytesN::from_array(&env, &[9u8; 32]);

    let result = factory.try_set_campaign_wasm(&outsider, &rotated);
    assert!(result.is_err());
    assert_eq!(factory.campaign_wasm(), wasm_hash);
}

#[test]
fn test_set_campaign_wasm_rotates_hash() {
    let (env, factory) = setup_env();

    let admin = Address::generate(&env);
    let token = Address::generate(&env);
    let wasm_hash = BytesN::from_array(&env, &[7u8; 32]);

    factory.initialize(&admin, &wasm_hash, &token);

    let rotated = BytesN::from_array(&env, &[9u8; 32]);
    factory.set_campaign_wasm(&admin, &rotated);

    assert_eq!(factory.campaign_wasm(), rotated);
}

#[test]
fn test_get_campaign_out_of_range_is_none() {
    let (_env, factory) = setup_env();

    assert_eq!(factory.get_campaign(&0), None);
}
