#![no_std]
#![allow(missing_docs)]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, token, Address, Env, String,
};


const CONTRACT_VERSION: u32 = 1;

#[derive(Clone)]
#[contracttype]
pub struct Request {
    pub description: String,
    pub value: i128,
    pub recipient: Address,
    pub approval_count: u32,
    pub complete: bool,
}

#[derive(Clone)]
#[contracttype]
pub struct CampaignSummary {
    pub manager: Address,
    pub token: Address,
    pub minimum_contribution: i128,
    pub balance: i128,
    pub request_count: u32,
    pub approvers_count: u32,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Manager,
    Token,
    MinimumContribution,
    Balance,
    RequestCount,
    ApproversCount,
    Approver(Address),
    Contribution(Address),
    Request(u32),
    Approval(u32, Address),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 1,
    ContributionBelowMinimum = 2,
    NotManager = 3,
    NotApprover = 4,
    AlreadyApproved = 5,
    RequestNotFound = 6,
    RequestAlreadyComplete = 7,
    InsufficientApprovals = 8,
    InsufficientFunds = 9,
}

#[contract]
pub struct CampaignContract;

#[contractimpl]
impl CampaignContract {
    pub fn initialize(
        env: Env,
        manager: Address,
        token: Address,
        minimum_contribution: i128,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&DataKey::Manager) {
            return Err(ContractError::AlreadyInitialized);
        }

        manager.require_auth();

        if minimum_contribution <= 0 {
            panic!("minimum contribution must be positive");
        }

        env.storage().instance().set(&DataKey::Manager, &manager);
        env.storage().instance().set(&DataKey::Token, &token);
        env.storage()
            .instance()
            .set(&DataKey::MinimumContribution, &minimum_contribution);
        env.storage().instance().set(&DataKey::Balance, &0i128);
        env.storage().instance().set(&DataKey::RequestCount, &0u32);
        env.storage()
            .instance()
            .set(&DataKey::ApproversCount, &0u32);

        Ok(())
    }

    pub fn contribute(env: Env, contributor: Address, amount: i128) -> Result<(), ContractError> {
        contributor.require_auth();

        let minimum: i128 = env
            .storage()
            .instance()
            .get(&DataKey::MinimumContribution)
            .unwrap();
        if amount < minimum {
            return Err(ContractError::ContributionBelowMinimum);
        }

        let token_address: Address = env.storage().instance().get(&DataKey::Token).unwrap();
        let token_client = token::Client::new(&env, &token_address);
        token_client.transfer(&contributor, &env.current_contract_address(), &amount);

        let contribution_key = DataKey::Contribution(contributor.clone());
        let previous_amount: i128 = env
            .storage()
            .persistent()
            .get(&contribution_key)
            .unwrap_or(0);

        env.storage()
            .persistent()
            .set(&contribution_key, &(previous_amount + amount));
        env.storage()
            .persistent()
            .extend_ttl(&contribution_key, 100, 100);

        let balance: i128 = env.storage().instance().get(&DataKey::Balance).unwrap();
        env.storage()
            .instance()
            .set(&DataKey::Balance, &(balance + amount));

        // Repeat contributions get one approver slot, not one per payment.
        let approver_key = DataKey::Approver(contributor.clone());
        if !env
            .storage()
            .persistent()
            .get::<_, bool>(&approver_key)
            .unwrap_or(false)
        {
            env.storage().persistent().set(&approver_key, &true);
            env.storage()
                .persistent()
                .extend_ttl(&approver_key, 100, 100);

            let approvers: u32 = env
                .storage()
                .instance()
                .get(&DataKey::ApproversCount)
                .unwrap();
            env.storage()
                .instance()
                .set(&DataKey::ApproversCount, &(approvers + 1));
        }

        env.events()
            .publish(("campaign", "contributed"), (contributor, amount));

        Ok(())
    }

    pub fn create_request(
        env: Env,
        caller: Address,
        description: String,
        value: i128,
        recipient: Address,
    ) -> Result<u32, ContractError> {
        let manager: Address = env.storage().instance().get(&DataKey::Manager).unwrap();
        if caller != manager {
            return Err(ContractError::NotManager);
        }

        caller.require_auth();

        if description.is_empty() {
            panic!("description cannot be empty");
        }
        if value <= 0 {
            panic!("request value must be positive");
        }

        let index: u32 = env
            .storage()
            .instance()
            .get(&DataKey::RequestCount)
            .unwrap();
        let request = Request {
            description,
            value,
            recipient: recipient.clone(),
            approval_count: 0,
            complete: false,
        };

        env.storage()
            .persistent()
            .set(&DataKey::Request(index), &request);
        env.storage()
            .persistent()
            .extend_ttl(&DataKey::Request(index), 100, 100);
        env.storage()
            .instance()
            .set(&DataKey::RequestCount, &(index + 1));

        env.events()
            .publish(("campaign", "request_created"), (index, recipient, value));

        Ok(index)
    }

    pub fn approve_request(env: Env, approver: Address, index: u32) -> Result<(), ContractError> {
        approver.require_auth();

        if !env
            .storage()
            .persistent()
            .get::<_, bool>(&DataKey::Approver(approver.clone()))
            .unwrap_or(false)
        {
            return Err(ContractError::NotApprover);
        }

        let mut request: Request = env
            .storage()
            .persistent()
            .get(&DataKey::Request(index))
            .ok_or(ContractError::RequestNotFound)?;

        let approval_key = DataKey::Approval(index, approver.clone());
        if env
            .storage()
            .persistent()
            .get::<_, bool>(&approval_key)
            .unwrap_or(false)
        {
            return Err(ContractError::AlreadyApproved);
        }

        env.storage().persistent().set(&approval_key, &true);
        env.storage()
            .persistent()
            .extend_ttl(&approval_key, 100, 100);

        request.approval_count += 1;
        env.storage()
            .persistent()
            .set(&DataKey::Request(index), &request);

        env.events()
            .publish(("campaign", "request_approved"), (index, approver));

        Ok(())
    }

    pub fn finalize_request(env: Env, caller: Address, index: u32) -> Result<(), ContractError> {
        let manager: Address = env.storage().instance().get(&DataKey::Manager).unwrap();
        if caller != manager {
            return Err(ContractError::NotManager);
        }

        caller.require_auth();

        let mut request: Request = env
            .storage()
            .persistent()
            .get(&DataKey::Request(index))
            .ok_or(ContractError::RequestNotFound)?;

        if request.complete {
            return Err(ContractError::RequestAlreadyComplete);
        }

        let approvers: u32 = env
            .storage()
            .instance()
            .get(&DataKey::ApproversCount)
            .unwrap();
        // Strict majority of all approvers.
        if u64::from(request.approval_count) * 2 <= u64::from(approvers) {
            return Err(ContractError::InsufficientApprovals);
        }

        let balance: i128 = env.storage().instance().get(&DataKey::Balance).unwrap();
        if request.value > balance {
            return Err(ContractError::InsufficientFunds);
        }

        let token_address: Address = env.storage().instance().get(&DataKey::Token).unwrap();
        let token_client = token::Client::new(&env, &token_address);
        token_client.transfer(
            &env.current_contract_address(),
            &request.recipient,
            &request.value,
        );

        request.complete = true;
        env.storage()
            .persistent()
            .set(&DataKey::Request(index), &request);
        env.storage()
            .instance()
            .set(&DataKey::Balance, &(balance - request.value));

        env.events().publish(
            ("campaign", "request_finalized"),
            (index, request.recipient, request.value),
        );

        Ok(())
    }

    pub fn manager(env: Env) -> Address {
        env.storage().instance().get(&DataKey::Manager).unwrap()
    }

    pub fn token(env: Env) -> Address {
        env.storage().instance().get(&DataKey::Token).unwrap()
    }

    pub fn minimum_contribution(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::MinimumContribution)
            .unwrap()
    }

    pub fn balance(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::Balance)
            .unwrap_or(0)
    }

    pub fn contribution(env: Env, contributor: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::Contribution(contributor))
            .unwrap_or(0)
    }

    pub fn is_approver(env: Env, contributor: Address) -> bool {
        env.storage()
            .persistent()
            .get(&DataKey::Approver(contributor))
            .unwrap_or(false)
    }

    pub fn approvers_count(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::ApproversCount)
            .unwrap_or(0)
    }

    pub fn request_count(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::RequestCount)
            .unwrap_or(0)
    }

    pub fn request(env: Env, index: u32) -> Request {
        env.storage()
            .persistent()
            .get(&DataKey::Request(index))
            .unwrap()
    }

    pub fn has_approved(env: Env, index: u32, approver: Address) -> bool {
        env.storage()
            .persistent()
            .get(&DataKey::Approval(index, approver))
            .unwrap_or(false)
    }

    pub fn get_summary(env: Env) -> CampaignSummary {
        let manager: Address = env.storage().instance().get(&DataKey::Manager).unwrap();
        let token: Address = env.storage().instance().get(&DataKey::Token).unwrap();
        let minimum_contribution: i128 = env
            .storage()
            .instance()
            .get(&DataKey::MinimumContribution)
            .unwrap();
        let balance: i128 = env
            .storage()
            .instance()
            .get(&DataKey::Balance)
            .unwrap_or(0);
        let request_count: u32 = env
            .storage()
            .instance()
            .get(&DataKey::RequestCount)
            .unwrap_or(0);
        let approvers_count: u32 = env
            .storage()
            .instance()
            .get(&DataKey::ApproversCount)
            .unwrap_or(0);

        CampaignSummary {
            manager,
            token,
            minimum_contribution,
            balance,
            request_count,
            approvers_count,
        }
    }

    pub fn version(_env: Env) -> u32 {
        CONTRACT_VERSION
    }
}
