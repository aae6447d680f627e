//! Implementations of the deploy scripts: the testnet line bootstrap and the
//! token launch & vesting sequence

use std::sync::Arc;

use ethers::{
    abi::{Detokenize, RawLog, Token},
    contract::{ContractCall, EthLogDecode},
    providers::Middleware,
    types::{Address, TransactionReceipt, U256},
};
use tracing::info;

use crate::{
    cli::{DeployTestnetArgs, LaunchTokensArgs},
    constants::{
        APPROVE_AMOUNT_WEI, BORROW_AMOUNT, BPS_DENOMINATOR, COLLATERAL_DEPOSIT, CREDIT_DEPOSIT,
        DEFAULT_REVENUE_SPLIT, DRAWN_RATE_BPS, FACILITY_RATE_BPS, INITIAL_CREDIT_SUPPLY,
        INITIAL_DEBT_SUPPLY, LAUNCH_ALLOCATION_BPS, LINE_TTL_SECS, MINT_AMOUNT,
        MIN_COLLATERAL_RATIO, PARTNER_ALLOCATION_BPS, PARTNER_VESTING_DURATION_SECS,
        TEAM_ALLOCATION_BPS, TEAM_VESTING_CLIFF_SECS, TEAM_VESTING_DURATION_SECS,
        TREASURY_ALLOCATION_BPS, TREASURY_VESTING_DURATION_SECS,
    },
    deployer::Deployer,
    errors::ScriptError,
    network::Network,
    solidity::{AddCreditFilter, CreditToken, DebtToken, Escrow, RevenueToken, SecuredLoan, Spigot},
    types::{LineContract, VestingSchedule},
    utils::{parse_address, unix_timestamp_secs},
    verify::{etherscan_client, verify_contract},
};

/// Submit a contract call and block until its receipt lands
async fn send<M, D>(call: ContractCall<M, D>) -> Result<TransactionReceipt, ScriptError>
where
    M: Middleware + 'static,
    D: Detokenize,
{
    call.send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
        .ok_or_else(|| {
            ScriptError::ContractInteraction("transaction dropped from the mempool".to_string())
        })
}

/// Pull the opened position id out of the `AddCredit` event in a receipt
fn position_id(receipt: &TransactionReceipt) -> Result<[u8; 32], ScriptError> {
    receipt
        .logs
        .iter()
        .find_map(|log| {
            let raw = RawLog {
                topics: log.topics.clone(),
                data: log.data.to_vec(),
            };
            AddCreditFilter::decode_log(&raw).ok().map(|event| event.id)
        })
        .ok_or_else(|| ScriptError::EventDecoding("no AddCredit event in receipt".to_string()))
}

/// The share of `supply` granted by `bps` basis points
fn allocation(supply: U256, bps: u64) -> U256 {
    supply * U256::from(bps) / U256::from(BPS_DENOMINATOR)
}

/// Bootstrap a fully wired lending system on the target network.
///
/// Deploys the token, oracle, libraries, Spigot, Escrow and SecuredLoan in
/// dependency order, hands Spigot & Escrow ownership to the line, posts
/// collateral, opens two credit positions and draws against the second.
pub(crate) async fn deploy_testnet_line<M: Middleware + 'static>(
    args: DeployTestnetArgs,
    deployer: &Deployer<M>,
) -> Result<(), ScriptError> {
    let client = deployer.client();
    let from = deployer.sender();

    let arbiter = args
        .arbiter
        .as_deref()
        .map(parse_address)
        .transpose()?
        .unwrap_or(from);
    let borrower = args
        .borrower
        .as_deref()
        .map(parse_address)
        .transpose()?
        .unwrap_or(from);

    info!("deploying revenue token");
    let token = deployer
        .deploy(LineContract::RevenueToken, vec![], &[])
        .await?;

    info!("deploying oracle with pricing for the token and ETH");
    let oracle = deployer
        .deploy(
            LineContract::SimpleOracle,
            vec![
                Token::Address(token.address),
                // no second asset priced on the test network
                Token::Address(Address::zero()),
            ],
            &[],
        )
        .await?;

    info!("deploying libraries");
    let loan_lib = deployer.deploy(LineContract::LoanLib, vec![], &[]).await?;
    let credit_lib = deployer
        .deploy(LineContract::CreditLib, vec![], &[])
        .await?;
    let credit_list_lib = deployer
        .deploy(LineContract::CreditListLib, vec![], &[])
        .await?;
    let spigoted_loan_lib = deployer
        .deploy(LineContract::SpigotedLoanLib, vec![], &[])
        .await?;

    // Owner, operator and treasury all start as the deployer; the owner
    // role is handed to the line once it exists.
    info!("deploying spigot");
    let spigot = deployer
        .deploy(LineContract::Spigot, vec![Token::Address(from); 3], &[])
        .await?;

    info!("deploying escrow");
    let escrow = deployer
        .deploy(
            LineContract::Escrow,
            vec![
                Token::Uint(MIN_COLLATERAL_RATIO.into()),
                Token::Address(oracle.address),
                Token::Address(from),
                Token::Address(borrower),
            ],
            &[(LineContract::CreditLib, credit_lib.address)],
        )
        .await?;

    info!("deploying line of credit for the token");
    let line = deployer
        .deploy(
            LineContract::SecuredLoan,
            vec![
                Token::Address(oracle.address),
                Token::Address(arbiter),
                Token::Address(borrower),
                // no swap target on the test network
                Token::Address(oracle.address),
                Token::Address(spigot.address),
                Token::Address(escrow.address),
                Token::Uint(LINE_TTL_SECS.into()),
                Token::Uint(DEFAULT_REVENUE_SPLIT.into()),
            ],
            &[
                (LineContract::LoanLib, loan_lib.address),
                (LineContract::CreditLib, credit_lib.address),
                (LineContract::CreditListLib, credit_list_lib.address),
                (LineContract::SpigotedLoanLib, spigoted_loan_lib.address),
            ],
        )
        .await?;

    let token_contract = RevenueToken::new(token.address, client.clone());
    if token.newly_deployed {
        // Both must land before any borrowing step can succeed
        info!("token freshly deployed; minting to the deployer and approving the line");
        tokio::try_join!(
            send(token_contract.mint(U256::from(MINT_AMOUNT))),
            send(token_contract.approve(line.address, U256::from(APPROVE_AMOUNT_WEI))),
        )?;
    }

    // After this point the line, not the deployer, controls revenue routing
    // and collateral
    info!("handing spigot & escrow ownership to the line");
    let spigot_contract = Spigot::new(spigot.address, client.clone());
    let escrow_contract = Escrow::new(escrow.address, client.clone());
    tokio::try_join!(
        send(spigot_contract.update_owner(line.address)),
        send(escrow_contract.update_loan(line.address)),
    )?;

    info!("initializing the line and posting collateral");
    let line_contract = SecuredLoan::new(line.address, client.clone());
    tokio::try_join!(
        send(line_contract.init()),
        send(escrow_contract.enable_collateral(token.address)),
        send(escrow_contract.add_collateral(U256::from(COLLATERAL_DEPOSIT))),
    )?;

    info!("opening two credit positions for the deployer");
    let open = || {
        send(line_contract.add_credit(
            DRAWN_RATE_BPS.into(),
            FACILITY_RATE_BPS.into(),
            U256::from(CREDIT_DEPOSIT),
            token.address,
            from,
        ))
    };
    let (first, second) = tokio::try_join!(open(), open())?;
    let positions = [position_id(&first)?, position_id(&second)?];

    info!("borrowing as the deployer");
    send(line_contract.borrow(positions[1], U256::from(BORROW_AMOUNT))).await?;

    info!("testnet line live at {:#x}", line.address);
    Ok(())
}

/// Launch the credit and debt tokens.
///
/// Deploys both tokens, hands the credit token to the team multisig,
/// transfers the public-launch allocation, starts the three vesting
/// schedules, verifies every deployed source, and finally transfers debt
/// token ownership to the treasury.
pub(crate) async fn launch_tokens<M: Middleware + 'static>(
    args: LaunchTokensArgs,
    deployer: &Deployer<M>,
    network: Network,
    etherscan_api_key: Option<String>,
) -> Result<(), ScriptError> {
    let client = deployer.client();

    let team_multisig = parse_address(&args.team_multisig)?;
    let debt_treasury = parse_address(&args.debt_treasury)?;
    let partner_treasury = parse_address(&args.partner_treasury)?;

    let explorer = if args.skip_verification {
        None
    } else {
        let api_key = etherscan_api_key.ok_or_else(|| {
            ScriptError::ContractVerification("no Etherscan API key configured".to_string())
        })?;
        Some(etherscan_client(network, &api_key)?)
    };

    let credit_supply = U256::from(INITIAL_CREDIT_SUPPLY);
    let debt_supply = U256::from(INITIAL_DEBT_SUPPLY);

    info!("deploying credit & debt tokens");
    let credit_args = vec![Token::Uint(credit_supply)];
    let credit = deployer
        .deploy(LineContract::CreditToken, credit_args.clone(), &[])
        .await?;
    let debt_args = vec![Token::Uint(debt_supply)];
    let debt = deployer
        .deploy(LineContract::DebtToken, debt_args.clone(), &[])
        .await?;

    info!(
        "credit token at {:#x}, debt token at {:#x}",
        credit.address, debt.address
    );

    info!("handing the credit token to the team multisig");
    let credit_contract = CreditToken::new(credit.address, client.clone());
    send(credit_contract.update_minter(team_multisig, true)).await?;
    send(credit_contract.transfer_ownership(team_multisig)).await?;

    if let Some(explorer) = &explorer {
        let credit_artifact = deployer.load_artifact(LineContract::CreditToken)?;
        verify_contract(
            explorer,
            LineContract::CreditToken,
            credit.address,
            &credit_artifact,
            &credit_args,
        )
        .await?;

        let debt_artifact = deployer.load_artifact(LineContract::DebtToken)?;
        verify_contract(
            explorer,
            LineContract::DebtToken,
            debt.address,
            &debt_artifact,
            &debt_args,
        )
        .await?;
    }

    let partner_amount = allocation(debt_supply, PARTNER_ALLOCATION_BPS);
    let treasury_amount = allocation(debt_supply, TREASURY_ALLOCATION_BPS);
    let team_amount = allocation(debt_supply, TEAM_ALLOCATION_BPS);
    let launch_amount = allocation(debt_supply, LAUNCH_ALLOCATION_BPS);

    info!("sending the launch allocation of {launch_amount} to the treasury");
    let debt_contract = DebtToken::new(debt.address, client.clone());
    send(debt_contract.transfer(debt_treasury, launch_amount)).await?;

    let start = U256::from(unix_timestamp_secs()?);

    let partner_schedule = VestingSchedule {
        token: debt.address,
        beneficiary: partner_treasury,
        clawback: Address::zero(),
        amount: partner_amount,
        start,
        cliff_secs: U256::zero(),
        duration_secs: U256::from(PARTNER_VESTING_DURATION_SECS),
    };
    let treasury_schedule = VestingSchedule {
        token: debt.address,
        beneficiary: debt_treasury,
        clawback: Address::zero(),
        amount: treasury_amount,
        start,
        cliff_secs: U256::zero(),
        duration_secs: U256::from(TREASURY_VESTING_DURATION_SECS),
    };
    let team_schedule = VestingSchedule {
        token: debt.address,
        beneficiary: team_multisig,
        clawback: debt_treasury,
        amount: team_amount,
        start,
        cliff_secs: U256::from(TEAM_VESTING_CLIFF_SECS),
        duration_secs: U256::from(TEAM_VESTING_DURATION_SECS),
    };

    info!("starting debt token vesting");
    let partner_args = partner_schedule.constructor_tokens();
    let partner_vesting = deployer
        .deploy(LineContract::PartnerVesting, partner_args.clone(), &[])
        .await?;
    let treasury_args = treasury_schedule.constructor_tokens();
    let treasury_vesting = deployer
        .deploy(LineContract::TreasuryVesting, treasury_args.clone(), &[])
        .await?;
    let team_args = team_schedule.constructor_tokens();
    let team_vesting = deployer
        .deploy(LineContract::TeamVesting, team_args.clone(), &[])
        .await?;

    if let Some(explorer) = &explorer {
        // The three deployments share the TokenVesting artifact
        let artifact = deployer.load_artifact(LineContract::TeamVesting)?;
        tokio::try_join!(
            verify_contract(
                explorer,
                LineContract::PartnerVesting,
                partner_vesting.address,
                &artifact,
                &partner_args,
            ),
            verify_contract(
                explorer,
                LineContract::TreasuryVesting,
                treasury_vesting.address,
                &artifact,
                &treasury_args,
            ),
            verify_contract(
                explorer,
                LineContract::TeamVesting,
                team_vesting.address,
                &artifact,
                &team_args,
            ),
        )?;
    }

    info!("transferring debt token ownership to the treasury {debt_treasury:#x}");
    send(debt_contract.transfer_ownership(debt_treasury)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use ethers::{
        contract::EthEvent,
        types::{Bytes, Log, H256},
    };

    use super::*;

    /// Widen an address into an indexed-topic word
    fn topic(addr: Address) -> H256 {
        let mut word = [0_u8; 32];
        word[12..].copy_from_slice(addr.as_bytes());
        H256::from(word)
    }

    /// The four allocations account for the whole initial supply
    #[test]
    fn allocations_sum_to_the_full_supply() {
        assert_eq!(
            PARTNER_ALLOCATION_BPS
                + TREASURY_ALLOCATION_BPS
                + TEAM_ALLOCATION_BPS
                + LAUNCH_ALLOCATION_BPS,
            BPS_DENOMINATOR
        );

        let supply = U256::from(INITIAL_DEBT_SUPPLY);
        let total = allocation(supply, PARTNER_ALLOCATION_BPS)
            + allocation(supply, TREASURY_ALLOCATION_BPS)
            + allocation(supply, TEAM_ALLOCATION_BPS)
            + allocation(supply, LAUNCH_ALLOCATION_BPS);
        assert_eq!(total, supply);
    }

    /// Basis-point math reproduces the agreed percentages exactly
    #[test]
    fn allocation_amounts_match_the_agreement() {
        let supply = U256::from(INITIAL_DEBT_SUPPLY);

        // 3.3% / 61.7% / 20% / 15% of 10^11
        assert_eq!(
            allocation(supply, PARTNER_ALLOCATION_BPS),
            U256::from(3_300_000_000_u64)
        );
        assert_eq!(
            allocation(supply, TREASURY_ALLOCATION_BPS),
            U256::from(61_700_000_000_u64)
        );
        assert_eq!(
            allocation(supply, TEAM_ALLOCATION_BPS),
            U256::from(20_000_000_000_u64)
        );
        assert_eq!(
            allocation(supply, LAUNCH_ALLOCATION_BPS),
            U256::from(15_000_000_000_u64)
        );
    }

    /// Minting and approval must both cover the draw attempted right after
    #[test]
    fn approval_and_mint_cover_the_borrow() {
        assert!(APPROVE_AMOUNT_WEI >= BORROW_AMOUNT);
        assert!(MINT_AMOUNT >= BORROW_AMOUNT);
    }

    /// A receipt carrying an `AddCredit` event yields its position id
    #[test]
    fn position_id_is_decoded_from_the_receipt() {
        let lender = Address::repeat_byte(0x11);
        let token = Address::repeat_byte(0x22);
        let id = [0x33_u8; 32];

        let log = Log {
            topics: vec![AddCreditFilter::signature(), topic(lender), topic(token)],
            data: Bytes::from(ethers::abi::encode(&[
                Token::Uint(U256::from(CREDIT_DEPOSIT)),
                Token::FixedBytes(id.to_vec()),
            ])),
            ..Default::default()
        };
        let receipt = TransactionReceipt {
            logs: vec![log],
            ..Default::default()
        };

        assert_eq!(position_id(&receipt).unwrap(), id);
    }

    /// A receipt without the event is an error rather than a bogus id
    #[test]
    fn position_id_requires_the_event() {
        let receipt = TransactionReceipt::default();
        assert!(matches!(
            position_id(&receipt),
            Err(ScriptError::EventDecoding(_))
        ));
    }
}
