//! Type definitions used throughout the scripts

use std::fmt::{self, Display};

use ethers::{
    abi::Token,
    types::{Address, U256},
};

/// The contracts the scripts can deploy.
///
/// `Display` gives the name of the compilation artifact; the deployments-file
/// key is distinct per variant, so the three vesting deployments share the
/// `TokenVesting` artifact but are recorded separately.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LineContract {
    /// The revenue token backing the test line
    RevenueToken,
    /// The price oracle for the token/ETH pair
    SimpleOracle,
    /// The loan library
    LoanLib,
    /// The credit library
    CreditLib,
    /// The credit list library
    CreditListLib,
    /// The spigoted loan library
    SpigotedLoanLib,
    /// The revenue-redirect contract
    Spigot,
    /// The collateral vault
    Escrow,
    /// The lending contract
    SecuredLoan,
    /// The credit-limited token
    CreditToken,
    /// The debt token
    DebtToken,
    /// The partner treasury's vesting contract
    PartnerVesting,
    /// The project treasury's vesting contract
    TreasuryVesting,
    /// The team's vesting contract
    TeamVesting,
}

impl Display for LineContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineContract::RevenueToken => write!(f, "RevenueToken"),
            LineContract::SimpleOracle => write!(f, "SimpleOracle"),
            LineContract::LoanLib => write!(f, "LoanLib"),
            LineContract::CreditLib => write!(f, "CreditLib"),
            LineContract::CreditListLib => write!(f, "CreditListLib"),
            LineContract::SpigotedLoanLib => write!(f, "SpigotedLoanLib"),
            LineContract::Spigot => write!(f, "Spigot"),
            LineContract::Escrow => write!(f, "Escrow"),
            LineContract::SecuredLoan => write!(f, "SecuredLoan"),
            LineContract::CreditToken => write!(f, "CreditToken"),
            LineContract::DebtToken => write!(f, "DebtToken"),
            LineContract::PartnerVesting
            | LineContract::TreasuryVesting
            | LineContract::TeamVesting => write!(f, "TokenVesting"),
        }
    }
}

/// The record of a single contract deployment
#[derive(Copy, Clone, Debug)]
pub struct Deployment {
    /// The address the contract lives at
    pub address: Address,
    /// Whether the address was created this run, as opposed to being
    /// reused from the deployments record of a prior run
    pub newly_deployed: bool,
}

/// A vesting schedule, enforced on-chain by a `TokenVesting` contract
/// constructed from it
#[derive(Copy, Clone, Debug)]
pub struct VestingSchedule {
    /// The vested token
    pub token: Address,
    /// The beneficiary of the grant
    pub beneficiary: Address,
    /// The address unvested tokens are clawed back to; the zero
    /// address disables clawback
    pub clawback: Address,
    /// The granted amount
    pub amount: U256,
    /// The start of the schedule, in seconds since the Unix epoch
    pub start: U256,
    /// The cliff duration, in seconds; zero for no cliff
    pub cliff_secs: U256,
    /// The total vesting duration, in seconds
    pub duration_secs: U256,
}

impl VestingSchedule {
    /// The schedule as `TokenVesting` constructor arguments
    pub fn constructor_tokens(&self) -> Vec<Token> {
        vec![
            Token::Address(self.token),
            Token::Address(self.beneficiary),
            Token::Address(self.clawback),
            Token::Uint(self.amount),
            Token::Uint(self.start),
            Token::Uint(self.cliff_secs),
            Token::Uint(self.duration_secs),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// All three vesting deployments are instances of the same artifact
    #[test]
    fn vesting_variants_share_the_token_vesting_artifact() {
        for contract in [
            LineContract::PartnerVesting,
            LineContract::TreasuryVesting,
            LineContract::TeamVesting,
        ] {
            assert_eq!(contract.to_string(), "TokenVesting");
        }
    }

    /// Constructor tokens line up with the `TokenVesting` constructor:
    /// token, beneficiary, clawback, amount, start, cliff, duration
    #[test]
    fn vesting_constructor_token_ordering() {
        let schedule = VestingSchedule {
            token: Address::repeat_byte(1),
            beneficiary: Address::repeat_byte(2),
            clawback: Address::zero(),
            amount: U256::from(1000),
            start: U256::from(1_700_000_000_u64),
            cliff_secs: U256::zero(),
            duration_secs: U256::from(60),
        };

        let tokens = schedule.constructor_tokens();
        assert_eq!(tokens.len(), 7);
        assert_eq!(tokens[0], Token::Address(schedule.token));
        assert_eq!(tokens[1], Token::Address(schedule.beneficiary));
        assert_eq!(tokens[2], Token::Address(Address::zero()));
        assert_eq!(tokens[3], Token::Uint(schedule.amount));
        assert_eq!(tokens[4], Token::Uint(schedule.start));
        assert_eq!(tokens[5], Token::Uint(schedule.cliff_secs));
        assert_eq!(tokens[6], Token::Uint(schedule.duration_secs));
    }
}
