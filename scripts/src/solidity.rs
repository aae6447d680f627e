//! Solidity ABI bindings for the contract methods driven during deployment

use ethers::contract::abigen;

abigen!(
    RevenueToken,
    r#"[
        function mint(uint256 amount) external
        function approve(address spender, uint256 amount) external returns (bool)
    ]"#
);

abigen!(
    Spigot,
    r#"[
        function updateOwner(address newOwner) external returns (bool)
    ]"#
);

abigen!(
    Escrow,
    r#"[
        function updateLoan(address loan) external returns (bool)
        function enableCollateral(address token) external returns (bool)
        function addCollateral(uint256 amount) external returns (uint256)
    ]"#
);

abigen!(
    SecuredLoan,
    r#"[
        function init() external
        function addCredit(uint128 drate, uint128 frate, uint256 amount, address token, address lender) external returns (bytes32)
        function borrow(bytes32 id, uint256 amount) external returns (bool)
        event AddCredit(address indexed lender, address indexed token, uint256 deposit, bytes32 id)
    ]"#
);

abigen!(
    CreditToken,
    r#"[
        function updateMinter(address minter, bool approved) external
        function transferOwnership(address newOwner) external
    ]"#
);

abigen!(
    DebtToken,
    r#"[
        function transfer(address to, uint256 amount) external returns (bool)
        function transferOwnership(address newOwner) external
    ]"#
);
