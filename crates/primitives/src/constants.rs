//! Account abstraction (ERC-4337)-related constants

/// Entry point smart contract
pub mod entry_point {
    /// Address of the entry point smart contract
    pub const ADDRESS: &str = "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789";
    /// Version of the entry point smart contract
    pub const VERSION: &str = "0.6.0";
}

/// Smart account provider
pub mod provider {
    /// Default number of receipt lookups before a submission is considered unconfirmed
    pub const DEFAULT_CONFIRMATION_RETRIES: usize = 5;
    /// Default interval between receipt lookups (in milliseconds)
    pub const DEFAULT_CONFIRMATION_INTERVAL_MS: u64 = 2_000;
    /// Default lower bound for the priority fee bid (1 gwei, in wei)
    pub const DEFAULT_MIN_PRIORITY_FEE_BID: u64 = 1_000_000_000;
}

/// Simple account (eth-infinitism reference implementation)
pub mod simple_account {
    /// Factory deployed by eth-infinitism for the v0.6 simple account
    pub const FACTORY_ADDRESS: &str = "0x9406Cc6185a346906296840746125a0E44976454";
    /// Placeholder ECDSA signature with the byte length of a real one, so gas
    /// estimation against an unsigned operation is size-accurate
    pub const DUMMY_SIGNATURE: &str = "0xfffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffc1c";
}
