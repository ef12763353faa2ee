//! Crypto deposit state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Supported deposit currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Btc,
    Eth,
    Usdt,
    Usdc,
}

impl Currency {
    /// All supported currencies.
    pub const ALL: [Currency; 4] = [
        Currency::Btc,
        Currency::Eth,
        Currency::Usdt,
        Currency::Usdc,
    ];

    /// Networks this currency can be deposited over.
    ///
    /// The pairing is enforced client-side before a request is sent; the
    /// server is not the only gatekeeper.
    pub fn supported_networks(&self) -> &'static [Network] {
        match self {
            Self::Btc => &[Network::Bitcoin],
            Self::Eth => &[Network::Ethereum],
            Self::Usdt => &[Network::Ethereum, Network::Tron],
            Self::Usdc => &[Network::Ethereum, Network::Solana],
        }
    }

    /// Check whether a network is valid for this currency.
    pub fn supports_network(&self, network: Network) -> bool {
        self.supported_networks().contains(&network)
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Btc => write!(f, "BTC"),
            Self::Eth => write!(f, "ETH"),
            Self::Usdt => write!(f, "USDT"),
            Self::Usdc => write!(f, "USDC"),
        }
    }
}

/// Supported deposit networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Bitcoin,
    Ethereum,
    Tron,
    Solana,
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bitcoin => write!(f, "Bitcoin"),
            Self::Ethereum => write!(f, "Ethereum"),
            Self::Tron => write!(f, "Tron"),
            Self::Solana => write!(f, "Solana"),
        }
    }
}

/// A deposit request as composed by the user. Sent once, immutable after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRequest {
    /// Amount to deposit, in the chosen currency.
    pub amount: Decimal,
    /// Chosen currency.
    pub currency: Currency,
    /// Chosen network.
    pub network: Network,
}

/// Payment instructions issued by the deposit collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositDescriptor {
    /// Server-issued deposit ID, used for status polling.
    pub deposit_id: String,
    /// Wallet address to pay into.
    pub address: String,
    /// Exact amount the server expects to receive.
    pub expected_amount: Decimal,
    /// Currency of the expected amount.
    pub currency: Currency,
    /// Network the payment must arrive on.
    pub network: Network,
    /// QR-encodable payment URI.
    pub payment_uri: String,
    /// When the descriptor was issued.
    pub issued_at: DateTime<Utc>,
    /// Authoritative expiry, when the server supplies one. Absent in the
    /// current collaborator contract; the monitor falls back to its
    /// configured window.
    pub expires_at: Option<DateTime<Utc>>,
}

impl DepositDescriptor {
    /// Display label for the currency/network pairing, e.g. "USDT (Tron)".
    pub fn pairing_label(&self) -> String {
        format!("{} ({})", self.currency, self.network)
    }
}

/// Lifecycle state of a deposit being watched.
///
/// `Pending` is the only non-terminal state; every other state is final and
/// no transition ever leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositState {
    #[default]
    Pending,
    Confirmed,
    Failed,
    Expired,
    Cancelled,
}

impl DepositState {
    /// Check whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// User-facing description. Each state reads distinctly; a host must be
    /// able to tell the outcomes apart from the message alone.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Pending => "Waiting for the deposit to arrive",
            Self::Confirmed => "Deposit confirmed - funds credited",
            Self::Failed => "Deposit failed - the payment was not accepted",
            Self::Expired => "Deposit window expired before payment arrived",
            Self::Cancelled => "Deposit cancelled",
        }
    }
}

impl std::fmt::Display for DepositState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Confirmed => write!(f, "Confirmed"),
            Self::Failed => write!(f, "Failed"),
            Self::Expired => write!(f, "Expired"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}
