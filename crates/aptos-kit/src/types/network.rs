//! Network identification for Aptos.

use std::fmt;
use std::str::FromStr;

use super::ChainId;
use crate::error::Error;

/// Default fullnode REST endpoints.
pub const MAINNET_URL: &str = "https://api.mainnet.aptoslabs.com/v1";
pub const TESTNET_URL: &str = "https://api.testnet.aptoslabs.com/v1";
pub const DEVNET_URL: &str = "https://api.devnet.aptoslabs.com/v1";
pub const LOCAL_URL: &str = "http://127.0.0.1:8080/v1";

/// The Aptos network the client is connected to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Network {
    /// Production network.
    #[default]
    Mainnet,
    Testnet,
    /// Reset regularly, so its chain id is not fixed.
    Devnet,
    /// A localnet started with `aptos node run-localnet`.
    Local,
    /// Any other node.
    Custom,
}

impl Network {
    pub fn is_mainnet(&self) -> bool {
        matches!(self, Network::Mainnet)
    }

    pub fn is_testnet(&self) -> bool {
        matches!(self, Network::Testnet)
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Network::Local)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Local => "local",
            Network::Custom => "custom",
        }
    }

    /// Default REST endpoint, if the network has one.
    pub fn default_url(&self) -> Option<&'static str> {
        match self {
            Network::Mainnet => Some(MAINNET_URL),
            Network::Testnet => Some(TESTNET_URL),
            Network::Devnet => Some(DEVNET_URL),
            Network::Local => Some(LOCAL_URL),
            Network::Custom => None,
        }
    }

    /// Chain id, if it is fixed for this network.
    ///
    /// Devnet and custom networks must be asked via ledger info.
    pub fn chain_id(&self) -> Option<ChainId> {
        match self {
            Network::Mainnet => Some(ChainId::MAINNET),
            Network::Testnet => Some(ChainId::TESTNET),
            Network::Local => Some(ChainId::LOCAL),
            Network::Devnet | Network::Custom => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "local" | "localnet" => Ok(Network::Local),
            "custom" => Ok(Network::Custom),
            _ => Err(Error::Config(format!("unknown network: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_display() {
        assert_eq!(Network::Mainnet.to_string(), "mainnet");
        assert_eq!(Network::Testnet.to_string(), "testnet");
        assert_eq!(Network::Devnet.to_string(), "devnet");
        assert_eq!(Network::Local.to_string(), "local");
        assert_eq!(Network::Custom.to_string(), "custom");
    }

    #[test]
    fn test_network_from_str() {
        assert_eq!("Testnet".parse::<Network>().unwrap(), Network::Testnet);
        assert_eq!("localnet".parse::<Network>().unwrap(), Network::Local);
        assert!(matches!("moon".parse::<Network>(), Err(Error::Config(_))));
    }

    #[test]
    fn test_chain_ids() {
        assert_eq!(Network::Mainnet.chain_id(), Some(ChainId::MAINNET));
        assert_eq!(Network::Testnet.chain_id(), Some(ChainId::TESTNET));
        assert_eq!(Network::Local.chain_id().map(|c| c.id()), Some(4));
        assert_eq!(Network::Devnet.chain_id(), None);
        assert_eq!(Network::Custom.default_url(), None);
    }

    #[test]
    fn test_default_is_mainnet() {
        assert_eq!(Network::default(), Network::Mainnet);
        assert!(Network::default().is_mainnet());
    }
}
