//! Endpoint profiles.

pub mod helius;
pub mod public;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cluster {
    Mainnet,
    Devnet,
}

impl FromStr for Cluster {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "mainnet-beta" => Ok(Self::Mainnet),
            "devnet" => Ok(Self::Devnet),
            other => Err(format!("unknown cluster '{other}' (expected mainnet or devnet)")),
        }
    }
}

impl std::fmt::Display for Cluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mainnet => f.write_str("mainnet"),
            Self::Devnet => f.write_str("devnet"),
        }
    }
}

/// A named endpoint, for listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub name: &'static str,
    pub cluster: Cluster,
    pub url: String,
    /// Serves the DAS read API (`getAssetsByGroup`).
    pub das: bool,
}

/// All known profiles. Helius URLs are shown with a placeholder key.
pub fn profiles() -> Vec<ProviderProfile> {
    let mut out = Vec::new();
    for cluster in [Cluster::Mainnet, Cluster::Devnet] {
        out.push(ProviderProfile {
            name: "helius",
            cluster,
            url: helius::rpc_url("<API_KEY>", cluster),
            das: true,
        });
        out.push(ProviderProfile {
            name: "public",
            cluster,
            url: public::url(cluster).to_string(),
            das: false,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cluster_names() {
        assert_eq!("mainnet-beta".parse::<Cluster>().unwrap(), Cluster::Mainnet);
        assert_eq!("Devnet".parse::<Cluster>().unwrap(), Cluster::Devnet);
        assert!("testnet".parse::<Cluster>().is_err());
    }

    #[test]
    fn lists_every_cluster() {
        let all = profiles();
        assert_eq!(all.len(), 4);
        assert!(all.iter().any(|p| p.name == "helius" && p.cluster == Cluster::Devnet && p.das));
    }
}
