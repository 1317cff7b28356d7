//! Airdrop recipient handling.
//!
//! A recipient file is a JSON array of `{ "address": "<base58>" }` objects.
//! Before minting, recipients who already hold an asset of the collection
//! are removed so a re-run after a partial failure only mints the gaps.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use chaindrop_core::WorkItem;

use crate::das::DasAsset;
use crate::pubkey::is_valid_pubkey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirdropEntry {
    pub address: String,
}

pub fn parse_recipients(json: &str) -> Result<Vec<AirdropEntry>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Result of filtering a recipient list against existing holders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientPlan {
    /// One mint per pending recipient, in file order.
    pub items: Vec<WorkItem>,
    pub already_owned: usize,
    pub duplicates: usize,
    /// Addresses that are not valid public keys.
    pub invalid: Vec<String>,
}

/// Mint work for every valid recipient that holds no live asset yet.
/// Keeps the first occurrence of repeated addresses.
pub fn pending_recipients(entries: &[AirdropEntry], existing: &[DasAsset]) -> RecipientPlan {
    let owners: HashSet<&str> = existing
        .iter()
        .filter(|a| !a.burnt)
        .map(|a| a.owner())
        .collect();

    let mut seen = HashSet::new();
    let mut plan = RecipientPlan::default();
    for entry in entries {
        let address = entry.address.trim();
        if !is_valid_pubkey(address) {
            plan.invalid.push(entry.address.clone());
            continue;
        }
        if !seen.insert(address) {
            plan.duplicates += 1;
            continue;
        }
        if owners.contains(address) {
            plan.already_owned += 1;
            continue;
        }
        plan.items.push(WorkItem::mint(address));
    }
    plan
}
