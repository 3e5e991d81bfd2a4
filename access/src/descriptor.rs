//! Sharing configuration of a resource.

use crate::role::RoleTier;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Who may act on a resource beyond its listed members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessMode {
    /// Only listed actors.
    #[default]
    Restricted,
    /// Anyone holding the link, at the descriptor's public tier.
    Public,
}

impl AccessMode {
    /// Decode a stored access setting. Unknown codes are treated as restricted.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => AccessMode::Public,
            _ => AccessMode::Restricted,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            AccessMode::Restricted => 0,
            AccessMode::Public => 1,
        }
    }
}

/// The sharing configuration attached to a shareable resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDescriptor<R: RoleTier> {
    /// Owner of the resource; always holds the highest tier.
    pub owner_id: Option<String>,
    /// Actors listed per tier.
    pub roles: BTreeMap<R, BTreeSet<String>>,
    pub mode: AccessMode,
    /// Tier granted to everyone when `mode` is `Public`.
    pub public_role: Option<R>,
}

impl<R: RoleTier> Default for AccessDescriptor<R> {
    fn default() -> Self {
        Self {
            owner_id: None,
            roles: BTreeMap::new(),
            mode: AccessMode::Restricted,
            public_role: None,
        }
    }
}

impl<R: RoleTier> AccessDescriptor<R> {
    /// A restricted descriptor owned by `owner`.
    pub fn restricted(owner: impl Into<String>) -> Self {
        Self {
            owner_id: Some(owner.into()),
            ..Self::default()
        }
    }

    /// List `actor` at `tier`.
    pub fn with_member(mut self, tier: R, actor: impl Into<String>) -> Self {
        self.roles.entry(tier).or_default().insert(actor.into());
        self
    }

    /// Open the resource to anyone with the link at `tier`.
    pub fn public(mut self, tier: R) -> Self {
        self.mode = AccessMode::Public;
        self.public_role = Some(tier);
        self
    }

    /// The highest tier `actor` is listed at, if any.
    pub fn tier_of(&self, actor: &str) -> Option<R> {
        if self.owner_id.as_deref() == Some(actor) {
            return Some(R::highest());
        }
        self.roles
            .iter()
            .filter(|(_, members)| members.contains(actor))
            .map(|(tier, _)| *tier)
            .max()
    }

    /// Actors listed at exactly `tier`.
    pub fn members(&self, tier: R) -> impl Iterator<Item = &str> {
        self.roles
            .get(&tier)
            .into_iter()
            .flat_map(|members| members.iter().map(String::as_str))
    }
}
