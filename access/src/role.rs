//! Role tiers.
//!
//! A tier is an ordered permission level. Higher tiers include everything a
//! lower tier may do, so comparisons use the derived `Ord`.
//!
//! Stored documents encode tiers as small integer codes. Those codes are not
//! rank-ordered (a design editor is `1`, a commenter `2`), so always convert
//! through `from_code`/`code` rather than comparing codes.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// An ordered permission level of one resource family.
pub trait RoleTier: Copy + Ord + Hash + Debug + Send + Sync + 'static {
    /// Every tier, lowest first.
    const ALL: &'static [Self];

    /// The tier that satisfies any requirement.
    fn highest() -> Self;

    /// Decode a stored role code.
    fn from_code(code: i64) -> Option<Self>;

    /// The stored role code.
    fn code(self) -> i64;

    /// Document field listing the actors that hold this tier.
    fn list_field(self) -> &'static str;
}

/// Tiers of a design and the resources hanging off it (budgets, plan maps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DesignRole {
    Viewer,
    Commenter,
    Editor,
    Owner,
}

impl RoleTier for DesignRole {
    const ALL: &'static [Self] = &[
        DesignRole::Viewer,
        DesignRole::Commenter,
        DesignRole::Editor,
        DesignRole::Owner,
    ];

    fn highest() -> Self {
        DesignRole::Owner
    }

    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(DesignRole::Viewer),
            1 => Some(DesignRole::Editor),
            2 => Some(DesignRole::Commenter),
            3 => Some(DesignRole::Owner),
            _ => None,
        }
    }

    fn code(self) -> i64 {
        match self {
            DesignRole::Viewer => 0,
            DesignRole::Editor => 1,
            DesignRole::Commenter => 2,
            DesignRole::Owner => 3,
        }
    }

    fn list_field(self) -> &'static str {
        match self {
            DesignRole::Viewer => "viewers",
            DesignRole::Commenter => "commenters",
            DesignRole::Editor => "editors",
            DesignRole::Owner => "owners",
        }
    }
}

/// Tiers of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProjectRole {
    Viewer,
    Contributor,
    ContentManager,
    Manager,
}

impl RoleTier for ProjectRole {
    const ALL: &'static [Self] = &[
        ProjectRole::Viewer,
        ProjectRole::Contributor,
        ProjectRole::ContentManager,
        ProjectRole::Manager,
    ];

    fn highest() -> Self {
        ProjectRole::Manager
    }

    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ProjectRole::Viewer),
            1 => Some(ProjectRole::Contributor),
            2 => Some(ProjectRole::ContentManager),
            3 => Some(ProjectRole::Manager),
            _ => None,
        }
    }

    fn code(self) -> i64 {
        match self {
            ProjectRole::Viewer => 0,
            ProjectRole::Contributor => 1,
            ProjectRole::ContentManager => 2,
            ProjectRole::Manager => 3,
        }
    }

    fn list_field(self) -> &'static str {
        match self {
            ProjectRole::Viewer => "viewers",
            ProjectRole::Contributor => "contributors",
            ProjectRole::ContentManager => "contentManagers",
            ProjectRole::Manager => "managers",
        }
    }
}
