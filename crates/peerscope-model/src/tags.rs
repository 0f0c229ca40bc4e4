//! Closed enumerations: relationship roles and regions.
//!
//! Both serialize as their variant name, which is also the key used in the
//! peering dataset. Display labels are only used for presentation.

use serde::{Deserialize, Serialize};

/// The kind of relationship inferred for an edge in a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Customer,
    Peer,
    #[serde(alias = "Paid Peer")]
    PaidPeer,
    Upstream,
    /// No relationship type could be inferred.
    #[serde(alias = "")]
    NoneFound,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Customer,
        Role::Peer,
        Role::PaidPeer,
        Role::Upstream,
        Role::NoneFound,
    ];

    /// Key used in the dataset.
    pub fn name(&self) -> &'static str {
        match self {
            Role::Customer => "Customer",
            Role::Peer => "Peer",
            Role::PaidPeer => "PaidPeer",
            Role::Upstream => "Upstream",
            Role::NoneFound => "NoneFound",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Customer => "Customer",
            Role::Peer => "Peer",
            Role::PaidPeer => "Paid Peer",
            Role::Upstream => "Upstream",
            Role::NoneFound => "",
        }
    }

    /// The role as seen from the other end of the edge.
    ///
    /// Customer and Upstream are each other's inverse; every other role is
    /// its own inverse.
    pub fn mirrored(self) -> Role {
        match self {
            Role::Customer => Role::Upstream,
            Role::Upstream => Role::Customer,
            Role::Peer => Role::Peer,
            Role::PaidPeer => Role::PaidPeer,
            Role::NoneFound => Role::NoneFound,
        }
    }

    /// Accepts the variant name or the display label.
    pub fn parse(s: &str) -> Option<Role> {
        Role::ALL
            .into_iter()
            .find(|role| role.name() == s || role.label() == s)
    }
}

/// Geographic region a peering was observed in.
///
/// Declaration order is the fixed display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    Africa,
    #[serde(alias = "Asia Pac")]
    AsiaPac,
    Europe,
    #[serde(alias = "Middle East")]
    MiddleEast,
    #[serde(alias = "North America")]
    NorthAmerica,
    #[serde(alias = "South America")]
    SouthAmerica,
    #[serde(alias = "None Found")]
    NoneFound,
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::Africa,
        Region::AsiaPac,
        Region::Europe,
        Region::MiddleEast,
        Region::NorthAmerica,
        Region::SouthAmerica,
        Region::NoneFound,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Region::Africa => "Africa",
            Region::AsiaPac => "AsiaPac",
            Region::Europe => "Europe",
            Region::MiddleEast => "MiddleEast",
            Region::NorthAmerica => "NorthAmerica",
            Region::SouthAmerica => "SouthAmerica",
            Region::NoneFound => "NoneFound",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Region::Africa => "Africa",
            Region::AsiaPac => "Asia Pac",
            Region::Europe => "Europe",
            Region::MiddleEast => "Middle East",
            Region::NorthAmerica => "North America",
            Region::SouthAmerica => "South America",
            Region::NoneFound => "None Found",
        }
    }

    /// Accepts the variant name or the display label.
    pub fn parse(s: &str) -> Option<Region> {
        Region::ALL
            .into_iter()
            .find(|region| region.name() == s || region.label() == s)
    }
}
