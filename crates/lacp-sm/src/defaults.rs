//! The administrative-default partner record.
//!
//! When no LACPDU has been received for too long (or ever), the partner
//! record is replaced by a well-known default: the all-ones system and port
//! ids at the lowest priority, key zero, and a policy-chosen state octet.

use lacp_types::{LacpState, PeerInfo, PortId, SystemId};
use serde::{Deserialize, Serialize};

/// Which state bits the defaulted partner record carries.
///
/// An optimistic default lets a defaulted port pass traffic as an
/// individual link (the partner is assumed in sync and collecting); a
/// pessimistic default keeps the port down until a real partner speaks.
/// Which of the two is appropriate is deployment policy, so it is a
/// construction parameter rather than a built-in constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultPolicy {
    /// Assume a cooperative silent partner: SYNC, AGGREGATION, COLLECTING,
    /// and DISTRIBUTING set (plus DEFAULTED).
    #[default]
    Optimistic,
    /// Assume nothing: only DEFAULTED set.
    Pessimistic,
}

/// The administrative-default partner record, injected at port creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartnerDefaults {
    policy: DefaultPolicy,
}

impl PartnerDefaults {
    /// Creates defaults with the given policy.
    pub const fn new(policy: DefaultPolicy) -> Self {
        PartnerDefaults { policy }
    }

    /// Returns the configured policy.
    pub const fn policy(&self) -> DefaultPolicy {
        self.policy
    }

    /// Builds the default partner record.
    pub fn record(&self) -> PeerInfo {
        let state = match self.policy {
            DefaultPolicy::Optimistic => {
                LacpState::SYNC
                    | LacpState::AGGREGATION
                    | LacpState::COLLECTING
                    | LacpState::DISTRIBUTING
                    | LacpState::DEFAULTED
            }
            DefaultPolicy::Pessimistic => LacpState::DEFAULTED,
        };
        PeerInfo::new(SystemId::DEFAULT_PARTNER, 0, PortId::DEFAULT_PARTNER, state)
    }
}
