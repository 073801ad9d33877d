//! strato-aws
//!
//! AWS-backed resource adapters built on the strato core: SDK error
//! classification onto the shared taxonomy, tagging-trait impls over the
//! classic WAF and Inspector clients, and resource lifecycle adapters that
//! drive the tag reconciler and the retry loops against the real control
//! plane.

pub mod assessment;
pub mod client;
pub mod error;
pub mod firewall_rule;
pub mod tags;
pub mod token;

pub use crate::assessment::update_assessment_tags;
pub use crate::client::sdk_config;
pub use crate::error::{format_err_chain, SyncError};
pub use crate::firewall_rule::{
    diff_predicates, FirewallRuleSpec, FirewallRuleState, FirewallRules, PredicateSpec,
    PredicateUpdate,
};
pub use crate::tags::{AssessmentTags, WafTags};
pub use crate::token::WafChangeTokens;
