use std::time::Duration;

use aws_sdk_waf::types::{ChangeAction, Predicate, PredicateType, RuleUpdate};
use aws_sdk_waf::Client;
use serde::{Deserialize, Serialize};
use strato_core::RemoteError;
use strato_retry::{retry_until, ChangeTokenMutator};
use strato_tags::{reconcile, KeyValueTagSet, TagPolicy, TaggingStyle};
use tokio::time::Instant;

use crate::error::{classify, SyncError};
use crate::tags::{waf_sdk_tags, WafTags};
use crate::token::WafChangeTokens;

const LABEL: &str = "firewall rule";

/// How long a blocked delete may wait for referencing objects to let go.
const DELETE_TIMEOUT: Duration = Duration::from_secs(5 * 60);
const DELETE_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// A single match predicate attached to a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateSpec {
    pub negated: bool,
    pub kind: String,
    pub data_id: String,
}

/// Minimal edit script turning one predicate list into another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateUpdate {
    Delete(PredicateSpec),
    Insert(PredicateSpec),
}

/// Deletes first, then inserts. Predicates present in both lists produce no
/// update.
pub fn diff_predicates(old: &[PredicateSpec], new: &[PredicateSpec]) -> Vec<PredicateUpdate> {
    let mut updates = Vec::new();
    for p in old {
        if !new.contains(p) {
            updates.push(PredicateUpdate::Delete(p.clone()));
        }
    }
    for p in new {
        if !old.contains(p) {
            updates.push(PredicateUpdate::Insert(p.clone()));
        }
    }
    updates
}

fn rule_updates(delta: &[PredicateUpdate]) -> Result<Vec<RuleUpdate>, RemoteError> {
    delta
        .iter()
        .map(|update| {
            let (action, spec) = match update {
                PredicateUpdate::Delete(spec) => (ChangeAction::Delete, spec),
                PredicateUpdate::Insert(spec) => (ChangeAction::Insert, spec),
            };
            let predicate = Predicate::builder()
                .negated(spec.negated)
                .r#type(PredicateType::from(spec.kind.as_str()))
                .data_id(spec.data_id.as_str())
                .build()
                .map_err(|err| RemoteError::other("waf:UpdateRule", err.to_string()))?;
            RuleUpdate::builder()
                .action(action)
                .predicate(predicate)
                .build()
                .map_err(|err| RemoteError::other("waf:UpdateRule", err.to_string()))
        })
        .collect()
}

/// Desired state for a classic WAF rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallRuleSpec {
    pub name: String,
    pub metric_name: String,
    pub predicates: Vec<PredicateSpec>,
}

/// Observed remote state of a rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallRuleState {
    pub rule_id: String,
    pub arn: String,
    pub name: String,
    pub metric_name: String,
    pub predicates: Vec<PredicateSpec>,
    /// Remote tags after system-prefix and ignore filtering.
    pub all_tags: KeyValueTagSet,
    /// `all_tags` minus provider-level defaults.
    pub tags: KeyValueTagSet,
}

/// Lifecycle adapter for classic WAF rules.
///
/// Every mutation goes through the change-token mutator; deletes additionally
/// wait out referential conflicts until a timeout.
pub struct FirewallRules {
    client: Client,
    tokens: ChangeTokenMutator<WafChangeTokens>,
    policy: TagPolicy,
    account_id: String,
    delete_timeout: Duration,
    delete_poll_interval: Duration,
}

impl FirewallRules {
    pub fn new(client: Client, account_id: impl Into<String>) -> Self {
        let tokens = ChangeTokenMutator::new(WafChangeTokens::new(client.clone()));
        Self {
            client,
            tokens,
            policy: TagPolicy::default(),
            account_id: account_id.into(),
            delete_timeout: DELETE_TIMEOUT,
            delete_poll_interval: DELETE_POLL_INTERVAL,
        }
    }

    /// Provider-level default and ignore tag configuration.
    pub fn with_policy(mut self, policy: TagPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_delete_timeout(mut self, timeout: Duration, poll_interval: Duration) -> Self {
        self.delete_timeout = timeout;
        self.delete_poll_interval = poll_interval;
        self
    }

    /// Rules are a global resource: no region component in the ARN.
    pub fn arn(&self, rule_id: &str) -> String {
        format!("arn:aws:waf::{}:rule/{}", self.account_id, rule_id)
    }

    fn tag_service(&self) -> WafTags {
        WafTags::new(self.client.clone())
    }

    /// Creates the rule carrying its desired tags (defaults merged, system
    /// keys filtered) and attaches any declared predicates in a follow-up
    /// update. Returns the new rule id.
    pub async fn create(
        &self,
        spec: &FirewallRuleSpec,
        declared_tags: &KeyValueTagSet,
    ) -> Result<String, SyncError> {
        let desired = self.policy.desired(declared_tags).ignore_aws();
        let sdk_tags = waf_sdk_tags(&desired.to_wire(), "waf:CreateRule")
            .map_err(|source| SyncError::create(LABEL, &spec.name, source))?;

        let out = self
            .tokens
            .run(|token| {
                let mut req = self
                    .client
                    .create_rule()
                    .change_token(token)
                    .name(spec.name.as_str())
                    .metric_name(spec.metric_name.as_str());
                if !sdk_tags.is_empty() {
                    req = req.set_tags(Some(sdk_tags.clone()));
                }
                async move {
                    req.send()
                        .await
                        .map_err(|err| classify("waf:CreateRule", err))
                }
            })
            .await
            .map_err(|source| SyncError::create(LABEL, &spec.name, source))?;

        let rule_id = out.rule().map(|r| r.rule_id().to_string()).ok_or_else(|| {
            SyncError::create(
                LABEL,
                &spec.name,
                RemoteError::other("waf:CreateRule", "response carried no rule"),
            )
        })?;

        tracing::info!(rule_id = %rule_id, name = %spec.name, "created firewall rule");

        if !spec.predicates.is_empty() {
            self.update_predicates(&rule_id, &[], &spec.predicates)
                .await?;
        }

        Ok(rule_id)
    }

    /// Reads current remote state, or `None` if the rule is gone.
    pub async fn read(&self, rule_id: &str) -> Result<Option<FirewallRuleState>, SyncError> {
        let out = match self.client.get_rule().rule_id(rule_id).send().await {
            Ok(out) => out,
            Err(err) => {
                let err = classify("waf:GetRule", err);
                if err.is_not_found() {
                    tracing::warn!(rule_id, "firewall rule not found, treating as absent");
                    return Ok(None);
                }
                return Err(SyncError::read(LABEL, rule_id, err));
            }
        };

        let Some(rule) = out.rule() else {
            return Ok(None);
        };

        let arn = self.arn(rule_id);
        let listed = self
            .tag_service()
            .list(&arn)
            .await
            .map_err(|source| SyncError::read(LABEL, rule_id, source))?;
        let all_tags = self.policy.filter(&listed);
        let tags = self.policy.declared(&all_tags);

        let predicates = rule
            .predicates()
            .iter()
            .map(|p| PredicateSpec {
                negated: p.negated(),
                kind: p.r#type().as_str().to_string(),
                data_id: p.data_id().to_string(),
            })
            .collect();

        Ok(Some(FirewallRuleState {
            rule_id: rule_id.to_string(),
            arn,
            name: rule.name().unwrap_or_default().to_string(),
            metric_name: rule.metric_name().unwrap_or_default().to_string(),
            predicates,
            all_tags,
            tags,
        }))
    }

    /// Applies the minimal predicate delta, token-wrapped. No remote call
    /// when the lists already match.
    pub async fn update_predicates(
        &self,
        rule_id: &str,
        old: &[PredicateSpec],
        new: &[PredicateSpec],
    ) -> Result<(), SyncError> {
        let delta = diff_predicates(old, new);
        if delta.is_empty() {
            return Ok(());
        }

        let updates =
            rule_updates(&delta).map_err(|source| SyncError::update(LABEL, rule_id, source))?;

        self.tokens
            .run(|token| {
                let req = self
                    .client
                    .update_rule()
                    .change_token(token)
                    .rule_id(rule_id)
                    .set_updates(Some(updates.clone()));
                async move {
                    req.send()
                        .await
                        .map_err(|err| classify("waf:UpdateRule", err))
                }
            })
            .await
            .map_err(|source| SyncError::update(LABEL, rule_id, source))?;

        tracing::info!(
            rule_id,
            updates = delta.len(),
            "updated firewall rule predicates"
        );
        Ok(())
    }

    /// Converges remote tags from the declared `old` to the declared `new`,
    /// passing both through the provider policy first.
    pub async fn update_tags(
        &self,
        rule_id: &str,
        old: &KeyValueTagSet,
        new: &KeyValueTagSet,
    ) -> Result<(), SyncError> {
        let arn = self.arn(rule_id);
        let service = self.tag_service();
        reconcile(
            TaggingStyle::Additive(&service),
            &arn,
            &self.policy.desired(old).ignore_aws(),
            &self.policy.desired(new).ignore_aws(),
        )
        .await?;
        Ok(())
    }

    /// Deletes the rule: detaches any remaining predicates, then issues the
    /// token-wrapped delete, waiting out referential conflicts until the
    /// timeout. A rule that is already gone counts as deleted.
    pub async fn delete(&self, rule_id: &str, predicates: &[PredicateSpec]) -> Result<(), SyncError> {
        if !predicates.is_empty() {
            self.update_predicates(rule_id, predicates, &[]).await?;
        }

        let deadline = Instant::now() + self.delete_timeout;
        let result = retry_until(deadline, self.delete_poll_interval, || {
            self.tokens.run(|token| {
                let req = self
                    .client
                    .delete_rule()
                    .change_token(token)
                    .rule_id(rule_id);
                async move {
                    req.send()
                        .await
                        .map_err(|err| classify("waf:DeleteRule", err))
                }
            })
        })
        .await;

        match result {
            Ok(_) => {
                tracing::info!(rule_id, "deleted firewall rule");
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                tracing::debug!(rule_id, "firewall rule already gone");
                Ok(())
            }
            Err(source) => Err(SyncError::delete(LABEL, rule_id, source)),
        }
    }
}
