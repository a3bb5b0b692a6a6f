//! Structured deal action payloads.
//!
//! Each deal carries an itemized list of actions, serialized as tagged JSON
//! (`"type"` discriminator). Validation lives here so both the HTTP layer and
//! the persistence layer agree on what a well-formed action looks like.

use serde::{Deserialize, Serialize};

use crate::entities::deal_actions::DealActionKind;
use crate::errors::domain::{DomainError, ValidationKind};

/// Delivery condition for goods: left at the destination or held for pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryCondition {
    Leave,
    Pickup,
}

/// When a payment falls due relative to the deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentCondition {
    Upfront,
    OnCompletion,
    OnPickup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageTerms {
    Free,
    Fee,
}

/// One itemized commitment within a deal. The serde tag matches the wire
/// format and the `deal_action_kind` column values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DealAction {
    #[serde(rename = "deliver-goods", rename_all = "camelCase")]
    DeliverGoods {
        goods_type: String,
        quantity: u32,
        destination: String,
        condition: DeliveryCondition,
    },
    #[serde(rename = "payment", rename_all = "camelCase")]
    Payment { amount: u32, condition: PaymentCondition },
    #[serde(rename = "track-usage", rename_all = "camelCase")]
    TrackUsage {
        usage_type: UsageTerms,
        times: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fee: Option<u32>,
    },
    #[serde(rename = "custom-action", rename_all = "camelCase")]
    Custom { text: String },
}

impl DealAction {
    pub fn kind(&self) -> DealActionKind {
        match self {
            DealAction::DeliverGoods { .. } => DealActionKind::DeliverGoods,
            DealAction::Payment { .. } => DealActionKind::Payment,
            DealAction::TrackUsage { .. } => DealActionKind::TrackUsage,
            DealAction::Custom { .. } => DealActionKind::Custom,
        }
    }

    /// Field-level validation beyond what serde's shape check gives us.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            DealAction::DeliverGoods {
                goods_type,
                quantity,
                destination,
                ..
            } => {
                if goods_type.trim().is_empty() {
                    return Err(invalid("goodsType must not be empty"));
                }
                if *quantity == 0 {
                    return Err(invalid("quantity must be at least 1"));
                }
                if destination.trim().is_empty() {
                    return Err(invalid("destination must not be empty"));
                }
            }
            DealAction::Payment { amount, .. } => {
                if *amount == 0 {
                    return Err(invalid("amount must be at least 1"));
                }
            }
            DealAction::TrackUsage {
                usage_type,
                times,
                fee,
            } => {
                if *times == 0 {
                    return Err(invalid("times must be at least 1"));
                }
                match (usage_type, fee) {
                    (UsageTerms::Fee, None | Some(0)) => {
                        return Err(invalid("fee must be a positive amount when usageType is fee"))
                    }
                    (UsageTerms::Free, Some(_)) => {
                        return Err(invalid("fee is not allowed when usageType is free"))
                    }
                    _ => {}
                }
            }
            DealAction::Custom { text } => {
                if text.trim().is_empty() {
                    return Err(invalid("text must not be empty"));
                }
            }
        }
        Ok(())
    }

    /// Short human-readable form, used to build a deal's summary line.
    pub fn describe(&self) -> String {
        match self {
            DealAction::DeliverGoods {
                goods_type,
                quantity,
                destination,
                condition,
            } => {
                let cond = match condition {
                    DeliveryCondition::Leave => "leave",
                    DeliveryCondition::Pickup => "pickup",
                };
                format!("deliver {quantity} {goods_type} to {destination} ({cond})")
            }
            DealAction::Payment { amount, condition } => {
                let cond = match condition {
                    PaymentCondition::Upfront => "upfront",
                    PaymentCondition::OnCompletion => "on completion",
                    PaymentCondition::OnPickup => "on pickup",
                };
                format!("pay {amount} {cond}")
            }
            DealAction::TrackUsage {
                usage_type, times, fee, ..
            } => match usage_type {
                UsageTerms::Free => format!("track usage free x{times}"),
                UsageTerms::Fee => {
                    format!("track usage x{times} at {} each", fee.unwrap_or(0))
                }
            },
            DealAction::Custom { text } => text.clone(),
        }
    }
}

/// Validate both sides' action lists as submitted with a new deal.
/// One side may commit to nothing, but not both.
pub fn validate_actions(
    proposer_actions: &[DealAction],
    receiver_actions: &[DealAction],
) -> Result<(), DomainError> {
    if proposer_actions.is_empty() && receiver_actions.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::NoActions,
            "a deal must include at least one action",
        ));
    }
    for action in proposer_actions.iter().chain(receiver_actions) {
        action.validate()?;
    }
    Ok(())
}

/// Build the one-line summary stored on the deal row.
pub fn summarize(actions: &[DealAction]) -> String {
    actions
        .iter()
        .map(DealAction::describe)
        .collect::<Vec<_>>()
        .join("; ")
}

fn invalid(detail: &str) -> DomainError {
    DomainError::validation(ValidationKind::InvalidAction, detail)
}
