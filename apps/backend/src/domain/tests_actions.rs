use serde_json::json;

use crate::domain::actions::{
    summarize, validate_actions, DealAction, DeliveryCondition, PaymentCondition, UsageTerms,
};
use crate::entities::deal_actions::DealActionKind;
use crate::errors::domain::{DomainError, ValidationKind};

fn payment(amount: u32) -> DealAction {
    DealAction::Payment {
        amount,
        condition: PaymentCondition::Upfront,
    }
}

#[test]
fn actions_round_trip_the_wire_tags() {
    let action = DealAction::DeliverGoods {
        goods_type: "coal".into(),
        quantity: 3,
        destination: "Basel".into(),
        condition: DeliveryCondition::Leave,
    };
    let value = serde_json::to_value(&action).expect("serialize");
    assert_eq!(
        value,
        json!({
            "type": "deliver-goods",
            "goodsType": "coal",
            "quantity": 3,
            "destination": "Basel",
            "condition": "leave",
        })
    );

    let parsed: DealAction = serde_json::from_value(value).expect("deserialize");
    assert_eq!(parsed, action);
    assert_eq!(parsed.kind(), DealActionKind::DeliverGoods);
}

#[test]
fn payment_conditions_use_kebab_case() {
    let action = DealAction::Payment {
        amount: 5,
        condition: PaymentCondition::OnCompletion,
    };
    let value = serde_json::to_value(&action).expect("serialize");
    assert_eq!(value["condition"], "on-completion");
}

#[test]
fn track_usage_omits_absent_fee() {
    let action = DealAction::TrackUsage {
        usage_type: UsageTerms::Free,
        times: 2,
        fee: None,
    };
    let value = serde_json::to_value(&action).expect("serialize");
    assert_eq!(value["usageType"], "free");
    assert!(value.get("fee").is_none());
}

#[test]
fn unknown_action_tag_is_rejected() {
    let err = serde_json::from_value::<DealAction>(json!({"type": "barter", "text": "x"}))
        .expect_err("unknown tag");
    assert!(err.to_string().contains("barter"));
}

#[test]
fn both_sides_empty_is_no_actions() {
    let err = validate_actions(&[], &[]).expect_err("empty deal");
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::NoActions, _)
    ));
}

#[test]
fn one_sided_deal_is_allowed() {
    validate_actions(&[payment(5)], &[]).expect("one side may be empty");
    validate_actions(&[], &[payment(5)]).expect("other side may be empty");
}

#[test]
fn zero_quantity_delivery_is_invalid() {
    let bad = DealAction::DeliverGoods {
        goods_type: "wine".into(),
        quantity: 0,
        destination: "Lyon".into(),
        condition: DeliveryCondition::Pickup,
    };
    let err = validate_actions(&[bad], &[]).expect_err("quantity 0");
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidAction, _)
    ));
}

#[test]
fn fee_usage_requires_positive_fee() {
    for fee in [None, Some(0)] {
        let bad = DealAction::TrackUsage {
            usage_type: UsageTerms::Fee,
            times: 1,
            fee,
        };
        assert!(validate_actions(&[bad], &[]).is_err());
    }
    let ok = DealAction::TrackUsage {
        usage_type: UsageTerms::Fee,
        times: 1,
        fee: Some(2),
    };
    validate_actions(&[ok], &[]).expect("positive fee");
}

#[test]
fn free_usage_rejects_fee() {
    let bad = DealAction::TrackUsage {
        usage_type: UsageTerms::Free,
        times: 1,
        fee: Some(1),
    };
    assert!(validate_actions(&[bad], &[]).is_err());
}

#[test]
fn blank_custom_text_is_invalid() {
    let bad = DealAction::Custom { text: "   ".into() };
    assert!(validate_actions(&[bad], &[]).is_err());
}

#[test]
fn summary_joins_action_descriptions() {
    let actions = vec![
        payment(5),
        DealAction::DeliverGoods {
            goods_type: "coal".into(),
            quantity: 3,
            destination: "Basel".into(),
            condition: DeliveryCondition::Leave,
        },
    ];
    let summary = summarize(&actions);
    assert_eq!(summary, "pay 5 upfront; deliver 3 coal to Basel (leave)");
}
