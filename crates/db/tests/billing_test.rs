//! Billing integration tests.
//!
//! Charging is all-or-nothing: order flip, income movement and audit entry.

#![allow(clippy::uninlined_format_args)]

mod common;

use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use torque_core::Capability;
use torque_core::billing::{BillingError, ChargeRequest};
use torque_core::ledger::PaymentMethod;
use torque_db::entities::sea_orm_active_enums::{
    MovementDirection, OrderStatus, PaymentMethod as DbPaymentMethod,
};
use torque_db::entities::cash_movements;
use torque_db::repositories::BillingRepoError;
use torque_shared::ErrorKind;
use torque_shared::types::OrderId;

use common::{charge, default_now, setup};

#[tokio::test]
async fn test_charge_fresh_order() {
    let shop = setup().await;
    let order = shop.open_order().await;
    let id = OrderId(order.id);

    let charged = shop
        .billing
        .charge(id, charge(dec!(1500), PaymentMethod::Cash), shop.admin)
        .await
        .unwrap();

    assert_eq!(charged.status, OrderStatus::Delivered);
    assert_eq!(charged.amount_charged, Some(dec!(1500)));
    assert_eq!(charged.payment_method, Some(DbPaymentMethod::Cash));
    assert_eq!(charged.closed_at, Some(default_now()));

    let movements = cash_movements::Entity::find()
        .filter(cash_movements::Column::OrderId.eq(order.id))
        .all(&shop.db)
        .await
        .unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].direction, MovementDirection::Income);
    assert_eq!(movements[0].amount, dec!(1500));
    assert_eq!(movements[0].payment_method, DbPaymentMethod::Cash);
    assert_eq!(movements[0].closing_id, None);

    let actions = shop.audit_actions().await;
    assert_eq!(actions.iter().filter(|a| *a == "ORDER_CHARGED").count(), 1);
}

#[tokio::test]
async fn test_second_charge_is_already_billed() {
    let shop = setup().await;
    let order = shop.charged_order(dec!(1500), PaymentMethod::Cash).await;

    let err = shop
        .billing
        .charge(
            OrderId(order.id),
            charge(dec!(1500), PaymentMethod::Cash),
            shop.admin,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, BillingRepoError::Billing(BillingError::AlreadyBilled)));
    assert_eq!(err.kind(), ErrorKind::GuardViolation);
    assert_eq!(err.reason(), "ALREADY_BILLED");
    assert_eq!(shop.movement_count().await, 1);
}

#[tokio::test]
async fn test_charge_missing_order() {
    let shop = setup().await;

    let err = shop
        .billing
        .charge(OrderId(42), charge(dec!(10), PaymentMethod::Cash), shop.admin)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(shop.movement_count().await, 0);
}

#[tokio::test]
async fn test_cancelled_order_cannot_be_charged() {
    let shop = setup().await;
    let order = shop.open_order().await;
    let id = OrderId(order.id);
    shop.orders.transition(id, "cancelled", shop.admin).await.unwrap();

    let err = shop
        .billing
        .charge(id, charge(dec!(100), PaymentMethod::Cash), shop.admin)
        .await
        .unwrap_err();

    assert_eq!(err.reason(), "ORDER_CANCELLED");
    assert_eq!(shop.movement_count().await, 0);
}

#[tokio::test]
async fn test_invalid_charge_leaves_no_trace() {
    let shop = setup().await;
    let order = shop.open_order().await;
    let id = OrderId(order.id);
    let audit_before = shop.audit_actions().await.len();

    let err = shop
        .billing
        .charge(
            id,
            ChargeRequest {
                amount: dec!(0),
                method: PaymentMethod::Cash,
                reference: None,
            },
            shop.admin,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = shop
        .billing
        .charge(
            id,
            ChargeRequest {
                amount: dec!(300),
                method: PaymentMethod::Transfer,
                reference: None,
            },
            shop.admin,
        )
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "REFERENCE_REQUIRED");

    let unchanged = shop.orders.get(id).await.unwrap();
    assert_eq!(unchanged.status, OrderStatus::Received);
    assert_eq!(unchanged.amount_charged, None);
    assert_eq!(shop.movement_count().await, 0);
    assert_eq!(shop.audit_actions().await.len(), audit_before);
}

#[tokio::test]
async fn test_forbidden_charge_leaves_no_trace() {
    let shop = setup().await;
    let order = shop.open_order().await;
    let mechanic = shop.staff_with("Mechanic", &[Capability::ManageOrders]).await;

    let err = shop
        .billing
        .charge(
            OrderId(order.id),
            charge(dec!(500), PaymentMethod::Cash),
            mechanic,
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert_eq!(
        shop.orders.get(OrderId(order.id)).await.unwrap().status,
        OrderStatus::Received
    );
    assert_eq!(shop.movement_count().await, 0);
}

#[tokio::test]
async fn test_card_charge_keeps_reference() {
    let shop = setup().await;
    let order = shop.open_order().await;

    shop.billing
        .charge(
            OrderId(order.id),
            ChargeRequest {
                amount: dec!(300.50),
                method: PaymentMethod::Card,
                reference: Some("AUTH-5521".to_string()),
            },
            shop.admin,
        )
        .await
        .unwrap();

    let movement = cash_movements::Entity::find()
        .one(&shop.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(movement.reference.as_deref(), Some("AUTH-5521"));
    assert_eq!(movement.amount, dec!(300.50));
    assert_eq!(movement.payment_method, DbPaymentMethod::Card);
}
