//! Generated text: chat greetings, customer matching and SMS invitations.
//!
//! The hosted generator is replaced by [`FakeGenerator`]; every feature must
//! keep working when it fails.

use mian_bakery_admin::AdminError;
use mian_bakery_admin::services::outreach::fallback_invite;
use mian_bakery_admin::services::{OutreachService, ProductAdminService};
use mian_bakery_core::{OrderStatus, ProductId};
use mian_bakery_integration_tests::{
    FakeGenerator, LAN_PHONE, MINH_PHONE, customer, noon, order_at, seeded_store,
};
use mian_bakery_store::{OrderRepository, RecordStore};
use mian_bakery_storefront::services::GreetingService;

const CAKE: &str = "Bánh Kem Dâu Tây";
const CHEESE_BREAD: &str = "Bánh Mì Phô Mai Chảy";

async fn store_with_regulars() -> RecordStore {
    let store = seeded_store().await.expect("store");
    let repo = OrderRepository::new(&store);
    let mut baking = order_at("Lan", Some(LAN_PHONE), (CAKE, 55_000, 2), noon(2025, 5, 20));
    baking.status = OrderStatus::Baking;
    for order in [
        order_at("Lan", Some(LAN_PHONE), (CHEESE_BREAD, 45_000, 3), noon(2025, 4, 2)),
        baking,
        order_at("Minh", Some(MINH_PHONE), (CHEESE_BREAD, 45_000, 1), noon(2025, 3, 1)),
        order_at("Khách lẻ", None, (CAKE, 55_000, 1), noon(2025, 5, 1)),
    ] {
        repo.insert_new(&order).await.expect("insert");
    }
    store
}

#[tokio::test]
async fn test_greeting_mentions_order_in_progress() {
    let store = store_with_regulars().await;
    let generator =
        FakeGenerator::scripted([Some("  Chào Lan! Bánh của bạn đang được nhồi bột 🍓  ")]);

    let greeting = GreetingService::new(&store, &generator, 90)
        .greet(&customer("Lan", LAN_PHONE))
        .await
        .expect("greeting");
    assert_eq!(greeting, "Chào Lan! Bánh của bạn đang được nhồi bột 🍓");

    let requests = generator.requests();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].expect_json);
    assert!(requests[0].prompt.contains("Lan"));
    assert!(requests[0].prompt.contains(CAKE));
    assert!(requests[0].prompt.contains(OrderStatus::Baking.label()));
}

#[tokio::test]
async fn test_greeting_falls_back_when_generation_fails() {
    let store = store_with_regulars().await;
    let generator = FakeGenerator::failing();

    let greeting = GreetingService::new(&store, &generator, 90)
        .greet(&customer("Minh", MINH_PHONE))
        .await
        .expect("greeting");
    assert!(greeting.starts_with("Chào Minh!"));
    assert_eq!(generator.requests().len(), 1);
}

#[tokio::test]
async fn test_greeting_promotes_batch_to_inactive_customer() {
    let store = store_with_regulars().await;
    ProductAdminService::new(&store)
        .toggle_batch(&ProductId::new("2"))
        .await
        .expect("toggle");
    let generator = FakeGenerator::scripted([Some("Lâu rồi không gặp!")]);

    GreetingService::new(&store, &generator, 90)
        .greet(&customer("Minh", MINH_PHONE))
        .await
        .expect("greeting");

    let requests = generator.requests();
    assert!(requests[0].prompt.contains("gom đơn"));
    assert!(requests[0].prompt.contains(CAKE));
}

#[tokio::test]
async fn test_customers_are_built_from_orders_with_phones() {
    let store = store_with_regulars().await;
    let generator = FakeGenerator::failing();
    let customers = OutreachService::new(&store, &generator)
        .customers()
        .await
        .expect("customers");

    let summary: Vec<_> = customers
        .iter()
        .map(|c| (c.id.as_str(), c.order_count))
        .collect();
    assert_eq!(summary, vec![(LAN_PHONE, 2), (MINH_PHONE, 1)]);
    assert_eq!(customers[0].favourite_products, vec![CHEESE_BREAD, CAKE]);
}

#[tokio::test]
async fn test_match_customers_keeps_known_ids_and_sorts() {
    let store = store_with_regulars().await;
    let response = format!(
        r#"[
            {{"customerId": "{MINH_PHONE}", "matchScore": 40, "reason": "Thỉnh thoảng ghé"}},
            {{"customerId": "0999999999", "matchScore": 99, "reason": "Không có thật"}},
            {{"customerId": "{LAN_PHONE}", "matchScore": 120, "reason": "Mê phô mai"}}
        ]"#
    );
    let generator = FakeGenerator::scripted([Some(response)]);

    let matches = OutreachService::new(&store, &generator)
        .match_customers(&ProductId::new("1"))
        .await
        .expect("matches");

    let ranked: Vec<_> = matches
        .iter()
        .map(|m| (m.customer_id.as_str(), m.match_score))
        .collect();
    assert_eq!(ranked, vec![(LAN_PHONE, 100.0), (MINH_PHONE, 40.0)]);
    assert!(matches[0].is_high());
    assert!(!matches[1].is_high());

    let requests = generator.requests();
    assert!(requests[0].expect_json);
    assert!(requests[0].schema.is_some());
    assert!(requests[0].prompt.contains(CHEESE_BREAD));
    assert!(requests[0].prompt.contains(LAN_PHONE));
    assert!(!requests[0].prompt.contains("Khách lẻ"));
}

#[tokio::test]
async fn test_match_customers_is_empty_when_generation_fails() {
    let store = store_with_regulars().await;
    let generator = FakeGenerator::failing();
    let matches = OutreachService::new(&store, &generator)
        .match_customers(&ProductId::new("1"))
        .await
        .expect("matches");
    assert!(matches.is_empty());
}

#[tokio::test]
async fn test_sms_invite_uses_generated_text() {
    let store = store_with_regulars().await;
    let generator = FakeGenerator::scripted([Some("Mẻ phô mai mới ra lò nè chị Lan!")]);

    let invite = OutreachService::new(&store, &generator)
        .sms_invite(LAN_PHONE, &ProductId::new("1"))
        .await
        .expect("invite");
    assert_eq!(invite.body, "Mẻ phô mai mới ra lò nè chị Lan!");
    assert!(invite.sms_uri.starts_with(&format!("sms:{LAN_PHONE}?body=")));
    assert!(!invite.sms_uri.contains(' '));
    assert_eq!(invite.tel_uri, format!("tel:{LAN_PHONE}"));
    assert!(generator.requests()[0].prompt.contains("Chị từng mua"));
}

#[tokio::test]
async fn test_sms_invite_falls_back() {
    let store = store_with_regulars().await;
    let generator = FakeGenerator::failing();
    let invite = OutreachService::new(&store, &generator)
        .sms_invite(MINH_PHONE, &ProductId::new("2"))
        .await
        .expect("invite");
    assert_eq!(invite.body, fallback_invite("Minh", CAKE));
}

#[tokio::test]
async fn test_sms_invite_for_unknown_customer() {
    let store = store_with_regulars().await;
    let generator = FakeGenerator::failing();
    let err = OutreachService::new(&store, &generator)
        .sms_invite("0988888888", &ProductId::new("1"))
        .await
        .expect_err("unknown customer");
    assert!(matches!(err, AdminError::NotFound(_)));
    assert!(generator.requests().is_empty());
}
