mod support;

use medistore::api::ApiError;
use medistore::error::AppError;
use medistore::models::{LoginRequest, MedicineQuery, OrderStatus, ProfileUpdate, ReviewInput, Role};
use medistore::services::notifications::{self, StatusWatch};
use medistore::services::{account, catalog, checkout, orders};
use support::{shipping, TestApp, PASSWORD, SELLER_EMAIL};
use teloxide::types::ChatId;

const CUSTOMER: ChatId = ChatId(1);
const SELLER: ChatId = ChatId(2);

#[tokio::test]
async fn customer_browses_and_places_an_order() {
    let app = TestApp::spawn().await;
    app.customer(CUSTOMER, "mina@example.com").await;

    let found = catalog::browse(&app.ctx, CUSTOMER, &MedicineQuery::default())
        .await
        .unwrap();
    assert_eq!(found, 2);

    let found = catalog::browse(
        &app.ctx,
        CUSTOMER,
        &MedicineQuery {
            search: Some("napa".into()),
            category_id: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(found, 1);

    let cart = catalog::add_to_cart(&app.ctx, CUSTOMER, "m1", 3).await.unwrap();
    assert_eq!(cart.total_items(), 3);
    assert_eq!(cart.total_price(), 7.5);

    let order = checkout::place_order(&app.ctx, CUSTOMER, &shipping())
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Placed);
    assert_eq!(order.total_amount, 7.5);
    assert_eq!(order.items[0].quantity, 3);
    assert_eq!(order.shipping_phone, "01812345678");

    assert!(app.ctx.carts.snapshot(CUSTOMER).is_empty());
    assert_eq!(app.backend().stock_of("m1"), 2);

    let role = orders::load_orders(&app.ctx, CUSTOMER).await.unwrap();
    assert_eq!(role, Role::Customer);
    let listing = app.ctx.views.orders.get(&CUSTOMER).unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing.items()[0].id, order.id);
}

#[tokio::test]
async fn adding_more_than_the_stock_leaves_the_cart_unchanged() {
    let app = TestApp::spawn().await;

    catalog::add_to_cart(&app.ctx, CUSTOMER, "m1", 3).await.unwrap();
    let err = catalog::add_to_cart(&app.ctx, CUSTOMER, "m1", 3)
        .await
        .unwrap_err();

    match err {
        AppError::OutOfStock { name, available } => {
            assert_eq!(name, "Napa Extra");
            assert_eq!(available, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(app.ctx.carts.snapshot(CUSTOMER).quantity_of("m1"), 3);

    let err = checkout::change_quantity(&app.ctx, CUSTOMER, "m1", 3).unwrap_err();
    assert!(matches!(err, AppError::OutOfStock { .. }));
    let cart = checkout::change_quantity(&app.ctx, CUSTOMER, "m1", -3).unwrap();
    assert!(cart.is_empty());
}

#[tokio::test]
async fn checkout_needs_a_signed_in_chat_and_a_cart() {
    let app = TestApp::spawn().await;

    catalog::add_to_cart(&app.ctx, CUSTOMER, "m2", 1).await.unwrap();
    let err = checkout::place_order(&app.ctx, CUSTOMER, &shipping())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotSignedIn));

    app.customer(ChatId(3), "rafi@example.com").await;
    let err = checkout::place_order(&app.ctx, ChatId(3), &shipping())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EmptyCart));
}

#[tokio::test]
async fn customer_cancels_a_placed_order_once() {
    let app = TestApp::spawn().await;
    app.customer(CUSTOMER, "mina@example.com").await;
    catalog::add_to_cart(&app.ctx, CUSTOMER, "m2", 2).await.unwrap();
    let order = checkout::place_order(&app.ctx, CUSTOMER, &shipping())
        .await
        .unwrap();
    orders::load_orders(&app.ctx, CUSTOMER).await.unwrap();

    let cancelled = orders::cancel_order(&app.ctx, CUSTOMER, &order.id)
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    let cached = orders::order_detail(&app.ctx, CUSTOMER, &order.id)
        .await
        .unwrap();
    assert_eq!(cached.status, OrderStatus::Cancelled);

    let err = orders::cancel_order(&app.ctx, CUSTOMER, &order.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Transition(_)));
}

#[tokio::test]
async fn failed_status_change_restores_the_cached_order() {
    let app = TestApp::spawn().await;
    app.customer(CUSTOMER, "mina@example.com").await;
    catalog::add_to_cart(&app.ctx, CUSTOMER, "m1", 1).await.unwrap();
    let order = checkout::place_order(&app.ctx, CUSTOMER, &shipping())
        .await
        .unwrap();

    account::login(
        &app.ctx,
        SELLER,
        LoginRequest {
            email: SELLER_EMAIL.into(),
            password: PASSWORD.into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(orders::load_orders(&app.ctx, SELLER).await.unwrap(), Role::Seller);

    app.backend().fail_status_updates = true;
    let err = orders::update_status(&app.ctx, SELLER, &order.id, OrderStatus::Processing)
        .await
        .unwrap_err();
    match err {
        AppError::Api(ApiError::Rejected { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Database unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let status = app
        .ctx
        .views
        .orders
        .get(&SELLER)
        .and_then(|listing| listing.find(&order.id).map(|o| o.status));
    assert_eq!(status, Some(OrderStatus::Placed));

    app.backend().fail_status_updates = false;
    let updated = orders::update_status(&app.ctx, SELLER, &order.id, OrderStatus::Processing)
        .await
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Processing);
    let status = app
        .ctx
        .views
        .orders
        .get(&SELLER)
        .and_then(|listing| listing.find(&order.id).map(|o| o.status));
    assert_eq!(status, Some(OrderStatus::Processing));
}

#[tokio::test]
async fn customers_cannot_change_order_status() {
    let app = TestApp::spawn().await;
    app.customer(CUSTOMER, "mina@example.com").await;

    let err = orders::update_status(&app.ctx, CUSTOMER, "o1", OrderStatus::Shipped)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(Role::Seller)));
}

#[tokio::test]
async fn customer_reviews_a_medicine() {
    let app = TestApp::spawn().await;
    app.customer(CUSTOMER, "mina@example.com").await;

    let review = catalog::post_review(
        &app.ctx,
        CUSTOMER,
        &ReviewInput {
            medicine_id: "m2".into(),
            rating: 4,
            comment: "Works well for acidity".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(review.rating, 4);

    let (medicine, reviews) = catalog::medicine_detail(&app.ctx, ChatId(9), "m2")
        .await
        .unwrap();
    assert_eq!(medicine.name, "Seclo 20");
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].comment, "Works well for acidity");
    assert_eq!(
        reviews[0].user.as_ref().map(|u| u.name.as_str()),
        Some("Mina Rahman")
    );

    let err = catalog::post_review(
        &app.ctx,
        ChatId(9),
        &ReviewInput {
            medicine_id: "m2".into(),
            rating: 5,
            comment: String::new(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotSignedIn));
}

#[tokio::test]
async fn profile_changes_are_kept_for_the_chat() {
    let app = TestApp::spawn().await;
    app.customer(CUSTOMER, "mina@example.com").await;

    let user = account::update_profile(
        &app.ctx,
        CUSTOMER,
        ProfileUpdate {
            address: Some("12 Lake Road, Dhaka".into()),
            ..ProfileUpdate::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(user.address.as_deref(), Some("12 Lake Road, Dhaka"));
    assert_eq!(user.name, "Mina Rahman");

    let cached = app.ctx.current_user(CUSTOMER).await.unwrap().unwrap();
    assert_eq!(cached.address.as_deref(), Some("12 Lake Road, Dhaka"));

    // Nothing to change, so no request goes out.
    app.backend().revoke_tokens = true;
    let user = account::update_profile(&app.ctx, CUSTOMER, ProfileUpdate::default())
        .await
        .unwrap();
    assert_eq!(user.address.as_deref(), Some("12 Lake Road, Dhaka"));
}

#[tokio::test]
async fn seller_signing_in_after_a_customer_hears_only_new_orders() {
    let app = TestApp::spawn().await;
    let watch = StatusWatch::new();
    app.customer(CUSTOMER, "mina@example.com").await;
    catalog::add_to_cart(&app.ctx, CUSTOMER, "m2", 1).await.unwrap();
    checkout::place_order(&app.ctx, CUSTOMER, &shipping())
        .await
        .unwrap();

    let shared = ChatId(5);
    app.customer(shared, "rafi@example.com").await;
    let events = notifications::poll_chat(&app.ctx, &watch, shared).await.unwrap();
    assert!(events.is_empty());

    account::logout(&app.ctx, shared).await.unwrap();
    account::login(
        &app.ctx,
        shared,
        LoginRequest {
            email: SELLER_EMAIL.into(),
            password: PASSWORD.into(),
        },
    )
    .await
    .unwrap();
    let events = notifications::poll_chat(&app.ctx, &watch, shared).await.unwrap();
    assert!(events.is_empty());

    catalog::add_to_cart(&app.ctx, CUSTOMER, "m1", 1).await.unwrap();
    checkout::place_order(&app.ctx, CUSTOMER, &shipping())
        .await
        .unwrap();
    let events = notifications::poll_chat(&app.ctx, &watch, shared).await.unwrap();
    assert_eq!(events.len(), 1);
}
