mod support;

use medistore::api::ApiError;
use medistore::error::AppError;
use medistore::models::{CategoryInput, OrderStatus, Role, UserStatus};
use medistore::services::{admin, catalog, checkout, orders};
use support::{shipping, TestApp, ADMIN_EMAIL};
use teloxide::types::ChatId;

const ADMIN: ChatId = ChatId(10);
const CUSTOMER: ChatId = ChatId(11);

async fn customer_id(app: &TestApp) -> String {
    app.ctx.current_user(CUSTOMER).await.unwrap().unwrap().id
}

fn user_ids(app: &TestApp) -> Vec<String> {
    app.ctx
        .views
        .users
        .get(&ADMIN)
        .map(|listing| listing.items().iter().map(|u| u.id.clone()).collect())
        .unwrap_or_default()
}

fn cached_status(app: &TestApp, user_id: &str) -> Option<UserStatus> {
    app.ctx
        .views
        .users
        .get(&ADMIN)
        .and_then(|listing| listing.find(user_id).map(|u| u.status))
}

fn category(name: &str) -> CategoryInput {
    CategoryInput {
        name: name.into(),
        description: None,
    }
}

#[tokio::test]
async fn admin_bans_and_reinstates_a_customer() {
    let app = TestApp::spawn().await;
    app.customer(CUSTOMER, "mina@example.com").await;
    app.staff(ADMIN, ADMIN_EMAIL).await;
    let target = customer_id(&app).await;

    assert_eq!(admin::load_users(&app.ctx, ADMIN).await.unwrap(), 3);

    let banned = admin::toggle_user_status(&app.ctx, ADMIN, &target)
        .await
        .unwrap();
    assert_eq!(banned.status, UserStatus::Banned);
    assert_eq!(cached_status(&app, &target), Some(UserStatus::Banned));
    assert_eq!(
        app.backend().user(&target).unwrap()["status"],
        "banned"
    );

    let active = admin::toggle_user_status(&app.ctx, ADMIN, &target)
        .await
        .unwrap();
    assert_eq!(active.status, UserStatus::Active);
    assert_eq!(cached_status(&app, &target), Some(UserStatus::Active));
}

#[tokio::test]
async fn admin_cannot_ban_or_delete_their_own_account() {
    let app = TestApp::spawn().await;
    app.staff(ADMIN, ADMIN_EMAIL).await;
    admin::load_users(&app.ctx, ADMIN).await.unwrap();

    let err = admin::toggle_user_status(&app.ctx, ADMIN, "a1")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::OwnAccount));
    let err = admin::delete_user(&app.ctx, ADMIN, "a1").await.unwrap_err();
    assert!(matches!(err, AppError::OwnAccount));

    assert_eq!(user_ids(&app), vec!["s1", "a1"]);
    assert!(app.backend().user("a1").is_some());

    let err = admin::toggle_user_status(&app.ctx, ADMIN, "u404")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn failed_delete_restores_the_row_at_its_position() {
    let app = TestApp::spawn().await;
    app.customer(CUSTOMER, "mina@example.com").await;
    app.staff(ADMIN, ADMIN_EMAIL).await;
    let target = customer_id(&app).await;
    admin::load_users(&app.ctx, ADMIN).await.unwrap();
    assert_eq!(user_ids(&app), vec!["s1", "a1", target.as_str()]);

    app.backend().fail_deletes = true;
    let err = admin::delete_user(&app.ctx, ADMIN, "s1").await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Api(ApiError::Rejected { status: 500, .. })
    ));
    assert_eq!(user_ids(&app), vec!["s1", "a1", target.as_str()]);

    app.backend().fail_deletes = false;
    admin::delete_user(&app.ctx, ADMIN, &target).await.unwrap();
    assert_eq!(user_ids(&app), vec!["s1", "a1"]);
    assert!(app.backend().user(&target).is_none());
}

#[tokio::test]
async fn admin_manages_categories() {
    let app = TestApp::spawn().await;
    app.staff(ADMIN, ADMIN_EMAIL).await;

    let created = admin::save_category(&app.ctx, ADMIN, None, &category("Vitamins"))
        .await
        .unwrap();
    assert_eq!(created.name, "Vitamins");

    let renamed = admin::save_category(
        &app.ctx,
        ADMIN,
        Some(&created.id),
        &category("Vitamins & Minerals"),
    )
    .await
    .unwrap();
    assert_eq!(renamed.id, created.id);
    let names: Vec<String> = catalog::categories(&app.ctx, ADMIN)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Pain Relief", "Gastrointestinal", "Vitamins & Minerals"]);

    let err = admin::save_category(&app.ctx, ADMIN, None, &category("Pain Relief"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Category already exists");

    let err = admin::delete_category(&app.ctx, ADMIN, "c1").await.unwrap_err();
    assert_eq!(err.to_string(), "Category still has medicines");

    admin::delete_category(&app.ctx, ADMIN, &created.id)
        .await
        .unwrap();
    assert_eq!(
        app.backend().category_names(),
        vec!["Pain Relief", "Gastrointestinal"]
    );
}

#[tokio::test]
async fn admin_sees_and_moves_every_order() {
    let app = TestApp::spawn().await;
    app.customer(CUSTOMER, "mina@example.com").await;
    catalog::add_to_cart(&app.ctx, CUSTOMER, "m2", 1).await.unwrap();
    let order = checkout::place_order(&app.ctx, CUSTOMER, &shipping())
        .await
        .unwrap();

    app.staff(ADMIN, ADMIN_EMAIL).await;
    assert_eq!(orders::load_orders(&app.ctx, ADMIN).await.unwrap(), Role::Admin);
    assert_eq!(app.ctx.views.orders.get(&ADMIN).unwrap().len(), 1);

    let updated = orders::update_status(&app.ctx, ADMIN, &order.id, OrderStatus::Processing)
        .await
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Processing);
}

#[tokio::test]
async fn admin_pages_are_closed_to_other_roles() {
    let app = TestApp::spawn().await;
    app.customer(CUSTOMER, "mina@example.com").await;

    let err = admin::load_users(&app.ctx, CUSTOMER).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(Role::Admin)));
    let err = admin::save_category(&app.ctx, CUSTOMER, None, &category("Vitamins"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(Role::Admin)));
    assert_eq!(app.backend().category_names().len(), 2);
}
