//! Page-specific clients over the generic list actor.
//!
//! Each client adds named methods for the page's actions so callers never
//! build action enums by hand.

#[macro_use]
mod macros;

use crate::actor_framework::ListResourceClient;
use crate::domain::{DailyMealDraft, OrderStatus, PlanDraft, PromoCodeDraft, PurchaseStatus, ZoneDraft};
use crate::resources::{
    AssignmentAction, DailyMealAction, DailyMeals, OrderAction, Orders, PlanAction, PromoAction, PromoCodes,
    PurchaseAction, Purchases, ReviewAction, Reviews, Subscriptions, UserAction, Users, VendorAssignments,
    ZoneAction, Zones,
};

#[derive(Clone)]
pub struct OrdersClient {
    inner: ListResourceClient<Orders>,
}

impl_list_client!(OrdersClient, Orders, order);
client_action!(OrdersClient => fn update_order_status(id: String, status: OrderStatus, notes: Option<String>) as OrderAction::UpdateStatus);
client_action!(OrdersClient => fn cancel_order(id: String, reason: String) as OrderAction::Cancel);

#[derive(Clone)]
pub struct DailyMealsClient {
    inner: ListResourceClient<DailyMeals>,
}

impl_list_client!(DailyMealsClient, DailyMeals, daily_meal);
client_action!(DailyMealsClient => fn create_daily_meal(draft: DailyMealDraft) as DailyMealAction::Create(..));
client_action!(DailyMealsClient => fn update_daily_meal(id: String, draft: DailyMealDraft) as DailyMealAction::Update);
client_action!(DailyMealsClient => fn toggle_daily_meal(id: String) as DailyMealAction::ToggleActive);
client_action!(DailyMealsClient => fn delete_daily_meal(id: String) as DailyMealAction::Delete);

#[derive(Clone)]
pub struct SubscriptionsClient {
    inner: ListResourceClient<Subscriptions>,
}

impl_list_client!(SubscriptionsClient, Subscriptions, plan);
client_action!(SubscriptionsClient => fn create_plan(draft: PlanDraft) as PlanAction::Create(..));
client_action!(SubscriptionsClient => fn update_plan(id: String, draft: PlanDraft) as PlanAction::Update);
client_action!(SubscriptionsClient => fn toggle_plan(id: String) as PlanAction::ToggleStatus);
client_action!(SubscriptionsClient => fn delete_plan(id: String) as PlanAction::Delete);

#[derive(Clone)]
pub struct PurchasesClient {
    inner: ListResourceClient<Purchases>,
}

impl_list_client!(PurchasesClient, Purchases, purchase);
client_action!(PurchasesClient => fn update_purchase_status(id: String, status: PurchaseStatus, reason: Option<String>) as PurchaseAction::UpdateStatus);

#[derive(Clone)]
pub struct PromoCodesClient {
    inner: ListResourceClient<PromoCodes>,
}

impl_list_client!(PromoCodesClient, PromoCodes, promo_code);
client_action!(PromoCodesClient => fn create_promo_code(draft: PromoCodeDraft) as PromoAction::Create(..));
client_action!(PromoCodesClient => fn update_promo_code(id: String, draft: PromoCodeDraft) as PromoAction::Update);
client_action!(PromoCodesClient => fn toggle_promo_code(id: String) as PromoAction::ToggleStatus);
client_action!(PromoCodesClient => fn delete_promo_code(id: String) as PromoAction::Delete);

#[derive(Clone)]
pub struct ZonesClient {
    inner: ListResourceClient<Zones>,
}

impl_list_client!(ZonesClient, Zones, zone);
client_action!(ZonesClient => fn create_zone(draft: ZoneDraft) as ZoneAction::Create(..));
client_action!(ZonesClient => fn update_zone(id: String, draft: ZoneDraft) as ZoneAction::Update);
client_action!(ZonesClient => fn toggle_zone(id: String) as ZoneAction::ToggleStatus);
client_action!(ZonesClient => fn delete_zone(id: String) as ZoneAction::Delete);

#[derive(Clone)]
pub struct ReviewsClient {
    inner: ListResourceClient<Reviews>,
}

impl_list_client!(ReviewsClient, Reviews, review);
client_action!(ReviewsClient => fn hide_review(id: String) as ReviewAction::Hide);
client_action!(ReviewsClient => fn unhide_review(id: String) as ReviewAction::Unhide);
client_action!(ReviewsClient => fn delete_review(id: String) as ReviewAction::Delete);

#[derive(Clone)]
pub struct UsersClient {
    inner: ListResourceClient<Users>,
}

impl_list_client!(UsersClient, Users, user);
client_action!(UsersClient => fn ban_user(id: String, reason: String) as UserAction::Ban);
client_action!(UsersClient => fn unban_user(id: String) as UserAction::Unban);
client_action!(UsersClient => fn toggle_user(id: String) as UserAction::ToggleActive);
client_action!(UsersClient => fn delete_user(id: String) as UserAction::Delete);

#[derive(Clone)]
pub struct VendorAssignmentsClient {
    inner: ListResourceClient<VendorAssignments>,
}

impl_list_client!(VendorAssignmentsClient, VendorAssignments, assignment_request);
client_action!(VendorAssignmentsClient => fn assign_vendor(request_id: String, vendor_id: String, notes: Option<String>) as AssignmentAction::Assign);
client_action!(VendorAssignmentsClient => fn reject_request(request_id: String, reason: String) as AssignmentAction::Reject);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::{DetailState, ListResourceActor};
    use crate::api::Method;
    use crate::mock_framework::{expect_call, expect_get, mock_context};
    use crate::notify::NotificationLevel;
    use serde_json::json;

    #[tokio::test]
    async fn test_named_action_reaches_backend() {
        let (ctx, mut harness) = mock_context(true);
        let (actor, inner) = ListResourceActor::<Zones>::new(&ctx);
        tokio::spawn(actor.run());
        let zones = ZonesClient::new(inner);

        expect_get(&mut harness.calls, "admin/zones").await.reply(json!({ "data": { "zones": [] } }));

        let z = zones.clone();
        let task = tokio::spawn(async move { z.toggle_zone("z1".to_string()).await });
        let call = expect_call(&mut harness.calls).await;
        assert_eq!(call.request.method, Method::Patch);
        assert_eq!(call.request.path, "admin/zones/z1/toggle-status");
        call.reply(json!({ "success": true }));
        task.await.unwrap().unwrap();

        let n = harness.notifications.recv().await.unwrap();
        assert_eq!(n.level, NotificationLevel::Success);

        expect_get(&mut harness.calls, "admin/zones").await.reply(json!({ "data": { "zones": [] } }));
        zones.settled().await.unwrap();
        zones.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_get_detail_by_entity_name() {
        let (ctx, mut harness) = mock_context(true);
        let (actor, inner) = ListResourceActor::<Users>::new(&ctx);
        tokio::spawn(actor.run());
        let users = UsersClient::new(inner);

        expect_get(&mut harness.calls, "admin/users").await.reply(json!({ "data": { "users": [] } }));

        let u = users.clone();
        let task = tokio::spawn(async move { u.get_user("u1").await });
        expect_get(&mut harness.calls, "admin/users/u1")
            .await
            .reply(json!({ "data": { "user": { "_id": "u1", "name": "Asha" } } }));

        let user = task.await.unwrap().unwrap().unwrap();
        assert_eq!(user.name, "Asha");

        users.close_user().await.unwrap();
        assert_eq!(users.snapshot().await.unwrap().detail, DetailState::Closed);
    }
}
