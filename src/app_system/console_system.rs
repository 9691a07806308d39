use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::actor_framework::{ActorContext, ListResourceActor, ListResourceClient, Resource};
use crate::api::{HttpTransport, SharedTransport};
use crate::clients::{
    DailyMealsClient, OrdersClient, PromoCodesClient, PurchasesClient, ReviewsClient, SubscriptionsClient,
    UsersClient, VendorAssignmentsClient, ZonesClient,
};
use crate::config::ConsoleConfig;
use crate::error::{ApiError, ResourceError};
use crate::insights::{AnalyticsService, DashboardService};
use crate::notify::{log_notifications, AutoConfirm, Confirm, Notifier, TerminalConfirm};

/// Every admin page, running.
///
/// Starting the console spawns one actor per list page; each fetches its
/// first page straight away. Shutdown stops them all and waits for the
/// notification log to drain.
pub struct AdminConsole {
    pub orders: OrdersClient,
    pub daily_meals: DailyMealsClient,
    pub subscriptions: SubscriptionsClient,
    pub purchases: PurchasesClient,
    pub promo_codes: PromoCodesClient,
    pub zones: ZonesClient,
    pub reviews: ReviewsClient,
    pub users: UsersClient,
    pub vendor_assignments: VendorAssignmentsClient,
    pub dashboard: DashboardService,
    pub analytics: AnalyticsService,
    handles: Vec<JoinHandle<()>>,
    notification_log: Option<JoinHandle<()>>,
}

impl AdminConsole {
    /// Console against the real backend, logging notifications.
    pub fn new(config: &ConsoleConfig) -> Result<Self, ApiError> {
        let transport: SharedTransport = Arc::new(HttpTransport::new(
            &config.api_base_url,
            config.api_token.clone(),
            config.request_timeout,
        )?);
        let confirm: Arc<dyn Confirm> =
            if config.assume_yes { Arc::new(AutoConfirm(true)) } else { Arc::new(TerminalConfirm::default()) };
        let (notifier, notifications) = Notifier::channel();

        let ctx = ActorContext {
            transport,
            notifier,
            confirm,
            buffer_size: config.actor_buffer,
            page_limit: config.page_limit,
        };
        let mut console = Self::with_context(ctx);
        console.notification_log = Some(tokio::spawn(log_notifications(notifications)));
        Ok(console)
    }

    /// Console over an existing context. Whoever created the context's
    /// notifier owns the receiving end.
    pub fn with_context(ctx: ActorContext) -> Self {
        info!("Starting admin console");
        let mut handles = Vec::new();

        Self {
            orders: OrdersClient::new(spawn_page(&ctx, &mut handles)),
            daily_meals: DailyMealsClient::new(spawn_page(&ctx, &mut handles)),
            subscriptions: SubscriptionsClient::new(spawn_page(&ctx, &mut handles)),
            purchases: PurchasesClient::new(spawn_page(&ctx, &mut handles)),
            promo_codes: PromoCodesClient::new(spawn_page(&ctx, &mut handles)),
            zones: ZonesClient::new(spawn_page(&ctx, &mut handles)),
            reviews: ReviewsClient::new(spawn_page(&ctx, &mut handles)),
            users: UsersClient::new(spawn_page(&ctx, &mut handles)),
            vendor_assignments: VendorAssignmentsClient::new(spawn_page(&ctx, &mut handles)),
            dashboard: DashboardService::new(ctx.transport.clone()),
            analytics: AnalyticsService::new(ctx.transport.clone()),
            handles,
            notification_log: None,
        }
    }

    pub async fn shutdown(self) -> Result<(), ResourceError> {
        info!("Shutting down admin console...");

        let results = [
            ("orders", self.orders.shutdown().await),
            ("daily_meals", self.daily_meals.shutdown().await),
            ("subscriptions", self.subscriptions.shutdown().await),
            ("purchases", self.purchases.shutdown().await),
            ("promo_codes", self.promo_codes.shutdown().await),
            ("zones", self.zones.shutdown().await),
            ("reviews", self.reviews.shutdown().await),
            ("users", self.users.shutdown().await),
            ("vendor_assignments", self.vendor_assignments.shutdown().await),
        ];
        for (page, result) in results {
            if let Err(e) = result {
                warn!(page, error = %e, "Page already stopped");
            }
        }

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(ResourceError::ActorCommunicationError(format!("Actor task failed: {:?}", e)));
            }
        }

        // Ends once the last actor has dropped its notifier.
        if let Some(log) = self.notification_log {
            let _ = log.await;
        }

        info!("Admin console stopped.");
        Ok(())
    }
}

fn spawn_page<R: Resource>(ctx: &ActorContext, handles: &mut Vec<JoinHandle<()>>) -> ListResourceClient<R> {
    let (actor, client) = ListResourceActor::<R>::new(ctx);
    handles.push(tokio::spawn(actor.run()));
    client
}
