use tracing::{info, info_span, warn, Instrument};

use meal_admin_console::actor_framework::{ListSnapshot, LoadState, Resource};
use meal_admin_console::app_system::{setup_tracing, AdminConsole};
use meal_admin_console::config::ConsoleConfig;
use meal_admin_console::error::ResourceError;
use meal_admin_console::insights::{format, Period, Section};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    let config = ConsoleConfig::from_env()?;
    info!("Starting admin console run");

    let console = AdminConsole::new(&config)?;

    async {
        let dashboard = console.dashboard.load().await;
        match &dashboard.overview {
            Section::Loaded(o) => info!(
                users = o.total_users,
                active_subscriptions = o.active_subscriptions,
                todays_orders = o.todays_orders,
                revenue = %format::inr(o.total_revenue),
                pending_vendor_requests = o.pending_vendor_requests,
                "Overview"
            ),
            Section::Empty(message) => warn!(%message, "Overview"),
        }
        if let Section::Loaded(orders) = &dashboard.recent_orders {
            for o in orders {
                info!(
                    order = o.order_number.as_deref().unwrap_or(&o.id),
                    status = o.status.as_str(),
                    date = %o.delivery_date.as_deref().map(format::date).unwrap_or_default(),
                    "Recent order"
                );
            }
        }
    }
    .instrument(info_span!("dashboard"))
    .await;

    let report = console.analytics.load(Period::default()).await;
    info!(
        period = %report.period,
        revenue = %format::inr(report.total_revenue()),
        orders = report.total_orders(),
        "Analytics"
    );

    summarize(console.orders.settled().await)?;
    summarize(console.daily_meals.settled().await)?;
    summarize(console.subscriptions.settled().await)?;
    summarize(console.purchases.settled().await)?;
    summarize(console.promo_codes.settled().await)?;
    summarize(console.zones.settled().await)?;
    summarize(console.reviews.settled().await)?;
    summarize(console.users.settled().await)?;
    summarize(console.vendor_assignments.settled().await)?;

    console.shutdown().await?;
    info!("Admin console run complete");
    Ok(())
}

fn summarize<R: Resource>(snapshot: Result<ListSnapshot<R>, ResourceError>) -> Result<(), ResourceError> {
    let snapshot = snapshot?;
    let pager = snapshot.pager();
    match &snapshot.load_state {
        LoadState::Failed(message) => warn!(page = R::NAME, %message, "Page failed to load"),
        _ if snapshot.is_empty() => info!(page = R::NAME, "{}", R::EMPTY_MESSAGE),
        _ => info!(
            page = R::NAME,
            rows = snapshot.items.len(),
            total = snapshot.pagination.total_items,
            page_no = pager.page,
            pages = pager.total_pages,
            stats = ?snapshot.page_stats,
            "First page"
        ),
    }
    Ok(())
}
