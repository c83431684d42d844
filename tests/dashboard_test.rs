//! Dashboard controller tests
//!
//! Runs the controller against the scripted `MockApi` and inspects what the
//! `RecordingView` was asked to render.

mod common;

use common::*;
use expense_dash::{
    DashboardController, ExpenseStatus, FilterControl, FilterState, KpiKind, Page, PieDimension,
    RefreshPolicy, Role, Section, StatusTable, TopN,
};

fn admin_dashboard(api: MockApi) -> DashboardController<MockApi, RecordingView> {
    DashboardController::new(api, RecordingView::default())
}

// ============================================================================
// PAGE LOAD
// ============================================================================

#[tokio::test]
async fn test_admin_load_shows_filters_and_charts() {
    let dashboard = admin_dashboard(MockApi::admin());

    let section = dashboard.load().await.unwrap();
    assert_eq!(section, Section::Admin);

    let view = dashboard.view();
    assert_eq!(*view.sections.borrow(), vec![Section::Admin]);
    assert_eq!(view.kpi_values(KpiKind::TotalExpense), ["400"]);
    assert!(view.pending_click.get());
    assert!(view.tables.borrow().is_empty());

    assert_eq!(
        dashboard.api().calls(),
        ["me", "kpis", "me", "filters", "pie/head", "pie/office"]
    );

    assert_eq!(view.live_charts("head-chart"), 1);
    assert_eq!(view.live_charts("office-chart"), 1);
    assert!(dashboard.chart_bound(PieDimension::Head));
    assert!(dashboard.chart_bound(PieDimension::Office));
}

#[tokio::test]
async fn test_admin_filter_options_start_with_sentinel() {
    let dashboard = admin_dashboard(MockApi::admin());
    dashboard.load().await.unwrap();

    let options = dashboard.view().options.borrow();
    let controls: Vec<_> = options.iter().map(|(c, _)| *c).collect();
    assert_eq!(
        controls,
        [
            FilterControl::User,
            FilterControl::Office,
            FilterControl::Head,
            FilterControl::Subhead
        ]
    );

    for (control, list) in options.iter() {
        assert!(list[0].is_sentinel(), "{:?} has no sentinel", control);
        assert!(list[1..].iter().all(|o| !o.is_sentinel()));
    }

    // users: value is the id, label is the display name
    let (_, users) = &options[0];
    assert_eq!(users.len(), 3);
    assert_eq!(users[1].value, "2");
    assert_eq!(users[1].label, "Asha");
}

#[tokio::test]
async fn test_user_load_shows_status_tables() {
    let api = MockApi::user()
        .with_expenses(
            ExpenseStatus::Approved,
            vec![
                expense_row(Some("2024-03-01"), "Travel", 250.0),
                expense_row(None, "Porter", 80.0),
            ],
        )
        .with_expenses(
            ExpenseStatus::Pending,
            vec![expense_row(Some("2024-03-05"), "Travel", 40.0)],
        );
    let dashboard = DashboardController::new(api, RecordingView::default());

    let section = dashboard.load().await.unwrap();
    assert_eq!(section, Section::User);

    let view = dashboard.view();
    assert!(!view.pending_click.get());
    assert!(view.drawn.borrow().is_empty());
    assert!(view.options.borrow().is_empty());

    let tables = view.tables.borrow();
    let statuses: Vec<_> = tables.iter().map(|t| t.status).collect();
    assert_eq!(statuses, ExpenseStatus::ALL);

    let approved = &tables[0];
    assert_eq!(approved.rows.len(), 2);
    assert_eq!(approved.header, Some(StatusTable::HEADER));
    assert!(!approved.empty_visible);
    assert_eq!(approved.rows[1][0], "");

    let rejected = &tables[2];
    assert!(rejected.rows.is_empty());
    assert!(rejected.header.is_none());
    assert!(rejected.empty_visible);
}

#[tokio::test]
async fn test_identity_failure_aborts_load() {
    let api = MockApi::admin().script_me(vec![Err(transport_error())]);
    let dashboard = admin_dashboard(api);

    assert!(dashboard.load().await.is_err());
    assert!(dashboard.section().is_none());
    assert!(dashboard.view().sections.borrow().is_empty());
    assert!(dashboard.view().kpis.borrow().is_empty());
}

#[tokio::test]
async fn test_pending_click_failure_is_not_fatal() {
    let api = MockApi::admin().script_me(vec![Ok(identity(Role::Admin)), Err(transport_error())]);
    let dashboard = admin_dashboard(api);

    let section = dashboard.load().await.unwrap();
    assert_eq!(section, Section::Admin);
    assert!(!dashboard.view().pending_click.get());
    assert_eq!(dashboard.view().live_charts("head-chart"), 1);
}

#[tokio::test]
async fn test_section_is_chosen_once() {
    let api = MockApi::admin().script_me(vec![
        Ok(identity(Role::Admin)),
        Ok(identity(Role::Admin)),
        Ok(identity(Role::User)),
        Ok(identity(Role::User)),
    ]);
    let dashboard = admin_dashboard(api);

    dashboard.load().await.unwrap();
    let second = dashboard.load().await.unwrap();

    assert_eq!(second, Section::Admin);
    assert_eq!(dashboard.section(), Some(Section::Admin));
    assert_eq!(*dashboard.view().sections.borrow(), vec![Section::Admin, Section::Admin]);
}

#[tokio::test]
async fn test_open_pending_navigates() {
    let dashboard = admin_dashboard(MockApi::admin());
    dashboard.open_pending();
    assert_eq!(*dashboard.view().pages.borrow(), vec![Page::PendingApprovals]);
}

// ============================================================================
// FILTERS
// ============================================================================

#[tokio::test]
async fn test_refresh_sends_only_non_empty_filters() {
    let filters = FilterState::default()
        .with(FilterControl::Office, "Pune")
        .with(FilterControl::Date, "2024-05-01");
    let view = RecordingView::default()
        .with_filters(filters.clone())
        .with_top(PieDimension::Head, 5);
    let dashboard = DashboardController::new(MockApi::admin(), view);

    dashboard.on_filter_change(FilterControl::HeadTop).await.unwrap();

    let api = dashboard.api();
    assert_eq!(*api.kpi_queries.borrow(), vec![filters.clone()]);
    assert_eq!(filters.to_query(), "office=Pune&date=2024-05-01");

    let pies = api.pie_queries.borrow();
    assert_eq!(pies.len(), 2);
    assert!(pies.contains(&(PieDimension::Head, filters.clone(), TopN::new(5))));
    assert!(pies.contains(&(PieDimension::Office, filters.clone(), None)));
}

#[tokio::test]
async fn test_refresh_with_no_filters_sends_empty_state() {
    let dashboard = admin_dashboard(MockApi::admin());
    dashboard.refresh().await.unwrap();

    let queries = dashboard.api().kpi_queries.borrow();
    assert_eq!(queries.len(), 1);
    assert!(queries[0].is_empty());
    assert_eq!(queries[0].to_query(), "");
}

#[tokio::test]
async fn test_kpi_failure_keeps_previous_cards() {
    let api = MockApi::admin().script_kpis(vec![(0, Ok(summary(10.0))), (0, Err(transport_error()))]);
    let dashboard = admin_dashboard(api);

    dashboard.load_kpis().await.unwrap();
    assert!(dashboard.refresh().await.is_err());

    assert_eq!(dashboard.view().kpi_values(KpiKind::TotalExpense), ["10"]);
}

// ============================================================================
// CHART LIFECYCLE
// ============================================================================

#[tokio::test]
async fn test_one_live_chart_per_canvas() {
    let dashboard = admin_dashboard(MockApi::admin());
    dashboard.load().await.unwrap();

    for _ in 0..5 {
        dashboard.refresh().await.unwrap();
    }

    let view = dashboard.view();
    assert_eq!(view.live_charts("head-chart"), 1);
    assert_eq!(view.live_charts("office-chart"), 1);
    assert_eq!(view.max_live_charts.get(), 1);
    assert_eq!(dashboard.chart_redraws(PieDimension::Head), 6);
    assert_eq!(dashboard.chart_redraws(PieDimension::Office), 6);
}

#[tokio::test]
async fn test_dropping_controller_destroys_charts() {
    let dashboard = admin_dashboard(MockApi::admin());
    dashboard.load().await.unwrap();
    let live = std::rc::Rc::clone(&dashboard.view().live_charts);

    drop(dashboard);

    assert_eq!(live.borrow().get("head-chart"), Some(&0));
    assert_eq!(live.borrow().get("office-chart"), Some(&0));
}

// ============================================================================
// OVERLAPPING REFRESHES
// ============================================================================

/// First KPI request resolves after the second one
fn racing_api() -> MockApi {
    MockApi::admin().script_kpis(vec![(50, Ok(summary(1.0))), (10, Ok(summary(2.0)))])
}

#[tokio::test(start_paused = true)]
async fn test_last_resolved_lets_slow_response_win() {
    let dashboard = admin_dashboard(racing_api());
    assert_eq!(dashboard.policy(), RefreshPolicy::LastResolved);

    let (first, second) = tokio::join!(dashboard.refresh(), dashboard.refresh());
    first.unwrap();
    second.unwrap();

    // the later request lands first, then the stale one overwrites it
    assert_eq!(dashboard.view().kpi_values(KpiKind::TotalExpense), ["2", "1"]);
    assert_eq!(dashboard.stale_responses(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_latest_request_drops_superseded_response() {
    let dashboard = admin_dashboard(racing_api()).with_policy(RefreshPolicy::LatestRequest);

    let (first, second) = tokio::join!(dashboard.refresh(), dashboard.refresh());
    first.unwrap();
    second.unwrap();

    assert_eq!(dashboard.view().kpi_values(KpiKind::TotalExpense), ["2"]);
    assert!(dashboard.stale_responses() >= 1);
    assert!(dashboard.view().max_live_charts.get() <= 1);
}

/// First head-pie request resolves after the second one
fn racing_pies() -> MockApi {
    MockApi::admin().script_pies(
        PieDimension::Head,
        vec![
            (50, Ok(dataset(&[("Early", 1.0)]))),
            (10, Ok(dataset(&[("Late", 2.0)]))),
        ],
    )
}

#[tokio::test(start_paused = true)]
async fn test_last_resolved_chart_shows_slow_dataset() {
    let dashboard = admin_dashboard(racing_pies());

    let (first, second) = tokio::join!(dashboard.refresh(), dashboard.refresh());
    first.unwrap();
    second.unwrap();

    let drawn = dashboard.view().drawn_on("head-chart");
    assert_eq!(drawn, [dataset(&[("Late", 2.0)]), dataset(&[("Early", 1.0)])]);
    assert_eq!(dashboard.view().live_charts("head-chart"), 1);
    assert_eq!(dashboard.view().max_live_charts.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_latest_request_chart_keeps_newest_dataset() {
    let dashboard = admin_dashboard(racing_pies()).with_policy(RefreshPolicy::LatestRequest);

    let (first, second) = tokio::join!(dashboard.refresh(), dashboard.refresh());
    first.unwrap();
    second.unwrap();

    let drawn = dashboard.view().drawn_on("head-chart");
    assert_eq!(drawn, [dataset(&[("Late", 2.0)])]);
    assert_eq!(dashboard.chart_redraws(PieDimension::Head), 1);
    assert!(dashboard.stale_responses() >= 1);
    assert_eq!(dashboard.view().live_charts("head-chart"), 1);
}
