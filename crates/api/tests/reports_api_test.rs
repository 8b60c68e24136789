//! HTTP tests for the report routes, driven in-process against an
//! in-memory ledger.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use tower::ServiceExt;

use neraca_api::{AppState, create_router};
use neraca_core::ledger::{
    Account, AccountType, InMemoryLedgerStore, NewJournalEntry, NewJournalLine,
};
use neraca_core::period::FixedClock;
use neraca_core::reports::ReportService;
use neraca_shared::ReportingConfig;
use neraca_shared::types::AccountId;

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

struct TestApp {
    router: Router,
    cash: AccountId,
}

/// Cash sale of 1000.00 on Jan 10, rent of 200.00 paid on Jan 15, and a
/// 500.00 sale on Feb 5. Today is 2024-01-31.
async fn test_app() -> TestApp {
    let store = Arc::new(InMemoryLedgerStore::new());
    let cash = store
        .add_account(Account::new("1100", "Cash", AccountType::Asset))
        .await
        .unwrap();
    let sales = store
        .add_account(Account::new("4000", "Sales", AccountType::Revenue))
        .await
        .unwrap();
    let rent = store
        .add_account(Account::new("6000", "Rent", AccountType::Expense))
        .await
        .unwrap();

    for (day, reference, debit, credit, amount) in [
        (date(1, 10), "JE-001", cash, sales, dec!(1000.00)),
        (date(1, 15), "JE-002", rent, cash, dec!(200.00)),
        (date(2, 5), "JE-003", cash, sales, dec!(500.00)),
    ] {
        store
            .post_entry(
                NewJournalEntry::new(day, reference, format!("{reference} description"))
                    .line(NewJournalLine::debit(debit, amount))
                    .line(NewJournalLine::credit(credit, amount)),
            )
            .await
            .unwrap();
    }

    let reports = ReportService::new(store, &ReportingConfig::default())
        .with_clock(Arc::new(FixedClock(date(1, 31))));

    TestApp {
        router: create_router(AppState::new(reports)),
        cash,
    }
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn amount(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = test_app().await;
    let (status, body) = get(&app.router, "/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["reportingDate"], "2024-01-31");
}

#[tokio::test]
async fn test_trial_balance_defaults_to_today() {
    let app = test_app().await;
    let (status, body) = get(&app.router, "/api/v1/reports/trial-balance").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["asOfDate"], "2024-01-31");
    assert_eq!(body["isBalanced"], true);
    assert_eq!(amount(&body["totalDebit"]), dec!(1000));
    assert_eq!(amount(&body["totalCredit"]), dec!(1000));
}

#[tokio::test]
async fn test_profit_and_loss_period() {
    let app = test_app().await;
    let (status, body) = get(
        &app.router,
        "/api/v1/reports/profit-and-loss?from=2024-01-01&to=2024-01-31",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&body["totalRevenue"]), dec!(1000));
    assert_eq!(amount(&body["totalOperatingExpenses"]), dec!(200));
    assert_eq!(amount(&body["netIncome"]), dec!(800));
    assert_eq!(amount(&body["netMargin"]), dec!(80));
}

#[tokio::test]
async fn test_balance_sheet_and_cash_flow() {
    let app = test_app().await;

    let (status, body) = get(
        &app.router,
        "/api/v1/reports/balance-sheet?as_of=2024-02-29",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&body["totalAssets"]), dec!(1300));

    let (status, body) = get(
        &app.router,
        "/api/v1/reports/cash-flow?from=2024-01-01&to=2024-01-31",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&body["netCashFlow"]), dec!(800));
}

#[tokio::test]
async fn test_invalid_dates_are_rejected() {
    let app = test_app().await;

    for uri in [
        "/api/v1/reports/trial-balance?as_of=2024-13-01",
        "/api/v1/reports/profit-and-loss?from=2024-02-01&to=2024-01-01",
        "/api/v1/reports/comparative/profit-and-loss",
        "/api/v1/reports/comparative/trial-balance?as_of=",
    ] {
        let (status, body) = get(&app.router, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"], "INVALID_RANGE", "{uri}");
    }
}

#[tokio::test]
async fn test_unknown_account() {
    let app = test_app().await;

    let (status, body) = get(
        &app.router,
        &format!("/api/v1/accounts/{}/balance", AccountId::new()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, body) = get(&app.router, "/api/v1/accounts/not-a-uuid/balance").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_account_balance_window() {
    let app = test_app().await;
    let (status, body) = get(
        &app.router,
        &format!("/api/v1/accounts/{}/balance?to=2024-01-31", app.cash),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&body["balance"]), dec!(800));
    assert_eq!(amount(&body["totalDebit"]), dec!(1000));
    assert_eq!(amount(&body["totalCredit"]), dec!(200));
}

#[tokio::test]
async fn test_account_ledger_pagination_keeps_period_balances() {
    let app = test_app().await;
    let (status, body) = get(
        &app.router,
        &format!(
            "/api/v1/accounts/{}/ledger?from=2024-01-01&to=2024-02-29&page=2&per_page=2",
            app.cash
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&body["beginningBalance"]), dec!(0));
    assert_eq!(amount(&body["endingBalance"]), dec!(1300));

    let movements = &body["movements"];
    assert_eq!(movements["meta"]["total"], 3);
    assert_eq!(movements["meta"]["total_pages"], 2);
    let page = movements["data"].as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["reference"], "JE-003");
    assert_eq!(amount(&page[0]["runningBalance"]), dec!(1300));
}

#[tokio::test]
async fn test_account_ledger_bad_page_is_json_400() {
    let app = test_app().await;
    for query in ["page=abc", "per_page=-5"] {
        let (status, body) = get(
            &app.router,
            &format!("/api/v1/accounts/{}/ledger?{query}", app.cash),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["message"].as_str().unwrap().contains("must be a positive integer"));
    }
}

#[tokio::test]
async fn test_general_ledger_for_one_account() {
    let app = test_app().await;
    let (status, body) = get(
        &app.router,
        &format!(
            "/api/v1/reports/general-ledger?from=2024-01-01&to=2024-01-31&account_id={}",
            app.cash
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let accounts = body["accounts"].as_array().unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0]["code"], "1100");
    assert_eq!(accounts[0]["movements"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_comparative_and_variance() {
    let app = test_app().await;

    let (status, body) = get(
        &app.router,
        "/api/v1/reports/comparative/trial-balance?as_of=2024-01-31,2024-02-29",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["periods"].as_array().unwrap().len(), 2);
    assert_eq!(body["accounts"].as_array().unwrap().len(), 3);

    let (status, body) = get(
        &app.router,
        "/api/v1/reports/comparative/profit-and-loss?periods=2024-01-01..2024-01-31,2024-02-01..2024-02-29",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let periods = body["periods"].as_array().unwrap();
    assert_eq!(amount(&periods[1]["report"]["totalRevenue"]), dec!(500));

    let (status, body) = get(
        &app.router,
        "/api/v1/reports/profit-and-loss/variance?from=2024-02-01&to=2024-02-29&previous_from=2024-01-01&previous_to=2024-01-31",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&body["revenue"]["change"]), dec!(-500));
    assert_eq!(amount(&body["revenue"]["changePercent"]), dec!(-50));
}
