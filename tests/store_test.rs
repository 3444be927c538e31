/*!
 * Record Store Integration Tests
 *
 * Covers the libsql-backed expense store:
 * - Create/read/update/delete round trips
 * - Filtering by year, month and category, alone and combined
 * - Ordering (most recent first, stable on ties)
 * - Id assignment (unique, never reused)
 * - Concurrent write detection and the existence re-check
 *
 * All tests use isolated temporary databases.
 */

mod common;

use common::*;
use expense_tracker::error::Error;
use expense_tracker::models::ExpenseFilter;
use expense_tracker::store::ExpenseRepository;
use rust_decimal::Decimal;
use time::macros::date;

fn filter(year: Option<i32>, month: Option<u8>, category: Option<&str>) -> ExpenseFilter {
    ExpenseFilter {
        year,
        month,
        category: category.map(str::to_string),
    }
}

async fn create_sample_expenses(store: &expense_tracker::store::SqlExpenseStore) {
    create_test_expense(store, 1000, "Groceries", date!(2024 - 01 - 01), "Food").await;
    create_test_expense(store, 2500, "Train pass", date!(2024 - 06 - 15), "Transport").await;
    create_test_expense(store, 1299, "New year dinner", date!(2023 - 12 - 31), "Food").await;
    create_test_expense(store, 4000, "Cinema", date!(2023 - 06 - 02), "Entertainment").await;
    create_test_expense(store, 350, "Bakery", date!(2024 - 06 - 01), "Food").await;
}

#[tokio::test]
async fn empty_database() {
    let (db, _temp_dir) = setup_test_environment().await;
    let store = open_store(&db).await;

    let expenses = store.list(&ExpenseFilter::default()).await.unwrap();

    assert!(expenses.is_empty());
}

/// A created expense reads back with the same fields and its assigned id.
#[tokio::test]
async fn create_then_get_round_trip() {
    let (db, _temp_dir) = setup_test_environment().await;
    let store = open_store(&db).await;
    let new = new_expense(5000, "Lunch", date!(2024 - 03 - 01), "Food");

    let created = store.create(new.clone()).await.unwrap();
    let fetched = store.get(created.id).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.amount, new.amount);
    assert_eq!(fetched.description, new.description);
    assert_eq!(fetched.date, new.date);
    assert_eq!(fetched.category, new.category);
}

#[tokio::test]
async fn amounts_keep_their_cents() {
    let (db, _temp_dir) = setup_test_environment().await;
    let store = open_store(&db).await;

    let created = create_test_expense(&store, 1, "Penny", date!(2024 - 01 - 01), "Other").await;
    let fetched = store.get(created.id).await.unwrap();

    assert_eq!(fetched.amount, Decimal::new(1, 2));
    assert_eq!(fetched.amount.to_string(), "0.01");
}

#[tokio::test]
async fn unicode_text_is_preserved() {
    let (db, _temp_dir) = setup_test_environment().await;
    let store = open_store(&db).await;

    let created =
        create_test_expense(&store, 850, "Café con leche ☕", date!(2024 - 05 - 05), "Alimentación")
            .await;
    let fetched = store.get(created.id).await.unwrap();

    assert_eq!(fetched.description, "Café con leche ☕");
    assert_eq!(fetched.category, "Alimentación");
}

#[tokio::test]
async fn get_missing_expense_is_not_found() {
    let (db, _temp_dir) = setup_test_environment().await;
    let store = open_store(&db).await;

    assert_eq!(store.get(404).await, Err(Error::NotFound(404)));
}

#[tokio::test]
async fn list_orders_most_recent_first() {
    let (db, _temp_dir) = setup_test_environment().await;
    let store = open_store(&db).await;
    create_test_expense(&store, 100, "a", date!(2024 - 01 - 01), "Food").await;
    create_test_expense(&store, 100, "b", date!(2024 - 06 - 15), "Food").await;
    create_test_expense(&store, 100, "c", date!(2023 - 12 - 31), "Food").await;

    let expenses = store.list(&ExpenseFilter::default()).await.unwrap();

    let dates: Vec<_> = expenses.iter().map(|e| e.date).collect();
    assert_eq!(
        dates,
        vec![date!(2024 - 06 - 15), date!(2024 - 01 - 01), date!(2023 - 12 - 31)]
    );
}

/// Expenses on the same date come back in insertion order, every time.
#[tokio::test]
async fn ties_are_broken_by_insertion_order() {
    let (db, _temp_dir) = setup_test_environment().await;
    let store = open_store(&db).await;
    let first = create_test_expense(&store, 100, "first", date!(2024 - 02 - 02), "Food").await;
    let second = create_test_expense(&store, 200, "second", date!(2024 - 02 - 02), "Food").await;
    let third = create_test_expense(&store, 300, "third", date!(2024 - 02 - 02), "Food").await;

    for _ in 0..3 {
        let ids: Vec<_> = store
            .list(&ExpenseFilter::default())
            .await
            .unwrap()
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id, third.id]);
    }
}

#[tokio::test]
async fn filter_by_year() {
    let (db, _temp_dir) = setup_test_environment().await;
    let store = open_store(&db).await;
    create_sample_expenses(&store).await;

    let expenses = store.list(&filter(Some(2023), None, None)).await.unwrap();

    let names: Vec<_> = expenses.iter().map(|e| e.description.as_str()).collect();
    assert_eq!(names, vec!["New year dinner", "Cinema"]);
}

/// The month filter applies to every year when no year is given.
#[tokio::test]
async fn filter_by_month_spans_years() {
    let (db, _temp_dir) = setup_test_environment().await;
    let store = open_store(&db).await;
    create_sample_expenses(&store).await;

    let expenses = store.list(&filter(None, Some(6), None)).await.unwrap();

    let names: Vec<_> = expenses.iter().map(|e| e.description.as_str()).collect();
    assert_eq!(names, vec!["Train pass", "Bakery", "Cinema"]);
}

#[tokio::test]
async fn filter_by_category_is_exact() {
    let (db, _temp_dir) = setup_test_environment().await;
    let store = open_store(&db).await;
    create_sample_expenses(&store).await;

    let food = store.list(&filter(None, None, Some("Food"))).await.unwrap();
    let lowercase = store.list(&filter(None, None, Some("food"))).await.unwrap();
    let partial = store.list(&filter(None, None, Some("Foo"))).await.unwrap();

    assert_eq!(food.len(), 3);
    assert!(food.iter().all(|e| e.category == "Food"));
    assert!(lowercase.is_empty());
    assert!(partial.is_empty());
}

#[tokio::test]
async fn empty_category_does_not_restrict() {
    let (db, _temp_dir) = setup_test_environment().await;
    let store = open_store(&db).await;
    create_sample_expenses(&store).await;

    let expenses = store.list(&filter(None, None, Some(""))).await.unwrap();

    assert_eq!(expenses.len(), 5);
}

/// Combined filters return exactly the subset of the full list matching all
/// predicates at once.
#[tokio::test]
async fn filters_are_conjunctive() {
    let (db, _temp_dir) = setup_test_environment().await;
    let store = open_store(&db).await;
    create_sample_expenses(&store).await;

    let all = store.list(&ExpenseFilter::default()).await.unwrap();

    for (year, month, category) in [
        (Some(2024), Some(6), Some("Food")),
        (Some(2024), Some(6), None),
        (Some(2023), None, Some("Food")),
        (None, Some(1), Some("Transport")),
        (Some(2022), None, None),
    ] {
        let filter = filter(year, month, category);
        let filtered = store.list(&filter).await.unwrap();

        let expected: Vec<_> = all
            .iter()
            .filter(|e| year.is_none_or(|y| e.date.year() == y))
            .filter(|e| month.is_none_or(|m| u8::from(e.date.month()) == m))
            .filter(|e| category.is_none_or(|c| e.category == c))
            .cloned()
            .collect();
        assert_eq!(filtered, expected, "filter {:?}", filter);
    }

    let bakery = store
        .list(&filter(Some(2024), Some(6), Some("Food")))
        .await
        .unwrap();
    assert_eq!(bakery.len(), 1);
    assert_eq!(bakery[0].description, "Bakery");
}

#[tokio::test]
async fn update_replaces_every_field() {
    let (db, _temp_dir) = setup_test_environment().await;
    let store = open_store(&db).await;
    let created = create_test_expense(&store, 5000, "Lunch", date!(2024 - 03 - 01), "Food").await;

    store
        .update(
            created.id,
            new_expense(5500, "Team lunch", date!(2024 - 03 - 02), "Work"),
        )
        .await
        .unwrap();

    let fetched = store.get(created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.amount, Decimal::new(5500, 2));
    assert_eq!(fetched.description, "Team lunch");
    assert_eq!(fetched.date, date!(2024 - 03 - 02));
    assert_eq!(fetched.category, "Work");
}

#[tokio::test]
async fn update_missing_expense_is_not_found() {
    let (db, _temp_dir) = setup_test_environment().await;
    let store = open_store(&db).await;

    let result = store
        .update(7, new_expense(100, "Ghost", date!(2024 - 01 - 01), "Other"))
        .await;

    assert_eq!(result, Err(Error::NotFound(7)));
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let (db, _temp_dir) = setup_test_environment().await;
    let store = open_store(&db).await;
    let created = create_test_expense(&store, 5000, "Lunch", date!(2024 - 03 - 01), "Food").await;

    store.delete(created.id).await.unwrap();

    assert_eq!(store.get(created.id).await, Err(Error::NotFound(created.id)));
    assert_eq!(store.delete(created.id).await, Err(Error::NotFound(created.id)));
}

#[tokio::test]
async fn ids_are_never_reused() {
    let (db, _temp_dir) = setup_test_environment().await;
    let store = open_store(&db).await;
    let first = create_test_expense(&store, 100, "one", date!(2024 - 01 - 01), "Food").await;
    let second = create_test_expense(&store, 100, "two", date!(2024 - 01 - 01), "Food").await;

    store.delete(second.id).await.unwrap();
    let third = create_test_expense(&store, 100, "three", date!(2024 - 01 - 01), "Food").await;

    assert_ne!(first.id, second.id);
    assert!(third.id > second.id);
}

#[tokio::test]
async fn stores_on_separate_connections_share_data() {
    let (db, _temp_dir) = setup_test_environment().await;
    let writer = open_store(&db).await;
    let reader = open_store(&db).await;

    let created = create_test_expense(&writer, 999, "Book", date!(2024 - 04 - 04), "Other").await;

    assert_eq!(reader.get(created.id).await.unwrap(), created);
}

/// A write based on a stale version loses against the write that got there
/// first, and the store reports a conflict because the expense still exists.
#[tokio::test]
async fn stale_write_is_a_conflict() {
    let (db, _temp_dir) = setup_test_environment().await;
    let first = open_store(&db).await;
    let second = open_store(&db).await;
    let created = create_test_expense(&first, 5000, "Lunch", date!(2024 - 03 - 01), "Food").await;

    let stale_version = first.current_version(created.id).await.unwrap();
    second
        .update(
            created.id,
            new_expense(6000, "Winner", date!(2024 - 03 - 01), "Food"),
        )
        .await
        .unwrap();

    let result = first
        .update_if_version(
            created.id,
            stale_version,
            new_expense(7000, "Loser", date!(2024 - 03 - 01), "Food"),
        )
        .await;

    assert_eq!(result, Err(Error::Conflict(created.id)));
    assert_eq!(first.get(created.id).await.unwrap().description, "Winner");
}

/// When the racing write was a delete, the re-check turns the conflict into
/// a plain not found.
#[tokio::test]
async fn write_racing_a_delete_is_not_found() {
    let (db, _temp_dir) = setup_test_environment().await;
    let first = open_store(&db).await;
    let second = open_store(&db).await;
    let created = create_test_expense(&first, 5000, "Lunch", date!(2024 - 03 - 01), "Food").await;

    let version = first.current_version(created.id).await.unwrap();
    second.delete(created.id).await.unwrap();

    let result = first
        .update_if_version(
            created.id,
            version,
            new_expense(7000, "Too late", date!(2024 - 03 - 01), "Food"),
        )
        .await;

    assert_eq!(result, Err(Error::NotFound(created.id)));
}

#[tokio::test]
async fn version_increases_on_every_update() {
    let (db, _temp_dir) = setup_test_environment().await;
    let store = open_store(&db).await;
    let created = create_test_expense(&store, 100, "v", date!(2024 - 01 - 01), "Food").await;

    let v1 = store.current_version(created.id).await.unwrap();
    store
        .update(created.id, new_expense(200, "v", date!(2024 - 01 - 01), "Food"))
        .await
        .unwrap();
    let v2 = store.current_version(created.id).await.unwrap();

    assert_eq!(v2, v1 + 1);
}
