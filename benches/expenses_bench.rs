use criterion::{Criterion, criterion_group, criterion_main};
use rust_decimal::Decimal;
use std::hint::black_box;
use tempfile::tempdir;
use time::{Date, Duration, macros::date};
use tokio::runtime::Runtime;

use expense_tracker::database::{Db, init_db};
use expense_tracker::models::{ExpenseFilter, NewExpense};
use expense_tracker::state::AppState;
use expense_tracker::store::ExpenseRepository;

// Benchmark constants
const BENCH_BASE_DATE: Date = date!(2022 - 01 - 01);
const BENCH_EXPENSE_COUNT: usize = 1000;
const BENCH_CATEGORIES: [&str; 5] = ["Food", "Transport", "Housing", "Health", "Other"];

async fn setup_benchmark_environment() -> (Db, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let data_path = temp_dir.path().to_str().unwrap().to_string();
    let db = init_db(&data_path).await.unwrap();

    (db, temp_dir)
}

async fn create_benchmark_expenses(db: &Db, count: usize) {
    let store = AppState::new(db.clone()).expense_store().await.unwrap();

    for i in 0..count {
        store
            .create(NewExpense {
                amount: Decimal::new(1000 + (i % 100) as i64, 2),
                description: format!("Benchmark expense {}", i),
                date: BENCH_BASE_DATE + Duration::days(i as i64),
                category: BENCH_CATEGORIES[i % BENCH_CATEGORIES.len()].to_string(),
            })
            .await
            .unwrap();
    }
}

async fn benchmark_list(db: &Db, filter: &ExpenseFilter) {
    let store = AppState::new(db.clone()).expense_store().await.unwrap();
    let expenses = store.list(filter).await.unwrap();
    black_box(expenses.len());
}

fn criterion_benchmark(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    // Setup benchmark data once
    let (db, _temp_dir) = rt.block_on(setup_benchmark_environment());
    rt.block_on(create_benchmark_expenses(&db, BENCH_EXPENSE_COUNT));

    let unfiltered = ExpenseFilter::default();
    let by_year = ExpenseFilter {
        year: Some(2023),
        ..Default::default()
    };
    let combined = ExpenseFilter {
        year: Some(2023),
        month: Some(6),
        category: Some("Food".to_string()),
    };

    c.bench_function("list_all_expenses", |b| {
        b.to_async(&rt).iter(|| benchmark_list(&db, &unfiltered))
    });

    c.bench_function("list_expenses_by_year", |b| {
        b.to_async(&rt).iter(|| benchmark_list(&db, &by_year))
    });

    c.bench_function("list_expenses_combined_filter", |b| {
        b.to_async(&rt).iter(|| benchmark_list(&db, &combined))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
