//! Demo driver: runs one sync → allocate cycle against an in-memory
//! snapshot fixture so the engine can be exercised without a database.

use std::collections::BTreeSet;

use chrono::Utc;
use clap::{Parser, Subcommand};
use income_allocator_core::allocation::{allocate, IncomeCredit};
use income_allocator_core::goals::{bootstrap_goals, estimate_avg_monthly_expenses, refine_bootstrap_targets};
use income_allocator_core::models::connection::{Connection, ConnectionType};
use income_allocator_core::models::snapshot::SourceSnapshot;
use income_allocator_core::models::transaction::{Transaction, TransactionType};
use income_allocator_core::policy::formula::formula_fallback;
use income_allocator_core::policy::FormulaAdvisor;
use income_allocator_core::sync::{sync, InMemorySnapshotSource};
use rust_decimal_macros::dec;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "income-allocator", about = "Personal-finance allocator demo driver")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single sync + allocate cycle against a built-in fixture.
    Demo,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Demo => run_demo().await,
    }
}

async fn run_demo() {
    let user_id = Uuid::new_v4();
    let avg_monthly_income = dec!(30000.00);
    let mut goals = bootstrap_goals(user_id, avg_monthly_income, Utc::now());

    let (emergency_target, savings_1_target, savings_2_target) = refine_bootstrap_targets(
        &FormulaAdvisor,
        user_id,
        avg_monthly_income,
        estimate_avg_monthly_expenses(avg_monthly_income),
        goals[0].target,
        goals[1].target,
        goals[2].target,
    )
    .await;
    goals[0].target = emergency_target;
    goals[1].target = savings_1_target;
    goals[2].target = savings_2_target;

    let mut connection = Connection::new(user_id, "testincome", ConnectionType::Test);

    let source = InMemorySnapshotSource::new().with_snapshot(
        "testincome",
        SourceSnapshot {
            transactions: vec![Transaction::new(
                "txn_demo_001",
                TransactionType::Credit,
                dec!(15000.00),
                "gig payout",
                Utc::now(),
                "posted",
            )
            .expect("demo amount is positive")],
            ..Default::default()
        },
    );

    let report = sync(&mut connection, &source).await.expect("demo sync never errors");
    println!("synced {} new income transactions", report.new_income.len());

    let income: Vec<IncomeCredit> = report
        .new_income
        .iter()
        .map(|t| IncomeCredit {
            id: t.id().to_string(),
            amount: t.amount(),
            timestamp: t.timestamp(),
            description: t.description().to_string(),
        })
        .collect();

    if income.is_empty() {
        println!("nothing to allocate");
        return;
    }

    let plan = formula_fallback(income.iter().map(|c| c.amount).sum(), &goals, Utc::now());
    let already: BTreeSet<String> = BTreeSet::new();
    match allocate(&mut goals, &already, income, &plan, Utc::now()) {
        Ok(report) => {
            println!("allocated {} total", report.total_allocated);
            for application in &report.applications {
                println!("  goal {} += {}", application.goal_id, application.amount_applied);
            }
        }
        Err(err) => println!("allocation skipped: {err}"),
    }
}
