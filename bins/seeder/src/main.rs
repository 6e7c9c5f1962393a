//! Development database seeder for the ledger engine.
//!
//! Seeds a demo employee and two customers with accounts, then exercises
//! `Deposit` and `Transfer` through the real repositories as a smoke
//! test. `transaction_types` is seeded by the initial migration, not
//! here — this binary assumes `migrator up` has already run.
//!
//! Usage: cargo run --bin seeder

use ledger_core::auth::hash_password;
use ledger_db::entities::sea_orm_active_enums::{AccountType, EmployeeDepartment, UserRole};
use ledger_db::repositories::CreateUserInput;
use ledger_db::{AccountRepository, EmployeeRepository, LedgerRepository, UserRepository};
use rust_decimal::Decimal;
use uuid::Uuid;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    tracing::info!("connecting to database");
    let db = ledger_db::connect(&database_url)
        .await
        .expect("failed to connect to database");

    let employees = EmployeeRepository::new(db.clone());
    let users = UserRepository::new(db.clone());
    let accounts = AccountRepository::new(db.clone(), 8, "USD".to_string());
    let ledger = LedgerRepository::new(db.clone());

    tracing::info!("seeding demo employee");
    let employee = employees
        .create(
            "ops@ledger.example",
            &hash_password("demo-employee-password").expect("hash employee password"),
            "Demo Operations Employee",
            EmployeeDepartment::Operations,
        )
        .await
        .expect("seed employee");
    tracing::info!(employee_id = %employee.id, "employee seeded");

    tracing::info!("seeding demo customers");
    let alice = users
        .create(CreateUserInput {
            username: "alice".to_string(),
            password_hash: hash_password("demo-alice-password").expect("hash alice password"),
            email: "alice@ledger.example".to_string(),
            phone: None,
            full_name: "Alice Customer".to_string(),
            role: UserRole::Customer,
        })
        .await
        .expect("seed alice");
    let bob = users
        .create(CreateUserInput {
            username: "bob".to_string(),
            password_hash: hash_password("demo-bob-password").expect("hash bob password"),
            email: "bob@ledger.example".to_string(),
            phone: None,
            full_name: "Bob Customer".to_string(),
            role: UserRole::Customer,
        })
        .await
        .expect("seed bob");

    tracing::info!("opening demo accounts");
    let alice_account = accounts
        .create_account(alice.id, AccountType::Checking, "USD".to_string(), true)
        .await
        .expect("open alice's account");
    let bob_account = accounts
        .create_account(bob.id, AccountType::Savings, "USD".to_string(), true)
        .await
        .expect("open bob's account");

    tracing::info!("posting a smoke-test deposit and transfer");
    ledger
        .deposit(
            Uuid::new_v4(),
            alice_account.id,
            Decimal::new(1_000_0000, 4),
            Some(alice.id),
            Some("seed deposit".to_string()),
        )
        .await
        .expect("seed deposit into alice's account");

    ledger
        .transfer(
            Uuid::new_v4(),
            alice_account.id,
            bob_account.id,
            Decimal::new(250_0000, 4),
            Some(alice.id),
            Some("seed transfer".to_string()),
        )
        .await
        .expect("seed transfer from alice to bob");

    tracing::info!(
        employee_id = %employee.id,
        alice_account = %alice_account.id,
        bob_account = %bob_account.id,
        "seeding complete"
    );
}
