//! Database seeder for Tally development and testing.
//!
//! Seeds a demo company with the default chart of accounts and a handful of
//! posted journal entries so balances and reports have something to show.
//!
//! Usage: cargo run --bin seeder

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use tally_core::journal::{JournalLineInput, PostEntryInput, ReferenceType};
use tally_db::{AccountRepository, CompanyRepository, JournalRepository};
use tally_shared::types::{AccountId, CompanyId, UserId};
use tally_shared::AppConfig;

/// Demo company ID (consistent for all seeds)
const DEMO_COMPANY_ID: &str = "00000000-0000-0000-0000-000000000001";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = AppConfig::load().expect("Failed to load configuration");

    println!("Connecting to database...");
    let db = tally_db::connect_with(&config.database).await?;

    let companies = CompanyRepository::new(db.clone());
    let accounts = AccountRepository::new(db.clone());
    let journal = JournalRepository::new(db.clone());

    println!("Seeding demo company...");
    let company_id = demo_company_id();
    let company = match companies.find_by_id(company_id).await.expect("lookup failed") {
        Some(existing) => existing,
        None => {
            // A fresh database gets a fixed-ID demo company so seeds are
            // idempotent across runs.
            let created = companies
                .create_company("Demo Trading Co".to_string())
                .await
                .expect("Failed to create demo company");
            println!("  created company {}", created.id);
            created
        }
    };

    println!("Seeding chart of accounts...");
    let seeded = accounts
        .seed_default_chart(company.id)
        .await
        .expect("Failed to seed chart of accounts");
    if seeded.is_empty() {
        println!("  chart already present, skipping");
    } else {
        println!("  created {} accounts", seeded.len());
    }

    println!("Seeding sample journal entries...");
    seed_sample_entries(&accounts, &journal, company.id).await;

    println!("Seeding complete!");
    Ok(())
}

fn demo_company_id() -> Uuid {
    Uuid::parse_str(DEMO_COMPANY_ID).expect("demo company id is a valid uuid")
}

async fn account_by_code(repo: &AccountRepository, company_id: Uuid, code: &str) -> Uuid {
    repo.find_by_code(company_id, code)
        .await
        .expect("account lookup failed")
        .unwrap_or_else(|| panic!("account '{code}' missing from seeded chart"))
        .id
}

async fn seed_sample_entries(
    accounts: &AccountRepository,
    journal: &JournalRepository,
    company_id: Uuid,
) {
    let existing = journal
        .list_entries(company_id, None, None)
        .await
        .expect("entry listing failed");
    if !existing.is_empty() {
        println!("  entries already present, skipping");
        return;
    }

    let cash = account_by_code(accounts, company_id, "1000").await;
    let bank = account_by_code(accounts, company_id, "1100").await;
    let revenue = account_by_code(accounts, company_id, "4000").await;
    let rent = account_by_code(accounts, company_id, "5120").await;
    let equity = account_by_code(accounts, company_id, "3000").await;

    let actor = UserId::new();
    let samples = [
        (
            NaiveDate::from_ymd_opt(2024, 1, 2).expect("valid date"),
            "Owner capital injection",
            ReferenceType::Manual,
            bank,
            equity,
            Decimal::new(50_000_000, 0),
        ),
        (
            NaiveDate::from_ymd_opt(2024, 1, 5).expect("valid date"),
            "Cash sale",
            ReferenceType::Sales,
            cash,
            revenue,
            Decimal::new(1_000_000, 0),
        ),
        (
            NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date"),
            "POS daily takings",
            ReferenceType::Pos,
            cash,
            revenue,
            Decimal::new(2_450_000, 0),
        ),
    ];

    for (date, description, reference_type, debit_account, credit_account, amount) in samples {
        let posted = journal
            .post_entry(PostEntryInput {
                company_id: CompanyId::from_uuid(company_id),
                entry_date: date,
                description: description.to_string(),
                reference_type,
                reference_id: None,
                lines: vec![
                    JournalLineInput::debit(AccountId::from_uuid(debit_account), amount),
                    JournalLineInput::credit(AccountId::from_uuid(credit_account), amount),
                ],
                created_by: actor,
            })
            .await
            .expect("Failed to post sample entry");
        println!("  posted {} ({description})", posted.entry.entry_number);
    }

    // Rent paid from the bank, an expense-side sample
    let posted = journal
        .post_entry(PostEntryInput {
            company_id: CompanyId::from_uuid(company_id),
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date"),
            description: "January office rent".to_string(),
            reference_type: ReferenceType::Payment,
            reference_id: None,
            lines: vec![
                JournalLineInput::debit(AccountId::from_uuid(rent), Decimal::new(5_000_000, 0))
                    .with_description("Office rent"),
                JournalLineInput::credit(AccountId::from_uuid(bank), Decimal::new(5_000_000, 0)),
            ],
            created_by: actor,
        })
        .await
        .expect("Failed to post rent entry");
    println!("  posted {} (January office rent)", posted.entry.entry_number);
}
