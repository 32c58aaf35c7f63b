//! Database seeder for Splitpot development and testing.
//!
//! Seeds a demo household: three users sharing a group, one equal-split
//! expense, and one settlement, so the frontend has data to render.
//!
//! Usage: cargo run --bin seeder

use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use splitpot_core::split::allocate_shares;
use splitpot_db::entities::{expense_shares, expenses, groups, settlements, user_groups, users};
use splitpot_shared::types::UserId;

/// Demo IDs (consistent for all seeds)
const ALICE_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);
const BOB_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0002);
const CAROL_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0003);
const GROUP_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0010);
const EXPENSE_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0020);
const SETTLEMENT_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0030);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = splitpot_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo users...");
    seed_users(&db).await;

    println!("Seeding demo group...");
    seed_group(&db).await;

    println!("Seeding demo expense...");
    seed_expense(&db).await;

    println!("Seeding demo settlement...");
    seed_settlement(&db).await;

    println!("Seeding complete!");
}

async fn seed_users(db: &DatabaseConnection) {
    let demo = [
        (ALICE_ID, "Alice", "A", "alice@splitpot.dev"),
        (BOB_ID, "Bob", "B", "bob@splitpot.dev"),
        (CAROL_ID, "Carol", "C", "carol@splitpot.dev"),
    ];

    for (id, name, initial, email) in demo {
        if users::Entity::find_by_id(id).one(db).await.ok().flatten().is_some() {
            println!("  User {name} already exists, skipping...");
            continue;
        }

        let user = users::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            initial: Set(initial.to_string()),
            email: Set(email.to_string()),
            notifications_enabled: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = user.insert(db).await {
            eprintln!("Failed to insert user {name}: {e}");
        } else {
            println!("  Created user: {email}");
        }
    }
}

async fn seed_group(db: &DatabaseConnection) {
    if groups::Entity::find_by_id(GROUP_ID)
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo group already exists, skipping...");
        return;
    }

    let group = groups::ActiveModel {
        id: Set(GROUP_ID),
        name: Set("Flat 4B".to_string()),
        description: Set(Some("Shared flat expenses".to_string())),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = group.insert(db).await {
        eprintln!("Failed to insert demo group: {e}");
        return;
    }
    println!("  Created group: Flat 4B");

    for user_id in [ALICE_ID, BOB_ID, CAROL_ID] {
        let membership = user_groups::ActiveModel {
            user_id: Set(user_id),
            group_id: Set(GROUP_ID),
            created_at: Set(Utc::now().into()),
        };
        if let Err(e) = membership.insert(db).await {
            eprintln!("Failed to insert membership: {e}");
        }
    }
}

async fn seed_expense(db: &DatabaseConnection) {
    if expenses::Entity::find_by_id(EXPENSE_ID)
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo expense already exists, skipping...");
        return;
    }

    let amount = dec!(100.00);
    let participants = [
        UserId::from(ALICE_ID),
        UserId::from(BOB_ID),
        UserId::from(CAROL_ID),
    ];
    let allocations =
        allocate_shares(amount, &participants).expect("demo allocation should succeed");

    let expense = expenses::ActiveModel {
        id: Set(EXPENSE_ID),
        group_id: Set(GROUP_ID),
        title: Set("Weekly groceries".to_string()),
        amount: Set(amount),
        date: Set(NaiveDate::from_ymd_opt(2026, 8, 24).expect("valid date")),
        paid_by_user_id: Set(ALICE_ID),
        category: Set(Some("food".to_string())),
        receipt_url: Set(None),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = expense.insert(db).await {
        eprintln!("Failed to insert demo expense: {e}");
        return;
    }
    println!("  Created expense: Weekly groceries (100.00)");

    for allocation in allocations {
        let share = expense_shares::ActiveModel {
            expense_id: Set(EXPENSE_ID),
            user_id: Set(allocation.user_id.into_inner()),
            share_amount: Set(allocation.amount),
            created_at: Set(Utc::now().into()),
        };
        if let Err(e) = share.insert(db).await {
            eprintln!("Failed to insert demo share: {e}");
        }
    }
}

async fn seed_settlement(db: &DatabaseConnection) {
    if settlements::Entity::find_by_id(SETTLEMENT_ID)
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo settlement already exists, skipping...");
        return;
    }

    let settlement = settlements::ActiveModel {
        id: Set(SETTLEMENT_ID),
        group_id: Set(GROUP_ID),
        from_user_id: Set(BOB_ID),
        to_user_id: Set(ALICE_ID),
        amount: Set(dec!(33.33)),
        payment_method: Set("transfer".to_string()),
        notes: Set(Some("Groceries share".to_string())),
        created_by_user_id: Set(BOB_ID),
        created_at: Set(Utc::now().into()),
    };

    if let Err(e) = settlement.insert(db).await {
        eprintln!("Failed to insert demo settlement: {e}");
    } else {
        println!("  Created settlement: Bob -> Alice (33.33)");
    }
}
