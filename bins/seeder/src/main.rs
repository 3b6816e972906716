//! Database seeder for Divvy development and testing.
//!
//! Seeds three users, a trip group, two demo expenses, and a settlement so
//! the balance endpoints have data to resolve right after `migrator fresh`.
//!
//! Usage: cargo run --bin seeder

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::str::FromStr;
use uuid::Uuid;

use divvy_db::entities::{
    SplitType,
    expenses::{self, SplitRecord, SplitsJson},
    groups::{self, MemberRecord, MembersJson},
    settlements::{self, RelatedExpenseIdsJson},
    users,
};

/// Demo user IDs (consistent for all seeds)
const ALICE_ID: &str = "00000000-0000-0000-0000-000000000001";
const BOB_ID: &str = "00000000-0000-0000-0000-000000000002";
const CAROL_ID: &str = "00000000-0000-0000-0000-000000000003";
/// Demo group ID
const TRIP_GROUP_ID: &str = "00000000-0000-0000-0000-000000000010";
/// Demo expense IDs
const DINNER_ID: &str = "00000000-0000-0000-0000-000000000020";
const GROCERIES_ID: &str = "00000000-0000-0000-0000-000000000021";
/// Demo settlement ID
const SETTLEMENT_ID: &str = "00000000-0000-0000-0000-000000000030";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = divvy_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo users...");
    seed_users(&db).await;

    println!("Seeding trip group...");
    seed_group(&db).await;

    println!("Seeding demo expenses...");
    seed_expenses(&db).await;

    println!("Seeding settlement...");
    seed_settlement(&db).await;

    println!("Seeding complete!");
}

fn id(s: &str) -> Uuid {
    Uuid::parse_str(s).unwrap()
}

fn money(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Seeds the three demo users.
async fn seed_users(db: &DatabaseConnection) {
    let people = [
        (ALICE_ID, "Alice Chen", "alice@divvy.dev"),
        (BOB_ID, "Bob Martinez", "bob@divvy.dev"),
        (CAROL_ID, "Carol Okafor", "carol@divvy.dev"),
    ];

    for (user_id, name, email) in people {
        if users::Entity::find_by_id(id(user_id))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  {name} already exists, skipping...");
            continue;
        }

        let user = users::ActiveModel {
            id: Set(id(user_id)),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            image_url: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = user.insert(db).await {
            eprintln!("Failed to insert {name}: {e}");
        } else {
            println!("  Created {name} <{email}>");
        }
    }
}

/// Seeds the weekend trip group with all three users as members.
async fn seed_group(db: &DatabaseConnection) {
    if groups::Entity::find_by_id(id(TRIP_GROUP_ID))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Trip group already exists, skipping...");
        return;
    }

    let group = groups::ActiveModel {
        id: Set(id(TRIP_GROUP_ID)),
        name: Set("Weekend Trip".to_string()),
        description: Set(Some("Cabin weekend with the usual crew".to_string())),
        created_by: Set(id(ALICE_ID)),
        members: Set(MembersJson(vec![
            MemberRecord {
                user_id: id(ALICE_ID),
            },
            MemberRecord {
                user_id: id(BOB_ID),
            },
            MemberRecord {
                user_id: id(CAROL_ID),
            },
        ])),
        created_at: Set(Utc::now().into()),
    };

    if let Err(e) = group.insert(db).await {
        eprintln!("Failed to insert trip group: {e}");
    } else {
        println!("  Created group: Weekend Trip");
    }
}

/// One demo expense to seed.
struct DemoExpense {
    id: Uuid,
    description: &'static str,
    amount: &'static str,
    category: &'static str,
    days_ago: i64,
    paid_by: Uuid,
    group_id: Option<Uuid>,
    splits: Vec<SplitRecord>,
}

/// Seeds a three-way dinner in the trip group and a pairwise grocery run.
async fn seed_expenses(db: &DatabaseConnection) {
    let dinner = DemoExpense {
        id: id(DINNER_ID),
        description: "Team dinner",
        amount: "90.00",
        category: "Food",
        days_ago: 14,
        paid_by: id(ALICE_ID),
        group_id: Some(id(TRIP_GROUP_ID)),
        splits: vec![
            SplitRecord {
                user_id: id(ALICE_ID),
                amount: money("30.00"),
                paid: true,
            },
            SplitRecord {
                user_id: id(BOB_ID),
                amount: money("30.00"),
                paid: false,
            },
            SplitRecord {
                user_id: id(CAROL_ID),
                amount: money("30.00"),
                paid: false,
            },
        ],
    };

    let groceries = DemoExpense {
        id: id(GROCERIES_ID),
        description: "Groceries",
        amount: "45.00",
        category: "Food",
        days_ago: 5,
        paid_by: id(BOB_ID),
        group_id: None,
        splits: vec![
            SplitRecord {
                user_id: id(BOB_ID),
                amount: money("22.50"),
                paid: true,
            },
            SplitRecord {
                user_id: id(ALICE_ID),
                amount: money("22.50"),
                paid: false,
            },
        ],
    };

    seed_expense(db, dinner).await;
    seed_expense(db, groceries).await;
}

async fn seed_expense(db: &DatabaseConnection, demo: DemoExpense) {
    if expenses::Entity::find_by_id(demo.id)
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  {} already exists, skipping...", demo.description);
        return;
    }

    let expense = expenses::ActiveModel {
        id: Set(demo.id),
        description: Set(demo.description.to_string()),
        amount: Set(money(demo.amount)),
        category: Set(demo.category.to_string()),
        date: Set((Utc::now() - Duration::days(demo.days_ago)).into()),
        paid_by_user_id: Set(demo.paid_by),
        split_type: Set(SplitType::Equal),
        splits: Set(SplitsJson(demo.splits)),
        group_id: Set(demo.group_id),
        created_by: Set(demo.paid_by),
        created_at: Set(Utc::now().into()),
    };

    if let Err(e) = expense.insert(db).await {
        eprintln!("Failed to insert {}: {e}", demo.description);
    } else {
        println!("  Created {} (${})", demo.description, demo.amount);
    }
}

/// Seeds Bob's repayment of his dinner share.
async fn seed_settlement(db: &DatabaseConnection) {
    if settlements::Entity::find_by_id(id(SETTLEMENT_ID))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Settlement already exists, skipping...");
        return;
    }

    let settlement = settlements::ActiveModel {
        id: Set(id(SETTLEMENT_ID)),
        amount: Set(money("30.00")),
        note: Set(Some("Dinner repayment".to_string())),
        date: Set((Utc::now() - Duration::days(2)).into()),
        paid_by_user_id: Set(id(BOB_ID)),
        received_by_user_id: Set(id(ALICE_ID)),
        related_expense_ids: Set(RelatedExpenseIdsJson(vec![id(DINNER_ID)])),
        created_at: Set(Utc::now().into()),
    };

    if let Err(e) = settlement.insert(db).await {
        eprintln!("Failed to insert settlement: {e}");
    } else {
        println!("  Created settlement: Bob -> Alice ($30.00)");
    }
}
