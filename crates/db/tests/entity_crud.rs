//! Integration tests for entity CRUD operations.
//!
//! Exercises the full repository layer against a real database:
//! - Create the full hierarchy (group -> item, project -> booking -> lines)
//! - Wholesale line replacement on booking edit
//! - Cascade and reassignment behaviour on delete
//! - Update and list ordering

use sqlx::PgPool;

use gearbook_db::models::booking::{
    BookingLineInput, BookingStatus, CreateBooking, UpdateBooking,
};
use gearbook_db::models::group::CreateGroup;
use gearbook_db::models::item::{CreateItem, UpdateItem};
use gearbook_db::models::project::{CreateProject, UpdateProject};
use gearbook_db::repositories::{BookingRepo, GroupRepo, ItemRepo, ProjectRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_group(name: &str) -> CreateGroup {
    CreateGroup {
        name: name.to_string(),
        sort_order: None,
    }
}

fn new_item(name: &str, total_quantity: i32, group_id: Option<i64>) -> CreateItem {
    CreateItem {
        name: name.to_string(),
        total_quantity,
        group_id,
        color: None,
        icon: None,
    }
}

fn new_project(name: &str) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        reference: None,
        client_name: None,
    }
}

fn new_booking(project_id: i64, start: &str, end: &str, lines: &[(i64, i32)]) -> CreateBooking {
    CreateBooking {
        project_id,
        start_date: start.parse().unwrap(),
        end_date: end.parse().unwrap(),
        status: None,
        lines: lines
            .iter()
            .map(|&(item_id, quantity)| BookingLineInput { item_id, quantity })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Items and groups
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_and_fetch_item(pool: PgPool) {
    let group = GroupRepo::create(&pool, &new_group("Furniture")).await.unwrap();
    let item = ItemRepo::create(&pool, &new_item("Chair", 10, Some(group.id)))
        .await
        .unwrap();

    let fetched = ItemRepo::find_by_id(&pool, item.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Chair");
    assert_eq!(fetched.total_quantity, 10);
    assert_eq!(fetched.group_id, Some(group.id));
}

#[sqlx::test(migrations = "./migrations")]
async fn items_list_ordered_by_name(pool: PgPool) {
    ItemRepo::create(&pool, &new_item("Table", 4, None)).await.unwrap();
    ItemRepo::create(&pool, &new_item("Chair", 10, None)).await.unwrap();
    ItemRepo::create(&pool, &new_item("Lamp", 7, None)).await.unwrap();

    let names: Vec<String> = ItemRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(names, vec!["Chair", "Lamp", "Table"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn item_partial_update_keeps_other_fields(pool: PgPool) {
    let item = ItemRepo::create(&pool, &new_item("Chair", 10, None)).await.unwrap();

    let updated = ItemRepo::update(
        &pool,
        item.id,
        &UpdateItem {
            name: None,
            total_quantity: Some(12),
            group_id: None,
            color: None,
            icon: None,
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.name, "Chair");
    assert_eq!(updated.total_quantity, 12);
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_group_sets_member_items_to_ungrouped(pool: PgPool) {
    let group = GroupRepo::create(&pool, &new_group("Furniture")).await.unwrap();
    let item = ItemRepo::create(&pool, &new_item("Chair", 10, Some(group.id)))
        .await
        .unwrap();

    assert!(GroupRepo::delete(&pool, group.id).await.unwrap());

    let fetched = ItemRepo::find_by_id(&pool, item.id).await.unwrap().unwrap();
    assert_eq!(fetched.group_id, None);
}

#[sqlx::test(migrations = "./migrations")]
async fn groups_list_ordered_by_sort_order(pool: PgPool) {
    GroupRepo::create(
        &pool,
        &CreateGroup {
            name: "Lighting".to_string(),
            sort_order: Some(2),
        },
    )
    .await
    .unwrap();
    GroupRepo::create(
        &pool,
        &CreateGroup {
            name: "Furniture".to_string(),
            sort_order: Some(1),
        },
    )
    .await
    .unwrap();

    let names: Vec<String> = GroupRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, vec!["Furniture", "Lighting"]);
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn project_update_applies_only_given_fields(pool: PgPool) {
    let project = ProjectRepo::create(
        &pool,
        &CreateProject {
            name: "Autumn fair".to_string(),
            reference: Some("AF-24".to_string()),
            client_name: None,
        },
    )
    .await
    .unwrap();

    let updated = ProjectRepo::update(
        &pool,
        project.id,
        &UpdateProject {
            name: None,
            reference: None,
            client_name: Some("Acme Events".to_string()),
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.name, "Autumn fair");
    assert_eq!(updated.reference.as_deref(), Some("AF-24"));
    assert_eq!(updated.client_name.as_deref(), Some("Acme Events"));
}

#[sqlx::test(migrations = "./migrations")]
async fn update_missing_project_returns_none(pool: PgPool) {
    let result = ProjectRepo::update(
        &pool,
        999,
        &UpdateProject {
            name: Some("Ghost".to_string()),
            reference: None,
            client_name: None,
        },
    )
    .await
    .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Bookings and lines
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn booking_create_defaults_to_confirmed(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Autumn fair")).await.unwrap();
    let chair = ItemRepo::create(&pool, &new_item("Chair", 10, None)).await.unwrap();

    let booking = BookingRepo::create(
        &pool,
        &new_booking(project.id, "2024-03-01", "2024-03-10", &[(chair.id, 6)]),
    )
    .await
    .unwrap();

    assert_eq!(booking.booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.lines.len(), 1);
    assert_eq!(booking.lines[0].item_id, chair.id);
    assert_eq!(booking.lines[0].quantity, 6);
}

#[sqlx::test(migrations = "./migrations")]
async fn booking_update_replaces_lines_wholesale(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Autumn fair")).await.unwrap();
    let chair = ItemRepo::create(&pool, &new_item("Chair", 10, None)).await.unwrap();
    let table = ItemRepo::create(&pool, &new_item("Table", 4, None)).await.unwrap();

    let booking = BookingRepo::create(
        &pool,
        &new_booking(project.id, "2024-03-01", "2024-03-10", &[(chair.id, 6)]),
    )
    .await
    .unwrap();

    let updated = BookingRepo::update(
        &pool,
        booking.booking.id,
        &UpdateBooking {
            project_id: None,
            start_date: None,
            end_date: None,
            status: Some(BookingStatus::Potential),
            lines: vec![
                BookingLineInput {
                    item_id: table.id,
                    quantity: 2,
                },
                BookingLineInput {
                    item_id: chair.id,
                    quantity: 4,
                },
            ],
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.booking.status, BookingStatus::Potential);
    // Old lines are gone; the new set comes back in payload order.
    assert_eq!(updated.lines.len(), 2);
    assert_eq!(updated.lines[0].item_id, table.id);
    assert_eq!(updated.lines[1].item_id, chair.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn booking_list_attaches_lines_to_their_booking(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Autumn fair")).await.unwrap();
    let chair = ItemRepo::create(&pool, &new_item("Chair", 10, None)).await.unwrap();

    BookingRepo::create(
        &pool,
        &new_booking(project.id, "2024-03-08", "2024-03-15", &[(chair.id, 3)]),
    )
    .await
    .unwrap();
    BookingRepo::create(
        &pool,
        &new_booking(project.id, "2024-03-01", "2024-03-10", &[(chair.id, 6)]),
    )
    .await
    .unwrap();

    let bookings = BookingRepo::list(&pool).await.unwrap();
    // Ordered by start_date.
    assert_eq!(bookings.len(), 2);
    assert_eq!(bookings[0].booking.start_date.to_string(), "2024-03-01");
    assert_eq!(bookings[0].lines[0].quantity, 6);
    assert_eq!(bookings[1].booking.start_date.to_string(), "2024-03-08");
    assert_eq!(bookings[1].lines[0].quantity, 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_booking_removes_its_lines(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Autumn fair")).await.unwrap();
    let chair = ItemRepo::create(&pool, &new_item("Chair", 10, None)).await.unwrap();

    let booking = BookingRepo::create(
        &pool,
        &new_booking(project.id, "2024-03-01", "2024-03-10", &[(chair.id, 6)]),
    )
    .await
    .unwrap();

    assert!(BookingRepo::delete(&pool, booking.booking.id).await.unwrap());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM booking_lines")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_project_cascades_to_bookings(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Autumn fair")).await.unwrap();
    let chair = ItemRepo::create(&pool, &new_item("Chair", 10, None)).await.unwrap();
    let booking = BookingRepo::create(
        &pool,
        &new_booking(project.id, "2024-03-01", "2024-03-10", &[(chair.id, 6)]),
    )
    .await
    .unwrap();

    assert!(ProjectRepo::delete(&pool, project.id).await.unwrap());

    let fetched = BookingRepo::find_by_id(&pool, booking.booking.id).await.unwrap();
    assert!(fetched.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn reversed_dates_violate_check_constraint(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Autumn fair")).await.unwrap();
    let chair = ItemRepo::create(&pool, &new_item("Chair", 10, None)).await.unwrap();

    let result = BookingRepo::create(
        &pool,
        &new_booking(project.id, "2024-03-10", "2024-03-01", &[(chair.id, 1)]),
    )
    .await;
    assert!(result.is_err());
}
