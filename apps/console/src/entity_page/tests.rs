use std::sync::Arc;

use metaform_application::{EntityGateway, EntityStore};
use metaform_core::AppError;
use metaform_domain::EntityRecord;
use metaform_infrastructure::InMemoryEntityGateway;
use serde_json::{Value, json};

use super::{EntityPage, PageNotice};
use crate::entity_definition::entity_definition;

fn record(value: Value) -> EntityRecord {
    serde_json::from_value(value).unwrap_or_else(|_| unreachable!())
}

fn seeded_gateway() -> Arc<InMemoryEntityGateway> {
    Arc::new(InMemoryEntityGateway::with_records(
        "users",
        vec![
            record(json!({
                "id": "2",
                "firstName": "Grace",
                "lastName": "Hopper",
                "email": "grace@example.com",
                "phone": "0123456789"
            })),
            record(json!({
                "id": "10",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "phone": "9876543210"
            })),
            record(json!({
                "id": "1",
                "firstName": "Alan",
                "lastName": "Turing",
                "email": "alan@example.com",
                "phone": "5555555555"
            })),
        ],
    ))
}

async fn loaded_page(gateway: Arc<InMemoryEntityGateway>) -> EntityPage {
    let definition = entity_definition("users").unwrap_or_else(|_| unreachable!());
    let page = EntityPage::new(EntityStore::new(gateway), definition);
    page.load().await.unwrap_or_else(|_| unreachable!());
    page
}

async fn row_ids(page: &EntityPage) -> Vec<String> {
    page.rows()
        .await
        .iter()
        .map(|record| record.id().to_owned())
        .collect()
}

#[tokio::test]
async fn rows_are_sorted_by_numeric_id_descending() {
    let page = loaded_page(seeded_gateway()).await;
    assert_eq!(row_ids(&page).await, vec!["10", "2", "1"]);
}

#[tokio::test]
async fn create_flow_saves_and_closes_the_form() {
    let mut page = loaded_page(seeded_gateway()).await;
    page.open_create();
    assert_eq!(page.drawer_title().as_deref(), Some("Add User"));

    for (field, value) in [
        ("firstName", " Barbara "),
        ("lastName", "Liskov"),
        ("email", "barbara@example.com"),
        ("phone", "1112223333"),
    ] {
        page.fill(field, value).unwrap_or_else(|_| unreachable!());
    }

    let notice = page.submit().await;
    assert_eq!(
        notice,
        Ok(PageNotice::Success("User created successfully".to_owned()))
    );
    assert!(page.form().is_none());

    let rows = page.rows().await;
    assert_eq!(rows.len(), 4);
    let created = rows
        .iter()
        .find(|record| record.get("lastName") == Some(&json!("Liskov")))
        .unwrap_or_else(|| unreachable!());
    assert_eq!(created.get("firstName"), Some(&json!("Barbara")));
    assert!(created.get("createdDate").is_some_and(Value::is_string));
}

#[tokio::test]
async fn invalid_input_keeps_the_form_open_with_help_text() {
    let mut page = loaded_page(seeded_gateway()).await;
    page.open_create();
    page.fill("firstName", "A").unwrap_or_else(|_| unreachable!());
    assert!(page.form().and_then(|form| form.help_text("firstName")).is_some());

    let result = page.submit().await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    let form = page.form().unwrap_or_else(|| unreachable!());
    assert_eq!(form.help_text("lastName"), Some("Last Name is required"));
    assert_eq!(page.rows().await.len(), 3);
}

#[tokio::test]
async fn edit_flow_updates_the_cached_record() {
    let mut page = loaded_page(seeded_gateway()).await;
    page.open_edit("2").await.unwrap_or_else(|_| unreachable!());
    assert_eq!(page.drawer_title().as_deref(), Some("Edit User"));
    assert_eq!(
        page.form().and_then(|form| form.value("firstName")),
        Some(&json!("Grace"))
    );

    page.fill("lastName", "Brewster Hopper")
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(
        page.submit().await,
        Ok(PageNotice::Success("User updated successfully".to_owned()))
    );

    let rows = page.rows().await;
    let updated = rows
        .iter()
        .find(|record| record.id() == "2")
        .unwrap_or_else(|| unreachable!());
    assert_eq!(updated.get("lastName"), Some(&json!("Brewster Hopper")));
    assert_eq!(row_ids(&page).await, vec!["10", "2", "1"]);
}

#[tokio::test]
async fn failed_save_reports_operation_failed_and_keeps_the_form() {
    let gateway = seeded_gateway();
    let mut page = loaded_page(Arc::clone(&gateway)).await;
    page.open_edit("2").await.unwrap_or_else(|_| unreachable!());
    gateway
        .delete("users", "2")
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(
        page.submit().await,
        Ok(PageNotice::Error("Operation failed".to_owned()))
    );
    assert!(page.form().is_some());
}

#[tokio::test]
async fn editing_requires_a_loaded_record() {
    let mut page = loaded_page(seeded_gateway()).await;
    assert!(matches!(
        page.open_edit("99").await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        page.fill("firstName", "Ada"),
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn confirmed_delete_removes_only_that_row() {
    let page = loaded_page(seeded_gateway()).await;
    let pending = page
        .request_delete("1")
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(
        pending.confirmation().prompt,
        "Are you sure you want to delete?"
    );

    assert_eq!(
        page.confirm_delete(pending).await,
        PageNotice::Success("User deleted successfully".to_owned())
    );
    assert_eq!(row_ids(&page).await, vec!["10", "2"]);
}

#[tokio::test]
async fn cancelled_delete_keeps_the_row() {
    let page = loaded_page(seeded_gateway()).await;
    page.request_delete("1")
        .await
        .unwrap_or_else(|_| unreachable!())
        .cancel();
    assert_eq!(row_ids(&page).await, vec!["10", "2", "1"]);
}

#[tokio::test]
async fn failed_delete_reports_delete_failed() {
    let gateway = seeded_gateway();
    let page = loaded_page(Arc::clone(&gateway)).await;
    let pending = page
        .request_delete("1")
        .await
        .unwrap_or_else(|_| unreachable!());
    gateway
        .delete("users", "1")
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(
        page.confirm_delete(pending).await,
        PageNotice::Error("Delete failed".to_owned())
    );
    assert_eq!(row_ids(&page).await, vec!["10", "2", "1"]);
}

#[tokio::test]
async fn table_renders_configured_columns_and_actions() {
    let page = loaded_page(seeded_gateway()).await;
    let table = page.render_table().await;
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(lines.len(), 4);
    let header: Vec<&str> = lines[0].split(" | ").map(str::trim).collect();
    assert_eq!(
        header,
        vec![
            "First Name",
            "Last Name",
            "Email Address",
            "Phone Number",
            "Actions"
        ]
    );
    assert!(lines[1].starts_with("Ada "));
    assert!(lines[1].ends_with("Edit / Delete"));
}

#[tokio::test]
async fn table_is_empty_before_anything_is_loaded() {
    let definition = entity_definition("users").unwrap_or_else(|_| unreachable!());
    let page = EntityPage::new(
        EntityStore::new(Arc::new(InMemoryEntityGateway::new())),
        definition,
    );
    assert_eq!(page.render_table().await, "No data");
}

#[tokio::test]
async fn open_form_renders_fields_with_markers_values_and_errors() {
    let mut page = loaded_page(seeded_gateway()).await;
    assert_eq!(page.render_form(), None);

    page.open_create();
    page.fill("firstName", "A").unwrap_or_else(|_| unreachable!());
    let form = page.render_form().unwrap_or_else(|| unreachable!());
    let lines: Vec<&str> = form.lines().collect();

    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "Add User");
    assert_eq!(
        lines[1],
        "First Name* (text): A <- First Name must be at least 2 characters"
    );
    assert_eq!(lines[2], "Last Name* (text): Enter last name");
    assert_eq!(lines[4], "Phone Number* (tel): 10 digit phone number");
    assert!(lines[5].starts_with("Created Date (date): "));
}
