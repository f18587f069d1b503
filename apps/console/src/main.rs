//! Metaform entity management console.

#![forbid(unsafe_code)]

mod console_command;
mod console_config;
mod entity_definition;
mod entity_page;
mod field_input;

use std::process::ExitCode;
use std::sync::Arc;

use metaform_application::EntityStore;
use metaform_core::{AppError, AppResult};
use metaform_infrastructure::HttpEntityGateway;
use tracing::{info, warn};

use crate::console_command::{ConsoleCommand, FieldAssignment};
use crate::console_config::{ConsoleConfig, init_tracing};
use crate::entity_definition::entity_definition;
use crate::entity_page::{EntityPage, PageNotice};

#[tokio::main]
async fn main() -> Result<ExitCode, AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConsoleConfig::load()?;
    let command = ConsoleCommand::parse(std::env::args().skip(1))?;
    let definition = entity_definition(config.entity_name.as_str())?;
    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
    let gateway = HttpEntityGateway::new(http_client, config.api_base_url.clone());
    let mut page = EntityPage::new(EntityStore::new(Arc::new(gateway)), definition);

    info!(
        api_base_url = %config.api_base_url,
        entity = %config.entity_name,
        "metaform-console started"
    );

    page.load().await?;

    let notice = match command {
        ConsoleCommand::List => None,
        ConsoleCommand::Create { assignments } => {
            page.open_create();
            Some(save(&mut page, &assignments).await?)
        }
        ConsoleCommand::Update { id, assignments } => {
            page.open_edit(id.as_str()).await?;
            Some(save(&mut page, &assignments).await?)
        }
        ConsoleCommand::Delete { id, confirmed } => {
            let pending = page.request_delete(id.as_str()).await?;
            let confirmation = pending.confirmation();
            println!("{}", confirmation.prompt);
            if confirmed {
                println!("{}", confirmation.confirm_label);
                Some(page.confirm_delete(pending).await)
            } else {
                println!("{} (pass --yes to confirm)", confirmation.cancel_label);
                pending.cancel();
                None
            }
        }
    };

    let succeeded = match &notice {
        Some(notice @ PageNotice::Success(_)) => {
            println!("{notice}");
            true
        }
        Some(notice @ PageNotice::Error(_)) => {
            eprintln!("{notice}");
            false
        }
        None => true,
    };

    println!("{}", page.render_table().await);

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn save(page: &mut EntityPage, assignments: &[FieldAssignment]) -> AppResult<PageNotice> {
    for assignment in assignments {
        page.fill(assignment.field.as_str(), assignment.raw_value.as_str())?;
    }
    if let Some(form) = page.render_form() {
        println!("{form}");
    }

    let notice = page.submit().await?;
    if !notice.is_success() {
        warn!(notice = %notice, "record was not saved");
    }
    Ok(notice)
}
