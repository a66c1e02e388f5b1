use crate::{error::ApiResult, extractors::SignedWebhookPayload, state::AppState};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use solaros_core::{
    CustomerFollowup, InventoryReordered, JobCompleted, LeadProcessed, WebhookEvent,
    WebhookPayload, display_field, validation::validate_date,
};
use solaros_db::{DataStore, FieldUpdate, RecordFilter, Table};
use tracing::{error, info, warn};

/// Acknowledgement body for processed webhooks
#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub success: bool,
    pub message: String,
}

/// Webhook handler for n8n events
///
/// This handler:
/// 1. Verifies the optional signature (handled by the SignedWebhookPayload extractor)
/// 2. Parses the `{event, data}` envelope
/// 3. Dispatches the event to its handler
/// 4. Acknowledges with 200, including for unrecognized events
pub async fn handle_webhook(
    State(state): State<AppState>,
    SignedWebhookPayload(body): SignedWebhookPayload,
) -> ApiResult<impl IntoResponse> {
    let payload = WebhookPayload::from_slice(&body).inspect_err(|e| {
        warn!("Rejected webhook body: {}", e);
    })?;
    let event = WebhookEvent::from_payload(payload).inspect_err(|e| {
        warn!("Rejected webhook data: {}", e);
    })?;
    let tag = event.tag().to_string();

    if let Err(e) = dispatch_event(state.data_store.as_ref(), event).await {
        error!("Webhook processing error for {}: {}", tag, e);
        return Err(e);
    }

    Ok((
        StatusCode::OK,
        Json(WebhookResponse {
            success: true,
            message: format!("Webhook processed: {}", tag),
        }),
    ))
}

/// Route a decoded event to its handler
pub async fn dispatch_event(store: &dyn DataStore, event: WebhookEvent) -> ApiResult<()> {
    match event {
        WebhookEvent::LeadProcessed(lead) => handle_lead_processed(store, lead).await,
        WebhookEvent::JobCompleted(job) => handle_job_completed(store, job).await,
        WebhookEvent::CustomerFollowup(followup) => {
            handle_customer_followup(followup);
            Ok(())
        }
        WebhookEvent::InventoryReordered(item) => handle_inventory_reordered(store, item).await,
        WebhookEvent::Unknown(tag) => {
            info!("Unhandled webhook event: {}", tag);
            Ok(())
        }
    }
}

async fn handle_lead_processed(store: &dyn DataStore, lead: LeadProcessed) -> ApiResult<()> {
    let mut fields = Vec::with_capacity(3);
    if let Some(status) = &lead.status {
        fields.push(nullable_text("status", status.as_deref()));
    }
    if let Some(next_action) = &lead.next_action {
        fields.push(nullable_text("next_action", next_action.as_deref()));
    }
    fields.push(FieldUpdate::timestamp("updated_at", Utc::now()));

    let affected = store
        .update(Table::Leads, &RecordFilter::id(&lead.lead_id), &fields)
        .await?;
    if affected == 0 {
        warn!("lead.processed matched no lead with id {}", lead.lead_id);
    }

    info!(
        "Lead {} processed with status: {}",
        lead.lead_id,
        lead.status.flatten().as_deref().unwrap_or("unchanged")
    );
    Ok(())
}

async fn handle_job_completed(store: &dyn DataStore, job: JobCompleted) -> ApiResult<()> {
    let mut fields = vec![FieldUpdate::text("status", "completed")];
    match job.completion_data.actual_cost {
        Some(Some(cost)) => fields.push(FieldUpdate::number("actual_cost", cost)),
        Some(None) => fields.push(FieldUpdate::null("actual_cost")),
        None => {}
    }
    fields.push(FieldUpdate::timestamp("updated_at", Utc::now()));

    let affected = store
        .update(Table::Jobs, &RecordFilter::id(&job.job_id), &fields)
        .await?;
    if affected == 0 {
        warn!("job.completed matched no job with id {}", job.job_id);
    }

    info!("Job {} marked as completed", job.job_id);
    Ok(())
}

// No persistence yet; task creation will hang off this event
fn handle_customer_followup(followup: CustomerFollowup) {
    let scheduled = display_field(followup.scheduled_date.as_ref(), "unscheduled");
    if let Some(Value::String(date)) = &followup.scheduled_date {
        if !validate_date(date) {
            warn!("customer.followup carries an unparseable date: {}", scheduled);
        }
    }

    info!(
        "Customer followup scheduled: {} - {} on {}",
        display_field(followup.customer_id.as_ref(), "unknown"),
        display_field(followup.followup_type.as_ref(), "unspecified"),
        scheduled
    );
}

async fn handle_inventory_reordered(store: &dyn DataStore, item: InventoryReordered) -> ApiResult<()> {
    let fields = [FieldUpdate::timestamp("updated_at", Utc::now())];

    let affected = store
        .update(Table::Inventory, &RecordFilter::id(&item.item_id), &fields)
        .await?;
    if affected == 0 {
        warn!("inventory.reordered matched no item with id {}", item.item_id);
    }

    info!(
        "Inventory reordered: {} - {} units from {}",
        item.item_id,
        display_field(item.quantity_ordered.as_ref(), "unknown"),
        display_field(item.supplier.as_ref(), "unknown supplier")
    );
    Ok(())
}

fn nullable_text(column: &'static str, value: Option<&str>) -> FieldUpdate {
    match value {
        Some(text) => FieldUpdate::text(column, text),
        None => FieldUpdate::null(column),
    }
}
