//! Simulate subcommand: a full bridge session against an in-memory page.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;

use pagebridge_agent::EmbeddedFrame;
use pagebridge_config::Config;
use pagebridge_dom::{Document, DomError, EventType, NodeId, PointerEvent};
use pagebridge_host::EditorBridgeHost;
use pagebridge_protocol::{BridgeMessage, MessageBus, MessageKind};

const REPORT_TIMEOUT: Duration = Duration::from_secs(2);

/// Inject the selector into a sample page, click an element and print what
/// the host received.
pub(crate) async fn simulate(config: &Config, id: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let window = MessageBus::new();
    let (doc, default_target) = sample_page()?;
    let frame = EmbeddedFrame::with_document(window.clone(), doc);
    let host = EditorBridgeHost::new(config, window)?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handler = move |message: &BridgeMessage| -> anyhow::Result<()> {
        tx.send(message.clone())?;
        Ok(())
    };
    host.initialize(Arc::new(frame.clone()), Arc::new(handler));

    frame.finish_load();
    tokio::time::sleep(config.bridge.settle_delay() + Duration::from_millis(50)).await;
    if !frame.is_instrumented() {
        return Err("selector script was not injected".into());
    }

    host.enter_edit_mode();
    let target = match id {
        Some(id) => frame
            .with_document_ref(|doc| doc.get_element_by_id(id))
            .ok_or_else(|| format!("no element with id '{}' in sample page", id))?,
        None => default_target,
    };
    frame.dispatch(PointerEvent::new(EventType::Click, target));

    let message = tokio::time::timeout(REPORT_TIMEOUT, rx.recv())
        .await?
        .ok_or("bridge closed before a selection arrived")?;
    if message.kind != MessageKind::ElementSelected {
        return Err(format!("unexpected {} from agent", message.kind.as_str()).into());
    }
    info!("Selection received by host");
    println!("{}", serde_json::to_string_pretty(&message.payload)?);

    host.exit_edit_mode();
    host.teardown();
    Ok(())
}

/// A small landing page. Returns it with the second card as default target.
fn sample_page() -> Result<(Document, NodeId), DomError> {
    let mut doc = Document::new();
    let body = doc.body().ok_or(DomError::HierarchyRequest("missing body".to_string()))?;

    let header = doc.append_element(body, "header")?;
    let title = doc.append_element(header, "h1")?;
    doc.set_attribute(title, "id", "title")?;
    doc.append_text(title, "Preview")?;

    let main = doc.append_element(body, "main")?;
    let cards = doc.append_element(main, "section")?;
    doc.set_attribute(cards, "class", "cards")?;
    let mut target = cards;
    for label in ["Fast builds", "Live preview", "One-click deploy"] {
        let card = doc.append_element(cards, "div")?;
        doc.set_attribute(card, "class", "card")?;
        doc.append_text(card, label)?;
        if label == "Live preview" {
            target = card;
        }
    }

    let footer = doc.append_element(body, "footer")?;
    let cta = doc.append_element(footer, "button")?;
    doc.set_attribute(cta, "id", "cta")?;
    doc.append_text(cta, "Get started")?;

    Ok((doc, target))
}
