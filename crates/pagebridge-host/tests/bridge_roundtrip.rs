//! End-to-end tests: a host driving the selector inside an in-memory preview frame.

use std::sync::Arc;
use std::time::Duration;

use pagebridge_agent::{AgentPhase, EmbeddedFrame};
use pagebridge_config::Config;
use pagebridge_dom::{Document, EventOutcome, EventType, NodeId, PointerEvent};
use pagebridge_host::{EditorBridgeHost, MessageHandler};
use pagebridge_protocol::{BridgeMessage, MessageBus, MessageKind};
use parking_lot::Mutex;
use tokio::time::sleep;

#[derive(Default)]
struct Recorder {
    messages: Mutex<Vec<BridgeMessage>>,
}

impl MessageHandler for Recorder {
    fn on_message(&self, message: &BridgeMessage) -> anyhow::Result<()> {
        self.messages.lock().push(message.clone());
        Ok(())
    }
}

struct Page {
    heading: NodeId,
    first_card: NodeId,
    second_card: NodeId,
}

fn build_page(doc: &mut Document) -> Page {
    let body = doc.body().unwrap();
    let heading = doc.append_element(body, "h1").unwrap();
    doc.set_attribute(heading, "id", "title").unwrap();
    doc.append_text(heading, "Welcome").unwrap();

    let list = doc.append_element(body, "div").unwrap();
    doc.set_attribute(list, "class", "cards").unwrap();
    let first_card = doc.append_element(list, "div").unwrap();
    doc.append_text(first_card, "One").unwrap();
    doc.append_element(list, "span").unwrap();
    let second_card = doc.append_element(list, "div").unwrap();
    doc.set_attribute(second_card, "class", "card featured").unwrap();
    doc.append_text(second_card, "  Two  ").unwrap();

    Page {
        heading,
        first_card,
        second_card,
    }
}

struct Harness {
    window: MessageBus,
    frame: EmbeddedFrame,
    host: EditorBridgeHost,
    recorder: Arc<Recorder>,
    page: Page,
}

fn harness() -> Harness {
    let window = MessageBus::new();
    let mut doc = Document::new();
    let page = build_page(&mut doc);
    let frame = EmbeddedFrame::with_document(window.clone(), doc);
    let host = EditorBridgeHost::new(&Config::default(), window.clone()).unwrap();
    Harness {
        window,
        frame,
        host,
        recorder: Arc::new(Recorder::default()),
        page,
    }
}

impl Harness {
    fn initialize(&self) {
        self.host
            .initialize(Arc::new(self.frame.clone()), self.recorder.clone());
    }

    fn click(&self, node: NodeId) -> EventOutcome {
        self.frame.dispatch(PointerEvent::new(EventType::Click, node))
    }

    fn hover(&self, node: NodeId) -> EventOutcome {
        self.frame
            .dispatch(PointerEvent::new(EventType::PointerEnter, node))
    }

    fn received(&self) -> Vec<BridgeMessage> {
        self.recorder.messages.lock().clone()
    }

    fn marked(&self, class: &str) -> Vec<NodeId> {
        self.frame.with_document_ref(|doc| doc.elements_with_class(class))
    }
}

async fn settle() {
    sleep(Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn test_full_selection_round_trip() {
    let h = harness();
    h.initialize();

    h.frame.finish_load();
    sleep(Duration::from_millis(501)).await;
    assert!(h.frame.is_instrumented());
    assert_eq!(h.frame.count_elements_with_id("visual-editor-script"), 1);

    h.host.enter_edit_mode();
    assert_eq!(h.frame.agent_phase(), Some(AgentPhase::Active));

    h.hover(h.page.second_card);
    assert_eq!(h.marked("visual-editor-hover"), vec![h.page.second_card]);

    let outcome = h.click(h.page.second_card);
    assert!(outcome.default_prevented && outcome.propagation_stopped);
    settle().await;

    let received = h.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].kind, MessageKind::ElementSelected);

    let selection = h.host.selection().unwrap();
    assert_eq!(selection.tag_name, "DIV");
    assert_eq!(selection.class_name, "card featured");
    assert_eq!(selection.text_content, "Two");
    assert_eq!(selection.path, "/html/body/div/div[2]");
    assert!(h.marked("visual-editor-hover").is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_id_selection_and_exit_cleanup() {
    let h = harness();
    h.frame.finish_load();
    h.initialize();
    assert!(h.frame.is_instrumented());

    h.host.enter_edit_mode();
    h.click(h.page.heading);
    h.hover(h.page.first_card);
    settle().await;
    assert_eq!(h.host.selection().unwrap().path, "//*[@id=\"title\"]");

    h.host.exit_edit_mode();
    assert!(h.host.selection().is_none());
    assert_eq!(h.frame.agent_phase(), Some(AgentPhase::Idle));
    assert!(h.marked("visual-editor-hover").is_empty());
    assert!(h.marked("visual-editor-selected").is_empty());
    assert_eq!(
        h.frame.with_document_ref(|doc| doc.event_listener_count()),
        0
    );
}

#[tokio::test(start_paused = true)]
async fn test_clicks_pass_through_outside_edit_mode() {
    let h = harness();
    h.frame.finish_load();
    h.initialize();

    assert_eq!(h.click(h.page.first_card), EventOutcome::passthrough());
    settle().await;
    assert!(h.received().is_empty());
    assert!(h.marked("visual-editor-selected").is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_clear_selection_round_trip() {
    let h = harness();
    h.frame.finish_load();
    h.initialize();
    h.host.enter_edit_mode();

    h.click(h.page.first_card);
    settle().await;
    h.host.clear_selection();

    assert!(h.marked("visual-editor-selected").is_empty());
    assert!(h.host.selection().is_some());
    assert_eq!(h.frame.agent_phase(), Some(AgentPhase::Active));

    h.host.clear_selection();
    assert!(h.marked("visual-editor-selected").is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_reload_is_reinstrumented() {
    let h = harness();
    h.frame.finish_load();
    h.initialize();
    h.host.enter_edit_mode();

    h.frame.reload();
    assert!(!h.frame.is_instrumented());
    sleep(Duration::from_millis(501)).await;
    assert!(h.frame.is_instrumented());
    assert!(h.host.is_edit_mode());
    assert_eq!(h.frame.agent_phase(), Some(AgentPhase::Active));

    let fresh = h
        .frame
        .with_document_mut(|doc| {
            let body = doc.body().unwrap();
            doc.append_element(body, "article")
        })
        .unwrap();
    let outcome = h.click(fresh);
    assert!(outcome.default_prevented);
    settle().await;
    assert_eq!(h.host.selection().unwrap().path, "/html/body/article");
}

#[tokio::test(start_paused = true)]
async fn test_reload_outside_edit_mode_stays_idle() {
    let h = harness();
    h.frame.finish_load();
    h.initialize();

    h.frame.reload();
    sleep(Duration::from_millis(501)).await;
    assert!(h.frame.is_instrumented());
    assert!(!h.host.is_edit_mode());
    assert_eq!(h.frame.agent_phase(), Some(AgentPhase::Idle));
}

#[tokio::test(start_paused = true)]
async fn test_host_traffic_on_window_is_not_forwarded() {
    let h = harness();
    h.frame.finish_load();
    h.initialize();

    h.window
        .post(
            BridgeMessage::control(MessageKind::ExitEditMode)
                .to_value()
                .unwrap(),
        )
        .unwrap();
    settle().await;
    assert!(h.received().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_detached_frame_does_not_break_host() {
    let h = harness();
    h.frame.finish_load();
    h.initialize();

    h.frame.detach();
    h.host.enter_edit_mode();
    h.host.clear_selection();
    h.host.exit_edit_mode();
    sleep(Duration::from_secs(5)).await;
    assert!(!h.host.is_edit_mode());
}
