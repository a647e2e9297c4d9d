use super::*;
use pagebridge_dom::EventType;
use pagebridge_protocol::{BridgeMessage, MessageKind};

use crate::script::ScriptConfig;
use pagebridge_config::Config;

const MARKER: &str = "visual-editor-script";

fn payload() -> String {
    SelectorScript::render(&ScriptConfig::from_config(&Config::default())).unwrap()
}

fn loaded_frame() -> (EmbeddedFrame, MessageBus) {
    let bus = MessageBus::new();
    let frame = EmbeddedFrame::new(bus.clone());
    frame.finish_load();
    (frame, bus)
}

fn post(frame: &EmbeddedFrame, kind: MessageKind) {
    let value = BridgeMessage::control(kind).to_value().unwrap();
    frame.post_message(&value, "*").unwrap();
}

#[test]
fn test_new_frame_is_loading() {
    let frame = EmbeddedFrame::new(MessageBus::new());
    assert_eq!(frame.ready_state().unwrap(), ReadyState::Loading);
    assert!(!frame.is_instrumented());
}

#[tokio::test]
async fn test_finish_load_bumps_load_signal() {
    let frame = EmbeddedFrame::new(MessageBus::new());
    let mut loads = frame.load_signal();
    frame.finish_load();
    loads.changed().await.unwrap();
    assert_eq!(*loads.borrow(), 1);
    assert!(frame.ready_state().unwrap().is_complete());
}

#[test]
fn test_inject_payload_installs_agent() {
    let (frame, _bus) = loaded_frame();
    frame.inject_script(MARKER, &payload()).unwrap();

    assert!(frame.is_instrumented());
    assert!(frame.has_element(MARKER).unwrap());
    assert!(frame.has_element("visual-editor-script-style").unwrap());
    assert_eq!(frame.agent_phase(), Some(AgentPhase::Idle));
    frame.with_document_ref(|doc| {
        let script = doc.get_element_by_id(MARKER).unwrap();
        assert_eq!(doc.parent(script), doc.body());
        assert_eq!(doc.tag_name(script), Some("SCRIPT"));
    });
}

#[test]
fn test_second_payload_does_not_start_second_instance() {
    let (frame, _bus) = loaded_frame();
    frame.inject_script(MARKER, &payload()).unwrap();
    frame.inject_script(MARKER, &payload()).unwrap();
    assert_eq!(frame.count_elements_with_id("visual-editor-script-style"), 1);
}

#[test]
fn test_foreign_script_is_not_executed() {
    let (frame, _bus) = loaded_frame();
    frame.inject_script("analytics", "console.log('hi');").unwrap();
    assert!(frame.has_element("analytics").unwrap());
    assert!(!frame.is_instrumented());
}

#[test]
fn test_inaccessible_frame() {
    let (frame, _bus) = loaded_frame();
    frame.set_accessible(false);
    assert!(matches!(frame.ready_state(), Err(FrameError::AccessDenied(_))));
    assert!(matches!(frame.has_element(MARKER), Err(FrameError::AccessDenied(_))));
    assert!(frame.inject_script(MARKER, &payload()).is_err());
    assert!(!frame.is_instrumented());
}

#[test]
fn test_inject_without_body() {
    let frame = EmbeddedFrame::with_document(MessageBus::new(), Document::bare());
    frame.finish_load();
    assert!(matches!(
        frame.inject_script(MARKER, &payload()),
        Err(FrameError::BodyMissing)
    ));
}

#[test]
fn test_detached_frame() {
    let (frame, _bus) = loaded_frame();
    frame.detach();
    assert!(matches!(frame.ready_state(), Err(FrameError::Detached)));
    let value = BridgeMessage::control(MessageKind::EnterEditMode).to_value().unwrap();
    assert!(matches!(
        frame.post_message(&value, "*"),
        Err(TransportError::Detached)
    ));
}

#[test]
fn test_messages_before_injection_are_dropped() {
    let (frame, _bus) = loaded_frame();
    post(&frame, MessageKind::EnterEditMode);
    frame.inject_script(MARKER, &payload()).unwrap();
    assert_eq!(frame.agent_phase(), Some(AgentPhase::Idle));
}

#[test]
fn test_posted_messages_drive_agent() {
    let (frame, _bus) = loaded_frame();
    frame.inject_script(MARKER, &payload()).unwrap();

    post(&frame, MessageKind::EnterEditMode);
    assert_eq!(frame.agent_phase(), Some(AgentPhase::Active));
    post(&frame, MessageKind::ExitEditMode);
    assert_eq!(frame.agent_phase(), Some(AgentPhase::Idle));
}

#[tokio::test]
async fn test_click_reaches_parent_bus() {
    let (frame, bus) = loaded_frame();
    let mut parent = bus.subscribe();
    frame.inject_script(MARKER, &payload()).unwrap();
    post(&frame, MessageKind::EnterEditMode);

    let target = frame.with_document_mut(|doc| {
        let body = doc.body().unwrap();
        let button = doc.append_element(body, "button").unwrap();
        doc.append_text(button, "Save").unwrap();
        button
    });
    let outcome = frame.dispatch(PointerEvent::new(EventType::Click, target));
    assert_eq!(outcome, EventOutcome::consumed());

    let value = parent.recv().await.unwrap();
    let message = BridgeMessage::from_value(&value).unwrap();
    assert_eq!(message.kind, MessageKind::ElementSelected);
    assert_eq!(message.payload.unwrap().text_content, "Save");
}

#[test]
fn test_dispatch_without_listeners_passes_through() {
    let (frame, _bus) = loaded_frame();
    frame.inject_script(MARKER, &payload()).unwrap();
    let body = frame.with_document_ref(|doc| doc.body().unwrap());
    let outcome = frame.dispatch(PointerEvent::new(EventType::Click, body));
    assert_eq!(outcome, EventOutcome::passthrough());
}

#[test]
fn test_navigation_resets_window() {
    let (frame, _bus) = loaded_frame();
    frame.inject_script(MARKER, &payload()).unwrap();

    frame.navigate(Document::new());
    assert!(!frame.is_instrumented());
    assert!(!frame.has_element(MARKER).unwrap());
    assert_eq!(frame.ready_state().unwrap(), ReadyState::Loading);
}

#[tokio::test]
async fn test_reload_fires_load_again() {
    let (frame, _bus) = loaded_frame();
    let mut loads = frame.load_signal();
    frame.reload();
    loads.changed().await.unwrap();
    assert_eq!(*loads.borrow(), 2);
}
