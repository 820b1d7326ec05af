// retime-core/tests/cancellation_tests.rs
//
// Cancellation must reach the underlying process exactly once and must never
// leave the task hanging.

use retime_core::external::{RecordedBehavior, RecordingConverter};
use retime_core::services::{slow_down, speed_up};
use retime_core::{
    ActionContext, ConfigStore, ConversionOutcome, ConversionTask, EditService, ExportOptions,
};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn start(service: &EditService, converter: &RecordingConverter) -> ConversionTask {
    let config = ConfigStore::resolve(&service.config, Vec::new()).unwrap();
    service
        .run(&ActionContext {
            config: &config,
            converter,
            export_options: ExportOptions::default(),
            input_path: Path::new("in.mp4"),
            output_path: Path::new("out.mp4"),
        })
        .unwrap()
}

#[test]
fn test_cancel_before_wait_terminates_once() {
    let converter = RecordingConverter::with_behavior(RecordedBehavior::BlockUntilCancelled);
    let task = start(&slow_down::service(), &converter);

    task.cancel();
    task.cancel();

    assert!(task.is_cancelled());
    assert_eq!(task.wait().unwrap(), ConversionOutcome::Cancelled);
    assert_eq!(converter.cancel_calls(), 1);
}

#[test]
fn test_cancel_from_another_thread_while_waiting() {
    let converter = RecordingConverter::with_behavior(RecordedBehavior::BlockUntilCancelled);
    let task = start(&speed_up::service(), &converter);
    let token = task.cancel_token();

    let (done_tx, done_rx) = mpsc::channel();
    let waiter = thread::spawn(move || {
        let outcome = task.wait();
        let _ = done_tx.send(());
        outcome
    });

    // The task must still be running until someone cancels it.
    assert!(done_rx.recv_timeout(Duration::from_millis(50)).is_err());

    token.cancel();
    token.cancel();

    done_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("task finished after cancellation");
    assert_eq!(waiter.join().unwrap().unwrap(), ConversionOutcome::Cancelled);
    assert_eq!(converter.cancel_calls(), 1);
}

#[test]
fn test_cancel_after_completion_is_harmless() {
    let converter = RecordingConverter::new();
    let task = start(&slow_down::service(), &converter);
    let token = task.cancel_token();

    let outcome = task.wait().unwrap();
    assert!(matches!(outcome, ConversionOutcome::Completed(_)));

    token.cancel();
    assert!(token.is_cancelled());
    assert_eq!(converter.cancel_calls(), 1);
}

#[test]
fn test_concurrent_tasks_cancel_independently() {
    let converter = RecordingConverter::with_behavior(RecordedBehavior::BlockUntilCancelled);
    let first = start(&slow_down::service(), &converter);
    let second = start(&speed_up::service(), &converter);

    first.cancel();
    assert!(first.is_cancelled());
    assert!(!second.is_cancelled());
    assert_eq!(first.wait().unwrap(), ConversionOutcome::Cancelled);
    assert_eq!(converter.cancel_calls(), 1);

    second.cancel();
    assert_eq!(second.wait().unwrap(), ConversionOutcome::Cancelled);
    assert_eq!(converter.cancel_calls(), 2);
    assert_eq!(converter.requests().len(), 2);
}
