use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pagepilot_lib::actions::schema::ScrollDirection;
use pagepilot_lib::readiness::wait_till_stable;
use pagepilot_lib::targeting::{is_interactive, is_visible, ComputedStyle, ElementSnapshot};
use pagepilot_lib::{
    parse_response, wait_for, xpath_to_css, Operation, PilotError, PollOptions, PollOutcome,
    StabilityOptions,
};
use tokio_util::sync::CancellationToken;

const REPLY: &str = r#"I will search for the crate and open the first result.

```json
[
  {"thought": "Type the query into the search box", "action": {"name": "setValueAndEnter", "args": {"xpath": "//input[@name='q']", "value": "tokio"}}},
  {"thought": "Results load below the fold", "action": {"name": "scroll", "args": {"direction": "down"}}},
  {"thought": "Open the first result", "action": {"name": "click", "args": {"xpath": "//ul[@id='results']/li[1]/a"}}}
]
```
"#;

#[test]
fn fenced_reply_becomes_ordered_action_list() {
    let actions = parse_response(REPLY).unwrap().into_inner();

    assert_eq!(actions.len(), 3);
    assert_eq!(actions[0].thought.as_deref(), Some("Type the query into the search box"));
    assert_eq!(
        actions[1].operation,
        Operation::Scroll {
            direction: ScrollDirection::Down,
            amount: None
        }
    );
    match &actions[2].operation {
        Operation::Click { xpath } => {
            assert_eq!(xpath_to_css(xpath), "ul[id='results'] > li:nth-of-type(1) > a")
        }
        other => panic!("unexpected operation: {other:?}"),
    }
}

#[test]
fn bare_array_preserves_order_and_thoughts() {
    let text = r#"[
        {"thought": "first", "action": {"name": "navigate", "args": {"url": "https://docs.rs"}}},
        {"action": {"name": "wait", "args": {"duration_ms": 250}}},
        {"thought": "third", "action": {"name": "back"}}
    ]"#;
    let list = parse_response(text).unwrap();
    let thoughts: Vec<_> = list.iter().map(|a| a.thought.clone()).collect();
    assert_eq!(thoughts, vec![Some("first".into()), None, Some("third".into())]);
    assert_eq!(list.iter().nth(1).unwrap().operation, Operation::Wait { duration_ms: 250 });
}

#[test]
fn one_invalid_element_fails_the_batch() {
    let text = r#"[
        {"thought": "ok", "action": {"name": "click", "args": {"xpath": "//a"}}},
        {"thought": "broken", "action": {"name": "setValue", "args": {"xpath": "//input"}}},
        {"thought": "ok", "action": {"name": "back"}}
    ]"#;
    match parse_response(text) {
        Err(PilotError::Validation { message, element }) => {
            assert_eq!(message, "Validation error: Required at \"args.value\"");
            assert!(element.contains("broken"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn prose_only_reply_is_a_parse_error() {
    let err = parse_response("```\nno json here\n```").unwrap_err();
    assert!(matches!(err, PilotError::Parse(_)));
}

#[test]
fn classifier_defaults() {
    let onclick = ElementSnapshot::new("DIV").with_attribute("onclick", "x()");
    let plain = ElementSnapshot::new("DIV");
    let style = ComputedStyle::default();
    assert!(is_interactive(&onclick, &style));
    assert!(!is_interactive(&plain, &style));
    assert!(is_visible(&plain, &style));
    let none = ComputedStyle {
        display: "none".into(),
        ..ComputedStyle::default()
    };
    assert!(!is_visible(&plain, &none));
}

#[tokio::test]
async fn strict_and_best_effort_polling() {
    let samples = Arc::new(AtomicUsize::new(0));
    let seen = samples.clone();
    let strict = PollOptions::new(Duration::from_millis(10), 3);
    let err = wait_for(
        move || {
            seen.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, PilotError>(false) }
        },
        &strict,
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, PilotError::Timeout { checks: 3 }));
    assert_eq!(samples.load(Ordering::SeqCst), 3);

    let outcome = wait_for(|| async { Ok::<_, PilotError>(false) }, &strict.best_effort(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(outcome, PollOutcome::TimedOut);
}

#[tokio::test]
async fn element_count_settles() {
    let counts = [0u64, 5, 5, 5, 5];
    let reads = Arc::new(AtomicUsize::new(0));
    let counter = reads.clone();
    let options = StabilityOptions::new(Duration::from_millis(5), Duration::from_millis(1000));

    let outcome = wait_till_stable(
        move || {
            let i = counter.fetch_add(1, Ordering::SeqCst);
            let count = counts[i.min(counts.len() - 1)];
            async move { Ok::<_, PilotError>(count) }
        },
        &options,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert!(outcome.is_resolved());
    assert_eq!(reads.load(Ordering::SeqCst), 5);
}
