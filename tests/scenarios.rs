//! End-to-end typewriter timelines on a virtual clock.

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use spark_signals::effect;
use spark_typewriter::{
    Phase, Rect, SpeedRange, TimerQueue, Typewriter, TypewriterProps,
};

/// Step the queue deadline by deadline, recording (time, displayed) on every
/// change of the displayed text.
fn timeline(queue: &TimerQueue, tw: &Typewriter, until: u64) -> Vec<(u64, String)> {
    let mut out = vec![(queue.now(), tw.displayed())];
    while let Some(deadline) = queue.next_deadline() {
        if deadline > until {
            break;
        }
        queue.advance_to(deadline);
        let shown = tw.displayed();
        if out.last().map(|(_, s)| s) != Some(&shown) {
            out.push((queue.now(), shown));
        }
    }
    out
}

fn completions() -> (Rc<RefCell<Vec<(String, usize)>>>, spark_typewriter::SentenceCallback) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let log_clone = log.clone();
    let callback: spark_typewriter::SentenceCallback = Rc::new(move |sentence: &str, index: usize| {
        log_clone.borrow_mut().push((sentence.to_string(), index));
    });
    (log, callback)
}

#[test]
fn test_hi_yo_loop_sequence() {
    let queue = TimerQueue::new();
    let tw = Typewriter::mount(
        TypewriterProps {
            text: vec!["Hi", "Yo"].into(),
            typing_speed: 10,
            pause_duration: 5,
            deleting_speed: 5,
            loop_text: true,
            ..Default::default()
        },
        &queue,
    );

    let steps = timeline(&queue, &tw, 100);
    let expected: Vec<(u64, String)> = [
        (0, ""),
        (10, "H"),
        (20, "Hi"),
        // pause 5, then delete every 5
        (30, "H"),
        (35, ""),
        // pause 5, then type every 10
        (50, "Y"),
        (60, "Yo"),
        (70, "Y"),
        (75, ""),
        (90, "H"),
        (100, "Hi"),
    ]
    .into_iter()
    .map(|(t, s)| (t, s.to_string()))
    .collect();
    assert_eq!(steps, expected);
}

#[test]
fn test_content_signal_effect_sees_every_value() {
    let queue = TimerQueue::new();
    let tw = Typewriter::mount(
        TypewriterProps {
            text: vec!["ab", "c"].into(),
            typing_speed: 1,
            deleting_speed: 1,
            pause_duration: 1,
            ..Default::default()
        },
        &queue,
    );

    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = seen.clone();
    let content = tw.content();
    let _stop = effect(move || {
        let value = content.get();
        let mut seen = seen_clone.borrow_mut();
        if seen.last() != Some(&value) {
            seen.push(value);
        }
    });

    queue.advance(1_000);
    assert_eq!(
        *seen.borrow(),
        vec!["", "a", "ab", "a", "", "c", ""]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_single_sentence_static_after_completion() {
    let queue = TimerQueue::new();
    let (log, callback) = completions();
    let tw = Typewriter::mount(
        TypewriterProps {
            text: "Done!".into(),
            typing_speed: 7,
            on_sentence_complete: Some(callback),
            ..Default::default()
        },
        &queue,
    );

    queue.advance(35);
    assert_eq!(tw.displayed(), "Done!");
    assert_eq!(*log.borrow(), vec![("Done!".to_string(), 0)]);
    assert_eq!(tw.phase(), Phase::Done);
    assert_eq!(queue.pending(), 0);

    queue.advance(1_000_000);
    assert_eq!(tw.displayed(), "Done!");
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn test_multi_sentence_without_loop_ends_empty() {
    let queue = TimerQueue::new();
    let (log, callback) = completions();
    let tw = Typewriter::mount(
        TypewriterProps {
            text: vec!["one", "two"].into(),
            typing_speed: 2,
            deleting_speed: 1,
            pause_duration: 3,
            on_sentence_complete: Some(callback),
            ..Default::default()
        },
        &queue,
    );

    queue.advance(10_000);
    assert_eq!(tw.displayed(), "");
    assert_eq!(tw.phase(), Phase::Done);
    assert_eq!(queue.pending(), 0);
    assert!(!tw.has_pending_tick());
    assert_eq!(*log.borrow(), vec![("one".to_string(), 0)]);
    assert_eq!(tw.state().sentence_index, 1);
}

#[test]
fn test_loop_cycles_and_calls_back_once_per_cycle() {
    let queue = TimerQueue::new();
    let (log, callback) = completions();
    let _tw = Typewriter::mount(
        TypewriterProps {
            text: vec!["a", "bb", "ccc"].into(),
            typing_speed: 1,
            deleting_speed: 1,
            pause_duration: 1,
            loop_text: true,
            on_sentence_complete: Some(callback),
            ..Default::default()
        },
        &queue,
    );

    queue.advance(500);
    let log = log.borrow();
    assert!(log.len() >= 9);
    for (n, (sentence, index)) in log.iter().enumerate() {
        assert_eq!(*index, n % 3);
        assert_eq!(sentence, ["a", "bb", "ccc"][n % 3]);
    }
}

#[test]
fn test_start_on_visible_never_intersecting() {
    let queue = TimerQueue::new();
    let tw = Typewriter::mount(
        TypewriterProps {
            text: "hidden".into(),
            start_on_visible: true,
            ..Default::default()
        },
        &queue,
    );
    let viewport = Rect::new(0, 0, 80, 24);

    for step in 0..50 {
        assert!(!tw.observe_visibility(&Rect::new(0, 30 + step, 80, 1), &viewport));
        assert_eq!(queue.advance(1_000), 0);
    }
    assert_eq!(tw.displayed(), "");
    assert_eq!(tw.phase(), Phase::Idle);
    assert!(!tw.armed().get());
}

#[test]
fn test_start_on_visible_arms_once_when_scrolled_in() {
    let queue = TimerQueue::new();
    let tw = Typewriter::mount(
        TypewriterProps {
            text: "go".into(),
            typing_speed: 10,
            initial_delay: 100,
            start_on_visible: true,
            ..Default::default()
        },
        &queue,
    );
    let viewport = Rect::new(0, 0, 80, 24);

    queue.advance(500);
    assert_eq!(queue.pending(), 0);

    assert!(tw.observe_visibility(&Rect::new(0, 23, 80, 1), &viewport));
    assert!(tw.armed().get());
    // Scrolling out again changes nothing.
    assert!(!tw.observe_visibility(&Rect::new(0, 90, 80, 1), &viewport));

    // Initial delay counts from arming.
    queue.advance(109);
    assert_eq!(tw.displayed(), "");
    queue.advance(1);
    assert_eq!(tw.displayed(), "g");
    queue.advance(10);
    assert_eq!(tw.displayed(), "go");
}

#[test]
fn test_variable_speed_min_equals_max_is_fixed() {
    let queue = TimerQueue::new();
    let tw = Typewriter::mount(
        TypewriterProps {
            text: "abcd".into(),
            typing_speed: 999,
            variable_speed: Some(SpeedRange { min: 10, max: 10 }),
            ..Default::default()
        },
        &queue,
    );

    let steps = timeline(&queue, &tw, 1_000);
    let times: Vec<u64> = steps.iter().map(|(t, _)| *t).collect();
    assert_eq!(times, vec![0, 10, 20, 30, 40]);
}

#[test]
fn test_variable_speed_draws_per_character() {
    let queue = TimerQueue::new();
    let tw = Typewriter::mount(
        TypewriterProps {
            text: "abcdefghijklmnopqrstuvwxyz".into(),
            variable_speed: Some(SpeedRange { min: 5, max: 50 }),
            seed: Some(1234),
            ..Default::default()
        },
        &queue,
    );

    let steps = timeline(&queue, &tw, 100_000);
    let gaps: Vec<u64> = steps.windows(2).map(|w| w[1].0 - w[0].0).collect();
    assert_eq!(gaps.len(), 26);
    assert!(gaps.iter().all(|g| (5..=50).contains(g)));
    // A fresh draw per character, not one per sentence.
    assert!(gaps.iter().any(|g| *g != gaps[0]));
}

#[test]
fn test_reverse_mode_displays_reversed_prefixes() {
    let queue = TimerQueue::new();
    let tw = Typewriter::mount(
        TypewriterProps {
            text: "abc".into(),
            typing_speed: 1,
            reverse_mode: true,
            ..Default::default()
        },
        &queue,
    );

    let shown: Vec<String> = timeline(&queue, &tw, 100).into_iter().map(|(_, s)| s).collect();
    assert_eq!(shown, vec!["", "c", "cb", "cba"]);
}

#[test]
fn test_unmount_mid_sentence_stops_everything() {
    let queue = TimerQueue::new();
    let (log, callback) = completions();
    let tw = Typewriter::mount(
        TypewriterProps {
            text: vec!["abc", "def"].into(),
            typing_speed: 10,
            loop_text: true,
            on_sentence_complete: Some(callback),
            ..Default::default()
        },
        &queue,
    );
    let content = tw.content();

    queue.advance(15);
    assert_eq!(content.get(), "a");
    drop(tw);

    assert_eq!(queue.pending(), 0);
    queue.advance(100_000);
    assert_eq!(content.get(), "a");
    assert!(log.borrow().is_empty());
}

#[test]
fn test_instances_share_queue_not_state() {
    let queue = TimerQueue::new();
    let fast = Typewriter::mount(
        TypewriterProps { text: "fast".into(), typing_speed: 1, ..Default::default() },
        &queue,
    );
    let slow = Typewriter::mount(
        TypewriterProps { text: "slow".into(), typing_speed: 10, ..Default::default() },
        &queue,
    );

    queue.advance(4);
    assert_eq!(fast.displayed(), "fast");
    assert_eq!(slow.displayed(), "");

    fast.teardown();
    queue.advance(40);
    assert_eq!(slow.displayed(), "slow");
}

#[test]
fn test_zero_delays_step_once_per_advance() {
    let queue = TimerQueue::new();
    let (log, callback) = completions();
    let tw = Typewriter::mount(
        TypewriterProps {
            text: vec!["a", "b"].into(),
            typing_speed: 0,
            deleting_speed: 0,
            pause_duration: 0,
            loop_text: true,
            on_sentence_complete: Some(callback),
            ..Default::default()
        },
        &queue,
    );

    // reveal, start deleting, erase + finish, resume: four ticks per sentence
    for _ in 0..40 {
        assert_eq!(queue.advance(1), 1);
        assert_eq!(queue.pending(), 1);
    }
    let log = log.borrow();
    assert_eq!(log.len(), 10);
    for (n, (sentence, index)) in log.iter().enumerate() {
        assert_eq!(*index, n % 2);
        assert_eq!(sentence, ["a", "b"][n % 2]);
    }
    assert!(tw.has_pending_tick());
}
