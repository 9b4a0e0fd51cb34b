//! Integration tests for the debounced button state machine

mod common;
use common::*;

use foxie_clock::button::{Button, ButtonBank, ButtonConfig, ButtonError, ButtonEvent};
use foxie_clock::ButtonEventKind::{self, Press, Release, Repeat};
use foxie_clock::TimeSource;
use heapless::Deque;

/// Polls `button` every `step` ms for `duration` ms and collects the events
/// with their timestamps.
fn run(
    button: &mut Button,
    pins: &MockPins,
    timer: &MockTimeSource,
    duration: u32,
    step: u32,
) -> heapless::Vec<(u32, ButtonEventKind), 32> {
    let mut events = heapless::Vec::new();
    let mut elapsed = 0;
    while elapsed < duration {
        if let Some(kind) = button.update(pins, timer) {
            events.push((timer.millis(), kind)).unwrap();
        }
        timer.advance(step);
        elapsed += step;
    }
    events
}

#[test]
fn press_fires_after_debounce() {
    let pins = MockPins::new();
    let timer = MockTimeSource::new();
    let mut button = Button::single(0, ButtonConfig::new());

    pins.press(0);
    let events = run(&mut button, &pins, &timer, 50, 5);
    assert_eq!(events.as_slice(), &[(10, Press)]);
    assert!(button.is_pressed());

    pins.release(0);
    let events = run(&mut button, &pins, &timer, 50, 5);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].1, Release);
    assert!(!button.is_pressed());
}

#[test]
fn bounce_shorter_than_debounce_is_ignored() {
    let pins = MockPins::new();
    let timer = MockTimeSource::new();
    let mut button = Button::single(0, ButtonConfig::new());

    pins.press(0);
    assert_eq!(button.update(&pins, &timer), None);
    timer.advance(4);
    pins.release(0);
    assert_eq!(button.update(&pins, &timer), None);
    timer.advance(6);
    // Window over, reading matches the committed (released) state again.
    assert_eq!(button.update(&pins, &timer), None);

    let events = run(&mut button, &pins, &timer, 100, 5);
    assert!(events.is_empty());
    assert!(!button.is_pressed());
}

#[test]
fn press_delay_fires_after_grace_period() {
    let pins = MockPins::new();
    let timer = MockTimeSource::new();
    let mut button = Button::single(0, ButtonConfig::new().delay_before_press_ms(120));

    pins.press(0);
    let events = run(&mut button, &pins, &timer, 300, 10);
    // Committed at 10, press reported 120 ms later.
    assert_eq!(events.as_slice(), &[(130, Press)]);
}

#[test]
fn release_within_grace_period_emits_nothing() {
    let pins = MockPins::new();
    let timer = MockTimeSource::new();
    let mut button = Button::single(0, ButtonConfig::new().delay_before_press_ms(120));

    pins.press(0);
    let events = run(&mut button, &pins, &timer, 80, 10);
    assert!(events.is_empty());

    pins.release(0);
    let events = run(&mut button, &pins, &timer, 200, 10);
    assert!(events.is_empty());
}

#[test]
fn repeat_follows_initial_delay_then_rate() {
    let pins = MockPins::new();
    let timer = MockTimeSource::new();
    let mut button = Button::single(0, ButtonConfig::new().repeat(true));

    pins.press(0);
    let events = run(&mut button, &pins, &timer, 1000, 10);
    assert_eq!(
        events.as_slice(),
        &[(10, Press), (510, Repeat), (710, Repeat), (910, Repeat)]
    );
}

#[test]
fn no_repeat_without_can_repeat() {
    let pins = MockPins::new();
    let timer = MockTimeSource::new();
    let mut button = Button::single(0, ButtonConfig::new());

    pins.press(0);
    let events = run(&mut button, &pins, &timer, 2000, 10);
    assert_eq!(events.len(), 1);
}

#[test]
fn combination_needs_every_pin() {
    let pins = MockPins::new();
    let timer = MockTimeSource::new();
    let mut combo = Button::new(&[0, 1], ButtonConfig::new()).unwrap();

    pins.press(0);
    assert!(run(&mut combo, &pins, &timer, 50, 5).is_empty());

    pins.press(1);
    let events = run(&mut combo, &pins, &timer, 50, 5);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].1, Press);
}

#[test]
fn disabling_suppresses_release() {
    let pins = MockPins::new();
    let timer = MockTimeSource::new();
    let mut button = Button::single(0, ButtonConfig::new());

    pins.press(0);
    assert_eq!(run(&mut button, &pins, &timer, 20, 5).len(), 1);

    button.set_enabled(false);
    assert!(!button.is_pressed());
    pins.release(0);
    assert!(run(&mut button, &pins, &timer, 50, 5).is_empty());
}

#[test]
fn reenabled_button_waits_for_release() {
    let pins = MockPins::new();
    let timer = MockTimeSource::new();
    let mut button = Button::single(0, ButtonConfig::new());

    pins.press(0);
    run(&mut button, &pins, &timer, 20, 5);
    button.set_enabled(false);
    button.set_enabled(true);

    // Still held: nothing fires.
    assert!(run(&mut button, &pins, &timer, 100, 5).is_empty());

    pins.release(0);
    assert!(run(&mut button, &pins, &timer, 50, 5).is_empty());

    pins.press(0);
    let events = run(&mut button, &pins, &timer, 50, 5);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].1, Press);
}

#[test]
fn new_rejects_bad_pin_lists() {
    assert!(matches!(
        Button::new(&[], ButtonConfig::new()),
        Err(ButtonError::NoPins)
    ));
    assert!(matches!(
        Button::new(&[0, 1, 2, 3, 4], ButtonConfig::new()),
        Err(ButtonError::TooManyPins)
    ));
}

#[test]
fn single_behaves_like_one_pin_list() {
    let pins = MockPins::new();
    let timer = MockTimeSource::new();
    let config = ButtonConfig::new().delay_before_press_ms(120).repeat(true);
    let mut single = Button::single(2, config);
    let mut listed = Button::new(&[2], config).unwrap();
    assert_eq!(single.pins(), listed.pins());

    pins.press(2);
    let a = run(&mut single, &pins, &timer, 1000, 10);
    timer.set_time(0);
    let b = run(&mut listed, &pins, &timer, 1000, 10);
    assert_eq!(a, b);
    assert!(a.len() > 1);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Id {
    A,
    B,
    AB,
}

fn bank() -> ButtonBank<Id, 3> {
    let mut bank = ButtonBank::new();
    let single = ButtonConfig::new().delay_before_press_ms(120);
    bank.add(Id::A, Button::single(0, single)).unwrap();
    bank.add(Id::B, Button::single(1, single)).unwrap();
    bank.add(
        Id::AB,
        Button::new(&[0, 1], ButtonConfig::new().delay_before_press_ms(60)).unwrap(),
    )
    .unwrap();
    bank
}

#[test]
fn bank_rejects_duplicates_and_overflow() {
    let mut bank = bank();
    assert_eq!(
        bank.add(Id::A, Button::single(5, ButtonConfig::new())),
        Err(ButtonError::DuplicateId)
    );

    let mut small: ButtonBank<Id, 1> = ButtonBank::new();
    small.add(Id::A, Button::single(0, ButtonConfig::new())).unwrap();
    assert_eq!(
        small.add(Id::B, Button::single(1, ButtonConfig::new())),
        Err(ButtonError::BankFull)
    );
}

#[test]
fn bank_lists_subsets() {
    let bank = bank();
    let subsets: heapless::Vec<Id, 3> = bank.subsets_of(Id::AB).collect();
    assert_eq!(subsets.as_slice(), &[Id::A, Id::B]);
    assert_eq!(bank.subsets_of(Id::A).count(), 0);
}

#[test]
fn combination_press_beats_single_grace_period() {
    let pins = MockPins::new();
    let timer = MockTimeSource::new();
    let mut bank = bank();
    let mut queue: Deque<ButtonEvent<Id>, 8> = Deque::new();
    let mut seen: heapless::Vec<ButtonEvent<Id>, 16> = heapless::Vec::new();

    pins.press(0);
    pins.press(1);
    for _ in 0..40 {
        assert_eq!(bank.poll(&pins, &timer, &mut queue), 0);
        while let Some(event) = queue.pop_front() {
            if event.button == Id::AB {
                match event.kind {
                    Press => bank.set_subsets_enabled(Id::AB, false),
                    Release => bank.set_subsets_enabled(Id::AB, true),
                    Repeat => {}
                }
            }
            seen.push(event).unwrap();
        }
        timer.advance(10);
    }

    pins.release_all();
    for _ in 0..10 {
        bank.poll(&pins, &timer, &mut queue);
        while let Some(event) = queue.pop_front() {
            if event.button == Id::AB && event.kind == Release {
                bank.set_subsets_enabled(Id::AB, true);
            }
            seen.push(event).unwrap();
        }
        timer.advance(10);
    }

    assert_eq!(
        seen.as_slice(),
        &[
            ButtonEvent { button: Id::AB, kind: Press },
            ButtonEvent { button: Id::AB, kind: Release },
        ]
    );
    assert!(bank.get(Id::A).unwrap().is_enabled());
    assert!(bank.get(Id::B).unwrap().is_enabled());
}

#[test]
fn bank_poll_reports_dropped_events() {
    let pins = MockPins::new();
    let timer = MockTimeSource::new();
    let mut bank: ButtonBank<Id, 3> = ButtonBank::new();
    bank.add(Id::A, Button::single(0, ButtonConfig::new())).unwrap();
    bank.add(Id::B, Button::single(1, ButtonConfig::new())).unwrap();
    let mut queue: Deque<ButtonEvent<Id>, 1> = Deque::new();

    pins.press(0);
    pins.press(1);
    bank.poll(&pins, &timer, &mut queue);
    timer.advance(10);
    assert_eq!(bank.poll(&pins, &timer, &mut queue), 1);
    assert_eq!(queue.len(), 1);
}
