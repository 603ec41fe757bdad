//! Integration tests for generation sessions

use fabula_foundation::ErrorKind;
use fabula_runtime::{Session, SessionConfig};

use crate::{GREETING, greeting_session};

#[test]
fn locked_seed_repeats_every_run() {
    let mut session = greeting_session(11);
    let first = session.generate().unwrap();
    let second = session.generate().unwrap();
    assert_eq!(first, second);
    assert_eq!(session.seed(), 11);
}

#[test]
fn sessions_with_the_same_seed_agree() {
    let mut a = greeting_session(5);
    let mut b = greeting_session(5);
    a.set_count(4).unwrap();
    b.set_count(4).unwrap();
    assert_eq!(a.generate().unwrap(), b.generate().unwrap());
}

#[test]
fn bindings_hold_within_each_text() {
    let mut session = greeting_session(8);
    session.set_count(6).unwrap();
    for text in session.generate().unwrap() {
        let (head, tail) = text.split_once("! Nice to meet you, ").unwrap();
        let name = head.rsplit(", ").next().unwrap();
        assert_eq!(tail, format!("{name}."));
    }
}

#[test]
fn unlocked_sessions_draw_new_seeds() {
    let mut session = Session::new().unwrap();
    session.load_str(GREETING).unwrap();
    assert!(!session.is_seed_locked());
    session.generate().unwrap();
    assert!(session.seed() < 10_000_000);
}

#[test]
fn reroll_releases_the_lock() {
    let mut session = greeting_session(3);
    session.reroll().unwrap();
    assert!(!session.is_seed_locked());
}

#[test]
fn zero_count_is_rejected() {
    let mut session = greeting_session(3);
    let err = session.set_count(0).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidSetting { .. }));
    assert!(Session::with_config(SessionConfig::new().with_count(0)).is_err());
}

#[test]
fn stepping_reaches_the_generated_text() {
    let mut expected = greeting_session(21);
    let expected = expected.generate().unwrap();

    let mut session = greeting_session(21);
    session.start_stepping().unwrap();
    while session.step().unwrap().is_some() {}
    assert_eq!(session.texts(), expected);
}

#[test]
fn stop_stepping_discards_the_tree() {
    let mut session = greeting_session(21);
    session.start_stepping().unwrap();
    assert!(session.stepping().is_some());
    session.stop_stepping();
    assert!(session.stepping().is_none());
}

#[test]
fn standard_modifiers_are_available() {
    let mut session = greeting_session(1);
    let tree = session.expand("#greeting.uppercase#").unwrap();
    assert!(tree.is_clean());
    assert_eq!(tree.finished_text(), tree.finished_text().to_uppercase());
}
