use super::*;
use crate::session::Session;
use uuid::Uuid;

#[test]
fn new_store_starts_bootstrapping() {
    let store = SessionStore::new();
    assert_eq!(store.get(), AuthState::bootstrapping());
}

#[test]
fn set_replaces_state() {
    let store = SessionStore::new();
    let session = Session::new(Uuid::new_v4(), "a@b.com");
    store.set(AuthState::resolved(Some(session.clone())));

    let state = store.get();
    assert!(!state.loading);
    assert_eq!(state.session, Some(session));
}

#[test]
fn clones_share_state() {
    let store = SessionStore::new();
    let other = store.clone();
    other.set(AuthState::signed_out());
    assert_eq!(store.get(), AuthState::signed_out());
}

#[test]
fn subscribers_see_every_set_in_order() {
    let store = SessionStore::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _sub = store.subscribe(move |state| sink.lock().unwrap().push(state.loading));

    store.set(AuthState::bootstrapping());
    store.set(AuthState::signed_out());
    store.set(AuthState::signed_out());

    assert_eq!(*seen.lock().unwrap(), vec![true, false, false]);
}

#[test]
fn listener_can_read_store_during_notification() {
    let store = SessionStore::new();
    let reader = store.clone();
    let seen = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    let _sub = store.subscribe(move |_| *sink.lock().unwrap() = Some(reader.get()));

    store.set(AuthState::signed_out());

    assert_eq!(*seen.lock().unwrap(), Some(AuthState::signed_out()));
}

#[test]
fn unsubscribed_listener_is_not_called() {
    let store = SessionStore::new();
    let seen = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&seen);
    let sub = store.subscribe(move |_| *sink.lock().unwrap() += 1);
    assert_eq!(store.subscriber_count(), 1);

    sub.unsubscribe();
    store.set(AuthState::signed_out());

    assert_eq!(*seen.lock().unwrap(), 0);
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn concurrent_writers_notify_in_write_order() {
    let store = SessionStore::new();
    let last_seen = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&last_seen);
    let _sub = store.subscribe(move |state| *sink.lock().unwrap() = Some(state.clone()));

    let writers: Vec<_> = (0..8)
        .map(|t| {
            let store = store.clone();
            std::thread::spawn(move || {
                for i in 0..200 {
                    let session = Session::new(Uuid::new_v4(), format!("w{t}-{i}@b.com"));
                    store.set(AuthState::resolved(Some(session)));
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    // The final notification carries the final write.
    assert_eq!(last_seen.lock().unwrap().clone(), Some(store.get()));
}
