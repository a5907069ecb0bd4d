use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

fn counter() -> (Arc<AtomicUsize>, impl Fn(&u32) + Send + Sync + 'static) {
    let hits = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&hits);
    (hits, move |_: &u32| {
        sink.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn emit_reaches_every_listener() {
    let set = ListenerSet::<u32>::new();
    let (a, fa) = counter();
    let (b, fb) = counter();
    let _sa = set.subscribe(fa);
    let _sb = set.subscribe(fb);

    set.emit(&1);
    set.emit(&2);

    assert_eq!(a.load(Ordering::SeqCst), 2);
    assert_eq!(b.load(Ordering::SeqCst), 2);
}

#[test]
fn emit_preserves_registration_order() {
    let set = ListenerSet::<u32>::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let first = Arc::clone(&seen);
    let second = Arc::clone(&seen);
    let _s1 = set.subscribe(move |v| first.lock().unwrap().push(("first", *v)));
    let _s2 = set.subscribe(move |v| second.lock().unwrap().push(("second", *v)));

    set.emit(&7);

    assert_eq!(*seen.lock().unwrap(), vec![("first", 7), ("second", 7)]);
}

#[test]
fn unsubscribe_stops_delivery() {
    let set = ListenerSet::<u32>::new();
    let (hits, f) = counter();
    let sub = set.subscribe(f);
    set.emit(&1);
    sub.unsubscribe();
    set.emit(&2);

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(set.is_empty());
}

#[test]
fn drop_releases_subscription() {
    let set = ListenerSet::<u32>::new();
    let (hits, f) = counter();
    {
        let _sub = set.subscribe(f);
        assert_eq!(set.len(), 1);
    }
    set.emit(&1);

    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(set.len(), 0);
}

#[test]
fn unsubscribe_only_removes_its_own_listener() {
    let set = ListenerSet::<u32>::new();
    let (a, fa) = counter();
    let (b, fb) = counter();
    let sa = set.subscribe(fa);
    let _sb = set.subscribe(fb);
    sa.unsubscribe();
    set.emit(&1);

    assert_eq!(a.load(Ordering::SeqCst), 0);
    assert_eq!(b.load(Ordering::SeqCst), 1);
}

#[test]
fn subscription_release_runs_once() {
    let runs = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&runs);
    let sub = Subscription::new(move || {
        sink.fetch_add(1, Ordering::SeqCst);
    });
    assert!(sub.is_active());
    sub.unsubscribe();

    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn subscription_outliving_set_is_harmless() {
    let set = ListenerSet::<u32>::new();
    let (_, f) = counter();
    let sub = set.subscribe(f);
    drop(set);
    sub.unsubscribe();
}

#[test]
fn listener_may_unsubscribe_others_during_emit() {
    let set = Arc::new(ListenerSet::<u32>::new());
    let (hits, f) = counter();
    let victim = Arc::new(Mutex::new(Some(set.subscribe(f))));
    let handle = Arc::clone(&victim);
    let _killer = set.subscribe(move |_| {
        if let Some(sub) = handle.lock().unwrap().take() {
            sub.unsubscribe();
        }
    });

    set.emit(&1);
    set.emit(&2);

    // The victim still saw the first emit (snapshot taken before the killer ran).
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
