//! Tests for change events, diffing and dispatch.

use std::collections::BTreeMap;
use std::sync::Mutex;

use super::*;

fn entries(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

mod change_kind {
    use super::*;

    #[test]
    fn display_is_lower_case() {
        assert_eq!(ChangeKind::Add.to_string(), "add");
        assert_eq!(ChangeKind::Update.to_string(), "update");
        assert_eq!(ChangeKind::Delete.to_string(), "delete");
    }
}

mod config_change {
    use super::*;

    #[test]
    fn helpers_set_kind() {
        assert_eq!(ConfigChange::add("ns", "k", "v").kind, ChangeKind::Add);
        assert_eq!(ConfigChange::update("ns", "k", "v").kind, ChangeKind::Update);
        assert_eq!(ConfigChange::delete("ns", "k", "v").kind, ChangeKind::Delete);
    }

    #[test]
    fn display_shows_all_fields() {
        let change = ConfigChange::update("application", "timeout", "30");
        assert_eq!(change.to_string(), "update application/timeout = 30");
    }
}

mod diff_fn {
    use super::*;

    #[test]
    fn delete_update_then_add() {
        let old = entries(&[("a", "1"), ("b", "2")]);
        let new = entries(&[("b", "3"), ("c", "4")]);

        let changes = diff("application", Some(&old), Some(&new));

        assert_eq!(
            changes,
            vec![
                ConfigChange::delete("application", "a", "1"),
                ConfigChange::update("application", "b", "3"),
                ConfigChange::add("application", "c", "4"),
            ]
        );
    }

    #[test]
    fn additions_come_after_all_old_side_events() {
        // "a" sorts before "z", but adds still follow the update of "z"
        let old = entries(&[("z", "1")]);
        let new = entries(&[("a", "new"), ("z", "2")]);

        let changes = diff("ns", Some(&old), Some(&new));

        assert_eq!(changes[0], ConfigChange::update("ns", "z", "2"));
        assert_eq!(changes[1], ConfigChange::add("ns", "a", "new"));
    }

    #[test]
    fn identical_maps_produce_nothing() {
        let same = entries(&[("a", "1"), ("b", "2")]);
        assert!(diff("ns", Some(&same), Some(&same)).is_empty());
    }

    #[test]
    fn missing_old_means_everything_added() {
        let new = entries(&[("a", "1"), ("b", "2")]);
        let changes = diff("ns", None, Some(&new));

        assert_eq!(changes.len(), 2);
        assert!(changes.iter().all(|c| c.kind == ChangeKind::Add));
    }

    #[test]
    fn missing_new_means_everything_deleted() {
        let old = entries(&[("a", "1")]);
        let changes = diff("ns", Some(&old), None);

        assert_eq!(changes, vec![ConfigChange::delete("ns", "a", "1")]);
    }

    #[test]
    fn both_missing_is_empty() {
        assert!(diff("ns", None, None).is_empty());
    }

    #[test]
    fn empty_string_value_is_a_value() {
        let old = entries(&[("a", "")]);
        let new = entries(&[("a", "x")]);

        assert_eq!(
            diff("ns", Some(&old), Some(&new)),
            vec![ConfigChange::update("ns", "a", "x")]
        );
    }

    #[test]
    fn events_carry_namespace() {
        let new = entries(&[("a", "1")]);
        let changes = diff("database", None, Some(&new));

        assert_eq!(changes[0].namespace, "database");
    }
}

mod dispatch_fn {
    use super::*;

    #[test]
    fn delivers_in_order() {
        let seen = Mutex::new(Vec::new());
        let listener = |c: &ConfigChange| seen.lock().unwrap().push(c.key.clone());
        let changes = vec![
            ConfigChange::delete("ns", "a", "1"),
            ConfigChange::add("ns", "b", "2"),
        ];

        let delivered = dispatch(&listener, &changes);

        assert_eq!(delivered, 2);
        assert_eq!(*seen.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn panicking_listener_does_not_stop_dispatch() {
        let seen = Mutex::new(Vec::new());
        let listener = |c: &ConfigChange| {
            assert!(c.key != "boom", "listener failure");
            seen.lock().unwrap().push(c.key.clone());
        };
        let changes = vec![
            ConfigChange::add("ns", "before", "1"),
            ConfigChange::add("ns", "boom", "2"),
            ConfigChange::add("ns", "after", "3"),
        ];

        let delivered = dispatch(&listener, &changes);

        assert_eq!(delivered, 2);
        assert_eq!(*seen.lock().unwrap(), vec!["before", "after"]);
    }

    #[test]
    fn empty_changes_never_call_listener() {
        let calls = Mutex::new(0);
        let listener = |_: &ConfigChange| *calls.lock().unwrap() += 1;

        assert_eq!(dispatch(&listener, &[]), 0);
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn struct_listeners_work() {
        struct Counter(Mutex<usize>);

        impl ChangeListener for Counter {
            fn on_change(&self, _change: &ConfigChange) {
                *self.0.lock().unwrap() += 1;
            }
        }

        let counter = Counter(Mutex::new(0));
        dispatch(&counter, &[ConfigChange::add("ns", "k", "v")]);

        assert_eq!(*counter.0.lock().unwrap(), 1);
    }
}
