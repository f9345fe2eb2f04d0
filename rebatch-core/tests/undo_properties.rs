use proptest::prelude::*;
use rebatch_core::FileRecord;
use regex::Regex;
use std::path::Path;

proptest! {
    /// N transformations followed by N undos land back on the starting name,
    /// and the trail is empty again afterwards.
    #[test]
    fn undo_reverses_every_transformation(
        name in "[a-z]{1,8}",
        subs in prop::collection::vec(("[a-z]{1,3}", "[a-z]{0,3}"), 1..8),
    ) {
        let mut record = FileRecord::new(Path::new(&format!("{name}.txt")));
        for (find, repl) in &subs {
            let regex = Regex::new(find).unwrap();
            record.apply(&regex, repl);
        }
        prop_assert_eq!(record.history_len(), subs.len());

        for _ in &subs {
            prop_assert!(record.undo());
        }
        prop_assert_eq!(record.staged_name(), name.as_str());
        prop_assert!(!record.undo());
    }

    /// A pattern that matches nothing leaves the staged name byte-identical.
    #[test]
    fn no_op_patterns_change_nothing(name in "[a-z]{1,12}") {
        let mut record = FileRecord::new(Path::new(&format!("{name}.txt")));
        let regex = Regex::new("[0-9]").unwrap();
        record.apply(&regex, "x");
        prop_assert_eq!(record.staged_name(), name.as_str());
    }
}
