use proptest::prelude::*;
use runcfg_fs::NormalizedPath;

proptest! {
    #[test]
    fn test_normalization_invariants(s in "\\PC*") {
        let path = NormalizedPath::new(&s);

        // No backslashes survive normalization
        prop_assert!(!path.as_str().contains('\\'));

        // Normalizing twice is a no-op
        let again = NormalizedPath::new(path.to_native());
        prop_assert_eq!(path, again);
    }

    #[test]
    fn test_relative_paths_resolve_below_base(segment in "[a-zA-Z0-9_.-]{1,16}(/[a-zA-Z0-9_.-]{1,16}){0,3}") {
        let base = NormalizedPath::new("/project/config");
        let relative = NormalizedPath::new(&segment);
        prop_assume!(!relative.is_absolute());

        let resolved = relative.resolve_against(&base);
        prop_assert!(resolved.starts_with(&base));
        prop_assert!(resolved.as_str().ends_with(segment.as_str()));
    }

    #[test]
    fn test_absolute_paths_are_kept(segment in "[a-zA-Z0-9_-]{1,16}(/[a-zA-Z0-9_-]{1,16}){0,3}") {
        let absolute = NormalizedPath::new(format!("/{segment}"));
        let resolved = absolute.resolve_against(&NormalizedPath::new("/elsewhere"));
        prop_assert_eq!(resolved, absolute);
    }
}
