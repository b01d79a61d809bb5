use runcfg_fs::NormalizedPath;
use rstest::rstest;

#[test]
fn test_normalize_mixed_slashes() {
    let path = NormalizedPath::new("foo/bar\\baz");
    assert_eq!(path.as_str(), "foo/bar/baz");
}

#[test]
fn test_join_paths() {
    let base = NormalizedPath::new("foo/bar");
    assert_eq!(base.join("baz").as_str(), "foo/bar/baz");

    let trailing = NormalizedPath::new("foo/bar/");
    assert_eq!(trailing.join("baz").as_str(), "foo/bar/baz");
}

#[test]
fn test_parent() {
    let path = NormalizedPath::new("/etc/phpunit/phpunit.xml");
    assert_eq!(path.parent().unwrap().as_str(), "/etc/phpunit");
    assert!(NormalizedPath::new("phpunit.xml").parent().is_none());
}

#[test]
fn test_file_name() {
    assert_eq!(
        NormalizedPath::new("/tests/unit/FooTest.php").file_name(),
        Some("FooTest.php")
    );
    assert_eq!(NormalizedPath::new("/").file_name(), None);
}

#[rstest]
#[case("/path/to/lib", true)]
#[case("C:/path/to/lib", true)]
#[case("c:\\path\\to\\lib", true)]
#[case("vfs://root/tests", true)]
#[case("lib", false)]
#[case("./lib", false)]
#[case("../lib", false)]
fn test_is_absolute(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(NormalizedPath::new(input).is_absolute(), expected);
}

#[rstest]
#[case("/path/to/bootstrap.php", "/path/to/bootstrap.php")]
#[case("bootstrap.php", "/project/bootstrap.php")]
#[case("tests/../bootstrap.php", "/project/tests/../bootstrap.php")]
#[case(".", "/project/.")]
fn test_resolve_against(#[case] input: &str, #[case] expected: &str) {
    let base = NormalizedPath::new("/project");
    assert_eq!(NormalizedPath::new(input).resolve_against(&base).as_str(), expected);
}

#[test]
fn test_display_uses_forward_slashes() {
    let path = NormalizedPath::new("C:\\tmp\\report");
    assert_eq!(path.to_string(), "C:/tmp/report");
}
