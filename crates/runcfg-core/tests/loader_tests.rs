//! Tests for document loading, inclusion and the configuration cache

use runcfg_core::{ConfigurationLoader, DocumentLoader, Error, LoaderOptions};
use runcfg_fs::NormalizedPath;
use runcfg_test_utils::fixtures;
use runcfg_test_utils::project::TestProject;
use std::sync::Arc;

mod inclusion {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_xinclude_produces_equal_model() {
        let loader = ConfigurationLoader::new(LoaderOptions::default());
        let inline = loader.load(fixtures::config("configuration.xml")).unwrap();
        let included = loader
            .load(fixtures::config("configuration_xinclude.xml"))
            .unwrap();

        assert!(!included.has_validation_errors(), "{:?}", included.validation_errors());
        assert_eq!(inline.phpunit_configuration(), included.phpunit_configuration());
        assert_eq!(inline.filter_configuration(), included.filter_configuration());
        assert_eq!(inline.group_configuration(), included.group_configuration());
        assert_eq!(
            inline.testdox_group_configuration(),
            included.testdox_group_configuration()
        );
        assert_eq!(inline.listener_configuration(), included.listener_configuration());
        assert_eq!(inline.extension_configuration(), included.extension_configuration());
        assert_eq!(inline.logging_configuration(), included.logging_configuration());
        assert_eq!(inline.php_configuration(), included.php_configuration());
        assert_eq!(
            inline.test_suite_configuration().tests(),
            included.test_suite_configuration().tests()
        );
        assert_eq!(inline.test_suite_names(), included.test_suite_names());
    }

    #[test]
    fn test_fallback_is_used_for_missing_include() {
        let loader = ConfigurationLoader::new(LoaderOptions::default());
        let config = loader
            .load(fixtures::config("configuration_fallback.xml"))
            .unwrap();
        assert_eq!(config.group_configuration().include, vec!["fallback"]);
        assert!(!config.has_validation_errors());
    }

    #[test]
    fn test_missing_include_without_fallback_is_fatal() {
        let loader = ConfigurationLoader::new(LoaderOptions::default());
        let result = loader.load(fixtures::config("configuration_missing_include.xml"));
        match result {
            Err(Error::ConfigurationNotFound { path }) => {
                assert!(path.ends_with("missing/php.xml"), "{}", path.display());
            }
            other => panic!("expected ConfigurationNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_include_cycle_is_detected() {
        let loader = ConfigurationLoader::new(LoaderOptions::default());
        let result = loader.load(fixtures::config("cycle_a.xml"));
        match result {
            Err(Error::ConfigurationCycle { chain }) => {
                assert_eq!(chain.len(), 3);
                assert!(chain[0].ends_with("cycle_a.xml"));
                assert!(chain[1].ends_with("cycle_b.xml"));
                assert!(chain[2].ends_with("cycle_a.xml"));
            }
            other => panic!("expected ConfigurationCycle, got {other:?}"),
        }
    }

    #[test]
    fn test_self_include_is_a_cycle() {
        let project = TestProject::new();
        let path = project.config(
            "phpunit.xml",
            r#"<phpunit xmlns:xi="http://www.w3.org/2001/XInclude"><xi:include href="phpunit.xml"/></phpunit>"#,
        );
        let result = DocumentLoader::new().load(&NormalizedPath::new(path));
        assert!(matches!(result, Err(Error::ConfigurationCycle { .. })));
    }

    #[test]
    fn test_same_document_included_twice_is_not_a_cycle() {
        let project = TestProject::new();
        project.config(
            "shared.xml",
            "<phpunit><groups><include><group>shared</group></include></groups></phpunit>",
        );
        let path = project.config(
            "phpunit.xml",
            r#"<phpunit xmlns:xi="http://www.w3.org/2001/XInclude">
                <groups>
                    <include>
                        <xi:include href="shared.xml" xpointer="xpointer(/phpunit/groups/include/*)"/>
                        <xi:include href="shared.xml" xpointer="xpointer(/phpunit/groups/include/*)"/>
                    </include>
                </groups>
            </phpunit>"#,
        );

        let loader = ConfigurationLoader::new(LoaderOptions::default());
        let config = loader.load(&path).unwrap();
        assert_eq!(config.group_configuration().include, vec!["shared", "shared"]);
    }

    #[test]
    fn test_nested_include_resolves_relative_to_including_document() {
        let project = TestProject::new();
        project.config(
            "config/parts/php.xml",
            r#"<php><ini name="memory_limit" value="-1"/></php>"#,
        );
        project.config(
            "config/php.xml",
            r#"<phpunit xmlns:xi="http://www.w3.org/2001/XInclude"><xi:include href="parts/php.xml"/></phpunit>"#,
        );
        let path = project.config(
            "phpunit.xml",
            r#"<phpunit xmlns:xi="http://www.w3.org/2001/XInclude">
                <xi:include href="config/php.xml" xpointer="xpointer(/phpunit/*)"/>
            </phpunit>"#,
        );

        let loader = ConfigurationLoader::new(LoaderOptions::default());
        let config = loader.load(&path).unwrap();
        assert_eq!(config.php_configuration().ini["memory_limit"], "-1");
    }

    #[test]
    fn test_declared_encoding_is_honoured() {
        let project = TestProject::new();
        let path = project.root().join("phpunit.xml");
        std::fs::write(
            &path,
            b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<phpunit><groups><include><group>caf\xe9</group></include></groups></phpunit>\n",
        )
        .unwrap();

        let loader = ConfigurationLoader::new(LoaderOptions::default());
        let config = loader.load(&path).unwrap();
        assert_eq!(config.group_configuration().include, vec!["caf\u{e9}"]);
    }

    #[test]
    fn test_undecodable_document_is_malformed_not_missing() {
        let project = TestProject::new();
        let path = project.root().join("phpunit.xml");
        std::fs::write(&path, b"<phpunit><groups><include><group>caf\xe9</group></include></groups></phpunit>")
            .unwrap();

        let result = ConfigurationLoader::new(LoaderOptions::default()).load(&path);
        assert!(
            matches!(result, Err(Error::MalformedDocument { .. })),
            "{result:?}"
        );
    }

    #[test]
    fn test_malformed_document_is_fatal() {
        let loader = ConfigurationLoader::new(LoaderOptions::default());
        let result = loader.load(fixtures::config("configuration_malformed.xml"));
        assert!(matches!(result, Err(Error::MalformedDocument { .. })));
    }
}

mod cache {
    use super::*;

    #[test]
    fn test_same_path_returns_same_instance() {
        let loader = ConfigurationLoader::new(LoaderOptions::default());
        let first = loader.load(fixtures::config("configuration.xml")).unwrap();
        let second = loader
            .load(fixtures::configs_dir().join("_files/../configuration.xml"))
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.cached(), 1);
    }

    #[test]
    fn test_clear_forces_reparse() {
        let project = TestProject::new();
        let path = project.config("phpunit.xml", r#"<phpunit colors="false"/>"#);
        let loader = ConfigurationLoader::new(LoaderOptions::default());

        let first = loader.load(&path).unwrap();
        project.config("phpunit.xml", r#"<phpunit colors="true"/>"#);
        let cached = loader.load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &cached));

        loader.clear();
        assert_eq!(loader.cached(), 0);
        let reloaded = loader.load(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &reloaded));
        assert_eq!(
            reloaded.phpunit_configuration().colors,
            runcfg_core::ColorMode::Auto
        );
        assert_eq!(first.phpunit_configuration().colors, runcfg_core::ColorMode::Never);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let loader = ConfigurationLoader::new(LoaderOptions::default());
        assert!(loader.load(fixtures::config("configuration_malformed.xml")).is_err());
        assert_eq!(loader.cached(), 0);
    }

    #[test]
    fn test_concurrent_loads_share_one_instance() {
        let loader = Arc::new(ConfigurationLoader::new(LoaderOptions::default()));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let loader = Arc::clone(&loader);
                std::thread::spawn(move || loader.load(fixtures::config("configuration.xml")).unwrap())
            })
            .collect();

        let loaded: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for config in &loaded[1..] {
            assert!(Arc::ptr_eq(&loaded[0], config));
        }
    }
}
