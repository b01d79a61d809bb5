//! Root options declared as attributes of `<phpunit>`

use super::{bool_attribute, integer_attribute, parse_integer};
use crate::config::ParseContext;
use crate::document::Element;
use runcfg_fs::NormalizedPath;
use serde::{Serialize, Serializer};

/// Printer selected by `testdox="true"` when no printer class is declared.
pub const TESTDOX_PRINTER_CLASS: &str = "PHPUnit\\Util\\TestDox\\CliTestDoxPrinter";

/// Tokens accepted in the comma-separated `executionOrder` attribute.
pub const EXECUTION_ORDER_TOKENS: &[&str] = &[
    "default",
    "defects",
    "depends",
    "no-depends",
    "random",
    "reverse",
    "size",
    "duration",
];

const DEFAULT_COLUMNS: u16 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Never,
    Auto,
}

/// Width of the progress output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Columns {
    Fixed(u16),
    /// Use the full terminal width
    Max,
}

impl Default for Columns {
    fn default() -> Self {
        Self::Fixed(DEFAULT_COLUMNS)
    }
}

impl Serialize for Columns {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Fixed(columns) => serializer.serialize_u16(*columns),
            Self::Max => serializer.serialize_str("max"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionOrder {
    #[default]
    Default,
    Random,
    Reverse,
    Size,
    Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefectsOrder {
    #[default]
    Default,
    DefectsFirst,
}

/// Typed root options. Every field has a default that applies when the
/// attribute is absent or its value cannot be coerced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhpUnitOptions {
    pub backup_globals: bool,
    pub backup_static_attributes: bool,
    pub be_strict_about_changes_to_global_state: bool,
    pub be_strict_about_covers_annotation: bool,
    pub be_strict_about_output_during_tests: bool,
    pub be_strict_about_resource_usage_during_small_tests: bool,
    pub be_strict_about_tests_that_do_not_test_anything: bool,
    pub be_strict_about_todo_annotated_tests: bool,
    pub cache_result: bool,
    pub cache_tokens: bool,
    pub colors: ColorMode,
    pub columns: Columns,
    pub convert_deprecations_to_exceptions: bool,
    pub convert_errors_to_exceptions: bool,
    pub convert_notices_to_exceptions: bool,
    pub convert_warnings_to_exceptions: bool,
    pub disable_code_coverage_ignore: bool,
    pub enforce_time_limit: bool,
    pub fail_on_risky: bool,
    pub fail_on_warning: bool,
    pub force_covers_annotation: bool,
    pub ignore_deprecated_code_units_from_code_coverage: bool,
    pub no_interaction: bool,
    pub process_isolation: bool,
    pub register_mock_objects_from_test_arguments_recursively: bool,
    pub reverse_defect_list: bool,
    pub stderr: bool,
    pub stop_on_defect: bool,
    pub stop_on_error: bool,
    pub stop_on_failure: bool,
    pub stop_on_incomplete: bool,
    pub stop_on_risky: bool,
    pub stop_on_skipped: bool,
    pub stop_on_warning: bool,
    pub testdox: bool,
    pub verbose: bool,

    pub default_time_limit: u32,
    pub timeout_for_small_tests: u32,
    pub timeout_for_medium_tests: u32,
    pub timeout_for_large_tests: u32,

    pub execution_order: ExecutionOrder,
    pub execution_order_defects: DefectsOrder,
    pub resolve_dependencies: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap: Option<NormalizedPath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_result_file: Option<NormalizedPath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions_directory: Option<NormalizedPath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub printer_file: Option<NormalizedPath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_suite_loader_file: Option<NormalizedPath>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub printer_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_suite_loader_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_test_suite: Option<String>,

    /// Both `testdox="true"` and an explicit `printerClass` were declared
    pub conflict_between_printer_class_and_testdox: bool,
}

impl Default for PhpUnitOptions {
    fn default() -> Self {
        Self {
            backup_globals: false,
            backup_static_attributes: false,
            be_strict_about_changes_to_global_state: false,
            be_strict_about_covers_annotation: false,
            be_strict_about_output_during_tests: false,
            be_strict_about_resource_usage_during_small_tests: false,
            be_strict_about_tests_that_do_not_test_anything: true,
            be_strict_about_todo_annotated_tests: false,
            cache_result: true,
            cache_tokens: false,
            colors: ColorMode::Never,
            columns: Columns::default(),
            convert_deprecations_to_exceptions: true,
            convert_errors_to_exceptions: true,
            convert_notices_to_exceptions: true,
            convert_warnings_to_exceptions: true,
            disable_code_coverage_ignore: false,
            enforce_time_limit: false,
            fail_on_risky: false,
            fail_on_warning: false,
            force_covers_annotation: false,
            ignore_deprecated_code_units_from_code_coverage: false,
            no_interaction: false,
            process_isolation: false,
            register_mock_objects_from_test_arguments_recursively: false,
            reverse_defect_list: false,
            stderr: false,
            stop_on_defect: false,
            stop_on_error: false,
            stop_on_failure: false,
            stop_on_incomplete: false,
            stop_on_risky: false,
            stop_on_skipped: false,
            stop_on_warning: false,
            testdox: false,
            verbose: false,
            default_time_limit: 0,
            timeout_for_small_tests: 1,
            timeout_for_medium_tests: 10,
            timeout_for_large_tests: 60,
            execution_order: ExecutionOrder::Default,
            execution_order_defects: DefectsOrder::Default,
            resolve_dependencies: false,
            bootstrap: None,
            cache_result_file: None,
            extensions_directory: None,
            printer_file: None,
            test_suite_loader_file: None,
            printer_class: None,
            test_suite_loader_class: None,
            default_test_suite: None,
            conflict_between_printer_class_and_testdox: false,
        }
    }
}

impl PhpUnitOptions {
    /// Parse the attributes of the root element.
    pub fn parse(root: &Element, ctx: &ParseContext<'_>) -> Self {
        let defaults = Self::default();
        let flag = |name: &str, default: bool| bool_attribute(root, name, default);
        let path = |name: &str| root.attribute(name).map(|value| ctx.resolve_path(value));
        let text = |name: &str| root.attribute(name).map(str::to_string);

        let mut options = Self {
            backup_globals: flag("backupGlobals", defaults.backup_globals),
            backup_static_attributes: flag(
                "backupStaticAttributes",
                defaults.backup_static_attributes,
            ),
            be_strict_about_changes_to_global_state: flag(
                "beStrictAboutChangesToGlobalState",
                defaults.be_strict_about_changes_to_global_state,
            ),
            be_strict_about_covers_annotation: flag(
                "beStrictAboutCoversAnnotation",
                defaults.be_strict_about_covers_annotation,
            ),
            be_strict_about_output_during_tests: flag(
                "beStrictAboutOutputDuringTests",
                defaults.be_strict_about_output_during_tests,
            ),
            be_strict_about_resource_usage_during_small_tests: flag(
                "beStrictAboutResourceUsageDuringSmallTests",
                defaults.be_strict_about_resource_usage_during_small_tests,
            ),
            be_strict_about_tests_that_do_not_test_anything: flag(
                "beStrictAboutTestsThatDoNotTestAnything",
                defaults.be_strict_about_tests_that_do_not_test_anything,
            ),
            be_strict_about_todo_annotated_tests: flag(
                "beStrictAboutTodoAnnotatedTests",
                defaults.be_strict_about_todo_annotated_tests,
            ),
            cache_result: flag("cacheResult", defaults.cache_result),
            cache_tokens: flag("cacheTokens", defaults.cache_tokens),
            colors: parse_colors(root.attribute("colors")),
            columns: parse_columns(root.attribute("columns")),
            convert_deprecations_to_exceptions: flag(
                "convertDeprecationsToExceptions",
                defaults.convert_deprecations_to_exceptions,
            ),
            convert_errors_to_exceptions: flag(
                "convertErrorsToExceptions",
                defaults.convert_errors_to_exceptions,
            ),
            convert_notices_to_exceptions: flag(
                "convertNoticesToExceptions",
                defaults.convert_notices_to_exceptions,
            ),
            convert_warnings_to_exceptions: flag(
                "convertWarningsToExceptions",
                defaults.convert_warnings_to_exceptions,
            ),
            disable_code_coverage_ignore: flag(
                "disableCodeCoverageIgnore",
                defaults.disable_code_coverage_ignore,
            ),
            enforce_time_limit: flag("enforceTimeLimit", defaults.enforce_time_limit),
            fail_on_risky: flag("failOnRisky", defaults.fail_on_risky),
            fail_on_warning: flag("failOnWarning", defaults.fail_on_warning),
            force_covers_annotation: flag(
                "forceCoversAnnotation",
                defaults.force_covers_annotation,
            ),
            ignore_deprecated_code_units_from_code_coverage: flag(
                "ignoreDeprecatedCodeUnitsFromCodeCoverage",
                defaults.ignore_deprecated_code_units_from_code_coverage,
            ),
            no_interaction: flag("noInteraction", defaults.no_interaction),
            process_isolation: flag("processIsolation", defaults.process_isolation),
            register_mock_objects_from_test_arguments_recursively: flag(
                "registerMockObjectsFromTestArgumentsRecursively",
                defaults.register_mock_objects_from_test_arguments_recursively,
            ),
            reverse_defect_list: flag("reverseDefectList", defaults.reverse_defect_list),
            stderr: flag("stderr", defaults.stderr),
            stop_on_defect: flag("stopOnDefect", defaults.stop_on_defect),
            stop_on_error: flag("stopOnError", defaults.stop_on_error),
            stop_on_failure: flag("stopOnFailure", defaults.stop_on_failure),
            stop_on_incomplete: flag("stopOnIncomplete", defaults.stop_on_incomplete),
            stop_on_risky: flag("stopOnRisky", defaults.stop_on_risky),
            stop_on_skipped: flag("stopOnSkipped", defaults.stop_on_skipped),
            stop_on_warning: flag("stopOnWarning", defaults.stop_on_warning),
            testdox: flag("testdox", defaults.testdox),
            verbose: flag("verbose", defaults.verbose),
            default_time_limit: integer_attribute(
                root,
                "defaultTimeLimit",
                defaults.default_time_limit,
            ),
            timeout_for_small_tests: integer_attribute(
                root,
                "timeoutForSmallTests",
                defaults.timeout_for_small_tests,
            ),
            timeout_for_medium_tests: integer_attribute(
                root,
                "timeoutForMediumTests",
                defaults.timeout_for_medium_tests,
            ),
            timeout_for_large_tests: integer_attribute(
                root,
                "timeoutForLargeTests",
                defaults.timeout_for_large_tests,
            ),
            resolve_dependencies: flag("resolveDependencies", defaults.resolve_dependencies),
            bootstrap: path("bootstrap"),
            cache_result_file: path("cacheResultFile"),
            extensions_directory: path("extensionsDirectory"),
            printer_file: path("printerFile"),
            test_suite_loader_file: path("testSuiteLoaderFile"),
            printer_class: text("printerClass"),
            test_suite_loader_class: text("testSuiteLoaderClass"),
            default_test_suite: text("defaultTestSuite"),
            ..defaults
        };

        if let Some(order) = root.attribute("executionOrder") {
            options.apply_execution_order(order);
        }

        if options.testdox {
            if options.printer_class.is_some() {
                options.conflict_between_printer_class_and_testdox = true;
            } else {
                options.printer_class = Some(TESTDOX_PRINTER_CLASS.to_string());
            }
        }

        options
    }

    /// Apply a comma-separated `executionOrder` value. Tokens are applied
    /// left to right; `default` resets everything the attribute controls.
    fn apply_execution_order(&mut self, value: &str) {
        for token in value.split(',').map(str::trim) {
            match token {
                "default" => {
                    self.execution_order = ExecutionOrder::Default;
                    self.execution_order_defects = DefectsOrder::Default;
                    self.resolve_dependencies = false;
                }
                "defects" => self.execution_order_defects = DefectsOrder::DefectsFirst,
                "depends" => self.resolve_dependencies = true,
                "no-depends" => self.resolve_dependencies = false,
                "random" => self.execution_order = ExecutionOrder::Random,
                "reverse" => self.execution_order = ExecutionOrder::Reverse,
                "size" => self.execution_order = ExecutionOrder::Size,
                "duration" => self.execution_order = ExecutionOrder::Duration,
                other => tracing::debug!(token = other, "Ignoring unknown execution order"),
            }
        }
    }
}

fn parse_colors(value: Option<&str>) -> ColorMode {
    match value.and_then(super::parse_bool) {
        Some(true) => ColorMode::Auto,
        _ => ColorMode::Never,
    }
}

fn parse_columns(value: Option<&str>) -> Columns {
    match value.map(str::trim) {
        Some("max") => Columns::Max,
        Some(value) => match parse_integer::<u16>(value) {
            Some(columns) if columns > 0 => Columns::Fixed(columns),
            _ => Columns::default(),
        },
        None => Columns::default(),
    }
}
