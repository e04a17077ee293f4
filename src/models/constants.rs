/// Prefix marking stdout lines that belong to a structured test message.
/// Shared with the test adapter running inside the build; changing it breaks
/// the protocol.
pub const MESSAGE_PREFIX: &str = "#educational_plugin";

/// Status lines emitted by the test adapter inside a structured message.
pub mod status_line {
    pub const TEST_OK: &str = "test OK";
    pub const TEST_FAILED: &str = "FAILED + ";
    pub const CONGRATULATIONS: &str = "Congratulations!";
}

/// Headlines for results that do not come from the test adapter.
pub mod headline {
    pub const COMPILATION_FAILED: &str = "Compilation failed";
    pub const FAILED_TO_CHECK: &str = "Failed to launch checking";
    pub const NO_TEST_RESULTS: &str = "No test results reported";
    pub const PARSE_FAILED: &str = "Failed to parse test output";
    pub const CANCELLED: &str = "Checking cancelled";
    pub const NO_OUTPUT: &str = "<no output>";
}

/// Gradle targets and arguments used by the checker.
pub mod gradle {
    pub const WRAPPER_UNIX: &str = "gradlew";
    pub const WRAPPER_WINDOWS: &str = "gradlew.bat";
    pub const TEST_TASK: &str = "test";
    pub const RUN_TASK: &str = "run";
    pub const TESTS_ARG: &str = "--tests";
    pub const MAIN_CLASS_PROPERTY_PREFIX: &str = "-PmainClass=";
    pub const TOOLCHAIN_HOME_VAR: &str = "JAVA_HOME";
}
