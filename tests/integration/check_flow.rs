//! End-to-end checks against a scripted wrapper

use serial_test::serial;
use std::time::{Duration, Instant};

use taskcheck::models::constants::headline::{
    COMPILATION_FAILED, FAILED_TO_CHECK, NO_TEST_RESULTS, PARSE_FAILED,
};
use taskcheck::models::constants::status_line::CONGRATULATIONS;
use taskcheck::models::CheckStatus;
use taskcheck::verify::{CancelToken, Checker, RunnerSettings, TestRunner};

use super::helpers::*;

#[test]
#[serial]
fn test_all_tests_pass_is_solved() {
    let course = Course::shared();
    let task_dir = course.add_task("lesson1/task1");
    course.write_recording_gradlew(&[
        "> Task :test",
        "#educational_plugin test OK testSolution",
        "BUILD SUCCESSFUL in 1s",
    ]);

    let result = course
        .checker()
        .check(&course.task(&task_dir), None, &CancelToken::new());

    assert_eq!(result.status(), CheckStatus::Solved);
    assert_eq!(result.headline(), CONGRATULATIONS);
    assert_eq!(result.detail(), "test OK testSolution");
}

#[test]
#[serial]
fn test_failing_test_reports_first_failure() {
    let course = Course::shared();
    let task_dir = course.add_task("lesson1/task1");
    course.write_recording_gradlew(&[
        "> Task :test",
        "#educational_plugin test OK testEmpty",
        "#educational_plugin FAILED + Wrong sum for 1 and 2",
        "#educational_plugin expected:<3> but was:<4>",
        "BUILD FAILED in 1s",
    ]);

    let result = course
        .checker()
        .check(&course.task(&task_dir), None, &CancelToken::new());

    assert_eq!(result.status(), CheckStatus::Failed);
    assert_eq!(result.headline(), "Wrong sum for 1 and 2");
    assert!(result.detail().contains("expected:<3> but was:<4>"));
}

#[test]
#[serial]
fn test_compilation_error_without_target_echo() {
    let course = Course::shared();
    let task_dir = course.add_isolated_task("lesson1/task1");
    course.write_gradlew(
        "echo '> Task :lesson1-task1:compileKotlin FAILED'\n\
         echo 'e: Task.kt: (3, 5): Unresolved reference: foo' >&2\n\
         echo 'Compilation error. See log for more details' >&2\n\
         exit 1",
    );

    let result = course
        .checker()
        .check(&course.task(&task_dir), None, &CancelToken::new());

    assert_eq!(result.status(), CheckStatus::Failed);
    assert_eq!(result.headline(), COMPILATION_FAILED);
    assert!(result.detail().contains("Unresolved reference: foo"));
}

#[test]
#[serial]
fn test_stderr_only_output_is_the_headline() {
    let course = Course::shared();
    let task_dir = course.add_task("lesson1/task1");
    course.write_gradlew("echo 'Could not resolve all dependencies' >&2\nexit 1");

    let result = course
        .checker()
        .check(&course.task(&task_dir), None, &CancelToken::new());

    assert_eq!(result.status(), CheckStatus::Failed);
    assert_eq!(result.headline(), "Could not resolve all dependencies");
    assert_eq!(result.detail(), "Could not resolve all dependencies");
}

#[test]
#[serial]
fn test_target_never_reached() {
    let course = Course::shared();
    let task_dir = course.add_isolated_task("lesson1/task1");
    course.write_gradlew(
        "echo 'BUILD FAILED'\n\
         echo \"Project 'lesson1-task1' not found\" >&2\n\
         exit 1",
    );

    let result = course
        .checker()
        .check(&course.task(&task_dir), None, &CancelToken::new());

    assert_eq!(result.status(), CheckStatus::Failed);
    assert_eq!(result.headline(), FAILED_TO_CHECK);
    assert_eq!(
        result.detail(),
        "Failed to launch checking\nProject 'lesson1-task1' not found\nBUILD FAILED"
    );
}

#[test]
#[serial]
fn test_build_without_messages_is_not_solved() {
    let course = Course::shared();
    let task_dir = course.add_task("lesson1/task1");
    course.write_recording_gradlew(&["> Task :test", "BUILD SUCCESSFUL in 1s"]);

    let result = course
        .checker()
        .check(&course.task(&task_dir), None, &CancelToken::new());

    assert_eq!(result.status(), CheckStatus::FailedToCheck);
    assert_eq!(result.headline(), NO_TEST_RESULTS);
}

#[test]
#[serial]
fn test_unparseable_message() {
    let course = Course::shared();
    let task_dir = course.add_task("lesson1/task1");
    course.write_recording_gradlew(&["> Task :test", "#educational_plugin something odd"]);

    let result = course
        .checker()
        .check(&course.task(&task_dir), None, &CancelToken::new());

    assert_eq!(result.status(), CheckStatus::FailedToCheck);
    assert_eq!(result.headline(), PARSE_FAILED);
    assert!(result.detail().contains("something odd"));
}

#[test]
#[serial]
fn test_background_process_holding_output_open() {
    let course = Course::shared();
    let task_dir = course.add_task("lesson1/task1");
    course.write_gradlew(
        "echo '> Task :test'\n\
         echo '#educational_plugin test OK'\n\
         sleep 15 &\n\
         exit 0",
    );

    let started = Instant::now();
    let result = course
        .checker()
        .check(&course.task(&task_dir), None, &CancelToken::new());

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(result.status(), CheckStatus::Solved);
    assert_eq!(result.headline(), CONGRATULATIONS);
}

#[test]
#[serial]
fn test_missing_wrapper_fails_to_check() {
    let course = Course::shared();
    let task_dir = course.add_task("lesson1/task1");

    let result = course
        .checker()
        .check(&course.task(&task_dir), None, &CancelToken::new());

    assert_eq!(result.status(), CheckStatus::FailedToCheck);
    assert_eq!(result.headline(), FAILED_TO_CHECK);
    assert!(result.detail().contains("failed to launch"));
}

#[test]
#[serial]
fn test_missing_toolchain_never_launches() {
    let course = Course::shared();
    let task_dir = course.add_task("lesson1/task1");
    course.write_recording_gradlew(&["#educational_plugin test OK"]);

    let checker = Checker::new(course.project(None), fast_config());
    let result = checker.check(&course.task(&task_dir), None, &CancelToken::new());

    assert_eq!(result.status(), CheckStatus::FailedToCheck);
    assert_eq!(result.headline(), FAILED_TO_CHECK);
    assert!(course.read("args.txt").is_none());
}

#[test]
#[serial]
fn test_isolated_task_gets_qualified_target() {
    let course = Course::shared();
    let task_dir = course.add_isolated_task("lesson1/task1");
    course.write_recording_gradlew(&[
        "> Task :lesson1-task1:test",
        "#educational_plugin test OK",
    ]);

    let result = course.checker().check(
        &course.task(&task_dir),
        Some("Tests.testSolution"),
        &CancelToken::new(),
    );

    assert_eq!(result.status(), CheckStatus::Solved);
    assert_eq!(
        course.read("args.txt").as_deref(),
        Some(":lesson1-task1:test --tests Tests.testSolution")
    );
    assert_eq!(course.read("java_home.txt").as_deref(), Some(FAKE_JDK));
}

#[test]
#[serial]
fn test_sectioned_task_name_is_sanitized() {
    let course = Course::shared();
    let task_dir = course.add_isolated_task("Basics/Hello World/task1");
    course.write_recording_gradlew(&[
        "> Task :Basics-Hello_World-task1:test",
        "#educational_plugin test OK",
    ]);

    let result = course
        .checker()
        .check(&course.task(&task_dir), None, &CancelToken::new());

    assert_eq!(result.status(), CheckStatus::Solved);
    assert_eq!(
        course.read("args.txt").as_deref(),
        Some(":Basics-Hello_World-task1:test")
    );
}

#[test]
#[serial]
fn test_shared_task_gets_bare_target() {
    let course = Course::shared();
    let task_dir = course.add_task("lesson1/task1");
    course.write_recording_gradlew(&["> Task :test", "#educational_plugin test OK"]);

    course
        .checker()
        .check(&course.task(&task_dir), None, &CancelToken::new());

    assert_eq!(course.read("args.txt").as_deref(), Some("test"));
}

#[test]
#[serial]
fn test_runner_selection_restored_after_check() {
    let course = Course::shared();
    let task_dir = course.add_task("lesson1/task1");
    course.write_recording_gradlew(&["> Task :test", "#educational_plugin test OK"]);
    RunnerSettings::global().set(&course.root, Some(TestRunner::Platform));

    course
        .checker()
        .check(&course.task(&task_dir), None, &CancelToken::new());

    assert_eq!(
        RunnerSettings::global().get(&course.root),
        Some(TestRunner::Platform)
    );
    RunnerSettings::global().set(&course.root, None);
}
