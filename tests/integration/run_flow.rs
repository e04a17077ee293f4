//! Running a task's program instead of its tests

use serial_test::serial;
use std::fs;

use taskcheck::models::constants::headline::NO_OUTPUT;
use taskcheck::models::CheckStatus;
use taskcheck::verify::CancelToken;

use super::helpers::*;

#[test]
#[serial]
fn test_run_returns_first_message() {
    let course = Course::shared();
    let task_dir = course.add_isolated_task("lesson1/task1");
    course.write_recording_gradlew(&[
        "> Task :lesson1-task1:run",
        "#educational_plugin Hello, World!",
        "BUILD SUCCESSFUL in 1s",
    ]);

    let output = course
        .checker()
        .run_program(&course.task(&task_dir), Some("MainKt"), &CancelToken::new())
        .unwrap();

    assert_eq!(output, "Hello, World!");
    assert_eq!(
        course.read("args.txt").as_deref(),
        Some(":lesson1-task1:run -PmainClass=MainKt")
    );
}

#[test]
#[serial]
fn test_run_without_messages() {
    let course = Course::shared();
    let task_dir = course.add_task("lesson1/task1");
    course.write_recording_gradlew(&["> Task :run", "BUILD SUCCESSFUL in 1s"]);

    let output = course
        .checker()
        .run_program(&course.task(&task_dir), Some("MainKt"), &CancelToken::new())
        .unwrap();

    assert_eq!(output, NO_OUTPUT);
}

#[test]
#[serial]
fn test_run_compilation_failure() {
    let course = Course::shared();
    let task_dir = course.add_task("lesson1/task1");
    course.write_gradlew(
        "echo '> Task :compileKotlin FAILED'\n\
         echo 'Compilation error. See log for more details' >&2\n\
         exit 1",
    );

    let err = course
        .checker()
        .run_program(&course.task(&task_dir), Some("MainKt"), &CancelToken::new())
        .unwrap_err();

    assert_eq!(err.status(), CheckStatus::Failed);
    assert!(err.detail().contains("Compilation error"));
}

#[test]
#[serial]
fn test_run_finds_main_class_in_task_files() {
    let course = Course::shared();
    let task_dir = course.add_task("lesson1/task1");
    fs::write(
        task_dir.join("task-info.yaml"),
        "files:\n  - name: src/Task.kt\n  - name: test/Tests.kt\n    visible: false\n",
    )
    .unwrap();
    fs::write(
        task_dir.join("src/Task.kt"),
        "package greeting\n\nfun main() {\n    println(\"Hello\")\n}\n",
    )
    .unwrap();
    course.write_recording_gradlew(&["> Task :run", "#educational_plugin Hello"]);

    let output = course
        .checker()
        .run_program(&course.task(&task_dir), None, &CancelToken::new())
        .unwrap();

    assert_eq!(output, "Hello");
    assert_eq!(
        course.read("args.txt").as_deref(),
        Some("run -PmainClass=greeting.TaskKt")
    );
}

#[test]
#[serial]
fn test_run_without_any_main_class() {
    let course = Course::shared();
    let task_dir = course.add_task("lesson1/task1");
    fs::write(task_dir.join("task-info.yaml"), "files:\n  - name: src/Task.kt\n").unwrap();
    fs::write(task_dir.join("src/Task.kt"), "fun solve() = 42\n").unwrap();
    course.write_recording_gradlew(&["> Task :run"]);

    let err = course
        .checker()
        .run_program(&course.task(&task_dir), None, &CancelToken::new())
        .unwrap_err();

    assert_eq!(err.status(), CheckStatus::Failed);
    assert_eq!(err.headline(), "No main class found for task 'task1'");
    assert!(course.read("args.txt").is_none());
}
