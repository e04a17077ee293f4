//! Cancellation and per-task serialization through the check service

use serial_test::serial;
use std::fs;
use std::time::{Duration, Instant};

use taskcheck::models::constants::headline::CANCELLED;
use taskcheck::models::CheckStatus;
use taskcheck::verify::{CancelToken, CheckService};

use super::helpers::*;

fn read_pid(course: &Course) -> u32 {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(pid) = course.read("pid.txt").and_then(|s| s.parse().ok()) {
            return pid;
        }
        assert!(Instant::now() < deadline, "build never wrote its pid");
        std::thread::sleep(Duration::from_millis(20));
    }
}

#[test]
#[serial]
fn test_cancel_stops_running_build() {
    let course = Course::shared();
    let task_dir = course.add_task("lesson1/task1");
    course.write_gradlew(
        "echo '> Task :test'\n\
         echo \"$$\" > pid.txt\n\
         sleep 30\n\
         echo '#educational_plugin test OK'",
    );

    let service = CheckService::new(course.checker());
    let handle = service.spawn(course.task(&task_dir), None);
    let pid = read_pid(&course);

    let started = Instant::now();
    handle.cancel();
    let result = handle.wait();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(result.status(), CheckStatus::FailedToCheck);
    assert_eq!(result.headline(), CANCELLED);
    assert!(!process_exists(pid), "build process survived cancellation");
}

#[test]
#[serial]
fn test_cancel_before_start_never_launches() {
    let course = Course::shared();
    let task_dir = course.add_task("lesson1/task1");
    course.write_recording_gradlew(&["> Task :test", "#educational_plugin test OK"]);

    let cancel = CancelToken::new();
    cancel.cancel();
    let result = course
        .checker()
        .check(&course.task(&task_dir), None, &cancel);

    assert_eq!(result.status(), CheckStatus::FailedToCheck);
    assert_eq!(result.headline(), CANCELLED);
    assert!(course.read("args.txt").is_none());
}

#[test]
#[serial]
fn test_checks_of_one_task_do_not_overlap() {
    let course = Course::shared();
    let task_dir = course.add_task("lesson1/task1");
    course.write_gradlew(
        "echo start >> runs.log\n\
         sleep 0.3\n\
         echo end >> runs.log\n\
         echo '> Task :test'\n\
         echo '#educational_plugin test OK'",
    );

    let service = CheckService::new(course.checker());
    let first = service.spawn(course.task(&task_dir), None);
    let second = service.spawn(course.task(&task_dir), None);

    assert_eq!(first.wait().status(), CheckStatus::Solved);
    assert_eq!(second.wait().status(), CheckStatus::Solved);

    let log = fs::read_to_string(course.root.join("runs.log")).unwrap();
    assert_eq!(log, "start\nend\nstart\nend\n");
}

#[test]
#[serial]
fn test_handle_reports_finished() {
    let course = Course::shared();
    let task_dir = course.add_task("lesson1/task1");
    course.write_recording_gradlew(&["> Task :test", "#educational_plugin test OK"]);

    let service = CheckService::new(course.checker());
    let handle = service.spawn(course.task(&task_dir), None);

    let deadline = Instant::now() + Duration::from_secs(10);
    while !handle.is_finished() {
        assert!(Instant::now() < deadline, "check never finished");
        std::thread::sleep(Duration::from_millis(20));
    }
    assert!(handle.wait().is_solved());
}
