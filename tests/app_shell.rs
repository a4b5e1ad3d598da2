//! Drives the app shell with key presses the way the event loop does.

use std::time::Duration;

use course_manager::db::{fetch_course_offerings, fetch_registrations};
use course_manager::{App, Route};
use crossterm::event::KeyCode;

mod common;
use common::{reopen, temp_store};

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        app.handle_key(KeyCode::Char(ch));
    }
}

fn latest_message(app: &App) -> Option<String> {
    app.notifications().latest().map(|t| t.message.clone())
}

#[test]
fn full_walkthrough_from_type_to_registration() {
    let (_dir, path, conn) = temp_store();
    let mut app = App::new(conn, Route::from_path("/course-types"), Duration::from_secs(4));
    app.tick();

    type_text(&mut app, "Online");
    app.handle_key(KeyCode::Enter);
    assert_eq!(
        latest_message(&app).as_deref(),
        Some("Course type created successfully")
    );

    app.handle_key(KeyCode::F(2));
    app.tick();
    type_text(&mut app, "Algebra");
    app.handle_key(KeyCode::Enter);
    assert_eq!(latest_message(&app).as_deref(), Some("Course created successfully"));

    app.handle_key(KeyCode::F(3));
    app.tick();
    app.handle_key(KeyCode::Right);
    app.handle_key(KeyCode::Tab);
    app.handle_key(KeyCode::Right);
    app.handle_key(KeyCode::Enter);
    assert_eq!(
        latest_message(&app).as_deref(),
        Some("Course offering created successfully")
    );

    app.handle_key(KeyCode::F(4));
    app.tick();
    app.handle_key(KeyCode::Right);
    app.handle_key(KeyCode::Tab);
    app.handle_key(KeyCode::Right);
    app.handle_key(KeyCode::Tab);
    type_text(&mut app, "Ana");
    app.handle_key(KeyCode::Tab);
    type_text(&mut app, "ana@x.com");
    app.handle_key(KeyCode::Enter);
    assert_eq!(
        latest_message(&app).as_deref(),
        Some("Registration created successfully")
    );

    let check = reopen(&path);
    let offerings = fetch_course_offerings(&check).unwrap();
    assert_eq!(offerings[0].display_label(), "Algebra - Online");
    let registrations = fetch_registrations(&check).unwrap();
    assert_eq!(registrations.len(), 1);
    assert_eq!(registrations[0].student_name, "Ana");
}

#[test]
fn submitting_an_empty_offering_form_reports_and_stays() {
    let (_dir, _path, conn) = temp_store();
    let mut app = App::new(conn, Route::CourseOfferings, Duration::from_secs(4));
    app.tick();

    app.handle_key(KeyCode::Enter);
    assert_eq!(
        latest_message(&app).as_deref(),
        Some("Select a course and a course type.")
    );
    assert_eq!(app.route(), Route::CourseOfferings);
}
