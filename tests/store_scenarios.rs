//! End-to-end store scenarios against a file-backed database.

use course_manager::db::{
    create_course, create_course_offering, create_course_type, create_registration,
    delete_course, delete_course_offering, delete_course_type, delete_registration,
    fetch_course_offerings, fetch_course_types, fetch_courses, fetch_registrations,
    rename_course, rename_course_type,
};
use course_manager::models::offerings_of_type;
use pretty_assertions::assert_eq;

mod common;
use common::{reopen, temp_store};

#[test]
fn offering_and_registration_resolve_their_joins() {
    let (_dir, _path, conn) = temp_store();

    let online = create_course_type(&conn, "Online").unwrap();
    let algebra = create_course(&conn, "Algebra").unwrap();
    let offering = create_course_offering(&conn, algebra.id, online.id).unwrap();

    let offerings = fetch_course_offerings(&conn).unwrap();
    assert_eq!(offerings.len(), 1);
    assert_eq!(offerings[0].course.as_ref().unwrap().name, "Algebra");
    assert_eq!(offerings[0].course_type.as_ref().unwrap().name, "Online");
    assert_eq!(offerings[0].display_label(), "Algebra - Online");

    create_registration(&conn, offering.id, "Ana", "ana@x.com").unwrap();
    let registrations = fetch_registrations(&conn).unwrap();
    assert_eq!(registrations.len(), 1);
    let nested = registrations[0].course_offering.as_ref().unwrap();
    assert_eq!(nested.id, offering.id);
    assert_eq!(nested.course.as_ref().unwrap().name, "Algebra");
    assert_eq!(registrations[0].student_line(), "Ana (ana@x.com)");
}

#[test]
fn renames_show_through_every_join() {
    let (_dir, _path, conn) = temp_store();
    let online = create_course_type(&conn, "Online").unwrap();
    let algebra = create_course(&conn, "Algebra").unwrap();
    let offering = create_course_offering(&conn, algebra.id, online.id).unwrap();
    create_registration(&conn, offering.id, "Ana", "ana@x.com").unwrap();

    rename_course_type(&conn, online.id, "Remote").unwrap();
    rename_course(&conn, algebra.id, "Linear Algebra").unwrap();

    let offerings = fetch_course_offerings(&conn).unwrap();
    assert_eq!(offerings[0].display_label(), "Linear Algebra - Remote");
    let registrations = fetch_registrations(&conn).unwrap();
    assert_eq!(
        registrations[0]
            .course_offering
            .as_ref()
            .map(|o| o.display_label()),
        Some("Linear Algebra - Remote".to_string())
    );
}

#[test]
fn update_touches_only_the_target_row() {
    let (_dir, _path, conn) = temp_store();
    let online = create_course_type(&conn, "Online").unwrap();
    let hybrid = create_course_type(&conn, "Hybrid").unwrap();

    rename_course_type(&conn, online.id, "Remote").unwrap();

    let names: Vec<(i64, String)> = fetch_course_types(&conn)
        .unwrap()
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();
    assert_eq!(
        names,
        vec![(hybrid.id, "Hybrid".to_string()), (online.id, "Remote".to_string())]
    );
}

#[test]
fn referenced_offering_cannot_be_deleted() {
    let (_dir, _path, conn) = temp_store();
    let online = create_course_type(&conn, "Online").unwrap();
    let algebra = create_course(&conn, "Algebra").unwrap();
    let offering = create_course_offering(&conn, algebra.id, online.id).unwrap();
    let ana = create_registration(&conn, offering.id, "Ana", "ana@x.com").unwrap();

    let err = delete_course_offering(&conn, offering.id).unwrap_err();
    assert!(format!("{err:#}").contains("still has registrations"));
    assert_eq!(fetch_registrations(&conn).unwrap(), vec![ana.clone()]);

    assert!(delete_course(&conn, algebra.id).is_err());
    assert!(delete_course_type(&conn, online.id).is_err());

    delete_registration(&conn, ana.id).unwrap();
    delete_course_offering(&conn, offering.id).unwrap();
    delete_course(&conn, algebra.id).unwrap();
    delete_course_type(&conn, online.id).unwrap();
    assert!(fetch_course_offerings(&conn).unwrap().is_empty());
}

#[test]
fn deleting_twice_fails_and_leaves_the_list_alone() {
    let (_dir, _path, conn) = temp_store();
    let algebra = create_course(&conn, "Algebra").unwrap();
    let biology = create_course(&conn, "Biology").unwrap();

    delete_course(&conn, algebra.id).unwrap();
    let err = delete_course(&conn, algebra.id).unwrap_err();
    assert_eq!(err.to_string(), "Course not found");

    assert_eq!(fetch_courses(&conn).unwrap(), vec![biology]);
}

#[test]
fn filter_by_course_type_uses_the_joined_id() {
    let (_dir, _path, conn) = temp_store();
    let online = create_course_type(&conn, "Online").unwrap();
    let in_person = create_course_type(&conn, "In-Person").unwrap();
    let algebra = create_course(&conn, "Algebra").unwrap();
    let biology = create_course(&conn, "Biology").unwrap();
    let a = create_course_offering(&conn, algebra.id, online.id).unwrap();
    let b = create_course_offering(&conn, biology.id, in_person.id).unwrap();
    let c = create_course_offering(&conn, biology.id, online.id).unwrap();

    let offerings = fetch_course_offerings(&conn).unwrap();
    let ids = |type_id: Option<i64>| -> Vec<i64> {
        offerings_of_type(&offerings, type_id)
            .into_iter()
            .map(|o| o.id)
            .collect()
    };
    assert_eq!(ids(Some(online.id)), vec![a.id, c.id]);
    assert_eq!(ids(Some(in_person.id)), vec![b.id]);
    assert_eq!(ids(None), vec![a.id, b.id, c.id]);
}

#[test]
fn rows_survive_reopening_the_file() {
    let (_dir, path, conn) = temp_store();
    let online = create_course_type(&conn, "Online").unwrap();
    let algebra = create_course(&conn, "Algebra").unwrap();
    let offering = create_course_offering(&conn, algebra.id, online.id).unwrap();
    create_registration(&conn, offering.id, "Ana", "ana@x.com").unwrap();
    drop(conn);

    let conn = reopen(&path);
    assert_eq!(fetch_course_types(&conn).unwrap(), vec![online]);
    assert_eq!(fetch_registrations(&conn).unwrap().len(), 1);

    // Foreign keys are enforced on every connection, not only the first.
    assert!(delete_course_offering(&conn, offering.id).is_err());
}
