use serde_json::{Value, json};

use crate::common::{TestApp, routes};

fn submission_body(code: &str, user: &str) -> Value {
    json!({ "code": code, "user_uuid": user })
}

fn grade_body(submission_id: i64, result: &str) -> Value {
    json!({
        "submission_id": submission_id,
        "code": "irrelevant",
        "result": result,
    })
}

#[tokio::test]
async fn first_submission_is_dispatched_to_the_grader() {
    let app = TestApp::spawn().await;
    app.seed_assignment(1).await;
    let user = uuid::Uuid::new_v4().to_string();

    let res = app
        .post(&routes::submissions(1), &submission_body("print(1)", &user))
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["status"], "Enqueued");

    let jobs = app.dispatched_jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].code, "print(1)");
    assert_eq!(jobs[0].user_uuid, user);
    assert_eq!(jobs[0].test_code, "assert solution() == 'Hello world'");

    // Persisted as pending, not yet correct.
    let stored = app.get(&routes::current_submission(1, &user)).await;
    let items = stored.body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["status"], "pending");
    assert_eq!(items[0]["correct"], false);
    assert_eq!(items[0]["grader_feedback"], Value::Null);
}

#[tokio::test]
async fn identical_code_resubmission_is_a_duplicate() {
    let app = TestApp::spawn().await;
    app.seed_assignment(1).await;
    let user = uuid::Uuid::new_v4().to_string();
    let body = submission_body("print(1)", &user);

    let first = app.post(&routes::submissions(1), &body).await;
    assert_eq!(first.body["status"], "Enqueued");

    // Mark processed so only the code equality check stands in the way.
    let submission_id = current_submission_id(&app, 1, &user).await;
    app.post(&routes::grading(&user), &grade_body(submission_id, "..."))
        .await;

    let second = app.post(&routes::submissions(1), &body).await;

    assert_eq!(second.status, 200);
    assert_eq!(second.body["data"], "Duplicate submission");
    assert_eq!(app.dispatched_jobs().len(), 1);
}

#[tokio::test]
async fn resubmission_while_pending_is_a_duplicate_even_with_new_code() {
    let app = TestApp::spawn().await;
    app.seed_assignment(1).await;
    let user = uuid::Uuid::new_v4().to_string();

    app.post(&routes::submissions(1), &submission_body("v1", &user))
        .await;
    let second = app
        .post(&routes::submissions(1), &submission_body("v2", &user))
        .await;

    assert_eq!(second.status, 200);
    assert_eq!(second.body["data"], "Duplicate submission");
    assert_eq!(app.dispatched_jobs().len(), 1);

    // The stored code is still the first round's.
    let stored = app.get(&routes::current_submission(1, &user)).await;
    assert_eq!(stored.body[0]["code"], "v1");
}

#[tokio::test]
async fn new_code_after_processing_starts_a_fresh_round() {
    let app = TestApp::spawn().await;
    app.seed_assignment(1).await;
    let user = uuid::Uuid::new_v4().to_string();

    app.post(&routes::submissions(1), &submission_body("v1", &user))
        .await;
    let submission_id = current_submission_id(&app, 1, &user).await;
    app.post(&routes::grading(&user), &grade_body(submission_id, "F..\n\nFAILED"))
        .await;

    let res = app
        .post(&routes::submissions(1), &submission_body("v2", &user))
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["status"], "Enqueued");
    assert_eq!(app.dispatched_jobs().len(), 2);

    // The same row flipped back to pending and its feedback was cleared.
    let stored = app.get(&routes::current_submission(1, &user)).await;
    let record = &stored.body[0];
    assert_eq!(record["id"], submission_id);
    assert_eq!(record["code"], "v2");
    assert_eq!(record["status"], "pending");
    assert_eq!(record["correct"], false);
    assert_eq!(record["grader_feedback"], Value::Null);
}

#[tokio::test]
async fn submission_to_unknown_assignment_is_not_found() {
    let app = TestApp::spawn().await;
    let user = uuid::Uuid::new_v4().to_string();

    let res = app
        .post(&routes::submissions(99), &submission_body("print(1)", &user))
        .await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
    assert!(app.dispatched_jobs().is_empty());
}

#[tokio::test]
async fn malformed_body_is_a_validation_error() {
    let app = TestApp::spawn().await;
    app.seed_assignment(1).await;

    let res = app
        .post_raw(&routes::submissions(1), r#"{"code": "print(1)"}"#)
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");

    let res = app.post_raw(&routes::submissions(1), "not json").await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");

    let res = app
        .post(&routes::submissions(1), &submission_body("x", "   "))
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");

    assert!(app.dispatched_jobs().is_empty());
}

#[tokio::test]
async fn users_and_assignments_do_not_share_rounds() {
    let app = TestApp::spawn().await;
    app.seed_assignment(1).await;
    app.seed_assignment(2).await;
    let alice = uuid::Uuid::new_v4().to_string();
    let bob = uuid::Uuid::new_v4().to_string();
    let body = submission_body("print(1)", &alice);

    // Same code, different assignment: not a duplicate.
    assert_eq!(
        app.post(&routes::submissions(1), &body).await.body["status"],
        "Enqueued"
    );
    assert_eq!(
        app.post(&routes::submissions(2), &body).await.body["status"],
        "Enqueued"
    );

    // Same code, different user: not a duplicate either.
    let res = app
        .post(&routes::submissions(1), &submission_body("print(1)", &bob))
        .await;
    assert_eq!(res.body["status"], "Enqueued");

    assert_eq!(app.dispatched_jobs().len(), 3);
}

#[tokio::test]
async fn current_submission_lookup_is_empty_for_unknown_user() {
    let app = TestApp::spawn().await;
    app.seed_assignment(1).await;

    let res = app.get(&routes::current_submission(1, "nobody")).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body, Value::Array(vec![]));
}

async fn current_submission_id(app: &TestApp, order: i32, user: &str) -> i64 {
    let res = app.get(&routes::current_submission(order, user)).await;
    res.body[0]["id"]
        .as_i64()
        .expect("expected a stored submission")
}
