//! Submission lifecycle coordination.
//!
//! Owns the `absent -> pending -> processed` state machine for each
//! `(assignment, user)` pair: duplicate detection, persistence, grading
//! dispatch and status event publication. All read-modify-publish sequences
//! for one pair run under that pair's lock, so a result callback and a
//! resubmission racing on the same key cannot publish stale state out of
//! order. Independent pairs never contend.

use std::sync::Arc;

use chrono::Utc;
use common::{GradeReport, GradingJob, SubmissionStatus};
use dashmap::DashMap;
use sea_orm::*;
use tracing::{info, instrument, warn};

use crate::entity::{assignment, submission};
use crate::error::AppError;
use crate::events::StatusEventHub;
use crate::grader::{DispatchResponse, GraderDispatch};
use crate::models::submission::{SubmissionRecord, SubmissionRequest};

/// Result of a submission attempt.
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Rejected: byte-identical code, or the previous round is still pending.
    Duplicate,
    /// Accepted and handed to the grading service.
    Dispatched(DispatchResponse),
}

type PairKey = (i32, String);

pub struct SubmissionCoordinator {
    db: DatabaseConnection,
    hub: StatusEventHub,
    dispatcher: Arc<dyn GraderDispatch>,
    /// One lock per (assignment_id, user_uuid). Entries are never removed;
    /// the map is bounded by users x assignments.
    locks: DashMap<PairKey, Arc<tokio::sync::Mutex<()>>>,
}

impl SubmissionCoordinator {
    pub fn new(
        db: DatabaseConnection,
        hub: StatusEventHub,
        dispatcher: Arc<dyn GraderDispatch>,
    ) -> Self {
        Self {
            db,
            hub,
            dispatcher,
            locks: DashMap::new(),
        }
    }

    fn pair_lock(&self, key: &PairKey) -> Arc<tokio::sync::Mutex<()>> {
        self.locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Handle a submission for the assignment with order `assignment_order`.
    #[instrument(skip(self, request), fields(user_uuid = %request.user_uuid))]
    pub async fn submit(
        &self,
        assignment_order: i32,
        request: SubmissionRequest,
    ) -> Result<SubmissionOutcome, AppError> {
        let assignment = find_assignment_by_order(&self.db, assignment_order)
            .await?
            .ok_or_else(|| AppError::NotFound("Assignment not found".into()))?;

        let key = (assignment.id, request.user_uuid.clone());
        let lock = self.pair_lock(&key);
        let _guard = lock.lock().await;

        let previous = find_submission(&self.db, assignment.id, &request.user_uuid).await?;

        match previous {
            None => {
                let new_submission = submission::ActiveModel {
                    assignment_id: Set(assignment.id),
                    user_uuid: Set(request.user_uuid.clone()),
                    code: Set(request.code.clone()),
                    status: Set(SubmissionStatus::Pending),
                    grader_feedback: Set(None),
                    correct: Set(false),
                    last_updated: Set(Utc::now()),
                    ..Default::default()
                };
                let model = new_submission.insert(&self.db).await?;

                info!(submission_id = model.id, "Created submission");
                let ack = self.dispatch(&model, &assignment).await?;
                self.publish_record(&model).await;
                Ok(SubmissionOutcome::Dispatched(ack))
            }
            Some(prev)
                if prev.status == SubmissionStatus::Pending || prev.code == request.code =>
            {
                info!(
                    submission_id = prev.id,
                    status = %prev.status,
                    "Rejected duplicate submission"
                );
                Ok(SubmissionOutcome::Duplicate)
            }
            Some(prev) => {
                let update = submission::ActiveModel {
                    id: Set(prev.id),
                    code: Set(request.code.clone()),
                    status: Set(SubmissionStatus::Pending),
                    grader_feedback: Set(None),
                    correct: Set(false),
                    last_updated: Set(Utc::now()),
                    ..Default::default()
                };
                let model = update.update(&self.db).await?;

                info!(submission_id = model.id, "Replaced processed submission");
                let ack = self.dispatch(&model, &assignment).await?;
                self.publish_record(&model).await;
                Ok(SubmissionOutcome::Dispatched(ack))
            }
        }
    }

    /// Record a grading result delivered by the worker and publish the
    /// `processed` transition to the owner's event stream.
    #[instrument(skip(self, report), fields(submission_id = report.submission_id))]
    pub async fn record_result(
        &self,
        user_uuid: &str,
        report: GradeReport,
    ) -> Result<(), AppError> {
        // The callback carries only the submission id; resolve the pair key
        // before taking the lock.
        let current = find_submission_by_id(&self.db, report.submission_id, user_uuid)
            .await?
            .ok_or_else(|| AppError::NotFound("Submission not found".into()))?;

        let key = (current.assignment_id, user_uuid.to_string());
        let lock = self.pair_lock(&key);
        let _guard = lock.lock().await;

        let outcome = report.outcome();
        let update = submission::ActiveModel {
            id: Set(current.id),
            code: Set(report.code),
            status: Set(SubmissionStatus::Processed),
            grader_feedback: Set(Some(outcome.details)),
            correct: Set(outcome.passed),
            last_updated: Set(Utc::now()),
            ..Default::default()
        };
        let model = update.update(&self.db).await?;

        info!(
            submission_id = model.id,
            correct = model.correct,
            "Recorded grading result"
        );
        self.publish_record(&model).await;
        Ok(())
    }

    /// Current submission record for a `(assignment order, user)` pair.
    /// Recovery read for clients that reconnect after losing the stream.
    pub async fn current_record(
        &self,
        assignment_order: i32,
        user_uuid: &str,
    ) -> Result<Option<SubmissionRecord>, AppError> {
        let Some(assignment) = find_assignment_by_order(&self.db, assignment_order).await? else {
            return Ok(None);
        };
        let model = find_submission(&self.db, assignment.id, user_uuid).await?;
        Ok(model.map(SubmissionRecord::from))
    }

    async fn dispatch(
        &self,
        model: &submission::Model,
        assignment: &assignment::Model,
    ) -> Result<DispatchResponse, AppError> {
        let job = GradingJob {
            submission_id: model.id,
            code: model.code.clone(),
            test_code: assignment.test_code.clone(),
            user_uuid: model.user_uuid.clone(),
        };
        self.dispatcher.dispatch(job).await
    }

    async fn publish_record(&self, model: &submission::Model) {
        let record = SubmissionRecord::from(model.clone());
        match serde_json::to_string(&record) {
            Ok(payload) => self.hub.publish(&model.user_uuid, payload).await,
            Err(e) => {
                warn!(submission_id = model.id, error = %e, "Failed to encode status event");
            }
        }
    }
}

async fn find_assignment_by_order<C: ConnectionTrait>(
    db: &C,
    assignment_order: i32,
) -> Result<Option<assignment::Model>, AppError> {
    Ok(assignment::Entity::find()
        .filter(assignment::Column::AssignmentOrder.eq(assignment_order))
        .one(db)
        .await?)
}

async fn find_submission<C: ConnectionTrait>(
    db: &C,
    assignment_id: i32,
    user_uuid: &str,
) -> Result<Option<submission::Model>, AppError> {
    Ok(submission::Entity::find()
        .filter(submission::Column::AssignmentId.eq(assignment_id))
        .filter(submission::Column::UserUuid.eq(user_uuid))
        .one(db)
        .await?)
}

async fn find_submission_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
    user_uuid: &str,
) -> Result<Option<submission::Model>, AppError> {
    Ok(submission::Entity::find_by_id(id)
        .filter(submission::Column::UserUuid.eq(user_uuid))
        .one(db)
        .await?)
}
