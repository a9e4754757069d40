use common::SubmissionStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub assignment_id: i32,
    #[sea_orm(belongs_to, from = "assignment_id", to = "id")]
    pub assignment: HasOne<super::assignment::Entity>,

    /// Opaque, client-generated identity of the submitter.
    pub user_uuid: String,
    pub code: String,
    /// `pending` from enqueue until the worker reports back.
    pub status: SubmissionStatus,
    /// Runner output; NULL until processed.
    pub grader_feedback: Option<String>,
    pub correct: bool,
    pub last_updated: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
