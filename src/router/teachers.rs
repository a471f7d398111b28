//! Teachers of one subject.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::Result;
use crate::subject::{Subject, SubjectRepository};
use crate::teacher::{Teacher, TeacherRepository};

#[derive(Debug, Default, Deserialize)]
pub struct Params {
    sno: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Page {
    pub subject: Subject,
    pub teachers: Vec<Teacher>,
}

/// Handler listing the teachers of the requested subject.
///
/// A missing, malformed or unknown subject number sends the browser
/// back to the subject list instead of erroring.
pub async fn handler(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Response> {
    let Some(sno) = params.sno.as_deref().and_then(|s| s.parse::<i32>().ok())
    else {
        return Ok(Redirect::to("/").into_response());
    };

    let subject = SubjectRepository::new(state.db.postgres.clone())
        .find_by_no(sno)
        .await?;

    match subject {
        Some(subject) => {
            let teachers = TeacherRepository::new(state.db.postgres.clone())
                .by_subject(sno)
                .await?;

            Ok(Json(Page { subject, teachers }).into_response())
        },
        None => Ok(Redirect::to("/").into_response()),
    }
}
