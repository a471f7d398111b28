//! Chart pages and the series behind them.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::Result;
use crate::teacher::TeacherRepository;

/// Chart page model; the front-end picks the bar variant to draw.
#[derive(Debug, Serialize, Deserialize)]
pub struct Page {
    pub chart: String,
}

/// Handler rendering a chart page model.
pub async fn page(Path(no): Path<String>) -> Json<Page> {
    Json(Page { chart: no })
}

/// Raw per-teacher counters, aligned by index.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeacherSeries {
    pub names: Vec<String>,
    pub good: Vec<i32>,
    pub bad: Vec<i32>,
}

/// Handler returning one bar per teacher.
pub async fn teachers_data(
    State(state): State<AppState>,
) -> Result<Json<TeacherSeries>> {
    let teachers =
        TeacherRepository::new(state.db.postgres.clone()).all().await?;

    let mut series = TeacherSeries::default();
    for teacher in teachers {
        series.names.push(teacher.name);
        series.good.push(teacher.good_count);
        series.bad.push(teacher.bad_count);
    }

    Ok(Json(series))
}

/// Mean counters per subject, aligned by index.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectSeries {
    pub names: Vec<String>,
    pub good: Vec<f64>,
    pub bad: Vec<f64>,
}

/// Handler returning one bar per subject; empty subjects never chart.
pub async fn subjects_data(
    State(state): State<AppState>,
) -> Result<Json<SubjectSeries>> {
    let averages = TeacherRepository::new(state.db.postgres.clone())
        .subject_averages()
        .await?;

    let mut series = SubjectSeries::default();
    for average in averages {
        series.names.push(average.name);
        series.good.push(average.good);
        series.bad.push(average.bad);
    }

    Ok(Json(series))
}
