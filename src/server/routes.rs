use axum::{
    extract::{Path, State},
    Json,
    http::StatusCode,
};
use serde::Serialize;
use crate::server::AppState;
use crate::contract::CourseUri;
use crate::course::{Course, CourseValues, Summary};
use crate::Error;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct CourseList {
    pub courses: Vec<Course>,
    /// Absent while there are no courses
    pub summary: Option<Summary>,
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: i64,
    pub uri: CourseUri,
}

#[derive(Debug, Serialize)]
pub struct Affected {
    pub rows: usize,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(e: Error) -> ApiError {
    let status = match e {
        Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::CourseNotFound(_) => StatusCode::NOT_FOUND,
        Error::InvalidUri(_) | Error::UnsupportedOperation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse { error: e.to_string() }))
}

/// Zero rows affected means the id does not exist
fn require_rows(id: i64, rows: usize) -> Result<Json<Affected>, ApiError> {
    if rows == 0 {
        Err(api_error(Error::CourseNotFound(id)))
    } else {
        Ok(Json(Affected { rows }))
    }
}

pub async fn list_courses(State(state): State<Arc<AppState>>) -> Result<Json<CourseList>, ApiError> {
    let courses = state.provider.list().map_err(api_error)?;
    let summary = state.provider.summary().map_err(api_error)?;
    Ok(Json(CourseList { courses, summary }))
}

pub async fn create_course(
    State(state): State<Arc<AppState>>,
    Json(values): Json<CourseValues>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    let collection = state.provider.collection_uri();
    let uri = state.provider.insert_at(&collection, &values).map_err(api_error)?;
    let id = uri.id().unwrap_or_default();
    Ok((StatusCode::CREATED, Json(Created { id, uri })))
}

pub async fn get_course(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Course>, ApiError> {
    state
        .provider
        .get(id)
        .map_err(api_error)?
        .map(Json)
        .ok_or_else(|| api_error(Error::CourseNotFound(id)))
}

pub async fn update_course(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(values): Json<CourseValues>,
) -> Result<Json<Affected>, ApiError> {
    let rows = state.provider.update(id, &values).map_err(api_error)?;
    require_rows(id, rows)
}

pub async fn delete_course(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Affected>, ApiError> {
    let rows = state.provider.delete(id).map_err(api_error)?;
    require_rows(id, rows)
}

pub async fn delete_all_courses(State(state): State<Arc<AppState>>) -> Result<Json<Affected>, ApiError> {
    let rows = state.provider.delete_all().map_err(api_error)?;
    Ok(Json(Affected { rows }))
}

pub async fn get_summary(State(state): State<Arc<AppState>>) -> Result<Json<Option<Summary>>, ApiError> {
    let summary = state.provider.summary().map_err(api_error)?;
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::CourseProvider;

    fn state() -> State<Arc<AppState>> {
        State(Arc::new(AppState { provider: CourseProvider::in_memory().unwrap() }))
    }

    #[tokio::test]
    async fn test_create_list_and_summary() {
        let st = state();
        let (status, Json(created)) = create_course(
            State(st.0.clone()),
            Json(CourseValues::new("Algorithms", 4, 95)),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        let json = serde_json::to_value(&created).unwrap();
        assert_eq!(json["uri"], format!("content://coursebook.courses/courses/{}", created.id));

        create_course(State(st.0.clone()), Json(CourseValues::new("History", 3, 85)))
            .await
            .unwrap();

        let Json(list) = list_courses(State(st.0.clone())).await.unwrap();
        assert_eq!(list.courses.len(), 2);
        let summary = list.summary.unwrap();
        assert_eq!(summary.total_credits, 7);
        assert_eq!(summary.average_text(), "90");
    }

    #[tokio::test]
    async fn test_validation_maps_to_422() {
        let st = state();
        let values = CourseValues { name: Some("History".into()), ..Default::default() };
        let (status, _) = create_course(st, Json(values)).await.unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unknown_ids_map_to_404() {
        let st = state();
        let (status, _) = get_course(State(st.0.clone()), Path(7)).await.unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = delete_course(State(st.0.clone()), Path(7)).await.unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = update_course(State(st.0.clone()), Path(7), Json(CourseValues::new("X", 1, 1)))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_all_clears_summary() {
        let st = state();
        st.0.provider.insert(&CourseValues::new("Algorithms", 4, 95)).unwrap();

        let Json(affected) = delete_all_courses(State(st.0.clone())).await.unwrap();
        assert_eq!(affected.rows, 1);
        let Json(summary) = get_summary(State(st.0.clone())).await.unwrap();
        assert!(summary.is_none());
    }
}
