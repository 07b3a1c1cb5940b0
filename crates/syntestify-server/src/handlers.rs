//! HTTP request handlers for the Syntestify API.
//!
//! Implements the generate/delete test-case endpoints and project /
//! requirement CRUD using axum. All failures cross this boundary as
//! [`ApiError`] and become structured JSON.

use crate::error::ApiError;
use axum::extract::{Path, State};
use axum::response::Json;
use axum::routing::{get, post, put};
use axum::Router;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard};
use syntestify_domain::traits::{CompletionProvider, TestCaseStore};
use syntestify_domain::{
    Project, ProjectId, Requirement, RequirementId, TestCase, TestCaseId, TestCaseKind,
};
use syntestify_generator::{GenerationRequest, Generator};
use syntestify_store::SqliteStore;

/// Shared application state
pub struct AppState<P: CompletionProvider> {
    /// Present only when a completion credential is configured
    pub generator: Option<Arc<Generator<P, SqliteStore>>>,
    /// Persistence gateway, shared with the generator
    pub store: Arc<Mutex<SqliteStore>>,
}

impl<P: CompletionProvider> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            generator: self.generator.clone(),
            store: Arc::clone(&self.store),
        }
    }
}

fn lock_store<P: CompletionProvider>(
    state: &AppState<P>,
) -> Result<MutexGuard<'_, SqliteStore>, ApiError> {
    state
        .store
        .lock()
        .map_err(|e| ApiError::Store(format!("Store lock error: {}", e)))
}

/// Request body for `POST /api/generate-test-cases`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTestCasesRequest {
    /// Requirement title, embedded verbatim in the prompt
    pub title: String,
    /// Requirement description, embedded verbatim in the prompt
    pub description: String,
    /// Requirement the generated test cases belong to
    pub requirement_id: RequirementId,
}

/// Response body for `POST /api/generate-test-cases`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTestCasesResponse {
    /// Content of the test cases inserted by this request
    pub test_cases: Vec<String>,
    /// Present when nothing new was inserted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Request body for `DELETE /api/generate-test-cases`
#[derive(Debug, Deserialize)]
pub struct DeleteTestCaseRequest {
    /// Test case to delete
    #[serde(default)]
    pub id: Option<String>,
}

/// Generic acknowledgement body
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    /// Always true on the success path
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Liveness status
    pub status: String,
}

/// POST /api/generate-test-cases - Generate and persist test cases
///
/// Runs the full pipeline: prompt, completion, parse, dedup, insert. An
/// empty survivor set is a success with an explanatory message, not an
/// error.
async fn generate_test_cases<P>(
    State(state): State<AppState<P>>,
    Json(request): Json<GenerateTestCasesRequest>,
) -> Result<Json<GenerateTestCasesResponse>, ApiError>
where
    P: CompletionProvider + Send + Sync + 'static,
    P::Error: Display,
{
    let generator = state.generator.as_ref().ok_or(ApiError::MissingApiKey)?;

    let outcome = generator
        .generate(GenerationRequest {
            requirement_id: request.requirement_id,
            title: request.title,
            description: request.description,
        })
        .await?;

    let message = if outcome.test_cases.is_empty() {
        Some("No new unique test cases generated.".to_string())
    } else {
        None
    };

    Ok(Json(GenerateTestCasesResponse {
        test_cases: outcome.test_cases,
        message,
    }))
}

/// DELETE /api/generate-test-cases - Delete one test case by id
///
/// A missing or empty id is a client error raised before the store is
/// touched. Deleting an absent id is not distinguished from deleting a
/// present one.
async fn delete_test_case<P>(
    State(state): State<AppState<P>>,
    Json(request): Json<DeleteTestCaseRequest>,
) -> Result<Json<SuccessResponse>, ApiError>
where
    P: CompletionProvider,
{
    let raw = request
        .id
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingField("Missing test case id"))?;
    let id: TestCaseId = raw
        .parse()
        .map_err(|_| ApiError::InvalidId("Invalid test case id"))?;

    lock_store(&state)?.delete_test_case(id)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// Request body for creating a project
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    /// Display title
    pub title: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
}

/// POST /api/projects
async fn create_project<P>(
    State(state): State<AppState<P>>,
    Json(request): Json<CreateProjectRequest>,
) -> Result<Json<Project>, ApiError>
where
    P: CompletionProvider,
{
    if request.title.trim().is_empty() {
        return Err(ApiError::MissingField("Missing project title"));
    }
    let project = Project::new(request.title, request.description);
    lock_store(&state)?.create_project(project.clone())?;
    Ok(Json(project))
}

/// GET /api/projects
async fn list_projects<P>(
    State(state): State<AppState<P>>,
) -> Result<Json<Vec<Project>>, ApiError>
where
    P: CompletionProvider,
{
    Ok(Json(lock_store(&state)?.list_projects()?))
}

/// GET /api/projects/{id}
async fn get_project<P>(
    State(state): State<AppState<P>>,
    Path(id): Path<ProjectId>,
) -> Result<Json<Project>, ApiError>
where
    P: CompletionProvider,
{
    let project = lock_store(&state)?
        .get_project(id)?
        .ok_or(ApiError::NotFound("Project not found"))?;
    Ok(Json(project))
}

/// DELETE /api/projects/{id}
async fn delete_project<P>(
    State(state): State<AppState<P>>,
    Path(id): Path<ProjectId>,
) -> Result<Json<SuccessResponse>, ApiError>
where
    P: CompletionProvider,
{
    lock_store(&state)?.delete_project(id)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// Request body for creating or editing a requirement
#[derive(Debug, Deserialize)]
pub struct RequirementBodyRequest {
    /// Display title
    pub title: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
}

/// GET /api/projects/{id}/requirements
async fn list_requirements<P>(
    State(state): State<AppState<P>>,
    Path(id): Path<ProjectId>,
) -> Result<Json<Vec<Requirement>>, ApiError>
where
    P: CompletionProvider,
{
    let store = lock_store(&state)?;
    store
        .get_project(id)?
        .ok_or(ApiError::NotFound("Project not found"))?;
    Ok(Json(store.list_requirements(id)?))
}

/// POST /api/projects/{id}/requirements
async fn create_requirement<P>(
    State(state): State<AppState<P>>,
    Path(id): Path<ProjectId>,
    Json(request): Json<RequirementBodyRequest>,
) -> Result<Json<Requirement>, ApiError>
where
    P: CompletionProvider,
{
    if request.title.trim().is_empty() {
        return Err(ApiError::MissingField("Missing requirement title"));
    }
    let mut store = lock_store(&state)?;
    store
        .get_project(id)?
        .ok_or(ApiError::NotFound("Project not found"))?;
    let requirement = Requirement::new(id, request.title, request.description);
    store.create_requirement(requirement.clone())?;
    Ok(Json(requirement))
}

/// PUT /api/requirements/{id}
async fn update_requirement<P>(
    State(state): State<AppState<P>>,
    Path(id): Path<RequirementId>,
    Json(request): Json<RequirementBodyRequest>,
) -> Result<Json<Requirement>, ApiError>
where
    P: CompletionProvider,
{
    if request.title.trim().is_empty() {
        return Err(ApiError::MissingField("Missing requirement title"));
    }
    let mut store = lock_store(&state)?;
    let updated = store.update_requirement(id, &request.title, &request.description)?;
    if !updated {
        return Err(ApiError::NotFound("Requirement not found"));
    }
    let requirement = store
        .get_requirement(id)?
        .ok_or(ApiError::NotFound("Requirement not found"))?;
    Ok(Json(requirement))
}

/// DELETE /api/requirements/{id}
async fn delete_requirement<P>(
    State(state): State<AppState<P>>,
    Path(id): Path<RequirementId>,
) -> Result<Json<SuccessResponse>, ApiError>
where
    P: CompletionProvider,
{
    lock_store(&state)?.delete_requirement(id)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// Request body for manual test-case authoring
#[derive(Debug, Deserialize)]
pub struct CreateTestCaseRequest {
    /// Test case content, title line plus numbered steps
    #[serde(default)]
    pub content: Option<String>,
}

/// Response body for manual test-case authoring
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestCaseResponse {
    /// The inserted rows (empty when the content already existed)
    pub test_cases: Vec<TestCase>,
    /// Present when nothing was inserted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GET /api/requirements/{id}/test-cases
async fn list_test_cases<P>(
    State(state): State<AppState<P>>,
    Path(id): Path<RequirementId>,
) -> Result<Json<Vec<TestCase>>, ApiError>
where
    P: CompletionProvider,
{
    let store = lock_store(&state)?;
    store
        .get_requirement(id)?
        .ok_or(ApiError::NotFound("Requirement not found"))?;
    Ok(Json(store.list_test_cases(id)?))
}

/// POST /api/requirements/{id}/test-cases - Manually author a test case
///
/// Uses the same duplicate-skipping insert path as generation, so the
/// per-requirement content invariant holds for manual entries too.
async fn create_test_case<P>(
    State(state): State<AppState<P>>,
    Path(id): Path<RequirementId>,
    Json(request): Json<CreateTestCaseRequest>,
) -> Result<Json<CreateTestCaseResponse>, ApiError>
where
    P: CompletionProvider,
{
    let content = request
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or(ApiError::MissingField("Missing test case content"))?;

    let mut store = lock_store(&state)?;
    store
        .get_requirement(id)?
        .ok_or(ApiError::NotFound("Requirement not found"))?;

    let inserted = store.insert_test_cases(id, &[content], TestCaseKind::Manual)?;
    let message = if inserted.is_empty() {
        Some("Duplicate test case.".to_string())
    } else {
        None
    };

    Ok(Json(CreateTestCaseResponse {
        test_cases: inserted,
        message,
    }))
}

/// GET /health - Liveness check
async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "ok".to_string(),
    })
}

/// Create the axum router with all routes
pub fn create_router<P>(state: AppState<P>) -> Router
where
    P: CompletionProvider + Send + Sync + 'static,
    P::Error: Display,
{
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/generate-test-cases",
            post(generate_test_cases::<P>).delete(delete_test_case::<P>),
        )
        .route(
            "/api/projects",
            post(create_project::<P>).get(list_projects::<P>),
        )
        .route(
            "/api/projects/:id",
            get(get_project::<P>).delete(delete_project::<P>),
        )
        .route(
            "/api/projects/:id/requirements",
            get(list_requirements::<P>).post(create_requirement::<P>),
        )
        .route(
            "/api/requirements/:id",
            put(update_requirement::<P>).delete(delete_requirement::<P>),
        )
        .route(
            "/api/requirements/:id/test-cases",
            get(list_test_cases::<P>).post(create_test_case::<P>),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use syntestify_llm::MockProvider;
    use tower::ServiceExt; // for oneshot

    const COMPLETION: &str =
        "- **Login succeeds**\n  1. Enter valid credentials\n  2. Submit\n  3. Verify redirect";
    const PERSISTED: &str =
        "**Login succeeds**\n1. Enter valid credentials\n2. Submit\n3. Verify redirect";

    fn test_state(provider: Option<MockProvider>) -> (AppState<MockProvider>, Requirement) {
        let mut store = SqliteStore::in_memory().unwrap();
        let project = Project::new("Demo", "Demo project");
        let requirement = Requirement::new(project.id, "Login", "Users can log in");
        store.create_project(project).unwrap();
        store.create_requirement(requirement.clone()).unwrap();

        let store = Arc::new(Mutex::new(store));
        let generator = provider
            .map(|p| Arc::new(Generator::new(Arc::new(p), Arc::clone(&store))));

        (AppState { generator, store }, requirement)
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn generate_body(requirement: &Requirement) -> Value {
        json!({
            "title": requirement.title,
            "description": requirement.description,
            "requirementId": requirement.id.to_string(),
        })
    }

    #[tokio::test]
    async fn test_health_check() {
        let (state, _) = test_state(None);
        let app = create_router(state);

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_generate_inserts_and_returns_cases() {
        let (state, requirement) = test_state(Some(MockProvider::new(COMPLETION)));
        let store = Arc::clone(&state.store);
        let app = create_router(state);

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/generate-test-cases",
                generate_body(&requirement),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["testCases"], json!([PERSISTED]));
        assert!(body.get("message").is_none());

        let persisted = store.lock().unwrap().list_test_cases(requirement.id).unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].content, PERSISTED);
    }

    #[tokio::test]
    async fn test_generate_reports_no_new_unique_cases() {
        let (state, requirement) = test_state(Some(MockProvider::new(COMPLETION)));
        state
            .store
            .lock()
            .unwrap()
            .insert_test_cases(
                requirement.id,
                &[PERSISTED.to_string()],
                TestCaseKind::Generated,
            )
            .unwrap();
        let store = Arc::clone(&state.store);
        let app = create_router(state);

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/generate-test-cases",
                generate_body(&requirement),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["testCases"], json!([]));
        assert_eq!(body["message"], "No new unique test cases generated.");
        assert_eq!(
            store.lock().unwrap().list_test_cases(requirement.id).unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_generate_without_api_key_is_config_error() {
        // No credential, no generator: the request fails before any
        // completion call could be attempted
        let (state, requirement) = test_state(None);
        let app = create_router(state);

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/generate-test-cases",
                generate_body(&requirement),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing OpenAI API key");
    }

    #[tokio::test]
    async fn test_generate_surfaces_provider_failure_with_details() {
        let mut provider = MockProvider::new(COMPLETION);
        // The mock fails for the exact prompt the handler will build
        let prompt = syntestify_generator::prompt::PromptBuilder::new("Login", "Users can log in")
            .build();
        provider.add_error(prompt);

        let (state, requirement) = test_state(Some(provider));
        let app = create_router(state);

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/generate-test-cases",
                generate_body(&requirement),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Failed to call OpenAI API");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn test_generate_with_unparseable_completion() {
        let (state, requirement) =
            test_state(Some(MockProvider::new("No test cases here, sorry.")));
        let app = create_router(state);

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/generate-test-cases",
                generate_body(&requirement),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "No test cases generated");
    }

    #[tokio::test]
    async fn test_delete_without_id_is_client_error() {
        let (state, requirement) = test_state(None);
        state
            .store
            .lock()
            .unwrap()
            .insert_test_cases(
                requirement.id,
                &[PERSISTED.to_string()],
                TestCaseKind::Generated,
            )
            .unwrap();
        let store = Arc::clone(&state.store);
        let app = create_router(state);

        let response = app
            .oneshot(json_request(
                Method::DELETE,
                "/api/generate-test-cases",
                json!({}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing test case id");

        // The store was never contacted
        assert_eq!(
            store.lock().unwrap().list_test_cases(requirement.id).unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_delete_test_case_by_id() {
        let (state, requirement) = test_state(None);
        let inserted = state
            .store
            .lock()
            .unwrap()
            .insert_test_cases(
                requirement.id,
                &[PERSISTED.to_string()],
                TestCaseKind::Generated,
            )
            .unwrap();
        let store = Arc::clone(&state.store);
        let app = create_router(state);

        let response = app
            .oneshot(json_request(
                Method::DELETE,
                "/api/generate-test-cases",
                json!({ "id": inserted[0].id.to_string() }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert!(store.lock().unwrap().list_test_cases(requirement.id).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_absent_id_still_succeeds() {
        let (state, _) = test_state(None);
        let app = create_router(state);

        let response = app
            .oneshot(json_request(
                Method::DELETE,
                "/api/generate-test-cases",
                json!({ "id": TestCaseId::new().to_string() }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_project_crud_roundtrip() {
        let (state, _) = test_state(None);
        let app = create_router(state);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/projects",
                json!({ "title": "Billing", "description": "Invoices" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        assert_eq!(created["title"], "Billing");
        let id = created["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/projects/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri(format!("/api/projects/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/projects/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_requirement_create_and_update() {
        let (state, requirement) = test_state(None);
        let project_id = requirement.project_id;
        let app = create_router(state);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                &format!("/api/projects/{}/requirements", project_id),
                json!({ "title": "Signup", "description": "Users can sign up" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        let req_id = created["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                &format!("/api/requirements/{}", req_id),
                json!({ "title": "Signup v2", "description": "With invite codes" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["title"], "Signup v2");

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/projects/{}/requirements", project_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let listed = body_json(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_requirement_create_missing_title() {
        let (state, requirement) = test_state(None);
        let app = create_router(state);

        let response = app
            .oneshot(json_request(
                Method::POST,
                &format!("/api/projects/{}/requirements", requirement.project_id),
                json!({ "title": "   " }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_manual_test_case_skips_duplicate() {
        let (state, requirement) = test_state(None);
        let app = create_router(state);
        let uri = format!("/api/requirements/{}/test-cases", requirement.id);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                &uri,
                json!({ "content": "**Manual check**\n1. Look at it" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["testCases"].as_array().unwrap().len(), 1);

        // Same trimmed content again: nothing inserted
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                &uri,
                json!({ "content": "  **Manual check**\n1. Look at it  " }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["testCases"].as_array().unwrap().is_empty());
        assert_eq!(body["message"], "Duplicate test case.");

        let response = app
            .oneshot(
                Request::builder()
                    .uri(uri.as_str())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let listed = body_json(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["kind"], "manual");
    }

    #[tokio::test]
    async fn test_manual_test_case_missing_content() {
        let (state, requirement) = test_state(None);
        let app = create_router(state);

        let response = app
            .oneshot(json_request(
                Method::POST,
                &format!("/api/requirements/{}/test-cases", requirement.id),
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing test case content");
    }
}
