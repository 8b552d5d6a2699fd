use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::error::ApiError;
use crate::handlers;
use crate::state::AppState;

pub fn app(state: AppState, security: &SecurityConfig) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api", api_routes())
        .fallback(not_found)
        // Global middleware
        .layer(middleware::map_response(method_not_allowed_as_not_found))
        .layer(cors_layer(security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication
        .route("/login", post(handlers::auth::login))
        .merge(project_routes())
        .merge(role_routes())
        .merge(module_routes())
        .merge(sub_module_routes())
        .merge(work_routes())
        .merge(bug_routes())
        .merge(assignment_routes())
        .merge(reference_routes())
}

fn project_routes() -> Router<AppState> {
    use handlers::project;

    Router::new()
        .route("/postNewProject", post(project::post_new_project))
        .route("/getAllProjects", get(project::get_all_projects))
        .route("/getProjectDetails", get(project::get_project_details))
        .route("/getUserProjects", get(project::get_user_projects))
        .route("/putAlterProject", put(project::put_alter_project))
        .route("/dropProject", delete(project::drop_project))
        .route("/getGanttDataOfProject", get(project::get_gantt_data_of_project))
}

fn role_routes() -> Router<AppState> {
    use handlers::role;

    Router::new()
        .route("/getUserProjectRoles", get(role::get_user_project_roles))
        .route("/putUserProjectRole", put(role::put_user_project_role))
}

fn module_routes() -> Router<AppState> {
    use handlers::module;

    Router::new()
        .route("/getModulesOfProject", get(module::get_modules_of_project))
        .route("/getModuleDetails", get(module::get_module_details))
        .route("/postNewModule", post(module::post_new_module))
        .route("/putAlterModule", put(module::put_alter_module))
}

fn sub_module_routes() -> Router<AppState> {
    use handlers::sub_module;

    Router::new()
        .route("/getProjectSubModules", get(sub_module::get_project_sub_modules))
        .route("/postNewSubModule", post(sub_module::post_new_sub_module))
        .route("/putAlterSubModule", put(sub_module::put_alter_sub_module))
        .route("/dropSubModule", delete(sub_module::drop_sub_module))
}

fn work_routes() -> Router<AppState> {
    use handlers::work;

    Router::new()
        .route("/postNewWork", post(work::post_new_work))
        .route("/getSubModuleWorks", get(work::get_sub_module_works))
        .route("/getWorkDetails", get(work::get_work_details))
        .route("/putAlterWork", put(work::put_alter_work))
        .route("/dropWork", delete(work::drop_work))
        .route("/getUserTodoList", get(work::get_user_todo_list))
        .route("/getWorkNameListOfProjectDev", get(work::get_work_name_list_of_project_dev))
}

fn bug_routes() -> Router<AppState> {
    use handlers::bug;

    Router::new()
        .route("/postNewBug", post(bug::post_new_bug))
        .route("/getProjectBugs", get(bug::get_project_bugs))
        .route("/putAlterBug", put(bug::put_alter_bug))
        .route("/getBugDetails", get(bug::get_bug_details))
}

fn assignment_routes() -> Router<AppState> {
    use handlers::assignment;

    Router::new()
        .route("/getUserWorkAssignment", get(assignment::get_user_work_assignment))
        .route("/putAlterUserWorkAssignment", put(assignment::put_alter_user_work_assignment))
}

fn reference_routes() -> Router<AppState> {
    use handlers::reference;

    Router::new()
        .route("/getUsernames", get(reference::get_usernames))
        .route("/getProjectAssignedUsernames", get(reference::get_project_assigned_usernames))
        .route("/getStartBundle", get(reference::get_start_bundle))
        .route("/getProjectAndWorkNames", get(reference::get_project_and_work_names))
        .route("/getDefectCauseList", get(reference::get_defect_cause_list))
}

/// Browser clients are limited to the configured frontend origins.
pub fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(12 * 60 * 60))
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

// A known path with the wrong method is reported like an unknown path.
async fn method_not_allowed_as_not_found(response: Response) -> Response {
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        return ApiError::not_found("Not found").into_response();
    }
    response
}
