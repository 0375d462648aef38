use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fanout API",
        version = "0.1.0",
        description = "Peer node of a fixed cluster. POST /task fans the task out to every other node and aggregates their answers; POST /subtask is the worker side.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local node 1"),
        (url = "http://localhost:3001", description = "Local node 2"),
        (url = "http://localhost:3002", description = "Local node 3")
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::metrics::metrics,
        crate::handlers::task::submit_task,
        crate::handlers::subtask::submit_subtask,
    ),
    components(
        schemas(
            fanout::RequestId,
            fanout::TaskRequest,
            fanout::SubtaskRequest,
            fanout::SubtaskResponse,
            fanout::PeerOutcome,
            fanout::AggregateResult,
        )
    ),
    tags(
        (name = "health", description = "Liveness and metrics"),
        (name = "tasks", description = "Task fan-out and subtask processing"),
    )
)]
pub struct ApiDoc;
