use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// Timestamp reported for every resource; the mock has no clock.
pub const CREATED_AT: &str = "2024-01-15T09:30:00Z";

#[derive(Clone, Debug, Default)]
pub struct StoredPass {
    pub id: i64,
    pub template_id: i64,
    pub external_id: Option<String>,
    pub fields: Map<String, Value>,
    pub tags: Vec<String>,
    pub locations: Vec<(i64, Value)>,
}

#[derive(Clone, Debug, Default)]
pub struct StoredProject {
    pub id: i64,
    pub external_id: Option<String>,
    pub name: String,
    pub description: String,
    pub project_type: String,
}

#[derive(Clone, Debug, Default)]
pub struct StoredTemplate {
    pub id: i64,
    pub project_id: Option<i64>,
    pub external_id: Option<String>,
    pub name: String,
    pub description: String,
    pub template_type: String,
    pub headers: Map<String, Value>,
    pub fields: Map<String, Value>,
    pub locations: Vec<(i64, Value)>,
}

#[derive(Debug, Default)]
pub struct Store {
    next_id: i64,
    pub passes: BTreeMap<i64, StoredPass>,
    pub projects: BTreeMap<i64, StoredProject>,
    pub templates: BTreeMap<i64, StoredTemplate>,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn pass_id(&self, params: &HashMap<String, String>) -> Option<i64> {
        match params.get("external_id") {
            Some(external) => self
                .passes
                .values()
                .find(|p| p.external_id.as_deref() == Some(external.as_str()))
                .map(|p| p.id),
            None => params
                .get("id")
                .and_then(|id| id.parse().ok())
                .filter(|id| self.passes.contains_key(id)),
        }
    }

    fn project_id(&self, params: &HashMap<String, String>) -> Option<i64> {
        match params.get("external_id") {
            Some(external) => self
                .projects
                .values()
                .find(|p| p.external_id.as_deref() == Some(external.as_str()))
                .map(|p| p.id),
            None => params
                .get("id")
                .and_then(|id| id.parse().ok())
                .filter(|id| self.projects.contains_key(id)),
        }
    }

    fn template_id(&self, params: &HashMap<String, String>) -> Option<i64> {
        match params.get("external_id") {
            Some(external) => self
                .templates
                .values()
                .find(|t| t.external_id.as_deref() == Some(external.as_str()))
                .map(|t| t.id),
            None => params
                .get("id")
                .and_then(|id| id.parse().ok())
                .filter(|id| self.templates.contains_key(id)),
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

type Params = Path<HashMap<String, String>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        // passes
        .route("/pass", get(list_passes))
        .route(
            "/pass/{id}",
            get(get_pass).put(update_pass).delete(delete_pass).post(create_pass),
        )
        .route(
            "/pass/id/{external_id}",
            get(get_pass).put(update_pass).delete(delete_pass),
        )
        .route("/pass/{id}/id/{pass_external_id}", post(create_pass))
        .route("/pass/id/{external_id}/id/{pass_external_id}", post(create_pass))
        .route("/pass/{id}/tags", get(get_tags).put(add_tags))
        .route("/pass/id/{external_id}/tags", get(get_tags).put(add_tags))
        .route("/pass/{id}/push", put(push_pass))
        .route("/pass/id/{external_id}/push", put(push_pass))
        .route("/pass/{id}/download", get(download_pass))
        .route("/pass/id/{external_id}/download", get(download_pass))
        .route("/pass/{id}/viewJSONPass", get(view_pass_json))
        .route("/pass/id/{external_id}/viewJSONPass", get(view_pass_json))
        .route("/pass/{id}/locations", post(add_pass_locations))
        .route("/pass/id/{external_id}/locations", post(add_pass_locations))
        .route("/pass/{id}/location/{location_id}", delete(delete_pass_location))
        .route(
            "/pass/id/{external_id}/location/{location_id}",
            delete(delete_pass_location),
        )
        // projects
        .route("/project", get(list_projects).post(create_plain_project))
        .route(
            "/project/{id}",
            get(get_project).put(update_project).delete(delete_project).post(create_project),
        )
        .route(
            "/project/id/{external_id}",
            get(get_project).put(update_project).delete(delete_project).post(create_project),
        )
        // templates
        .route("/template", post(create_plain_template))
        .route("/template/headers", get(list_template_headers))
        .route(
            "/template/{id}",
            get(get_template).put(update_template).delete(delete_template).post(create_template),
        )
        .route(
            "/template/id/{external_id}",
            get(get_template).put(update_template).delete(delete_template).post(create_template),
        )
        .route("/template/{id}/id/{external_id}", post(create_template))
        .route("/template/duplicate/{id}", post(duplicate_template))
        .route("/template/duplicate/id/{external_id}", post(duplicate_template))
        .route("/template/{id}/locations", post(add_template_locations))
        .route("/template/id/{external_id}/locations", post(add_template_locations))
        .route("/template/{id}/location/{location_id}", delete(delete_template_location))
        .route(
            "/template/id/{external_id}/location/{location_id}",
            delete(delete_template_location),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

#[derive(Deserialize)]
pub struct Paging {
    #[serde(rename = "pageSize")]
    pub page_size: Option<usize>,
    pub page: Option<usize>,
}

impl Paging {
    fn slice<T>(&self, items: impl Iterator<Item = T>) -> Vec<T> {
        let size = self.page_size.unwrap_or(10).max(1);
        let page = self.page.unwrap_or(1).max(1);
        items.skip((page - 1) * size).take(size).collect()
    }
}

fn success() -> Json<Value> {
    Json(json!({"status": "success"}))
}

// --- passes ---

/// Pass ids come back as numbers and template ids as strings, the way the
/// real service mixes them.
pub fn pass_json(pass: &StoredPass) -> Value {
    json!({
        "id": pass.id,
        "templateId": pass.template_id.to_string(),
        "externalId": pass.external_id,
        "url": format!("https://wallet.example/pass/{}", pass.id),
        "fields": pass.fields,
        "headers": {},
        "createdAt": CREATED_AT,
    })
}

async fn list_passes(State(db): State<Db>, Query(paging): Query<Paging>) -> Json<Value> {
    let store = db.read().await;
    let passes: Vec<Value> = paging.slice(store.passes.values()).into_iter().map(pass_json).collect();
    Json(json!({"count": store.passes.len(), "passes": passes}))
}

async fn create_pass(
    State(db): State<Db>,
    Path(params): Params,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let template_id = store.template_id(&params).ok_or(StatusCode::NOT_FOUND)?;
    let external_id = params.get("pass_external_id").cloned();
    if external_id.is_some()
        && store
            .passes
            .values()
            .any(|p| p.external_id == external_id)
    {
        return Err(StatusCode::CONFLICT);
    }
    let pass = StoredPass {
        id: store.next_id(),
        template_id,
        external_id,
        fields,
        ..StoredPass::default()
    };
    log::info!("created pass {} on template {template_id}", pass.id);
    let body = pass_json(&pass);
    store.passes.insert(pass.id, pass);
    Ok(Json(body))
}

async fn get_pass(State(db): State<Db>, Path(params): Params) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    let id = store.pass_id(&params).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(pass_json(&store.passes[&id])))
}

async fn update_pass(
    State(db): State<Db>,
    Path(params): Params,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let id = store.pass_id(&params).ok_or(StatusCode::NOT_FOUND)?;
    let pass = store.passes.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    pass.fields.extend(fields);
    Ok(Json(pass_json(pass)))
}

async fn delete_pass(State(db): State<Db>, Path(params): Params) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let id = store.pass_id(&params).ok_or(StatusCode::NOT_FOUND)?;
    store.passes.remove(&id);
    log::info!("deleted pass {id}");
    Ok(success())
}

async fn get_tags(State(db): State<Db>, Path(params): Params) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    let id = store.pass_id(&params).ok_or(StatusCode::NOT_FOUND)?;
    let tags: Vec<Value> = store.passes[&id]
        .tags
        .iter()
        .enumerate()
        .map(|(i, name)| json!({"id": (i + 1).to_string(), "name": name, "createdAt": CREATED_AT}))
        .collect();
    Ok(Json(json!({"tags": tags})))
}

#[derive(Deserialize)]
pub struct TagsInput {
    pub tags: Vec<String>,
}

async fn add_tags(
    State(db): State<Db>,
    Path(params): Params,
    Json(input): Json<TagsInput>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let id = store.pass_id(&params).ok_or(StatusCode::NOT_FOUND)?;
    let pass = store.passes.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    let mut added = Vec::new();
    for tag in input.tags {
        if !pass.tags.contains(&tag) {
            pass.tags.push(tag.clone());
            added.push(tag);
        }
    }
    Ok(Json(json!({"newTags": added})))
}

async fn push_pass(State(db): State<Db>, Path(params): Params) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    let id = store.pass_id(&params).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({"passId": id, "devices": []})))
}

async fn download_pass(
    State(db): State<Db>,
    Path(params): Params,
) -> Result<impl IntoResponse, StatusCode> {
    let store = db.read().await;
    let id = store.pass_id(&params).ok_or(StatusCode::NOT_FOUND)?;
    let mut archive = b"PK\x03\x04".to_vec();
    archive.extend_from_slice(format!("pass-{id}").as_bytes());
    Ok(([(header::CONTENT_TYPE, "application/vnd.apple.pkpass")], archive))
}

async fn view_pass_json(State(db): State<Db>, Path(params): Params) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    let id = store.pass_id(&params).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({
        "formatVersion": 1,
        "serialNumber": id.to_string(),
        "passTypeIdentifier": "pass.example.mock",
    })))
}

fn attach(store_next: i64, locations: &mut Vec<(i64, Value)>, input: Vec<Value>, key: &str) -> Vec<Value> {
    let mut next = store_next;
    input
        .into_iter()
        .map(|value| {
            next += 1;
            locations.push((next, value.clone()));
            let mut attached = Map::new();
            attached.insert(key.to_string(), Value::String(next.to_string()));
            attached.insert("value".to_string(), value);
            Value::Object(attached)
        })
        .collect()
}

async fn add_pass_locations(
    State(db): State<Db>,
    Path(params): Params,
    Json(input): Json<Vec<Value>>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let id = store.pass_id(&params).ok_or(StatusCode::NOT_FOUND)?;
    let base = store.next_id;
    store.next_id += input.len() as i64;
    let pass = store.passes.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(Value::Array(attach(base, &mut pass.locations, input, "passLocationId"))))
}

async fn delete_pass_location(
    State(db): State<Db>,
    Path(params): Params,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let id = store.pass_id(&params).ok_or(StatusCode::NOT_FOUND)?;
    let location_id = location_param(&params)?;
    let pass = store.passes.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    remove_location(&mut pass.locations, location_id)?;
    Ok(success())
}

fn location_param(params: &HashMap<String, String>) -> Result<i64, StatusCode> {
    params
        .get("location_id")
        .and_then(|id| id.parse().ok())
        .ok_or(StatusCode::BAD_REQUEST)
}

fn remove_location(locations: &mut Vec<(i64, Value)>, location_id: i64) -> Result<(), StatusCode> {
    let before = locations.len();
    locations.retain(|(id, _)| *id != location_id);
    if locations.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(())
}

// --- projects ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub name: String,
    pub description: String,
    pub project_type: Option<String>,
}

fn project_json(store: &Store, project: &StoredProject) -> Value {
    let templates: Vec<Value> = store
        .templates
        .values()
        .filter(|t| t.project_id == Some(project.id))
        .map(|t| template_json(store, t))
        .collect();
    json!({
        "id": project.id.to_string(),
        "name": project.name,
        "description": project.description,
        "projectType": project.project_type,
        "templates": templates,
    })
}

async fn list_projects(State(db): State<Db>, Query(paging): Query<Paging>) -> Json<Value> {
    let store = db.read().await;
    let projects: Vec<Value> = paging
        .slice(store.projects.values())
        .into_iter()
        .map(|p| project_json(&store, p))
        .collect();
    Json(json!({"count": store.projects.len(), "projects": projects}))
}

async fn create_plain_project(
    State(db): State<Db>,
    Json(input): Json<ProjectInput>,
) -> Result<Json<Value>, StatusCode> {
    insert_project(&db, &HashMap::new(), input).await
}

/// Create under an external id, or from the layout named by `id`.
async fn create_project(
    State(db): State<Db>,
    Path(params): Params,
    Json(input): Json<ProjectInput>,
) -> Result<Json<Value>, StatusCode> {
    insert_project(&db, &params, input).await
}

async fn insert_project(
    db: &Db,
    params: &HashMap<String, String>,
    input: ProjectInput,
) -> Result<Json<Value>, StatusCode> {
    let project_type = input.project_type.ok_or(StatusCode::BAD_REQUEST)?;
    let mut store = db.write().await;
    let external_id = params.get("external_id").cloned();
    if external_id.is_some()
        && store
            .projects
            .values()
            .any(|p| p.external_id == external_id)
    {
        return Err(StatusCode::CONFLICT);
    }
    let project = StoredProject {
        id: store.next_id(),
        external_id,
        name: input.name,
        description: input.description,
        project_type,
    };
    log::info!("created project {}", project.id);
    let body = project_json(&store, &project);
    store.projects.insert(project.id, project);
    Ok(Json(body))
}

async fn get_project(State(db): State<Db>, Path(params): Params) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    let id = store.project_id(&params).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(project_json(&store, &store.projects[&id])))
}

async fn update_project(
    State(db): State<Db>,
    Path(params): Params,
    Json(input): Json<ProjectInput>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let id = store.project_id(&params).ok_or(StatusCode::NOT_FOUND)?;
    let project = store.projects.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    project.name = input.name;
    project.description = input.description;
    let project = project.clone();
    Ok(Json(project_json(&store, &project)))
}

async fn delete_project(State(db): State<Db>, Path(params): Params) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let id = store.project_id(&params).ok_or(StatusCode::NOT_FOUND)?;
    store.projects.remove(&id);
    log::info!("deleted project {id}");
    Ok(success())
}

// --- templates ---

#[derive(Deserialize)]
pub struct TemplateInput {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub template_type: String,
    #[serde(default)]
    pub headers: Map<String, Value>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub template_type: Option<String>,
    pub headers: Option<Map<String, Value>>,
    pub fields: Option<Map<String, Value>>,
}

/// Header scalars are deliberately loosely typed: string ids, string and
/// numeric flags.
pub fn template_header_json(store: &Store, template: &StoredTemplate) -> Value {
    let project_type = template
        .project_id
        .and_then(|id| store.projects.get(&id))
        .map(|p| p.project_type.clone());
    json!({
        "id": template.id.to_string(),
        "projectId": template.project_id,
        "name": template.name,
        "description": template.description,
        "type": template.template_type,
        "projectType": project_type,
        "vendor": "Apple",
        "vendorId": "1",
        "createdAt": CREATED_AT,
        "updatedAt": "2024-01-16",
        "disabled": "false",
        "deleted": 0,
        "headers": template.headers,
    })
}

fn template_json(store: &Store, template: &StoredTemplate) -> Value {
    json!({
        "templateHeader": template_header_json(store, template),
        "fieldsModel": template.fields,
    })
}

async fn list_template_headers(State(db): State<Db>, Query(paging): Query<Paging>) -> Json<Value> {
    let store = db.read().await;
    let headers: Vec<Value> = paging
        .slice(store.templates.values())
        .into_iter()
        .map(|t| template_header_json(&store, t))
        .collect();
    Json(json!({"count": store.templates.len(), "templateHeaders": headers}))
}

async fn create_plain_template(
    State(db): State<Db>,
    Json(input): Json<TemplateInput>,
) -> Result<Json<Value>, StatusCode> {
    insert_template(&db, &HashMap::new(), input).await
}

/// Create in the project named by `id`, under an external id, or both.
async fn create_template(
    State(db): State<Db>,
    Path(params): Params,
    Json(input): Json<TemplateInput>,
) -> Result<Json<Value>, StatusCode> {
    insert_template(&db, &params, input).await
}

async fn insert_template(
    db: &Db,
    params: &HashMap<String, String>,
    input: TemplateInput,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let project_id = match params.get("id") {
        Some(id) => {
            let id: i64 = id.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
            if !store.projects.contains_key(&id) {
                return Err(StatusCode::NOT_FOUND);
            }
            Some(id)
        }
        None => None,
    };
    let external_id = params.get("external_id").cloned();
    if external_id.is_some()
        && store
            .templates
            .values()
            .any(|t| t.external_id == external_id)
    {
        return Err(StatusCode::CONFLICT);
    }
    let template = StoredTemplate {
        id: store.next_id(),
        project_id,
        external_id,
        name: input.name,
        description: input.description,
        template_type: input.template_type,
        headers: input.headers,
        fields: input.fields,
        locations: Vec::new(),
    };
    log::info!("created template {}", template.id);
    let id = template.id;
    store.templates.insert(id, template);
    Ok(Json(json!({"templateId": id.to_string()})))
}

async fn get_template(State(db): State<Db>, Path(params): Params) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    let id = store.template_id(&params).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(template_json(&store, &store.templates[&id])))
}

async fn update_template(
    State(db): State<Db>,
    Path(params): Params,
    Json(patch): Json<TemplatePatch>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let id = store.template_id(&params).ok_or(StatusCode::NOT_FOUND)?;
    let template = store.templates.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = patch.name {
        template.name = name;
    }
    if let Some(description) = patch.description {
        template.description = description;
    }
    if let Some(template_type) = patch.template_type {
        template.template_type = template_type;
    }
    if let Some(headers) = patch.headers {
        template.headers = headers;
    }
    if let Some(fields) = patch.fields {
        template.fields = fields;
    }
    Ok(Json(json!({"templateId": id})))
}

async fn duplicate_template(
    State(db): State<Db>,
    Path(params): Params,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let id = store.template_id(&params).ok_or(StatusCode::NOT_FOUND)?;
    let mut copy = store.templates[&id].clone();
    copy.id = store.next_id();
    copy.external_id = None;
    copy.locations.clear();
    let copy_id = copy.id;
    store.templates.insert(copy_id, copy);
    log::info!("duplicated template {id} as {copy_id}");
    Ok(Json(json!({"templateId": copy_id})))
}

async fn delete_template(State(db): State<Db>, Path(params): Params) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let id = store.template_id(&params).ok_or(StatusCode::NOT_FOUND)?;
    store.templates.remove(&id);
    log::info!("deleted template {id}");
    Ok(success())
}

async fn add_template_locations(
    State(db): State<Db>,
    Path(params): Params,
    Json(input): Json<Vec<Value>>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let id = store.template_id(&params).ok_or(StatusCode::NOT_FOUND)?;
    let base = store.next_id;
    store.next_id += input.len() as i64;
    let template = store.templates.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(Value::Array(attach(
        base,
        &mut template.locations,
        input,
        "templateLocationId",
    ))))
}

async fn delete_template_location(
    State(db): State<Db>,
    Path(params): Params,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let id = store.template_id(&params).ok_or(StatusCode::NOT_FOUND)?;
    let location_id = location_param(&params)?;
    let template = store.templates.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    remove_location(&mut template.locations, location_id)?;
    Ok(success())
}
