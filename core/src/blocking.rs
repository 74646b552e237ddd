//! One blocking request per operation.
//!
//! `BlockingClient` pairs every `WalletClient::build_*` / `parse_*` couple
//! with a single round-trip through a `Transport`. It adds no state of its
//! own: no retries, no caching, nothing shared between calls.

use std::path::Path;

use serde_json::{Map, Value};

use crate::client::WalletClient;
use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{
    AttachedLocation, Location, NewProject, NewTemplate, Page, Pass, Project, ProjectUpdate,
    ResourceId, Tag, Template, TemplateHeader, TemplateUpdate,
};

#[cfg(feature = "blocking")]
use crate::transport::UreqTransport;

#[derive(Debug, Clone)]
pub struct BlockingClient<T> {
    client: WalletClient,
    transport: T,
}

#[cfg(feature = "blocking")]
impl BlockingClient<UreqTransport> {
    pub fn new(client: WalletClient) -> Self {
        Self::with_transport(client, UreqTransport::new())
    }

    /// Client configured from `WALLET_API_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(WalletClient::from_env()?))
    }
}

impl<T: Transport> BlockingClient<T> {
    pub fn with_transport(client: WalletClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &WalletClient {
        &self.client
    }

    fn call<R>(
        &self,
        request: Result<HttpRequest>,
        parse: impl FnOnce(&WalletClient, HttpResponse) -> Result<R>,
    ) -> Result<R> {
        let request = request?;
        log::debug!("{} {}", request.method, request.path);
        let response = self.transport.execute(request)?;
        parse(&self.client, response)
    }

    // Passes

    pub fn list_passes(&self, page: Page) -> Result<Vec<Pass>> {
        self.call(self.client.build_list_passes(page), WalletClient::parse_list_passes)
    }

    pub fn get_pass(&self, pass: impl Into<ResourceId>) -> Result<Pass> {
        self.call(self.client.build_get_pass(pass), WalletClient::parse_get_pass)
    }

    pub fn create_pass(
        &self,
        template: impl Into<ResourceId>,
        external_id: Option<&str>,
        fields: &Map<String, Value>,
    ) -> Result<Pass> {
        self.call(
            self.client.build_create_pass(template, external_id, fields),
            WalletClient::parse_create_pass,
        )
    }

    pub fn update_pass(
        &self,
        pass: impl Into<ResourceId>,
        fields: &Map<String, Value>,
    ) -> Result<Pass> {
        self.call(
            self.client.build_update_pass(pass, fields),
            WalletClient::parse_update_pass,
        )
    }

    /// Push the locally modified fields of `pass` and record the URL the
    /// server returns for it.
    pub fn update_existing_pass(&self, pass: &mut Pass) -> Result<()> {
        let updated = self.call(
            self.client.build_update_existing_pass(pass),
            WalletClient::parse_update_pass,
        )?;
        pass.url = updated.url;
        Ok(())
    }

    pub fn delete_pass(&self, pass: impl Into<ResourceId>) -> Result<()> {
        self.call(self.client.build_delete_pass(pass), WalletClient::parse_delete_pass)
    }

    pub fn view_pass_json(&self, pass: impl Into<ResourceId>) -> Result<Value> {
        self.call(
            self.client.build_view_pass_json(pass),
            WalletClient::parse_view_pass_json,
        )
    }

    pub fn download_pass(&self, pass: impl Into<ResourceId>) -> Result<Vec<u8>> {
        self.call(
            self.client.build_download_pass(pass),
            WalletClient::parse_download_pass,
        )
    }

    /// Download the `.pkpass` archive into `to`, creating or truncating it.
    pub fn download_pass_to(&self, pass: impl Into<ResourceId>, to: impl AsRef<Path>) -> Result<()> {
        let bytes = self.download_pass(pass)?;
        std::fs::write(to, bytes)?;
        Ok(())
    }

    pub fn push_pass(&self, pass: impl Into<ResourceId>) -> Result<Value> {
        self.call(self.client.build_push_pass(pass), WalletClient::parse_push_pass)
    }

    pub fn get_pass_tags(&self, pass: impl Into<ResourceId>) -> Result<Vec<Tag>> {
        self.call(
            self.client.build_get_pass_tags(pass),
            WalletClient::parse_get_pass_tags,
        )
    }

    pub fn add_pass_tags<S: AsRef<str>>(
        &self,
        pass: impl Into<ResourceId>,
        tags: &[S],
    ) -> Result<Vec<String>> {
        self.call(
            self.client.build_add_pass_tags(pass, tags),
            WalletClient::parse_add_pass_tags,
        )
    }

    pub fn add_pass_tag(&self, pass: impl Into<ResourceId>, tag: &str) -> Result<Vec<String>> {
        self.call(
            self.client.build_add_pass_tag(pass, tag),
            WalletClient::parse_add_pass_tags,
        )
    }

    pub fn add_pass_locations(
        &self,
        pass: impl Into<ResourceId>,
        locations: &[Location],
    ) -> Result<Vec<AttachedLocation>> {
        self.call(
            self.client.build_add_pass_locations(pass, locations),
            WalletClient::parse_add_pass_locations,
        )
    }

    pub fn delete_pass_location(&self, pass: impl Into<ResourceId>, location_id: i64) -> Result<()> {
        self.call(
            self.client.build_delete_pass_location(pass, location_id),
            WalletClient::parse_delete_pass_location,
        )
    }

    // Projects

    pub fn list_projects(&self, page: Page) -> Result<Vec<Project>> {
        self.call(
            self.client.build_list_projects(page),
            WalletClient::parse_list_projects,
        )
    }

    pub fn get_project(&self, project: impl Into<ResourceId>) -> Result<Project> {
        self.call(self.client.build_get_project(project), WalletClient::parse_get_project)
    }

    pub fn create_project(&self, input: &NewProject) -> Result<Project> {
        self.call(
            self.client.build_create_project(input),
            WalletClient::parse_create_project,
        )
    }

    pub fn update_project(
        &self,
        project: impl Into<ResourceId>,
        input: &ProjectUpdate,
    ) -> Result<Project> {
        self.call(
            self.client.build_update_project(project, input),
            WalletClient::parse_update_project,
        )
    }

    pub fn delete_project(&self, project: impl Into<ResourceId>) -> Result<()> {
        self.call(
            self.client.build_delete_project(project),
            WalletClient::parse_delete_project,
        )
    }

    // Templates

    pub fn list_template_headers(&self, page: Option<Page>) -> Result<Vec<TemplateHeader>> {
        self.call(
            self.client.build_list_template_headers(page),
            WalletClient::parse_list_template_headers,
        )
    }

    pub fn get_template(&self, template: impl Into<ResourceId>) -> Result<Template> {
        self.call(
            self.client.build_get_template(template),
            WalletClient::parse_get_template,
        )
    }

    /// Returns the id of the new template.
    pub fn create_template(&self, input: &NewTemplate) -> Result<i64> {
        self.call(
            self.client.build_create_template(input),
            WalletClient::parse_create_template,
        )
    }

    pub fn update_template(
        &self,
        template: impl Into<ResourceId>,
        input: &TemplateUpdate,
    ) -> Result<i64> {
        self.call(
            self.client.build_update_template(template, input),
            WalletClient::parse_update_template,
        )
    }

    /// Returns the id of the copy.
    pub fn duplicate_template(&self, template: impl Into<ResourceId>) -> Result<i64> {
        self.call(
            self.client.build_duplicate_template(template),
            WalletClient::parse_duplicate_template,
        )
    }

    pub fn delete_template(&self, template: impl Into<ResourceId>) -> Result<()> {
        self.call(
            self.client.build_delete_template(template),
            WalletClient::parse_delete_template,
        )
    }

    pub fn add_template_locations(
        &self,
        template: impl Into<ResourceId>,
        locations: &[Location],
    ) -> Result<Vec<AttachedLocation>> {
        self.call(
            self.client.build_add_template_locations(template, locations),
            WalletClient::parse_add_template_locations,
        )
    }

    pub fn delete_template_location(
        &self,
        template: impl Into<ResourceId>,
        location_id: i64,
    ) -> Result<()> {
        self.call(
            self.client.build_delete_template_location(template, location_id),
            WalletClient::parse_delete_template_location,
        )
    }
}
