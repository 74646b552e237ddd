//! Project endpoints, rooted at `<base>/project`.

use super::{parse_empty, parse_json, parse_list, WalletClient};
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{NewProject, Page, Project, ProjectUpdate, ResourceId};

const PROJECT: &str = "project";

impl WalletClient {
    pub fn build_list_projects(&self, page: Page) -> Result<HttpRequest> {
        Ok(self.request(HttpMethod::Get, self.collection_url(PROJECT, &page.query()?)))
    }

    pub fn build_get_project(&self, project: impl Into<ResourceId>) -> Result<HttpRequest> {
        let path = self.resource_url(PROJECT, &project.into(), "")?;
        Ok(self.request(HttpMethod::Get, path))
    }

    pub fn build_create_project(&self, input: &NewProject) -> Result<HttpRequest> {
        let path = self.collection_url(PROJECT, &input.path_suffix()?);
        self.json_request(HttpMethod::Post, path, input)
    }

    pub fn build_update_project(
        &self,
        project: impl Into<ResourceId>,
        input: &ProjectUpdate,
    ) -> Result<HttpRequest> {
        input.validate()?;
        let path = self.resource_url(PROJECT, &project.into(), "")?;
        self.json_request(HttpMethod::Put, path, input)
    }

    pub fn build_delete_project(&self, project: impl Into<ResourceId>) -> Result<HttpRequest> {
        let path = self.resource_url(PROJECT, &project.into(), "")?;
        Ok(self.request(HttpMethod::Delete, path))
    }

    pub fn parse_list_projects(&self, response: HttpResponse) -> Result<Vec<Project>> {
        parse_list(&response, "projects")
    }

    pub fn parse_get_project(&self, response: HttpResponse) -> Result<Project> {
        parse_json(&response)
    }

    pub fn parse_create_project(&self, response: HttpResponse) -> Result<Project> {
        parse_json(&response)
    }

    pub fn parse_update_project(&self, response: HttpResponse) -> Result<Project> {
        parse_json(&response)
    }

    pub fn parse_delete_project(&self, response: HttpResponse) -> Result<()> {
        parse_empty(&response)
    }
}
