//! Template endpoints, rooted at `<base>/template`.

use serde_json::Value;

use super::{parse_empty, parse_json, parse_list, WalletClient};
use crate::coerce::to_i64;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    AttachedLocation, Location, NewTemplate, Page, ResourceId, Template, TemplateHeader,
    TemplateUpdate,
};

const TEMPLATE: &str = "template";

impl WalletClient {
    /// Headers of every template owned by the account, optionally one page
    /// at a time.
    pub fn build_list_template_headers(&self, page: Option<Page>) -> Result<HttpRequest> {
        let query = match page {
            Some(page) => page.query()?,
            None => String::new(),
        };
        let path = self.collection_url(TEMPLATE, &format!("/headers{query}"));
        Ok(self.request(HttpMethod::Get, path))
    }

    pub fn build_get_template(&self, template: impl Into<ResourceId>) -> Result<HttpRequest> {
        let path = self.resource_url(TEMPLATE, &template.into(), "")?;
        Ok(self.request(HttpMethod::Get, path))
    }

    pub fn build_create_template(&self, input: &NewTemplate) -> Result<HttpRequest> {
        let path = self.collection_url(TEMPLATE, &input.path_suffix()?);
        self.json_request(HttpMethod::Post, path, input)
    }

    pub fn build_update_template(
        &self,
        template: impl Into<ResourceId>,
        input: &TemplateUpdate,
    ) -> Result<HttpRequest> {
        input.validate()?;
        let path = self.resource_url(TEMPLATE, &template.into(), "")?;
        self.json_request(HttpMethod::Put, path, input)
    }

    /// Create a new template with the contents of an existing one.
    pub fn build_duplicate_template(&self, template: impl Into<ResourceId>) -> Result<HttpRequest> {
        let path = format!(
            "{}/{TEMPLATE}/duplicate/{}",
            self.base_url(),
            template.into().path_segment()?
        );
        Ok(self.request(HttpMethod::Post, path))
    }

    pub fn build_delete_template(&self, template: impl Into<ResourceId>) -> Result<HttpRequest> {
        let path = self.resource_url(TEMPLATE, &template.into(), "")?;
        Ok(self.request(HttpMethod::Delete, path))
    }

    pub fn build_add_template_locations(
        &self,
        template: impl Into<ResourceId>,
        locations: &[Location],
    ) -> Result<HttpRequest> {
        if locations.is_empty() {
            return Err(ApiError::InvalidParameter("location list must not be empty"));
        }
        let path = self.resource_url(TEMPLATE, &template.into(), "/locations")?;
        self.json_request(HttpMethod::Post, path, locations)
    }

    pub fn build_delete_template_location(
        &self,
        template: impl Into<ResourceId>,
        location_id: i64,
    ) -> Result<HttpRequest> {
        let suffix = format!("/location/{location_id}");
        let path = self.resource_url(TEMPLATE, &template.into(), &suffix)?;
        Ok(self.request(HttpMethod::Delete, path))
    }

    pub fn parse_list_template_headers(&self, response: HttpResponse) -> Result<Vec<TemplateHeader>> {
        parse_list(&response, "templateHeaders")
    }

    pub fn parse_get_template(&self, response: HttpResponse) -> Result<Template> {
        parse_json(&response)
    }

    /// Id of the newly created template.
    pub fn parse_create_template(&self, response: HttpResponse) -> Result<i64> {
        parse_template_id(&response)
    }

    pub fn parse_update_template(&self, response: HttpResponse) -> Result<i64> {
        parse_template_id(&response)
    }

    /// Id of the copy.
    pub fn parse_duplicate_template(&self, response: HttpResponse) -> Result<i64> {
        parse_template_id(&response)
    }

    pub fn parse_delete_template(&self, response: HttpResponse) -> Result<()> {
        parse_empty(&response)
    }

    pub fn parse_add_template_locations(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<AttachedLocation>> {
        parse_json(&response)
    }

    pub fn parse_delete_template_location(&self, response: HttpResponse) -> Result<()> {
        parse_empty(&response)
    }
}

/// `templateId` of a JSON object body, as a number or a numeric string.
fn parse_template_id(response: &HttpResponse) -> Result<i64> {
    let body: Value = parse_json(response)?;
    body.get("templateId").and_then(to_i64).ok_or_else(|| {
        ApiError::DeserializationError("response has no usable templateId".to_string())
    })
}
