//! Pass endpoints, rooted at `<base>/pass`.

use serde_json::{json, Map, Value};

use super::{check_status, parse_empty, parse_json, parse_list, WalletClient};
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{encode_external_id, require, AttachedLocation, Location, Page, Pass, ResourceId, Tag};

const PASS: &str = "pass";

impl WalletClient {
    pub fn build_list_passes(&self, page: Page) -> Result<HttpRequest> {
        Ok(self.request(HttpMethod::Get, self.collection_url(PASS, &page.query()?)))
    }

    pub fn build_get_pass(&self, pass: impl Into<ResourceId>) -> Result<HttpRequest> {
        Ok(self.request(HttpMethod::Get, self.resource_url(PASS, &pass.into(), "")?))
    }

    /// Create a pass on `template`, optionally under a caller-chosen external id.
    ///
    /// A template addressed by external id can only receive passes that also
    /// carry an external id.
    pub fn build_create_pass(
        &self,
        template: impl Into<ResourceId>,
        external_id: Option<&str>,
        fields: &Map<String, Value>,
    ) -> Result<HttpRequest> {
        let template = template.into();
        if matches!(template, ResourceId::External(_)) && external_id.is_none() {
            return Err(ApiError::InvalidParameter(
                "a pass created on a template external id needs its own external id",
            ));
        }
        let suffix = match external_id {
            Some(external_id) => format!("/id/{}", encode_external_id(external_id)?),
            None => String::new(),
        };
        let path = self.resource_url(PASS, &template, &suffix)?;
        self.json_request(HttpMethod::Post, path, fields)
    }

    pub fn build_update_pass(
        &self,
        pass: impl Into<ResourceId>,
        fields: &Map<String, Value>,
    ) -> Result<HttpRequest> {
        let path = self.resource_url(PASS, &pass.into(), "")?;
        self.json_request(HttpMethod::Put, path, fields)
    }

    /// Update a previously fetched pass with its (locally modified) fields.
    pub fn build_update_existing_pass(&self, pass: &Pass) -> Result<HttpRequest> {
        let id = pass
            .id
            .ok_or(ApiError::InvalidParameter("pass has no id"))?;
        self.build_update_pass(id, &pass.fields)
    }

    pub fn build_delete_pass(&self, pass: impl Into<ResourceId>) -> Result<HttpRequest> {
        Ok(self.request(HttpMethod::Delete, self.resource_url(PASS, &pass.into(), "")?))
    }

    /// The pass as the JSON document Apple PassKit would consume.
    pub fn build_view_pass_json(&self, pass: impl Into<ResourceId>) -> Result<HttpRequest> {
        let path = self.resource_url(PASS, &pass.into(), "/viewJSONPass")?;
        Ok(self.request(HttpMethod::Get, path))
    }

    /// The signed `.pkpass` archive. Apple passes only.
    pub fn build_download_pass(&self, pass: impl Into<ResourceId>) -> Result<HttpRequest> {
        let path = self.resource_url(PASS, &pass.into(), "/download")?;
        Ok(self.request(HttpMethod::Get, path))
    }

    /// Notify devices holding the pass that it changed.
    pub fn build_push_pass(&self, pass: impl Into<ResourceId>) -> Result<HttpRequest> {
        let path = self.resource_url(PASS, &pass.into(), "/push")?;
        self.json_request(HttpMethod::Put, path, &json!({}))
    }

    pub fn build_get_pass_tags(&self, pass: impl Into<ResourceId>) -> Result<HttpRequest> {
        let path = self.resource_url(PASS, &pass.into(), "/tags")?;
        Ok(self.request(HttpMethod::Get, path))
    }

    pub fn build_add_pass_tags<S: AsRef<str>>(
        &self,
        pass: impl Into<ResourceId>,
        tags: &[S],
    ) -> Result<HttpRequest> {
        if tags.is_empty() {
            return Err(ApiError::InvalidParameter("tag list must not be empty"));
        }
        let mut names = Vec::with_capacity(tags.len());
        for tag in tags {
            require(tag.as_ref(), "tags must not be empty")?;
            names.push(tag.as_ref());
        }
        let path = self.resource_url(PASS, &pass.into(), "/tags")?;
        self.json_request(HttpMethod::Put, path, &json!({ "tags": names }))
    }

    pub fn build_add_pass_tag(&self, pass: impl Into<ResourceId>, tag: &str) -> Result<HttpRequest> {
        self.build_add_pass_tags(pass, &[tag])
    }

    pub fn build_add_pass_locations(
        &self,
        pass: impl Into<ResourceId>,
        locations: &[Location],
    ) -> Result<HttpRequest> {
        if locations.is_empty() {
            return Err(ApiError::InvalidParameter("location list must not be empty"));
        }
        let path = self.resource_url(PASS, &pass.into(), "/locations")?;
        self.json_request(HttpMethod::Post, path, locations)
    }

    pub fn build_delete_pass_location(
        &self,
        pass: impl Into<ResourceId>,
        location_id: i64,
    ) -> Result<HttpRequest> {
        let path = self.resource_url(PASS, &pass.into(), &format!("/location/{location_id}"))?;
        Ok(self.request(HttpMethod::Delete, path))
    }

    pub fn parse_list_passes(&self, response: HttpResponse) -> Result<Vec<Pass>> {
        parse_list(&response, "passes")
    }

    pub fn parse_get_pass(&self, response: HttpResponse) -> Result<Pass> {
        parse_json(&response)
    }

    pub fn parse_create_pass(&self, response: HttpResponse) -> Result<Pass> {
        parse_json(&response)
    }

    pub fn parse_update_pass(&self, response: HttpResponse) -> Result<Pass> {
        parse_json(&response)
    }

    pub fn parse_delete_pass(&self, response: HttpResponse) -> Result<()> {
        parse_empty(&response)
    }

    pub fn parse_view_pass_json(&self, response: HttpResponse) -> Result<Value> {
        parse_json(&response)
    }

    pub fn parse_download_pass(&self, response: HttpResponse) -> Result<Vec<u8>> {
        check_status(&response)?;
        Ok(response.body)
    }

    /// The devices the update notification reached, as reported by the server.
    pub fn parse_push_pass(&self, response: HttpResponse) -> Result<Value> {
        parse_json(&response)
    }

    pub fn parse_get_pass_tags(&self, response: HttpResponse) -> Result<Vec<Tag>> {
        parse_list(&response, "tags")
    }

    /// Tags the pass was newly added to; tags it already had are not listed.
    pub fn parse_add_pass_tags(&self, response: HttpResponse) -> Result<Vec<String>> {
        let body: Value = parse_json(&response)?;
        let added = body
            .get("newTags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(added)
    }

    pub fn parse_add_pass_locations(&self, response: HttpResponse) -> Result<Vec<AttachedLocation>> {
        parse_json(&response)
    }

    pub fn parse_delete_pass_location(&self, response: HttpResponse) -> Result<()> {
        parse_empty(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> WalletClient {
        WalletClient::new("http://localhost:3000")
    }

    fn fields() -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("name".to_string(), json!({"value": "Ada"}));
        fields
    }

    fn body(req: &HttpRequest) -> Value {
        serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn build_list_passes_adds_paging() {
        let req = client().build_list_passes(Page::new(20, 2)).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/pass?pageSize=20&page=2");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_get_pass_by_id_and_external_id() {
        let req = client().build_get_pass(42_i64).unwrap();
        assert_eq!(req.path, "http://localhost:3000/pass/42");
        let req = client().build_get_pass("member-1").unwrap();
        assert_eq!(req.path, "http://localhost:3000/pass/id/member-1");
    }

    #[test]
    fn build_get_pass_rejects_empty_external_id() {
        let err = client().build_get_pass("").unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));
    }

    #[test]
    fn build_create_pass_paths() {
        let c = client();
        let req = c.build_create_pass(7_i64, None, &fields()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/pass/7");
        assert_eq!(body(&req)["name"]["value"], "Ada");

        let req = c.build_create_pass(7_i64, Some("member-1"), &fields()).unwrap();
        assert_eq!(req.path, "http://localhost:3000/pass/7/id/member-1");

        let req = c.build_create_pass("gold", Some("member-1"), &fields()).unwrap();
        assert_eq!(req.path, "http://localhost:3000/pass/id/gold/id/member-1");
    }

    #[test]
    fn build_create_pass_on_external_template_needs_external_id() {
        let err = client().build_create_pass("gold", None, &fields()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));
        let err = client().build_create_pass(7_i64, Some(" "), &fields()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));
    }

    #[test]
    fn build_update_existing_pass_uses_its_id_and_fields() {
        let pass = Pass {
            id: Some(9),
            fields: fields(),
            ..Pass::default()
        };
        let req = client().build_update_existing_pass(&pass).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/pass/9");
        assert_eq!(body(&req)["name"]["value"], "Ada");

        let err = client().build_update_existing_pass(&Pass::default()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));
    }

    #[test]
    fn build_sub_resource_paths() {
        let c = client();
        assert_eq!(
            c.build_view_pass_json(3_i64).unwrap().path,
            "http://localhost:3000/pass/3/viewJSONPass"
        );
        assert_eq!(
            c.build_download_pass("m").unwrap().path,
            "http://localhost:3000/pass/id/m/download"
        );
        let push = c.build_push_pass(3_i64).unwrap();
        assert_eq!(push.method, HttpMethod::Put);
        assert_eq!(push.path, "http://localhost:3000/pass/3/push");
        assert_eq!(push.body.as_deref(), Some("{}"));
        let delete = c.build_delete_pass_location("m", 65).unwrap();
        assert_eq!(delete.method, HttpMethod::Delete);
        assert_eq!(delete.path, "http://localhost:3000/pass/id/m/location/65");
    }

    #[test]
    fn build_add_pass_tags_body_and_validation() {
        let req = client().build_add_pass_tags(3_i64, &["vip", "sf"]).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/pass/3/tags");
        assert_eq!(body(&req), json!({"tags": ["vip", "sf"]}));

        let req = client().build_add_pass_tag(3_i64, "vip").unwrap();
        assert_eq!(body(&req), json!({"tags": ["vip"]}));

        let none: [&str; 0] = [];
        assert!(matches!(
            client().build_add_pass_tags(3_i64, &none),
            Err(ApiError::InvalidParameter(_))
        ));
        assert!(matches!(
            client().build_add_pass_tags(3_i64, &["vip", ""]),
            Err(ApiError::InvalidParameter(_))
        ));
    }

    #[test]
    fn build_add_pass_locations_sends_array() {
        let locations = vec![Location::new(37.618, -122.3742).with_relevant_text("Hello loc0!")];
        let req = client().build_add_pass_locations(3_i64, &locations).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/pass/3/locations");
        let sent = body(&req);
        assert_eq!(sent[0]["relevantText"], "Hello loc0!");

        assert!(matches!(
            client().build_add_pass_locations(3_i64, &[]),
            Err(ApiError::InvalidParameter(_))
        ));
    }

    #[test]
    fn parse_list_passes_reads_passes_array() {
        let response = HttpResponse::new(
            200,
            r#"{"count":2,"passes":[{"id":1,"templateId":"7"},{"id":"2","externalId":"m"}]}"#,
        );
        let passes = client().parse_list_passes(response).unwrap();
        assert_eq!(passes.len(), 2);
        assert_eq!(passes[0].template_id, Some(7));
        assert_eq!(passes[1].id, Some(2));
        assert_eq!(passes[1].external_id.as_deref(), Some("m"));
    }

    #[test]
    fn parse_get_pass_not_found() {
        let err = client()
            .parse_get_pass(HttpResponse::new(404, ""))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_get_pass_bad_json() {
        let err = client()
            .parse_get_pass(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_download_pass_returns_raw_bytes() {
        let bytes = vec![0x50, 0x4b, 0x03, 0x04, 0xff];
        let downloaded = client()
            .parse_download_pass(HttpResponse::new(200, bytes.clone()))
            .unwrap();
        assert_eq!(downloaded, bytes);
    }

    #[test]
    fn parse_add_pass_tags_keeps_string_entries() {
        let response = HttpResponse::new(200, r#"{"newTags":["vip",3,"sf"]}"#);
        let added = client().parse_add_pass_tags(response).unwrap();
        assert_eq!(added, vec!["vip".to_string(), "sf".to_string()]);

        let response = HttpResponse::new(200, r#"{}"#);
        assert!(client().parse_add_pass_tags(response).unwrap().is_empty());
    }

    #[test]
    fn parse_get_pass_tags() {
        let response = HttpResponse::new(200, r#"{"tags":[{"id":1,"name":"vip"}]}"#);
        let tags = client().parse_get_pass_tags(response).unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name.as_deref(), Some("vip"));
    }

    #[test]
    fn parse_delete_pass_accepts_any_2xx() {
        assert!(client().parse_delete_pass(HttpResponse::new(200, "{}")).is_ok());
        assert!(client().parse_delete_pass(HttpResponse::new(204, "")).is_ok());
        let err = client()
            .parse_delete_pass(HttpResponse::new(500, "boom"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }
}
