//! Typed Aircall endpoints built on `fetch`, `create` and `remove`.

use serde::de::DeserializeOwned;

use crate::client::{AircallClient, Params};
use crate::error::ApiError;
use crate::http::{HttpMethod, Transport};
use crate::types::{
    CallInsightCardRequest, CallResponse, CallsResponse, CompanyResponse, ContactRequest,
    ContactResponse, ContactsResponse, LinkCallRequest, NumberResponse, NumbersResponse, Paginate,
    PingResponse, Search, TransferCallRequest, UserResponse, UsersResponse, WebhookRequest,
    WebhookResponse, WebhooksResponse,
};

fn decode<R: DeserializeOwned>(bytes: &[u8]) -> Result<R, ApiError> {
    serde_json::from_slice(bytes).map_err(ApiError::Deserialization)
}

impl<T: Transport> AircallClient<T> {
    fn get_json<R: DeserializeOwned>(&self, path: &str, params: &Params) -> Result<R, ApiError> {
        decode(&self.fetch(path, params)?)
    }

    /// Checks credentials and connectivity.
    pub fn ping(&self) -> Result<PingResponse, ApiError> {
        self.get_json("/ping", &Params::new())
    }

    pub fn company(&self) -> Result<CompanyResponse, ApiError> {
        self.get_json("/company", &Params::new())
    }

    pub fn users(&self, paginate: &Paginate) -> Result<UsersResponse, ApiError> {
        self.get_json("/users", &paginate.to_params())
    }

    pub fn user(&self, id: u64) -> Result<UserResponse, ApiError> {
        self.get_json(&format!("/users/{id}"), &Params::new())
    }

    pub fn numbers(&self, paginate: &Paginate) -> Result<NumbersResponse, ApiError> {
        self.get_json("/numbers", &paginate.to_params())
    }

    pub fn number(&self, id: u64) -> Result<NumberResponse, ApiError> {
        self.get_json(&format!("/numbers/{id}"), &Params::new())
    }

    pub fn calls(&self, paginate: &Paginate) -> Result<CallsResponse, ApiError> {
        self.get_json("/calls", &paginate.to_params())
    }

    pub fn call(&self, id: u64) -> Result<CallResponse, ApiError> {
        self.get_json(&format!("/calls/{id}"), &Params::new())
    }

    /// Transfers an ongoing call to another user.
    pub fn transfer_call(&self, id: u64, request: &TransferCallRequest) -> Result<(), ApiError> {
        self.create(&format!("/calls/{id}/transfers"), request)?;
        Ok(())
    }

    /// Attaches an external link (CRM record, ticket) to a call.
    pub fn link_call(&self, id: u64, request: &LinkCallRequest) -> Result<(), ApiError> {
        self.create(&format!("/calls/{id}/link"), request)?;
        Ok(())
    }

    /// Pushes an insight card shown to the agent during an ongoing call.
    pub fn create_insight_cards(
        &self,
        id: u64,
        request: &CallInsightCardRequest,
    ) -> Result<(), ApiError> {
        self.create(&format!("/calls/{id}/insight_cards"), request)?;
        Ok(())
    }

    pub fn contacts(&self, paginate: &Paginate) -> Result<ContactsResponse, ApiError> {
        self.get_json("/contacts", &paginate.to_params())
    }

    /// Searches contacts by phone number and/or email. Paging fields in
    /// `paginate` are sent alongside the search criteria.
    pub fn search_contacts(
        &self,
        search: &Search,
        paginate: &Paginate,
    ) -> Result<ContactsResponse, ApiError> {
        let mut params = paginate.to_params();
        params.extend(search.to_params());
        self.get_json("/contacts/search", &params)
    }

    pub fn contact(&self, id: u64) -> Result<ContactResponse, ApiError> {
        self.get_json(&format!("/contacts/{id}"), &Params::new())
    }

    pub fn create_contact(&self, request: &ContactRequest) -> Result<ContactResponse, ApiError> {
        decode(&self.create("/contacts", request)?)
    }

    pub fn delete_contact(&self, id: u64) -> Result<(), ApiError> {
        self.remove(&format!("/contacts/{id}"), &Params::new())?;
        Ok(())
    }

    pub fn webhooks(&self, paginate: &Paginate) -> Result<WebhooksResponse, ApiError> {
        self.get_json("/webhooks", &paginate.to_params())
    }

    pub fn webhook(&self, id: &str) -> Result<WebhookResponse, ApiError> {
        self.get_json(&format!("/webhooks/{id}"), &Params::new())
    }

    pub fn create_webhook(&self, request: &WebhookRequest) -> Result<WebhookResponse, ApiError> {
        decode(&self.create("/webhooks", request)?)
    }

    pub fn update_webhook(
        &self,
        id: &str,
        request: &WebhookRequest,
    ) -> Result<WebhookResponse, ApiError> {
        let body = self.request(
            HttpMethod::Put,
            &format!("/webhooks/{id}"),
            &Params::new(),
            Some(request),
        )?;
        decode(&body)
    }

    pub fn delete_webhook(&self, id: &str) -> Result<(), ApiError> {
        self.remove(&format!("/webhooks/{id}"), &Params::new())?;
        Ok(())
    }
}
