//! HTTP client for the bakery REST API

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, multipart};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::ApiResponse;
use shared::models::{Cake, Order, OrderStatus, UserInfo};
use shared::request::{
    CakeQuery, CreateOrderRequest, DeliveryDetails, ListQuery, LoginRequest,
    UpdateOrderStatusRequest,
};
use shared::response::{
    CakeResponse, CakesResponse, CurrentUserResponse, CustomRequestCreatedResponse,
    HealthResponse, LoginResponse, OrderResponse, PageResponse,
};

use crate::cart::{Cart, CartStore};
use crate::session::{MemoryTokenStore, Session, TokenStore};
use crate::{ClientConfig, ClientError, ClientResult};

/// Reference image attached to a custom cake request
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Custom cake request form fields (multipart text parts)
#[derive(Debug, Clone, Default)]
pub struct CustomCakeForm {
    pub customer_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub occasion: String,
    pub cake_size: String,
    pub flavor: String,
    pub icing: String,
    pub color: Option<String>,
    pub design_description: String,
    pub message: Option<String>,
    pub budget: Option<String>,
    pub delivery_date: Option<String>,
    pub delivery_location: Option<String>,
    pub special_instructions: Option<String>,
}

impl CustomCakeForm {
    fn into_form(self) -> multipart::Form {
        let required = [
            ("customerName", self.customer_name),
            ("phone", self.phone),
            ("occasion", self.occasion),
            ("cakeSize", self.cake_size),
            ("flavor", self.flavor),
            ("icing", self.icing),
            ("designDescription", self.design_description),
        ];
        let optional = [
            ("email", self.email),
            ("color", self.color),
            ("message", self.message),
            ("budget", self.budget),
            ("deliveryDate", self.delivery_date),
            ("deliveryLocation", self.delivery_location),
            ("specialInstructions", self.special_instructions),
        ];

        let mut form = multipart::Form::new();
        for (name, value) in required {
            form = form.text(name, value);
        }
        for (name, value) in optional {
            if let Some(value) = value {
                form = form.text(name, value);
            }
        }
        form
    }
}

/// HTTP client for making network requests to the bakery server
///
/// Clones share the same session.
#[derive(Debug)]
pub struct HttpClient<S: TokenStore = MemoryTokenStore> {
    client: Client,
    config: ClientConfig,
    session: Arc<Session<S>>,
}

impl<S: TokenStore> Clone for HttpClient<S> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            config: self.config.clone(),
            session: Arc::clone(&self.session),
        }
    }
}

impl HttpClient<MemoryTokenStore> {
    /// Client without persisted session
    pub fn anonymous(config: &ClientConfig) -> ClientResult<Self> {
        Self::new(config, MemoryTokenStore::default())
    }
}

impl<S: TokenStore> HttpClient<S> {
    /// Create a client; a token already in `store` is reused
    pub fn new(config: &ClientConfig, store: S) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
            session: Arc::new(Session::restore(store)),
        })
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = self.authorize(request).send().await?;
        self.handle_response(response).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.client.get(self.config.api_url(path))).await
    }

    pub async fn get_with<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(self.client.get(self.config.api_url(path)).query(query))
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(self.client.post(self.config.api_url(path)).json(body))
            .await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(self.client.patch(self.config.api_url(path)).json(body))
            .await
    }

    /// Map the status to a [`ClientError`]; 401/403 also end the session
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&text)
                .map(|body| body.message)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or(text);

            if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
                tracing::debug!(%status, "Clearing session after auth failure");
                self.session.sign_out();
            }

            return Err(match status {
                StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
                StatusCode::FORBIDDEN => ClientError::Forbidden(message),
                StatusCode::NOT_FOUND => ClientError::NotFound(message),
                s if s.is_client_error() => ClientError::Validation(message),
                _ => ClientError::Server(message),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::InvalidResponse(format!("{} ({})", e, status)))
    }

    // ========== Storefront API ==========

    pub async fn health(&self) -> ClientResult<HealthResponse> {
        self.get("health").await
    }

    pub async fn cakes(&self, query: &CakeQuery) -> ClientResult<Vec<Cake>> {
        let response: CakesResponse = self.get_with("cakes", query).await?;
        Ok(response.cakes)
    }

    pub async fn featured_cakes(&self) -> ClientResult<Vec<Cake>> {
        let response: CakesResponse = self.get("cakes/featured").await?;
        Ok(response.cakes)
    }

    pub async fn cake(&self, id: &str) -> ClientResult<Cake> {
        let response: CakeResponse = self.get(&format!("cakes/{}", id)).await?;
        Ok(response.cake)
    }

    pub async fn place_order(&self, request: &CreateOrderRequest) -> ClientResult<Order> {
        let response: OrderResponse = self.post("orders", request).await?;
        Ok(response.order)
    }

    /// Submit the cart as an order, clearing it once the server accepted it
    pub async fn checkout<C: CartStore>(
        &self,
        cart: &mut Cart<C>,
        delivery: &DeliveryDetails,
    ) -> ClientResult<Order> {
        if cart.is_empty() {
            return Err(ClientError::Validation("Cart is empty".to_string()));
        }
        let order = self.place_order(&cart.to_order_request(delivery)).await?;
        cart.clear()?;
        Ok(order)
    }

    pub async fn submit_custom_request(
        &self,
        form: CustomCakeForm,
        images: Vec<ImageUpload>,
    ) -> ClientResult<CustomRequestCreatedResponse> {
        let mut multipart = form.into_form();
        for image in images {
            let part = multipart::Part::bytes(image.data)
                .file_name(image.file_name)
                .mime_str(&image.content_type)?;
            multipart = multipart.part("images", part);
        }
        self.send(
            self.client
                .post(self.config.api_url("custom-cakes"))
                .multipart(multipart),
        )
        .await
    }

    // ========== Auth API ==========

    /// Login with email and password; the token is kept in the session
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.post("auth/login", &request).await?;
        self.session.sign_in(&response.token)?;
        Ok(response)
    }

    pub async fn me(&self) -> ClientResult<UserInfo> {
        let response: CurrentUserResponse = self.get("auth/me").await?;
        Ok(response.user)
    }

    pub fn logout(&self) {
        self.session.sign_out();
    }

    // ========== Admin API ==========

    pub async fn admin_orders(&self, query: &ListQuery) -> ClientResult<PageResponse<Order>> {
        self.get_with("admin/orders", query).await
    }

    pub async fn update_order_status(&self, id: &str, status: OrderStatus) -> ClientResult<Order> {
        let body = UpdateOrderStatusRequest {
            status: status.as_str().to_string(),
        };
        let response: OrderResponse = self
            .patch(&format!("admin/orders/{}/status", id), &body)
            .await?;
        Ok(response.order)
    }
}
