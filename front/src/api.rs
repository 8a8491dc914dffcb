use async_trait::async_trait;
use reqwest::{Client, Response};
use todos_api::v1::{ErrorBody, Todo, TodoFields, TodoId};

use crate::error::ApiError;

/// The REST resource the list controller talks to.
#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Todo>, ApiError>;

    async fn get(&self, id: &TodoId) -> Result<Todo, ApiError>;

    async fn create(&self, fields: &TodoFields) -> Result<Todo, ApiError>;

    /// Replace the whole record, the server keeps its own `id` and timestamps.
    async fn replace(&self, todo: &Todo) -> Result<Todo, ApiError>;

    async fn delete(&self, id: &TodoId) -> Result<(), ApiError>;
}

/// [`TodoApi`] over HTTP.
#[derive(Clone, Debug)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    /// `base_url` is the API root, e.g. `http://127.0.0.1:7890/api`.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn collection(&self) -> String {
        format!("{}/todos/", self.base_url)
    }

    fn item(&self, id: &TodoId) -> String {
        format!("{}/todos/{}/", self.base_url, id)
    }
}

#[async_trait]
impl TodoApi for HttpApi {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let response = self.client.get(self.collection()).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn get(&self, id: &TodoId) -> Result<Todo, ApiError> {
        let response = self.client.get(self.item(id)).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn create(&self, fields: &TodoFields) -> Result<Todo, ApiError> {
        let response = self
            .client
            .post(self.collection())
            .json(fields)
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    async fn replace(&self, todo: &Todo) -> Result<Todo, ApiError> {
        let response = self
            .client
            .put(self.item(&todo.id))
            .json(todo)
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    async fn delete(&self, id: &TodoId) -> Result<(), ApiError> {
        let response = self.client.delete(self.item(id)).send().await?;
        check(response).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into [`ApiError::Status`], keeping the server's
/// `detail` if the body has one.
async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = match response.json::<ErrorBody>().await {
        Ok(body) => Some(body.detail),
        Err(_) => None,
    };

    Err(ApiError::Status {
        status: status.as_u16(),
        detail,
    })
}
