use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt;

use crate::cli_utils;

#[derive(Debug)]
pub struct HttpError {
    status: u16,
    message: String,
}

impl HttpError {
    pub fn status(&self) -> u16 {
        self.status
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.message)
    }
}

impl Error for HttpError {}

pub struct ParkadeClient {
    client: Client,
    base_url: String,
}

impl ParkadeClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Constructs a full API URL from a path
    pub fn api_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{}/{}", base, path)
    }

    /// Makes a GET request and handles the response
    pub async fn get<T>(&self, path: &str) -> Result<T, Box<dyn Error>>
    where
        T: DeserializeOwned,
    {
        let url = self.api_url(path);
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Makes a POST request with JSON body and handles the response
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, Box<dyn Error>>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        let url = self.api_url(path);
        let response = self.client.post(&url).json(body).send().await?;
        self.handle_response(response).await
    }

    /// Makes a DELETE request with JSON body and handles the response
    pub async fn delete<B, T>(&self, path: &str, body: &B) -> Result<T, Box<dyn Error>>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        let url = self.api_url(path);
        let response = self.client.delete(&url).json(body).send().await?;
        self.handle_response(response).await
    }

    /// Handles HTTP response, deserializing success or returning error
    async fn handle_response<T>(&self, response: Response) -> Result<T, Box<dyn Error>>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let error = response.text().await.unwrap_or_default();
            let message = if error.is_empty() {
                "No error details".to_string()
            } else {
                cli_utils::describe_error_body(&error)
            };
            Err(Box::new(HttpError {
                status: status.as_u16(),
                message,
            }))
        }
    }
}

/// Execute an HTTP operation and exit on error with formatted message
pub async fn execute_or_exit<T, F, Fut>(operation: F, context: &str) -> T
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, Box<dyn Error>>>,
{
    match operation().await {
        Ok(result) => result,
        Err(e) => cli_utils::exit_with_error(&format!("{}: {}", context, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_joins_without_double_slashes() {
        let client = ParkadeClient::new("http://localhost:8080/".to_string());
        assert_eq!(client.api_url("/clients"), "http://localhost:8080/clients");
        assert_eq!(client.api_url("parkings/1"), "http://localhost:8080/parkings/1");
    }

    #[tokio::test]
    async fn talks_to_a_running_server() {
        let pool = crate::sql::tests::setup_test_db().await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, crate::create_router(pool)).await.unwrap();
        });

        let client = ParkadeClient::new(format!("http://{}", addr));
        let created: crate::Client = client
            .post(
                "clients",
                &serde_json::json!({"name": "Ivan", "surname": "Petrov"}),
            )
            .await
            .unwrap();
        assert_eq!(created.name, "Ivan");

        let error = client
            .get::<crate::Parking>("parkings/1")
            .await
            .unwrap_err();
        let http_error = error.downcast_ref::<HttpError>().unwrap();
        assert_eq!(http_error.status(), 404);
        assert_eq!(
            http_error.to_string(),
            "HTTP 404: Parking with this id not found (NotFound)"
        );
    }
}
