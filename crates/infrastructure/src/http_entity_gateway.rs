use async_trait::async_trait;
use metaform_application::{EntityGateway, GatewayOperation};
use metaform_core::AppResult;
use metaform_domain::{EntityPayload, EntityRecord};
use serde::de::DeserializeOwned;
use tracing::warn;
use url::Url;

/// REST implementation of the entity gateway.
///
/// `GET/POST {base}/{entity}` and `PUT/DELETE {base}/{entity}/{id}`. Every
/// failure collapses to the operation's fixed message; status and transport
/// details are only logged.
#[derive(Debug, Clone)]
pub struct HttpEntityGateway {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpEntityGateway {
    /// Creates a gateway rooted at `base_url`.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: Url) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    fn endpoint(
        &self,
        operation: GatewayOperation,
        entity_type: &str,
        id: Option<&str>,
    ) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        {
            let Ok(mut segments) = url.path_segments_mut() else {
                warn!(
                    operation = operation.as_str(),
                    base_url = %self.base_url,
                    "entity gateway base URL cannot carry a path"
                );
                return Err(operation.failure());
            };
            segments.pop_if_empty().push(entity_type);
            if let Some(id) = id {
                segments.push(id);
            }
        }

        Ok(url)
    }

    async fn send(
        &self,
        operation: GatewayOperation,
        entity_type: &str,
        request: reqwest::RequestBuilder,
    ) -> AppResult<reqwest::Response> {
        match request.send().await {
            Ok(response) if response.status().is_success() => Ok(response),
            Ok(response) => {
                warn!(
                    operation = operation.as_str(),
                    entity = %entity_type,
                    status = %response.status(),
                    "entity gateway request rejected"
                );
                Err(operation.failure())
            }
            Err(error) => {
                warn!(
                    operation = operation.as_str(),
                    entity = %entity_type,
                    error = %error,
                    "entity gateway transport error"
                );
                Err(operation.failure())
            }
        }
    }

    async fn decode<T: DeserializeOwned>(
        operation: GatewayOperation,
        entity_type: &str,
        response: reqwest::Response,
    ) -> AppResult<T> {
        response.json::<T>().await.map_err(|error| {
            warn!(
                operation = operation.as_str(),
                entity = %entity_type,
                error = %error,
                "entity gateway returned an unreadable body"
            );
            operation.failure()
        })
    }
}

#[async_trait]
impl EntityGateway for HttpEntityGateway {
    async fn list(&self, entity_type: &str) -> AppResult<Vec<EntityRecord>> {
        let operation = GatewayOperation::List;
        let url = self.endpoint(operation, entity_type, None)?;
        let response = self
            .send(operation, entity_type, self.http_client.get(url))
            .await?;
        Self::decode(operation, entity_type, response).await
    }

    async fn create(&self, entity_type: &str, payload: &EntityPayload) -> AppResult<EntityRecord> {
        let operation = GatewayOperation::Create;
        let url = self.endpoint(operation, entity_type, None)?;
        let response = self
            .send(
                operation,
                entity_type,
                self.http_client.post(url).json(payload),
            )
            .await?;
        Self::decode(operation, entity_type, response).await
    }

    async fn update(
        &self,
        entity_type: &str,
        id: &str,
        payload: &EntityPayload,
    ) -> AppResult<EntityRecord> {
        let operation = GatewayOperation::Update;
        let url = self.endpoint(operation, entity_type, Some(id))?;
        let response = self
            .send(operation, entity_type, self.http_client.put(url).json(payload))
            .await?;
        Self::decode(operation, entity_type, response).await
    }

    async fn delete(&self, entity_type: &str, id: &str) -> AppResult<()> {
        let operation = GatewayOperation::Delete;
        let url = self.endpoint(operation, entity_type, Some(id))?;
        self.send(operation, entity_type, self.http_client.delete(url))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
