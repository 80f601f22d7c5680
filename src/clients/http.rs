use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::framework::{SessionEntity, Transport, TransportError};

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            TransportError::Malformed(e.to_string())
        } else {
            TransportError::Network(e.to_string())
        }
    }
}

/// REST transport for one entity kind.
///
/// Maps the resource operations onto `{base_url}/{kind}`:
///
/// | Operation | Request |
/// |---|---|
/// | list | `GET /{kind}` |
/// | get | `GET /{kind}/{id}` |
/// | create | `POST /{kind}` |
/// | update | `PUT /{kind}/{id}` |
/// | delete | `DELETE /{kind}/{id}` |
pub struct HttpTransport<T> {
    client: Client,
    collection: Url,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Clone for HttpTransport<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            collection: self.collection.clone(),
            _kind: PhantomData,
        }
    }
}

impl<T: SessionEntity> HttpTransport<T> {
    /// Builds a transport with its own connection pool.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    /// Builds a transport on a shared `reqwest::Client`.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, TransportError> {
        let mut collection = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| TransportError::InvalidUrl(format!("{base_url}: {e}")))?;
        collection
            .path_segments_mut()
            .map_err(|_| TransportError::InvalidUrl(base_url.to_string()))?
            .pop_if_empty()
            .push(T::KIND);
        Ok(Self {
            client,
            collection,
            _kind: PhantomData,
        })
    }

    /// URL of the whole collection.
    pub fn collection_url(&self) -> &Url {
        &self.collection
    }

    /// URL of one record; the id is percent-encoded as a single segment.
    pub fn item_url(&self, id: &str) -> Url {
        let mut url = self.collection.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND => Err(TransportError::NotFound(body)),
            _ => Err(TransportError::Status {
                status: status.as_u16(),
                body,
            }),
        }
    }

    async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, TransportError> {
        let response = Self::check(response).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| TransportError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl<T: SessionEntity> Transport<T> for HttpTransport<T> {
    #[instrument(skip(self), fields(kind = T::KIND))]
    async fn list(&self) -> Result<Vec<T>, TransportError> {
        debug!("Sending request");
        let response = self.client.get(self.collection.clone()).send().await?;
        Self::decode(response).await
    }

    #[instrument(skip(self), fields(kind = T::KIND))]
    async fn get(&self, id: &str) -> Result<T, TransportError> {
        debug!("Sending request");
        let response = self.client.get(self.item_url(id)).send().await?;
        Self::decode(response).await
    }

    #[instrument(skip(self, draft), fields(kind = T::KIND))]
    async fn create(&self, draft: &T) -> Result<T, TransportError> {
        debug!(?draft, "Sending request");
        let response = self
            .client
            .post(self.collection.clone())
            .json(draft)
            .send()
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self, draft), fields(kind = T::KIND))]
    async fn update(&self, id: &str, draft: &T) -> Result<T, TransportError> {
        debug!(?draft, "Sending request");
        let response = self
            .client
            .put(self.item_url(id))
            .json(draft)
            .send()
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self), fields(kind = T::KIND))]
    async fn delete(&self, id: &str) -> Result<(), TransportError> {
        debug!("Sending request");
        let response = self.client.delete(self.item_url(id)).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Customer, Product};

    #[test]
    fn builds_collection_and_item_urls() {
        let transport =
            HttpTransport::<Product>::new("http://backend:8080/api/", Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            transport.collection_url().as_str(),
            "http://backend:8080/api/products"
        );
        assert_eq!(
            transport.item_url("p 1").as_str(),
            "http://backend:8080/api/products/p%201"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        let err = HttpTransport::<Customer>::new("not a url", Duration::from_secs(5))
            .err()
            .unwrap();
        assert!(matches!(err, TransportError::InvalidUrl(_)));
    }
}
