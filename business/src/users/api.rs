//! User service API calls.
//!
//! Plain request/response helpers: build the request, send it and map a
//! non-2xx answer to [`UserDirectoryError::Remote`]. Reads also normalize the
//! body through [`super::envelope`]. Writes hand back the accepted 2xx
//! [`Response`] undecoded, so the caller can act on the accepted write before
//! its body is parsed. No caching or validation happens here; see
//! [`crate::UserDirectoryClient`] for that.

use log::warn;

use super::envelope;
use super::error::{UserDirectoryError, UserDirectoryResult};
use super::types::{MutateUserRequest, User, UserId};
use crate::http::{HttpClient, RequestBuilder, Response};

async fn send(request: RequestBuilder) -> UserDirectoryResult<Response> {
    let method = request.method();
    let url = request.url().to_owned();

    let response = request.send().await.map_err(|e| {
        warn!("{} {url} failed: {e}", method.as_str());
        UserDirectoryError::from(e)
    })?;

    if !response.is_success() {
        let message = envelope::error_message(&response);
        warn!(
            "{} {url} returned {}: {message}",
            method.as_str(),
            response.status
        );
        return Err(UserDirectoryError::Remote {
            status: response.status,
            message,
        });
    }

    Ok(response)
}

/// `{api_base_url}/{id}`, with `id` encoded as a single path segment.
fn entity_url(api_base_url: &str, id: &UserId) -> UserDirectoryResult<String> {
    let invalid = |reason: String| {
        UserDirectoryError::InvalidArgument(format!(
            "Invalid API base URL {api_base_url:?}: {reason}"
        ))
    };

    let mut url = reqwest::Url::parse(api_base_url).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| invalid("URL cannot be a base".to_owned()))?
        .pop_if_empty()
        .push(id.as_str());
    Ok(url.into())
}

fn json_body(
    request: RequestBuilder,
    payload: &MutateUserRequest,
) -> UserDirectoryResult<RequestBuilder> {
    request.json(payload).map_err(|e| {
        UserDirectoryError::InvalidArgument(format!("Failed to serialize request: {e}"))
    })
}

/// GET `/?page={page}&limit={limit}`
pub async fn list_users(
    http: &HttpClient,
    api_base_url: &str,
    page: u32,
    limit: u32,
) -> UserDirectoryResult<Vec<User>> {
    let request = http
        .get(format!("{api_base_url}/"))
        .query("page", page)
        .query("limit", limit);

    let response = send(request).await?;
    envelope::users_from(&response)
}

/// GET `/{id}`
pub async fn get_user(
    http: &HttpClient,
    api_base_url: &str,
    id: &UserId,
) -> UserDirectoryResult<User> {
    let response = send(http.get(entity_url(api_base_url, id)?)).await?;
    envelope::user_from(&response)
}

/// POST `/`
/// Body: `MutateUserRequest`
/// Returns the accepted response; decode with [`envelope::user_from`].
pub async fn create_user(
    http: &HttpClient,
    api_base_url: &str,
    payload: &MutateUserRequest,
) -> UserDirectoryResult<Response> {
    let request = json_body(http.post(format!("{api_base_url}/")), payload)?;
    send(request).await
}

/// PATCH `/{id}`
/// Body: `MutateUserRequest`
/// Returns the accepted response; decode with [`envelope::user_from`].
pub async fn update_user(
    http: &HttpClient,
    api_base_url: &str,
    id: &UserId,
    payload: &MutateUserRequest,
) -> UserDirectoryResult<Response> {
    let request = json_body(http.patch(entity_url(api_base_url, id)?), payload)?;
    send(request).await
}

/// DELETE `/{id}`
/// Returns the accepted response; decode with [`envelope::generic_from`].
pub async fn delete_user(
    http: &HttpClient,
    api_base_url: &str,
    id: &UserId,
) -> UserDirectoryResult<Response> {
    send(http.delete(entity_url(api_base_url, id)?)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_url_appends_id_segment() {
        assert_eq!(
            entity_url("http://127.0.0.1:8080", &UserId::new("7")).unwrap(),
            "http://127.0.0.1:8080/7"
        );
        assert_eq!(
            entity_url("https://fakestoreapi.com/users", &UserId::new("7")).unwrap(),
            "https://fakestoreapi.com/users/7"
        );
    }

    #[test]
    fn test_entity_url_encodes_reserved_characters() {
        let url = entity_url("https://example.com/users", &UserId::new("a/b?c#d")).unwrap();
        assert_eq!(url, "https://example.com/users/a%2Fb%3Fc%23d");
    }

    #[test]
    fn test_entity_url_rejects_unparsable_base() {
        let err = entity_url("not a url", &UserId::new("7")).unwrap_err();
        assert!(matches!(err, UserDirectoryError::InvalidArgument(_)));
    }
}
