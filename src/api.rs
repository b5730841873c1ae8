//! Remote note API: the typed error, the trait the rest of the core talks
//! to, and the browser HTTP implementation.
//!
//! Client-side (`browser` feature): real HTTP calls via `gloo-net`.
//! Everywhere else the trait is all there is, so the store and history can
//! be driven by a test double on native targets.
//!
//! ERROR HANDLING
//! ==============
//! Every operation returns `Result<_, ApiError>`. A server response outside
//! 2xx carries its HTTP status; failures before a response exists (network
//! unreachable, malformed body) carry status `0`.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use crate::note::{CreateNoteData, Note, NoteId, NoteUpdate, UpdateNoteData};

/// Error from a remote note operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (status {status})")]
pub struct ApiError {
    pub message: String,
    /// HTTP status code, or `0` for transport-level failures.
    pub status: u16,
}

impl ApiError {
    /// A failure that never produced an HTTP response.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self { message: message.into(), status: 0 }
    }

    /// A non-2xx HTTP response.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self { message: message.into(), status }
    }

    #[must_use]
    pub fn is_transport(&self) -> bool {
        self.status == 0
    }
}

/// The remote CRUD surface for notes.
///
/// Implementations return canonical, normalized notes; callers reconcile
/// local state from the returned values, never from the request they sent.
#[allow(async_fn_in_trait)]
pub trait NoteApi {
    /// `GET /notes`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the server rejects it.
    async fn fetch_notes(&self) -> Result<Vec<Note>, ApiError>;

    /// `POST /notes`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the server rejects it.
    async fn create_note(&self, data: &CreateNoteData) -> Result<Note, ApiError>;

    /// `PUT /notes/{id}`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the server rejects it.
    async fn update_note(&self, id: NoteId, data: &UpdateNoteData) -> Result<Note, ApiError>;

    /// `PATCH /notes/bulk_update`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the server rejects it.
    async fn batch_update_notes(&self, updates: &[NoteUpdate]) -> Result<Vec<Note>, ApiError>;

    /// `DELETE /notes/{id}`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the server rejects it.
    async fn delete_note(&self, id: NoteId) -> Result<(), ApiError>;

    /// `DELETE /notes/bulk_delete`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the server rejects it.
    async fn batch_delete_notes(&self, ids: &[NoteId]) -> Result<(), ApiError>;
}

#[cfg(feature = "browser")]
pub use self::http::HttpNoteApi;

#[cfg(feature = "browser")]
mod http {
    use gloo_net::http::{Request, Response};

    use super::{ApiError, NoteApi};
    use crate::note::{CreateNoteData, Note, NoteId, NoteUpdate, NoteWire, UpdateNoteData};

    /// [`NoteApi`] over HTTP, for the browser.
    pub struct HttpNoteApi {
        base: String,
    }

    impl HttpNoteApi {
        /// `base` is the API origin without a trailing slash, e.g.
        /// `"https://notes.example.com/api"`.
        #[must_use]
        pub fn new(base: impl Into<String>) -> Self {
            Self { base: base.into() }
        }

        fn url(&self, path: &str) -> String {
            format!("{}{path}", self.base)
        }
    }

    fn transport(err: gloo_net::Error) -> ApiError {
        ApiError::transport(err.to_string())
    }

    fn check(resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if (200..300).contains(&status) {
            Ok(resp)
        } else {
            Err(ApiError::http(status, format!("API error: {status} {}", resp.status_text())))
        }
    }

    async fn note_body(resp: Response) -> Result<Note, ApiError> {
        let wire: NoteWire = resp.json().await.map_err(transport)?;
        Ok(Note::from(wire))
    }

    async fn notes_body(resp: Response) -> Result<Vec<Note>, ApiError> {
        let wires: Vec<NoteWire> = resp.json().await.map_err(transport)?;
        Ok(wires.into_iter().map(Note::from).collect())
    }

    impl NoteApi for HttpNoteApi {
        async fn fetch_notes(&self) -> Result<Vec<Note>, ApiError> {
            let resp = Request::get(&self.url("/notes")).send().await.map_err(transport)?;
            notes_body(check(resp)?).await
        }

        async fn create_note(&self, data: &CreateNoteData) -> Result<Note, ApiError> {
            let resp = Request::post(&self.url("/notes"))
                .json(data)
                .map_err(transport)?
                .send()
                .await
                .map_err(transport)?;
            note_body(check(resp)?).await
        }

        async fn update_note(&self, id: NoteId, data: &UpdateNoteData) -> Result<Note, ApiError> {
            let resp = Request::put(&self.url(&format!("/notes/{id}")))
                .json(data)
                .map_err(transport)?
                .send()
                .await
                .map_err(transport)?;
            note_body(check(resp)?).await
        }

        async fn batch_update_notes(&self, updates: &[NoteUpdate]) -> Result<Vec<Note>, ApiError> {
            let payload = serde_json::json!({ "updates": updates });
            let resp = Request::patch(&self.url("/notes/bulk_update"))
                .json(&payload)
                .map_err(transport)?
                .send()
                .await
                .map_err(transport)?;
            notes_body(check(resp)?).await
        }

        async fn delete_note(&self, id: NoteId) -> Result<(), ApiError> {
            let resp = Request::delete(&self.url(&format!("/notes/{id}")))
                .send()
                .await
                .map_err(transport)?;
            check(resp)?;
            Ok(())
        }

        async fn batch_delete_notes(&self, ids: &[NoteId]) -> Result<(), ApiError> {
            let payload = serde_json::json!({ "ids": ids });
            let resp = Request::delete(&self.url("/notes/bulk_delete"))
                .json(&payload)
                .map_err(transport)?
                .send()
                .await
                .map_err(transport)?;
            check(resp)?;
            Ok(())
        }
    }
}
