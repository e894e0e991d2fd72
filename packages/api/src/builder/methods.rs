//! HTTP method implementations
//!
//! Terminal methods issuing a request to a path on the tester's host. Every
//! method returns the fully buffered response; transport failures are
//! errors, and what a failure means is up to the calling test.

use http::Method;
use httpcheck_client::{FileSource, HttpRequest, HttpResponse, MultipartForm, Params, RequestBody, Result};
use serde::Serialize;

use crate::builder::body::{append_query, form_body, json_body, xml_body};
use crate::builder::core::{ContentType, Request};

impl Request {
    /// Issue a GET request
    ///
    /// # Errors
    ///
    /// See [`Request::invoke`].
    pub fn get(&self, path: &str) -> Result<HttpResponse> {
        self.invoke(Method::GET, path, ContentType::TextHtml, RequestBody::Empty)
    }

    /// Issue a GET request with `params` as query string
    ///
    /// # Errors
    ///
    /// See [`Request::invoke`].
    pub fn get_with(&self, path: &str, params: &Params) -> Result<HttpResponse> {
        self.invoke(Method::GET, path, ContentType::TextHtml, params.clone())
    }

    /// Issue a HEAD request
    ///
    /// # Errors
    ///
    /// See [`Request::invoke`].
    pub fn head(&self, path: &str) -> Result<HttpResponse> {
        self.invoke(Method::HEAD, path, ContentType::TextHtml, RequestBody::Empty)
    }

    /// Issue a HEAD request with `params` as query string
    ///
    /// # Errors
    ///
    /// See [`Request::invoke`].
    pub fn head_with(&self, path: &str, params: &Params) -> Result<HttpResponse> {
        self.invoke(Method::HEAD, path, ContentType::TextHtml, params.clone())
    }

    /// Issue an OPTIONS request
    ///
    /// # Errors
    ///
    /// See [`Request::invoke`].
    pub fn options(&self, path: &str) -> Result<HttpResponse> {
        self.invoke(Method::OPTIONS, path, ContentType::TextHtml, RequestBody::Empty)
    }

    /// Issue an OPTIONS request with `params` as query string
    ///
    /// # Errors
    ///
    /// See [`Request::invoke`].
    pub fn options_with(&self, path: &str, params: &Params) -> Result<HttpResponse> {
        self.invoke(Method::OPTIONS, path, ContentType::TextHtml, params.clone())
    }

    /// Issue a PUT request with the given content type and body
    ///
    /// # Errors
    ///
    /// See [`Request::invoke`].
    pub fn put(
        &self,
        path: &str,
        content_type: impl AsRef<str>,
        body: impl Into<RequestBody>,
    ) -> Result<HttpResponse> {
        self.invoke(Method::PUT, path, content_type, body)
    }

    /// PUT with a url-encoded form body
    ///
    /// # Errors
    ///
    /// Returns an encode error if `form` cannot be url-encoded, otherwise see
    /// [`Request::invoke`].
    pub fn put_form<T: Serialize + ?Sized>(&self, path: &str, form: &T) -> Result<HttpResponse> {
        let (ct, body) = form_body(form)?;
        self.invoke(Method::PUT, path, ct, body)
    }

    /// PUT with a JSON body
    ///
    /// # Errors
    ///
    /// Returns an encode error if `value` cannot be serialized, otherwise see
    /// [`Request::invoke`].
    pub fn put_json<T: Serialize + ?Sized>(&self, path: &str, value: &T) -> Result<HttpResponse> {
        let (ct, body) = json_body(value)?;
        self.invoke(Method::PUT, path, ct, body)
    }

    /// PUT with an XML body
    ///
    /// # Errors
    ///
    /// Returns an encode error if `value` cannot be serialized, otherwise see
    /// [`Request::invoke`].
    pub fn put_xml<T: Serialize>(&self, path: &str, value: &T) -> Result<HttpResponse> {
        let (ct, body) = xml_body(value)?;
        self.invoke(Method::PUT, path, ct, body)
    }

    /// Issue a POST request with the given content type and body
    ///
    /// # Errors
    ///
    /// See [`Request::invoke`].
    pub fn post(
        &self,
        path: &str,
        content_type: impl AsRef<str>,
        body: impl Into<RequestBody>,
    ) -> Result<HttpResponse> {
        self.invoke(Method::POST, path, content_type, body)
    }

    /// POST with a url-encoded form body
    ///
    /// # Errors
    ///
    /// Returns an encode error if `form` cannot be url-encoded, otherwise see
    /// [`Request::invoke`].
    pub fn post_form<T: Serialize + ?Sized>(&self, path: &str, form: &T) -> Result<HttpResponse> {
        let (ct, body) = form_body(form)?;
        self.invoke(Method::POST, path, ct, body)
    }

    /// POST with a JSON body
    ///
    /// # Errors
    ///
    /// Returns an encode error if `value` cannot be serialized, otherwise see
    /// [`Request::invoke`].
    pub fn post_json<T: Serialize + ?Sized>(&self, path: &str, value: &T) -> Result<HttpResponse> {
        let (ct, body) = json_body(value)?;
        self.invoke(Method::POST, path, ct, body)
    }

    /// POST with an XML body
    ///
    /// # Errors
    ///
    /// Returns an encode error if `value` cannot be serialized, otherwise see
    /// [`Request::invoke`].
    pub fn post_xml<T: Serialize>(&self, path: &str, value: &T) -> Result<HttpResponse> {
        let (ct, body) = xml_body(value)?;
        self.invoke(Method::POST, path, ct, body)
    }

    /// Issue a PATCH request with the given content type and body
    ///
    /// # Errors
    ///
    /// See [`Request::invoke`].
    pub fn patch(
        &self,
        path: &str,
        content_type: impl AsRef<str>,
        body: impl Into<RequestBody>,
    ) -> Result<HttpResponse> {
        self.invoke(Method::PATCH, path, content_type, body)
    }

    /// PATCH with a url-encoded form body
    ///
    /// # Errors
    ///
    /// Returns an encode error if `form` cannot be url-encoded, otherwise see
    /// [`Request::invoke`].
    pub fn patch_form<T: Serialize + ?Sized>(&self, path: &str, form: &T) -> Result<HttpResponse> {
        let (ct, body) = form_body(form)?;
        self.invoke(Method::PATCH, path, ct, body)
    }

    /// PATCH with a JSON body
    ///
    /// # Errors
    ///
    /// Returns an encode error if `value` cannot be serialized, otherwise see
    /// [`Request::invoke`].
    pub fn patch_json<T: Serialize + ?Sized>(&self, path: &str, value: &T) -> Result<HttpResponse> {
        let (ct, body) = json_body(value)?;
        self.invoke(Method::PATCH, path, ct, body)
    }

    /// PATCH with an XML body
    ///
    /// # Errors
    ///
    /// Returns an encode error if `value` cannot be serialized, otherwise see
    /// [`Request::invoke`].
    pub fn patch_xml<T: Serialize>(&self, path: &str, value: &T) -> Result<HttpResponse> {
        let (ct, body) = xml_body(value)?;
        self.invoke(Method::PATCH, path, ct, body)
    }

    /// Issue a DELETE request with the given content type and body
    ///
    /// # Errors
    ///
    /// See [`Request::invoke`].
    pub fn delete(
        &self,
        path: &str,
        content_type: impl AsRef<str>,
        body: impl Into<RequestBody>,
    ) -> Result<HttpResponse> {
        self.invoke(Method::DELETE, path, content_type, body)
    }

    /// DELETE with a url-encoded form body
    ///
    /// # Errors
    ///
    /// Returns an encode error if `form` cannot be url-encoded, otherwise see
    /// [`Request::invoke`].
    pub fn delete_form<T: Serialize + ?Sized>(&self, path: &str, form: &T) -> Result<HttpResponse> {
        let (ct, body) = form_body(form)?;
        self.invoke(Method::DELETE, path, ct, body)
    }

    /// DELETE with a JSON body
    ///
    /// # Errors
    ///
    /// Returns an encode error if `value` cannot be serialized, otherwise see
    /// [`Request::invoke`].
    pub fn delete_json<T: Serialize + ?Sized>(&self, path: &str, value: &T) -> Result<HttpResponse> {
        let (ct, body) = json_body(value)?;
        self.invoke(Method::DELETE, path, ct, body)
    }

    /// DELETE with an XML body
    ///
    /// # Errors
    ///
    /// Returns an encode error if `value` cannot be serialized, otherwise see
    /// [`Request::invoke`].
    pub fn delete_xml<T: Serialize>(&self, path: &str, value: &T) -> Result<HttpResponse> {
        let (ct, body) = xml_body(value)?;
        self.invoke(Method::DELETE, path, ct, body)
    }

    /// Issue a request with any method.
    ///
    /// `Content-Type` is set to `content_type` before the builder's own
    /// headers are appended. For GET, HEAD and OPTIONS a non-empty body is
    /// moved to the URL as query string and no body is sent.
    ///
    /// # Errors
    ///
    /// Returns a builder error for an unusable URL or content type, an encode
    /// error for a body that cannot be encoded, and any transport error.
    pub fn invoke(
        &self,
        method: Method,
        path: &str,
        content_type: impl AsRef<str>,
        body: impl Into<RequestBody>,
    ) -> Result<HttpResponse> {
        let body = body.into().into_bytes()?;
        let mut url = self.url(path);

        let request = if matches!(method, Method::GET | Method::HEAD | Method::OPTIONS) {
            append_query(&mut url, &body);
            HttpRequest::parse(method, url.as_str())?
        } else {
            HttpRequest::parse(method, url.as_str())?.with_body(body)
        };

        let content_type = httpcheck_client::http::header_value(content_type.as_ref())?;
        self.dispatch(request.with_header(http::header::CONTENT_TYPE, content_type))
    }

    /// Upload `file` as a multipart form.
    ///
    /// The file goes under the form field `filename` with `filename` as its
    /// file name; `fields` follow as plain form fields in the given order.
    ///
    /// # Errors
    ///
    /// Returns an encode error if `file` cannot be read, otherwise see
    /// [`Request::invoke`].
    pub fn multipart(
        &self,
        method: Method,
        path: &str,
        filename: &str,
        file: impl Into<FileSource>,
        fields: &[(&str, &str)],
    ) -> Result<HttpResponse> {
        let form = fields
            .iter()
            .fold(MultipartForm::new().file(filename, file.into())?, |form, (k, v)| {
                form.text(*k, *v)
            });

        let url = self.url(path);
        let content_type = httpcheck_client::http::header_value(&form.content_type())?;
        let request = HttpRequest::parse(method, url.as_str())?
            .with_header(http::header::CONTENT_TYPE, content_type)
            .with_body(form.encode());
        self.dispatch(request)
    }
}
