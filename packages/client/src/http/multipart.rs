//! Multipart form container
//!
//! Transports that own a multipart encoder (fetch, XHR) receive the `FormData`
//! as-is. Byte-oriented transports call [`FormData::encode`] with a boundary of
//! their choosing.

use std::borrow::Cow;
use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

#[derive(Clone)]
pub struct Part {
    value: Bytes,
    file_name: Option<Cow<'static, str>>,
    mime: Option<Cow<'static, str>>,
}

impl Part {
    /// Makes a text parameter.
    pub fn text<T>(value: T) -> Part
    where
        T: Into<Cow<'static, str>>,
    {
        let value = match value.into() {
            Cow::Borrowed(slice) => Bytes::from_static(slice.as_bytes()),
            Cow::Owned(string) => Bytes::from(string),
        };
        Part { value, file_name: None, mime: None }
    }

    /// Makes a new parameter from arbitrary bytes.
    pub fn bytes<T: Into<Bytes>>(value: T) -> Part {
        Part { value: value.into(), file_name: None, mime: None }
    }

    #[must_use]
    pub fn file_name<T: Into<Cow<'static, str>>>(mut self, name: T) -> Part {
        self.file_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn mime_str<T: Into<Cow<'static, str>>>(mut self, mime: T) -> Part {
        self.mime = Some(mime.into());
        self
    }

    pub fn value(&self) -> &Bytes {
        &self.value
    }
}

impl fmt::Debug for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Part")
            .field("len", &self.value.len())
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .finish()
    }
}

#[derive(Clone, Default)]
pub struct FormData {
    fields: Vec<(Cow<'static, str>, Part)>,
}

impl FormData {
    #[must_use]
    pub fn new() -> FormData {
        FormData::default()
    }

    /// Add a data field with supplied name and value.
    #[must_use]
    pub fn text<T, U>(self, name: T, value: U) -> FormData
    where
        T: Into<Cow<'static, str>>,
        U: Into<Cow<'static, str>>,
    {
        self.part(name, Part::text(value))
    }

    /// Adds a customized Part.
    #[must_use]
    pub fn part<T>(mut self, name: T, part: Part) -> FormData
    where
        T: Into<Cow<'static, str>>,
    {
        self.fields.push((name.into(), part));
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Part)> {
        self.fields.iter().map(|(name, part)| (name.as_ref(), part))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Random boundary in the shape browsers generate.
    #[must_use]
    pub fn generate_boundary() -> String {
        let mut rng = fastrand::Rng::new();
        let tail: String = (0..24).map(|_| rng.alphanumeric()).collect();
        format!("----hxsFormBoundary{tail}")
    }

    /// `multipart/form-data` header value for `boundary`.
    #[must_use]
    pub fn content_type(boundary: &str) -> String {
        format!("multipart/form-data; boundary={boundary}")
    }

    /// Serialise every field as an RFC 7578 body.
    #[must_use]
    pub fn encode(&self, boundary: &str) -> Bytes {
        let mut buf = BytesMut::new();
        for (name, part) in &self.fields {
            buf.put_slice(format!("--{boundary}\r\n").as_bytes());
            let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", escape_quotes(name));
            if let Some(file_name) = &part.file_name {
                disposition.push_str(&format!("; filename=\"{}\"", escape_quotes(file_name)));
            }
            buf.put_slice(disposition.as_bytes());
            buf.put_slice(b"\r\n");
            if let Some(mime) = &part.mime {
                buf.put_slice(format!("Content-Type: {mime}\r\n").as_bytes());
            }
            buf.put_slice(b"\r\n");
            buf.put_slice(&part.value);
            buf.put_slice(b"\r\n");
        }
        buf.put_slice(format!("--{boundary}--\r\n").as_bytes());
        buf.freeze()
    }
}

fn escape_quotes(value: &str) -> String {
    value.replace('"', "%22")
}

impl fmt::Debug for FormData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormData").field("parts", &self.fields).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_text_and_file_parts() {
        let form = FormData::new()
            .text("user", "ada")
            .part("avatar", Part::bytes(vec![1u8, 2, 3]).file_name("a.png").mime_str("image/png"));

        let body = form.encode("XYZ");
        let text = String::from_utf8_lossy(&body);

        assert!(text.starts_with("--XYZ\r\nContent-Disposition: form-data; name=\"user\"\r\n\r\nada\r\n"));
        assert!(text.contains("name=\"avatar\"; filename=\"a.png\"\r\nContent-Type: image/png\r\n"));
        assert!(text.ends_with("--XYZ--\r\n"));
    }

    #[test]
    fn boundary_is_random_and_prefixed() {
        let a = FormData::generate_boundary();
        let b = FormData::generate_boundary();
        assert!(a.starts_with("----hxsFormBoundary"));
        assert_ne!(a, b);
        assert_eq!(FormData::content_type("b"), "multipart/form-data; boundary=b");
    }
}
