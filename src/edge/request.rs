use axum::http::{HeaderMap, Method, header};
use url::Url;

/// Read-only view of an inbound request.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
}

impl IncomingRequest {
    pub fn new(method: Method, url: Url, headers: HeaderMap) -> Self {
        Self { method, url, headers }
    }

    /// Convenience constructor for a header-less `GET`.
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url, HeaderMap::new())
    }

    pub fn with_header(mut self, name: header::HeaderName, value: &str) -> Self {
        if let Ok(value) = value.parse() {
            self.headers.insert(name, value);
        }
        self
    }

    pub fn hostname(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Raw Referer header. An empty value counts as absent.
    pub fn referer(&self) -> RefererHeader<'_> {
        match self.headers.get(header::REFERER).map(|v| v.to_str()) {
            None | Some(Ok("")) => RefererHeader::Absent,
            Some(Ok(text)) => RefererHeader::Present(text),
            Some(Err(_)) => RefererHeader::Unreadable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefererHeader<'a> {
    Absent,
    Present(&'a str),
    /// Header bytes are not visible ASCII
    Unreadable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn request() -> IncomingRequest {
        IncomingRequest::get(Url::parse("https://x001.vicdn.cc/abc.m3u8").unwrap())
    }

    #[test]
    fn test_hostname() {
        assert_eq!(request().hostname(), "x001.vicdn.cc");
    }

    #[test]
    fn test_missing_and_empty_referer_are_absent() {
        assert_eq!(request().referer(), RefererHeader::Absent);
        let req = request().with_header(header::REFERER, "");
        assert_eq!(req.referer(), RefererHeader::Absent);
    }

    #[test]
    fn test_referer_present() {
        let req = request().with_header(header::REFERER, "https://vicdn.cc/watch");
        assert_eq!(req.referer(), RefererHeader::Present("https://vicdn.cc/watch"));
    }

    #[test]
    fn test_non_utf8_referer() {
        let mut req = request();
        req.headers.insert(
            header::REFERER,
            HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap(),
        );
        assert_eq!(req.referer(), RefererHeader::Unreadable);
    }
}
