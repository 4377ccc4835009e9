use url::{Origin, Url};

/// The set of URLs a crawl is allowed to visit
///
/// A URL is in scope when its origin (scheme, host and port) equals the start URL's
/// origin. `https://example.com` and `https://www.example.com` are different sites, as
/// are `http://` and `https://` on the same host.
#[derive(Debug, Clone)]
pub struct SiteScope {
    origin: Origin,
}

impl SiteScope {
    /// Creates a scope anchored at the start URL's origin
    pub fn new(start_url: &Url) -> Self {
        Self {
            origin: start_url.origin(),
        }
    }

    /// Returns true if the URL shares the start URL's origin
    pub fn contains(&self, url: &Url) -> bool {
        url.origin() == self.origin
    }

    /// The origin serialized as `scheme://host[:port]`
    pub fn origin(&self) -> String {
        self.origin.ascii_serialization()
    }
}
