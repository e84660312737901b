/// Which artwork slot an image fills; decides default size and placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Poster,
    Backdrop,
}

impl ImageKind {
    pub fn default_size(&self) -> &'static str {
        match self {
            ImageKind::Poster => "w500",
            ImageKind::Backdrop => "w1280",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            ImageKind::Poster => "/placeholder-poster.jpg",
            ImageKind::Backdrop => "/placeholder-backdrop.jpg",
        }
    }
}

/// Turns relative artwork paths from the catalog into loadable URLs
#[derive(Debug, Clone)]
pub struct ImageResolver {
    base_url: String,
}

impl ImageResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn resolve(&self, path: Option<&str>, kind: ImageKind) -> String {
        self.resolve_sized(path, kind, kind.default_size())
    }

    pub fn resolve_sized(&self, path: Option<&str>, kind: ImageKind, size: &str) -> String {
        match path.filter(|p| !p.is_empty()) {
            Some(path) if path.starts_with('/') => format!("{}/{}{}", self.base_url, size, path),
            Some(path) => format!("{}/{}/{}", self.base_url, size, path),
            None => kind.placeholder().to_string(),
        }
    }
}
