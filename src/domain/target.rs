use std::fmt;

/// Distribution repository a build is published to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishTarget {
    Staging,
    Production,
}

impl PublishTarget {
    /// Repository identifier passed to the upload tool
    pub fn repository(&self) -> &'static str {
        match self {
            PublishTarget::Staging => "testpypi",
            PublishTarget::Production => "pypi",
        }
    }

    /// Upload endpoint behind the repository identifier
    pub fn endpoint(&self) -> &'static str {
        match self {
            PublishTarget::Staging => "https://test.pypi.org/legacy/",
            PublishTarget::Production => "https://upload.pypi.org/legacy/",
        }
    }

    /// Command an operator can use to install the package from this target
    pub fn install_hint(&self, package_name: &str) -> String {
        match self {
            PublishTarget::Staging => format!(
                "pip install --index-url https://test.pypi.org/simple/ {}",
                package_name
            ),
            PublishTarget::Production => format!("pip install {}", package_name),
        }
    }
}

impl fmt::Display for PublishTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repository().to_uppercase())
    }
}
