/// Namespace used when neither the call nor the client names one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Per-call options for listing, setting and unsetting env vars.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvOptions {
    /// Overrides the client's default namespace.
    pub namespace: Option<String>,
}

impl EnvOptions {
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub(crate) fn resolve_namespace<'a>(&'a self, default: &'a str) -> &'a str {
        self.namespace.as_deref().unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_override() {
        assert_eq!(EnvOptions::default().resolve_namespace("ns-a"), "ns-a");
        assert_eq!(
            EnvOptions::default()
                .namespace("ns-b")
                .resolve_namespace("ns-a"),
            "ns-b"
        );
    }
}
