use kube::error::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid app name")]
    InvalidAppName,

    /// Zero or several services matched. The two cases are one error kind,
    /// `matches` tells them apart.
    #[error("unknown app: '{name}' in namespace '{namespace}' ({matches} matching services)")]
    UnknownApp {
        name: String,
        namespace: String,
        matches: usize,
    },

    /// Only `runLatest` services are handled, the other modes keep their
    /// configuration elsewhere.
    #[error("app '{name}' uses the '{mode}' rollout mode, only 'runLatest' is supported")]
    UnsupportedMode { name: String, mode: &'static str },

    #[error("failed to create serving client")]
    Factory(#[source] kube::Error),

    #[error("failed to list apps")]
    Fetch(#[source] kube::Error),

    #[error("app '{name}' was modified by someone else while updating, try again")]
    Conflict {
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("failed to update app '{name}'")]
    Update {
        name: String,
        #[source]
        source: kube::Error,
    },
}

impl Error {
    pub(crate) fn from_update(name: &str, source: kube::Error) -> Self {
        match source {
            kube::Error::Api(ErrorResponse { code: 409, .. }) => Error::Conflict {
                name: name.to_owned(),
                source,
            },
            source => Error::Update {
                name: name.to_owned(),
                source,
            },
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
