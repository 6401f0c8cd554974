use anyhow::Context as _;
use kube::{config::KubeConfigOptions, Config};

/// Loads the kube config. With an explicit context the kubeconfig file is
/// read directly, otherwise the usual in-cluster / kubeconfig inference runs.
pub async fn load_config(k8s_context: Option<&str>) -> anyhow::Result<Config> {
    match k8s_context {
        Some(context) => {
            let options = KubeConfigOptions {
                context: Some(context.to_owned()),
                ..Default::default()
            };
            Config::from_kubeconfig(&options)
                .await
                .with_context(|| format!("when loading kubeconfig context '{}'", context))
        }
        None => Config::infer().await.context("when inferring kube config"),
    }
}

