//! Monitoring dashboard for the apps of one space.
//!
//! The template is plain dashboard JSON with placeholder tokens inside string
//! values. Rendering substitutes them on the parsed document, so substituted
//! values never need JSON escaping.

use serde_json::Value;

const TEMPLATE: &str = include_str!("../templates/dashboard.json");

pub const DASHBOARD_TOKEN: &str = "XXX-DASHBOARD-XXX";
pub const SPACE_TOKEN: &str = "XXX-SPACE-XXX";
pub const CLUSTER_TOKEN: &str = "XXX-CLUSTER-XXX";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("dashboard parameter '{0}' must not be empty")]
    EmptyParameter(&'static str),
    #[error("dashboard template is not valid JSON")]
    Template(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug)]
pub struct DashboardParams<'a> {
    pub name: &'a str,
    pub space: &'a str,
    pub cluster: &'a str,
}

pub fn render(params: &DashboardParams<'_>) -> Result<Value, RenderError> {
    render_template(TEMPLATE, params)
}

fn render_template(template: &str, params: &DashboardParams<'_>) -> Result<Value, RenderError> {
    let substitutions = [
        (DASHBOARD_TOKEN, "name", params.name),
        (SPACE_TOKEN, "space", params.space),
        (CLUSTER_TOKEN, "cluster", params.cluster),
    ];
    for (_, param, value) in &substitutions {
        if value.is_empty() {
            return Err(RenderError::EmptyParameter(*param));
        }
    }

    let mut doc: Value = serde_json::from_str(template)?;
    substitute(&mut doc, &|s: &str| {
        substitutions
            .iter()
            .fold(s.to_owned(), |acc, (token, _, value)| acc.replace(*token, value))
    });
    Ok(doc)
}

fn substitute(value: &mut Value, replace: &dyn Fn(&str) -> String) {
    match value {
        Value::String(s) => *s = replace(s),
        Value::Array(items) => items.iter_mut().for_each(|v| substitute(v, replace)),
        Value::Object(map) => map.values_mut().for_each(|v| substitute(v, replace)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: DashboardParams<'static> = DashboardParams {
        name: "prod apps",
        space: "space-a",
        cluster: "cluster-1",
    };

    #[test]
    fn no_tokens_left() {
        let doc = render(&PARAMS).unwrap();
        let text = doc.to_string();
        for token in [DASHBOARD_TOKEN, SPACE_TOKEN, CLUSTER_TOKEN] {
            assert!(!text.contains(token), "{} left in output", token);
        }
        assert_eq!(doc["displayName"], "prod apps");
        assert!(text.contains(r#"\"namespace_name\"=\"space-a\""#));
        assert!(text.contains(r#"\"cluster_name\"=\"cluster-1\""#));
    }

    #[test]
    fn every_panel_has_a_query() {
        let doc = render(&PARAMS).unwrap();
        let widgets = doc["gridLayout"]["widgets"].as_array().unwrap();
        assert!(!widgets.is_empty());
        for widget in widgets {
            let filter = &widget["xyChart"]["dataSets"][0]["timeSeriesQuery"]["timeSeriesFilter"];
            assert!(filter["filter"].as_str().unwrap().starts_with("metric.type="));
            assert!(filter["aggregation"]["perSeriesAligner"].is_string());
        }
    }

    #[test]
    fn values_are_not_interpreted_as_json() {
        let doc = render_template(
            r#"{"title": "XXX-DASHBOARD-XXX"}"#,
            &DashboardParams {
                name: r#"a "quoted" name"#,
                ..PARAMS
            },
        )
        .unwrap();
        assert_eq!(doc["title"], r#"a "quoted" name"#);
    }

    #[test]
    fn empty_parameter_rejected() {
        let err = render(&DashboardParams {
            cluster: "",
            ..PARAMS
        })
        .unwrap_err();
        assert!(matches!(err, RenderError::EmptyParameter("cluster")));
    }
}
