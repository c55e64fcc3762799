use catalog::Tab;
use minijinja::{Environment, context};
use serde::Serialize;

use crate::{database::Settings, error::AppError};

pub const INDEX_TEMPLATE: &str = "index.html";

#[derive(Serialize)]
pub struct TabLink {
    pub id: &'static str,
    pub label: String,
    pub icon: &'static str,
}

pub fn init_templates() -> Result<Environment<'static>, AppError> {
    let mut env = Environment::new();
    env.add_template(INDEX_TEMPLATE, include_str!("../templates/index.html"))?;

    Ok(env)
}

pub fn tab_links(settings: &Settings) -> Vec<TabLink> {
    Tab::ALL
        .into_iter()
        .map(|tab| TabLink {
            id: tab.id(),
            label: settings.label(tab).to_string(),
            icon: tab.icon(),
        })
        .collect()
}

pub fn render_index(
    env: &Environment<'static>,
    settings: &Settings,
    active_tab: Tab,
) -> Result<String, AppError> {
    let template = env.get_template(INDEX_TEMPLATE)?;

    let html = template.render(context! {
        tabs_config => tab_links(settings),
        active_tab => active_tab.id(),
        settings => settings,
    })?;

    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_marks_active_tab() {
        let env = init_templates().unwrap();
        let html = render_index(&env, &Settings::fallback(), Tab::Notes).unwrap();

        assert!(html.contains(r#"data-active-tab="notes""#));
        assert!(html.contains("bi bi-journal-text"));
        assert!(html.contains("ברוכים הבאים"));
    }

    #[test]
    fn test_labels_escaped() {
        let env = init_templates().unwrap();
        let settings = Settings {
            home_title: "<script>".to_string(),
            ..Settings::fallback()
        };

        let html = render_index(&env, &settings, Tab::Home).unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
