use anyhow::Result;
use minijinja::value::Value;
use minijinja::{AutoEscape, Environment, context};

use crate::blocks::escape_html_text;

const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
</head>
<body>
<header class="site-header">
  <h1>Headless Preview</h1>
  <p class="status">Preview Mode: <strong>{{ "Active" if draft else "Inactive" }}</strong></p>
  <p class="path"><code>{{ path }}</code></p>
</header>
<main>
{% if heading %}<h2>{{ heading }}</h2>{% endif %}
{{ body }}
</main>
{% if draft %}
<div class="preview-banner">
  <span>Preview Mode</span>
  <a href="{{ exit_href }}">Exit</a>
</div>
{% endif %}
</body>
</html>
"#;

pub struct PageView<'a> {
    pub title: &'a str,
    pub heading: Option<&'a str>,
    pub path: &'a str,
    pub draft: bool,
    pub exit_href: &'a str,
    /// Pre-rendered, trusted HTML.
    pub body_html: String,
}

pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|name| {
            if name.ends_with(".html") {
                AutoEscape::Html
            } else {
                AutoEscape::None
            }
        });
        env.add_template("page.html", PAGE_TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn render(&self, view: PageView<'_>) -> Result<String> {
        let template = self.env.get_template("page.html")?;
        let html = template.render(context! {
            title => view.title,
            heading => view.heading,
            path => view.path,
            draft => view.draft,
            exit_href => Value::from_safe_string(escape_html_text(view.exit_href)),
            body => Value::from_safe_string(view.body_html),
        })?;
        Ok(html)
    }
}
