//! Fixture definers: page skeletons and a search widget composed from a
//! search button and a search input.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::definer::{Arguments, Definer, DefinerError, Dependency};
use crate::render::TemplateRenderer;

// ---------------------------------------------------------------------------
// Attribute helpers
// ---------------------------------------------------------------------------

static NULL: Value = Value::Null;

fn arg<'a>(args: &'a Arguments, name: &str) -> &'a Value {
    args.get(name).unwrap_or(&NULL)
}

/// `name="value"` for a non-empty string value, else nothing.
pub fn attr(name: &str, value: &Value) -> Value {
    match value.as_str() {
        Some(text) if !text.is_empty() => json!(format!("{}=\"{}\"", name, text)),
        _ => json!(""),
    }
}

/// `id` and `class` attributes of a div description
/// (`{"div_id": .., "div_class": ..}`).
pub fn div_attrs(div: &Value) -> Value {
    let parts: Vec<String> = [attr("id", &div["div_id"]), attr("class", &div["div_class"])]
        .iter()
        .filter_map(|v| v.as_str().filter(|s| !s.is_empty()).map(str::to_owned))
        .collect();
    json!(parts.join(" "))
}

/// A renderer with the `if_div`, `if_id` and `if_class` attribute helpers.
pub fn fixture_renderer() -> TemplateRenderer {
    TemplateRenderer::new()
        .with_helper("if_div", |args, _| {
            Ok(div_attrs(args.first().unwrap_or(&NULL)))
        })
        .with_helper("if_id", |args, _| {
            Ok(attr("id", args.first().unwrap_or(&NULL)))
        })
        .with_helper("if_class", |args, _| {
            Ok(attr("class", args.first().unwrap_or(&NULL)))
        })
}

// ---------------------------------------------------------------------------
// Search widget
// ---------------------------------------------------------------------------

/// A submit button: `button` describes its label, id and class.
pub fn button_search() -> Result<Arc<Definer>, DefinerError> {
    Definer::builder("button_search")
        .param_default(
            "button",
            json!({"label": "Search", "button_id": "", "button_class": ""}),
        )
        .local("id_attr", |args| Ok(attr("id", &arg(args, "button")["button_id"])))
        .local("class_attr", |args| {
            Ok(attr("class", &arg(args, "button")["button_class"]))
        })
        .template(r#"<button type="submit" {{ id_attr }} {{ class_attr }}>{{ button.label }}</button>"#)
        .build()
}

/// A search input: `input` describes its id, class and placeholder.
pub fn input_search() -> Result<Arc<Definer>, DefinerError> {
    Definer::builder("input_search")
        .param_default(
            "input",
            json!({"input_id": "search-input", "input_class": "", "placeholder": "Search..."}),
        )
        .local("id_attr", |args| Ok(attr("id", &arg(args, "input")["input_id"])))
        .local("class_attr", |args| {
            Ok(attr("class", &arg(args, "input")["input_class"]))
        })
        .template(r#"<input type="search" {{ id_attr }} {{ class_attr }} placeholder="{{ input.placeholder }}">"#)
        .build()
}

/// Default configuration of the search widget.
pub fn default_search() -> Value {
    json!({
        "script_url": "/static/flexsearch.bundle.js",
        "input_div": {"div_id": "", "div_class": "search-input"},
        "results_div": {"div_id": "search-results", "div_class": ""},
        "input": {"input_id": "search-input", "input_class": "", "placeholder": "Search..."},
        "no_results": "No results",
        "index": {
            "index_json_file": "/searchindex.json",
            "index_types": ["title", "content"],
            "index_store_types": ["title", "href", "kind"]
        },
        "results": {"limit": 10}
    })
}

/// A search box with a results pane, composed from [`input_search`] and
/// [`button_search`]. The button is omitted when `button` is null.
pub fn flexsearch() -> Result<Arc<Definer>, DefinerError> {
    Definer::builder("flexsearch")
        .param_default("search_div", json!({}))
        .param_default("search", default_search())
        .param_default("button_div", json!({}))
        .param_default("button", json!({"label": "Search"}))
        .local("search_div_", |args| Ok(div_attrs(arg(args, "search_div"))))
        .local("button_div_", |args| Ok(div_attrs(arg(args, "button_div"))))
        .local("input_div", |args| Ok(div_attrs(&arg(args, "search")["input_div"])))
        .local("results_div", |args| {
            Ok(div_attrs(&arg(args, "search")["results_div"]))
        })
        .local_value("null_button", Value::Null)
        .depends_on([button_search()?, input_search()?])
        .template(FLEXSEARCH)
        .build()
}

const FLEXSEARCH: &str = r#"<div {{ search_div_ }}>
    <div {{ input_div }}>
        {{ input_search(search.input) }}
    </div>
    {% if not button == null_button %}
    <div {{ button_div_ }}>
        {{ button_search(button) }}
    </div>
    {% endif %}
</div>
<div {{ results_div }} x-show="hasSearchResults" x-cloak></div>
<script src="{{ search.script_url }}"></script>
<script>
const searchIndex = {
    file: "{{ search.index.index_json_file }}",
    index: {{ search.index.index_types | tojson }},
    store: {{ search.index.index_store_types | tojson }},
    limit: {{ search.results.limit }},
    empty: {{ search.no_results | tojson }}
};
</script>"#;

// ---------------------------------------------------------------------------
// Page skeletons
// ---------------------------------------------------------------------------

/// A minimal document: `title` (defaulted) and a required `body`.
pub fn page_skeleton() -> Result<Arc<Definer>, DefinerError> {
    Definer::builder("page")
        .param_default("title", "Untitled")
        .template(
            "<!DOCTYPE html>\n<html>\n<head>\n<title>{{ title }}</title>\n</head>\n<body>\n{{ body }}\n</body>\n</html>",
        )
        .build()
}

/// A document whose body is the [`flexsearch`] widget.
pub fn search_page() -> Result<Arc<Definer>, DefinerError> {
    Definer::builder("search_page")
        .param_default("title", "Search")
        .depends_on([
            Dependency::from(flexsearch()?),
            "if_class".into(),
        ])
        .template(
            "<!DOCTYPE html>\n<html>\n<head>\n<title>{{ title }}</title>\n</head>\n<body {{ if_class('search-page') }}>\n{{ flexsearch }}\n</body>\n</html>",
        )
        .build()
}

/// A document layout with a `content` slot for markdown.
pub fn static_layout() -> Result<Arc<Definer>, DefinerError> {
    Definer::builder("static_layout")
        .param_default("title", "Untitled")
        .template(
            "<html>\n<head><title>{{ title }}</title></head>\n<body>\n<main>{{ content }}</main>\n</body>\n</html>",
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Context;
    use crate::render::Renderer;

    #[test]
    fn attribute_helpers() {
        assert_eq!(attr("id", &json!("x")), json!("id=\"x\""));
        assert_eq!(attr("id", &json!("")), json!(""));
        assert_eq!(attr("id", &Value::Null), json!(""));
        assert_eq!(
            div_attrs(&json!({"div_id": "a", "div_class": "b c"})),
            json!("id=\"a\" class=\"b c\"")
        );
        assert_eq!(div_attrs(&json!({"div_class": "b"})), json!("class=\"b\""));
        assert_eq!(div_attrs(&json!({})), json!(""));
    }

    #[test]
    fn fixtures_build() {
        assert!(button_search().is_ok());
        assert!(input_search().is_ok());
        assert!(flexsearch().is_ok());
        assert!(page_skeleton().is_ok());
        assert!(search_page().is_ok());
        assert!(static_layout().is_ok());
    }

    #[test]
    fn search_widget_needs_nothing_external() {
        let widget = flexsearch().unwrap();
        assert_eq!(widget.external_vars().count(), 0);
        assert!(widget.declares_depends_on());
    }

    #[test]
    fn button_renders_with_attributes() {
        let html = fixture_renderer()
            .render(
                &button_search().unwrap(),
                &Context::new().with("button", json!({"label": "Go", "button_id": "go"})),
            )
            .unwrap();
        assert_eq!(html, r#"<button type="submit" id="go" >Go</button>"#);
    }
}
