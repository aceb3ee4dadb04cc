use pulldown_cmark::{html, Event, Options, Parser};
use rocket_dyn_templates::tera::{self, Tera, Value};
use std::collections::HashMap;

pub(super) fn register_filters(tera: &mut Tera) {
    tera.register_filter("markdown", markdown);
}

/// Renders an event description as Markdown.
/// Raw HTML in the input is escaped rather than passed through.
fn markdown(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let input: String = tera::from_value(value.clone())
        .map_err(|_| tera::Error::msg(format!("Filter `markdown` received {value}, expected a string")))?;
    Ok(Value::String(render_markdown(&input)))
}

fn render_markdown(input: &str) -> String {
    const OPTIONS: Options = Options::empty()
        .union(Options::ENABLE_TABLES)
        .union(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(input, OPTIONS).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        event => event,
    });
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}
