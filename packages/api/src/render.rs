// ABOUTME: Server-side HTML rendering for the task list
// ABOUTME: Builds the index page and error pages from plain strings, escaping all user text

use axum::http::StatusCode;
use tasklist_storage::{Filter, Item, ItemCounts, MAX_TEXT_LENGTH};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; background: #0f172a; color: #e2e8f0; margin: 0; }
.container { max-width: 36rem; margin: 3rem auto; padding: 0 1rem; }
h1 { font-size: 1.5rem; margin-bottom: 1rem; }
form.inline { display: inline; }
.add { display: flex; gap: .5rem; margin-bottom: 1rem; }
.add input[type=text] { flex: 1; padding: .5rem; border-radius: .375rem; border: 1px solid #334155; background: #1e293b; color: inherit; }
button { cursor: pointer; border: 1px solid #334155; background: #1e293b; color: inherit; border-radius: .375rem; padding: .35rem .75rem; }
.tabs { display: flex; gap: .75rem; margin-bottom: .75rem; }
.tabs a { color: #94a3b8; text-decoration: none; }
.tabs a.active { color: #f8fafc; font-weight: 600; }
ul.items { list-style: none; padding: 0; margin: 0; border: 1px solid #334155; border-radius: .5rem; }
.item { display: flex; align-items: center; gap: .75rem; padding: .75rem 1rem; border-bottom: 1px solid #1e293b; }
.item .text { flex: 1; white-space: pre-wrap; }
.item .text.completed { text-decoration: line-through; color: #64748b; }
.empty { padding: 1.5rem; color: #64748b; font-size: .875rem; }
.footer { display: flex; justify-content: space-between; align-items: center; margin-top: .75rem; color: #94a3b8; font-size: .875rem; }
"#;

/// Everything the index page shows
pub struct IndexView<'a> {
    pub items: &'a [Item],
    /// Filter value exactly as the client sent it (or `all` when absent)
    pub filter: &'a str,
    pub counts: ItemCounts,
}

pub fn index_page(view: &IndexView<'_>) -> String {
    let query = filter_query(view.filter);

    let mut body = String::new();
    body.push_str("<h1>Tasks</h1>\n");
    body.push_str(&format!(
        r#"<form class="add" method="post" action="/add/{query}">
    <input type="text" name="text" maxlength="{max}" placeholder="What needs to be done?" autofocus>
    <button type="submit">Add</button>
</form>
"#,
        query = query,
        max = MAX_TEXT_LENGTH,
    ));

    body.push_str(&render_tabs(view));
    body.push_str(&render_items(view.items, &query));

    body.push_str(&format!(
        r#"<div class="footer">
    <span><span id="count-active">{active}</span> active, <span id="count-completed">{completed}</span> completed</span>
"#,
        active = view.counts.active,
        completed = view.counts.completed,
    ));
    if view.counts.completed > 0 {
        body.push_str(&format!(
            r#"    <form class="inline" method="post" action="/clear-completed/{}"><button type="submit">Clear completed</button></form>
"#,
            query
        ));
    }
    body.push_str("</div>\n");

    layout("Tasks", &body)
}

fn render_tabs(view: &IndexView<'_>) -> String {
    let mut tabs = String::from("<nav class=\"tabs\">\n");
    for filter in Filter::ALL {
        let class = if filter.as_str() == view.filter {
            " class=\"active\""
        } else {
            ""
        };
        tabs.push_str(&format!(
            "    <a href=\"/?filter={name}\"{class}>{label} ({count})</a>\n",
            name = filter.as_str(),
            class = class,
            label = tab_label(filter),
            count = view.counts.get(filter),
        ));
    }
    tabs.push_str("</nav>\n");
    tabs
}

fn tab_label(filter: Filter) -> &'static str {
    match filter {
        Filter::All => "All",
        Filter::Active => "Active",
        Filter::Completed => "Completed",
    }
}

fn render_items(items: &[Item], query: &str) -> String {
    if items.is_empty() {
        return "<ul class=\"items\">\n    <li class=\"empty\">No tasks here. Add one above.</li>\n</ul>\n"
            .to_string();
    }

    let mut list = String::from("<ul class=\"items\">\n");
    for item in items {
        let (mark, state) = if item.completed {
            ("&#9745;", " completed")
        } else {
            ("&#9744;", "")
        };
        list.push_str(&format!(
            r#"    <li class="item" data-id="{id}">
        <form class="inline" method="post" action="/toggle/{id}/{query}"><button type="submit" title="Toggle">{mark}</button></form>
        <span class="text{state}">{text}</span>
        <form class="inline" method="post" action="/delete/{id}/{query}"><button type="submit" title="Delete">Delete</button></form>
    </li>
"#,
            id = item.id,
            query = query,
            mark = mark,
            state = state,
            text = html_escape(&item.text),
        ));
    }
    list.push_str("</ul>\n");
    list
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error")
    );
    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"/\">Back to tasks</a></p>\n",
        html_escape(&title),
        html_escape(message)
    );
    layout(&title, &body)
}

/// `?filter=<value>` with the value percent-encoded and attribute-escaped
fn filter_query(filter: &str) -> String {
    format!("?filter={}", html_escape(&urlencoding::encode(filter)))
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <style>{}</style>
</head>
<body>
    <div class="container">
{}
    </div>
</body>
</html>"#,
        html_escape(title),
        STYLE,
        body
    )
}

/// HTML escape helper
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
