//! Landing page.

use crate::widget::WidgetSnapshot;

use super::widget::render_widget;

/// Wrap page content in the HTML document shell.
pub fn html_shell(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Landing page with a chat assistant">
    <title>{title}</title>

    <!-- Local assets only -->
    <link rel="stylesheet" href="/static/widget.css">
    <script defer src="/static/widget.js"></script>
</head>
<body>
{content}
</body>
</html>"#,
        title = super::escape_html(title),
    )
}

/// Welcome content plus the mounted widget.
pub fn landing_page(widget: &WidgetSnapshot) -> String {
    let content = format!(
        r#"<main class="landing">
    <h1 class="landing-title">Welcome to My Chat App</h1>
    <p class="landing-lead">
        This is a simple landing page. Click the chatbot button at the bottom
        right to start chatting!
    </p>
</main>

{widget}"#,
        widget = render_widget(widget),
    );
    html_shell("My Chat App", &content)
}
