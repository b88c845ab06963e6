//! Chat widget markup.
//!
//! The browser side is the `<chat-widget>` custom element from
//! `static/widget.js`. It reads its endpoint URLs from `data-*` attributes and
//! swaps the fragments rendered here as updates arrive.

use super::escape_html;
use super::icons::{bot_icon, send_icon, x_icon};
use crate::widget::{Message, WidgetSnapshot};

/// Header title of the open panel.
const PANEL_TITLE: &str = "Chat Assistant";

/// Complete widget: floating launcher plus the panel.
pub fn render_widget(snapshot: &WidgetSnapshot) -> String {
    let id = escape_html(&snapshot.id);
    let hidden = if snapshot.open { "" } else { " hidden" };

    format!(
        r#"<chat-widget class="chat-widget" data-widget-id="{id}"
    data-events-url="/widget/{id}/events"
    data-toggle-url="/widget/{id}/toggle"
    data-close-url="/widget/{id}/close"
    data-send-url="/widget/{id}/send"
    data-unmount-url="/widget/{id}/unmount">
    <section class="chat-panel" data-chat-panel aria-label="{PANEL_TITLE}"{hidden}>
        <header class="chat-header">
            <h2 class="chat-title">{PANEL_TITLE}</h2>
            <button type="button" class="chat-close" data-chat-close aria-label="Close chat">{close}</button>
        </header>
        <div class="chat-messages" data-chat-messages aria-live="polite">{messages}</div>
        {input}
    </section>
    <button type="button" class="chat-launcher" data-chat-toggle aria-label="Toggle chat">{launcher}</button>
</chat-widget>"#,
        close = x_icon(""),
        messages = render_message_list(snapshot),
        input = render_input(&snapshot.pending_input),
        launcher = bot_icon("icon-lg"),
    )
}

/// Contents of the message container: messages in order, then the typing
/// indicator while a reply is pending.
pub fn render_message_list(snapshot: &WidgetSnapshot) -> String {
    let mut html: String = snapshot.messages.iter().map(render_message).collect();
    if snapshot.bot_typing {
        html.push_str(TYPING_INDICATOR);
    }
    html
}

/// A single chat line. User lines sit on the right, bot lines on the left.
pub fn render_message(message: &Message) -> String {
    let sender = message.sender.as_str();
    format!(
        r#"<div class="chat-row chat-row--{sender}" data-message-id="{id}"><div class="chat-bubble chat-bubble--{sender}">{text}</div></div>"#,
        id = message.id,
        text = escape_html(&message.text),
    )
}

/// Three bouncing dots shown while a reply is pending.
pub const TYPING_INDICATOR: &str = r#"<div class="chat-row chat-row--bot" data-chat-typing><div class="chat-bubble chat-bubble--bot chat-typing"><span>●</span><span>●</span><span>●</span></div></div>"#;

fn render_input(pending_input: &str) -> String {
    format!(
        r#"<form class="chat-input-row" data-chat-form>
            <input type="text" name="message" class="chat-input" placeholder="Type your message..." autocomplete="off" value="{value}">
            <button type="submit" class="chat-send" aria-label="Send message">{icon}</button>
        </form>"#,
        value = escape_html(pending_input),
        icon = send_icon(""),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::Sender;

    fn snapshot(messages: Vec<Message>, bot_typing: bool) -> WidgetSnapshot {
        WidgetSnapshot {
            id: "w-1".to_string(),
            open: true,
            bot_typing,
            pending_input: String::new(),
            messages,
        }
    }

    fn message(id: i64, sender: Sender, text: &str) -> Message {
        Message {
            id,
            sender,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_alignment_by_sender() {
        let user = render_message(&message(1, Sender::User, "hi"));
        let bot = render_message(&message(2, Sender::Bot, "hello"));

        assert!(user.contains("chat-row--user"));
        assert!(!bot.contains("chat-row--user"));
        assert!(bot.contains("chat-row--bot"));
        assert!(user.contains(r#"data-message-id="1""#));
    }

    #[test]
    fn test_text_is_escaped() {
        let html = render_message(&message(1, Sender::User, "<script>alert('x')</script>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_list_keeps_order_and_appends_typing_last() {
        let snap = snapshot(
            vec![
                message(1, Sender::Bot, "first"),
                message(2, Sender::User, "second"),
            ],
            true,
        );
        let html = render_message_list(&snap);

        let first = html.find("first").unwrap();
        let second = html.find("second").unwrap();
        let typing = html.find("data-chat-typing").unwrap();
        assert!(first < second);
        assert!(second < typing);
    }

    #[test]
    fn test_typing_indicator_only_while_typing() {
        let snap = snapshot(vec![message(1, Sender::User, "hi")], false);
        assert!(!render_message_list(&snap).contains("data-chat-typing"));
    }

    #[test]
    fn test_closed_widget_hides_panel() {
        let mut snap = snapshot(Vec::new(), false);
        snap.open = false;
        let html = render_widget(&snap);
        assert!(html.contains("data-chat-panel aria-label=\"Chat Assistant\" hidden"));
        assert!(html.contains(r#"data-events-url="/widget/w-1/events""#));

        snap.open = true;
        assert!(!render_widget(&snap).contains(" hidden>"));
    }

    #[test]
    fn test_draft_is_prefilled() {
        let mut snap = snapshot(Vec::new(), false);
        snap.pending_input = "say \"hi\"".to_string();
        assert!(render_widget(&snap).contains(r#"value="say &quot;hi&quot;""#));
    }
}
