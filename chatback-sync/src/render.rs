//! HTML fragments for the embed widget and the inline comment list
//!
//! Element ids are stable and derived from local comment ids so page
//! scripts can hook them. Every user-supplied field is escaped; nothing
//! stored is trusted as pre-sanitized.

use crate::models::Comment;

const WIDGET_SCRIPT_URL: &str = "//chatback.me/cb.widget.js";

/// Escape text for interpolation into HTML bodies and quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One list item. The author renders as a link only when a provider is
/// stored; a provider without a website yields an anchor with an empty
/// href, as the legacy widget produced.
fn comment_item_html(comment: &Comment) -> String {
    let name = escape_html(&comment.author_name);

    let author = match comment.author_provider.as_deref() {
        Some(provider) if !provider.is_empty() => format!(
            "<a id=\"cb-author-user-{id}\" href=\"{www}\" rel=\"nofollow\">{name}</a>",
            id = comment.id,
            www = escape_html(comment.author_www.as_deref().unwrap_or("")),
            name = name,
        ),
        _ => format!(
            "<span id=\"cb-author-user-{id}\">{name}</span>",
            id = comment.id,
            name = name,
        ),
    };

    format!(
        "<li id=\"cb-comment-{id}\">\
<div id=\"cb-comment-header-{id}\" class=\"cb-comment-header\">\
<cite id=\"cb-cite-{id}\">{author}</cite>\
</div>\
<div id=\"cb-comment-body-{id}\" class=\"cb-comment-body\">\
<div id=\"cb-comment-message-{id}\" class=\"cb-comment-message\">{message}</div>\
</div>\
</li>",
        id = comment.id,
        author = author,
        message = escape_html(&comment.message),
    )
}

/// Inline list wrapper; an empty selection renders as an empty string
pub fn comment_list_html(comments: &[Comment]) -> String {
    if comments.is_empty() {
        return String::new();
    }

    let items: String = comments.iter().map(comment_item_html).collect();
    format!(
        "<div id=\"cb-content\"><ul id=\"cb-comments\">{}</ul></div>",
        items
    )
}

/// Widget container with the cached comments inline, followed by the
/// loader script. The script clears the container before the live widget
/// takes over, so the inline list is only a no-JavaScript fallback. The
/// channel is embedded as a JSON string literal with `<` replaced by
/// its JS unicode escape, so arbitrary values can neither leave the
/// string nor close the script element.
pub fn widget_html(site_id: i64, channel: &str, inline_comments: &str) -> String {
    let channel_literal = serde_json::to_string(channel)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace('<', "\\u003c");

    format!(
        "<div id=\"cb-container\">{inline}</div>\n\
<script type=\"text/javascript\">\n\
var cbSite = {site};\n\
var cbChannel = {channel};\n\
document.getElementById('cb-container').innerHTML = '';\n\
(function() {{\n\
    var cb = document.createElement('script');\n\
    cb.type = 'text/javascript';\n\
    cb.async = true;\n\
    cb.src = '{src}';\n\
    (document.getElementsByTagName('head')[0] || document.getElementsByTagName('body')[0]).appendChild(cb);\n\
}})();\n\
</script>",
        inline = inline_comments,
        site = site_id,
        channel = channel_literal,
        src = WIDGET_SCRIPT_URL,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CommentStatus;

    fn sample_comment(id: i64) -> Comment {
        Comment {
            id,
            remote_id: id * 100,
            parent_id: 0,
            channel: "/post".to_string(),
            site_id: 1,
            author_id: "7".to_string(),
            author_name: "ann".to_string(),
            author_email: "ann@example.com".to_string(),
            author_www: None,
            author_avatar: None,
            author_provider: None,
            rating: 0,
            created: "2024-01-15 10:30:00".to_string(),
            ip: "10.0.0.1".to_string(),
            message: "hello".to_string(),
            media: String::new(),
            status: CommentStatus::Approved,
        }
    }

    #[test]
    fn test_escape_html_covers_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x" onload='y'>&"#),
            "&lt;a href=&quot;x&quot; onload=&#39;y&#39;&gt;&amp;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_item_uses_span_without_provider() {
        let html = comment_item_html(&sample_comment(3));
        assert!(html.contains("<span id=\"cb-author-user-3\">ann</span>"));
        assert!(!html.contains("<a "));
    }

    #[test]
    fn test_item_links_when_provider_present() {
        let mut comment = sample_comment(4);
        comment.author_provider = Some("twitter".to_string());
        comment.author_www = Some("https://ann.example".to_string());

        let html = comment_item_html(&comment);
        assert!(html.contains(
            "<a id=\"cb-author-user-4\" href=\"https://ann.example\" rel=\"nofollow\">ann</a>"
        ));
    }

    #[test]
    fn test_item_provider_without_website_gives_empty_href() {
        let mut comment = sample_comment(5);
        comment.author_provider = Some("native".to_string());

        let html = comment_item_html(&comment);
        assert!(html.contains("href=\"\""));
    }

    #[test]
    fn test_item_escapes_message_and_name() {
        let mut comment = sample_comment(6);
        comment.author_name = "<b>ann</b>".to_string();
        comment.message = "<script>alert(1)</script>".to_string();

        let html = comment_item_html(&comment);
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("&lt;b&gt;ann&lt;/b&gt;"));
        assert!(!html.contains("<script>alert"));
    }

    #[test]
    fn test_list_wraps_items_and_empty_is_empty() {
        assert_eq!(comment_list_html(&[]), "");

        let html = comment_list_html(&[sample_comment(1), sample_comment(2)]);
        assert!(html.starts_with("<div id=\"cb-content\"><ul id=\"cb-comments\">"));
        assert!(html.contains("cb-comment-1"));
        assert!(html.contains("cb-comment-2"));
        assert!(html.ends_with("</ul></div>"));
    }

    #[test]
    fn test_widget_embeds_site_channel_and_loader() {
        let html = widget_html(9, "/post", "<ul>cached</ul>");
        assert!(html.contains("<div id=\"cb-container\"><ul>cached</ul></div>"));
        assert!(html.contains("var cbSite = 9;"));
        assert!(html.contains("var cbChannel = \"/post\";"));
        assert!(html.contains(WIDGET_SCRIPT_URL));
    }

    #[test]
    fn test_widget_channel_cannot_escape_script_context() {
        let html = widget_html(1, "</script><script>alert(1)", "");
        assert!(!html.contains("</script><script>"));
        assert!(html.contains("var cbChannel = \"\\u003c/script>\\u003cscript>alert(1)\";"));
    }
}
